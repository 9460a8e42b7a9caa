//! The seam between compdoc and the configuration type system.
//!
//! Every introspection goes through [`TypeValue`]. The walker, the
//! declaration scanner and the template helpers never look at a concrete
//! representation, so a different evaluator can be plugged in by
//! implementing this trait. [`crate::catalog`] ships the in-memory
//! implementation used by the CLI.

use std::fmt;
use std::fmt::Display;

use float_cmp::approx_eq;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Annotation argument that hides a field, pattern or declaration.
pub const HIDDEN_ARGUMENT: &str = "hidden";
/// Annotation argument that forces a named-type reference to be inlined.
pub const EXPAND_ARGUMENT: &str = "expand";
/// Annotation argument that places a declaration in the reference category.
pub const REFERENCE_ARGUMENT: &str = "ref";
/// Annotation argument that places a declaration in the extension category.
pub const EXTENSION_ARGUMENT: &str = "ext";
/// The annotation tag compdoc looks for unless configured otherwise.
pub const DEFAULT_ANNOTATION_TAG: &str = "compdoc";

/// Errors surfaced by a [`TypeValue`] that cannot be introspected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueError {
	#[error("value of kind `{0}` cannot be iterated as a struct")]
	NotAStruct(String),
	#[error("reference `{0}` does not resolve to a declaration")]
	UnresolvedReference(String),
	#[error("evaluation failed: {0}")]
	Evaluation(String),
}

/// The structural kind of a type value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	Primitive(Primitive),
	Struct,
	List,
	Disjunction,
}

impl Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Primitive(primitive) => primitive.fmt(f),
			Self::Struct => f.write_str("struct"),
			Self::List => f.write_str("list"),
			Self::Disjunction => f.write_str("disjunction"),
		}
	}
}

/// Scalar kinds, displayed with the configuration language's names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
	String,
	Bool,
	Int,
	Float,
	Number,
	Bytes,
	Null,
	/// Top: any value is accepted.
	Any,
}

impl Primitive {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Float => "float",
			Self::Number => "number",
			Self::Bytes => "bytes",
			Self::Null => "null",
			Self::Any => "_",
		}
	}
}

impl Display for Primitive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A concrete scalar value, used for defaults and disjunction branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
}

impl Literal {
	/// The primitive kind this literal belongs to.
	pub fn primitive(&self) -> Primitive {
		match self {
			Self::Null => Primitive::Null,
			Self::Bool(_) => Primitive::Bool,
			Self::Int(_) => Primitive::Int,
			Self::Float(_) => Primitive::Float,
			Self::String(_) => Primitive::String,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value.as_str()),
			_ => None,
		}
	}
}

impl Eq for Literal {}
impl PartialEq for Literal {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(value), Self::Bool(other_value)) => value == other_value,
			(Self::Int(value), Self::Int(other_value)) => value == other_value,
			(Self::Float(value), Self::Float(other_value)) => {
				approx_eq!(f64, *value, *other_value, ulps = 2)
			}
			(Self::String(value), Self::String(other_value)) => value == other_value,
			_ => false,
		}
	}
}

impl Display for Literal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("null"),
			Self::Bool(value) => write!(f, "{value}"),
			Self::Int(value) => write!(f, "{value}"),
			Self::Float(value) => f.write_str(&format_float(*value)),
			Self::String(value) => write!(f, "{value:?}"),
		}
	}
}

/// Shortest round-trip form, switching to a signed two-digit exponent below
/// `1e-4` and from `1e6` up: `2.5`, `1e+06`, `1.5e-07`.
fn format_float(value: f64) -> String {
	if value.is_nan() {
		return "NaN".to_string();
	}
	if value.is_infinite() {
		return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
	}

	let scientific = format!("{value:e}");
	let Some((mantissa, exponent)) = scientific.split_once('e') else {
		return value.to_string();
	};
	let exponent: i32 = exponent.parse().unwrap_or_default();
	if (-4..6).contains(&exponent) {
		return value.to_string();
	}

	let sign = if exponent < 0 { '-' } else { '+' };
	format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

/// How a struct field is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldConstraint {
	/// `name: value`
	#[default]
	Regular,
	/// `name?: value`
	Optional,
	/// `name!: value`
	Required,
}

/// A labelled member of a struct: a field or a named-type declaration.
#[derive(Debug, Clone)]
pub struct Field<V> {
	pub label: String,
	pub constraint: FieldConstraint,
	pub value: V,
}

/// A pattern constraint: any label matching `pattern` maps to `value`.
#[derive(Debug, Clone)]
pub struct Pattern<V> {
	pub pattern: String,
	pub value: V,
}

/// A node in the configuration type system.
///
/// Iteration methods preserve source declaration order. Implementations
/// report problems through [`ValueError`] rather than panicking; callers that
/// only document schemas treat an error as "nothing to show".
pub trait TypeValue: Sized {
	/// Regular, optional and required fields in source order.
	fn fields(&self) -> Result<Vec<Field<Self>>, ValueError>;

	/// Pattern constraints in source order.
	fn patterns(&self) -> Result<Vec<Pattern<Self>>, ValueError>;

	/// Named-type declarations directly inside this value.
	fn definitions(&self) -> Result<Vec<Field<Self>>, ValueError>;

	/// Comment groups attached to this value, outermost first.
	fn doc(&self) -> Vec<String>;

	/// The default value, if the value carries a concrete one.
	fn default_value(&self) -> Option<Literal>;

	/// The value itself, if it is concrete.
	fn literal(&self) -> Option<Literal>;

	fn kind(&self) -> Kind;

	/// Branches of a disjunction in source order. Empty for other kinds.
	fn disjuncts(&self) -> Vec<Self>;

	/// Positional arguments of the annotation named `tag`, or `None` when
	/// the value does not carry it.
	fn annotation(&self, tag: &str) -> Option<Vec<String>>;

	/// The display name of the declaration this value refers to, when the
	/// value is itself a named-type reference.
	fn reference_name(&self) -> Option<String>;

	/// A key shared by every reference to the same declaration. Same-named
	/// declarations in different packages or scopes get different keys.
	fn reference_identity(&self) -> Option<String> {
		self.reference_name()
	}

	/// The [`TypeValue::reference_identity`] of references to this value,
	/// when this value is itself a declaration.
	fn declaration_identity(&self) -> Option<String> {
		None
	}

	/// Look up a direct child by label.
	fn lookup(&self, label: &str) -> Option<Self>;

	/// Out-of-band evaluation error for this value.
	fn error(&self) -> Option<ValueError> {
		None
	}

	/// True when the annotation `tag` carries `argument` at any position.
	fn has_annotation_argument(&self, tag: &str, argument: &str) -> bool {
		self.annotation(tag)
			.is_some_and(|args| args.iter().any(|arg| arg == argument))
	}

	/// Joined, trimmed doc text. Empty when there are no comments.
	fn doc_text(&self) -> String {
		self.doc().join("\n").trim().to_string()
	}
}
