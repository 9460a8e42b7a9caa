use serde::Serialize;

use crate::value::DEFAULT_ANNOTATION_TAG;
use crate::value::EXPAND_ARGUMENT;
use crate::value::FieldConstraint;
use crate::value::HIDDEN_ARGUMENT;
use crate::value::Kind;
use crate::value::Primitive;
use crate::value::TypeValue;

/// Type marker for a struct with no visible fields.
pub const OPEN_STRUCT_TYPE: &str = "{...}";
/// Type marker for any list, regardless of its element type.
pub const LIST_TYPE: &str = "[...]";
/// Appended to a reference name when expanding it again would recurse.
pub const RECURSIVE_SUFFIX: &str = " (recursive)";

/// One node in a documentation tree.
///
/// A field either has `children` or a non-empty `type`, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaField {
	/// Field label, or the pattern's display form when `is_pattern` is set.
	pub name: String,
	pub doc: String,
	#[serde(rename = "type")]
	pub r#type: String,
	pub optional: bool,
	pub required: bool,
	pub is_pattern: bool,
	/// Formatted default literal, empty when there is none.
	pub default: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<SchemaField>,
}

impl SchemaField {
	pub fn has_children(&self) -> bool {
		!self.children.is_empty()
	}
}

/// Options controlling how a schema is walked.
#[derive(Debug, Clone)]
pub struct WalkOptions {
	/// Inline every named-type reference instead of showing its name.
	pub expand: bool,
	/// Name of the annotation carrying `hidden`, `expand` and declaration
	/// categories.
	pub annotation_tag: String,
}

impl Default for WalkOptions {
	fn default() -> Self {
		Self {
			expand: false,
			annotation_tag: DEFAULT_ANNOTATION_TAG.to_string(),
		}
	}
}

impl WalkOptions {
	pub fn new(expand: bool) -> Self {
		Self {
			expand,
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_annotation_tag(mut self, tag: impl Into<String>) -> Self {
		self.annotation_tag = tag.into();
		self
	}
}

/// Walk the fields and pattern constraints of a struct-kind value into a
/// documentation tree.
///
/// Values that cannot be iterated as a struct produce an empty tree. Use
/// [`TypeValue::error`] to tell that apart from a struct with no visible
/// fields.
pub fn walk_schema<V: TypeValue>(value: &V, options: &WalkOptions) -> Vec<SchemaField> {
	let mut walker = Walker::new(options);
	if let Some(identity) = value.reference_identity() {
		walker.expanding.push(identity);
	}
	walker.walk_fields(value)
}

/// Recursive state for a single walk. `expanding` holds the
/// [`TypeValue::reference_identity`] of every declaration currently being
/// inlined, outermost first.
pub(crate) struct Walker<'o> {
	options: &'o WalkOptions,
	expanding: Vec<String>,
}

impl<'o> Walker<'o> {
	pub(crate) fn new(options: &'o WalkOptions) -> Self {
		Self {
			options,
			expanding: Vec::new(),
		}
	}

	/// Start a walk from inside the declaration identified by `identity`.
	pub(crate) fn within(options: &'o WalkOptions, identity: String) -> Self {
		Self {
			options,
			expanding: vec![identity],
		}
	}

	fn is_hidden<V: TypeValue>(&self, value: &V) -> bool {
		value.has_annotation_argument(&self.options.annotation_tag, HIDDEN_ARGUMENT)
	}

	fn expands<V: TypeValue>(&self, value: &V) -> bool {
		self.options.expand
			|| value.has_annotation_argument(&self.options.annotation_tag, EXPAND_ARGUMENT)
	}

	pub(crate) fn walk_fields<V: TypeValue>(&mut self, value: &V) -> Vec<SchemaField> {
		let fields = match value.fields() {
			Ok(fields) => fields,
			Err(error) => {
				tracing::trace!(%error, "value is not introspectable as a struct");
				return Vec::new();
			}
		};

		let mut result = Vec::with_capacity(fields.len());
		for field in fields {
			if self.is_hidden(&field.value) {
				tracing::trace!(label = %field.label, "skipping hidden field");
				continue;
			}

			let mut schema_field = SchemaField {
				name: field.label.trim_end_matches(['?', '!']).to_string(),
				doc: field.value.doc_text(),
				optional: field.constraint == FieldConstraint::Optional,
				required: field.constraint == FieldConstraint::Required,
				..SchemaField::default()
			};
			self.populate(&mut schema_field, &field.value);
			result.push(schema_field);
		}

		if let Ok(patterns) = value.patterns() {
			for pattern in patterns {
				if self.is_hidden(&pattern.value) {
					tracing::trace!(pattern = %pattern.pattern, "skipping hidden pattern");
					continue;
				}

				let mut schema_field = SchemaField {
					name: pattern.pattern,
					doc: pattern.value.doc_text(),
					is_pattern: true,
					..SchemaField::default()
				};
				self.populate(&mut schema_field, &pattern.value);
				result.push(schema_field);
			}
		}

		result
	}

	/// Fill in `default`, `type` and `children` for a field's value.
	pub(crate) fn populate<V: TypeValue>(&mut self, field: &mut SchemaField, value: &V) {
		if let Some(default) = value.default_value() {
			field.default = default.to_string();
		}

		match value.kind() {
			Kind::Disjunction => {
				let branches = value.disjuncts();
				field.r#type = if branches.is_empty() {
					Primitive::Any.to_string()
				} else {
					format_disjunction(&branches)
				};
			}
			Kind::Struct => self.populate_struct(field, value),
			Kind::List => field.r#type = LIST_TYPE.to_string(),
			Kind::Primitive(primitive) => field.r#type = primitive.to_string(),
		}
	}

	fn populate_struct<V: TypeValue>(&mut self, field: &mut SchemaField, value: &V) {
		let Some(name) = value.reference_name() else {
			self.attach_children(field, value);
			return;
		};

		if !self.expands(value) {
			field.r#type = name;
			return;
		}

		let identity = value.reference_identity().unwrap_or_else(|| name.clone());
		if self.expanding.contains(&identity) {
			tracing::debug!(reference = %name, field = %field.name, "stopping recursive expansion");
			field.r#type = format!("{name}{RECURSIVE_SUFFIX}");
			return;
		}

		self.expanding.push(identity);
		self.attach_children(field, value);
		self.expanding.pop();
	}

	fn attach_children<V: TypeValue>(&mut self, field: &mut SchemaField, value: &V) {
		let children = self.walk_fields(value);
		if children.is_empty() {
			field.r#type = OPEN_STRUCT_TYPE.to_string();
		} else {
			field.children = children;
		}
	}
}

/// Render disjunction branches as `A | B | C`.
pub fn format_disjunction<V: TypeValue>(branches: &[V]) -> String {
	branches
		.iter()
		.map(describe_branch)
		.collect::<Vec<_>>()
		.join(" | ")
}

fn describe_branch<V: TypeValue>(branch: &V) -> String {
	if let Some(literal) = branch.literal() {
		return literal.to_string();
	}

	match branch.kind() {
		Kind::Primitive(primitive) => primitive.to_string(),
		Kind::Struct => branch
			.reference_name()
			.unwrap_or_else(|| OPEN_STRUCT_TYPE.to_string()),
		Kind::List => LIST_TYPE.to_string(),
		Kind::Disjunction => format_disjunction(&branch.disjuncts()),
	}
}
