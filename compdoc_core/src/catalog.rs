//! A serde-loadable stand-in for an evaluated bundle.
//!
//! The configuration language's evaluator is an external collaborator, so
//! compdoc reads an already-evaluated *catalog* document instead. A catalog
//! lists packages, each package lists its root-level definitions, and every
//! definition carries a [`SchemaNode`] describing its type. [`CatalogValue`]
//! exposes that tree through [`TypeValue`].
//!
//! ```yaml
//! name: shop
//! module: example.com/shop
//! packages:
//!   - path: example.com/apps/web
//!     module: example.com/apps
//!     version: v1.2.0
//!     definitions:
//!       - name: "#Web"
//!         doc: A public web service.
//!         value:
//!           fields:
//!             - name: apiVersion
//!               value: { value: apps/v1 }
//!             - name: kind
//!               value: { value: Web }
//!             - name: config
//!               value:
//!                 fields:
//!                   - name: port
//!                     value: { kind: int, default: 8080 }
//! ```
//!
//! References are written as `ref: "#Name"`, resolved lexically through the
//! enclosing `definitions` and then the package root, or as
//! `ref: "import/path:#Name"` across packages. A reference node that also
//! lists `fields` unifies them with the referenced struct.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use derive_more::Deref;
use serde::Deserialize;
use serde::Serialize;

use crate::CompdocError;
use crate::CompdocResult;
use crate::template::ComponentTemplate;
use crate::template::DEFINITION_SIGIL;
use crate::value::Field;
use crate::value::FieldConstraint;
use crate::value::Kind;
use crate::value::Literal;
use crate::value::Pattern;
use crate::value::Primitive;
use crate::value::TypeValue;
use crate::value::ValueError;

/// Default catalog file name, relative to the project root.
pub const DEFAULT_CATALOG_FILE: &str = "compdoc.catalog.json";

/// Aliases followed before a reference chain is reported as cyclic.
const MAX_REFERENCE_HOPS: u8 = 32;

/// Separator between an import path and a definition inside a `ref`.
const PACKAGE_SEPARATOR: char = ':';

/// An evaluated bundle: its packages and, optionally, its values schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Catalog {
	/// Bundle name, used in headers and diagnostics.
	pub name: String,
	#[serde(default)]
	pub module: String,
	#[serde(default)]
	pub packages: Vec<Package>,
	/// Schema of the values a bundle consumer supplies.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub values: Option<SchemaNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Package {
	/// Import path.
	pub path: String,
	#[serde(default)]
	pub module: String,
	/// Module version, empty for the bundle's own module.
	#[serde(default)]
	pub version: String,
	#[serde(default)]
	pub definitions: Vec<Definition>,
}

/// A named-type declaration, `#Name: { ... }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Definition {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub doc: Option<String>,
	#[serde(default, skip_serializing_if = "Attributes::is_empty")]
	pub attributes: Attributes,
	#[serde(default)]
	pub value: SchemaNode,
}

/// A struct field, `name: value`, `name?: value` or `name!: value`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FieldSpec {
	pub name: String,
	#[serde(default)]
	pub constraint: FieldConstraint,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub doc: Option<String>,
	#[serde(default, skip_serializing_if = "Attributes::is_empty")]
	pub attributes: Attributes,
	#[serde(default)]
	pub value: SchemaNode,
}

/// A pattern constraint, `[string]: value`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PatternSpec {
	/// Display form of the label pattern, e.g. `[Name=string]`.
	pub pattern: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub doc: Option<String>,
	#[serde(default, skip_serializing_if = "Attributes::is_empty")]
	pub attributes: Attributes,
	#[serde(default)]
	pub value: SchemaNode,
}

/// Annotations keyed by tag, each with its positional arguments in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Vec<String>>);

impl Attributes {
	/// Attributes carrying a single tag.
	pub fn tagged<I, S>(tag: impl Into<String>, arguments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut attributes = BTreeMap::new();
		attributes.insert(tag.into(), arguments.into_iter().map(Into::into).collect());
		Self(attributes)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// The declared kind of a [`SchemaNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	String,
	Bool,
	Int,
	Float,
	Number,
	Bytes,
	Null,
	Any,
	Struct,
	List,
	Disjunction,
}

impl From<NodeKind> for Kind {
	fn from(kind: NodeKind) -> Self {
		match kind {
			NodeKind::String => Self::Primitive(Primitive::String),
			NodeKind::Bool => Self::Primitive(Primitive::Bool),
			NodeKind::Int => Self::Primitive(Primitive::Int),
			NodeKind::Float => Self::Primitive(Primitive::Float),
			NodeKind::Number => Self::Primitive(Primitive::Number),
			NodeKind::Bytes => Self::Primitive(Primitive::Bytes),
			NodeKind::Null => Self::Primitive(Primitive::Null),
			NodeKind::Any => Self::Primitive(Primitive::Any),
			NodeKind::Struct => Self::Struct,
			NodeKind::List => Self::List,
			NodeKind::Disjunction => Self::Disjunction,
		}
	}
}

/// One node of an evaluated type.
///
/// `kind` may be omitted, in which case it is inferred from the node's
/// shape: a `ref` takes its target's kind, a concrete `value` its literal's
/// kind, nodes with fields, patterns or definitions are structs, nodes with
/// branches are disjunctions and nodes with an `element` are lists.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SchemaNode {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<NodeKind>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub doc: Option<String>,
	#[serde(default, skip_serializing_if = "Attributes::is_empty")]
	pub attributes: Attributes,
	/// The concrete value, when the node is fully evaluated.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<Literal>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default: Option<Literal>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub fields: Vec<FieldSpec>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub patterns: Vec<PatternSpec>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub definitions: Vec<Definition>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub branches: Vec<SchemaNode>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub element: Option<Box<SchemaNode>>,
	#[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
	pub reference: Option<String>,
}

impl SchemaNode {
	fn is_structural(&self) -> bool {
		!self.fields.is_empty() || !self.patterns.is_empty() || !self.definitions.is_empty()
	}

	/// The kind implied by the node alone, without following `ref`.
	fn shape_kind(&self) -> Option<Kind> {
		if let Some(kind) = self.kind {
			return Some(kind.into());
		}
		if let Some(value) = &self.value {
			return Some(Kind::Primitive(value.primitive()));
		}
		if self.is_structural() {
			return Some(Kind::Struct);
		}
		if !self.branches.is_empty() {
			return Some(Kind::Disjunction);
		}
		if self.element.is_some() {
			return Some(Kind::List);
		}
		if self.reference.is_some() {
			return None;
		}
		if let Some(default) = &self.default {
			return Some(Kind::Primitive(default.primitive()));
		}

		Some(Kind::Primitive(Primitive::Any))
	}
}

/// Serialization formats a catalog can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
	Json,
	Toml,
	Yaml,
}

impl CatalogFormat {
	/// Pick the format from a file extension.
	pub fn from_path(path: &Path) -> CompdocResult<Self> {
		let extension = path
			.extension()
			.and_then(|extension| extension.to_str())
			.unwrap_or_default()
			.to_ascii_lowercase();

		match extension.as_str() {
			"json" => Ok(Self::Json),
			"toml" => Ok(Self::Toml),
			"yaml" | "yml" => Ok(Self::Yaml),
			_ => Err(CompdocError::UnsupportedCatalogFormat(
				path.display().to_string(),
			)),
		}
	}
}

impl Catalog {
	/// Read and parse the catalog at `path`.
	pub fn load(path: &Path) -> CompdocResult<Self> {
		let format = CatalogFormat::from_path(path)?;
		let content = fs::read_to_string(path)?;
		let catalog = Self::parse(&content, format).map_err(|reason| {
			CompdocError::CatalogParse {
				path: path.display().to_string(),
				reason,
			}
		})?;

		tracing::debug!(
			path = %path.display(),
			packages = catalog.packages.len(),
			"loaded catalog"
		);

		Ok(catalog)
	}

	/// Parse catalog text. The error is the parser's message.
	pub fn parse(content: &str, format: CatalogFormat) -> Result<Self, String> {
		match format {
			CatalogFormat::Json => serde_json::from_str(content).map_err(|error| error.to_string()),
			CatalogFormat::Toml => toml::from_str(content).map_err(|error| error.to_string()),
			CatalogFormat::Yaml => {
				serde_yaml_ng::from_str(content).map_err(|error| error.to_string())
			}
		}
	}

	/// Every documentable component template, in package order then
	/// definition order.
	///
	/// A template is a public root definition (`#Name`, not `_#Name`) whose
	/// body has concrete string `apiVersion` and `kind` fields.
	pub fn component_templates(&self) -> Vec<ComponentTemplate<CatalogValue<'_>>> {
		let mut templates = Vec::new();

		for package in &self.packages {
			for definition in &package.definitions {
				if !definition.name.starts_with(DEFINITION_SIGIL) {
					tracing::debug!(
						package = %package.path,
						name = %definition.name,
						"skipping non-public definition"
					);
					continue;
				}

				let template = ComponentTemplate {
					package: package.path.clone(),
					name: definition.name.clone(),
					module: package.module.clone(),
					version: package.version.clone(),
					value: CatalogValue::definition(self, vec![Frame::package(package)], definition),
				};

				if template.api_version().is_none() || template.kind().is_none() {
					tracing::debug!(
						package = %package.path,
						name = %definition.name,
						"skipping definition without concrete apiVersion and kind"
					);
					continue;
				}

				templates.push(template);
			}
		}

		tracing::debug!(count = templates.len(), "discovered component templates");
		templates
	}

	/// The bundle's values schema, if the catalog declares one.
	pub fn values(&self) -> Option<CatalogValue<'_>> {
		self.values.as_ref().map(|node| CatalogValue {
			catalog: self,
			scope: Vec::new(),
			node,
			location: format!("{}{PACKAGE_SEPARATOR}values", self.module),
			declaration: false,
			doc: None,
			attributes: None,
			hops: 0,
		})
	}

	/// A root definition of the package at `package`, by name.
	pub fn lookup_definition(&self, package: &str, name: &str) -> Option<CatalogValue<'_>> {
		let package = self.package(package)?;
		let definition = find_definition(&package.definitions, name)?;

		Some(CatalogValue::definition(
			self,
			vec![Frame::package(package)],
			definition,
		))
	}

	fn package(&self, path: &str) -> Option<&Package> {
		self.packages.iter().find(|package| {
			package.path == path
				|| (!package.version.is_empty()
					&& format!("{}@{}", package.path, package.version) == path)
		})
	}
}

/// Definitions visible from a node, with the location prefix their members
/// are addressed by.
#[derive(Debug, Clone)]
struct Frame<'a> {
	prefix: String,
	definitions: &'a [Definition],
}

impl<'a> Frame<'a> {
	fn package(package: &'a Package) -> Self {
		Self {
			prefix: format!("{}{PACKAGE_SEPARATOR}", package.path),
			definitions: package.definitions.as_slice(),
		}
	}
}

/// A node of a [`Catalog`] seen through [`TypeValue`].
///
/// Carries the lexical scope the node was reached through so that `#Name`
/// references resolve the way they would in source.
#[derive(Debug, Clone)]
pub struct CatalogValue<'a> {
	catalog: &'a Catalog,
	/// Definition lists visible from this node, outermost first. The node's
	/// own definitions are not included.
	scope: Vec<Frame<'a>>,
	node: &'a SchemaNode,
	/// Where the node sits in the catalog, `pkg:#Web.config.probe`.
	location: String,
	/// Whether the node is the body of a named declaration.
	declaration: bool,
	/// Doc and attributes written on the field or definition holding the node.
	doc: Option<&'a str>,
	attributes: Option<&'a Attributes>,
	/// Reference hops taken to reach this node.
	hops: u8,
}

impl<'a> CatalogValue<'a> {
	/// The body of `definition`, a member of the innermost frame of `scope`.
	fn definition(
		catalog: &'a Catalog,
		scope: Vec<Frame<'a>>,
		definition: &'a Definition,
	) -> Self {
		let prefix = scope.last().map_or("", |frame| frame.prefix.as_str());
		let location = format!("{prefix}{}", definition.name);

		Self {
			catalog,
			scope,
			node: &definition.value,
			location,
			declaration: true,
			doc: definition.doc.as_deref(),
			attributes: Some(&definition.attributes),
			hops: 0,
		}
	}

	fn child_scope(&self) -> Vec<Frame<'a>> {
		let mut scope = self.scope.clone();
		if !self.node.definitions.is_empty() {
			scope.push(Frame {
				prefix: format!("{}.", self.location),
				definitions: self.node.definitions.as_slice(),
			});
		}
		scope
	}

	fn child(
		&self,
		label: &str,
		node: &'a SchemaNode,
		doc: Option<&'a str>,
		attributes: Option<&'a Attributes>,
	) -> Self {
		Self {
			catalog: self.catalog,
			scope: self.child_scope(),
			node,
			location: format!("{}.{label}", self.location),
			declaration: false,
			doc,
			attributes,
			hops: 0,
		}
	}

	/// The definition this node refers to, one hop away. `None` when the
	/// node is not a reference.
	fn target(&self) -> Result<Option<Self>, ValueError> {
		let Some(reference) = self.node.reference.as_deref() else {
			return Ok(None);
		};

		if self.hops >= MAX_REFERENCE_HOPS {
			return Err(ValueError::Evaluation(format!(
				"reference chain through `{reference}` does not terminate"
			)));
		}

		let mut target = match reference.rsplit_once(PACKAGE_SEPARATOR) {
			Some((path, name)) => {
				let package = self
					.catalog
					.package(path)
					.ok_or_else(|| ValueError::UnresolvedReference(reference.to_string()))?;
				let definition = find_definition(&package.definitions, name)
					.ok_or_else(|| ValueError::UnresolvedReference(reference.to_string()))?;
				Self::definition(self.catalog, vec![Frame::package(package)], definition)
			}
			None => self.resolve_lexical(reference)?,
		};

		target.hops = self.hops + 1;
		Ok(Some(target))
	}

	fn resolve_lexical(&self, name: &str) -> Result<Self, ValueError> {
		let visible = self.child_scope();

		for (depth, frame) in visible.iter().enumerate().rev() {
			if let Some(definition) = find_definition(frame.definitions, name) {
				return Ok(Self::definition(
					self.catalog,
					visible[..=depth].to_vec(),
					definition,
				));
			}
		}

		Err(ValueError::UnresolvedReference(name.to_string()))
	}

	fn entry_attributes(&self) -> impl Iterator<Item = &'a Attributes> {
		self.attributes.into_iter().chain([&self.node.attributes])
	}
}

fn find_definition<'d>(definitions: &'d [Definition], name: &str) -> Option<&'d Definition> {
	definitions.iter().find(|definition| definition.name == name)
}

impl TypeValue for CatalogValue<'_> {
	fn fields(&self) -> Result<Vec<Field<Self>>, ValueError> {
		let mut fields = match self.target()? {
			Some(target) => target.fields()?,
			None => {
				let kind = self.kind();
				if kind != Kind::Struct {
					return Err(ValueError::NotAStruct(kind.to_string()));
				}
				Vec::new()
			}
		};

		for spec in &self.node.fields {
			let field = Field {
				label: spec.name.clone(),
				constraint: spec.constraint,
				value: self.child(
					&spec.name,
					&spec.value,
					spec.doc.as_deref(),
					Some(&spec.attributes),
				),
			};

			match fields.iter_mut().find(|existing| existing.label == spec.name) {
				Some(existing) => *existing = field,
				None => fields.push(field),
			}
		}

		Ok(fields)
	}

	fn patterns(&self) -> Result<Vec<Pattern<Self>>, ValueError> {
		let mut patterns = match self.target()? {
			Some(target) => target.patterns()?,
			None => Vec::new(),
		};

		patterns.extend(self.node.patterns.iter().map(|spec| {
			Pattern {
				pattern: spec.pattern.clone(),
				value: self.child(
					&spec.pattern,
					&spec.value,
					spec.doc.as_deref(),
					Some(&spec.attributes),
				),
			}
		}));

		Ok(patterns)
	}

	fn definitions(&self) -> Result<Vec<Field<Self>>, ValueError> {
		let mut definitions = match self.target()? {
			Some(target) => target.definitions()?,
			None => Vec::new(),
		};

		definitions.extend(self.node.definitions.iter().map(|definition| {
			let mut value = self.child(
				&definition.name,
				&definition.value,
				definition.doc.as_deref(),
				Some(&definition.attributes),
			);
			value.declaration = true;

			Field {
				label: definition.name.clone(),
				constraint: FieldConstraint::Regular,
				value,
			}
		}));

		Ok(definitions)
	}

	fn doc(&self) -> Vec<String> {
		self.doc
			.into_iter()
			.chain(self.node.doc.as_deref())
			.map(ToString::to_string)
			.collect()
	}

	fn default_value(&self) -> Option<Literal> {
		self.node.default.clone().or_else(|| {
			self.target()
				.ok()
				.flatten()
				.and_then(|target| target.default_value())
		})
	}

	fn literal(&self) -> Option<Literal> {
		if let Some(value) = &self.node.value {
			return Some(value.clone());
		}
		if self.node.kind == Some(NodeKind::Null) {
			return Some(Literal::Null);
		}

		self.target()
			.ok()
			.flatten()
			.and_then(|target| target.literal())
	}

	fn kind(&self) -> Kind {
		if let Some(kind) = self.node.shape_kind() {
			return kind;
		}

		match self.target() {
			Ok(Some(target)) => target.kind(),
			Ok(None) | Err(_) => Kind::Struct,
		}
	}

	fn disjuncts(&self) -> Vec<Self> {
		if !self.node.branches.is_empty() {
			return self
				.node
				.branches
				.iter()
				.enumerate()
				.map(|(index, branch)| self.child(&format!("|{index}"), branch, None, None))
				.collect();
		}

		match self.target() {
			Ok(Some(target)) if self.node.kind.is_none() => target.disjuncts(),
			_ => Vec::new(),
		}
	}

	fn annotation(&self, tag: &str) -> Option<Vec<String>> {
		let mut found: Option<Vec<String>> = None;

		for attributes in self.entry_attributes() {
			if let Some(arguments) = attributes.get(tag) {
				found.get_or_insert_with(Vec::new).extend(arguments.iter().cloned());
			}
		}

		found
	}

	fn reference_name(&self) -> Option<String> {
		let reference = self.node.reference.as_deref()?;
		let name = reference
			.rsplit_once(PACKAGE_SEPARATOR)
			.map_or(reference, |(_, name)| name);

		Some(name.to_string())
	}

	fn reference_identity(&self) -> Option<String> {
		match self.target() {
			Ok(Some(target)) => Some(target.location),
			Ok(None) => None,
			Err(_) => self.reference_name(),
		}
	}

	fn declaration_identity(&self) -> Option<String> {
		self.declaration.then(|| self.location.clone())
	}

	fn lookup(&self, label: &str) -> Option<Self> {
		self.fields()
			.ok()?
			.into_iter()
			.find(|field| field.label.trim_end_matches(['?', '!']) == label)
			.map(|field| field.value)
	}

	fn error(&self) -> Option<ValueError> {
		self.target().err()
	}
}
