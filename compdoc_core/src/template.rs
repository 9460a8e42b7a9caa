use serde::Serialize;

use crate::declarations::Declaration;
use crate::declarations::scan_declarations;
use crate::schema::SchemaField;
use crate::schema::WalkOptions;
use crate::schema::walk_schema;
use crate::value::TypeValue;

/// Sigil that marks a definition name.
pub const DEFINITION_SIGIL: char = '#';
/// Separator between an import path and a definition in a fully qualified
/// reference, e.g. `example.com/apps/web:#Deployment`.
pub const QUALIFIED_SEPARATOR: &str = ":#";

/// One documentable component template found by discovery.
#[derive(Debug, Clone)]
pub struct ComponentTemplate<V> {
	/// Import path of the package declaring the template.
	pub package: String,
	/// Definition identifier, including its sigil (`#Deployment`).
	pub name: String,
	/// Path of the module owning the package.
	pub module: String,
	/// Version of the owning module. Empty for the bundle's own module.
	pub version: String,
	pub value: V,
}

impl<V> ComponentTemplate<V> {
	/// Last import-path segment with any `@version` suffix removed.
	pub fn shorthand(&self) -> &str {
		shorthand_name(&self.package)
	}

	/// Definition name without its sigil.
	pub fn definition_name(&self) -> &str {
		self.name
			.strip_prefix(DEFINITION_SIGIL)
			.unwrap_or(&self.name)
	}

	/// `shorthand.Definition`, the form listed in diagnostics.
	pub fn display_name(&self) -> String {
		format!("{}.{}", self.shorthand(), self.definition_name())
	}

	/// The serializable identity of this template, without its value.
	pub fn summary(&self) -> TemplateSummary {
		TemplateSummary {
			package: self.package.clone(),
			name: self.name.clone(),
			module: self.module.clone(),
			version: self.version.clone(),
		}
	}
}

impl<V: TypeValue> ComponentTemplate<V> {
	/// The documentation tree of the template's `config` section. Empty when
	/// the template has no config.
	pub fn config_schema(&self, options: &WalkOptions) -> Vec<SchemaField> {
		self.value
			.lookup("config")
			.map(|config| walk_schema(&config, options))
			.unwrap_or_default()
	}

	/// Annotated declarations inside the template.
	pub fn declarations(&self, options: &WalkOptions) -> Vec<Declaration> {
		scan_declarations(&self.value, options)
	}

	pub fn doc(&self) -> String {
		self.value.doc_text()
	}

	pub fn api_version(&self) -> Option<String> {
		self.concrete_string("apiVersion")
	}

	pub fn kind(&self) -> Option<String> {
		self.concrete_string("kind")
	}

	fn concrete_string(&self, label: &str) -> Option<String> {
		self.value
			.lookup(label)
			.and_then(|value| value.literal())
			.and_then(|literal| literal.as_str().map(ToString::to_string))
	}
}

/// A template's identity as printed by `compdoc components --format json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
	pub package: String,
	pub name: String,
	pub module: String,
	pub version: String,
}

/// Extract the last path segment from a package import path, stripping any
/// `@vN` version suffix.
pub fn shorthand_name(package: &str) -> &str {
	let package = package
		.rfind('@')
		.map_or(package, |index| &package[..index]);

	package
		.rfind('/')
		.map_or(package, |index| &package[index + 1..])
}
