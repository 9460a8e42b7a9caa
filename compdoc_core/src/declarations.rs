use std::fmt;
use std::fmt::Display;

use serde::Serialize;

use crate::schema::SchemaField;
use crate::schema::WalkOptions;
use crate::schema::Walker;
use crate::value::EXTENSION_ARGUMENT;
use crate::value::HIDDEN_ARGUMENT;
use crate::value::REFERENCE_ARGUMENT;
use crate::value::TypeValue;

/// Declarations whose name starts with this prefix are implementation
/// details of their package.
pub const PRIVATE_PREFIX: char = '_';

/// Display category of an annotated declaration. The variant order is the
/// display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationCategory {
	Reference,
	Extension,
	Other,
}

impl DeclarationCategory {
	pub const DISPLAY_ORDER: [Self; 3] = [Self::Reference, Self::Extension, Self::Other];

	/// Map the first annotation argument to a category. Unknown and missing
	/// arguments fall back to [`DeclarationCategory::Other`].
	pub fn from_argument(argument: Option<&str>) -> Self {
		match argument {
			Some(REFERENCE_ARGUMENT) => Self::Reference,
			Some(EXTENSION_ARGUMENT) => Self::Extension,
			_ => Self::Other,
		}
	}

	/// Section title used by the formatters.
	pub fn title(self) -> &'static str {
		match self {
			Self::Reference => "References",
			Self::Extension => "Extensions",
			Self::Other => "Other",
		}
	}
}

impl Display for DeclarationCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Reference => f.write_str("ref"),
			Self::Extension => f.write_str("ext"),
			Self::Other => f.write_str("other"),
		}
	}
}

/// A root-level named type exposed for documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
	pub name: String,
	pub doc: String,
	pub category: DeclarationCategory,
	#[serde(rename = "type")]
	pub r#type: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<SchemaField>,
}

/// Declarations of one category, in scan order.
#[derive(Debug, Clone)]
pub struct DeclarationGroup<'a> {
	pub category: DeclarationCategory,
	pub declarations: Vec<&'a Declaration>,
}

/// Collect the annotated named-type declarations of `value`.
///
/// Only declarations carrying the annotation configured in `options` are
/// returned. The result is ordered by [`DeclarationCategory::DISPLAY_ORDER`]
/// and keeps source order within each category.
pub fn scan_declarations<V: TypeValue>(value: &V, options: &WalkOptions) -> Vec<Declaration> {
	let definitions = match value.definitions() {
		Ok(definitions) => definitions,
		Err(error) => {
			tracing::trace!(%error, "value has no iterable declarations");
			return Vec::new();
		}
	};

	let tag = options.annotation_tag.as_str();
	let mut declarations = Vec::new();

	for definition in definitions {
		let name = definition.label;
		let Some(arguments) = definition.value.annotation(tag) else {
			if name.starts_with(PRIVATE_PREFIX) {
				tracing::trace!(%name, "skipping private declaration");
			} else {
				tracing::trace!(%name, tag, "skipping declaration without annotation");
			}
			continue;
		};

		let first = arguments.first().map(String::as_str);
		if first == Some(HIDDEN_ARGUMENT) {
			tracing::trace!(%name, "skipping hidden declaration");
			continue;
		}

		let mut body = SchemaField {
			name: name.clone(),
			..SchemaField::default()
		};
		let identity = definition
			.value
			.declaration_identity()
			.unwrap_or_else(|| name.clone());
		Walker::within(options, identity).populate(&mut body, &definition.value);

		declarations.push(Declaration {
			doc: definition.value.doc_text(),
			category: DeclarationCategory::from_argument(first),
			r#type: body.r#type,
			children: body.children,
			name,
		});
	}

	declarations.sort_by_key(|declaration| declaration.category);
	declarations
}

/// Group declarations by category in display order. Categories without
/// members are omitted.
pub fn group_declarations(declarations: &[Declaration]) -> Vec<DeclarationGroup<'_>> {
	DeclarationCategory::DISPLAY_ORDER
		.into_iter()
		.filter_map(|category| {
			let members: Vec<_> = declarations
				.iter()
				.filter(|declaration| declaration.category == category)
				.collect();

			(!members.is_empty()).then_some(DeclarationGroup {
				category,
				declarations: members,
			})
		})
		.collect()
}
