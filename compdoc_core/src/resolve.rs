//! Map a human-typed reference to the component template it names.
//!
//! Resolution is an ordered cascade where the first rule yielding exactly one
//! match wins:
//!
//! 1. Fully qualified `import/path:#Definition` (also `path@version:#Def`),
//!    exact and final.
//! 2. Definition name, sigil stripped, case-insensitive.
//! 3. Package shorthand, case-insensitive.
//! 4. Dotted `package.Definition`, case-insensitive, first hit wins.
//!
//! When nothing resolves, ambiguity from rule 2 is reported before ambiguity
//! from rule 3, and a reference matching nothing lists every template.

use crate::CompdocError;
use crate::CompdocResult;
use crate::template::ComponentTemplate;
use crate::template::DEFINITION_SIGIL;
use crate::template::QUALIFIED_SEPARATOR;

/// Resolve `reference` to exactly one template.
pub fn resolve_reference<'t, V>(
	reference: &str,
	templates: &'t [ComponentTemplate<V>],
) -> CompdocResult<&'t ComponentTemplate<V>> {
	if templates.is_empty() {
		return Err(CompdocError::NoTemplates);
	}

	if let Some((package, definition)) = reference.split_once(QUALIFIED_SEPARATOR) {
		let name = format!("{DEFINITION_SIGIL}{definition}");
		let found = templates
			.iter()
			.find(|template| template.package == package && template.name == name)
			.or_else(|| {
				templates.iter().find(|template| {
					format!("{}@{}", template.package, template.version) == package
						&& template.name == name
				})
			});

		return match found {
			Some(template) => {
				tracing::debug!(reference, "resolved fully qualified reference");
				Ok(template)
			}
			None => Err(not_found(reference, templates)),
		};
	}

	let definition_matches: Vec<_> = templates
		.iter()
		.filter(|template| equal_fold(template.definition_name(), reference))
		.collect();
	if let [template] = definition_matches.as_slice() {
		tracing::debug!(reference, "resolved by definition name");
		return Ok(*template);
	}

	let package_matches: Vec<_> = templates
		.iter()
		.filter(|template| equal_fold(template.shorthand(), reference))
		.collect();
	if let [template] = package_matches.as_slice() {
		tracing::debug!(reference, "resolved by package shorthand");
		return Ok(*template);
	}

	if let Some((package, definition)) = reference.rsplit_once('.') {
		let found = templates.iter().find(|template| {
			equal_fold(template.shorthand(), package)
				&& equal_fold(template.definition_name(), definition)
		});
		if let Some(template) = found {
			tracing::debug!(reference, "resolved dotted reference");
			return Ok(template);
		}
	}

	if definition_matches.len() > 1 {
		return Err(ambiguous(reference, &definition_matches));
	}
	if package_matches.len() > 1 {
		return Err(ambiguous(reference, &package_matches));
	}

	Err(not_found(reference, templates))
}

/// Select every template in or below the package path `reference`.
///
/// A template matches when its package equals the reference, lies under it
/// (`reference/...`), or equals it once its version is appended
/// (`package@version`). The result keeps discovery order.
pub fn resolve_package_path<'t, V>(
	reference: &str,
	templates: &'t [ComponentTemplate<V>],
) -> Vec<&'t ComponentTemplate<V>> {
	let prefix = format!("{}/", reference.trim_end_matches('/'));
	templates
		.iter()
		.filter(|template| {
			template.package == reference
				|| template.package.starts_with(&prefix)
				|| (!template.version.is_empty()
					&& format!("{}@{}", template.package, template.version) == reference)
		})
		.collect()
}

/// Resolve a reference to the templates it names.
///
/// References containing `/` but not `:#` are package paths and may select
/// several templates; everything else names exactly one.
pub fn resolve_targets<'t, V>(
	reference: &str,
	templates: &'t [ComponentTemplate<V>],
) -> CompdocResult<Vec<&'t ComponentTemplate<V>>> {
	if reference.contains('/') && !reference.contains(QUALIFIED_SEPARATOR) {
		let matches = resolve_package_path(reference, templates);
		if !matches.is_empty() {
			tracing::debug!(reference, count = matches.len(), "resolved package path");
			return Ok(matches);
		}
	}

	resolve_reference(reference, templates).map(|template| vec![template])
}

fn ambiguous<V>(reference: &str, matches: &[&ComponentTemplate<V>]) -> CompdocError {
	let candidates = matches
		.iter()
		.map(|template| format!("{} ({})", template.display_name(), template.package))
		.collect::<Vec<_>>()
		.join("\n  ");

	CompdocError::AmbiguousReference {
		reference: reference.to_string(),
		candidates,
	}
}

fn not_found<V>(reference: &str, templates: &[ComponentTemplate<V>]) -> CompdocError {
	let available = templates
		.iter()
		.map(ComponentTemplate::display_name)
		.collect::<Vec<_>>()
		.join(", ");

	CompdocError::TemplateNotFound {
		reference: reference.to_string(),
		available,
	}
}

/// Case-insensitive comparison that also folds non-ASCII identifiers.
fn equal_fold(left: &str, right: &str) -> bool {
	left.eq_ignore_ascii_case(right) || left.to_lowercase() == right.to_lowercase()
}
