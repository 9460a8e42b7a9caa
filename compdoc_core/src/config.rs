use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::CompdocError;
use crate::CompdocResult;
use crate::catalog::DEFAULT_CATALOG_FILE;
use crate::schema::WalkOptions;
use crate::value::DEFAULT_ANNOTATION_TAG;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["compdoc.toml", ".compdoc.toml", ".config/compdoc.toml"];

/// Configuration loaded from a `compdoc.toml` file.
///
/// ```toml
/// catalog = "catalog.yaml"
/// annotation = "compdoc"
///
/// [docs]
/// expand = false
/// format = "markdown"
///
/// [markdown]
/// page_template = "templates/page.md.j2"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CompdocConfig {
	/// Catalog file, relative to the project root.
	#[serde(default)]
	pub catalog: Option<PathBuf>,
	/// Annotation tag carrying `ref`, `ext`, `hidden` and `expand`.
	#[serde(default)]
	pub annotation: Option<String>,
	#[serde(default)]
	pub docs: DocsConfig,
	#[serde(default)]
	pub markdown: MarkdownConfig,
}

/// Defaults for `compdoc docs`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
	#[serde(default)]
	pub expand: bool,
	/// Output format name or alias. Validated when docs are generated.
	#[serde(default)]
	pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MarkdownConfig {
	/// A minijinja template rendering each markdown page, relative to the
	/// project root.
	#[serde(default)]
	pub page_template: Option<PathBuf>,
}

impl CompdocConfig {
	/// Resolve the config file path for `root` using supported candidates.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> CompdocResult<Option<CompdocConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: CompdocConfig =
			toml::from_str(&content).map_err(|e| CompdocError::ConfigParse(e.to_string()))?;

		tracing::debug!(path = %config_path.display(), "loaded config");
		Ok(Some(config))
	}

	/// The catalog path under `root`, falling back to
	/// [`DEFAULT_CATALOG_FILE`].
	pub fn catalog_path(&self, root: &Path) -> PathBuf {
		root.join(
			self.catalog
				.as_deref()
				.unwrap_or_else(|| Path::new(DEFAULT_CATALOG_FILE)),
		)
	}

	pub fn annotation_tag(&self) -> &str {
		self.annotation.as_deref().unwrap_or(DEFAULT_ANNOTATION_TAG)
	}

	/// Walk options for `expand`, using the configured annotation tag.
	pub fn walk_options(&self, expand: bool) -> WalkOptions {
		WalkOptions::new(expand).with_annotation_tag(self.annotation_tag())
	}

	/// Read the configured page template, if any.
	pub fn page_template(&self, root: &Path) -> CompdocResult<Option<String>> {
		self.markdown
			.page_template
			.as_ref()
			.map(|path| std::fs::read_to_string(root.join(path)))
			.transpose()
			.map_err(CompdocError::from)
	}
}
