//! Whole documentation pages: one per component template, plus the bundle
//! values page.

use std::io;
use std::io::Write;

use serde::Serialize;

use crate::CompdocError;
use crate::CompdocResult;
use crate::declarations::Declaration;
use crate::format::TextStyle;
use crate::format::write_declarations_markdown;
use crate::format::write_declarations_text;
use crate::format::write_schema_markdown;
use crate::format::write_schema_text;
use crate::schema::SchemaField;
use crate::schema::WalkOptions;
use crate::schema::walk_schema;
use crate::template::ComponentTemplate;
use crate::value::TypeValue;

/// Rule printed between text pages.
pub const TEXT_PAGE_SEPARATOR: &str = "===================================";
/// Thematic break printed between markdown pages.
pub const MARKDOWN_PAGE_SEPARATOR: &str = "---";
/// Width of the `apiVersion:` / `kind:` label column in text pages.
const LABEL_COLUMN: usize = 14;
const PAGE_TEMPLATE_NAME: &str = "__page__";

/// Everything rendered for one component template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplatePage {
	pub package: String,
	/// Definition identifier with its sigil, `#Web`.
	pub name: String,
	/// Definition name without its sigil, `Web`.
	pub definition: String,
	pub shorthand: String,
	pub module: String,
	pub version: String,
	pub doc: String,
	pub api_version: Option<String>,
	pub kind: Option<String>,
	pub config: Vec<SchemaField>,
	pub declarations: Vec<Declaration>,
}

impl TemplatePage {
	/// Walk `template` once and keep the resulting trees.
	pub fn from_template<V: TypeValue>(
		template: &ComponentTemplate<V>,
		options: &WalkOptions,
	) -> Self {
		Self {
			package: template.package.clone(),
			name: template.name.clone(),
			definition: template.definition_name().to_string(),
			shorthand: template.shorthand().to_string(),
			module: template.module.clone(),
			version: template.version.clone(),
			doc: template.doc(),
			api_version: template.api_version(),
			kind: template.kind(),
			config: template.config_schema(options),
			declarations: template.declarations(options),
		}
	}

	/// File name used by the directory formats, `Web.md`.
	pub fn file_name(&self) -> String {
		format!("{}.md", self.definition)
	}

	pub fn write_text<W: Write + ?Sized>(&self, w: &mut W, style: TextStyle) -> io::Result<()> {
		writeln!(
			w,
			"{} {}",
			style.header(&self.package),
			style.header(&self.name)
		)?;
		writeln!(w)?;

		if !self.doc.is_empty() {
			for line in self.doc.lines() {
				writeln!(w, "{}", style.emphasis(line))?;
			}
			writeln!(w)?;
		}

		for (label, value) in self.concrete_fields() {
			let label = format!("{label}:");
			let padding = LABEL_COLUMN.saturating_sub(label.len()).max(1);
			writeln!(
				w,
				"{}{}{}",
				style.label(&label),
				" ".repeat(padding),
				style.value(&format!("{value:?}"))
			)?;
		}

		if !self.config.is_empty() {
			writeln!(w)?;
			writeln!(w, "{}", style.header("Config:"))?;
			write_schema_text(w, &self.config, 2, style)?;
		}

		if !self.declarations.is_empty() {
			writeln!(w)?;
			write_declarations_text(w, &self.declarations, 0, style)?;
		}

		Ok(())
	}

	pub fn write_markdown<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
		writeln!(w, "# {} {}", self.package, self.name)?;
		writeln!(w)?;

		if !self.doc.is_empty() {
			for line in self.doc.lines() {
				writeln!(w, "> {line}")?;
			}
			writeln!(w)?;
		}

		let concrete = self.concrete_fields();
		if !concrete.is_empty() {
			writeln!(w, "| Field | Value |")?;
			writeln!(w, "|-------|-------|")?;
			for (label, value) in concrete {
				writeln!(w, "| {label} | `{value}` |")?;
			}
			writeln!(w)?;
		}

		if !self.config.is_empty() {
			writeln!(w, "## Config")?;
			writeln!(w)?;
			write_schema_markdown(w, &self.config, 0)?;
		}

		if !self.declarations.is_empty() {
			if !self.config.is_empty() {
				writeln!(w)?;
			}
			write_declarations_markdown(w, &self.declarations, 2)?;
		}

		Ok(())
	}

	/// Render the page as markdown, through `page_template` when one is
	/// configured.
	pub fn render_markdown(&self, page_template: Option<&str>) -> CompdocResult<String> {
		let Some(source) = page_template else {
			let mut buffer = Vec::new();
			self.write_markdown(&mut buffer)?;
			return Ok(String::from_utf8_lossy(&buffer).into_owned());
		};

		let mut env = minijinja::Environment::new();
		env.set_keep_trailing_newline(true);
		env.add_template(PAGE_TEMPLATE_NAME, source)
			.map_err(|e| CompdocError::TemplateRender(e.to_string()))?;

		let template = env
			.get_template(PAGE_TEMPLATE_NAME)
			.map_err(|e| CompdocError::TemplateRender(e.to_string()))?;

		let context = PageContext::from_page(self)?;
		template
			.render(minijinja::Value::from_serialize(&context))
			.map_err(|e| CompdocError::TemplateRender(e.to_string()))
	}

	fn concrete_fields(&self) -> Vec<(&'static str, &str)> {
		[
			("apiVersion", self.api_version.as_deref()),
			("kind", self.kind.as_deref()),
		]
		.into_iter()
		.filter_map(|(label, value)| value.map(|value| (label, value)))
		.collect()
	}
}

/// Variables available to a custom page template.
#[derive(Debug, Serialize)]
struct PageContext<'p> {
	package: &'p str,
	name: &'p str,
	definition: &'p str,
	shorthand: &'p str,
	module: &'p str,
	version: &'p str,
	doc: &'p str,
	api_version: Option<&'p str>,
	kind: Option<&'p str>,
	/// The config section rendered as a markdown list.
	config: String,
	/// Declaration sections rendered as markdown.
	declarations: String,
}

impl<'p> PageContext<'p> {
	fn from_page(page: &'p TemplatePage) -> io::Result<Self> {
		let mut config = Vec::new();
		write_schema_markdown(&mut config, &page.config, 0)?;

		let mut declarations = Vec::new();
		write_declarations_markdown(&mut declarations, &page.declarations, 2)?;

		Ok(Self {
			package: &page.package,
			name: &page.name,
			definition: &page.definition,
			shorthand: &page.shorthand,
			module: &page.module,
			version: &page.version,
			doc: &page.doc,
			api_version: page.api_version.as_deref(),
			kind: page.kind.as_deref(),
			config: String::from_utf8_lossy(&config).into_owned(),
			declarations: String::from_utf8_lossy(&declarations).into_owned(),
		})
	}
}

/// Write `pages` as one text stream, separated by [`TEXT_PAGE_SEPARATOR`].
pub fn write_text_pages<W: Write + ?Sized>(
	w: &mut W,
	pages: &[TemplatePage],
	style: TextStyle,
) -> io::Result<()> {
	for (index, page) in pages.iter().enumerate() {
		if index > 0 {
			writeln!(w)?;
			writeln!(w, "{TEXT_PAGE_SEPARATOR}")?;
			writeln!(w)?;
		}
		page.write_text(w, style)?;
	}

	Ok(())
}

/// Write `pages` as one markdown stream, separated by
/// [`MARKDOWN_PAGE_SEPARATOR`].
pub fn write_markdown_pages<W: Write + ?Sized>(
	w: &mut W,
	pages: &[TemplatePage],
	page_template: Option<&str>,
) -> CompdocResult<()> {
	for (index, page) in pages.iter().enumerate() {
		if index > 0 {
			writeln!(w)?;
			writeln!(w, "{MARKDOWN_PAGE_SEPARATOR}")?;
			writeln!(w)?;
		}
		w.write_all(page.render_markdown(page_template)?.as_bytes())?;
	}

	Ok(())
}

/// The schema of the values a bundle consumer supplies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuesPage {
	pub bundle: String,
	pub fields: Vec<SchemaField>,
}

impl ValuesPage {
	pub fn from_value<V: TypeValue>(
		bundle: impl Into<String>,
		values: &V,
		options: &WalkOptions,
	) -> Self {
		Self {
			bundle: bundle.into(),
			fields: walk_schema(values, options),
		}
	}

	pub fn write_text<W: Write + ?Sized>(&self, w: &mut W, style: TextStyle) -> io::Result<()> {
		writeln!(w, "Bundle: {}", style.label(&self.bundle))?;
		writeln!(w)?;
		write_schema_text(w, &self.fields, 0, style)
	}

	pub fn write_markdown<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
		writeln!(w, "# Bundle Values: {}", self.bundle)?;
		writeln!(w)?;
		write_schema_markdown(w, &self.fields, 0)
	}
}
