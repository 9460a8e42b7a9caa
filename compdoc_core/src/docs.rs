use std::fmt;
use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use crate::CompdocError;
use crate::CompdocResult;
use crate::book::write_page_directory;
use crate::format::TextStyle;
use crate::page::TemplatePage;
use crate::page::write_markdown_pages;
use crate::page::write_text_pages;
use crate::resolve::resolve_targets;
use crate::schema::WalkOptions;
use crate::template::ComponentTemplate;
use crate::value::TypeValue;

/// Output format of `compdoc docs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocsFormat {
	/// Coloured terminal text, one stream.
	#[default]
	Text,
	/// Markdown, one stream.
	Markdown,
	/// One markdown file per template under an output directory.
	MarkdownMulti,
	/// Like [`DocsFormat::MarkdownMulti`], plus an mdBook `SUMMARY.md`.
	Mdbook,
}

impl DocsFormat {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Markdown => "markdown",
			Self::MarkdownMulti => "markdown-multi",
			Self::Mdbook => "mdbook",
		}
	}

	/// Whether the format writes a directory tree rather than a stream.
	pub fn is_directory(self) -> bool {
		matches!(self, Self::MarkdownMulti | Self::Mdbook)
	}
}

impl FromStr for DocsFormat {
	type Err = CompdocError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"text" => Ok(Self::Text),
			"markdown" | "md" => Ok(Self::Markdown),
			"markdown-multi" | "mdm" => Ok(Self::MarkdownMulti),
			"mdbook" | "mdb" => Ok(Self::Mdbook),
			_ => Err(CompdocError::UnsupportedFormat(value.to_string())),
		}
	}
}

impl Display for DocsFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Everything `compdoc docs` needs besides the templates themselves.
#[derive(Debug, Clone, Default)]
pub struct DocsRequest {
	pub reference: String,
	pub format: DocsFormat,
	/// Output file for stream formats, output directory for directory
	/// formats. Streams go to the caller's writer when unset.
	pub output: Option<PathBuf>,
	pub no_summary: bool,
	pub options: WalkOptions,
	/// Source of a custom minijinja page template for markdown pages.
	pub page_template: Option<String>,
	/// Style for text written to the caller's writer. Files are always
	/// plain.
	pub style: TextStyle,
}

impl DocsRequest {
	/// Reject output requests that cannot be satisfied.
	pub fn validate(&self) -> CompdocResult<()> {
		if self.format.is_directory() && self.output.is_none() {
			return Err(CompdocError::MissingOutputDirectory(self.format.to_string()));
		}

		if self.no_summary && self.format != DocsFormat::Mdbook {
			return Err(CompdocError::NoSummaryRequiresMdbook);
		}

		Ok(())
	}
}

/// What `generate_docs` produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocsReport {
	/// Templates documented, in resolution order.
	pub templates: Vec<String>,
	/// Files written. Empty when the output went to the caller's writer.
	pub written: Vec<PathBuf>,
}

/// Resolve `request.reference` against `templates` and render the result.
///
/// The request is validated before anything is resolved or walked.
pub fn generate_docs<V: TypeValue, W: Write + ?Sized>(
	request: &DocsRequest,
	templates: &[ComponentTemplate<V>],
	out: &mut W,
) -> CompdocResult<DocsReport> {
	request.validate()?;

	let targets = resolve_targets(&request.reference, templates)?;
	let pages: Vec<_> = targets
		.iter()
		.map(|template| TemplatePage::from_template(*template, &request.options))
		.collect();
	let page_template = request.page_template.as_deref();

	let mut report = DocsReport {
		templates: targets.iter().map(|template| template.display_name()).collect(),
		written: Vec::new(),
	};

	match (request.format, request.output.as_deref()) {
		(DocsFormat::MarkdownMulti | DocsFormat::Mdbook, Some(dir)) => {
			let summary = request.format == DocsFormat::Mdbook && !request.no_summary;
			report.written = write_page_directory(dir, &pages, page_template, summary)?;
		}
		(DocsFormat::MarkdownMulti | DocsFormat::Mdbook, None) => {
			return Err(CompdocError::MissingOutputDirectory(request.format.to_string()));
		}
		(DocsFormat::Text, Some(path)) => {
			let mut file = fs::File::create(path)?;
			write_text_pages(&mut file, &pages, TextStyle::plain())?;
			report.written.push(path.to_path_buf());
		}
		(DocsFormat::Text, None) => write_text_pages(out, &pages, request.style)?,
		(DocsFormat::Markdown, Some(path)) => {
			let mut file = fs::File::create(path)?;
			write_markdown_pages(&mut file, &pages, page_template)?;
			report.written.push(path.to_path_buf());
		}
		(DocsFormat::Markdown, None) => write_markdown_pages(out, &pages, page_template)?,
	}

	tracing::debug!(
		reference = %request.reference,
		format = %request.format,
		pages = pages.len(),
		"generated docs"
	);

	Ok(report)
}
