use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CompdocError {
	#[error(transparent)]
	#[diagnostic(code(compdoc::io_error))]
	Io(#[from] std::io::Error),

	#[error("no component templates available")]
	#[diagnostic(
		code(compdoc::no_templates),
		help("check that the catalog lists packages with `apiVersion` and `kind` definitions")
	)]
	NoTemplates,

	#[error("no component template matching `{reference}`; available: {available}")]
	#[diagnostic(
		code(compdoc::template_not_found),
		help("use a definition name, `package.Definition`, or `import/path:#Definition`")
	)]
	TemplateNotFound { reference: String, available: String },

	#[error("ambiguous reference `{reference}` matches multiple templates:\n  {candidates}")]
	#[diagnostic(
		code(compdoc::ambiguous_reference),
		help("qualify the reference as `package.Definition` or `import/path:#Definition`")
	)]
	AmbiguousReference {
		reference: String,
		candidates: String,
	},

	#[error("unsupported output format: `{0}`")]
	#[diagnostic(
		code(compdoc::unsupported_format),
		help("supported formats: text, markdown (md), markdown-multi (mdm), mdbook (mdb)")
	)]
	UnsupportedFormat(String),

	#[error("format `{0}` requires an output directory")]
	#[diagnostic(
		code(compdoc::missing_output_directory),
		help("pass `-o/--output <dir>` to choose where the markdown files are written")
	)]
	MissingOutputDirectory(String),

	#[error("`--no-summary` is only valid with the mdbook format")]
	#[diagnostic(code(compdoc::no_summary_requires_mdbook))]
	NoSummaryRequiresMdbook,

	#[error("failed to load catalog `{path}`: {reason}")]
	#[diagnostic(code(compdoc::catalog_parse))]
	CatalogParse { path: String, reason: String },

	#[error("unsupported catalog format: `{0}`")]
	#[diagnostic(
		code(compdoc::unsupported_catalog_format),
		help("supported catalog formats: json, toml, yaml, yml")
	)]
	UnsupportedCatalogFormat(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(compdoc::config_parse),
		help("check that compdoc.toml is valid TOML with optional [docs] and [markdown] sections")
	)]
	ConfigParse(String),

	#[error("bundle `{0}` has no values defined")]
	#[diagnostic(
		code(compdoc::missing_values),
		help("add a top-level `values` schema to the catalog")
	)]
	MissingValues(String),

	#[error("page template rendering failed: {0}")]
	#[diagnostic(code(compdoc::template_render))]
	TemplateRender(String),
}

pub type CompdocResult<T> = Result<T, CompdocError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
