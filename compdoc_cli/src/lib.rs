use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Browse the configuration surface of component templates.",
	long_about = "compdoc documents the configuration schema of component templates from an \
	              evaluated bundle catalog.\n\nIt walks each template's `config` section into a \
	              field tree and prints it in the terminal or writes it as markdown, a directory \
	              of pages, or an mdBook.\n\nQuick start:\n  compdoc components     List \
	              discoverable templates\n  compdoc docs web       Document a template by \
	              shorthand\n  compdoc values         Document the bundle's values schema"
)]
pub struct CompdocCli {
	#[command(subcommand)]
	pub command: Commands,

	/// Path to the project root directory. `compdoc.toml` is discovered here.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Catalog file to read templates from. Overrides `catalog` in
	/// `compdoc.toml`.
	#[arg(long, short, global = true)]
	pub catalog: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Show the configuration schema of one or more component templates.
	///
	/// The reference may be a definition name (`Web`), a package
	/// shorthand (`web`), a qualified `package.Definition`, a full
	/// `import/path:#Definition`, or a package path selecting every template
	/// under it.
	Docs {
		/// The template reference to document.
		reference: String,

		/// Inline named-type references instead of showing them by name.
		#[arg(long, default_value_t = false)]
		expand: bool,

		/// Output format: `text`, `markdown` (`md`), `markdown-multi`
		/// (`mdm`) or `mdbook` (`mdb`). Defaults to `docs.format` from
		/// `compdoc.toml`, then `text`.
		#[arg(long, short)]
		format: Option<String>,

		/// Output file for `text` and `markdown`, output directory for
		/// `markdown-multi` and `mdbook`.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Skip writing `SUMMARY.md` in mdbook mode.
		#[arg(long, default_value_t = false)]
		no_summary: bool,
	},
	/// List every component template found in the catalog.
	Components {
		/// Output format for the listing.
		#[arg(long, value_enum, default_value_t = ComponentsOutputFormat::Table)]
		format: ComponentsOutputFormat,
	},
	/// Show the schema of the values a bundle consumer supplies.
	Values {
		/// Output format for the values schema.
		#[arg(long, value_enum, default_value_t = ValuesOutputFormat::Text)]
		format: ValuesOutputFormat,

		/// Write the schema to a file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComponentsOutputFormat {
	/// Aligned `PACKAGE DEFINITION VERSION` columns.
	Table,
	/// JSON array of `{package, name, module, version}` objects.
	Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValuesOutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// Markdown with one nested list item per field.
	Markdown,
}
