use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use compdoc_cli::Commands;
use compdoc_cli::CompdocCli;
use compdoc_cli::ComponentsOutputFormat;
use compdoc_cli::ValuesOutputFormat;
use compdoc_core::AnyEmptyResult;
use compdoc_core::Catalog;
use compdoc_core::CatalogValue;
use compdoc_core::CompdocConfig;
use compdoc_core::CompdocError;
use compdoc_core::CompdocResult;
use compdoc_core::ComponentTemplate;
use compdoc_core::DocsFormat;
use compdoc_core::DocsRequest;
use compdoc_core::TemplateSummary;
use compdoc_core::TextStyle;
use compdoc_core::ValuesPage;
use compdoc_core::generate_docs;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = CompdocCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color || supports_color::on(supports_color::Stream::Stdout).is_none() {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Commands::Docs {
			reference,
			expand,
			format,
			output,
			no_summary,
		} => {
			run_docs(
				&args,
				reference,
				*expand,
				format.as_deref(),
				output.as_deref(),
				*no_summary,
			)
		}
		Commands::Components { format } => run_components(&args, *format),
		Commands::Values { format, output } => run_values(&args, *format, output.as_deref()),
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<CompdocError>() {
			Ok(compdoc_err) => {
				let report: miette::Report = (*compdoc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// `RUST_LOG` wins; otherwise `--verbose` turns on debug events from the
/// compdoc crates.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_filter = if verbose { "compdoc=debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(io::stderr)
				.with_ansi(use_color),
		)
		.init();
}

fn resolve_root(args: &CompdocCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// The project root, its config and the catalog it points at.
struct Project {
	root: PathBuf,
	config: CompdocConfig,
	catalog: Catalog,
}

fn load_project(args: &CompdocCli) -> CompdocResult<Project> {
	let root = resolve_root(args);
	let config = CompdocConfig::load(&root)?.unwrap_or_default();
	let catalog_path = args
		.catalog
		.clone()
		.unwrap_or_else(|| config.catalog_path(&root));

	tracing::debug!(
		root = %root.display(),
		catalog = %catalog_path.display(),
		"resolved project"
	);

	let catalog = Catalog::load(&catalog_path)?;

	Ok(Project {
		root,
		config,
		catalog,
	})
}

fn run_docs(
	args: &CompdocCli,
	reference: &str,
	expand: bool,
	format: Option<&str>,
	output: Option<&Path>,
	no_summary: bool,
) -> AnyEmptyResult {
	let project = load_project(args)?;
	let format = format
		.or(project.config.docs.format.as_deref())
		.map(DocsFormat::from_str)
		.transpose()?
		.unwrap_or_default();

	let request = DocsRequest {
		reference: reference.to_string(),
		format,
		output: output.map(Path::to_path_buf),
		no_summary,
		options: project
			.config
			.walk_options(expand || project.config.docs.expand),
		page_template: project.config.page_template(&project.root)?,
		style: TextStyle::new(color_enabled()),
	};

	let templates = project.catalog.component_templates();
	let mut stdout = io::stdout().lock();
	let report = generate_docs(&request, &templates, &mut stdout)?;

	for path in &report.written {
		writeln!(stdout, "{} {}", colored!("Wrote", green), path.display())?;
	}

	Ok(())
}

fn run_components(args: &CompdocCli, format: ComponentsOutputFormat) -> AnyEmptyResult {
	let project = load_project(args)?;
	let templates = project.catalog.component_templates();

	match format {
		ComponentsOutputFormat::Json => {
			let summaries: Vec<TemplateSummary> =
				templates.iter().map(ComponentTemplate::summary).collect();
			println!("{}", serde_json::to_string_pretty(&summaries)?);
		}
		ComponentsOutputFormat::Table => print_components_table(&templates),
	}

	Ok(())
}

fn print_components_table(templates: &[ComponentTemplate<CatalogValue<'_>>]) {
	if templates.is_empty() {
		println!("No component templates found.");
		return;
	}

	let package_width = templates
		.iter()
		.map(|template| template.package.len())
		.chain(["PACKAGE".len()])
		.max()
		.unwrap_or_default();
	let name_width = templates
		.iter()
		.map(|template| template.name.len())
		.chain(["DEFINITION".len()])
		.max()
		.unwrap_or_default();

	let header = format!(
		"{:<package_width$}  {:<name_width$}  VERSION",
		"PACKAGE", "DEFINITION"
	);
	println!("{}", colored!(header, bold));

	for template in templates {
		let row = format!(
			"{:<package_width$}  {:<name_width$}  {}",
			template.package, template.name, template.version
		);
		println!("{}", row.trim_end());
	}
}

fn run_values(
	args: &CompdocCli,
	format: ValuesOutputFormat,
	output: Option<&Path>,
) -> AnyEmptyResult {
	let project = load_project(args)?;
	let Some(values) = project.catalog.values() else {
		return Err(CompdocError::MissingValues(project.catalog.name.clone()).into());
	};

	let options = project.config.walk_options(project.config.docs.expand);
	let page = ValuesPage::from_value(project.catalog.name.clone(), &values, &options);

	match output {
		Some(path) => {
			let mut file = fs::File::create(path)?;
			write_values(&page, format, &mut file, TextStyle::plain())?;
			println!("{} {}", colored!("Wrote", green), path.display());
		}
		None => {
			let mut stdout = io::stdout().lock();
			write_values(
				&page,
				format,
				&mut stdout,
				TextStyle::new(color_enabled()),
			)?;
		}
	}

	Ok(())
}

fn write_values<W: Write>(
	page: &ValuesPage,
	format: ValuesOutputFormat,
	w: &mut W,
	style: TextStyle,
) -> io::Result<()> {
	match format {
		ValuesOutputFormat::Text => page.write_text(w, style),
		ValuesOutputFormat::Markdown => page.write_markdown(w),
	}
}
