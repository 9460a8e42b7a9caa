//! Fan pages out into a directory tree, optionally with an mdBook
//! `SUMMARY.md`.
//!
//! Pages are grouped by package shorthand in first-seen order and written to
//! `<dir>/<shorthand>/<Definition>.md`.

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::CompdocResult;
use crate::page::TemplatePage;

/// Navigation index written by the mdbook format.
pub const SUMMARY_FILE: &str = "SUMMARY.md";

/// Pages sharing one package shorthand, in the order they were resolved.
#[derive(Debug, Clone)]
pub struct PageGroup<'p> {
	pub shorthand: &'p str,
	pub pages: Vec<&'p TemplatePage>,
}

impl PageGroup<'_> {
	/// Link target of `page`, relative to the output directory.
	fn link(&self, page: &TemplatePage) -> String {
		format!("{}/{}", self.shorthand, page.file_name())
	}
}

/// Group pages by shorthand, keeping the order in which each shorthand is
/// first seen.
pub fn group_pages(pages: &[TemplatePage]) -> Vec<PageGroup<'_>> {
	let mut groups: Vec<PageGroup<'_>> = Vec::new();

	for page in pages {
		match groups
			.iter_mut()
			.find(|group| group.shorthand == page.shorthand)
		{
			Some(group) => group.pages.push(page),
			None => {
				groups.push(PageGroup {
					shorthand: &page.shorthand,
					pages: vec![page],
				});
			}
		}
	}

	groups
}

/// Write one markdown file per page under `dir`, plus [`SUMMARY_FILE`] when
/// `summary` is set. Returns the written paths in write order.
pub fn write_page_directory(
	dir: &Path,
	pages: &[TemplatePage],
	page_template: Option<&str>,
	summary: bool,
) -> CompdocResult<Vec<PathBuf>> {
	fs::create_dir_all(dir)?;

	let groups = group_pages(pages);
	let mut written = Vec::with_capacity(pages.len() + 1);

	for group in &groups {
		let package_dir = dir.join(group.shorthand);
		fs::create_dir_all(&package_dir)?;

		for page in &group.pages {
			let path = package_dir.join(page.file_name());
			fs::write(&path, page.render_markdown(page_template)?)?;
			tracing::debug!(path = %path.display(), "wrote page");
			written.push(path);
		}
	}

	if summary {
		let path = dir.join(SUMMARY_FILE);
		let mut file = fs::File::create(&path)?;
		write_summary(&mut file, &groups)?;
		tracing::debug!(path = %path.display(), "wrote summary");
		written.push(path);
	}

	Ok(written)
}

/// Write an mdBook summary: one chapter per group linking to its first page,
/// with one nested entry per page.
pub fn write_summary<W: Write + ?Sized>(w: &mut W, groups: &[PageGroup<'_>]) -> io::Result<()> {
	writeln!(w, "# Summary")?;
	writeln!(w)?;

	for group in groups {
		let Some(first) = group.pages.first() else {
			continue;
		};

		writeln!(w, "- [{}]({})", group.shorthand, group.link(first))?;
		for page in &group.pages {
			writeln!(w, "  - [{}]({})", page.definition, group.link(page))?;
		}
	}

	Ok(())
}
