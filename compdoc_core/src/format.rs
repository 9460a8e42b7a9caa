//! Render documentation trees as terminal text or markdown.
//!
//! Both renderers only read [`SchemaField`] and [`Declaration`] trees; they
//! never go back to the type values the trees were walked from.

use std::io;
use std::io::Write;

use owo_colors::OwoColorize;
use owo_colors::Style;

use crate::declarations::Declaration;
use crate::declarations::group_declarations;
use crate::schema::SchemaField;

/// Column at which leaf types start in terminal output, relative to the
/// field's indentation.
pub const TEXT_TYPE_COLUMN: usize = 20;

/// Colours used for terminal output. Disabled styles render plain text.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
	color: bool,
}

impl TextStyle {
	pub fn new(color: bool) -> Self {
		Self { color }
	}

	pub fn plain() -> Self {
		Self::new(false)
	}

	pub fn is_colored(self) -> bool {
		self.color
	}

	fn paint(self, text: &str, style: Style) -> String {
		if self.color {
			text.style(style).to_string()
		} else {
			text.to_string()
		}
	}

	pub fn header(self, text: &str) -> String {
		self.paint(text, Style::new().bold().cyan())
	}

	pub fn label(self, text: &str) -> String {
		self.paint(text, Style::new().bold())
	}

	pub fn value(self, text: &str) -> String {
		self.paint(text, Style::new().green())
	}

	pub fn emphasis(self, text: &str) -> String {
		self.paint(text, Style::new().italic())
	}

	fn comment_mark(self) -> String {
		self.paint("//", Style::new().bright_black())
	}

	fn field_name(self, text: &str) -> String {
		self.paint(text, Style::new().bold())
	}

	fn type_name(self, text: &str) -> String {
		self.paint(text, Style::new().green())
	}

	fn default_value(self, text: &str) -> String {
		self.paint(text, Style::new().yellow())
	}
}

impl Default for TextStyle {
	fn default() -> Self {
		Self::new(true)
	}
}

/// How a field is constrained, as far as rendering is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
	Plain,
	Optional,
	Required,
}

impl Marker {
	fn of(field: &SchemaField) -> Self {
		if field.is_pattern {
			Self::Plain
		} else if field.required {
			Self::Required
		} else if field.optional {
			Self::Optional
		} else {
			Self::Plain
		}
	}

	fn text_suffix(self) -> &'static str {
		match self {
			Self::Plain => "",
			Self::Optional => "?",
			Self::Required => "!",
		}
	}

	fn markdown_suffix(self) -> &'static str {
		match self {
			Self::Plain => "",
			Self::Optional => " (optional)",
			Self::Required => " (required)",
		}
	}
}

/// The parts of a field or declaration the renderers need.
struct Entry<'a> {
	name: &'a str,
	marker: Marker,
	doc: &'a str,
	r#type: &'a str,
	default: &'a str,
	children: &'a [SchemaField],
}

impl<'a> From<&'a SchemaField> for Entry<'a> {
	fn from(field: &'a SchemaField) -> Self {
		Self {
			name: &field.name,
			marker: Marker::of(field),
			doc: &field.doc,
			r#type: &field.r#type,
			default: &field.default,
			children: &field.children,
		}
	}
}

impl<'a> From<&'a Declaration> for Entry<'a> {
	fn from(declaration: &'a Declaration) -> Self {
		Self {
			name: &declaration.name,
			marker: Marker::Plain,
			doc: &declaration.doc,
			r#type: &declaration.r#type,
			default: "",
			children: &declaration.children,
		}
	}
}

/// Write a schema tree for the terminal, starting `indent` spaces in.
///
/// Doc comments go above their field as `//` lines. Fields with children
/// print their name and recurse two spaces deeper; leaves align their types
/// at [`TEXT_TYPE_COLUMN`].
pub fn write_schema_text<W: Write + ?Sized>(
	w: &mut W,
	fields: &[SchemaField],
	indent: usize,
	style: TextStyle,
) -> io::Result<()> {
	for field in fields {
		write_entry_text(w, &Entry::from(field), indent, style)?;
	}

	Ok(())
}

fn write_entry_text<W: Write + ?Sized>(
	w: &mut W,
	entry: &Entry<'_>,
	indent: usize,
	style: TextStyle,
) -> io::Result<()> {
	let prefix = " ".repeat(indent);
	let name = format!("{}{}", entry.name, entry.marker.text_suffix());

	if !entry.doc.is_empty() {
		for line in entry.doc.lines() {
			writeln!(
				w,
				"{prefix}{} {}",
				style.comment_mark(),
				style.emphasis(line)
			)?;
		}
	}

	if !entry.children.is_empty() {
		writeln!(w, "{prefix}{}", style.field_name(&name))?;
		return write_schema_text(w, entry.children, indent + 2, style);
	}

	let mut type_text = style.type_name(entry.r#type);
	if !entry.default.is_empty() {
		type_text.push_str(&style.default_value(&format!(" (default: {})", entry.default)));
	}

	let padding = TEXT_TYPE_COLUMN.saturating_sub(name.chars().count()).max(1);
	writeln!(
		w,
		"{prefix}{}{}{type_text}",
		style.field_name(&name),
		" ".repeat(padding)
	)
}

/// Write declarations for the terminal, one labelled section per non-empty
/// category.
pub fn write_declarations_text<W: Write + ?Sized>(
	w: &mut W,
	declarations: &[Declaration],
	indent: usize,
	style: TextStyle,
) -> io::Result<()> {
	let prefix = " ".repeat(indent);

	for (index, group) in group_declarations(declarations).iter().enumerate() {
		if index > 0 {
			writeln!(w)?;
		}
		writeln!(
			w,
			"{prefix}{}",
			style.header(&format!("{}:", group.category.title()))
		)?;
		for declaration in &group.declarations {
			write_entry_text(w, &Entry::from(*declaration), indent + 2, style)?;
		}
	}

	Ok(())
}

/// Write a schema tree as nested markdown lists, `depth` levels deep.
///
/// Doc comments become paragraphs above their bullet. Fields with children
/// are a bold bullet followed by a nested list; leaves show their type in
/// inline code with an explicit `(required)` or `(optional)` suffix.
pub fn write_schema_markdown<W: Write + ?Sized>(
	w: &mut W,
	fields: &[SchemaField],
	depth: usize,
) -> io::Result<()> {
	for field in fields {
		write_entry_markdown(w, &Entry::from(field), depth)?;
	}

	Ok(())
}

fn write_entry_markdown<W: Write + ?Sized>(
	w: &mut W,
	entry: &Entry<'_>,
	depth: usize,
) -> io::Result<()> {
	let indent = "  ".repeat(depth);
	let marker = entry.marker.markdown_suffix();

	if !entry.doc.is_empty() {
		for line in entry.doc.lines() {
			writeln!(w, "{indent}{line}")?;
		}
		writeln!(w)?;
	}

	if !entry.children.is_empty() {
		writeln!(w, "{indent}- **{}**{marker}", entry.name)?;
		return write_schema_markdown(w, entry.children, depth + 1);
	}

	if entry.default.is_empty() {
		writeln!(w, "{indent}- **{}**{marker}: `{}`", entry.name, entry.r#type)
	} else {
		writeln!(
			w,
			"{indent}- **{}**{marker}: `{}` (default: {})",
			entry.name, entry.r#type, entry.default
		)
	}
}

/// Write declarations as markdown, one heading of level `heading_level` per
/// non-empty category.
pub fn write_declarations_markdown<W: Write + ?Sized>(
	w: &mut W,
	declarations: &[Declaration],
	heading_level: usize,
) -> io::Result<()> {
	let hashes = "#".repeat(heading_level.max(1));

	for group in group_declarations(declarations) {
		writeln!(w, "{hashes} {}", group.category.title())?;
		writeln!(w)?;
		for declaration in &group.declarations {
			write_entry_markdown(w, &Entry::from(*declaration), 0)?;
		}
		writeln!(w)?;
	}

	Ok(())
}
