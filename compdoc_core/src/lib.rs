//! `compdoc_core` documents the configuration surface of component templates.
//! It walks strongly-typed configuration values into portable documentation
//! trees and resolves short, human-typed references to the template they
//! name.
//!
//! ## Pipeline
//!
//! ```text
//! Catalog (json / toml / yaml)
//!   → Discovery (public definitions with concrete apiVersion + kind)
//!   → Resolver (qualified path, definition name, shorthand, package.Definition)
//!   → Walker + declaration scanner (SchemaField / Declaration trees)
//!   → Formatter (terminal text, markdown, directory tree, mdBook)
//! ```
//!
//! ## Modules
//!
//! - [`value`]: The [`TypeValue`] trait every introspection goes through.
//! - [`catalog`]: A serde-loadable evaluated bundle implementing
//!   [`TypeValue`].
//! - [`schema`]: The schema walker and its expand/collapse policy.
//! - [`declarations`]: Annotated root-level declarations grouped by
//!   category.
//! - [`resolve`]: Reference resolution over discovered templates.
//! - [`format`], [`page`], [`book`]: Text and markdown renderers.
//! - [`config`]: Configuration loading from `compdoc.toml`.
//!
//! ## Annotations
//!
//! Metadata lives in annotations named `compdoc` by default. Arguments are
//! positional:
//!
//! - `hidden` removes a field, pattern or declaration from every output.
//! - `expand` inlines a named-type reference even when expansion is off.
//! - `ref` and `ext` place a declaration under References or Extensions;
//!   any other argument files it under Other.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use compdoc_core::Catalog;
//! use compdoc_core::DocsRequest;
//! use compdoc_core::generate_docs;
//!
//! let catalog = Catalog::load(Path::new("compdoc.catalog.json")).unwrap();
//! let templates = catalog.component_templates();
//! let request = DocsRequest {
//! 	reference: "web".into(),
//! 	..DocsRequest::default()
//! };
//!
//! generate_docs(&request, &templates, &mut std::io::stdout()).unwrap();
//! ```

pub use book::*;
pub use catalog::*;
pub use config::*;
pub use declarations::*;
pub use docs::*;
pub use error::*;
pub use format::*;
pub use page::*;
pub use resolve::*;
pub use schema::*;
pub use template::*;
pub use value::*;

pub mod book;
pub mod catalog;
pub mod config;
pub mod declarations;
mod docs;
#[allow(unused_assignments)]
mod error;
pub mod format;
pub mod page;
pub mod resolve;
pub mod schema;
mod template;
pub mod value;

#[cfg(test)]
mod __fixtures;
