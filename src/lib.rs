//! sitematter: front matter management for static-site content
//!
//! This library reads content files whose metadata block is YAML (`---`),
//! TOML (`+++`) or a leading JSON object, lets callers edit the metadata
//! through a format-independent view, and writes each file back in the
//! format it came in. TOML blocks keep their comments and layout; only the
//! fields that changed are rewritten.
//!
//! On top of the document model sit a directory loader with selection
//! criteria and two batch operations: a field mutation engine (tags,
//! categories and custom list/label fields) and a timestamp synchronizer.
//!
//! # Quick Start
//!
//! ## Editing a single document
//!
//! ```rust,no_run
//! use sitematter::{Document, Result};
//!
//! fn main() -> Result<()> {
//!     let mut doc = Document::read("content/posts/hello.md")?;
//!
//!     let mut tags = doc.get_list("tags");
//!     tags.push("rust".to_string());
//!     tags.sort();
//!     tags.dedup();
//!     doc.set_list("tags", tags);
//!     doc.set_scalar("status", Some("published"));
//!
//!     doc.save()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Batch operations
//!
//! ```rust,no_run
//! use sitematter::{Collection, Field, FieldOperation, FieldRequest, Result, Selection};
//! use sitematter::ops::apply_field_request;
//!
//! fn main() -> Result<()> {
//!     let selection = Selection {
//!         title: Some("docker".to_string()),
//!         ..Selection::default()
//!     };
//!     let mut selected = Collection::load("content/posts")?.select(&selection)?;
//!
//!     let request = FieldRequest::new(
//!         Field::categories(),
//!         FieldOperation::Move { source: "tags".to_string() },
//!     )?;
//!     let summary = apply_field_request(
//!         &mut selected.documents,
//!         &request,
//!         true,
//!         &mut std::io::stdout(),
//!     )?;
//!     println!("{}", summary);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub mod io;
pub mod ops;

pub use crate::core::{
    Document, Field, FieldKind, FieldOperation, FieldRequest, Metadata, MetadataFormat, Selection,
};
pub use crate::error::{Result, SiteMatterError};
pub use crate::io::{Collection, Selected};
pub use crate::ops::{BatchSummary, DumpReport};
