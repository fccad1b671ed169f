//! Core document model, selection criteria and field requests

pub mod document;
pub mod field;
pub mod format;
pub mod metadata;
pub mod selection;
pub mod toml_block;

pub use document::Document;
pub use field::{split_items, Field, FieldKind, FieldOperation, FieldRequest};
pub use format::MetadataFormat;
pub use metadata::{parse_date, Metadata};
pub use selection::Selection;
