//! Error types for the sitematter library
//!
//! Configuration errors (missing content directory, bad selection, bad field
//! request) are fatal and surface before any document is touched. Per-document
//! failures are recoverable: callers log them and move on to the next file.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum SiteMatterError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The content directory does not exist
    #[error("Content directory '{path}' does not exist")]
    ContentDirNotFound { path: PathBuf },

    /// Writing a document whose metadata block could not be parsed
    #[error("Refusing to save {path}: its front matter could not be parsed")]
    CorruptMetadata { path: PathBuf },

    /// Writing a document that has no front matter block
    #[error("Refusing to save {path}: it has no front matter")]
    NoMetadata { path: PathBuf },

    /// No selection criterion was supplied
    #[error("Invalid selection: {reason}")]
    InvalidSelection { reason: String },

    /// Field selector and operation do not fit together
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Copy or move between a list field and a label field
    #[error(
        "Cannot copy/move between different field types: '{source_field}' is a {source_kind} field, '{dest_field}' is a {dest_kind} field"
    )]
    KindMismatch {
        source_field: String,
        source_kind: String,
        dest_field: String,
        dest_kind: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SiteMatterError>;

impl SiteMatterError {
    /// Create a new content directory not found error
    pub fn content_dir_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ContentDirNotFound { path: path.into() }
    }

    /// Create a new corrupt metadata error
    pub fn corrupt_metadata(path: impl Into<PathBuf>) -> Self {
        Self::CorruptMetadata { path: path.into() }
    }

    /// Create a new missing metadata error
    pub fn no_metadata(path: impl Into<PathBuf>) -> Self {
        Self::NoMetadata { path: path.into() }
    }

    /// Create a new invalid selection error
    pub fn invalid_selection(reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            reason: reason.into(),
        }
    }

    /// Create a new invalid request error
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Create a new kind mismatch error
    pub fn kind_mismatch(
        source_field: impl Into<String>,
        source_kind: impl ToString,
        dest_field: impl Into<String>,
        dest_kind: impl ToString,
    ) -> Self {
        Self::KindMismatch {
            source_field: source_field.into(),
            source_kind: source_kind.to_string(),
            dest_field: dest_field.into(),
            dest_kind: dest_kind.to_string(),
        }
    }

    /// Check if this error only affects a single document
    ///
    /// Recoverable errors are tallied and the batch continues; everything
    /// else aborts the run before any file is written.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_)
            | Self::Yaml(_)
            | Self::Json(_)
            | Self::CorruptMetadata { .. }
            | Self::NoMetadata { .. } => true,
            Self::ContentDirNotFound { .. }
            | Self::InvalidSelection { .. }
            | Self::InvalidRequest { .. }
            | Self::KindMismatch { .. } => false,
        }
    }
}
