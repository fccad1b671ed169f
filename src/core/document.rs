//! Core document model for front matter manipulation
//!
//! A [`Document`] is one content file split into a metadata block and a body.
//! The block may be YAML, TOML or JSON; saving always writes the format the
//! file was loaded with. TOML blocks additionally keep a structural handle so
//! comments and layout survive an edit.

use crate::core::format::{split_front_matter, MetadataFormat};
use crate::core::metadata::Metadata;
use crate::core::toml_block;
use crate::error::{Result, SiteMatterError};
use crate::io::fs::{read_to_string, write_atomic};
use chrono::NaiveDateTime;
use log::{debug, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

/// A content file with optional front matter and a body
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    format: Option<MetadataFormat>,
    metadata: Metadata,
    body: String,
    raw_block: String,
    toml: Option<DocumentMut>,
    corrupt: bool,
}

impl Document {
    /// Parse `content` as the text of the file at `path`
    ///
    /// Never fails: a block that does not parse yields an empty mapping, a
    /// logged warning and a document flagged as corrupt.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();

        let Some(raw) = split_front_matter(content) else {
            return Self {
                path,
                format: None,
                metadata: Metadata::new(),
                body: content.to_string(),
                raw_block: String::new(),
                toml: None,
                corrupt: false,
            };
        };

        let mut toml = None;
        let parsed = match raw.format {
            MetadataFormat::Yaml => parse_yaml(raw.block),
            MetadataFormat::Json => parse_json(raw.block),
            MetadataFormat::Toml => match raw.block.parse::<DocumentMut>() {
                Ok(handle) => {
                    let metadata = toml_block::to_metadata(&handle);
                    toml = Some(handle);
                    Ok(metadata)
                }
                Err(e) => Err(e.to_string()),
            },
        };

        let (metadata, corrupt) = match parsed {
            Ok(metadata) => (metadata, false),
            Err(reason) => {
                warn!(
                    "Failed to parse {} front matter in {}: {}",
                    raw.format.name().to_uppercase(),
                    path.display(),
                    reason
                );
                (Metadata::new(), true)
            }
        };

        debug!(
            "Parsed {} ({} front matter, {} fields)",
            path.display(),
            raw.format,
            metadata.len()
        );

        Self {
            path,
            format: Some(raw.format),
            metadata,
            body: raw.body.to_string(),
            raw_block: raw.block.to_string(),
            toml,
            corrupt,
        }
    }

    /// Read and parse a file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_to_string(path)?;
        Ok(Self::parse(path, &content))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for report lines
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn format(&self) -> Option<MetadataFormat> {
        self.format
    }

    /// Whether a metadata block was detected, even if it failed to parse
    pub fn has_front_matter(&self) -> bool {
        self.format.is_some()
    }

    /// Whether a detected metadata block failed to parse
    pub fn is_corrupt(&self) -> bool {
        self.corrupt
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// The metadata block exactly as read from disk
    pub fn raw_block(&self) -> &str {
        &self.raw_block
    }

    /// Metadata block and body, for full-text matching
    pub fn full_text(&self) -> String {
        format!("{}\n{}", self.raw_block, self.body)
    }

    pub fn title(&self) -> String {
        self.metadata.title()
    }

    pub fn get_list(&self, field: &str) -> Vec<String> {
        self.metadata.get_list(field)
    }

    pub fn set_list<I, S>(&mut self, field: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.set_list(field, values)
    }

    pub fn get_scalar(&self, field: &str) -> Option<String> {
        self.metadata.get_scalar(field)
    }

    pub fn set_scalar(&mut self, field: &str, value: Option<&str>) {
        self.metadata.set_scalar(field, value)
    }

    pub fn get_date(&self) -> Option<NaiveDateTime> {
        self.metadata.get_date()
    }

    /// Serialize the document in its original format
    pub fn render(&self) -> Result<String> {
        let Some(format) = self.format else {
            return Err(SiteMatterError::no_metadata(&self.path));
        };
        if self.corrupt {
            return Err(SiteMatterError::corrupt_metadata(&self.path));
        }

        let fields = Value::Object(self.metadata.as_map().clone());
        let rendered = match format {
            MetadataFormat::Yaml => {
                let block = serde_yaml::to_string(&fields)?;
                format!("---\n{}---\n{}", block, self.body)
            }
            MetadataFormat::Toml => {
                let mut handle = self.toml.clone().unwrap_or_default();
                toml_block::apply_metadata(&mut handle, &self.metadata);
                let mut block = handle.to_string();
                if !block.is_empty() && !block.ends_with('\n') {
                    block.push('\n');
                }
                format!("+++\n{}+++\n{}", block, self.body)
            }
            MetadataFormat::Json => {
                // an empty object must still close on its own line to be detected
                let object = if self.metadata.is_empty() {
                    "{\n}".to_string()
                } else {
                    serde_json::to_string_pretty(&fields)?
                };
                format!("{}\n{}", object, self.body)
            }
        };

        Ok(rendered)
    }

    /// Rewrite the file with the current metadata
    pub fn save(&mut self) -> Result<()> {
        let content = self.render()?;
        write_atomic(&self.path, &content)?;

        // keep the in-memory view in step with what is now on disk
        *self = Self::parse(self.path.clone(), &content);
        debug!("Saved {}", self.path.display());
        Ok(())
    }
}

fn parse_yaml(block: &str) -> std::result::Result<Metadata, String> {
    if block.trim().is_empty() {
        return Ok(Metadata::new());
    }
    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Object(map)) => Ok(Metadata::from_map(map)),
        Ok(Value::Null) => Ok(Metadata::new()),
        Ok(other) => Err(format!("expected a mapping, found {}", shape(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_json(block: &str) -> std::result::Result<Metadata, String> {
    match serde_json::from_str::<Value>(block) {
        Ok(Value::Object(map)) => Ok(Metadata::from_map(map)),
        Ok(other) => Err(format!("expected an object, found {}", shape(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
