//! Field selection and the operations that can be requested on a field
//!
//! A [`FieldRequest`] is validated once, up front. Anything it rejects is a
//! configuration error and no document has been touched yet.

use crate::error::{Result, SiteMatterError};
use std::collections::BTreeSet;
use std::fmt;

/// Shape of a managed metadata field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Multi-valued, stored as a sorted set of strings
    List,
    /// Single string value
    Label,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("list"),
            Self::Label => f.write_str("label"),
        }
    }
}

/// A metadata field name together with its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn list(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::List,
        }
    }

    pub fn label(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Label,
        }
    }

    pub fn tags() -> Self {
        Self::list("tags")
    }

    pub fn categories() -> Self {
        Self::list("categories")
    }

    /// Resolve the field from the three mutually exclusive selectors
    ///
    /// With no selector the field is `tags`.
    pub fn resolve(
        categories: bool,
        custom_list: Option<&str>,
        custom_label: Option<&str>,
    ) -> Result<Self> {
        let given = usize::from(categories)
            + usize::from(custom_list.is_some())
            + usize::from(custom_label.is_some());
        if given > 1 {
            return Err(SiteMatterError::invalid_request(
                "only one of --categories, --custom-list, or --custom-label can be specified",
            ));
        }

        Ok(match (custom_label, custom_list) {
            (Some(name), _) => Self::label(name),
            (_, Some(name)) => Self::list(name),
            _ if categories => Self::categories(),
            _ => Self::tags(),
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Kind of a copy/move source, guessed from its name
///
/// Only a handful of well-known fields are recognised; anything else is
/// assumed to have the destination's kind.
pub fn infer_kind(name: &str, fallback: FieldKind) -> FieldKind {
    match name {
        "tags" | "categories" | "keywords" => FieldKind::List,
        "title" | "author" | "description" | "slug" => FieldKind::Label,
        _ => fallback,
    }
}

/// What to do with the selected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOperation {
    /// Add and remove items of a list field
    Edit {
        add: BTreeSet<String>,
        remove: BTreeSet<String>,
    },
    /// Set or clear a label field; a value takes precedence over `clear`
    Assign { value: Option<String>, clear: bool },
    /// Copy the values of another field into this one
    Copy { source: String },
    /// Like `Copy`, then empty the source
    Move { source: String },
    /// Report current values without modifying anything
    Dump,
}

impl FieldOperation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Edit { .. } => "add/remove",
            Self::Assign { .. } => "set/clear",
            Self::Copy { .. } => "copy",
            Self::Move { .. } => "move",
            Self::Dump => "dump",
        }
    }

    /// Whether the operation can change documents
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Dump)
    }
}

/// A validated field plus operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRequest {
    field: Field,
    operation: FieldOperation,
}

impl FieldRequest {
    pub fn new(field: Field, operation: FieldOperation) -> Result<Self> {
        match (&operation, field.kind) {
            (FieldOperation::Edit { add, remove }, FieldKind::List) => {
                if add.is_empty() && remove.is_empty() {
                    return Err(SiteMatterError::invalid_request(
                        "at least one operation is required (--add or --remove)",
                    ));
                }
            }
            (FieldOperation::Edit { .. }, FieldKind::Label) => {
                return Err(SiteMatterError::invalid_request(format!(
                    "cannot add or remove items on label field '{}'; use --set or --clear instead",
                    field.name
                )));
            }
            (FieldOperation::Assign { value, clear }, FieldKind::Label) => {
                if value.is_none() && !clear {
                    return Err(SiteMatterError::invalid_request(
                        "for label fields, at least one operation is required (--set or --clear)",
                    ));
                }
            }
            (FieldOperation::Assign { .. }, FieldKind::List) => {
                return Err(SiteMatterError::invalid_request(format!(
                    "cannot set or clear list field '{}'; use --add or --remove instead",
                    field.name
                )));
            }
            (FieldOperation::Copy { source } | FieldOperation::Move { source }, kind) => {
                if source.is_empty() {
                    return Err(SiteMatterError::invalid_request(
                        "copy/move source field name is empty",
                    ));
                }
                if *source == field.name {
                    return Err(SiteMatterError::invalid_request(format!(
                        "cannot {} '{}' onto itself",
                        operation.name(),
                        source
                    )));
                }
                let source_kind = infer_kind(source, kind);
                if source_kind != kind {
                    return Err(SiteMatterError::kind_mismatch(
                        source.as_str(),
                        source_kind,
                        field.name.as_str(),
                        kind,
                    ));
                }
            }
            (FieldOperation::Dump, _) => {}
        }

        Ok(Self { field, operation })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn operation(&self) -> &FieldOperation {
        &self.operation
    }
}

/// Split a comma separated argument into a set of trimmed, non-empty items
pub fn split_items(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
