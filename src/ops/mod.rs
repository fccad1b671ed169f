//! Batch operations over selected documents
//!
//! Every operation writes its human-readable report to a caller supplied
//! sink and returns a [`BatchSummary`]. Dry runs go through exactly the same
//! code path and only skip persistence.

pub mod fields;
pub mod timestamps;

pub use fields::{apply_field_request, dump_field, DumpReport};
pub use timestamps::sync_timestamps;

use std::fmt;

/// Tally of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub selected: usize,
    pub modified: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub fn new(selected: usize) -> Self {
        Self {
            selected,
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selected {}, modified {}, skipped {}, errors {}",
            self.selected, self.modified, self.skipped, self.errors
        )
    }
}

/// Prefix for per-document report lines
pub(crate) fn status_prefix(dry_run: bool) -> &'static str {
    if dry_run {
        "[DRY RUN] "
    } else {
        ""
    }
}
