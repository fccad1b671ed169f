//! Document selection criteria

use crate::core::document::Document;
use crate::error::{Result, SiteMatterError};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Which documents of a collection an operation applies to
///
/// `all` and `paths` short-circuit everything else; the remaining criteria
/// are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub all: bool,
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Inclusive lower bound on the document date
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound on the document date
    pub to_date: Option<NaiveDate>,
    /// Case-insensitive substring of the metadata block or body
    pub text: Option<String>,
    /// Explicit files to operate on
    pub paths: Vec<PathBuf>,
}

impl Selection {
    /// Select every document
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// Select the given files only
    pub fn paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// True when no criterion has been given
    pub fn is_empty(&self) -> bool {
        !self.all
            && self.title.is_none()
            && self.from_date.is_none()
            && self.to_date.is_none()
            && self.text.is_none()
            && self.paths.is_empty()
    }

    /// Reject a selection without any criterion
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(SiteMatterError::invalid_selection(
                "at least one post selection option is required (--all, --title, --fromdate, --todate, --text, --path)",
            ));
        }
        Ok(())
    }

    /// Whether `doc` satisfies the predicate criteria
    ///
    /// `paths` is resolved against the collection, not here.
    pub fn matches(&self, doc: &Document) -> bool {
        if self.all {
            return true;
        }

        if let Some(pattern) = &self.title {
            if !contains_ignore_case(&doc.title(), pattern) {
                return false;
            }
        }

        if self.from_date.is_some() || self.to_date.is_some() {
            let Some(date) = doc.get_date().map(|dt| dt.date()) else {
                return false;
            };
            if self.from_date.is_some_and(|from| date < from) {
                return false;
            }
            if self.to_date.is_some_and(|to| date > to) {
                return false;
            }
        }

        if let Some(pattern) = &self.text {
            if !contains_ignore_case(&doc.full_text(), pattern) {
                return false;
            }
        }

        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
