//! Field mutation engine: list edits, label assignment, copy/move and dump

use crate::core::{Document, Field, FieldKind, FieldOperation, FieldRequest};
use crate::error::Result;
use crate::ops::{status_prefix, BatchSummary};
use log::{debug, error, warn};
use std::collections::BTreeSet;
use std::io::Write;

/// Values seen while dumping a field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpReport {
    /// Number of documents inspected
    pub documents: usize,
    /// Documents whose front matter could not be parsed
    pub skipped: usize,
    /// Distinct values across all documents
    pub values: BTreeSet<String>,
}

/// One field write a change consists of
#[derive(Debug, Clone, PartialEq, Eq)]
enum Update {
    List(String, BTreeSet<String>),
    Label(String, Option<String>),
}

/// A computed, not yet applied, change to one document
#[derive(Debug, Clone, PartialEq, Eq)]
struct Change {
    headline: String,
    details: Vec<String>,
    updates: Vec<Update>,
}

impl Change {
    fn apply(self, doc: &mut Document) {
        for update in self.updates {
            match update {
                Update::List(field, values) => doc.set_list(&field, values),
                Update::Label(field, value) => doc.set_scalar(&field, value.as_deref()),
            }
        }
    }
}

/// Run a mutating field request over `docs`
///
/// A dump request is reported through [`dump_field`] and never counts
/// anything as modified. Documents in `docs` only change when their save
/// succeeds. Per-document failures are tallied; any other error aborts the
/// batch.
pub fn apply_field_request(
    docs: &mut [Document],
    request: &FieldRequest,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::new(docs.len());

    if !request.operation().is_mutating() {
        let report = dump_field(docs, request.field(), out)?;
        summary.skipped = report.skipped;
        return Ok(summary);
    }

    for doc in docs.iter_mut() {
        let name = doc.file_name();

        if doc.is_corrupt() {
            warn!("Skipping {}: front matter could not be parsed", doc.path().display());
            writeln!(out, "[SKIP] {}: front matter could not be parsed", name)?;
            summary.skipped += 1;
            continue;
        }

        let Some(change) = plan(doc, request.field(), request.operation()) else {
            debug!("No change for {}", name);
            continue;
        };

        writeln!(out, "{}{}", status_prefix(dry_run), change.headline)?;
        for line in &change.details {
            writeln!(out, "  {}", line)?;
        }

        if dry_run {
            summary.modified += 1;
            continue;
        }

        let mut updated = doc.clone();
        change.apply(&mut updated);
        match updated.save() {
            Ok(()) => {
                *doc = updated;
                summary.modified += 1;
            }
            Err(e) if e.is_recoverable() => {
                error!("Failed to save {}: {}", doc.path().display(), e);
                writeln!(out, "  ERROR: Failed to save: {}", e)?;
                summary.errors += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

fn plan(doc: &Document, field: &Field, operation: &FieldOperation) -> Option<Change> {
    let name = doc.file_name();
    match (operation, field.kind) {
        (FieldOperation::Edit { add, remove }, _) => edit_list(doc, &name, &field.name, add, remove),
        (FieldOperation::Assign { value, clear }, _) => {
            let wanted = match (value, clear) {
                (Some(v), _) => Some(v.clone()),
                (None, true) => None,
                (None, false) => return None,
            };
            assign_label(doc, &name, &field.name, wanted)
        }
        (FieldOperation::Copy { source }, FieldKind::List) => {
            transfer_list(doc, &name, source, &field.name, false)
        }
        (FieldOperation::Move { source }, FieldKind::List) => {
            transfer_list(doc, &name, source, &field.name, true)
        }
        (FieldOperation::Copy { source }, FieldKind::Label) => {
            transfer_label(doc, &name, source, &field.name, false)
        }
        (FieldOperation::Move { source }, FieldKind::Label) => {
            transfer_label(doc, &name, source, &field.name, true)
        }
        (FieldOperation::Dump, _) => None,
    }
}

fn edit_list(
    doc: &Document,
    name: &str,
    field: &str,
    add: &BTreeSet<String>,
    remove: &BTreeSet<String>,
) -> Option<Change> {
    let current: BTreeSet<String> = doc.get_list(field).into_iter().collect();
    let updated: BTreeSet<String> = current
        .union(add)
        .filter(|item| !remove.contains(*item))
        .cloned()
        .collect();

    if updated == current {
        return None;
    }

    let added: BTreeSet<&String> = updated.difference(&current).collect();
    let removed: BTreeSet<&String> = current.difference(&updated).collect();
    let mut changes = Vec::new();
    if !added.is_empty() {
        changes.push(format!("+{:?}", added));
    }
    if !removed.is_empty() {
        changes.push(format!("-{:?}", removed));
    }

    Some(Change {
        headline: format!("Modifying {}: {}", name, changes.join(" ")),
        details: vec![format!("{}: {:?} -> {:?}", field, current, updated)],
        updates: vec![Update::List(field.to_string(), updated)],
    })
}

fn assign_label(doc: &Document, name: &str, field: &str, wanted: Option<String>) -> Option<Change> {
    let current = doc.get_scalar(field);
    if current == wanted {
        return None;
    }

    Some(Change {
        headline: format!("Modifying {}", name),
        details: vec![format!(
            "{}: {} -> {}",
            field,
            show_label(current.as_deref()),
            show_label_target(wanted.as_deref())
        )],
        updates: vec![Update::Label(field.to_string(), wanted)],
    })
}

fn transfer_list(
    doc: &Document,
    name: &str,
    source: &str,
    dest: &str,
    remove_source: bool,
) -> Option<Change> {
    let from: BTreeSet<String> = doc.get_list(source).into_iter().collect();
    let current: BTreeSet<String> = doc.get_list(dest).into_iter().collect();
    let merged: BTreeSet<String> = current.union(&from).cloned().collect();

    let dest_changed = merged != current;
    let source_changed = remove_source && !from.is_empty();
    if !dest_changed && !source_changed {
        return None;
    }

    let mut details = vec![format!("{}: {:?} -> {:?}", dest, current, merged)];
    let mut updates = vec![Update::List(dest.to_string(), merged)];
    if source_changed {
        details.push(format!("{}: {:?} -> (removed)", source, from));
        updates.push(Update::List(source.to_string(), BTreeSet::new()));
    }

    Some(Change {
        headline: format!("{} {}: {} -> {}", verb(remove_source), name, source, dest),
        details,
        updates,
    })
}

fn transfer_label(
    doc: &Document,
    name: &str,
    source: &str,
    dest: &str,
    remove_source: bool,
) -> Option<Change> {
    let from = doc.get_scalar(source)?;
    let current = doc.get_scalar(dest);

    let dest_changed = current.as_deref() != Some(from.as_str());
    if !dest_changed && !remove_source {
        return None;
    }

    let mut details = vec![format!(
        "{}: {} -> {}",
        dest,
        show_label(current.as_deref()),
        show_label(Some(from.as_str()))
    )];
    let mut updates = vec![Update::Label(dest.to_string(), Some(from.clone()))];
    if remove_source {
        details.push(format!("{}: {} -> (removed)", source, show_label(Some(from.as_str()))));
        updates.push(Update::Label(source.to_string(), None));
    }

    Some(Change {
        headline: format!("{} {}: {} -> {}", verb(remove_source), name, source, dest),
        details,
        updates,
    })
}

fn verb(remove_source: bool) -> &'static str {
    if remove_source {
        "Moving"
    } else {
        "Copying"
    }
}

fn show_label(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("'{}'", v),
        None => "(unset)".to_string(),
    }
}

fn show_label_target(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("'{}'", v),
        None => "(removed)".to_string(),
    }
}

/// Print the current value(s) of `field` for every document, then the
/// distinct values seen
pub fn dump_field(docs: &[Document], field: &Field, out: &mut dyn Write) -> Result<DumpReport> {
    let mut report = DumpReport::default();

    for doc in docs {
        report.documents += 1;
        writeln!(out, "{}:", doc.file_name())?;

        if doc.is_corrupt() {
            writeln!(out, "  [SKIP] front matter could not be parsed")?;
            report.skipped += 1;
            continue;
        }

        match field.kind {
            FieldKind::List => {
                let items = doc.get_list(&field.name);
                if items.is_empty() {
                    writeln!(out, "  {}: (not found or empty)", field.name)?;
                } else {
                    writeln!(out, "  {}: {:?}", field.name, items)?;
                    report.values.extend(items);
                }
            }
            FieldKind::Label => match doc.get_scalar(&field.name) {
                Some(value) => {
                    writeln!(out, "  {}: '{}'", field.name, value)?;
                    report.values.insert(value);
                }
                None => writeln!(out, "  {}: (not found)", field.name)?,
            },
        }
    }

    writeln!(out)?;
    writeln!(out, "Summary: {} unique values", report.values.len())?;
    if !report.values.is_empty() {
        writeln!(out, "All values: {:?}", report.values)?;
    }

    Ok(report)
}
