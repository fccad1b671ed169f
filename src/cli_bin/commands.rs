//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::{DatetimeArgs, TagArgs};
use anyhow::{Context, Result};
use log::debug;
use sitematter::core::{FieldKind, FieldOperation, Selection};
use sitematter::io::{Collection, Selected};
use sitematter::ops::{apply_field_request, sync_timestamps, BatchSummary};
use std::io::{self, Write};
use std::path::Path;

const RULE: &str = "============================================================";

/// Execute the datetime command
pub fn datetime_command(args: DatetimeArgs) -> Result<BatchSummary> {
    debug!("Executing datetime command with args: {:?}", args);

    let selection = args.selection.to_selection(None);
    selection.validate()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_header(&mut out, "Post Datetime Synchronizer", args.opts.dry_run)?;

    let Some(selected) = load_selected(&args.opts.content_dir, &selection, &mut out)? else {
        return Ok(BatchSummary::default());
    };

    let mut summary = sync_timestamps(&selected.documents, args.opts.dry_run, &mut out)?;
    summary.skipped += selected.unmatched.len();

    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    if args.opts.dry_run {
        writeln!(
            out,
            "[DRY RUN] Would update {} of {} posts",
            summary.modified, summary.selected
        )?;
    } else {
        writeln!(out, "Updated {} of {} posts", summary.modified, summary.selected)?;
    }
    if summary.skipped > 0 {
        writeln!(
            out,
            "Skipped {} posts (no valid date or unmatched path)",
            summary.skipped
        )?;
    }
    if summary.errors > 0 {
        writeln!(out, "Errors: {} posts failed to update", summary.errors)?;
    }
    writeln!(out, "{}", RULE)?;

    Ok(summary)
}

/// Execute the tag command
pub fn tag_command(args: TagArgs) -> Result<BatchSummary> {
    debug!("Executing tag command with args: {:?}", args);

    // everything that can be rejected is rejected before any file is read
    let selection = args.to_selection();
    selection.validate()?;
    let request = args.to_request()?;
    let field = request.field();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_header(
        &mut out,
        &format!("{} Manager", capitalize(&field.name)),
        args.opts.dry_run,
    )?;

    let Some(mut selected) = load_selected(&args.opts.content_dir, &selection, &mut out)? else {
        return Ok(BatchSummary::default());
    };

    match request.operation() {
        FieldOperation::Dump => {
            writeln!(out, "{}", RULE)?;
            writeln!(
                out,
                "Dumping '{}' from {} posts",
                field.name,
                selected.documents.len()
            )?;
            writeln!(out, "{}", RULE)?;
            writeln!(out)?;
        }
        FieldOperation::Edit { add, remove } => {
            if !add.is_empty() {
                writeln!(out, "Adding {}: {:?}", field.name, add)?;
            }
            if !remove.is_empty() {
                writeln!(out, "Removing {}: {:?}", field.name, remove)?;
            }
            writeln!(out)?;
        }
        FieldOperation::Assign { value, .. } => {
            match value {
                Some(v) => writeln!(out, "Setting {}: '{}'", field.name, v)?,
                None => writeln!(out, "Removing {}", field.name)?,
            }
            writeln!(out)?;
        }
        FieldOperation::Copy { source } => {
            writeln!(out, "Copying {} -> {} ({})", source, field.name, kind_name(field.kind))?;
            writeln!(out)?;
        }
        FieldOperation::Move { source } => {
            writeln!(out, "Moving {} -> {} ({})", source, field.name, kind_name(field.kind))?;
            writeln!(out)?;
        }
    }

    let mut summary = apply_field_request(
        &mut selected.documents,
        &request,
        args.opts.dry_run,
        &mut out,
    )?;
    summary.skipped += selected.unmatched.len();

    if request.operation().is_mutating() {
        writeln!(out)?;
        writeln!(out, "{}", RULE)?;
        if args.opts.dry_run {
            writeln!(
                out,
                "[DRY RUN] Would modify {} of {} posts",
                summary.modified, summary.selected
            )?;
        } else {
            writeln!(out, "Modified {} of {} posts", summary.modified, summary.selected)?;
        }
        if summary.skipped > 0 {
            writeln!(out, "Skipped {} posts", summary.skipped)?;
        }
        if summary.errors > 0 {
            writeln!(out, "Errors: {} posts failed to save", summary.errors)?;
        }
    }
    writeln!(out, "{}", RULE)?;

    Ok(summary)
}

/// Load the content directory and apply the selection
///
/// Returns `None` when nothing was selected, after saying so.
fn load_selected(
    content_dir: &Path,
    selection: &Selection,
    out: &mut dyn Write,
) -> Result<Option<Selected>> {
    let collection = Collection::load(content_dir)
        .with_context(|| format!("failed to load posts from {}", content_dir.display()))?;
    writeln!(
        out,
        "Loaded {} posts from {}",
        collection.len(),
        content_dir.display()
    )?;

    let selected = collection.select(selection)?;
    writeln!(out, "Selected {} posts", selected.documents.len())?;
    writeln!(out)?;

    if selected.documents.is_empty() {
        writeln!(out, "No posts selected. Exiting.")?;
        return Ok(None);
    }

    Ok(Some(selected))
}

fn print_header(out: &mut dyn Write, title: &str, dry_run: bool) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", RULE)?;
    if dry_run {
        writeln!(out, "[DRY RUN MODE - No files will be modified]")?;
    }
    writeln!(out)
}

fn kind_name(kind: FieldKind) -> String {
    format!("{} field", kind)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
