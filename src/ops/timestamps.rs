//! Aligning file modification times with the metadata `date`

use crate::core::Document;
use crate::error::{Result, SiteMatterError};
use crate::io::fs::{modified_time, set_file_times};
use crate::ops::{status_prefix, BatchSummary};
use chrono::{DateTime, Local, NaiveDateTime, SubsecRound, TimeZone};
use log::{debug, error};
use std::io::Write;
use std::time::SystemTime;

const REPORT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Set each document's access and modification time to its metadata date
///
/// Dates carry no timezone and are read as local time. Both sides are
/// compared at whole-second resolution, so a synchronized file is left alone.
pub fn sync_timestamps(
    docs: &[Document],
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::new(docs.len());

    for doc in docs {
        let name = doc.file_name();

        let Some(date) = doc.get_date() else {
            writeln!(out, "[SKIP] {}: No valid date in frontmatter", name)?;
            summary.skipped += 1;
            continue;
        };
        let target = date.trunc_subsecs(0);

        let mtime = match modified_time(doc.path()) {
            Ok(t) => DateTime::<Local>::from(t).naive_local().trunc_subsecs(0),
            Err(e) if e.is_recoverable() => {
                error!("Failed to stat {}: {}", doc.path().display(), e);
                writeln!(out, "[ERROR] {}: {}", name, e)?;
                summary.errors += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        if mtime == target {
            debug!("{} already synchronized", name);
            continue;
        }

        writeln!(out, "{}{}:", status_prefix(dry_run), name)?;
        writeln!(out, "  Frontmatter date: {}", target.format(REPORT_FORMAT))?;
        writeln!(out, "  File mtime:       {}", mtime.format(REPORT_FORMAT))?;
        writeln!(out, "  -> Setting file mtime to match frontmatter date")?;

        if dry_run {
            summary.modified += 1;
            continue;
        }

        let result = match local_system_time(&target) {
            Some(time) => set_file_times(doc.path(), time),
            None => Err(SiteMatterError::Io(std::io::Error::other(format!(
                "{} does not exist in local time",
                target
            )))),
        };

        match result {
            Ok(()) => summary.modified += 1,
            Err(e) if e.is_recoverable() => {
                error!("Failed to update file time of {}: {}", doc.path().display(), e);
                writeln!(out, "  ERROR: Failed to update file time: {}", e)?;
                summary.errors += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

/// Interpret a naive date as local time; ambiguous times take the earlier one
fn local_system_time(naive: &NaiveDateTime) -> Option<SystemTime> {
    Local
        .from_local_datetime(naive)
        .earliest()
        .map(SystemTime::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn local_mtime(path: &std::path::Path) -> NaiveDateTime {
        DateTime::<Local>::from(modified_time(path).unwrap()).naive_local()
    }

    fn write_doc(dir: &TempDir, name: &str, content: &str) -> Document {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        Document::read(&path).unwrap()
    }

    fn run(docs: &[Document], dry_run: bool) -> (BatchSummary, String) {
        let mut out = Vec::new();
        let summary = sync_timestamps(docs, dry_run, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    fn expected() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn age(doc: &Document) {
        let old = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        set_file_times(doc.path(), local_system_time(&old).unwrap()).unwrap();
    }

    #[test]
    fn test_sync_sets_mtime_then_is_noop() {
        let dir = TempDir::new().unwrap();
        let doc = write_doc(&dir, "p.md", "---\ndate: 2023-06-15 14:30:00\n---\n");
        age(&doc);

        let docs = vec![doc];
        let (first, report) = run(&docs, false);
        assert_eq!(first.modified, 1);
        assert!(report.contains("Frontmatter date: 2023-06-15 14:30:00"));
        assert!(report.contains("File mtime:       2020-01-01 00:00:00"));
        assert_eq!(local_mtime(docs[0].path()), expected());

        let (second, report) = run(&docs, false);
        assert_eq!(
            second,
            BatchSummary {
                selected: 1,
                modified: 0,
                skipped: 0,
                errors: 0
            }
        );
        assert!(report.is_empty());
    }

    #[test]
    fn test_dry_run_leaves_mtime() {
        let dir = TempDir::new().unwrap();
        let doc = write_doc(&dir, "p.md", "---\ndate: 2023-06-15T14:30:00Z\n---\n");
        age(&doc);

        let docs = vec![doc];
        let (summary, report) = run(&docs, true);
        assert_eq!(summary.modified, 1);
        assert!(report.starts_with("[DRY RUN] p.md:"));
        assert_eq!(local_mtime(docs[0].path()).date(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn test_undated_documents_are_skipped() {
        let dir = TempDir::new().unwrap();
        let docs = vec![
            write_doc(&dir, "a.md", "---\ntitle: No date\n---\n"),
            write_doc(&dir, "b.md", "---\ndate: sometime\n---\n"),
        ];
        let (summary, report) = run(&docs, false);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.modified, 0);
        assert!(report.contains("[SKIP] a.md: No valid date in frontmatter"));
    }

    #[cfg(unix)]
    #[test]
    fn test_sync_read_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let doc = write_doc(&dir, "p.md", "---\ndate: 2023-06-15 14:30:00\n---\n");
        age(&doc);
        fs::set_permissions(doc.path(), fs::Permissions::from_mode(0o444)).unwrap();

        let docs = vec![doc];
        let (summary, _) = run(&docs, false);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.modified, 1);
        assert_eq!(local_mtime(docs[0].path()), expected());
    }

    #[test]
    fn test_vanished_file_counts_as_error() {
        let dir = TempDir::new().unwrap();
        let doc = write_doc(&dir, "gone.md", "---\ndate: 2023-06-15\n---\n");
        fs::remove_file(doc.path()).unwrap();

        let (summary, _) = run(&[doc], false);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.modified, 0);
    }
}
