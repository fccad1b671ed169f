//! Filesystem helpers: reading, atomic writing and file times

use crate::error::{Result, SiteMatterError};
use std::fs::{self, File, FileTimes};
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;
use tempfile::NamedTempFile;

/// Whether `path` names a content file (`.md`)
pub fn is_content_file(path: &Path) -> bool {
    path.extension().map(|ext| ext == "md").unwrap_or(false)
}

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(SiteMatterError::Io)
}

/// Replace the contents of `path` through a temporary file in the same
/// directory, keeping the original permissions
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;

    if let Some(permissions) = permissions {
        fs::set_permissions(temp_file.path(), permissions)?;
    }

    temp_file.persist(path).map_err(|e| {
        SiteMatterError::Io(std::io::Error::other(format!(
            "Failed to persist temporary file: {}",
            e
        )))
    })?;

    Ok(())
}

/// Last modification time of `path`
pub fn modified_time(path: &Path) -> Result<SystemTime> {
    Ok(fs::metadata(path)?.modified()?)
}

/// Set both access and modification time of `path` to `time`
///
/// Owning the file is enough on Unix; it does not have to be writable.
pub fn set_file_times(path: &Path, time: SystemTime) -> Result<()> {
    #[cfg(unix)]
    let file = File::open(path)?;
    #[cfg(not(unix))]
    let file = File::options().write(true).open(path)?;
    file.set_times(FileTimes::new().set_accessed(time).set_modified(time))?;
    Ok(())
}
