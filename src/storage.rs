//! Output file replacement.
//!
//! The target is never truncated in place: bytes go to a temporary file in
//! the same directory, which is flushed and renamed over the target. On
//! failure the temporary file is removed and any previous file survives.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::error::{Result, TouchMcuError};

/// Atomically replace `path` with `bytes`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    write_atomic_with(path, |file| file.write_all(bytes))
}

/// Atomically replace `path` with whatever `write` produces.
///
/// `write` receives the temporary file; an error from it aborts the
/// replacement.
pub fn write_atomic_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_error = |source| TouchMcuError::FileWriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    debug!("staging {} via {}", path.display(), temp.path().display());

    // Dropping `temp` on any early return deletes it.
    write(temp.as_file_mut()).map_err(write_error)?;
    temp.as_file_mut().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}
