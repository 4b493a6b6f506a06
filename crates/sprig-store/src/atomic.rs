//! Durable write-then-rename helpers.
//!
//! Every file sprig persists (objects, commit records, refs, the staging
//! table, config) goes through [`write_atomic_in`]. A reader either sees the
//! previous file or the complete new one, never a partial write.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Atomically replace `dest` with `data`, staging the temp file next to it.
pub fn write_atomic(dest: &Path, data: &[u8]) -> io::Result<()> {
    let parent = dest
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    write_atomic_in(parent, dest, data)
}

/// Atomically replace `dest` with `data`, staging the temp file in `tmp_dir`.
///
/// `tmp_dir` must be on the same filesystem as `dest` so the final rename is
/// atomic. The temp file is synced before the rename, and on unix the
/// destination directory is synced after it.
pub fn write_atomic_in(tmp_dir: &Path, dest: &Path, data: &[u8]) -> io::Result<()> {
    fs::create_dir_all(tmp_dir)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = NamedTempFile::new_in(tmp_dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;

    #[cfg(unix)]
    {
        if let Some(parent) = dest.parent() {
            fs::File::open(parent)?.sync_all()?;
        }
    }

    Ok(())
}
