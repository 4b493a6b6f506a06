//! The working directory: path resolution and plain file access.
//!
//! Nothing here touches repository state. Every caller-supplied path goes
//! through [`resolve`] first, which pins it inside the repository root
//! before any read or write happens.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use sprig_index::unify_separators;
use walkdir::WalkDir;

use crate::error::{SdkError, SdkResult};
use crate::repository::CONTROL_DIR;

/// A path inside the working directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkPath {
    /// Forward-slash path relative to the root; the staged and committed
    /// form.
    pub rel: String,
    pub abs: PathBuf,
}

/// Resolve `input` (relative to `root`, or absolute) to a path inside
/// `root`.
///
/// `root` must already be canonical. `..` components are resolved
/// lexically and may not climb above the root; the deepest existing
/// ancestor is then canonicalized so a symlink cannot lead outside either.
/// The root itself and anything under the control directory are
/// [`SdkError::InvalidPath`].
pub fn resolve(root: &Path, input: &str) -> SdkResult<WorkPath> {
    let outside = || SdkError::PathOutsideRepository(input.to_string());
    let unified = unify_separators(input).into_owned();
    if unified.trim().is_empty() {
        return Err(SdkError::InvalidPath("empty path".into()));
    }

    let candidate = Path::new(&unified);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    };

    let mut abs = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !abs.pop() {
                    return Err(outside());
                }
            }
            other => abs.push(other.as_os_str()),
        }
    }

    let rel_path = abs.strip_prefix(root).map_err(|_| outside())?;
    let mut parts = Vec::new();
    for component in rel_path.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| SdkError::InvalidPath(format!("non UTF-8 path: {input}")))?;
        parts.push(part);
    }
    match parts.first() {
        None => return Err(SdkError::InvalidPath(format!("{input} names the repository root"))),
        Some(&first) if first == CONTROL_DIR => {
            return Err(SdkError::InvalidPath(format!(
                "{input} is inside the {CONTROL_DIR} directory"
            )))
        }
        Some(_) => {}
    }

    let mut ancestor = abs.as_path();
    loop {
        match fs::symlink_metadata(ancestor) {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                ancestor = ancestor.parent().ok_or_else(outside)?;
            }
            Err(e) => return Err(e.into()),
        }
    }
    let real = ancestor.canonicalize().map_err(|_| outside())?;
    if !real.starts_with(root) {
        return Err(outside());
    }

    Ok(WorkPath {
        rel: parts.join("/"),
        abs,
    })
}

/// Read a working file. A missing path or a directory is
/// [`SdkError::WorkingFileNotFound`].
pub fn read_working_file(path: &WorkPath) -> SdkResult<Vec<u8>> {
    if !path.abs.is_file() {
        return Err(SdkError::WorkingFileNotFound(path.rel.clone()));
    }
    match fs::read(&path.abs) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(SdkError::WorkingFileNotFound(path.rel.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Write a working file, creating parent directories.
pub fn write_working_file(path: &WorkPath, content: &[u8]) -> SdkResult<()> {
    if let Some(parent) = path.abs.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path.abs, content)?;
    Ok(())
}

/// Delete a working file.
pub fn remove_working_file(path: &WorkPath) -> SdkResult<()> {
    match fs::remove_file(&path.abs) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(SdkError::WorkingFileNotFound(path.rel.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Every regular file under `root`, as sorted relative paths.
///
/// Dot-prefixed entries are skipped, which covers the control directory.
/// Symlinks are not followed.
pub fn list_working_files(root: &Path) -> SdkResult<Vec<String>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry.map_err(|e| SdkError::Io(io::Error::other(e.to_string())))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
        if let Some(parts) = parts {
            files.push(parts.join("/"));
        }
    }
    files.sort();
    Ok(files)
}
