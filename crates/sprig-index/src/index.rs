//! The staging area.
//!
//! [`StagingArea`] keeps entries in insertion order with at most one entry
//! per path. All operations are in-memory apart from blob writes; durability
//! of the table itself is the caller's job (see [`crate::IndexFile`]).

use std::borrow::Cow;
use std::sync::Arc;

use sprig_store::{Blob, ObjectStore};
use tracing::debug;

use crate::entry::StagingEntry;
use crate::error::{IndexError, IndexResult};

/// Rewrite Windows separators to `/`. Elsewhere a backslash is an ordinary
/// file-name character and is left alone.
pub fn unify_separators(path: &str) -> Cow<'_, str> {
    if cfg!(windows) {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Normalize a repository-relative path to its canonical staged form.
///
/// Separators are unified (see [`unify_separators`]), empty and `.`
/// components are dropped. Absolute paths and `..` components are
/// rejected; resolving those against a real directory is the caller's
/// responsibility.
pub fn normalize_path(path: &str) -> IndexResult<String> {
    let unified = unify_separators(path);
    if unified.starts_with('/') {
        return Err(IndexError::InvalidPath(format!("absolute path: {path}")));
    }
    let mut parts = Vec::new();
    for component in unified.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                return Err(IndexError::InvalidPath(format!(
                    "parent traversal in path: {path}"
                )))
            }
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return Err(IndexError::InvalidPath("empty path".to_string()));
    }
    Ok(parts.join("/"))
}

/// The staging area: which paths go into the next commit, and with what
/// content.
pub struct StagingArea {
    entries: Vec<StagingEntry>,
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for StagingArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingArea")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl StagingArea {
    /// Create an empty staging area backed by the given store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            entries: Vec::new(),
            store,
        }
    }

    /// Rebuild a staging area from previously persisted entries.
    ///
    /// Later duplicates of a path win, matching what staging them in order
    /// would have produced.
    pub fn with_entries(store: Arc<dyn ObjectStore>, entries: Vec<StagingEntry>) -> Self {
        let mut area = Self::new(store);
        for entry in entries {
            area.insert(entry);
        }
        area
    }

    /// Number of staged paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by path.
    pub fn get(&self, path: &str) -> Option<&StagingEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Entries in staging order.
    pub fn entries(&self) -> &[StagingEntry] {
        &self.entries
    }

    /// Owned copy of the entries in staging order.
    pub fn list(&self) -> Vec<StagingEntry> {
        self.entries.clone()
    }

    /// Staged paths in staging order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    /// Stage `content` under `path`.
    ///
    /// The content is written to the object store first; only then is the
    /// entry recorded. An existing entry for the same path is replaced and
    /// the path moves to the end of the staging order.
    pub fn stage(&mut self, path: &str, content: &[u8]) -> IndexResult<StagingEntry> {
        let path = normalize_path(path)?;
        let object_id = self.store.write(&Blob::new(content.to_vec()))?;
        let entry = StagingEntry::new(path, object_id, content.len() as u64);
        debug!(path = %entry.path, digest = %object_id, "path staged");
        self.insert(entry.clone());
        Ok(entry)
    }

    /// Remove the entry for `path`. Returns whether an entry was removed;
    /// unstaging a path that is not staged is not an error.
    pub fn unstage(&mut self, path: &str) -> bool {
        let Ok(path) = normalize_path(path) else {
            return false;
        };
        let before = self.entries.len();
        self.entries.retain(|e| e.path != path);
        let removed = self.entries.len() != before;
        if removed {
            debug!(%path, "path unstaged");
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert(&mut self, entry: StagingEntry) {
        self.entries.retain(|e| e.path != entry.path);
        self.entries.push(entry);
    }
}
