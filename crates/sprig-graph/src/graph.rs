//! Commit creation, lookup and history traversal.
//!
//! # Publish order
//!
//! A commit becomes visible in three steps: the record is written, the ref
//! is moved to it, then the staging area is cleared. Everything before the
//! record write is read-only, so a failed validation leaves staging and the
//! ref untouched. If the ref update fails the record is removed again; a
//! leftover record that no ref names is harmless.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sprig_index::StagingArea;
use sprig_refs::{Ref, RefStore};
use sprig_store::{ObjectStore, StoreError};
use sprig_types::{is_hex_prefix, ObjectId, HEX_LEN};
use tracing::{debug, info, warn};

use crate::commit::{commit_timestamp, Commit};
use crate::error::{GraphError, GraphResult};
use crate::traits::CommitStore;

/// Shortest commit-id prefix accepted by [`CommitGraph::find`].
pub const MIN_PREFIX_LEN: usize = 4;

/// The single-parent commit chain over an object store, a commit store and
/// a ref store.
pub struct CommitGraph {
    objects: Arc<dyn ObjectStore>,
    commits: Arc<dyn CommitStore>,
    refs: Arc<dyn RefStore>,
}

impl std::fmt::Debug for CommitGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitGraph").finish_non_exhaustive()
    }
}

impl CommitGraph {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        commits: Arc<dyn CommitStore>,
        refs: Arc<dyn RefStore>,
    ) -> Self {
        Self {
            objects,
            commits,
            refs,
        }
    }

    /// Commit everything in `staging` on top of HEAD, stamped with the
    /// current time.
    pub fn commit(
        &self,
        staging: &mut StagingArea,
        message: &str,
        author: &str,
    ) -> GraphResult<Commit> {
        self.commit_at(staging, message, author, Utc::now())
    }

    /// Commit with an explicit timestamp.
    ///
    /// Two commits with the same message, time, parent and staged files get
    /// the same id whatever order the files were staged in.
    pub fn commit_at(
        &self,
        staging: &mut StagingArea,
        message: &str,
        author: &str,
        at: DateTime<Utc>,
    ) -> GraphResult<Commit> {
        if message.trim().is_empty() {
            return Err(GraphError::EmptyMessage);
        }
        if staging.is_empty() {
            return Err(GraphError::NothingStaged);
        }

        let mut files = BTreeMap::new();
        for entry in staging.entries() {
            self.load_blob(&entry.path, &entry.digest)?;
            files.insert(entry.path.clone(), entry.digest);
        }

        let head = self.refs.head_ref()?;
        let commit = Commit::new(message, author, commit_timestamp(at), head.target, files)?;

        self.commits.write(&commit)?;
        if let Err(err) = self.refs.write_ref(&Ref::at(head.name.as_str(), commit.id)) {
            if let Err(cleanup) = self.commits.delete(&commit.id) {
                warn!(id = %commit.id.short_hex(), error = %cleanup, "orphan commit record left behind");
            }
            return Err(err.into());
        }
        staging.clear();

        info!(
            id = %commit.id.short_hex(),
            parent = ?commit.parent.map(|p| p.short_hex()),
            branch = %head.name,
            files = commit.files.len(),
            "commit published"
        );
        Ok(commit)
    }

    /// Fetch a commit by exact id.
    pub fn get(&self, id: &ObjectId) -> GraphResult<Commit> {
        self.commits
            .read(id)?
            .ok_or_else(|| GraphError::CommitNotFound(id.to_hex()))
    }

    /// Resolve `HEAD`, a full id, or a unique hex prefix of at least
    /// [`MIN_PREFIX_LEN`] characters.
    pub fn find(&self, rev: &str) -> GraphResult<Commit> {
        let rev = rev.trim();
        if rev.eq_ignore_ascii_case("HEAD") {
            return self
                .head()?
                .ok_or_else(|| GraphError::CommitNotFound(rev.to_string()));
        }
        if rev.len() == HEX_LEN {
            if let Ok(id) = ObjectId::from_hex(rev) {
                return self.get(&id);
            }
        }
        if rev.len() < MIN_PREFIX_LEN || !is_hex_prefix(rev) {
            return Err(GraphError::CommitNotFound(rev.to_string()));
        }

        let candidates: Vec<ObjectId> = self
            .commits
            .ids()?
            .into_iter()
            .filter(|id| id.has_hex_prefix(rev))
            .collect();
        match candidates.len() {
            0 => Err(GraphError::CommitNotFound(rev.to_string())),
            1 => self.get(&candidates[0]),
            _ => Err(GraphError::AmbiguousPrefix {
                prefix: rev.to_string(),
                candidates,
            }),
        }
    }

    /// The commit HEAD points at, or `None` before the first commit.
    pub fn head(&self) -> GraphResult<Option<Commit>> {
        match self.refs.resolve_head()? {
            Some(id) => self.get(&id).map(Some),
            None => Ok(None),
        }
    }

    /// The ref HEAD names.
    pub fn current_ref(&self) -> GraphResult<Ref> {
        Ok(self.refs.head_ref()?)
    }

    /// Commits from HEAD backwards, newest first.
    ///
    /// Stops after `limit` commits, or at the root when `limit` is `None`.
    /// A parent that cannot be loaded is an error, not the end of history.
    pub fn history(&self, limit: Option<usize>) -> GraphResult<Vec<Commit>> {
        let limit = limit.unwrap_or(usize::MAX);
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut next = self.refs.resolve_head()?;

        while let Some(id) = next {
            if out.len() >= limit {
                break;
            }
            if !seen.insert(id) {
                return Err(GraphError::Corrupt {
                    id: id.to_hex(),
                    reason: "parent chain loops".into(),
                });
            }
            let commit = self.get(&id)?;
            next = commit.parent;
            out.push(commit);
        }
        debug!(returned = out.len(), "history walked");
        Ok(out)
    }

    /// Number of stored commits.
    pub fn count(&self) -> GraphResult<usize> {
        self.commits.count()
    }

    /// Content of `path` as recorded in `commit`.
    pub fn file_at(&self, commit: &Commit, path: &str) -> GraphResult<Vec<u8>> {
        let id = commit.file(path).ok_or_else(|| GraphError::PathNotInCommit {
            commit: commit.id,
            path: path.to_string(),
        })?;
        self.load_blob(path, id)
    }

    fn load_blob(&self, path: &str, id: &ObjectId) -> GraphResult<Vec<u8>> {
        self.objects.get(id).map_err(|e| match e {
            StoreError::NotFound(id) => GraphError::ObjectNotFound {
                path: path.to_string(),
                id,
            },
            other => other.into(),
        })
    }
}
