//! Read-only views returned by [`crate::Repository`].

use serde::Serialize;
use sprig_graph::Commit;
use sprig_types::ObjectId;

/// Repository summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RepoStatus {
    pub initialized: bool,
    /// Full name of the ref HEAD names, e.g. `refs/heads/main`.
    pub current_ref: Option<String>,
    /// The commit that ref points at.
    pub head: Option<ObjectId>,
    pub total_commits: usize,
    /// Staged paths in staging order.
    pub staged_paths: Vec<String>,
}

impl RepoStatus {
    /// Status of a directory that holds no repository.
    pub fn uninitialized() -> Self {
        Self {
            initialized: false,
            current_ref: None,
            head: None,
            total_commits: 0,
            staged_paths: Vec::new(),
        }
    }
}

/// A commit with the size of every file it records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitDetails {
    pub commit: Commit,
    pub files: Vec<FileSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub path: String,
    pub id: ObjectId,
    pub size: u64,
}

/// Outcome of a repository integrity check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FsckReport {
    /// Objects whose bytes did not match their name; they have been deleted.
    pub discarded_objects: Vec<ObjectId>,
    /// Commits reachable from HEAD.
    pub commits_checked: usize,
    /// Blobs a reachable commit names but the store does not hold.
    pub missing_objects: Vec<MissingObject>,
}

impl FsckReport {
    pub fn is_clean(&self) -> bool {
        self.discarded_objects.is_empty() && self.missing_objects.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissingObject {
    pub commit: ObjectId,
    pub path: String,
    pub id: ObjectId,
}
