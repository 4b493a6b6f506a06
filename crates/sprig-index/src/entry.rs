//! Staging entry type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sprig_types::ObjectId;

/// A path queued for the next commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingEntry {
    /// Forward-slash path relative to the repository root.
    pub path: String,
    /// Digest of the staged content in the object store.
    pub digest: ObjectId,
    /// Size of the staged content in bytes.
    pub size: u64,
    /// When the path was (last) staged.
    pub staged_at: DateTime<Utc>,
}

impl StagingEntry {
    /// Create an entry stamped with the current time.
    pub fn new(path: impl Into<String>, digest: ObjectId, size: u64) -> Self {
        Self {
            path: path.into(),
            digest,
            size,
            staged_at: Utc::now(),
        }
    }
}
