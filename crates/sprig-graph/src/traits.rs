use sprig_types::ObjectId;

use crate::commit::Commit;
use crate::error::GraphResult;

/// Storage boundary for commit records.
///
/// A record must be fully durable before `write` returns: the graph moves the
/// ref only after that, so a ref never names a missing record.
pub trait CommitStore: Send + Sync {
    /// Read a commit by exact id. `Ok(None)` if absent.
    fn read(&self, id: &ObjectId) -> GraphResult<Option<Commit>>;

    /// Persist a commit under its id. Rewriting an existing id is a no-op.
    fn write(&self, commit: &Commit) -> GraphResult<()>;

    /// Remove a record. Only used to roll back a commit whose ref update
    /// failed. Returns whether a record was removed.
    fn delete(&self, id: &ObjectId) -> GraphResult<bool>;

    /// All stored commit ids, sorted.
    fn ids(&self) -> GraphResult<Vec<ObjectId>>;

    /// Number of stored commits.
    fn count(&self) -> GraphResult<usize> {
        Ok(self.ids()?.len())
    }
}
