use std::collections::BTreeMap;
use std::sync::RwLock;

use sprig_types::ObjectId;

use crate::commit::Commit;
use crate::error::{GraphError, GraphResult};
use crate::traits::CommitStore;

/// Commit records in a `BTreeMap`; lost on drop.
#[derive(Debug, Default)]
pub struct InMemoryCommitStore {
    commits: RwLock<BTreeMap<ObjectId, Commit>>,
}

impl InMemoryCommitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommitStore for InMemoryCommitStore {
    fn read(&self, id: &ObjectId) -> GraphResult<Option<Commit>> {
        let commits = self.commits.read().map_err(|_| GraphError::LockPoisoned)?;
        Ok(commits.get(id).cloned())
    }

    fn write(&self, commit: &Commit) -> GraphResult<()> {
        let mut commits = self.commits.write().map_err(|_| GraphError::LockPoisoned)?;
        commits.entry(commit.id).or_insert_with(|| commit.clone());
        Ok(())
    }

    fn delete(&self, id: &ObjectId) -> GraphResult<bool> {
        let mut commits = self.commits.write().map_err(|_| GraphError::LockPoisoned)?;
        Ok(commits.remove(id).is_some())
    }

    fn ids(&self) -> GraphResult<Vec<ObjectId>> {
        let commits = self.commits.read().map_err(|_| GraphError::LockPoisoned)?;
        Ok(commits.keys().copied().collect())
    }

    fn count(&self) -> GraphResult<usize> {
        let commits = self.commits.read().map_err(|_| GraphError::LockPoisoned)?;
        Ok(commits.len())
    }
}
