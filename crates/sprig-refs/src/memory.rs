use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{RefError, Result};
use crate::names::validate_branch_name;
use crate::traits::RefStore;
use crate::types::Ref;

#[derive(Debug, Default)]
struct Table {
    branches: BTreeMap<String, Ref>,
    head: Option<String>,
}

/// [`RefStore`] kept in process memory. Branches and `HEAD` share one lock,
/// so a reader never sees `HEAD` naming a branch that is half written.
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    table: RwLock<Table>,
}

impl InMemoryRefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding one unborn branch, with `HEAD` on it.
    pub fn with_branch(branch: &str) -> Result<Self> {
        let store = Self::new();
        store.write_ref(&Ref::unborn(branch))?;
        store.set_head(branch)?;
        Ok(store)
    }

    fn update<T>(&self, op: impl FnOnce(&mut Table) -> T) -> Result<T> {
        let mut table = self.table.write().map_err(|_| RefError::LockPoisoned)?;
        Ok(op(&mut table))
    }

    fn inspect<T>(&self, op: impl FnOnce(&Table) -> T) -> Result<T> {
        let table = self.table.read().map_err(|_| RefError::LockPoisoned)?;
        Ok(op(&table))
    }
}

impl RefStore for InMemoryRefStore {
    fn read_ref(&self, name: &str) -> Result<Option<Ref>> {
        self.inspect(|t| t.branches.get(name).cloned())
    }

    fn write_ref(&self, reference: &Ref) -> Result<()> {
        validate_branch_name(&reference.name)?;
        self.update(|t| {
            t.branches.insert(reference.name.clone(), reference.clone());
        })
    }

    fn head(&self) -> Result<Option<String>> {
        self.inspect(|t| t.head.clone())
    }

    fn set_head(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        self.update(|t| t.head = Some(branch.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_types::ObjectId;

    #[test]
    fn create_and_read_branch_ref() {
        let store = InMemoryRefStore::new();
        let target = ObjectId::from_hash([10; 32]);
        store.write_ref(&Ref::at("main", target)).unwrap();

        let read = store.read_ref("main").unwrap().unwrap();
        assert_eq!(read.target, Some(target));
        assert!(store.read_ref("other").unwrap().is_none());
    }

    #[test]
    fn write_rejects_invalid_name() {
        let store = InMemoryRefStore::new();
        let err = store.write_ref(&Ref::unborn("bad..name")).unwrap_err();
        assert!(matches!(err, RefError::InvalidBranchName { .. }));
    }

    #[test]
    fn head_resolution() {
        let store = InMemoryRefStore::with_branch("main").unwrap();
        assert_eq!(store.head().unwrap().as_deref(), Some("main"));
        assert_eq!(store.resolve_head().unwrap(), None);

        let target = ObjectId::from_hash([3; 32]);
        store.write_ref(&Ref::at("main", target)).unwrap();
        assert_eq!(store.resolve_head().unwrap(), Some(target));
    }

    #[test]
    fn head_ref_without_head_fails() {
        let store = InMemoryRefStore::new();
        assert!(matches!(
            store.head_ref(),
            Err(RefError::NotFound { name }) if name == "HEAD"
        ));
    }
}
