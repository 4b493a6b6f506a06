use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use sprig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::Blob;
use crate::traits::ObjectStore;

/// Object store that lives only as long as the process.
///
/// Blobs sit in an ordered map, so [`ObjectStore::ids`] comes back sorted
/// without extra work.
#[derive(Default)]
pub struct InMemoryObjectStore {
    blobs: RwLock<BTreeMap<ObjectId, Blob>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<ObjectId, Blob>>> {
        self.blobs.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn table_mut(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<ObjectId, Blob>>> {
        self.blobs.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Blob>> {
        Ok(self.table()?.get(id).cloned())
    }

    fn write(&self, blob: &Blob) -> StoreResult<ObjectId> {
        let id = blob.compute_id();
        self.table_mut()?
            .entry(id)
            .or_insert_with(|| blob.clone());
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.table()?.contains_key(id))
    }

    fn ids(&self) -> StoreResult<Vec<ObjectId>> {
        Ok(self.table()?.keys().copied().collect())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.table()?.len())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("blobs", &self.len().unwrap_or_default())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn put_and_get() {
        let store = InMemoryObjectStore::new();
        let id = store.put(b"hello world").unwrap();
        assert_eq!(store.get(&id).unwrap(), b"hello world");
        assert!(store.exists(&id).unwrap());
    }

    #[test]
    fn put_is_idempotent() {
        let store = InMemoryObjectStore::new();
        let id1 = store.put(b"same").unwrap();
        let id2 = store.put(b"same").unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryObjectStore::new();
        let missing = Blob::new(b"never stored".to_vec()).compute_id();
        assert!(store.read(&missing).unwrap().is_none());
        let err = store.get(&missing).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == missing));
    }

    #[test]
    fn ids_are_sorted() {
        let store = InMemoryObjectStore::new();
        for content in [&b"c"[..], b"a", b"b"] {
            store.put(content).unwrap();
        }
        let ids = store.ids().unwrap();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 3);
    }

    proptest! {
        #[test]
        fn get_returns_what_put_stored(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let store = InMemoryObjectStore::new();
            let id = store.put(&data).unwrap();
            prop_assert_eq!(store.get(&id).unwrap(), data);
        }
    }
}
