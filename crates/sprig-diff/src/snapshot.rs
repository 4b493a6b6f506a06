//! Diff a working copy against a committed blob.

use sprig_store::{ObjectStore, StoreError};
use sprig_types::ObjectId;

use crate::error::{DiffError, DiffResult};
use crate::unified::UnifiedDiff;

/// Diff `working` against the blob `committed` names.
///
/// With no committed blob the old side is empty, so the result is an
/// all-added diff rather than an error.
pub fn diff_snapshot(
    store: &dyn ObjectStore,
    path: &str,
    committed: Option<&ObjectId>,
    working: &[u8],
) -> DiffResult<UnifiedDiff> {
    let old = match committed {
        Some(id) => store.get(id).map_err(|e| match e {
            StoreError::NotFound(id) => DiffError::ObjectNotFound(id),
            other => other.into(),
        })?,
        None => Vec::new(),
    };
    Ok(UnifiedDiff::new(
        format!("{path} (commit)"),
        format!("{path} (working)"),
        &old,
        working,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_store::InMemoryObjectStore;

    #[test]
    fn diff_against_stored_blob() {
        let store = InMemoryObjectStore::new();
        let id = store.put(b"x\n").unwrap();
        let diff = diff_snapshot(&store, "a.txt", Some(&id), b"x\ny\n").unwrap();
        assert!(diff.render().lines().any(|l| l == "+y"));
    }

    #[test]
    fn never_committed_is_all_added() {
        let store = InMemoryObjectStore::new();
        let diff = diff_snapshot(&store, "new.txt", None, b"a\nb\n").unwrap();
        assert_eq!(diff.diff.additions(), 2);
        assert_eq!(diff.diff.deletions(), 0);
    }

    #[test]
    fn missing_blob_is_reported() {
        let store = InMemoryObjectStore::new();
        let id = ObjectId::from_hash([3; 32]);
        assert!(matches!(
            diff_snapshot(&store, "a.txt", Some(&id), b""),
            Err(DiffError::ObjectNotFound(missing)) if missing == id
        ));
    }
}
