//! Filesystem-backed object store.
//!
//! Layout under the store root:
//!
//! ```text
//! objects/
//!     ab/cdef...        raw blob bytes, named by the remaining 62 hex chars
//!     tmp/              in-flight writes, renamed into place when complete
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sprig_types::ObjectId;
use tracing::{debug, warn};

use crate::atomic::write_atomic_in;
use crate::error::{StoreError, StoreResult};
use crate::object::Blob;
use crate::traits::ObjectStore;

const TMP_DIR: &str = "tmp";

/// One-file-per-object store with a two-character fan-out.
#[derive(Debug)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// Any temp files left behind by an interrupted write are deleted: they
    /// were never renamed into place, so no digest refers to them.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self { root: root.into() };
        fs::create_dir_all(store.tmp_dir())?;
        store.recover()?;
        Ok(store)
    }

    /// The store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tmp_dir(&self) -> PathBuf {
        self.root.join(TMP_DIR)
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        let (fan, rest) = hex.split_at(2);
        self.root.join(fan).join(rest)
    }

    fn recover(&self) -> StoreResult<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(self.tmp_dir())? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                warn!(path = %entry.path().display(), "discarding incomplete object write");
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Re-hash every stored object and delete those whose content no longer
    /// matches their name. Returns the ids that were discarded.
    pub fn verify_all(&self) -> StoreResult<Vec<ObjectId>> {
        let mut discarded = Vec::new();
        for id in self.ids()? {
            let path = self.object_path(&id);
            let blob = Blob::new(fs::read(&path)?);
            if !blob.matches(&id) {
                warn!(%id, "discarding corrupt object");
                fs::remove_file(&path)?;
                discarded.push(id);
            }
        }
        Ok(discarded)
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Blob>> {
        let data = match fs::read(self.object_path(id)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let blob = Blob::new(data);
        if !blob.matches(id) {
            return Err(StoreError::HashMismatch {
                id: *id,
                computed: blob.compute_id(),
            });
        }
        Ok(Some(blob))
    }

    fn write(&self, blob: &Blob) -> StoreResult<ObjectId> {
        let id = blob.compute_id();
        let path = self.object_path(&id);
        match fs::read(&path) {
            Ok(existing) if Blob::new(existing.clone()).matches(&id) => {
                debug!(%id, "object already stored");
                return Ok(id);
            }
            Ok(_) => warn!(%id, "rewriting corrupt object"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        write_atomic_in(&self.tmp_dir(), &path, &blob.data)?;
        debug!(%id, size = blob.size(), "object written");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn ids(&self) -> StoreResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for fan in fs::read_dir(&self.root)? {
            let fan = fan?;
            let fan_name = fan.file_name().to_string_lossy().into_owned();
            if fan_name == TMP_DIR || !fan.file_type()?.is_dir() {
                continue;
            }
            for entry in fs::read_dir(fan.path())? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                match ObjectId::from_hex(&format!("{fan_name}{name}")) {
                    Ok(id) => ids.push(id),
                    Err(_) => debug!(path = %entry.path().display(), "skipping foreign file"),
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path().join("objects")).unwrap();
        (dir, store)
    }

    #[test]
    fn put_get_roundtrip() {
        let (_dir, store) = temp_store();
        let id = store.put(b"hello\n").unwrap();
        assert_eq!(store.get(&id).unwrap(), b"hello\n");
        assert!(store.exists(&id).unwrap());
    }

    #[test]
    fn binary_content_is_byte_exact() {
        let (_dir, store) = temp_store();
        let data = vec![0u8, 0xff, 0xfe, b'\r', b'\n', 0x80];
        let id = store.put(&data).unwrap();
        assert_eq!(store.get(&id).unwrap(), data);
    }

    #[test]
    fn put_twice_stores_once() {
        let (_dir, store) = temp_store();
        let id1 = store.put(b"dup").unwrap();
        let id2 = store.put(b"dup").unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.ids().unwrap(), vec![id1]);
    }

    #[test]
    fn missing_object_is_not_found() {
        let (_dir, store) = temp_store();
        let id = Blob::new(b"absent".to_vec()).compute_id();
        assert!(!store.exists(&id).unwrap());
        assert!(matches!(store.get(&id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn objects_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = FsObjectStore::open(dir.path()).unwrap();
            store.put(b"persistent").unwrap()
        };
        let store = FsObjectStore::open(dir.path()).unwrap();
        assert_eq!(store.get(&id).unwrap(), b"persistent");
    }

    #[test]
    fn truncated_object_is_rejected_on_read() {
        let (_dir, store) = temp_store();
        let id = store.put(b"full content").unwrap();
        fs::write(store.object_path(&id), b"full").unwrap();
        let err = store.get(&id).unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { .. }));
    }

    #[test]
    fn restaging_repairs_corrupt_object() {
        let (_dir, store) = temp_store();
        let id = store.put(b"payload").unwrap();
        fs::write(store.object_path(&id), b"pay").unwrap();
        assert!(store.get(&id).is_err());

        assert_eq!(store.put(b"payload").unwrap(), id);
        assert_eq!(store.get(&id).unwrap(), b"payload");
    }

    #[test]
    fn verify_all_discards_corrupt_objects() {
        let (_dir, store) = temp_store();
        let good = store.put(b"good").unwrap();
        let bad = store.put(b"bad").unwrap();
        fs::write(store.object_path(&bad), b"tampered").unwrap();

        let discarded = store.verify_all().unwrap();
        assert_eq!(discarded, vec![bad]);
        assert!(store.exists(&good).unwrap());
        assert!(!store.exists(&bad).unwrap());
    }

    #[test]
    fn open_removes_stale_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("objects");
        fs::create_dir_all(root.join(TMP_DIR)).unwrap();
        fs::write(root.join(TMP_DIR).join(".tmpXYZ"), b"half written").unwrap();

        let store = FsObjectStore::open(&root).unwrap();
        assert_eq!(fs::read_dir(store.tmp_dir()).unwrap().count(), 0);
        assert!(store.ids().unwrap().is_empty());
    }
}
