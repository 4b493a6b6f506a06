//! Commit records as `commits/<64 hex>.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sprig_store::write_atomic;
use sprig_types::{ObjectId, HEX_LEN};
use tracing::debug;

use crate::commit::Commit;
use crate::error::{GraphError, GraphResult};
use crate::traits::CommitStore;

const EXTENSION: &str = "json";

/// One pretty-printed JSON file per commit, written atomically.
///
/// Reads check that the record's content still hashes to its file name, so
/// an edited record is reported as [`GraphError::Corrupt`] rather than
/// silently trusted.
#[derive(Debug)]
pub struct FsCommitStore {
    dir: PathBuf,
}

impl FsCommitStore {
    pub fn open(dir: impl Into<PathBuf>) -> GraphResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &ObjectId) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", id.to_hex()))
    }
}

impl CommitStore for FsCommitStore {
    fn read(&self, id: &ObjectId) -> GraphResult<Option<Commit>> {
        let data = match fs::read(self.record_path(id)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let corrupt = |reason: String| GraphError::Corrupt {
            id: id.to_hex(),
            reason,
        };
        let commit: Commit = serde_json::from_slice(&data).map_err(|e| corrupt(e.to_string()))?;
        if commit.id != *id {
            return Err(corrupt(format!("record is filed under {id} but names {}", commit.id)));
        }
        if !commit.verify_id()? {
            return Err(corrupt("content does not hash to the recorded id".into()));
        }
        Ok(Some(commit))
    }

    fn write(&self, commit: &Commit) -> GraphResult<()> {
        let path = self.record_path(&commit.id);
        if path.exists() {
            return Ok(());
        }
        let data = serde_json::to_vec_pretty(commit)
            .map_err(|e| GraphError::Serialization(e.to_string()))?;
        write_atomic(&path, &data)?;
        debug!(id = %commit.id.short_hex(), "commit record written");
        Ok(())
    }

    fn delete(&self, id: &ObjectId) -> GraphResult<bool> {
        match fs::remove_file(self.record_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn ids(&self) -> GraphResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.len() != HEX_LEN {
                continue;
            }
            if let Ok(id) = ObjectId::from_hex(stem) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}
