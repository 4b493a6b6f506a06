//! Durable form of the staging table.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sprig_store::write_atomic;

use crate::entry::StagingEntry;
use crate::error::{IndexError, IndexResult};

const INDEX_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct IndexDocument {
    version: u32,
    entries: Vec<StagingEntry>,
}

/// The staging table as a JSON file, replaced atomically on every save.
#[derive(Clone, Debug)]
pub struct IndexFile {
    path: PathBuf,
}

impl IndexFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted entries. A missing file is an empty table.
    pub fn load(&self) -> IndexResult<Vec<StagingEntry>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let doc: IndexDocument = serde_json::from_slice(&data)
            .map_err(|e| IndexError::Serialization(e.to_string()))?;
        if doc.version != INDEX_VERSION {
            return Err(IndexError::UnsupportedVersion(doc.version));
        }
        Ok(doc.entries)
    }

    /// Persist `entries`, replacing the previous table in one rename.
    pub fn save(&self, entries: &[StagingEntry]) -> IndexResult<()> {
        let doc = IndexDocument {
            version: INDEX_VERSION,
            entries: entries.to_vec(),
        };
        let data = serde_json::to_vec_pretty(&doc)
            .map_err(|e| IndexError::Serialization(e.to_string()))?;
        write_atomic(&self.path, &data)?;
        Ok(())
    }
}
