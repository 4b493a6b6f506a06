//! File-backed reference store.
//!
//! ```text
//! <root>/HEAD                 "ref: refs/heads/<branch>\n"
//! <root>/refs/heads/<branch>  "<64 hex>\n", or empty for an unborn branch
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

use sprig_store::write_atomic;
use sprig_types::ObjectId;
use tracing::debug;

use crate::error::{RefError, Result};
use crate::names::validate_branch_name;
use crate::traits::RefStore;
use crate::types::{branch_ref_name, Ref, HEADS_PREFIX};

const HEAD_FILE: &str = "HEAD";
const SYMREF_PREFIX: &str = "ref: ";

/// Refs stored as small text files, each replaced atomically.
#[derive(Debug)]
pub struct FsRefStore {
    root: PathBuf,
}

impl FsRefStore {
    /// Open a ref store rooted at the repository control directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(HEADS_PREFIX))?;
        Ok(Self { root })
    }

    fn ref_path(&self, name: &str) -> PathBuf {
        self.root.join(branch_ref_name(name))
    }

    fn parse_target(name: &str, text: &str) -> Result<Option<ObjectId>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        ObjectId::from_hex(text)
            .map(Some)
            .map_err(|e| RefError::Corrupt {
                name: branch_ref_name(name),
                reason: e.to_string(),
            })
    }
}

impl RefStore for FsRefStore {
    fn read_ref(&self, name: &str) -> Result<Option<Ref>> {
        validate_branch_name(name)?;
        let text = match fs::read_to_string(self.ref_path(name)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(Ref {
            name: name.to_string(),
            target: Self::parse_target(name, &text)?,
        }))
    }

    fn write_ref(&self, reference: &Ref) -> Result<()> {
        validate_branch_name(&reference.name)?;
        let body = match reference.target {
            Some(id) => format!("{id}\n"),
            None => String::new(),
        };
        write_atomic(&self.ref_path(&reference.name), body.as_bytes())?;
        debug!(
            name = %reference.canonical_name(),
            target = ?reference.target,
            "ref updated"
        );
        Ok(())
    }

    fn head(&self) -> Result<Option<String>> {
        let text = match fs::read_to_string(self.root.join(HEAD_FILE)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let branch = text
            .trim()
            .strip_prefix(SYMREF_PREFIX)
            .and_then(|r| r.strip_prefix(HEADS_PREFIX))
            .ok_or_else(|| RefError::Corrupt {
                name: HEAD_FILE.into(),
                reason: format!("expected '{SYMREF_PREFIX}{HEADS_PREFIX}<branch>'"),
            })?;
        Ok(Some(branch.to_string()))
    }

    fn set_head(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        let body = format!("{SYMREF_PREFIX}{}\n", branch_ref_name(branch));
        write_atomic(&self.root.join(HEAD_FILE), body.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_refs() -> (tempfile::TempDir, FsRefStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsRefStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn unborn_branch_roundtrip() {
        let (dir, store) = temp_refs();
        store.write_ref(&Ref::unborn("main")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("refs/heads/main")).unwrap(), "");
        assert_eq!(store.read_ref("main").unwrap(), Some(Ref::unborn("main")));
    }

    #[test]
    fn targeted_branch_roundtrip() {
        let (_dir, store) = temp_refs();
        let target = ObjectId::from_hash([9; 32]);
        store.write_ref(&Ref::at("main", target)).unwrap();
        assert_eq!(store.read_ref("main").unwrap().unwrap().target, Some(target));
    }

    #[test]
    fn missing_ref_is_none() {
        let (_dir, store) = temp_refs();
        assert!(store.read_ref("main").unwrap().is_none());
    }

    #[test]
    fn head_file_format() {
        let (dir, store) = temp_refs();
        assert!(store.head().unwrap().is_none());
        store.set_head("main").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(HEAD_FILE)).unwrap(),
            "ref: refs/heads/main\n"
        );
        assert_eq!(store.head().unwrap().as_deref(), Some("main"));
    }

    #[test]
    fn resolve_head_follows_branch() {
        let (_dir, store) = temp_refs();
        store.write_ref(&Ref::unborn("main")).unwrap();
        store.set_head("main").unwrap();
        assert_eq!(store.resolve_head().unwrap(), None);

        let target = ObjectId::from_hash([4; 32]);
        store.write_ref(&Ref::at("main", target)).unwrap();
        assert_eq!(store.resolve_head().unwrap(), Some(target));
    }

    #[test]
    fn corrupt_ref_is_reported() {
        let (dir, store) = temp_refs();
        fs::write(dir.path().join("refs/heads/main"), "not-a-digest\n").unwrap();
        assert!(matches!(
            store.read_ref("main"),
            Err(RefError::Corrupt { .. })
        ));
    }

    #[test]
    fn corrupt_head_is_reported() {
        let (dir, store) = temp_refs();
        fs::write(dir.path().join(HEAD_FILE), "garbage").unwrap();
        assert!(matches!(store.head(), Err(RefError::Corrupt { .. })));
    }
}
