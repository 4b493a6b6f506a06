//! The commit record and its content-derived id.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sprig_crypto::ContentHasher;
use sprig_types::ObjectId;

use crate::error::GraphResult;

/// Render a commit timestamp: RFC 3339, UTC, microsecond precision.
pub fn commit_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// An immutable commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Digest over message, timestamp, parent and files.
    pub id: ObjectId,
    pub message: String,
    /// Recorded for display; not part of the id.
    pub author: String,
    pub timestamp: String,
    /// The commit HEAD pointed at when this one was made.
    pub parent: Option<ObjectId>,
    /// Path to blob digest, sorted by path.
    pub files: BTreeMap<String, ObjectId>,
}

/// The hashed portion of a commit. Field order and the sorted map make the
/// JSON form canonical.
#[derive(Serialize)]
struct IdPayload<'a> {
    message: &'a str,
    timestamp: &'a str,
    parent: Option<&'a ObjectId>,
    files: &'a BTreeMap<String, ObjectId>,
}

impl Commit {
    /// Build a commit, computing its id.
    pub fn new(
        message: impl Into<String>,
        author: impl Into<String>,
        timestamp: impl Into<String>,
        parent: Option<ObjectId>,
        files: BTreeMap<String, ObjectId>,
    ) -> GraphResult<Self> {
        let message = message.into();
        let timestamp = timestamp.into();
        let id = Self::compute_id(&message, &timestamp, parent.as_ref(), &files)?;
        Ok(Self {
            id,
            message,
            author: author.into(),
            timestamp,
            parent,
            files,
        })
    }

    /// Deterministic commit id. Staging order never matters because `files`
    /// is a sorted map.
    pub fn compute_id(
        message: &str,
        timestamp: &str,
        parent: Option<&ObjectId>,
        files: &BTreeMap<String, ObjectId>,
    ) -> GraphResult<ObjectId> {
        let payload = IdPayload {
            message,
            timestamp,
            parent,
            files,
        };
        Ok(ContentHasher::COMMIT.hash_json(&payload)?)
    }

    /// Returns `true` if `id` matches the record's content.
    pub fn verify_id(&self) -> GraphResult<bool> {
        let computed = Self::compute_id(
            &self.message,
            &self.timestamp,
            self.parent.as_ref(),
            &self.files,
        )?;
        Ok(computed == self.id)
    }

    /// The first commit of a history has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Digest recorded for `path`, if the commit contains it.
    pub fn file(&self, path: &str) -> Option<&ObjectId> {
        self.files.get(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(pairs: &[(&str, u8)]) -> BTreeMap<String, ObjectId> {
        pairs
            .iter()
            .map(|(p, b)| (p.to_string(), ObjectId::from_hash([*b; 32])))
            .collect()
    }

    #[test]
    fn id_is_deterministic() {
        let a = Commit::new("msg", "ann", "2024-01-01T00:00:00.000000Z", None, files(&[("a", 1)]))
            .unwrap();
        let b = Commit::new("msg", "ann", "2024-01-01T00:00:00.000000Z", None, files(&[("a", 1)]))
            .unwrap();
        assert_eq!(a.id, b.id);
        assert!(a.verify_id().unwrap());
    }

    #[test]
    fn author_is_not_hashed() {
        let ts = "2024-01-01T00:00:00.000000Z";
        let a = Commit::new("msg", "ann", ts, None, files(&[("a", 1)])).unwrap();
        let b = Commit::new("msg", "bob", ts, None, files(&[("a", 1)])).unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn every_hashed_field_changes_the_id() {
        let ts = "2024-01-01T00:00:00.000000Z";
        let base = Commit::new("msg", "a", ts, None, files(&[("a", 1)])).unwrap();
        let variants = [
            Commit::new("other", "a", ts, None, files(&[("a", 1)])).unwrap(),
            Commit::new("msg", "a", "2024-01-01T00:00:00.000001Z", None, files(&[("a", 1)]))
                .unwrap(),
            Commit::new("msg", "a", ts, Some(ObjectId::from_hash([7; 32])), files(&[("a", 1)]))
                .unwrap(),
            Commit::new("msg", "a", ts, None, files(&[("a", 2)])).unwrap(),
            Commit::new("msg", "a", ts, None, files(&[("b", 1)])).unwrap(),
        ];
        for v in variants {
            assert_ne!(base.id, v.id);
        }
    }

    #[test]
    fn tampered_record_fails_verification() {
        let mut c = Commit::new("msg", "a", "t", None, files(&[("a", 1)])).unwrap();
        c.message = "edited".into();
        assert!(!c.verify_id().unwrap());
    }

    #[test]
    fn timestamp_has_microseconds() {
        let at = DateTime::parse_from_rfc3339("2024-05-06T07:08:09.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(commit_timestamp(at), "2024-05-06T07:08:09.123456Z");
    }

    #[test]
    fn summary_is_first_line() {
        let c = Commit::new("title\n\nbody", "a", "t", None, BTreeMap::new()).unwrap();
        assert_eq!(c.summary(), "title");
        assert!(c.is_root());
    }
}
