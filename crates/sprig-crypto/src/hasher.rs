use sprig_types::ObjectId;

/// BLAKE3 digests scoped to one kind of record.
///
/// The tag and a `:` separator are fed to BLAKE3 ahead of the payload, so a
/// blob and a commit record with identical bytes never share a name. Payload
/// bytes go in untouched; binary content keeps its exact identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Names file content in the object store.
    pub const BLOB: Self = Self::new("sprig-blob-v1");
    /// Names commit records.
    pub const COMMIT: Self = Self::new("sprig-commit-v1");

    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Digest `data` under this hasher's tag.
    pub fn hash(&self, data: &[u8]) -> ObjectId {
        let digest = blake3::Hasher::new()
            .update(self.domain.as_bytes())
            .update(b":")
            .update(data)
            .finalize();
        ObjectId::from_hash(digest.into())
    }

    /// Digest the compact JSON encoding of `value`.
    ///
    /// Field order follows the type's `Serialize` impl and map order follows
    /// the map, so anything hashed this way should keep its maps in a
    /// `BTreeMap`.
    pub fn hash_json<T: serde::Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<ObjectId, HasherError> {
        let encoded = serde_json::to_vec(value)?;
        Ok(self.hash(&encoded))
    }

    /// `true` when `data` hashes to `expected` under this tag.
    pub fn verify(&self, data: &[u8], expected: &ObjectId) -> bool {
        &self.hash(data) == expected
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }
}

/// A value could not be encoded for hashing.
#[derive(Debug, thiserror::Error)]
pub enum HasherError {
    #[error("cannot encode value for hashing: {0}")]
    Encode(#[from] serde_json::Error),
}
