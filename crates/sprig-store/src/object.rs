use sprig_crypto::ContentHasher;
use sprig_types::ObjectId;

/// The bytes of one file version, stored under their own digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// The name this blob is filed under.
    pub fn compute_id(&self) -> ObjectId {
        ContentHasher::BLOB.hash(&self.data)
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether these bytes really are the object named `id`.
    pub fn matches(&self, id: &ObjectId) -> bool {
        ContentHasher::BLOB.verify(&self.data, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_id_deterministic() {
        let blob = Blob::new(b"deterministic".to_vec());
        assert_eq!(blob.compute_id(), blob.compute_id());
        assert_eq!(blob.size(), 13);
    }

    #[test]
    fn matches_own_id_only() {
        let blob = Blob::new(b"content".to_vec());
        let other = Blob::new(b"other".to_vec());
        assert!(blob.matches(&blob.compute_id()));
        assert!(!blob.matches(&other.compute_id()));
    }

    #[test]
    fn empty_blob_has_a_real_id() {
        let id = Blob::new(Vec::new()).compute_id();
        assert_ne!(id, ObjectId::from_hash([0; 32]));
    }
}
