use sprig_types::ObjectId;

/// Failures of the content-addressed object store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no object named {0}")]
    NotFound(ObjectId),

    /// Bytes filed under `id` actually hash to `computed`.
    #[error("object {id} is damaged: content hashes to {computed}")]
    HashMismatch { id: ObjectId, computed: ObjectId },

    #[error("object store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("object table lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;
