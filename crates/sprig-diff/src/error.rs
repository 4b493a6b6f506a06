use sprig_types::ObjectId;

/// Why a working copy could not be compared with its committed version.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The commit names a blob that is missing from the store.
    #[error("committed content {0} is missing")]
    ObjectNotFound(ObjectId),

    #[error("could not load committed content: {0}")]
    Store(#[from] sprig_store::StoreError),
}

pub type DiffResult<T> = Result<T, DiffError>;
