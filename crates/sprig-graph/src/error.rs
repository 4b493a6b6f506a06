use sprig_types::ObjectId;

/// Errors from commit graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("commit message must not be empty")]
    EmptyMessage,

    #[error("nothing staged to commit")]
    NothingStaged,

    /// A staged or committed path refers to a blob that is not stored.
    #[error("object {id} for '{path}' not found")]
    ObjectNotFound { path: String, id: ObjectId },

    #[error("commit not found: {0}")]
    CommitNotFound(String),

    #[error("prefix '{prefix}' is ambiguous ({} candidates)", candidates.len())]
    AmbiguousPrefix {
        prefix: String,
        candidates: Vec<ObjectId>,
    },

    #[error("path '{path}' is not part of commit {commit}")]
    PathNotInCommit { commit: ObjectId, path: String },

    /// A stored commit record does not match its own id.
    #[error("corrupt commit record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(#[from] sprig_store::StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] sprig_refs::RefError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("commit store lock poisoned")]
    LockPoisoned,
}

impl From<sprig_crypto::HasherError> for GraphError {
    fn from(err: sprig_crypto::HasherError) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
