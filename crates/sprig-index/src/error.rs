/// Failures while staging paths or persisting the staging table.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Writing staged content to the object store failed.
    #[error("could not store staged content: {0}")]
    Store(#[from] sprig_store::StoreError),

    /// `index.json` could not be encoded or decoded.
    #[error("malformed staging table: {0}")]
    Serialization(String),

    #[error("unsupported index version {0}")]
    UnsupportedVersion(u32),

    /// The path is empty, absolute or climbs out with `..`.
    #[error("cannot stage path '{0}'")]
    InvalidPath(String),

    #[error("staging table I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type IndexResult<T> = Result<T, IndexError>;
