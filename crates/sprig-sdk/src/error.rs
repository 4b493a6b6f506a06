use std::path::PathBuf;

use sprig_diff::DiffError;
use sprig_graph::GraphError;
use sprig_index::IndexError;
use sprig_refs::RefError;
use sprig_store::StoreError;
use sprig_types::ObjectId;
use thiserror::Error;

/// Every failure a repository operation can report.
///
/// Lower-layer errors that have a meaning of their own (a missing object, an
/// ambiguous prefix) are lifted into the matching variant here, so callers
/// match on one enum.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not a sprig repository: {0}")]
    NotARepository(PathBuf),

    #[error("repository already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("path is outside the repository: {0}")]
    PathOutsideRepository(String),

    #[error("working file not found: {0}")]
    WorkingFileNotFound(String),

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("commit message must not be empty")]
    EmptyMessage,

    #[error("nothing staged to commit")]
    NothingStaged,

    #[error("commit not found: {0}")]
    CommitNotFound(String),

    #[error("prefix '{prefix}' matches {} commits", candidates.len())]
    AmbiguousPrefix {
        prefix: String,
        candidates: Vec<ObjectId>,
    },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("path '{path}' is not part of commit {commit}")]
    PathNotInCommit { commit: ObjectId, path: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[source] StoreError),

    #[error("index error: {0}")]
    Index(#[source] IndexError),

    #[error("ref error: {0}")]
    Ref(#[from] RefError),

    #[error("graph error: {0}")]
    Graph(#[source] GraphError),

    #[error("diff error: {0}")]
    Diff(#[source] DiffError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("repository lock poisoned")]
    LockPoisoned,
}

impl From<StoreError> for SdkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::ObjectNotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<IndexError> for SdkError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::InvalidPath(p) => Self::InvalidPath(p),
            IndexError::Store(e) => e.into(),
            IndexError::Io(e) => Self::Io(e),
            other => Self::Index(other),
        }
    }
}

impl From<GraphError> for SdkError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::EmptyMessage => Self::EmptyMessage,
            GraphError::NothingStaged => Self::NothingStaged,
            GraphError::ObjectNotFound { id, .. } => Self::ObjectNotFound(id),
            GraphError::CommitNotFound(rev) => Self::CommitNotFound(rev),
            GraphError::AmbiguousPrefix { prefix, candidates } => {
                Self::AmbiguousPrefix { prefix, candidates }
            }
            GraphError::PathNotInCommit { commit, path } => Self::PathNotInCommit { commit, path },
            GraphError::Store(e) => e.into(),
            GraphError::Ref(e) => Self::Ref(e),
            GraphError::Io(e) => Self::Io(e),
            other => Self::Graph(other),
        }
    }
}

impl From<DiffError> for SdkError {
    fn from(err: DiffError) -> Self {
        match err {
            DiffError::ObjectNotFound(id) => Self::ObjectNotFound(id),
            DiffError::Store(e) => e.into(),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_errors_keep_their_kind() {
        let id = ObjectId::from_hash([1; 32]);
        assert!(matches!(
            SdkError::from(GraphError::ObjectNotFound {
                path: "a".into(),
                id
            }),
            SdkError::ObjectNotFound(found) if found == id
        ));
        assert!(matches!(
            SdkError::from(GraphError::Store(StoreError::NotFound(id))),
            SdkError::ObjectNotFound(_)
        ));
        assert!(matches!(
            SdkError::from(GraphError::AmbiguousPrefix {
                prefix: "abcd".into(),
                candidates: vec![id, id]
            }),
            SdkError::AmbiguousPrefix { .. }
        ));
    }

    #[test]
    fn index_path_errors_become_invalid_path() {
        assert!(matches!(
            SdkError::from(IndexError::InvalidPath("x".into())),
            SdkError::InvalidPath(_)
        ));
    }
}
