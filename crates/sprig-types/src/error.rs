use thiserror::Error;

/// Why a string could not be read as an [`ObjectId`](crate::ObjectId).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("object id is not valid hex: {0}")]
    InvalidHex(String),

    #[error("object id must be {expected} bytes, found {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
