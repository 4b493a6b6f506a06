use thiserror::Error;

/// Failures reading or moving branch pointers and `HEAD`.
#[derive(Debug, Error)]
pub enum RefError {
    #[error("no such ref: {name}")]
    NotFound { name: String },

    #[error("'{name}' cannot be used as a branch name: {reason}")]
    InvalidBranchName { name: String, reason: String },

    /// A ref or `HEAD` file holds something other than a commit id or a
    /// symbolic pointer.
    #[error("ref {name} is damaged: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("ref table lock poisoned")]
    LockPoisoned,

    #[error("ref file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RefError>;
