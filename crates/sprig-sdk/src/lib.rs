//! High-level SDK for sprig.
//!
//! [`Repository`] is the one handle collaborators (the CLI, a web layer,
//! tests) hold. It owns the object store, the staging area, the ref store
//! and the commit graph for a single working directory and serializes every
//! state-changing operation behind an in-process lock.

pub mod config;
pub mod error;
pub mod report;
pub mod repository;
pub mod worktree;

pub use config::RepoConfig;
pub use error::{SdkError, SdkResult};
pub use report::{CommitDetails, FileSummary, FsckReport, MissingObject, RepoStatus};
pub use repository::{Repository, CONTROL_DIR};

// Re-export key types
pub use sprig_graph::Commit;
pub use sprig_index::{unify_separators, StagingEntry};
pub use sprig_types::ObjectId;
