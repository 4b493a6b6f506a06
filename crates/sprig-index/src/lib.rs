//! The staging area: what the next commit will record.
//!
//! Entries keep staging order and a path appears at most once: re-staging
//! a path drops its old entry and appends the new one.
//! Content is written to the object store at staging time, so a commit only
//! has to reference digests that already exist.
//!
//! [`IndexFile`] persists the table as `index.json` between invocations.

pub mod entry;
pub mod error;
pub mod file;
pub mod index;

pub use entry::StagingEntry;
pub use error::{IndexError, IndexResult};
pub use file::IndexFile;
pub use index::{normalize_path, unify_separators, StagingArea};
