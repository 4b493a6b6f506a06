//! Commit graph for sprig.
//!
//! Commits are immutable records naming a message, author, timestamp, an
//! optional parent and the path-to-digest mapping that was staged when they
//! were made. Their id is derived from that content, parent included, so the
//! parent chain can only point backwards and always terminates.
//!
//! # Key Types
//!
//! - [`Commit`] -- An immutable commit record
//! - [`CommitStore`] -- Storage boundary for commit records
//! - [`InMemoryCommitStore`] / [`FsCommitStore`] -- Backends
//! - [`CommitGraph`] -- Commit creation, lookup and history traversal

pub mod commit;
pub mod error;
pub mod fs;
pub mod graph;
pub mod memory;
pub mod traits;

pub use commit::{commit_timestamp, Commit};
pub use error::{GraphError, GraphResult};
pub use fs::FsCommitStore;
pub use graph::{CommitGraph, MIN_PREFIX_LEN};
pub use memory::InMemoryCommitStore;
pub use traits::CommitStore;
