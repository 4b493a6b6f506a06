//! Diff engine for sprig.
//!
//! Compares a working copy against its committed snapshot line by line and
//! renders the result as a standard unified diff.
//!
//! # Key Types
//!
//! - [`LineDiff`] / [`Hunk`] / [`DiffLine`] -- Structured line diff
//! - [`UnifiedDiff`] -- Unified-diff rendering with `---`/`+++` headers
//! - [`diff_snapshot`] -- Load the committed side from an object store and diff

pub mod error;
pub mod lines;
pub mod snapshot;
pub mod unified;

pub use error::{DiffError, DiffResult};
pub use lines::{diff_lines, DiffLine, Hunk, LineDiff, CONTEXT_LINES};
pub use snapshot::diff_snapshot;
pub use unified::UnifiedDiff;
