//! Branch pointers and `HEAD`.
//!
//! A branch ref holds the id of the newest commit on its line of history, or
//! nothing while the branch is unborn. `HEAD` is symbolic: it names the
//! branch that the next commit advances. sprig keeps one line of history, so
//! a repository normally has a single branch ref.
//!
//! [`RefStore`] is the storage boundary; [`FsRefStore`] keeps one file per
//! ref under `refs/heads/` and [`InMemoryRefStore`] backs tests.

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use fs::FsRefStore;
pub use memory::InMemoryRefStore;
pub use names::validate_branch_name;
pub use traits::RefStore;
pub use types::{branch_ref_name, Ref, HEADS_PREFIX};
