//! The [`RefStore`] trait defining the reference storage interface.

use sprig_types::ObjectId;

use crate::error::{RefError, Result};
use crate::types::Ref;

/// Storage backend for named references.
///
/// Implementations must be thread-safe (`Send + Sync`) and replace a ref's
/// target atomically: a reader sees either the old target or the new one.
pub trait RefStore: Send + Sync {
    /// Read a branch ref by its short name (e.g. "main").
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_ref(&self, name: &str) -> Result<Option<Ref>>;

    /// Write (create or update) a branch ref.
    fn write_ref(&self, reference: &Ref) -> Result<()>;

    /// The branch HEAD names, or `None` if HEAD has not been set.
    fn head(&self) -> Result<Option<String>>;

    /// Point HEAD at a branch.
    fn set_head(&self, branch: &str) -> Result<()>;

    /// The ref HEAD names. Fails if HEAD is unset or names a missing ref.
    fn head_ref(&self) -> Result<Ref> {
        let branch = self.head()?.ok_or_else(|| RefError::NotFound {
            name: "HEAD".into(),
        })?;
        self.read_ref(&branch)?
            .ok_or(RefError::NotFound { name: branch })
    }

    /// The commit id HEAD resolves to, or `None` before the first commit.
    fn resolve_head(&self) -> Result<Option<ObjectId>> {
        Ok(self.head_ref()?.target)
    }
}
