//! Core reference types.

use serde::{Deserialize, Serialize};
use sprig_types::ObjectId;

/// Namespace for branch refs.
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Canonical name for a branch (e.g. `"main"` -> `"refs/heads/main"`).
pub fn branch_ref_name(branch: &str) -> String {
    format!("{HEADS_PREFIX}{branch}")
}

/// A named, mutable pointer to the tip commit of a branch.
///
/// `target` is `None` until the first commit lands on the branch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    /// Short branch name (e.g. "main").
    pub name: String,
    /// Id of the tip commit, if any.
    pub target: Option<ObjectId>,
}

impl Ref {
    /// A branch with no commits yet.
    pub fn unborn(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
        }
    }

    /// A branch pointing at `target`.
    pub fn at(name: impl Into<String>, target: ObjectId) -> Self {
        Self {
            name: name.into(),
            target: Some(target),
        }
    }

    /// Returns the canonical name for this ref (e.g. "refs/heads/main").
    pub fn canonical_name(&self) -> String {
        branch_ref_name(&self.name)
    }

    /// Returns `true` if no commit has been recorded on this ref.
    pub fn is_unborn(&self) -> bool {
        self.target.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_uses_heads_namespace() {
        assert_eq!(Ref::unborn("main").canonical_name(), "refs/heads/main");
        assert_eq!(branch_ref_name("dev"), "refs/heads/dev");
    }

    #[test]
    fn unborn_and_targeted() {
        assert!(Ref::unborn("main").is_unborn());
        assert!(!Ref::at("main", ObjectId::from_hash([1; 32])).is_unborn());
    }
}
