//! Branch name validation.
//!
//! Branch names become file names under `refs/heads/`, so anything that
//! could escape that directory or confuse ref parsing is rejected: empty
//! names, whitespace and shell/glob characters, `..`, leading or trailing
//! `.` and `/`, empty or dot-prefixed components, and a `.lock` suffix.

use crate::error::{RefError, Result};

const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

fn invalid(name: &str, reason: impl Into<String>) -> RefError {
    RefError::InvalidBranchName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a branch name, returning `Ok(())` if it can be used as a ref.
///
/// ```
/// use sprig_refs::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("../escape").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "must not be empty"));
    }
    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(invalid(name, format!("contains forbidden character {ch:?}")));
    }
    if name.contains("..") || name.contains("@{") {
        return Err(invalid(name, "must not contain '..' or '@{'"));
    }
    if name.ends_with('.') || name.ends_with(".lock") {
        return Err(invalid(name, "must not end with '.' or '.lock'"));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(invalid(name, "must not start or end with '/'"));
    }
    if let Some(component) = name
        .split('/')
        .find(|c| c.is_empty() || c.starts_with('.'))
    {
        return Err(invalid(
            name,
            format!("component {component:?} is empty or starts with '.'"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for name in ["main", "trunk", "release-1.0", "team/feature"] {
            assert!(validate_branch_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_unsafe_names() {
        for name in [
            "",
            "has space",
            "a:b",
            "a*b",
            "bad..name",
            "ref@{0}",
            ".hidden",
            "dir/.hidden",
            "trailing.",
            "main.lock",
            "/leading",
            "trailing/",
            "a//b",
        ] {
            assert!(
                matches!(
                    validate_branch_name(name),
                    Err(RefError::InvalidBranchName { .. })
                ),
                "{name:?} should be rejected"
            );
        }
    }
}
