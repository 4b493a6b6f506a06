use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sprig_store::write_atomic;

use crate::error::{SdkError, SdkResult};

/// Per-repository settings, stored as `config.toml` in the control
/// directory. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Name of the branch HEAD points at.
    pub default_branch: String,
    /// Author recorded when a commit names none.
    pub default_author: String,
    /// How many commits `log` shows by default.
    pub history_limit: usize,
    pub created_at: DateTime<Utc>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            default_branch: "main".into(),
            default_author: "user".into(),
            history_limit: 10,
            created_at: Utc::now(),
        }
    }
}

impl RepoConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(SdkError::Config(format!("{}: {e}", path.display()))),
        };
        toml::from_str(&text).map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> SdkResult<()> {
        let text = toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))?;
        write_atomic(path, text.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = RepoConfig::default();
        assert_eq!(c.default_branch, "main");
        assert_eq!(c.default_author, "user");
        assert_eq!(c.history_limit, 10);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = RepoConfig {
            default_author: "ada".into(),
            history_limit: 3,
            ..RepoConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(RepoConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_author = \"grace\"\n").unwrap();
        let c = RepoConfig::load(&path).unwrap();
        assert_eq!(c.default_author, "grace");
        assert_eq!(c.default_branch, "main");
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "history_limit = \"lots\"").unwrap();
        assert!(matches!(RepoConfig::load(&path), Err(SdkError::Config(_))));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let c = RepoConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(c.history_limit, 10);
    }
}
