//! Application settings stored as `config.toml` in the user data directory.

use crate::error::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DB_ENV: &str = "DSA_PREP_DB";
pub const NODE_ENV: &str = "DSA_PREP_NODE";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    #[default]
    Quiz,
    Flashcard,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_file: String,
    pub notes_debounce_ms: u64,
    pub code_timeout_secs: u64,
    pub node_binary: String,
    pub default_review_mode: ReviewMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_file: "study.sqlite3".to_string(),
            notes_debounce_ms: 500,
            code_timeout_secs: 5,
            node_binary: "node".to_string(),
            default_review_mode: ReviewMode::Quiz,
        }
    }
}

impl AppConfig {
    pub fn notes_debounce(&self) -> Duration {
        Duration::from_millis(self.notes_debounce_ms)
    }

    pub fn code_timeout(&self) -> Duration {
        Duration::from_secs(self.code_timeout_secs)
    }

    /// Database path: `DSA_PREP_DB` if set, else `database_file` inside `data_dir`.
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        std::env::var_os(DB_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(&self.database_file))
    }

    pub fn node_binary(&self) -> String {
        std::env::var(NODE_ENV).unwrap_or_else(|_| self.node_binary.clone())
    }
}

/// Per-user data directory, falling back to `./data`.
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("com", "dsaprep", "DSA Prep")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Reads `path`, or writes and returns the defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    } else {
        let config = AppConfig::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(&config)?)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = load_config(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "notes_debounce_ms = 250\ndefault_review_mode = \"flashcard\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.notes_debounce(), Duration::from_millis(250));
        assert_eq!(config.default_review_mode, ReviewMode::Flashcard);
        assert_eq!(config.code_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "notes_debounce_ms = \"soon\"").unwrap();

        assert!(load_config(&path).is_err());
    }
}
