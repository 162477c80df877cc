//! Configuration management for the tracker.
//!
//! A small optional TOML file in the data directory. Everything defaults,
//! so a missing file is the common case.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{QuestlogError, Result};

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "questlog.toml";

/// User configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Suppress repeated same-day completions of a task.
    ///
    /// Off by default: the stock behavior awards every completion, repeats
    /// included. Turning this on makes a same-day repeat a no-op.
    #[serde(default)]
    pub dedupe_completions: bool,

    /// Override for the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl TrackerConfig {
    /// Load configuration from a data directory, defaulting when the file
    /// is absent.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = Self::config_path(dir);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: TrackerConfig = toml::from_str(&content).map_err(|e| {
                QuestlogError::config_with_path(e.to_string(), config_path.clone())
            })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the config file path for a data directory.
    #[must_use]
    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }
}

/// Platform default data directory for the tracker.
///
/// Falls back to `.questlog` in the current directory when the platform
/// directory cannot be resolved.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("questlog"))
        .unwrap_or_else(|| PathBuf::from(".questlog"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = TrackerConfig::load(temp.path()).unwrap();
        assert!(!config.dedupe_completions);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_load_parses_flags() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            TrackerConfig::config_path(temp.path()),
            "dedupe_completions = true\n",
        )
        .unwrap();

        let config = TrackerConfig::load(temp.path()).unwrap();
        assert!(config.dedupe_completions);
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let temp = TempDir::new().unwrap();
        std::fs::write(TrackerConfig::config_path(temp.path()), "dedupe = [").unwrap();

        let err = TrackerConfig::load(temp.path()).unwrap_err();
        assert!(matches!(err, QuestlogError::Config { .. }));
    }

    #[test]
    fn test_unknown_keys_are_tolerated() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            TrackerConfig::config_path(temp.path()),
            "future_option = 42\n",
        )
        .unwrap();

        let config = TrackerConfig::load(temp.path()).unwrap();
        assert!(!config.dedupe_completions);
    }
}
