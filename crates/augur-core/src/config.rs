//! Configuration management for Augur
//!
//! Repository-level settings: where the store lives and which games and apps
//! a fresh store starts with.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{AugurError, GameConfig, Outcome, Result};

/// Repository-level Augur configuration
///
/// Loaded from `.augur/config.toml` in the repo root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugurConfig {
    /// Store file, relative to the repo root
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Cooldown given to games added without one
    #[serde(default = "default_cooldown_secs")]
    pub default_cooldown_secs: u64,

    /// Vocabulary given to games added without one
    #[serde(default = "default_result_format")]
    pub default_result_format: Vec<Outcome>,

    /// Apps a fresh store starts with (and falls back to when emptied)
    #[serde(default = "default_apps")]
    pub default_apps: Vec<String>,

    /// Games a fresh store starts with (and falls back to when emptied)
    #[serde(default = "default_games")]
    pub default_games: Vec<GameConfig>,
}

// Default value providers
fn default_data_file() -> PathBuf {
    PathBuf::from(".augur/data.json")
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_result_format() -> Vec<Outcome> {
    vec!["Big".into(), "Small".into()]
}

fn default_apps() -> Vec<String> {
    vec!["1win".to_string(), "Bet365".to_string(), "Fun88".to_string()]
}

fn default_games() -> Vec<GameConfig> {
    vec![
        GameConfig::new("WINGO", 0, default_result_format()),
        GameConfig::new(
            "K3",
            0,
            vec![
                "Big Odd".into(),
                "Big Even".into(),
                "Small Odd".into(),
                "Small Even".into(),
            ],
        ),
    ]
}

impl AugurConfig {
    /// Load configuration from `.augur/config.toml` or use defaults
    pub fn load_or_default(repo_root: &Path) -> Result<Self> {
        let config_path = repo_root.join(".augur/config.toml");

        if config_path.exists() {
            debug!("Loading config from {:?}", config_path);
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)
                .map_err(|e| AugurError::Config(format!("Failed to parse config file: {}", e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `.augur/config.toml`
    pub fn write_default(repo_root: &Path) -> Result<PathBuf> {
        let config_dir = repo_root.join(".augur");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| AugurError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    /// Absolute path of the store file
    pub fn data_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.data_file)
    }
}

impl Default for AugurConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            default_cooldown_secs: default_cooldown_secs(),
            default_result_format: default_result_format(),
            default_apps: default_apps(),
            default_games: default_games(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = AugurConfig::load_or_default(dir.path()).unwrap();

        assert_eq!(config.default_cooldown_secs, 60);
        assert_eq!(config.default_apps.len(), 3);
        assert_eq!(config.default_games[0].name, "WINGO");
        assert_eq!(config.default_games[1].result_format.len(), 4);
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = AugurConfig::write_default(dir.path()).unwrap();
        assert!(path.exists());

        let config = AugurConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.data_file, PathBuf::from(".augur/data.json"));
        assert_eq!(config.default_games.len(), 2);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".augur")).unwrap();
        std::fs::write(
            dir.path().join(".augur/config.toml"),
            "default_cooldown_secs = 30\ndefault_apps = [\"Stake\"]\n",
        )
        .unwrap();

        let config = AugurConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.default_cooldown_secs, 30);
        assert_eq!(config.default_apps, vec!["Stake".to_string()]);
        assert_eq!(config.default_result_format.len(), 2);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".augur")).unwrap();
        std::fs::write(dir.path().join(".augur/config.toml"), "default_cooldown_secs = \"x\"").unwrap();

        let err = AugurConfig::load_or_default(dir.path()).unwrap_err();
        assert!(matches!(err, AugurError::Config(_)));
    }
}
