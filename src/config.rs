use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Working snapshot loaded at start and written back after changes
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    /// Start from the example entry and task when no snapshot exists yet
    #[serde(default)]
    pub seed_sample_data: bool,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            export_dir: default_export_dir(),
            seed_sample_data: false,
            recent_limit: default_recent_limit(),
            log_filter: default_log_filter(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

// Default value functions
fn default_snapshot_path() -> String {
    // This is a fallback - actual profile will be determined at load time
    snapshot_path_for_profile(utils::Profile::Prod)
}

fn default_export_dir() -> String {
    "~".to_string()
}

fn default_recent_limit() -> usize {
    5
}

fn default_log_filter() -> String {
    "warn".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

fn snapshot_path_for_profile(profile: utils::Profile) -> String {
    if let Some(data_dir) = utils::get_data_dir(profile) {
        data_dir.join("daybook.json").to_string_lossy().to_string()
    } else {
        match profile {
            utils::Profile::Dev => "~/.local/share/daybook-dev/daybook.json".to_string(),
            utils::Profile::Prod => "~/.local/share/daybook/daybook.json".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from file, or create default if missing
    /// Uses the provided profile to determine config and snapshot paths
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from(&config_path, profile)
    }

    /// Load configuration from an explicit file, creating it with defaults if missing
    pub fn load_from(config_path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let mut config = Config::default();
            config.snapshot_path = snapshot_path_for_profile(profile);
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to an explicit file
    pub fn save_to(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snapshot_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue("snapshot_path must not be empty".to_string()));
        }
        if self.recent_limit == 0 {
            return Err(ConfigError::InvalidValue("recent_limit must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get the expanded snapshot path (with ~ expansion)
    pub fn get_snapshot_path(&self) -> PathBuf {
        utils::expand_path(&self.snapshot_path)
    }

    /// Get the expanded export directory (with ~ expansion)
    pub fn get_export_dir(&self) -> PathBuf {
        utils::expand_path(&self.export_dir)
    }
}
