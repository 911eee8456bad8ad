//! Configuration management for stashlist
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    CONFIG_FILE_NAME, SOURCE_MAP_DEFAULT_COLUMNS, SOURCE_MAP_MAX_COLUMNS, SOURCE_MAP_MIN_COLUMNS,
    STATE_FILE_NAME,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Enable mouse support
    pub mouse_enabled: bool,
    /// Number of columns in the source map strip
    pub source_map_columns: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Log file path; defaults to the XDG data directory
    pub file: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mouse_enabled: true,
            source_map_columns: SOURCE_MAP_DEFAULT_COLUMNS,
        }
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file();

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Option<PathBuf> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
        if current_dir_config.exists() {
            return Some(current_dir_config);
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("stashlist").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.ui.source_map_columns < SOURCE_MAP_MIN_COLUMNS
            || self.ui.source_map_columns > SOURCE_MAP_MAX_COLUMNS
        {
            anyhow::bail!(
                "source_map_columns must be between {} and {}, got {}",
                SOURCE_MAP_MIN_COLUMNS,
                SOURCE_MAP_MAX_COLUMNS,
                self.ui.source_map_columns
            );
        }

        Ok(())
    }

    /// Get the XDG data directory path used for state and logs
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join("stashlist"))
    }

    /// Path of the persisted UI state file
    pub fn state_file_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(STATE_FILE_NAME))
    }
}
