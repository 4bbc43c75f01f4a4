//! Configuration management for the image server.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default`.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GraphicsMagick executable settings
    pub graphicsmagick: GraphicsMagickConfig,

    /// Scratch directory settings
    pub workspace: WorkspaceConfig,

    /// Output format settings
    pub formats: FormatConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.gm-server.gm-server/config.toml
    /// - Linux: ~/.config/gm-server/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\gm-server\config\config.toml
    ///
    /// Falls back to ~/.gm-server/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "gm-server", "gm-server")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".gm-server").join("config.toml")
            })
    }

    /// Get the resolved scratch base directory (with ~ expansion).
    ///
    /// Paths that are not valid UTF-8 are returned unchanged.
    pub fn temp_dir(&self) -> Option<PathBuf> {
        self.workspace.temp_dir.as_ref().map(|dir| match dir.to_str() {
            Some(path_str) => PathBuf::from(shellexpand::tilde(path_str).into_owned()),
            None => dir.clone(),
        })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
