//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// GraphicsMagick executable settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsMagickConfig {
    /// Path to the `gm` executable
    pub executable: String,

    /// Process timeout in milliseconds (0 = wait forever)
    pub timeout_ms: u64,
}

impl Default for GraphicsMagickConfig {
    fn default() -> Self {
        Self {
            executable: "/usr/bin/gm".to_string(),
            timeout_ms: 0,
        }
    }
}

impl GraphicsMagickConfig {
    /// The process time budget, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// Scratch directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Base directory for per-request scratch directories.
    /// Falls back to the system temp directory when unset.
    pub temp_dir: Option<PathBuf>,

    /// Name prefix of each scratch directory
    pub prefix: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            prefix: "imageserver_".to_string(),
        }
    }
}

/// Output format settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Formats a request may ask for. `None` allows any format.
    pub allowed: Option<Vec<String>>,
}

impl FormatConfig {
    /// Whether `format` may be requested.
    pub fn is_allowed(&self, format: &str) -> bool {
        match &self.allowed {
            Some(allowed) => allowed.iter().any(|f| f == format),
            None => true,
        }
    }
}
