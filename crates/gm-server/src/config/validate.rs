//! Configuration validation.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.graphicsmagick.executable.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "graphicsmagick.executable must not be empty".into(),
            ));
        }
        if self.workspace.prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "workspace.prefix must not be empty".into(),
            ));
        }
        if self.workspace.prefix.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(
                "workspace.prefix must not contain path separators".into(),
            ));
        }
        if let Some(allowed) = &self.formats.allowed {
            for format in allowed {
                // The format becomes a file suffix, keep it a plain name
                if format.is_empty() || format.contains(['/', '\\', '.']) {
                    return Err(ConfigError::ValidationError(format!(
                        "formats.allowed contains invalid format {format:?}"
                    )));
                }
            }
        }
        Ok(())
    }
}
