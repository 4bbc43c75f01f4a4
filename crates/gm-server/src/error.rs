//! Error types for the GraphicsMagick image server.
//!
//! Errors are split by origin so callers can tell a bad request parameter
//! apart from a broken tool or a full disk:
//! - [`ParamError`]: a request parameter is missing, mistyped or out of range
//! - [`ImageError`]: the external tool failed to process the image
//! - [`ConfigError`]: the server configuration is unreadable or invalid
//! - I/O errors: workspace creation, source write or result read-back failed

use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Top-level error type for image server operations.
#[derive(Error, Debug)]
pub enum ServerError {
    /// A request parameter is invalid
    #[error(transparent)]
    Param(#[from] ParamError),

    /// Image processing failed
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Filesystem errors (workspace, source file, result file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by an upstream image source
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl ServerError {
    /// The parameter error behind this error, if any.
    pub fn as_param(&self) -> Option<&ParamError> {
        match self {
            ServerError::Param(e) => Some(e),
            _ => None,
        }
    }
}

/// A request parameter failed validation.
///
/// `param` names the offending parameter. Layers that nest parameters under a
/// namespace extend it with [`ParamError::prefixed`] so the final caller sees
/// the full dotted path (e.g. `graphicsmagick.width`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid param \"{param}\": {message}")]
pub struct ParamError {
    pub param: String,
    pub message: String,
}

impl ParamError {
    pub fn new(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Prepend a namespace to the parameter path.
    pub fn prefixed(mut self, namespace: &str) -> Self {
        self.param = format!("{namespace}.{}", self.param);
        self
    }
}

/// The image could not be processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("image error: {message}")]
pub struct ImageError {
    pub message: String,
}

impl ImageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failures of the external GraphicsMagick process.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The executable could not be started
    #[error("failed to start {executable}: {source}")]
    Spawn {
        executable: String,
        source: std::io::Error,
    },

    /// Waiting on the running process failed
    #[error("failed to wait for process: {0}")]
    Wait(#[source] std::io::Error),

    /// The process exited unsuccessfully
    #[error("{status}{}", stderr_suffix(.stderr))]
    Failed { status: ExitStatus, stderr: String },

    /// The process outlived its time budget and was killed
    #[error("timeout after {limit:?}")]
    Timeout { limit: Duration },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

impl From<ProcessError> for ImageError {
    fn from(err: ProcessError) -> Self {
        ImageError::new(format!("GraphicsMagick command: {err}"))
    }
}

impl From<ProcessError> for ServerError {
    fn from(err: ProcessError) -> Self {
        ServerError::Image(err.into())
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Convenience type alias for server results.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Convenience type alias for parameter validation results.
pub type ParamResult<T> = std::result::Result<T, ParamError>;
