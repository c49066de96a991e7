//! Error types for the data directory.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for data directory operations.
#[derive(Debug, Error)]
pub enum DataDirError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A setting failed validation
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Resource name not recognized
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Filesystem error while probing a path
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataDirError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for DataDirError {
    fn from(err: config::ConfigError) -> Self {
        DataDirError::Config(err.to_string())
    }
}
