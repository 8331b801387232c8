//! Error types for tierlog operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tierlog operations.
///
/// Router operations only ever fail with [`TierlogError::SinkOpen`]; the
/// remaining variants come from loading and parsing configuration.
#[derive(Error, Debug)]
pub enum TierlogError {
    /// A log file or temporary log file could not be created or opened
    #[error("Failed to open log file {}: {source}", .path.display())]
    SinkOpen {
        /// Destination that was being opened
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TierlogError {
    /// Build a [`TierlogError::SinkOpen`] for `path`.
    pub fn sink_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TierlogError::SinkOpen {
            path: path.into(),
            source,
        }
    }

    /// Whether this error reports a sink that could not be opened.
    pub fn is_sink_open(&self) -> bool {
        matches!(self, TierlogError::SinkOpen { .. })
    }
}

/// A specialized Result type for tierlog operations.
pub type Result<T> = std::result::Result<T, TierlogError>;
