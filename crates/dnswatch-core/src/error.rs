//! Error types for the dnswatch system
//!
//! This module defines all error types used throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dnswatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dnswatch system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file does not exist
    #[error("Configuration file not found: {}", .path.display())]
    ConfigMissing {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Configuration file exists but could not be used
    #[error("Invalid configuration file {}: {}", .path.display(), .detail)]
    ConfigMalformed {
        /// Path of the offending file
        path: PathBuf,
        /// What was wrong with it
        detail: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resolver-related errors
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// Notifier-related errors
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a resolver error
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create a notifier error
    pub fn notifier(msg: impl Into<String>) -> Self {
        Self::Notifier(msg.into())
    }

    /// Create a "config file missing" error
    pub fn config_missing(path: impl Into<PathBuf>) -> Self {
        Self::ConfigMissing { path: path.into() }
    }

    /// Create a "config file malformed" error
    pub fn config_malformed(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::ConfigMalformed {
            path: path.into(),
            detail: detail.into(),
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
