//! Error types for the core crate.

use thiserror::Error;

/// Core error types.
///
/// Only errors that abort a build live here. Per-file problems are reported as
/// [`BuildWarning`](crate::bundle::BuildWarning)s instead.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The project's file list could not be obtained.
    #[error("failed to enumerate files under {root}: {message}")]
    Enumeration { root: String, message: String },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an enumeration error.
    pub fn enumeration(root: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Enumeration {
            root: root.to_string(),
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON/JSONC syntax.
    #[error("invalid config at {path}: {message}")]
    InvalidJson { path: String, message: String },

    /// Config validation failed.
    #[error("config validation failed: {message}")]
    Validation { message: String },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
