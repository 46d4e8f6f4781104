//! Error handling module for vidchew

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for vidchew operations
#[derive(Error, Debug)]
pub enum VidchewError {
    /// Invalid or contradictory configuration, fatal before any file is processed
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Encoder exited with a non-zero status
    #[error("Encode failed for {path} (exit status {status})")]
    EncodeFailed { path: String, status: String },

    /// Output rendering error
    #[error("Failed to render output: {message}")]
    OutputError { message: String },

    /// Error raised by a port or domain rule
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl VidchewError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// Result type alias for vidchew operations
pub type VidchewResult<T> = std::result::Result<T, VidchewError>;
