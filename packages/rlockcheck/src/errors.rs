//! Error types for rlockcheck
//!
//! Provides unified error handling across the crate. The lock analysis itself
//! never fails: ambiguity degrades to "no violation". Errors only come from
//! reading, parsing, and configuring.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for rlockcheck operations
#[derive(Debug, Error)]
pub enum CheckError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// Front-end error (malformed input that cannot be lowered)
    #[error("Front-end error: {0}")]
    Frontend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CheckError {
    /// Create a parse error
    pub fn parse_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        CheckError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a front-end error
    pub fn frontend(msg: impl Into<String>) -> Self {
        CheckError::Frontend(msg.into())
    }
}

/// Result type alias for rlockcheck operations
pub type Result<T> = std::result::Result<T, CheckError>;
