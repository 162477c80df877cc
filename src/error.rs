//! Custom error types for Questlog.
//!
//! This module provides structured error types that enable better
//! error handling, reporting, and recovery throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Questlog operations
#[derive(Error, Debug)]
pub enum QuestlogError {
    /// Invalid task input (empty name, out-of-range experience)
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Failed to load or parse configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Corrupt or unsupported snapshot on load.
    ///
    /// Distinct from "no snapshot present", which loads as `Ok(None)` so the
    /// caller can tell a fresh start from data loss.
    #[error("Snapshot error at {path}: {message}")]
    Snapshot { path: PathBuf, message: String },

    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuestlogError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create a snapshot error
    pub fn snapshot(path: PathBuf, message: impl Into<String>) -> Self {
        Self::Snapshot {
            path,
            message: message.into(),
        }
    }

    /// Check if this error came from bad user input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 2,
            Self::Snapshot { .. } => 3,
            Self::Config { .. } => 7,
            _ => 1,
        }
    }
}

/// Type alias for Questlog results
pub type Result<T> = std::result::Result<T, QuestlogError>;
