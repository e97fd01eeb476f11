//! Core error types for studystreak-core.
//!
//! One thiserror hierarchy for the whole library. Module-local failures
//! (backend calls, configuration) convert into [`CoreError`] via `#[from]`.

use std::path::PathBuf;
use thiserror::Error;

use crate::streak::api::ApiError;

/// Core error type for studystreak-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Backend API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Streak coordination errors
    #[error("Streak error: {0}")]
    Streak(#[from] StreakError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors surfaced by the streak coordinator.
#[derive(Error, Debug)]
pub enum StreakError {
    /// No signed-in user could be resolved; the operation was not attempted.
    #[error("no resolved user id")]
    MissingUser,

    /// The backend call failed. The user-facing classification is recorded in
    /// the coordinator's error slot; the raw failure travels here.
    #[error(transparent)]
    Backend(#[from] ApiError),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
