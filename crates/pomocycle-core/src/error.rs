//! Core error types for pomocycle-core.
//!
//! The state machine itself never fails; these types cover the edges around
//! it: configuration files, caller-supplied durations and notification
//! playback.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::IntervalKind;

/// Core error type for pomocycle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Notification playback errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No usable configuration directory
    #[error("Could not determine configuration directory: {0}")]
    NoConfigDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Interval durations must be at least one second
    #[error("duration for {kind} must be greater than zero")]
    ZeroDuration { kind: IntervalKind },

    /// Text that does not name an interval kind
    #[error("unknown interval kind '{0}' (expected work, short or long)")]
    UnknownIntervalKind(String),
}

/// Notification playback errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Writing the cue failed
    #[error("failed to write notification cue: {0}")]
    Io(#[from] std::io::Error),

    /// External player could not be launched
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
