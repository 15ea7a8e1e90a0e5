//! Core error types for breathwork-core.
//!
//! Configuration and validation problems are reported through this hierarchy.
//! Cue delivery has its own [`CueError`], which never leaves the cue layer.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::PhaseKind;

/// Core error type for breathwork-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// No built-in pattern with this id
    #[error("Unknown breathing pattern: {0}")]
    UnknownPattern(String),
}

/// Validation errors raised while configuring an engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Every phase of the pattern is zero
    #[error("Breath pattern is empty: all phase durations are zero")]
    EmptyPattern,

    /// Inhale and exhale always run, so they need a length
    #[error("Phase '{phase}' must have a positive duration")]
    ZeroLengthPhase { phase: PhaseKind },

    /// Negative, NaN or infinite duration
    #[error("Invalid duration for '{field}': {value}")]
    InvalidDuration { field: String, value: f64 },

    #[error("Session duration must be positive, got {0}")]
    NonPositiveSessionDuration(f64),

    #[error("Volume must be within 0.0..=1.0, got {0}")]
    VolumeOutOfRange(f64),
}

/// Failures reported by tone and haptic collaborators.
///
/// These are logged and dropped by the cue dispatcher; timer state never
/// depends on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CueError {
    /// Platform refuses audio until a user gesture
    #[error("Audio playback blocked by the platform")]
    AudioBlocked,

    #[error("Cue output not supported on this platform")]
    Unsupported,

    #[error("Cue device error: {0}")]
    Device(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
