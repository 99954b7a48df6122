//! Domain error types

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::session::ErrorAlert;

/// Error when an invalid quality level is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid quality: \"{input}\". Valid qualities are: low, medium, high")]
pub struct InvalidQualityError {
    pub input: String,
}

/// Error when an invalid microphone policy is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid microphone policy: \"{input}\". Valid policies are: ask, allow, deny")]
pub struct InvalidMicrophonePolicyError {
    pub input: String,
}

/// Failures surfaced to the user by the record/play session.
///
/// Every variant is recovered locally: the session returns to idle and
/// shows the matching [`ErrorAlert`] once.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Don't have access to use your microphone.")]
    PermissionDenied,

    #[error("{0}")]
    RecorderInitFailure(String),

    #[error("Recording failed.")]
    RecorderRuntimeFailure(String),

    #[error("{0}")]
    PlayerInitFailure(String),

    #[error("Audio file is missing.")]
    FileMissing(PathBuf),
}

impl SessionError {
    /// Short machine-readable kind, used in logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::RecorderInitFailure(_) => "recorder_init_failure",
            Self::RecorderRuntimeFailure(_) => "recorder_runtime_failure",
            Self::PlayerInitFailure(_) => "player_init_failure",
            Self::FileMissing(_) => "file_missing",
        }
    }

    /// The alert shown to the user for this error
    pub fn alert(&self) -> ErrorAlert {
        ErrorAlert::new(self.to_string())
    }
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
