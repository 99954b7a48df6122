//! Recorder port interface

use thiserror::Error;

use crate::domain::recording::{FileRef, QualitySettings};

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("Failed to write recording: {0}")]
    WriteFailed(String),

    #[error("No recording in progress")]
    NotRecording,

    #[error("No audio device available")]
    NoAudioDevice,
}

/// Callback invoked when the recorder fails on its own (device lost, stream error).
/// Called from the recorder's thread; implementations must only enqueue work.
pub type FailureCallback = Box<dyn Fn(String) + Send + Sync>;

/// Port for recording the microphone into a file.
///
/// At most one recording is live at a time. Every exit path (`stop`, `cancel`,
/// failure) releases the capture stream.
pub trait Recorder: Send + Sync {
    /// Start capturing into `file` with the given settings.
    fn start(&self, file: &FileRef, settings: &QualitySettings) -> Result<(), RecordingError>;

    /// Stop capturing, then flush and finalize the file.
    fn stop(&self) -> Result<(), RecordingError>;

    /// Stop capturing and discard what was captured; the file is left untouched.
    fn cancel(&self);

    /// Check if currently recording
    fn is_recording(&self) -> bool;

    /// Seconds of audio captured so far in the current recording
    fn current_elapsed_seconds(&self) -> f64;

    /// Peak input level of the most recent captured block, 0.0 to 1.0.
    /// Zero when not recording.
    fn current_level(&self) -> f32;

    /// Register the failure handler, replacing any previous one
    fn on_failure(&self, callback: FailureCallback);
}
