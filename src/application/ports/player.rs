//! Player port interface

use thiserror::Error;

use crate::domain::recording::FileRef;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Failed to open audio file: {0}")]
    OpenFailed(String),

    #[error("Failed to decode audio file: {0}")]
    DecodeFailed(String),

    #[error("Audio output not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Nothing loaded to play")]
    NothingLoaded,
}

/// Callback invoked when playback reaches the end on its own.
/// Not invoked after `stop`.
pub type CompletionCallback = Box<dyn Fn() + Send + Sync>;

/// Port for playing a single audio file
pub trait Player: Send + Sync {
    /// Load `file`, releasing whatever was loaded or playing before.
    fn load(&self, file: &FileRef) -> Result<(), PlaybackError>;

    /// Play the loaded file from the start
    fn play(&self) -> Result<(), PlaybackError>;

    /// Stop playback and release the output stream
    fn stop(&self);

    /// Check if currently playing
    fn is_playing(&self) -> bool;

    /// Register the completion handler, replacing any previous one
    fn on_completion(&self, callback: CompletionCallback);
}
