//! Recording infrastructure module
//!
//! Captures the microphone with cpal and streams it into WAV files with hound.

mod cpal_recorder;
mod wav_encoder;

pub use cpal_recorder::CpalRecorder;
pub use wav_encoder::{CaptureFormat, EncodingError, WavStreamWriter};

/// Create the default recorder for the current platform
pub fn create_recorder() -> CpalRecorder {
    CpalRecorder::new()
}
