//! Recording value objects

mod elapsed;
mod file_ref;
mod quality;

pub use elapsed::ElapsedTime;
pub use file_ref::FileRef;
pub use quality::{EncoderQuality, QualitySettings, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};
