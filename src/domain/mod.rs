//! Domain layer - Core business logic
//!
//! Contains value objects, the session state machine, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recording;
pub mod session;

// Re-export common types
pub use config::{AppConfig, MicrophonePolicy};
pub use error::*;
pub use recording::{ElapsedTime, EncoderQuality, FileRef, QualitySettings};
pub use session::{ErrorAlert, InvalidStateTransition, SessionMachine, SessionState};
