//! RecordPlay - record the microphone over a guide track and play it back
//!
//! One screen, two controls: Record/Stop captures the microphone into a
//! single WAV file while a bundled guide track plays, and Play/Pause plays
//! the last take. An elapsed-time label counts while either is active.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Session state machine, recording value objects, and errors
//! - **Application**: The record/play session use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, rodio, hound, notifications, etc.)
//! - **CLI**: Command-line interface, the terminal view, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
