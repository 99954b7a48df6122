//! Application layer - Use cases and port interfaces
//!
//! Contains the record/play session, its event queue, and the trait
//! definitions for external system interactions.

pub mod events;
pub mod ports;
pub mod session;

// Re-export use cases
pub use events::{event_channel, EventReceiver, EventSender, SessionEvent};
pub use session::{
    RecordPlaySession, SessionConfig, SessionPorts, PAUSE_LABEL, PLAY_LABEL, RECORD_LABEL,
    STOP_LABEL,
};
