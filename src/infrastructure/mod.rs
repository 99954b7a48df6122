//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with cpal, rodio, tokio, the file system and notify-rust.

pub mod config;
pub mod file_store;
pub mod logging;
pub mod notification;
pub mod permission;
pub mod playback;
pub mod recording;
pub mod ticker;

// Re-export adapters
pub use config::XdgConfigStore;
pub use file_store::DocumentsFileStore;
pub use notification::{create_notifier, FanoutNotifier, NotifyRustNotifier, TerminalNotifier};
pub use permission::CpalPermissionProvider;
pub use playback::RodioPlayer;
pub use recording::{create_recorder, CpalRecorder};
pub use ticker::IntervalTicker;
