//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod file_store;
pub mod notifier;
pub mod permission;
pub mod player;
pub mod recorder;
pub mod ticker;
pub mod view;

// Re-export common types
pub use config::ConfigStore;
pub use file_store::FileStore;
pub use notifier::Notifier;
pub use permission::{PermissionCallback, PermissionProvider, PermissionStatus};
pub use player::{CompletionCallback, PlaybackError, Player};
pub use recorder::{FailureCallback, Recorder, RecordingError};
pub use ticker::Ticker;
pub use view::SessionView;
