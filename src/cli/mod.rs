//! CLI layer - Command-line interface
//!
//! Contains argument parsing, the terminal view, stdin commands,
//! signal handling, and the session runner.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod input;
pub mod presenter;
pub mod signals;
pub mod terminal_view;

// Re-export commonly used types
pub use app::{load_merged_config, run_session, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction};
pub use input::UserCommand;
pub use presenter::Presenter;
pub use terminal_view::TerminalView;
