//! Cross-platform desktop notification adapter using notify-rust
//!
//! Works on Windows, macOS, and Linux.

use std::thread;

use crate::application::ports::Notifier;
use crate::domain::session::ErrorAlert;

/// Icon shown with error notifications
const ERROR_ICON: &str = "dialog-error";

/// Desktop notifier using notify-rust
pub struct NotifyRustNotifier {
    /// Application name for notifications
    app_name: String,
}

impl NotifyRustNotifier {
    /// Create a new notify-rust notifier
    pub fn new() -> Self {
        Self {
            app_name: "RecordPlay".to_string(),
        }
    }

    /// Create with custom app name
    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifyRustNotifier {
    fn show_error(&self, alert: &ErrorAlert) {
        let app_name = self.app_name.clone();
        let alert = alert.clone();

        // notify-rust can block on the session bus, so send from a thread
        thread::spawn(move || {
            let result = notify_rust::Notification::new()
                .appname(&app_name)
                .summary(&alert.title)
                .body(&alert.message)
                .icon(ERROR_ICON)
                .action("default", &alert.dismiss_label)
                .show();

            if let Err(e) = result {
                tracing::warn!(error = %e, "desktop notification failed");
            }
        });
    }
}
