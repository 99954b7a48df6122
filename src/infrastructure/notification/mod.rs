//! Notification infrastructure module
//!
//! Alerts always go to the terminal; desktop notifications through
//! notify-rust are added when enabled.

mod notify_rust;
mod terminal;

pub use notify_rust::NotifyRustNotifier;
pub use terminal::{format_alert, TerminalNotifier};

use indicatif::ProgressBar;

use crate::application::ports::Notifier;
use crate::domain::session::ErrorAlert;

/// Forwards every alert to each inner notifier
pub struct FanoutNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.notifiers.len()
    }
}

impl Notifier for FanoutNotifier {
    fn show_error(&self, alert: &ErrorAlert) {
        for notifier in &self.notifiers {
            notifier.show_error(alert);
        }
    }
}

/// Create the notifier for the session
pub fn create_notifier(status_line: ProgressBar, desktop: bool) -> FanoutNotifier {
    let mut notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(TerminalNotifier::new(status_line))];
    if desktop {
        notifiers.push(Box::new(NotifyRustNotifier::new()));
    }
    FanoutNotifier::new(notifiers)
}
