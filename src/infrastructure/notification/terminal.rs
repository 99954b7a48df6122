//! Terminal notification adapter
//!
//! Prints alerts to stderr above the status line.

use colored::Colorize;
use indicatif::ProgressBar;

use crate::application::ports::Notifier;
use crate::domain::session::ErrorAlert;

/// Render an alert as one terminal line
pub fn format_alert(alert: &ErrorAlert) -> String {
    format!(
        "{} {} [{}]",
        format!("{}:", alert.title).red().bold(),
        alert.message,
        alert.dismiss_label.dimmed()
    )
}

/// Notifier writing alerts to the terminal
pub struct TerminalNotifier {
    status_line: ProgressBar,
}

impl TerminalNotifier {
    /// Create a notifier that prints around the given status line
    pub fn new(status_line: ProgressBar) -> Self {
        Self { status_line }
    }
}

impl Notifier for TerminalNotifier {
    fn show_error(&self, alert: &ErrorAlert) {
        let line = format_alert(alert);
        self.status_line.suspend(|| eprintln!("{}", line));
    }
}
