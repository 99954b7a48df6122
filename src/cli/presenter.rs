//! CLI presenter for output formatting

use colored::*;

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print the interactive command summary
    pub fn command_help(&self) {
        eprintln!(
            "{}  {} record/stop   {} play/pause   {} quit",
            "Commands:".bold(),
            "r".cyan().bold(),
            "p".cyan().bold(),
            "q".cyan().bold()
        );
    }

    /// Format the status line shown while the session runs
    pub fn format_status(record: &str, play: &str, elapsed: &str, record_enabled: bool) -> String {
        let record = if record_enabled {
            format!("[{}]", record).bold().to_string()
        } else {
            format!("[{}]", record).dimmed().to_string()
        };
        format!("{} {} {}", record, format!("[{}]", play).bold(), elapsed.cyan())
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_contains_every_label() {
        colored::control::set_override(false);
        let line = Presenter::format_status("Stop", "Play", "00:00:07", true);
        assert_eq!(line, "[Stop] [Play] 00:00:07");
    }

    #[test]
    fn status_with_disabled_record_keeps_text() {
        colored::control::set_override(false);
        let line = Presenter::format_status("Record", "Pause", "00:01:02", false);
        assert!(line.contains("[Record]"));
        assert!(line.contains("[Pause]"));
    }
}
