//! Terminal rendition of the session screen
//!
//! The two controls and the elapsed-time label are drawn as a single
//! indicatif status line on stderr.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::SessionView;
use crate::application::{PLAY_LABEL, RECORD_LABEL};
use crate::domain::recording::ElapsedTime;

use super::presenter::Presenter;

/// What the status line currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub record_label: String,
    pub play_label: String,
    pub elapsed_label: String,
    pub record_enabled: bool,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            record_label: RECORD_LABEL.to_string(),
            play_label: PLAY_LABEL.to_string(),
            elapsed_label: ElapsedTime::ZERO.to_string(),
            record_enabled: true,
        }
    }
}

/// Session view drawing to the terminal
pub struct TerminalView {
    status_line: ProgressBar,
    state: Mutex<ViewSnapshot>,
}

impl TerminalView {
    /// Create a view with a live status line
    pub fn new() -> Self {
        let status_line = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("●○ ")
            .template("{spinner:.red} {msg}")
        {
            status_line.set_style(style);
        }
        status_line.enable_steady_tick(Duration::from_millis(500));
        Self::with_status_line(status_line)
    }

    /// Create a view that draws nothing
    pub fn hidden() -> Self {
        Self::with_status_line(ProgressBar::hidden())
    }

    fn with_status_line(status_line: ProgressBar) -> Self {
        let view = Self {
            status_line,
            state: Mutex::new(ViewSnapshot::default()),
        };
        view.render(&view.lock());
        view
    }

    /// Handle to the status line, for printing above it
    pub fn status_line(&self) -> ProgressBar {
        self.status_line.clone()
    }

    /// Current contents of the screen
    pub fn snapshot(&self) -> ViewSnapshot {
        self.lock().clone()
    }

    /// Remove the status line from the terminal
    pub fn finish(&self) {
        self.status_line.finish_and_clear();
    }

    fn lock(&self) -> MutexGuard<'_, ViewSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, change: impl FnOnce(&mut ViewSnapshot)) {
        let mut state = self.lock();
        change(&mut state);
        self.render(&state);
    }

    fn render(&self, state: &ViewSnapshot) {
        self.status_line.set_message(Presenter::format_status(
            &state.record_label,
            &state.play_label,
            &state.elapsed_label,
            state.record_enabled,
        ));
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionView for TerminalView {
    fn set_record_label(&self, text: &str) {
        self.update(|s| s.record_label = text.to_string());
    }

    fn set_play_label(&self, text: &str) {
        self.update(|s| s.play_label = text.to_string());
    }

    fn set_elapsed_label(&self, text: &str) {
        self.update(|s| s.elapsed_label = text.to_string());
    }

    fn set_record_enabled(&self, enabled: bool) {
        self.update(|s| s.record_enabled = enabled);
    }
}
