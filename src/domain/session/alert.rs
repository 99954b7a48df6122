//! User-facing error alert

/// Title used for every session alert
pub const ALERT_TITLE: &str = "Error";

/// Label of the single dismiss action
pub const ALERT_DISMISS_LABEL: &str = "OK";

/// A modal error notification: title, message and one dismiss action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorAlert {
    pub title: String,
    pub message: String,
    pub dismiss_label: String,
}

impl ErrorAlert {
    /// Alert with the standard title and dismiss label
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            message: message.into(),
            dismiss_label: ALERT_DISMISS_LABEL.to_string(),
        }
    }
}
