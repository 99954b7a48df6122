//! Notification port interface

use crate::domain::session::ErrorAlert;

/// Port for user-facing error notifications.
///
/// Showing an alert must not block the caller; adapters that talk to slow
/// backends hand the work off.
pub trait Notifier: Send + Sync {
    /// Show an error with a title, a message and one dismiss action.
    fn show_error(&self, alert: &ErrorAlert);
}

/// Blanket implementation for boxed notifier types
impl Notifier for Box<dyn Notifier> {
    fn show_error(&self, alert: &ErrorAlert) {
        self.as_ref().show_error(alert)
    }
}
