//! Record/play session entities

mod alert;
mod machine;

pub use alert::{ErrorAlert, ALERT_DISMISS_LABEL, ALERT_TITLE};
pub use machine::{InvalidStateTransition, SessionMachine, SessionState};
