//! Record/play session state machine

use std::fmt;
use thiserror::Error;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Playing,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Playing => "playing",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Session state machine.
/// Holds exactly one state at a time; side effects live in the application layer.
///
/// State machine:
///   IDLE -> RECORDING (start_recording)
///   RECORDING -> IDLE (stop_recording, fail_recording)
///   IDLE -> PLAYING (start_playing)
///   PLAYING -> IDLE (stop_playing, finish_playing)
#[derive(Debug, Default)]
pub struct SessionMachine {
    state: SessionState,
}

impl SessionMachine {
    /// Create a new machine in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    /// Transition from IDLE to RECORDING
    pub fn start_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Idle, SessionState::Recording, "start recording")
    }

    /// Transition from RECORDING to IDLE after a normal stop
    pub fn stop_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Recording, SessionState::Idle, "stop recording")
    }

    /// Transition from RECORDING to IDLE after the recorder failed
    pub fn fail_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Recording, SessionState::Idle, "fail recording")
    }

    /// Transition from IDLE to PLAYING
    pub fn start_playing(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Idle, SessionState::Playing, "start playing")
    }

    /// Transition from PLAYING to IDLE after a manual stop
    pub fn stop_playing(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Playing, SessionState::Idle, "stop playing")
    }

    /// Transition from PLAYING to IDLE after playback ran to the end
    pub fn finish_playing(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Playing, SessionState::Idle, "finish playing")
    }

    fn transition(
        &mut self,
        from: SessionState,
        to: SessionState,
        action: &str,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != from {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: action.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_machine_is_idle() {
        let machine = SessionMachine::new();
        assert!(machine.is_idle());
        assert!(!machine.is_recording());
        assert!(!machine.is_playing());
    }

    #[test]
    fn start_recording_from_idle() {
        let mut machine = SessionMachine::new();
        assert!(machine.start_recording().is_ok());
        assert!(machine.is_recording());
    }

    #[test]
    fn start_recording_from_playing_fails() {
        let mut machine = SessionMachine::new();
        machine.start_playing().unwrap();

        let err = machine.start_recording().unwrap_err();
        assert_eq!(err.current_state, SessionState::Playing);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn start_playing_from_recording_fails() {
        let mut machine = SessionMachine::new();
        machine.start_recording().unwrap();

        let err = machine.start_playing().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
    }

    #[test]
    fn stop_and_fail_recording_return_to_idle() {
        let mut machine = SessionMachine::new();
        machine.start_recording().unwrap();
        machine.stop_recording().unwrap();
        assert!(machine.is_idle());

        machine.start_recording().unwrap();
        machine.fail_recording().unwrap();
        assert!(machine.is_idle());
    }

    #[test]
    fn stop_recording_from_idle_fails() {
        let mut machine = SessionMachine::new();
        let err = machine.stop_recording().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
    }

    #[test]
    fn stop_and_finish_playing_return_to_idle() {
        let mut machine = SessionMachine::new();
        machine.start_playing().unwrap();
        machine.stop_playing().unwrap();
        assert!(machine.is_idle());

        machine.start_playing().unwrap();
        machine.finish_playing().unwrap();
        assert!(machine.is_idle());
    }

    #[test]
    fn finish_playing_from_recording_fails() {
        let mut machine = SessionMachine::new();
        machine.start_recording().unwrap();

        let err = machine.finish_playing().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
        assert!(machine.is_recording());
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(SessionState::Recording.to_string(), "recording");
        assert_eq!(SessionState::Playing.to_string(), "playing");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: SessionState::Playing,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("playing"));
    }
}
