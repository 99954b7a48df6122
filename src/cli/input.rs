//! Interactive commands read from stdin
//!
//! Each line is one command. End of input quits.

use std::io::{self, BufRead};
use std::str::FromStr;
use std::thread;

use crate::application::{EventSender, SessionEvent};

/// A command typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Record,
    Play,
    Quit,
    Help,
}

impl UserCommand {
    /// The session event this command produces, if any
    pub fn event(self) -> Option<SessionEvent> {
        match self {
            Self::Record => Some(SessionEvent::ToggleRecord),
            Self::Play => Some(SessionEvent::TogglePlay),
            Self::Quit => Some(SessionEvent::Shutdown),
            Self::Help => None,
        }
    }
}

/// Error for input that is not a command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown command \"{0}\". Use r (record), p (play), q (quit)")]
pub struct UnknownCommandError(pub String);

impl FromStr for UserCommand {
    type Err = UnknownCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "r" | "record" | "stop" => Ok(Self::Record),
            "p" | "play" | "pause" => Ok(Self::Play),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            "h" | "help" | "?" => Ok(Self::Help),
            other => Err(UnknownCommandError(other.to_string())),
        }
    }
}

/// Read commands from stdin on a background thread and enqueue their events.
///
/// `on_help` and `on_unknown` run on the reader thread. The thread is
/// detached: a blocking stdin read must not keep the process alive.
pub fn spawn_stdin_reader(
    events: EventSender,
    on_help: impl Fn() + Send + 'static,
    on_unknown: impl Fn(&UnknownCommandError) + Send + 'static,
) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<UserCommand>() {
                Ok(UserCommand::Help) => on_help(),
                Ok(command) => {
                    let quit = command == UserCommand::Quit;
                    if let Some(event) = command.event() {
                        if !events.send(event) || quit {
                            return;
                        }
                    }
                }
                Err(e) => on_unknown(&e),
            }
        }

        tracing::debug!("stdin closed");
        events.send(SessionEvent::Shutdown);
    });
}
