//! Signal handlers
//!
//! Ctrl+C (and SIGTERM on unix) become a [`SessionEvent::Shutdown`], so a
//! recording in progress is finalized before the process exits.

use colored::Colorize;

use crate::application::{EventSender, SessionEvent};

/// Shutdown signal sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// Ctrl+C / SIGINT
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl ShutdownSignal {
    fn name(self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }
}

fn forward(signal: ShutdownSignal, events: &EventSender) {
    eprintln!("{} Received {} (shutdown)", "↓".cyan(), signal.name());
    tracing::info!(signal = signal.name(), "shutdown requested");
    events.send(SessionEvent::Shutdown);
}

/// Start listening for shutdown signals.
///
/// Must be called from within a tokio runtime.
pub fn forward_shutdown_signals(events: EventSender) -> Result<(), std::io::Error> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let tx_term = events.clone();
        tokio::spawn(async move {
            if sigterm.recv().await.is_some() {
                forward(ShutdownSignal::Terminate, &tx_term);
            }
        });
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            forward(ShutdownSignal::Interrupt, &events);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::event_channel;

    #[test]
    fn signal_names() {
        assert_eq!(ShutdownSignal::Interrupt.name(), "SIGINT");
        assert_eq!(ShutdownSignal::Terminate.name(), "SIGTERM");
    }

    #[test]
    fn forward_enqueues_shutdown() {
        let (tx, mut rx) = event_channel();
        forward(ShutdownSignal::Terminate, &tx);
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Shutdown);
    }

    #[tokio::test]
    async fn handlers_install_inside_runtime() {
        let (tx, _rx) = event_channel();
        assert!(forward_shutdown_signals(tx).is_ok());
    }
}
