//! Session event queue
//!
//! Everything that can change session state arrives here as a [`SessionEvent`]:
//! user commands, ticker fires, recorder failures, playback completion and
//! permission answers. Producers run on arbitrary threads; only the single
//! consumer loop touches the session.

use tokio::sync::mpsc;

/// Events processed by the record/play session, strictly in order
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Record control tapped
    ToggleRecord,
    /// Play control tapped
    TogglePlay,
    /// Elapsed-time refresh for the recording with this generation
    Tick { generation: u64 },
    /// Recorder failed while capturing the recording with this generation
    RecorderFailed { generation: u64, reason: String },
    /// Playback with this generation ran to the end
    PlaybackFinished { generation: u64 },
    /// Answer to a microphone permission request
    PermissionResolved { granted: bool },
    /// Leave the event loop
    Shutdown,
}

/// Sending half of the session event queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSender {
    /// Enqueue an event. Returns false if the consumer is gone.
    pub fn send(&self, event: SessionEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(mpsc::error::SendError(event)) => {
                tracing::debug!(?event, "session event dropped, queue closed");
                false
            }
        }
    }
}

/// Receiving half of the session event queue
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Create the session event queue
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_order() {
        let (tx, mut rx) = event_channel();
        assert!(tx.send(SessionEvent::ToggleRecord));
        assert!(tx.send(SessionEvent::Tick { generation: 1 }));
        assert!(tx.send(SessionEvent::ToggleRecord));

        assert_eq!(rx.try_recv().unwrap(), SessionEvent::ToggleRecord);
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Tick { generation: 1 });
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::ToggleRecord);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_after_receiver_dropped_reports_false() {
        let (tx, rx) = event_channel();
        drop(rx);
        assert!(!tx.send(SessionEvent::TogglePlay));
    }

    #[test]
    fn senders_from_other_threads_share_the_queue() {
        let (tx, mut rx) = event_channel();
        let remote = tx.clone();
        std::thread::spawn(move || {
            remote.send(SessionEvent::PlaybackFinished { generation: 3 });
        })
        .join()
        .unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::PlaybackFinished { generation: 3 }
        );
    }
}
