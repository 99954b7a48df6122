//! Tokio interval ticker
//!
//! Fires [`SessionEvent::Tick`] into the session queue at a fixed period
//! while running. Missed ticks are skipped rather than bunched up.

use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::application::events::{EventSender, SessionEvent};
use crate::application::ports::Ticker;

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Periodic ticker backed by a tokio task
pub struct IntervalTicker {
    period: Duration,
    events: EventSender,
    runtime: Handle,
    task: StdMutex<Option<JoinHandle<()>>>,
}

impl IntervalTicker {
    /// Create a ticker that spawns onto the current tokio runtime.
    ///
    /// Must be called from within a runtime.
    pub fn new(period: Duration, events: EventSender) -> Self {
        Self::with_handle(period, events, Handle::current())
    }

    /// Create a ticker that spawns onto the given runtime
    pub fn with_handle(period: Duration, events: EventSender, runtime: Handle) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            events,
            runtime,
            task: StdMutex::new(None),
        }
    }

    /// The firing period
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Ticker for IntervalTicker {
    fn start(&self, generation: u64) {
        let mut task = lock(&self.task);
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }

        let period = self.period;
        let events = self.events.clone();
        *task = Some(self.runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if !events.send(SessionEvent::Tick { generation }) {
                    break;
                }
            }
        }));
        tracing::trace!(generation, ?period, "ticker started");
    }

    fn stop(&self) {
        if let Some(task) = lock(&self.task).take() {
            task.abort();
            tracing::trace!("ticker stopped");
        }
    }

    fn is_running(&self) -> bool {
        lock(&self.task).as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
