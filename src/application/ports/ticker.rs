//! Ticker port interface

/// Port for the periodic elapsed-time refresh.
///
/// Each fire enqueues a tick tagged with the generation passed to `start`,
/// so ticks left in the queue after `stop` can be told apart.
pub trait Ticker: Send + Sync {
    /// Start firing. No-op if already running.
    fn start(&self, generation: u64);

    /// Stop firing. No-op if not running.
    fn stop(&self);

    /// Check if currently running
    fn is_running(&self) -> bool;
}
