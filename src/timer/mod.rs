//! Scheduling callbacks to run later on the current thread.

use std::time::Duration;

mod event_loop;
#[cfg(feature = "tokio")]
mod tokio;

pub use event_loop::EventLoop;
#[cfg(feature = "tokio")]
pub use self::tokio::TokioTimer;

/// Identifies a scheduled callback so it can be cancelled.
///
/// The id means whatever the issuing [`TimerService`] wants it to mean.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        TimerHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TimerHandle {
    fn from(id: u64) -> Self {
        TimerHandle::new(id)
    }
}

pub type TimerCallback = Box<dyn FnOnce()>;

/// Runs callbacks no earlier than a requested delay.
pub trait TimerService {
    fn schedule(&self, callback: TimerCallback, delay: Duration) -> TimerHandle;

    /// Prevents a pending callback from running. Returns false if it already
    /// ran, was already cancelled, or was never scheduled here.
    fn cancel(&self, handle: TimerHandle) -> bool;
}
