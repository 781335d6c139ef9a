use std::{cell::RefCell, collections::BTreeMap, rc::Rc, time::Duration};

use tracing::debug;

use super::{TimerCallback, TimerHandle, TimerService};

struct Inner {
    now: Duration,
    next_id: u64,
    // Ordered by deadline, then by scheduling order.
    pending: BTreeMap<(Duration, u64), TimerCallback>,
}

impl Inner {
    /// Takes the earliest callback due at or before `deadline`, moving the
    /// clock to its due time.
    fn pop_due(&mut self, deadline: Duration) -> Option<TimerCallback> {
        let (&(due, id), _) = self.pending.first_key_value()?;
        if due > deadline {
            return None;
        }
        self.now = self.now.max(due);
        self.pending.remove(&(due, id))
    }
}

/// A timer service driven by hand over virtual time.
///
/// Nothing runs until the loop is advanced. Clones share the same clock and
/// queue.
#[derive(Clone)]
pub struct EventLoop {
    inner: Rc<RefCell<Inner>>,
}

impl EventLoop {
    pub fn new() -> Self {
        EventLoop {
            inner: Rc::new(RefCell::new(Inner {
                now: Duration::ZERO,
                next_id: 0,
                pending: BTreeMap::new(),
            })),
        }
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Moves the clock forward by `by`, running every callback that falls due
    /// on the way, including ones scheduled by earlier callbacks. Returns how
    /// many callbacks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let deadline = self.now().saturating_add(by);
        let mut ran = 0;
        loop {
            // The borrow must end before the callback runs, since callbacks
            // usually schedule more work.
            let next = self.inner.borrow_mut().pop_due(deadline);
            let Some(callback) = next else {
                break;
            };
            callback();
            ran += 1;
        }
        self.inner.borrow_mut().now = deadline;
        ran
    }

    /// Runs callbacks until none are left, moving the clock as far as needed.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.inner.borrow_mut().pop_due(Duration::MAX);
            let Some(callback) = next else {
                break;
            };
            callback();
            ran += 1;
        }
        ran
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerService for EventLoop {
    fn schedule(&self, callback: TimerCallback, delay: Duration) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let due = inner.now.saturating_add(delay);
        inner.pending.insert((due, id), callback);
        debug!(id, ?due, "Scheduled callback");
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let mut inner = self.inner.borrow_mut();
        let key = inner
            .pending
            .keys()
            .find(|(_, id)| *id == handle.id())
            .copied();
        let cancelled = key.and_then(|key| inner.pending.remove(&key)).is_some();
        debug!(id = handle.id(), cancelled, "Cancelled callback");
        cancelled
    }
}
