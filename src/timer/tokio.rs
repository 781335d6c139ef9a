use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
    time::Duration,
};

use tokio::{sync::oneshot, time::sleep};
use tracing::debug;

use super::{TimerCallback, TimerHandle, TimerService};

/// A timer service backed by the tokio runtime.
///
/// Callbacks are spawned as local tasks, so `schedule` must be called from
/// within a [`tokio::task::LocalSet`].
#[derive(Clone, Default)]
pub struct TokioTimer {
    next_id: Rc<Cell<u64>>,
    cancels: Rc<RefCell<HashMap<u64, oneshot::Sender<()>>>>,
}

impl TokioTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerService for TokioTimer {
    fn schedule(&self, callback: TimerCallback, delay: Duration) -> TimerHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.cancels.borrow_mut().insert(id, cancel_tx);

        let cancels = self.cancels.clone();
        tokio::task::spawn_local(async move {
            tokio::select! {
                _ = sleep(delay) => {
                    // A cancel that lands in the same tick as the deadline
                    // has already taken the sender.
                    let live = cancels.borrow_mut().remove(&id).is_some();
                    if live {
                        callback();
                    }
                }
                _ = cancel_rx => {}
            }
        });
        debug!(id, ?delay, "Scheduled callback");
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let sender = self.cancels.borrow_mut().remove(&handle.id());
        let cancelled = match sender {
            Some(tx) => {
                let _ = tx.send(());
                true
            }
            None => false,
        };
        debug!(id = handle.id(), cancelled, "Cancelled callback");
        cancelled
    }
}
