use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    time::Duration,
};

use tracing::{debug, trace, warn};

use crate::{
    error::Result,
    timer::{TimerHandle, TimerService},
    value::{Function, NativeFunction, Value},
};

/// Which edges of a throttle window invoke the wrapped function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThrottleOptions {
    leading: bool,
    trailing: bool,
}

impl ThrottleOptions {
    pub fn new() -> Self {
        ThrottleOptions {
            leading: true,
            trailing: true,
        }
    }

    /// Whether a call in an idle period runs immediately.
    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Whether a call suppressed inside a window runs when the window closes.
    pub fn trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self::new()
    }
}

struct PendingCall {
    receiver: Value,
    args: Vec<Value>,
}

struct ThrottleState {
    window: Option<TimerHandle>,
    pending: Option<PendingCall>,
    last_result: Value,
}

struct ThrottleInner {
    func: Function,
    wait: Duration,
    options: ThrottleOptions,
    timer: Rc<dyn TimerService>,
    state: RefCell<ThrottleState>,
}

impl ThrottleInner {
    fn open_window(self: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = self.timer.schedule(
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.close_window();
                }
            }),
            self.wait,
        );
        self.state.borrow_mut().window = Some(handle);
        debug!(wait = ?self.wait, "Opened throttle window");
    }

    fn close_window(self: &Rc<Self>) {
        let pending = {
            let mut state = self.state.borrow_mut();
            state.window = None;
            state.pending.take()
        };
        debug!(trailing = pending.is_some(), "Closed throttle window");
        if let Some(PendingCall { receiver, args }) = pending {
            self.open_window();
            if let Err(err) = self.invoke(&receiver, &args) {
                warn!(error = %err, "Trailing throttled call failed");
            }
        }
    }

    fn invoke(&self, receiver: &Value, args: &[Value]) -> Result<Value> {
        let result = self.func.call(receiver, args)?;
        self.state.borrow_mut().last_result = result.clone();
        Ok(result)
    }

    fn last_result(&self) -> Value {
        self.state.borrow().last_result.clone()
    }
}

/// A throttled wrapper around a function. See [`throttle`].
///
/// Clones share the same window.
#[derive(Clone)]
pub struct Throttled {
    inner: Rc<ThrottleInner>,
}

impl Throttled {
    /// Invokes the wrapped function unless a window is open, and returns the
    /// result of the most recent actual invocation.
    pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value> {
        let inner = &self.inner;
        let window_open = inner.state.borrow().window.is_some();

        if window_open || !inner.options.leading {
            if inner.options.trailing {
                inner.state.borrow_mut().pending = Some(PendingCall {
                    receiver: receiver.clone(),
                    args: args.to_vec(),
                });
                if !window_open {
                    inner.open_window();
                }
                trace!("Throttled call deferred to trailing edge");
            } else {
                trace!("Throttled call dropped");
            }
            return Ok(inner.last_result());
        }

        // The window opens first so that re-entrant calls are throttled too.
        inner.open_window();
        trace!("Throttled call invoked on leading edge");
        inner.invoke(receiver, args)
    }

    /// Closes the current window early and forgets any deferred call.
    pub fn cancel(&self) {
        let (window, dropped) = {
            let mut state = self.inner.state.borrow_mut();
            (state.window.take(), state.pending.take().is_some())
        };
        if let Some(handle) = window {
            self.inner.timer.cancel(handle);
        }
        debug!(dropped, "Cancelled throttle window");
    }

    /// The wrapper as a callable value.
    pub fn function(&self) -> Function {
        Function::new(self.clone())
    }
}

impl NativeFunction for Throttled {
    fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value> {
        Throttled::call(self, receiver, args)
    }
}

/// Wraps `func` so that it runs at most once per `wait`, on the leading edge
/// of a window and again on the trailing edge if it was called meanwhile.
pub fn throttle(func: &Function, wait: Duration, timer: Rc<dyn TimerService>) -> Throttled {
    throttle_with(func, wait, timer, ThrottleOptions::default())
}

pub fn throttle_with(
    func: &Function,
    wait: Duration,
    timer: Rc<dyn TimerService>,
    options: ThrottleOptions,
) -> Throttled {
    Throttled {
        inner: Rc::new(ThrottleInner {
            func: func.clone(),
            wait,
            options,
            timer,
            state: RefCell::new(ThrottleState {
                window: None,
                pending: None,
                last_result: Value::Missing,
            }),
        }),
    }
}
