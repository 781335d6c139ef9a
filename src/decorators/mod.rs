//! Wrappers that change how and when a function runs.
//!
//! Every factory returns a fresh wrapper. State lives inside the wrapper and
//! is never shared with other wrappers around the same function.

use std::{cell::RefCell, time::Duration};

use tracing::{trace, warn};

use crate::{
    error::Result,
    timer::{TimerHandle, TimerService},
    value::{Function, NativeFunction, Value},
};

mod memoize;
mod throttle;

pub use memoize::{memoize, memoize_with};
pub use throttle::{throttle, throttle_with, ThrottleOptions, Throttled};

struct Once {
    func: Function,
    result: RefCell<Option<Value>>,
}

impl NativeFunction for Once {
    fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value> {
        let cached = self.result.borrow().clone();
        if let Some(result) = cached {
            trace!("Returning cached result of once-wrapped function");
            return Ok(result);
        }
        // Errors leave the cache empty so the next call retries.
        let result = self.func.call(receiver, args)?;
        Ok(self.result.borrow_mut().get_or_insert(result).clone())
    }
}

/// Wraps `func` so that it runs at most once. Later calls return the first
/// result.
pub fn once(func: &Function) -> Function {
    Function::new(Once {
        func: func.clone(),
        result: RefCell::new(None),
    })
}

/// Calls `func` with `args` after `wait` has passed on `timer`.
///
/// The call has no receiver. Its result is dropped, and an error is logged
/// since there is no caller left to receive it.
pub fn delay<T>(func: &Function, wait: Duration, args: Vec<Value>, timer: &T) -> TimerHandle
where
    T: TimerService + ?Sized,
{
    let func = func.clone();
    timer.schedule(
        Box::new(move || {
            if let Err(err) = func.call_unbound(&args) {
                warn!(error = %err, "Delayed function failed");
            }
        }),
        wait,
    )
}

/// Calls `func` with `args` as soon as `timer` gets to it.
pub fn defer<T>(func: &Function, args: Vec<Value>, timer: &T) -> TimerHandle
where
    T: TimerService + ?Sized,
{
    delay(func, Duration::ZERO, args, timer)
}
