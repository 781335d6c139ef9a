use std::{cell::RefCell, rc::Rc, time::Duration};

use underbar::{delay, throttle, Function, TimerCallback, TimerHandle, TimerService, Value};

/// A timer that keeps callbacks in a list until they are flushed by hand.
#[derive(Default)]
struct ManualTimer {
    queue: RefCell<Vec<(TimerHandle, Duration, TimerCallback)>>,
    next_id: RefCell<u64>,
}

impl ManualTimer {
    fn flush(&self) -> Vec<Duration> {
        let queued = std::mem::take(&mut *self.queue.borrow_mut());
        queued
            .into_iter()
            .map(|(_, delay, callback)| {
                callback();
                delay
            })
            .collect()
    }
}

impl TimerService for ManualTimer {
    fn schedule(&self, callback: TimerCallback, delay: Duration) -> TimerHandle {
        let mut next_id = self.next_id.borrow_mut();
        let handle = TimerHandle::from(*next_id);
        *next_id += 1;
        self.queue.borrow_mut().push((handle, delay, callback));
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let mut queue = self.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|(queued, _, _)| *queued != handle);
        queue.len() != before
    }
}

fn recording(calls: &Rc<RefCell<Vec<Value>>>) -> Function {
    let calls = calls.clone();
    Function::from_fn(move |_, args| {
        calls.borrow_mut().push(Value::from(args.to_vec()));
        Ok(Value::from(calls.borrow().len()))
    })
}

#[test]
fn delay_runs_on_a_caller_timer() {
    let timer = ManualTimer::default();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let func = recording(&calls);

    let kept = delay(&func, Duration::from_millis(20), vec![Value::from(1)], &timer);
    let dropped = delay(&func, Duration::from_millis(30), vec![Value::from(2)], &timer);
    assert_ne!(kept, dropped);
    assert!(timer.cancel(dropped));

    assert_eq!(timer.flush(), vec![Duration::from_millis(20)]);
    assert_eq!(*calls.borrow(), vec![Value::from(vec![Value::from(1)])]);
}

#[test]
fn throttle_runs_on_a_caller_timer() -> anyhow::Result<()> {
    let timer = Rc::new(ManualTimer::default());
    let calls = Rc::new(RefCell::new(Vec::new()));
    let throttled = throttle(&recording(&calls), Duration::from_millis(50), timer.clone());

    throttled.call(&Value::Missing, &[Value::from(1)])?;
    throttled.call(&Value::Missing, &[Value::from(2)])?;
    throttled.call(&Value::Missing, &[Value::from(3)])?;
    assert_eq!(calls.borrow().len(), 1);

    // Closing the window runs the latest suppressed call and opens another.
    assert_eq!(timer.flush(), vec![Duration::from_millis(50)]);
    assert_eq!(
        *calls.borrow(),
        vec![
            Value::from(vec![Value::from(1)]),
            Value::from(vec![Value::from(3)]),
        ]
    );
    timer.flush();
    assert_eq!(calls.borrow().len(), 2);
    Ok(())
}
