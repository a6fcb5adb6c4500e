use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct CountingScheduler {
    requests: AtomicUsize,
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn registering_a_callback_requests_a_frame() {
    let scheduler = Arc::new(CountingScheduler::default());
    let runtime = Runtime::new(scheduler.clone());
    let handle = runtime.handle();

    assert!(!runtime.needs_frame());
    handle.register_frame_callback(|_| {});
    assert!(runtime.needs_frame());
    assert_eq!(scheduler.requests.load(Ordering::SeqCst), 1);

    handle.drain_frame_callbacks(16_000_000);
    assert!(!runtime.needs_frame());
}

#[test]
fn callbacks_registered_while_draining_run_next_frame() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let seen = Rc::new(RefCell::new(Vec::new()));

    {
        let seen = Rc::clone(&seen);
        let inner_handle = handle.clone();
        handle.register_frame_callback(move |time| {
            seen.borrow_mut().push(("outer", time));
            let seen = Rc::clone(&seen);
            inner_handle.register_frame_callback(move |time| {
                seen.borrow_mut().push(("inner", time));
            });
        });
    }

    handle.drain_frame_callbacks(10);
    assert_eq!(seen.borrow().as_slice(), &[("outer", 10)]);
    assert!(handle.has_frame_callbacks());

    handle.drain_frame_callbacks(20);
    assert_eq!(seen.borrow().as_slice(), &[("outer", 10), ("inner", 20)]);
    assert!(!handle.has_frame_callbacks());
}

#[test]
fn cancelled_callback_never_runs() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let ran = Rc::new(Cell::new(false));

    let id = {
        let ran = Rc::clone(&ran);
        handle
            .register_frame_callback(move |_| ran.set(true))
            .expect("runtime alive")
    };
    handle.cancel_frame_callback(id);
    handle.drain_frame_callbacks(0);

    assert!(!ran.get());
    assert!(!runtime.needs_frame());
}

#[test]
fn frame_time_never_goes_backwards() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let seen = Rc::new(Cell::new(0));

    handle.drain_frame_callbacks(100);
    {
        let seen = Rc::clone(&seen);
        handle.register_frame_callback(move |time| seen.set(time));
    }
    handle.drain_frame_callbacks(50);

    assert_eq!(seen.get(), 100);
    assert_eq!(handle.last_frame_time_nanos(), Some(100));
}

#[test]
fn handle_outliving_runtime_is_inert() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    drop(runtime);

    assert!(!handle.is_alive());
    assert!(handle.register_frame_callback(|_| {}).is_none());
    assert!(!handle.needs_frame());
    handle.drain_frame_callbacks(0);
}
