use super::*;

use crate::Runtime;
use std::cell::Cell;

#[test]
fn dropping_registration_cancels_callback() {
    let runtime = Runtime::default();
    let clock = runtime.frame_clock();
    let ran = Rc::new(Cell::new(false));

    let registration = {
        let ran = Rc::clone(&ran);
        clock.with_frame_nanos(move |_| ran.set(true))
    };
    assert!(registration.id().is_some());
    drop(registration);

    runtime.handle().drain_frame_callbacks(16_000_000);
    assert!(!ran.get());
}

#[test]
fn with_frame_millis_converts_units() {
    let runtime = Runtime::default();
    let clock = runtime.frame_clock();
    let millis = Rc::new(Cell::new(0));

    let _registration = {
        let millis = Rc::clone(&millis);
        clock.with_frame_millis(move |value| millis.set(value))
    };
    runtime.handle().drain_frame_callbacks(48_000_000);

    assert_eq!(millis.get(), 48);
}

#[test]
fn next_frame_resolves_after_drain() {
    let runtime = Runtime::default();
    let clock = runtime.frame_clock();
    let mut future = Box::pin(clock.next_frame());
    let mut cx = Context::from_waker(futures_task::noop_waker_ref());

    assert!(future.as_mut().poll(&mut cx).is_pending());
    assert!(runtime.needs_frame());

    runtime.handle().drain_frame_callbacks(32_000_000);
    assert_eq!(future.as_mut().poll(&mut cx), Poll::Ready(32_000_000));
}

#[test]
fn registration_after_runtime_drop_is_inactive() {
    let runtime = Runtime::default();
    let clock = runtime.frame_clock();
    drop(runtime);

    let registration = clock.with_frame_nanos(|_| {});
    assert!(registration.id().is_none());
    registration.cancel();
}
