use super::StdRuntime;
use flingkit_animation::{Animatable, AnimationSpec};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn std_runtime_requests_frame_when_animation_starts() {
    let runtime = StdRuntime::new();
    assert!(!runtime.take_frame_request());

    let value = Animatable::new(0.0f32, runtime.frame_clock());
    value.animate_to(1.0, AnimationSpec::linear(100), 0.0, |_| {});

    assert!(
        runtime.take_frame_request(),
        "starting an animation should request a frame"
    );
    assert!(!runtime.take_frame_request(), "request flag is consumed");
}

#[test]
fn frame_waker_runs_on_schedule() {
    let runtime = StdRuntime::new();
    let wakes = Arc::new(AtomicUsize::new(0));
    {
        let wakes = Arc::clone(&wakes);
        runtime.set_frame_waker(move || {
            wakes.fetch_add(1, Ordering::SeqCst);
        });
    }

    let value = Animatable::new(0.0f32, runtime.frame_clock());
    value.animate_to(1.0, AnimationSpec::linear(100), 0.0, |_| {});
    assert_eq!(wakes.load(Ordering::SeqCst), 1);

    runtime.clear_frame_waker();
    value.animate_to(0.0, AnimationSpec::linear(100), 0.0, |_| {});
    assert_eq!(wakes.load(Ordering::SeqCst), 1);
}

#[test]
fn explicit_frame_times_drive_animations() {
    let runtime = StdRuntime::new();
    let value = Animatable::new(0.0f32, runtime.frame_clock());
    value.animate_to(10.0, AnimationSpec::linear(100), 0.0, |_| {});

    runtime.drain_frame_callbacks(1_000_000);
    runtime.drain_frame_callbacks(51_000_000);
    assert!((value.value() - 5.0).abs() < 1e-3);

    runtime.drain_frame_callbacks(200_000_000);
    assert_eq!(value.value(), 10.0);
    assert!(!value.is_running());
    assert!(!runtime.runtime().needs_frame());
}

#[test]
fn drain_frame_reports_pending_work() {
    let runtime = StdRuntime::new();
    assert!(!runtime.drain_frame());

    let value = Animatable::new(0.0f32, runtime.frame_clock());
    value.animate_to(1.0, AnimationSpec::linear(10_000), 0.0, |_| {});
    assert!(runtime.drain_frame());

    value.stop();
    assert!(!runtime.drain_frame());
}

#[test]
fn clock_is_monotonic() {
    let runtime = StdRuntime::new();
    let first = runtime.frame_nanos();
    let second = runtime.frame_nanos();
    assert!(second >= first);
    assert!(runtime.uptime_millis() >= 0);
}
