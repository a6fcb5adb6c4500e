use super::*;

use crate::nodes::input::gestures::swipe_config::{DecayKind, SwipeDirection};
use flingkit_animation::DecaySpecError;
use flingkit_core::{Runtime, RuntimeHandle};
use std::cell::Cell;

const WIDTH: f32 = 300.0;
const FRAME_NANOS: u64 = 16_000_000;

struct Harness {
    runtime: Runtime,
    controller: SwipeToDismissController,
    dismissals: Rc<Cell<u32>>,
    time_nanos: u64,
}

impl Harness {
    fn new(config: SwipeToDismissConfig) -> Self {
        let runtime = Runtime::default();
        let controller =
            SwipeToDismissController::new(config, runtime.frame_clock()).expect("valid config");
        let dismissals = Rc::new(Cell::new(0));
        {
            let dismissals = Rc::clone(&dismissals);
            controller.set_on_dismissed(move || dismissals.set(dismissals.get() + 1));
        }
        Self {
            runtime,
            controller,
            dismissals,
            time_nanos: 0,
        }
    }

    fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    fn frame(&mut self) {
        self.time_nanos += FRAME_NANOS;
        self.handle().drain_frame_callbacks(self.time_nanos);
    }

    fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    fn settle(&mut self) -> usize {
        let mut frames = 0;
        while self.handle().has_frame_callbacks() && frames < 1_000 {
            self.frame();
            frames += 1;
        }
        frames
    }

    /// Drags from x=0 by `step` pixels every 16 ms, then lifts `hold_ms`
    /// after the last move without moving further.
    fn swipe(&self, step: f32, moves: i64, hold_ms: i64) {
        let c = &self.controller;
        c.pointer_down(PointerSample::new(0, Point::ZERO));
        for i in 1..=moves {
            c.pointer_move(PointerSample::new(i * 16, Point::new(step * i as f32, 0.0)));
        }
        let last = Point::new(step * moves as f32, 0.0);
        c.pointer_up(PointerSample::new(moves * 16 + hold_ms, last));
    }
}

#[test]
fn drag_moves_the_offset_with_the_pointer() {
    let h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    let c = &h.controller;

    c.pointer_down(PointerSample::new(0, Point::new(50.0, 10.0)));
    assert_eq!(c.current_phase(), SwipePhase::Dragging);
    c.pointer_move(PointerSample::new(16, Point::new(80.0, 10.0)));
    c.pointer_move(PointerSample::new(32, Point::new(60.0, 10.0)));

    assert_eq!(c.current_offset(), 10.0);
    assert_eq!(c.layer().translation_x, 10.0);
    let session = c.session().expect("session");
    assert!(session.is_active);
    assert_eq!(session.bounds, (-WIDTH, WIDTH));
    assert!((session.travelled - 50.0).abs() < 0.01);
}

#[test]
fn drag_is_clamped_to_the_container() {
    let h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    let c = &h.controller;
    c.pointer_down(PointerSample::new(0, Point::ZERO));
    c.pointer_move(PointerSample::new(16, Point::new(-500.0, 0.0)));
    assert_eq!(c.current_offset(), -WIDTH);

    // Moving back responds immediately; the overshoot is not remembered.
    c.pointer_move(PointerSample::new(32, Point::new(-490.0, 0.0)));
    assert_eq!(c.current_offset(), -WIDTH + 10.0);
}

#[test]
fn release_without_velocity_snaps_back() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    h.swipe(20.0, 5, 60);
    assert_eq!(h.controller.current_phase(), SwipePhase::SnappingBack);

    let frames = h.settle();
    assert!(frames < 1_000);
    assert_eq!(h.controller.current_offset(), 0.0);
    assert_eq!(h.controller.current_phase(), SwipePhase::Idle);
    assert_eq!(h.dismissals.get(), 0);
    assert!(!h.controller.is_dismissed());
}

#[test]
fn fast_fling_dismisses_once_at_the_edge() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    let offsets = Rc::new(RefCell::new(Vec::new()));
    let _subscription = {
        let offsets = Rc::clone(&offsets);
        h.controller
            .offset()
            .subscribe(move |value| offsets.borrow_mut().push(*value))
    };

    h.swipe(40.0, 5, 16);
    assert_eq!(h.controller.current_phase(), SwipePhase::Dismissing);
    h.settle();

    assert_eq!(h.dismissals.get(), 1);
    assert!(h.controller.is_dismissed());
    assert_eq!(h.controller.current_offset(), WIDTH);
    assert_eq!(h.controller.current_phase(), SwipePhase::Idle);
    assert!(offsets.borrow().iter().all(|value| *value <= WIDTH));

    h.frames(10);
    assert_eq!(h.dismissals.get(), 1);
}

#[test]
fn fling_to_the_start_dismisses_at_negative_edge() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    h.swipe(-40.0, 5, 16);
    h.settle();
    assert_eq!(h.controller.current_offset(), -WIDTH);
    assert_eq!(h.dismissals.get(), 1);
}

#[test]
fn start_only_ignores_drags_towards_the_end() {
    let config = SwipeToDismissConfig::new(WIDTH).with_direction(SwipeDirection::StartOnly);
    let mut h = Harness::new(config);

    h.swipe(40.0, 5, 16);
    assert_eq!(h.controller.current_offset(), 0.0);
    assert_eq!(h.controller.current_phase(), SwipePhase::SnappingBack);
    h.settle();
    assert_eq!(h.dismissals.get(), 0);

    h.swipe(-40.0, 5, 16);
    h.settle();
    assert_eq!(h.controller.current_offset(), -WIDTH);
    assert_eq!(h.dismissals.get(), 1);
}

#[test]
fn tap_never_dismisses() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    let c = &h.controller;
    c.pointer_down(PointerSample::new(0, Point::new(5.0, 5.0)));
    c.pointer_up(PointerSample::new(1, Point::new(5.0, 5.0)));
    assert_eq!(c.current_phase(), SwipePhase::SnappingBack);

    h.frame();
    assert_eq!(h.controller.current_phase(), SwipePhase::Idle);
    assert_eq!(h.controller.current_offset(), 0.0);
    assert_eq!(h.dismissals.get(), 0);
}

#[test]
fn quick_flick_below_slop_counts_as_tap() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    // 6 px in 2 ms would be a 3000 px/s fling if it were a drag.
    h.controller.pointer_down(PointerSample::new(0, Point::ZERO));
    h.controller
        .pointer_move(PointerSample::new(1, Point::new(3.0, 0.0)));
    h.controller
        .pointer_up(PointerSample::new(2, Point::new(6.0, 0.0)));
    assert_eq!(h.controller.current_phase(), SwipePhase::SnappingBack);
    h.settle();
    assert_eq!(h.controller.current_offset(), 0.0);
    assert_eq!(h.dismissals.get(), 0);
}

#[test]
fn pointer_down_mid_animation_holds_position() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    h.swipe(40.0, 5, 16);
    h.frames(2);
    let before = h.controller.current_offset();
    assert!(before > 0.0 && before < WIDTH);

    h.controller
        .pointer_down(PointerSample::new(500, Point::new(100.0, 0.0)));
    assert_eq!(h.controller.current_phase(), SwipePhase::Dragging);
    assert!((h.controller.current_offset() - before).abs() < 1e-4);

    h.frames(20);
    assert!((h.controller.current_offset() - before).abs() < 1e-4);
    assert_eq!(h.dismissals.get(), 0);

    h.controller
        .pointer_move(PointerSample::new(516, Point::new(90.0, 0.0)));
    assert!((h.controller.current_offset() - (before - 10.0)).abs() < 1e-3);
}

#[test]
fn pointer_down_during_snap_back_continues_from_last_value() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    h.swipe(20.0, 5, 60);
    h.frames(2);
    let before = h.controller.current_offset();
    assert!(before > 0.0 && before < 100.0);

    h.controller.pointer_down(PointerSample::new(1_000, Point::ZERO));
    assert_eq!(h.controller.current_offset(), before);
    assert!(!h.handle().has_frame_callbacks());
}

#[test]
fn cancel_springs_back_without_dismissing() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    let c = &h.controller;
    c.pointer_down(PointerSample::new(0, Point::ZERO));
    for i in 1..=5 {
        c.pointer_move(PointerSample::new(i * 16, Point::new(i as f32 * 40.0, 0.0)));
    }
    c.pointer_cancel();
    assert_eq!(c.current_phase(), SwipePhase::SnappingBack);
    h.settle();
    assert_eq!(h.controller.current_offset(), 0.0);
    assert_eq!(h.dismissals.get(), 0);
}

#[test]
fn pointer_events_are_consumed_only_past_slop() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    let c = &h.controller;

    let down = PointerEvent::down(Point::ZERO, 0);
    assert!(c.handle_pointer_event(&down));
    assert!(!down.is_consumed());

    let small = PointerEvent::moved(Point::new(3.0, 0.0), 16);
    assert!(c.handle_pointer_event(&small));
    assert!(!small.is_consumed());

    let large = PointerEvent::moved(Point::new(30.0, 0.0), 32);
    assert!(c.handle_pointer_event(&large));
    assert!(large.is_consumed());

    let up = PointerEvent::up(Point::new(30.0, 0.0), 100);
    assert!(c.handle_pointer_event(&up));
    assert!(up.is_consumed());

    let stray = PointerEvent::moved(Point::new(40.0, 0.0), 120);
    assert!(!c.handle_pointer_event(&stray));
    h.settle();
}

#[test]
fn consumed_down_does_not_start_a_session() {
    let h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    let down = PointerEvent::down(Point::ZERO, 0);
    down.consume();
    assert!(!h.controller.handle_pointer_event(&down));
    assert!(h.controller.session().is_none());
}

#[test]
fn reset_returns_to_rest() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    h.swipe(40.0, 5, 16);
    h.settle();
    assert!(h.controller.is_dismissed());

    h.controller.reset();
    assert_eq!(h.controller.current_offset(), 0.0);
    assert_eq!(h.controller.current_phase(), SwipePhase::Idle);
    assert!(!h.controller.is_dismissed());
}

#[test]
fn exponential_decay_also_dismisses() {
    let config = SwipeToDismissConfig::new(WIDTH).with_decay(DecayKind::Exponential {
        friction_multiplier: 1.0,
        velocity_threshold: 0.1,
    });
    let mut h = Harness::new(config);
    h.swipe(40.0, 5, 16);
    assert_eq!(h.controller.current_phase(), SwipePhase::Dismissing);
    h.settle();
    assert_eq!(h.controller.current_offset(), WIDTH);
    assert_eq!(h.dismissals.get(), 1);
}

#[test]
fn invalid_configs_are_rejected() {
    let runtime = Runtime::default();
    let err = SwipeToDismissController::new(SwipeToDismissConfig::new(0.0), runtime.frame_clock())
        .err()
        .expect("zero width rejected");
    assert_eq!(err, ConfigError::InvalidContainerWidth(0.0));

    let bad_decay = SwipeToDismissConfig::new(WIDTH).with_decay(DecayKind::Spline { density: -1.0 });
    assert_eq!(
        bad_decay.validate(),
        Err(ConfigError::Decay(DecaySpecError::NonPositiveDensity(-1.0)))
    );
    assert_eq!(
        SwipeToDismissConfig::new(WIDTH)
            .with_touch_slop(f32::INFINITY)
            .validate(),
        Err(ConfigError::InvalidTouchSlop(f32::INFINITY))
    );
    assert_eq!(
        ConfigError::InvalidMaxFlingVelocity(0.0).to_string(),
        "max fling velocity must be positive and finite, got 0"
    );

    let h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    assert!(h.controller.set_container_width(-5.0).is_err());
    assert!(h.controller.set_container_width(500.0).is_ok());
    assert_eq!(h.controller.config().container_width, 500.0);
}

#[test]
fn only_the_first_pointer_drives_the_session() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    let c = &h.controller;

    assert!(c.handle_pointer_event(&PointerEvent::down(Point::new(100.0, 0.0), 0).with_id(1)));
    assert!(c.handle_pointer_event(&PointerEvent::moved(Point::new(120.0, 0.0), 16).with_id(1)));
    assert_eq!(c.current_offset(), 20.0);

    // A second finger lands and races across the container.
    let second_down = PointerEvent::down(Point::new(260.0, 0.0), 20).with_id(2);
    assert!(!c.handle_pointer_event(&second_down));
    assert!(!second_down.is_consumed());
    for (i, x) in [280.0, 400.0, 520.0, 640.0].into_iter().enumerate() {
        let stray = PointerEvent::moved(Point::new(x, 0.0), 24 + i as i64 * 8).with_id(2);
        assert!(!c.handle_pointer_event(&stray));
        assert!(!stray.is_consumed());
    }
    assert_eq!(c.current_offset(), 20.0);
    assert_eq!(c.session().map(|session| session.pointer), Some(1));

    let second_up = PointerEvent::up(Point::new(640.0, 0.0), 60).with_id(2);
    assert!(!c.handle_pointer_event(&second_up));
    assert!(!c.handle_pointer_event(&PointerEvent::cancel(Point::ZERO, 60).with_id(2)));
    assert!(c.is_dragging());

    // The first finger rests, then lifts: no fling from the other pointer.
    assert!(c.handle_pointer_event(&PointerEvent::up(Point::new(120.0, 0.0), 200).with_id(1)));
    assert_eq!(c.current_phase(), SwipePhase::SnappingBack);
    h.settle();
    assert_eq!(h.controller.current_offset(), 0.0);
    assert_eq!(h.dismissals.get(), 0);
}

#[test]
fn width_change_mid_drag_does_not_move_the_released_element() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    let c = &h.controller;

    c.pointer_down(PointerSample::new(0, Point::ZERO));
    c.pointer_move(PointerSample::new(16, Point::new(250.0, 0.0)));
    c.set_container_width(200.0).expect("valid width");
    c.pointer_up(PointerSample::new(200, Point::new(250.0, 0.0)));

    assert_eq!(c.current_offset(), 250.0);
    let session = c.session().expect("session");
    assert_eq!(session.bounds, (-WIDTH, WIDTH));
    assert_eq!(session.container_width, WIDTH);
    assert_eq!(c.current_phase(), SwipePhase::SnappingBack);
    h.settle();
    assert_eq!(h.controller.current_offset(), 0.0);

    // The new width applies from the next session on.
    h.controller.pointer_down(PointerSample::new(300, Point::ZERO));
    h.controller
        .pointer_move(PointerSample::new(316, Point::new(250.0, 0.0)));
    assert_eq!(h.controller.current_offset(), 200.0);
    assert_eq!(h.controller.session().map(|s| s.container_width), Some(200.0));
}

#[test]
fn dismissal_uses_the_width_from_pointer_down() {
    let mut h = Harness::new(SwipeToDismissConfig::new(WIDTH));
    let c = &h.controller;

    c.pointer_down(PointerSample::new(0, Point::ZERO));
    for i in 1..=5 {
        c.pointer_move(PointerSample::new(i * 16, Point::new(i as f32 * 50.0, 0.0)));
    }
    c.set_container_width(2_000.0).expect("valid width");
    c.pointer_up(PointerSample::new(80, Point::new(250.0, 0.0)));
    assert_eq!(c.current_phase(), SwipePhase::Dismissing);

    h.settle();
    assert_eq!(h.dismissals.get(), 1);
    assert_eq!(h.controller.current_offset(), WIDTH);
}
