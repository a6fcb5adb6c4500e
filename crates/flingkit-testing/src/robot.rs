//! Robot-style gesture input for tests.
//!
//! A [`GestureRobot`] synthesises pointer events with timestamps taken from
//! its [`FrameDriver`], delivers them to a [`PointerInputHandler`], and runs a
//! frame between consecutive moves the way a real host interleaves input and
//! animation.
//!
//! ```
//! use flingkit_foundation::{SwipeToDismissConfig, SwipeToDismissController};
//! use flingkit_testing::GestureRobot;
//! use flingkit_ui_graphics::Point;
//!
//! let mut robot = GestureRobot::new();
//! let controller =
//!     SwipeToDismissController::new(SwipeToDismissConfig::new(400.0), robot.frame_clock())
//!         .unwrap();
//!
//! robot.fling(&controller, Point::new(10.0, 10.0), 120.0, 6);
//! robot.settle();
//! assert!(controller.is_dismissed());
//! ```

use std::cell::RefCell;

use flingkit_core::{FrameClock, RuntimeHandle};
use flingkit_foundation::{
    PointerEvent, PointerId, PointerInputHandler, TransformGestureDetector, TransformableState,
};
use flingkit_ui_graphics::Point;

use crate::frame_driver::FrameDriver;

/// Drives pointer input and frames against a single virtual clock.
pub struct GestureRobot {
    driver: FrameDriver,
}

impl Default for GestureRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRobot {
    pub fn new() -> Self {
        Self::with_driver(FrameDriver::new())
    }

    pub fn with_driver(driver: FrameDriver) -> Self {
        Self { driver }
    }

    pub fn driver(&mut self) -> &mut FrameDriver {
        &mut self.driver
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.driver.frame_clock()
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.driver.handle()
    }

    pub fn now_millis(&self) -> i64 {
        self.driver.now_millis()
    }

    pub fn frame(&mut self) {
        self.driver.frame();
    }

    pub fn frames(&mut self, count: usize) {
        self.driver.frames(count);
    }

    /// Runs frames until every animation has settled.
    pub fn settle(&mut self) -> usize {
        self.driver.settle()
    }

    /// Delivers `event` and reports whether the target handled it.
    pub fn send(&self, target: &dyn PointerInputHandler, event: PointerEvent) -> bool {
        log::trace!("robot {:?} {:?} at {:?}", event.id, event.kind, event.position);
        target.on_pointer_event(&event)
    }

    pub fn press(&self, target: &dyn PointerInputHandler, position: Point) -> bool {
        self.press_pointer(target, 0, position)
    }

    pub fn press_pointer(
        &self,
        target: &dyn PointerInputHandler,
        id: PointerId,
        position: Point,
    ) -> bool {
        self.send(target, PointerEvent::down(position, self.now_millis()).with_id(id))
    }

    pub fn move_to(&self, target: &dyn PointerInputHandler, position: Point) -> bool {
        self.move_pointer(target, 0, position)
    }

    pub fn move_pointer(
        &self,
        target: &dyn PointerInputHandler,
        id: PointerId,
        position: Point,
    ) -> bool {
        self.send(target, PointerEvent::moved(position, self.now_millis()).with_id(id))
    }

    pub fn release(&self, target: &dyn PointerInputHandler, position: Point) -> bool {
        self.release_pointer(target, 0, position)
    }

    pub fn release_pointer(
        &self,
        target: &dyn PointerInputHandler,
        id: PointerId,
        position: Point,
    ) -> bool {
        self.send(target, PointerEvent::up(position, self.now_millis()).with_id(id))
    }

    pub fn cancel(&self, target: &dyn PointerInputHandler, position: Point) -> bool {
        self.send(target, PointerEvent::cancel(position, self.now_millis()))
    }

    /// Press and release at the same position within one frame.
    pub fn tap(&mut self, target: &dyn PointerInputHandler, position: Point) {
        self.press(target, position);
        self.frame();
        self.release(target, position);
    }

    /// Press at `from`, move in `steps` equal increments (one frame each) to
    /// `to`, optionally rest for `hold_millis`, then release at `to`.
    pub fn drag(
        &mut self,
        target: &dyn PointerInputHandler,
        from: Point,
        to: Point,
        steps: usize,
        hold_millis: u64,
    ) {
        let steps = steps.max(1);
        self.press(target, from);
        for step in 1..=steps {
            self.frame();
            let t = step as f32 / steps as f32;
            self.move_to(target, from + (to - from) * t);
        }
        if hold_millis > 0 {
            self.driver.advance_millis(hold_millis);
        }
        self.release(target, to);
    }

    /// Horizontal swipe of `step_x` per frame for `steps` frames, released
    /// while still moving.
    pub fn fling(
        &mut self,
        target: &dyn PointerInputHandler,
        from: Point,
        step_x: f32,
        steps: usize,
    ) {
        let to = Point::new(from.x + step_x * steps as f32, from.y);
        self.drag(target, from, to, steps, 0);
    }
}

/// Pointer handler wrapping a [`TransformGestureDetector`] bound to a
/// [`TransformableState`].
pub struct TransformTarget {
    detector: RefCell<TransformGestureDetector>,
    state: TransformableState,
}

impl TransformTarget {
    pub fn new(state: TransformableState) -> Self {
        Self {
            detector: RefCell::new(TransformGestureDetector::new()),
            state,
        }
    }

    pub fn state(&self) -> &TransformableState {
        &self.state
    }

    pub fn pointer_count(&self) -> usize {
        self.detector.borrow().pointer_count()
    }
}

impl PointerInputHandler for TransformTarget {
    fn on_pointer_event(&self, event: &PointerEvent) -> bool {
        self.detector.borrow_mut().apply(event, &self.state)
    }
}
