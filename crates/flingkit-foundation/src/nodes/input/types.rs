use flingkit_ui_graphics::Point;
use std::cell::Cell;
use std::rc::Rc;

use crate::velocity_tracker::PointerSample;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Pointer event with consumption tracking.
///
/// Consumption is shared between clones, so a handler further down the chain
/// sees that an earlier one (for example an active swipe) claimed the event.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    /// Position in the handler's local coordinates.
    pub position: Point,
    /// Monotonic input timestamp in milliseconds.
    pub uptime_millis: i64,
    consumed: Rc<Cell<bool>>,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point, uptime_millis: i64) -> Self {
        Self {
            id: 0,
            kind,
            position,
            uptime_millis,
            consumed: Rc::new(Cell::new(false)),
        }
    }

    pub fn down(position: Point, uptime_millis: i64) -> Self {
        Self::new(PointerEventKind::Down, position, uptime_millis)
    }

    pub fn moved(position: Point, uptime_millis: i64) -> Self {
        Self::new(PointerEventKind::Move, position, uptime_millis)
    }

    pub fn up(position: Point, uptime_millis: i64) -> Self {
        Self::new(PointerEventKind::Up, position, uptime_millis)
    }

    pub fn cancel(position: Point, uptime_millis: i64) -> Self {
        Self::new(PointerEventKind::Cancel, position, uptime_millis)
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }

    pub fn sample(&self) -> PointerSample {
        PointerSample::new(self.uptime_millis, self.position)
    }

    pub fn consume(&self) {
        self.consumed.set(true);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }

    /// Copy in another coordinate space, sharing the consumption flag.
    pub fn copy_with_local_position(&self, position: Point) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}
