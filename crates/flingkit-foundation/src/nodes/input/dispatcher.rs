//! Pointer event queue between a platform input source and gesture handlers.
//!
//! Platforms push events as they arrive; the host drains them once per frame
//! (before draining frame callbacks) into the handlers that own gestures.

use super::types::PointerEvent;

/// Receiver of pointer events. Returns `true` if the event was handled.
pub trait PointerInputHandler {
    fn on_pointer_event(&self, event: &PointerEvent) -> bool;
}

#[derive(Default)]
pub struct PointerDispatcher {
    queue: Vec<PointerEvent>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.queue.push(event);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain<F>(&mut self, mut handler: F)
    where
        F: FnMut(PointerEvent),
    {
        for event in self.queue.drain(..) {
            handler(event);
        }
    }

    /// Offers every queued event to `handlers` in order. Returns how many
    /// events at least one handler accepted.
    pub fn dispatch(&mut self, handlers: &[&dyn PointerInputHandler]) -> usize {
        let mut handled = 0;
        for event in self.queue.drain(..) {
            let mut accepted = false;
            for handler in handlers {
                accepted |= handler.on_pointer_event(&event);
            }
            if accepted {
                handled += 1;
            } else {
                log::trace!("unhandled {:?} at {:?}", event.kind, event.position);
            }
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::input::types::PointerEventKind;
    use flingkit_ui_graphics::Point;
    use std::cell::RefCell;

    struct Recorder {
        kinds: RefCell<Vec<PointerEventKind>>,
        consume: bool,
    }

    impl PointerInputHandler for Recorder {
        fn on_pointer_event(&self, event: &PointerEvent) -> bool {
            if event.is_consumed() {
                return false;
            }
            self.kinds.borrow_mut().push(event.kind);
            if self.consume {
                event.consume();
            }
            true
        }
    }

    #[test]
    fn dispatch_preserves_order_and_respects_consumption() {
        let first = Recorder {
            kinds: RefCell::new(Vec::new()),
            consume: true,
        };
        let second = Recorder {
            kinds: RefCell::new(Vec::new()),
            consume: false,
        };

        let mut dispatcher = PointerDispatcher::new();
        dispatcher.push(PointerEvent::down(Point::ZERO, 0));
        dispatcher.push(PointerEvent::moved(Point::new(4.0, 0.0), 16));
        dispatcher.push(PointerEvent::up(Point::new(4.0, 0.0), 32));
        assert_eq!(dispatcher.len(), 3);

        let handled = dispatcher.dispatch(&[&first, &second]);

        assert_eq!(handled, 3);
        assert!(dispatcher.is_empty());
        assert_eq!(
            *first.kinds.borrow(),
            vec![
                PointerEventKind::Down,
                PointerEventKind::Move,
                PointerEventKind::Up
            ]
        );
        assert!(second.kinds.borrow().is_empty());
    }

    #[test]
    fn drain_hands_out_events() {
        let mut dispatcher = PointerDispatcher::new();
        dispatcher.push(PointerEvent::down(Point::ZERO, 0).with_id(7));
        let mut ids = Vec::new();
        dispatcher.drain(|event| ids.push(event.id));
        assert_eq!(ids, vec![7]);
    }
}
