//! Horizontal drag that either settles back to rest or flings the element
//! out of its container.
//!
//! The controller owns a single [`Animatable`] offset. While a pointer is down
//! the offset follows the finger; on release the decay curve projects where a
//! free fling would stop. Projections that stay inside the container spring
//! back to zero, the rest coast out along the decay until they hit the
//! container edge, and the dismissal callback fires.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use flingkit_animation::{
    Animatable, AnimationEndReason, AnimationHandle, AnimationResult, FloatDecayAnimationSpec,
};
use flingkit_core::{FrameClock, MutableState, State};
use flingkit_ui_graphics::{GraphicsLayer, Point};

use super::swipe_config::{ConfigError, SwipeToDismissConfig};
use crate::gesture_constants::MIN_FLING_VELOCITY;
use crate::nodes::input::dispatcher::PointerInputHandler;
use crate::nodes::input::types::{PointerEvent, PointerEventKind, PointerId};
use crate::velocity_tracker::{PointerSample, VelocityTracker1D};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwipePhase {
    #[default]
    Idle,
    Dragging,
    /// Released; the decay projection is being evaluated.
    Deciding,
    SnappingBack,
    Dismissing,
}

/// One press-drag-release interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub id: u64,
    /// Pointer that started the session; other pointers are ignored.
    pub pointer: PointerId,
    pub current_offset: f32,
    /// `false` once the pointer is released or cancelled.
    pub is_active: bool,
    pub bounds: (f32, f32),
    /// Dismiss distance in effect when the session started.
    pub container_width: f32,
    /// Path length covered by the pointer since it went down.
    pub travelled: f32,
    pub dismissed: bool,
}

struct ControllerState {
    config: SwipeToDismissConfig,
    decay: Rc<dyn FloatDecayAnimationSpec>,
    tracker: VelocityTracker1D,
    session: Option<DragSession>,
    next_session_id: u64,
    last_position: Option<Point>,
    animation: Option<AnimationHandle<f32>>,
    on_dismissed: Option<Rc<dyn Fn()>>,
}

struct Shared {
    offset: Animatable<f32>,
    phase: MutableState<SwipePhase>,
    state: RefCell<ControllerState>,
}

impl Shared {
    fn set_phase(&self, phase: SwipePhase) {
        let previous = self.phase.get();
        if previous != phase {
            log::debug!("swipe phase {:?} -> {:?}", previous, phase);
            self.phase.set(phase);
        }
    }
}

/// Drag-fling-settle state machine for one element.
#[derive(Clone)]
pub struct SwipeToDismissController {
    shared: Rc<Shared>,
}

impl SwipeToDismissController {
    pub fn new(config: SwipeToDismissConfig, frame_clock: FrameClock) -> Result<Self, ConfigError> {
        config.validate()?;
        let decay = config.decay.build()?;
        let (lower, upper) = config.direction.bounds(config.container_width);
        let offset = Animatable::new(0.0f32, frame_clock);
        offset.update_bounds(Some(lower), Some(upper));

        Ok(Self {
            shared: Rc::new(Shared {
                offset,
                phase: MutableState::new(SwipePhase::Idle),
                state: RefCell::new(ControllerState {
                    config,
                    decay,
                    tracker: VelocityTracker1D::new(),
                    session: None,
                    next_session_id: 1,
                    last_position: None,
                    animation: None,
                    on_dismissed: None,
                }),
            }),
        })
    }

    /// Registers the callback run once per dismissed session.
    pub fn set_on_dismissed(&self, callback: impl Fn() + 'static) {
        self.shared.state.borrow_mut().on_dismissed = Some(Rc::new(callback));
    }

    pub fn config(&self) -> SwipeToDismissConfig {
        self.shared.state.borrow().config
    }

    /// Applies to the next session; a running one keeps its bounds.
    pub fn set_container_width(&self, container_width: f32) -> Result<(), ConfigError> {
        let mut state = self.shared.state.borrow_mut();
        let config = SwipeToDismissConfig {
            container_width,
            ..state.config
        };
        config.validate()?;
        state.config = config;
        Ok(())
    }

    pub fn offset(&self) -> State<f32> {
        self.shared.offset.state()
    }

    pub fn current_offset(&self) -> f32 {
        self.shared.offset.value()
    }

    pub fn phase(&self) -> State<SwipePhase> {
        self.shared.phase.as_state()
    }

    pub fn current_phase(&self) -> SwipePhase {
        self.shared.phase.get()
    }

    /// Whether the latest session ended in a dismissal.
    pub fn is_dismissed(&self) -> bool {
        self.session().is_some_and(|session| session.dismissed)
    }

    pub fn session(&self) -> Option<DragSession> {
        let state = self.shared.state.borrow();
        state.session.map(|mut session| {
            session.current_offset = self.shared.offset.value();
            session
        })
    }

    /// Layer translating the element by the current offset.
    pub fn layer(&self) -> GraphicsLayer {
        GraphicsLayer {
            translation_x: self.current_offset(),
            ..GraphicsLayer::default()
        }
    }

    /// Starts a new session, halting any settle or dismiss animation in place.
    pub fn pointer_down(&self, sample: PointerSample) {
        self.start_session(0, sample);
    }

    fn start_session(&self, pointer: PointerId, sample: PointerSample) {
        let running = self.shared.state.borrow_mut().animation.take();
        if let Some(animation) = running {
            animation.stop();
        }
        let start = self.shared.offset.stop();

        let bounds = {
            let mut guard = self.shared.state.borrow_mut();
            let state = &mut *guard;
            let container_width = state.config.container_width;
            let bounds = state.config.direction.bounds(container_width);
            state.tracker.reset();
            state
                .tracker
                .add_data_point(sample.uptime_millis, sample.position.x);
            state.last_position = Some(sample.position);
            let id = state.next_session_id;
            state.next_session_id += 1;
            state.session = Some(DragSession {
                id,
                pointer,
                current_offset: start,
                is_active: true,
                bounds,
                container_width,
                travelled: 0.0,
                dismissed: false,
            });
            log::debug!("swipe session {} down at {:?}, offset {}", id, sample.position, start);
            bounds
        };

        self.shared.offset.update_bounds(Some(bounds.0), Some(bounds.1));
        self.shared.set_phase(SwipePhase::Dragging);
    }

    /// Follows the pointer. Returns `false` when no session is active.
    pub fn pointer_move(&self, sample: PointerSample) -> bool {
        let next = {
            let mut guard = self.shared.state.borrow_mut();
            let state = &mut *guard;
            let Some(session) = state.session.as_mut().filter(|session| session.is_active) else {
                return false;
            };
            let last = state.last_position.replace(sample.position).unwrap_or(sample.position);
            let delta_x = sample.position.x - last.x;
            session.travelled += sample.position.distance_to(last);
            state
                .tracker
                .add_data_point(sample.uptime_millis, sample.position.x);

            let (lower, upper) = session.bounds;
            session.current_offset = (session.current_offset + delta_x).clamp(lower, upper);
            session.current_offset
        };
        self.shared.offset.snap_to(next);
        true
    }

    /// Ends the session at `sample` and settles or dismisses.
    ///
    /// The release sample still feeds the velocity estimate, so a pointer that
    /// rested before lifting releases with no velocity.
    pub fn pointer_up(&self, sample: PointerSample) {
        self.pointer_move(sample);
        self.release(false);
    }

    /// Ends the session with no velocity; the offset springs back.
    pub fn pointer_cancel(&self) {
        self.release(true);
    }

    /// Whether a pointer currently drives the offset.
    pub fn is_dragging(&self) -> bool {
        self.shared
            .state
            .borrow()
            .session
            .is_some_and(|session| session.is_active)
    }

    /// Whether `pointer` drives the active session.
    fn tracks(&self, pointer: PointerId) -> bool {
        self.shared
            .state
            .borrow()
            .session
            .is_some_and(|session| session.is_active && session.pointer == pointer)
    }

    /// Whether the active session has moved far enough to be a drag.
    fn past_touch_slop(&self) -> bool {
        let state = self.shared.state.borrow();
        state
            .session
            .is_some_and(|session| session.is_active && session.travelled >= state.config.touch_slop)
    }

    /// Routes a pointer event. Only the pointer that went down first drives
    /// a session; events from other pointers are left untouched. Moves and
    /// releases are consumed once the pointer has travelled past the touch
    /// slop, so taps still reach handlers further down.
    pub fn handle_pointer_event(&self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Down => {
                if event.is_consumed() || self.is_dragging() {
                    return false;
                }
                self.start_session(event.id, event.sample());
                true
            }
            PointerEventKind::Move => {
                if event.is_consumed()
                    || !self.tracks(event.id)
                    || !self.pointer_move(event.sample())
                {
                    return false;
                }
                if self.past_touch_slop() {
                    event.consume();
                }
                true
            }
            PointerEventKind::Up => {
                if !self.tracks(event.id) {
                    return false;
                }
                if self.past_touch_slop() {
                    event.consume();
                }
                self.pointer_up(event.sample());
                true
            }
            PointerEventKind::Cancel => {
                if !self.tracks(event.id) {
                    return false;
                }
                self.pointer_cancel();
                true
            }
        }
    }

    /// Returns the element to rest at zero and forgets the last session.
    pub fn reset(&self) {
        let running = {
            let mut state = self.shared.state.borrow_mut();
            state.session = None;
            state.last_position = None;
            state.tracker.reset();
            state.animation.take()
        };
        if let Some(animation) = running {
            animation.stop();
        }
        self.shared.offset.snap_to(0.0);
        self.shared.set_phase(SwipePhase::Idle);
    }

    fn release(&self, cancelled: bool) {
        let (session, velocity) = {
            let mut guard = self.shared.state.borrow_mut();
            let state = &mut *guard;
            let Some(session) = state.session.as_mut().filter(|session| session.is_active) else {
                return;
            };
            session.is_active = false;
            state.last_position = None;

            let velocity = if cancelled || session.travelled < state.config.touch_slop {
                0.0
            } else {
                state
                    .tracker
                    .calculate_velocity_with_max(state.config.max_fling_velocity)
            };
            let velocity = if velocity.abs() < MIN_FLING_VELOCITY {
                0.0
            } else {
                velocity
            };
            (*session, velocity)
        };

        settle(&self.shared, &session, velocity);
    }
}

/// Chooses between snapping back and dismissing, then starts the animation.
///
/// Uses the bounds and width captured when the session started, so a width
/// change mid-drag never moves the released element.
fn settle(shared: &Rc<Shared>, session: &DragSession, velocity: f32) {
    shared.set_phase(SwipePhase::Deciding);
    let session_id = session.id;

    let (config, decay) = {
        let state = shared.state.borrow();
        (state.config, Rc::clone(&state.decay))
    };
    let (lower, upper) = session.bounds;
    shared.offset.update_bounds(Some(lower), Some(upper));

    let current = shared.offset.value();
    let projected = decay.get_target_value(current, velocity);
    let dismiss = projected.abs() > session.container_width
        && config.direction.allows_dismiss_towards(projected);
    log::debug!(
        "swipe session {} released at {} with {}px/s, projected {} -> {}",
        session_id,
        current,
        velocity,
        projected,
        if dismiss { "dismiss" } else { "snap back" }
    );

    let weak = Rc::downgrade(shared);
    let animation = if dismiss {
        shared.set_phase(SwipePhase::Dismissing);
        shared.offset.animate_decay(velocity, decay, move |result| {
            on_settled(&weak, session_id, true, result)
        })
    } else {
        shared.set_phase(SwipePhase::SnappingBack);
        shared
            .offset
            .animate_to(0.0, config.snap_back, velocity, move |result| {
                on_settled(&weak, session_id, false, result)
            })
    };

    if animation.is_running() {
        shared.state.borrow_mut().animation = Some(animation);
    }
}

fn on_settled(
    shared: &Weak<Shared>,
    session_id: u64,
    dismissing: bool,
    result: AnimationResult<f32>,
) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    if matches!(
        result.end_reason,
        AnimationEndReason::Stopped | AnimationEndReason::Interrupted
    ) {
        // A new session or a reset took over.
        return;
    }

    let (callback, edge) = {
        let mut guard = shared.state.borrow_mut();
        let state = &mut *guard;
        state.animation = None;
        let Some(session) = state.session.as_mut().filter(|session| session.id == session_id)
        else {
            return;
        };
        session.current_offset = result.end_value;
        if !dismissing || session.dismissed {
            (None, None)
        } else {
            session.dismissed = true;
            let (lower, upper) = session.bounds;
            let edge = if result.end_value < 0.0 { lower } else { upper };
            session.current_offset = edge;
            (state.on_dismissed.clone(), Some(edge))
        }
    };

    if let Some(edge) = edge {
        // A decay that runs out just short of the edge still rests on it.
        if shared.offset.value() != edge {
            shared.offset.snap_to(edge);
        }
        log::debug!("swipe session {} dismissed at {}", session_id, edge);
    }
    shared.set_phase(SwipePhase::Idle);
    if let Some(callback) = callback {
        callback();
    }
}

impl PointerInputHandler for SwipeToDismissController {
    fn on_pointer_event(&self, event: &PointerEvent) -> bool {
        self.handle_pointer_event(event)
    }
}

#[cfg(test)]
#[path = "../../../tests/swipe_to_dismiss_tests.rs"]
mod tests;
