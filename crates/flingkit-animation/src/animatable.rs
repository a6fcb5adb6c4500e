//! Frame-driven value holder.
//!
//! An [`Animatable`] owns one animated scalar. At most one animation runs on
//! it at a time: starting a new one, or snapping, interrupts whatever was
//! running. Each animation advances once per drained frame and publishes its
//! value through a [`State`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use flingkit_core::{FrameCallbackRegistration, FrameClock, MutableState, State};

use crate::animation::{AnimationScalar, AnimationType, SpringSpec};
use crate::decay_spec::FloatDecayAnimationSpec;

/// Longest integration step for springs, in seconds.
const MAX_SPRING_STEP_SECONDS: f32 = 0.004;

/// Why an animation stopped producing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEndReason {
    /// Reached its target (or, for a decay, came to rest).
    Finished,
    /// Was clamped by [`Animatable::update_bounds`].
    BoundReached,
    /// Stopped through [`Animatable::stop`] or [`AnimationHandle::stop`].
    Stopped,
    /// Replaced by another animation or a snap.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationResult<T> {
    pub end_reason: AnimationEndReason,
    pub end_value: T,
    /// Velocity at the last frame, in units per second.
    pub end_velocity: f32,
}

type EndCallback<T> = Box<dyn FnOnce(AnimationResult<T>)>;

enum Motion {
    Target {
        start: f32,
        target: f32,
        animation: AnimationType,
        spring_value: f32,
        spring_velocity: f32,
    },
    Decay {
        initial_value: f32,
        initial_velocity: f32,
        spec: Rc<dyn FloatDecayAnimationSpec>,
    },
}

struct Sample {
    value: f32,
    velocity: f32,
    finished: bool,
}

impl Motion {
    fn sample(&mut self, play_nanos: u64, dt_seconds: f32, previous: f32, velocity: f32) -> Sample {
        match self {
            Motion::Target {
                start,
                target,
                animation,
                spring_value,
                spring_velocity,
            } => match *animation {
                AnimationType::Tween(spec) => {
                    let finished = play_nanos >= spec.total_nanos();
                    let value = if finished {
                        *target
                    } else {
                        lerp(*start, *target, spec.fraction_at(play_nanos))
                    };
                    Sample {
                        value,
                        velocity: numeric_velocity(previous, value, dt_seconds, velocity),
                        finished,
                    }
                }
                AnimationType::Repeatable(spec) => {
                    let (fraction, finished) = spec.fraction_at(play_nanos);
                    let value = lerp(*start, *target, fraction);
                    Sample {
                        value,
                        velocity: numeric_velocity(previous, value, dt_seconds, velocity),
                        finished,
                    }
                }
                AnimationType::Spring(spec) => {
                    step_spring(&spec, *target, spring_value, spring_velocity, dt_seconds);
                    let settled = spring_velocity.abs() < spec.velocity_threshold
                        && (*spring_value - *target).abs() < spec.position_threshold;
                    if settled {
                        Sample {
                            value: *target,
                            velocity: 0.0,
                            finished: true,
                        }
                    } else {
                        Sample {
                            value: *spring_value,
                            velocity: *spring_velocity,
                            finished: false,
                        }
                    }
                }
            },
            Motion::Decay {
                initial_value,
                initial_velocity,
                spec,
            } => {
                let duration = spec.get_duration_nanos(*initial_value, *initial_velocity);
                let play = (play_nanos as i64).min(duration.max(0));
                Sample {
                    value: spec.get_value_from_nanos(play, *initial_value, *initial_velocity),
                    velocity: spec.get_velocity_from_nanos(play, *initial_value, *initial_velocity),
                    finished: play_nanos as i64 >= duration,
                }
            }
        }
    }
}

fn lerp(start: f32, end: f32, fraction: f32) -> f32 {
    start + (end - start) * fraction
}

fn numeric_velocity(previous: f32, value: f32, dt_seconds: f32, fallback: f32) -> f32 {
    if dt_seconds > 0.0 {
        (value - previous) / dt_seconds
    } else {
        fallback
    }
}

/// Semi-implicit Euler on `x'' = -k (x - target) - c x'`.
fn step_spring(spec: &SpringSpec, target: f32, value: &mut f32, velocity: &mut f32, dt: f32) {
    let damping = 2.0 * spec.damping_ratio * spec.stiffness.sqrt();
    let mut remaining = dt;
    while remaining > 0.0 {
        let step = remaining.min(MAX_SPRING_STEP_SECONDS);
        let force = -spec.stiffness * (*value - target) - damping * *velocity;
        *velocity += force * step;
        *value += *velocity * step;
        remaining -= step;
    }
}

/// Returns the clamped value and whether clamping happened.
fn clamp_to_bounds(value: f32, lower: Option<f32>, upper: Option<f32>) -> (f32, bool) {
    if let Some(lower) = lower {
        if value < lower {
            return (lower, true);
        }
    }
    if let Some(upper) = upper {
        if value > upper {
            return (upper, true);
        }
    }
    (value, false)
}

struct Job<T> {
    id: u64,
    motion: Motion,
    start_time_nanos: Option<u64>,
    last_play_nanos: u64,
    registration: Option<FrameCallbackRegistration>,
    status: Rc<Cell<Option<AnimationEndReason>>>,
    on_end: Option<EndCallback<T>>,
}

struct AnimatableInner<T> {
    state: MutableState<T>,
    frame_clock: FrameClock,
    value: f32,
    velocity: f32,
    target: f32,
    lower_bound: Option<f32>,
    upper_bound: Option<f32>,
    job: Option<Job<T>>,
    next_job_id: u64,
}

/// Animated scalar driven by a [`FrameClock`].
pub struct Animatable<T: AnimationScalar> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

impl<T: AnimationScalar> Animatable<T> {
    pub fn new(initial: T, frame_clock: FrameClock) -> Self {
        let value = initial.to_f32();
        let inner = AnimatableInner {
            state: MutableState::new(initial),
            frame_clock,
            value,
            velocity: 0.0,
            target: value,
            lower_bound: None,
            upper_bound: None,
            job: None,
            next_job_id: 1,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn value(&self) -> T {
        self.inner.borrow().state.get()
    }

    /// Current velocity in units per second. Zero when idle.
    pub fn velocity(&self) -> f32 {
        self.inner.borrow().velocity
    }

    pub fn target_value(&self) -> T {
        T::from_f32(self.inner.borrow().target)
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().job.is_some()
    }

    pub fn state(&self) -> State<T> {
        self.inner.borrow().state.as_state()
    }

    pub fn lower_bound(&self) -> Option<T> {
        self.inner.borrow().lower_bound.map(T::from_f32)
    }

    pub fn upper_bound(&self) -> Option<T> {
        self.inner.borrow().upper_bound.map(T::from_f32)
    }

    /// Sets the range the value is kept in. A running animation that leaves
    /// the range ends with [`AnimationEndReason::BoundReached`]; an idle value
    /// outside it is clamped immediately.
    pub fn update_bounds(&self, lower: Option<T>, upper: Option<T>) {
        let lower = lower.map(|bound| bound.to_f32());
        let upper = upper.map(|bound| bound.to_f32());
        if let (Some(lo), Some(hi)) = (lower, upper) {
            if lo > hi {
                log::warn!("ignoring inverted bounds [{}, {}]", lo, hi);
                return;
            }
        }

        let clamped = {
            let mut inner = self.inner.borrow_mut();
            inner.lower_bound = lower;
            inner.upper_bound = upper;
            if inner.job.is_some() {
                None
            } else {
                let (value, changed) = clamp_to_bounds(inner.value, lower, upper);
                if changed {
                    inner.value = value;
                    Some((inner.state.clone(), value))
                } else {
                    None
                }
            }
        };
        if let Some((state, value)) = clamped {
            state.set_value(T::from_f32(value));
        }
    }

    /// Jumps to `value` (clamped to the bounds), interrupting any animation.
    pub fn snap_to(&self, value: T) {
        Self::interrupt(&self.inner);
        let (state, value) = {
            let mut inner = self.inner.borrow_mut();
            let (clamped, _) = clamp_to_bounds(value.to_f32(), inner.lower_bound, inner.upper_bound);
            inner.value = clamped;
            inner.target = clamped;
            inner.velocity = 0.0;
            (inner.state.clone(), clamped)
        };
        state.set_value(T::from_f32(value));
    }

    /// Animates towards `target`, starting with `initial_velocity`.
    ///
    /// `on_end` runs exactly once, whatever the reason the animation ends.
    pub fn animate_to(
        &self,
        target: T,
        animation: impl Into<AnimationType>,
        initial_velocity: f32,
        on_end: impl FnOnce(AnimationResult<T>) + 'static,
    ) -> AnimationHandle<T> {
        let target = target.to_f32();
        let animation = animation.into();
        let start = self.inner.borrow().value;
        let motion = Motion::Target {
            start,
            target,
            animation,
            spring_value: start,
            spring_velocity: initial_velocity,
        };
        log::trace!("animate_to {} -> {} ({:?})", start, target, animation);
        Self::start_job(&self.inner, motion, target, initial_velocity, Box::new(on_end))
    }

    /// Lets the value coast from `initial_velocity` until `spec` brings it to
    /// rest or a bound stops it.
    pub fn animate_decay(
        &self,
        initial_velocity: f32,
        spec: Rc<dyn FloatDecayAnimationSpec>,
        on_end: impl FnOnce(AnimationResult<T>) + 'static,
    ) -> AnimationHandle<T> {
        let initial_value = self.inner.borrow().value;
        let target = spec.get_target_value(initial_value, initial_velocity);
        log::trace!(
            "animate_decay from {} at {}/s towards {}",
            initial_value,
            initial_velocity,
            target
        );
        let motion = Motion::Decay {
            initial_value,
            initial_velocity,
            spec,
        };
        Self::start_job(&self.inner, motion, target, initial_velocity, Box::new(on_end))
    }

    /// Stops the running animation where it is and returns the value.
    pub fn stop(&self) -> T {
        let running = self.inner.borrow().job.as_ref().map(|job| job.id);
        if let Some(id) = running {
            Self::end_job(&self.inner, id, AnimationEndReason::Stopped);
        }
        self.value()
    }

    fn interrupt(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let running = this.borrow().job.as_ref().map(|job| job.id);
        if let Some(id) = running {
            Self::end_job(this, id, AnimationEndReason::Interrupted);
        }
    }

    fn start_job(
        this: &Rc<RefCell<AnimatableInner<T>>>,
        motion: Motion,
        target: f32,
        initial_velocity: f32,
        on_end: EndCallback<T>,
    ) -> AnimationHandle<T> {
        Self::interrupt(this);

        let status = Rc::new(Cell::new(None));
        let id = {
            let mut inner = this.borrow_mut();
            let id = inner.next_job_id;
            inner.next_job_id += 1;
            inner.target = target;
            inner.velocity = initial_velocity;
            inner.job = Some(Job {
                id,
                motion,
                start_time_nanos: None,
                last_play_nanos: 0,
                registration: None,
                status: Rc::clone(&status),
                on_end: Some(on_end),
            });
            id
        };
        Self::schedule_frame(this, id);

        AnimationHandle {
            id,
            inner: Rc::downgrade(this),
            status,
        }
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>, job_id: u64) {
        let clock = {
            let inner = this.borrow();
            match &inner.job {
                Some(job) if job.id == job_id && job.registration.is_none() => {
                    inner.frame_clock.clone()
                }
                _ => return,
            }
        };

        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, job_id, time);
            }
        });

        let mut inner = this.borrow_mut();
        if let Some(job) = inner.job.as_mut().filter(|job| job.id == job_id) {
            job.registration = Some(registration);
        }
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, job_id: u64, frame_time_nanos: u64) {
        let (state, value, end_reason) = {
            let mut guard = this.borrow_mut();
            let inner = &mut *guard;
            let Some(job) = inner.job.as_mut().filter(|job| job.id == job_id) else {
                return;
            };
            job.registration = None;

            let start = *job.start_time_nanos.get_or_insert(frame_time_nanos);
            let play_nanos = frame_time_nanos.saturating_sub(start);
            let dt_seconds = play_nanos.saturating_sub(job.last_play_nanos) as f32 / 1_000_000_000.0;
            job.last_play_nanos = play_nanos;

            let sample = job
                .motion
                .sample(play_nanos, dt_seconds, inner.value, inner.velocity);
            let (value, hit_bound) =
                clamp_to_bounds(sample.value, inner.lower_bound, inner.upper_bound);
            inner.value = value;
            inner.velocity = sample.velocity;

            let end_reason = if hit_bound {
                Some(AnimationEndReason::BoundReached)
            } else if sample.finished {
                Some(AnimationEndReason::Finished)
            } else {
                None
            };
            (inner.state.clone(), value, end_reason)
        };

        state.set_value(T::from_f32(value));

        match end_reason {
            Some(reason) => Self::end_job(this, job_id, reason),
            None => Self::schedule_frame(this, job_id),
        }
    }

    fn end_job(this: &Rc<RefCell<AnimatableInner<T>>>, job_id: u64, reason: AnimationEndReason) {
        let (mut job, result) = {
            let mut inner = this.borrow_mut();
            if inner.job.as_ref().map(|job| job.id) != Some(job_id) {
                return;
            }
            let Some(job) = inner.job.take() else {
                return;
            };
            job.status.set(Some(reason));
            let result = AnimationResult {
                end_reason: reason,
                end_value: inner.state.get(),
                end_velocity: inner.velocity,
            };
            inner.velocity = 0.0;
            (job, result)
        };

        log::trace!("animation {} ended: {:?}", job_id, reason);
        // Cancels the pending frame callback, if any.
        job.registration = None;
        if let Some(on_end) = job.on_end.take() {
            on_end(result);
        }
    }
}

impl<T: AnimationScalar> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Handle to one animation started on an [`Animatable`].
pub struct AnimationHandle<T: AnimationScalar> {
    id: u64,
    inner: Weak<RefCell<AnimatableInner<T>>>,
    status: Rc<Cell<Option<AnimationEndReason>>>,
}

impl<T: AnimationScalar> AnimationHandle<T> {
    pub fn is_running(&self) -> bool {
        self.status.get().is_none() && self.inner.strong_count() > 0
    }

    /// `None` while the animation is still running.
    pub fn end_reason(&self) -> Option<AnimationEndReason> {
        self.status.get()
    }

    /// Stops this animation if it is still the one running. Returns the value
    /// it stopped at, or `None` when it had already ended.
    pub fn stop(&self) -> Option<T> {
        if self.status.get().is_some() {
            return None;
        }
        let inner = self.inner.upgrade()?;
        Animatable::<T>::end_job(&inner, self.id, AnimationEndReason::Stopped);
        let value = inner.borrow().state.get();
        Some(value)
    }
}

impl<T: AnimationScalar> Clone for AnimationHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Weak::clone(&self.inner),
            status: Rc::clone(&self.status),
        }
    }
}

#[cfg(test)]
#[path = "tests/animatable_tests.rs"]
mod tests;
