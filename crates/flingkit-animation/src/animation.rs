//! Animation specifications: easing curves, tweens, springs and repeats.
//!
//! Specs are plain data. They are turned into motion by
//! [`Animatable`](crate::Animatable), which samples them once per frame.

/// Values an [`Animatable`](crate::Animatable) can drive.
///
/// Physics runs in `f32`; implementors convert in and out.
pub trait AnimationScalar: Clone + PartialEq + 'static {
    fn to_f32(&self) -> f32;
    fn from_f32(value: f32) -> Self;
}

impl AnimationScalar for f32 {
    fn to_f32(&self) -> f32 {
        *self
    }

    fn from_f32(value: f32) -> Self {
        value
    }
}

impl AnimationScalar for f64 {
    fn to_f32(&self) -> f32 {
        *self as f32
    }

    fn from_f32(value: f32) -> Self {
        value as f64
    }
}

/// Easing curves mapping linear time to eased progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    LinearEasing,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve.
    FastOutSlowInEasing,
    LinearOutSlowInEasing,
    FastOutLinearEasing,
    /// Custom cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1).
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Easing {
    /// Apply the easing function to a linear fraction in [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match *self {
            Easing::LinearEasing => fraction,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowInEasing => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowInEasing => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearEasing => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
            Easing::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, fraction),
        }
    }
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample = |a: f32, b: f32, c: f32, t: f32| ((a * t + b) * t + c) * t;
    let slope = |a: f32, b: f32, c: f32, t: f32| (3.0 * a * t + 2.0 * b) * t + c;

    // Newton-Raphson on x(t) = fraction, falling back to bisection when the
    // slope flattens out.
    let mut t = fraction;
    for _ in 0..8 {
        let error = sample(ax, bx, cx, t) - fraction;
        if error.abs() < 1e-6 {
            return sample(ay, by, cy, t);
        }
        let dx = slope(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - error / dx).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    t = fraction;
    for _ in 0..16 {
        let error = sample(ax, bx, cx, t) - fraction;
        if error.abs() < 1e-6 {
            break;
        }
        if error > 0.0 {
            hi = t;
        } else {
            lo = t;
        }
        t = 0.5 * (lo + hi);
    }
    sample(ay, by, cy, t)
}

/// Duration-based animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration_millis: u64,
    pub easing: Easing,
    pub delay_millis: u64,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }

    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }

    /// Eased fraction at `elapsed_nanos` after the animation started
    /// (including the delay). A zero duration is complete as soon as the
    /// delay has passed.
    pub fn fraction_at(&self, elapsed_nanos: u64) -> f32 {
        let delay_nanos = self.delay_millis * 1_000_000;
        if elapsed_nanos < delay_nanos {
            return 0.0;
        }
        let duration_nanos = self.duration_millis * 1_000_000;
        if duration_nanos == 0 {
            return 1.0;
        }
        let linear = ((elapsed_nanos - delay_nanos) as f64 / duration_nanos as f64) as f32;
        self.easing.transform(linear.clamp(0.0, 1.0))
    }

    pub fn total_nanos(&self) -> u64 {
        (self.delay_millis + self.duration_millis) * 1_000_000
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowInEasing)
    }
}

/// Damped spring. Thresholds are in the animated value's own units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 bouncy, > 1.0 over-damped.
    pub damping_ratio: f32,
    pub stiffness: f32,
    /// Below this speed (units/sec) the spring may settle.
    pub velocity_threshold: f32,
    /// Within this distance of the target the spring may settle.
    pub position_threshold: f32,
}

impl SpringSpec {
    pub const STIFFNESS_HIGH: f32 = 10_000.0;
    pub const STIFFNESS_MEDIUM: f32 = 1_500.0;
    pub const STIFFNESS_LOW: f32 = 200.0;

    pub fn default_spring() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: Self::STIFFNESS_MEDIUM,
            velocity_threshold: 0.01,
            position_threshold: 0.01,
        }
    }

    pub fn bouncy() -> Self {
        Self {
            damping_ratio: 0.5,
            ..Self::default_spring()
        }
    }

    pub fn stiff() -> Self {
        Self {
            stiffness: 3000.0,
            ..Self::default_spring()
        }
    }

    pub fn with_damping_ratio(mut self, damping_ratio: f32) -> Self {
        self.damping_ratio = damping_ratio;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_position_threshold(mut self, threshold: f32) -> Self {
        self.position_threshold = threshold;
        self
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    /// Every iteration runs start → target.
    Restart,
    /// Iterations alternate start → target, target → start.
    Reverse,
}

/// Repeats a tween a fixed number of times, or forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatableSpec {
    pub animation: AnimationSpec,
    /// `None` repeats until stopped.
    pub iterations: Option<u32>,
    pub repeat_mode: RepeatMode,
}

impl RepeatableSpec {
    pub fn infinite(animation: AnimationSpec, repeat_mode: RepeatMode) -> Self {
        Self {
            animation,
            iterations: None,
            repeat_mode,
        }
    }

    pub fn finite(iterations: u32, animation: AnimationSpec, repeat_mode: RepeatMode) -> Self {
        Self {
            animation,
            iterations: Some(iterations),
            repeat_mode,
        }
    }

    /// Returns `(fraction towards target, finished)` at `elapsed_nanos`.
    ///
    /// The delay is applied once, before the first iteration.
    pub fn fraction_at(&self, elapsed_nanos: u64) -> (f32, bool) {
        let delay_nanos = self.animation.delay_millis * 1_000_000;
        let iteration_nanos = self.animation.duration_millis * 1_000_000;
        if self.iterations == Some(0) || iteration_nanos == 0 {
            // Nothing to repeat over; jump straight to the end.
            return (1.0, true);
        }
        if elapsed_nanos < delay_nanos {
            return (0.0, false);
        }
        let elapsed = elapsed_nanos - delay_nanos;
        let iteration = elapsed / iteration_nanos;

        if let Some(total) = self.iterations {
            if iteration >= total as u64 {
                let ends_reversed = self.repeat_mode == RepeatMode::Reverse && total % 2 == 0;
                return (if ends_reversed { 0.0 } else { 1.0 }, true);
            }
        }

        let within = (elapsed % iteration_nanos) as f32 / iteration_nanos as f32;
        let eased = self.animation.easing.transform(within);
        let reversed = self.repeat_mode == RepeatMode::Reverse && iteration % 2 == 1;
        (if reversed { 1.0 - eased } else { eased }, false)
    }
}

/// Animation used to reach a target value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    Tween(AnimationSpec),
    Spring(SpringSpec),
    Repeatable(RepeatableSpec),
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Spring(SpringSpec::default())
    }
}

impl From<AnimationSpec> for AnimationType {
    fn from(spec: AnimationSpec) -> Self {
        AnimationType::Tween(spec)
    }
}

impl From<SpringSpec> for AnimationType {
    fn from(spec: SpringSpec) -> Self {
        AnimationType::Spring(spec)
    }
}

impl From<RepeatableSpec> for AnimationType {
    fn from(spec: RepeatableSpec) -> Self {
        AnimationType::Repeatable(spec)
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
