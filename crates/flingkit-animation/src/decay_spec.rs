//! Decay (fling) animation specifications.
//!
//! A decay has no fixed target: it starts with a velocity and decelerates to
//! rest. [`SplineBasedDecaySpec`] reproduces the Android scroller's fling
//! spline; [`ExponentialDecaySpec`] is a simple friction model.

use std::fmt;
use std::sync::LazyLock;

// ============================================================================
// Fling spline
// ============================================================================

const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const NB_SAMPLES: usize = 100;

/// Precomputed distance coefficients, one per 1% of fling time.
static SPLINE_POSITIONS: LazyLock<[f32; NB_SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [0.0f32; NB_SAMPLES + 1];
    let mut x_min = 0.0f32;
    for (i, slot) in positions.iter_mut().take(NB_SAMPLES).enumerate() {
        let alpha = i as f32 / NB_SAMPLES as f32;
        let (x, coef) = solve_tension_curve(alpha, &mut x_min, P1, P2);
        *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
    }
    positions[NB_SAMPLES] = 1.0;
    positions
});

/// Bisects the tension bezier for the parameter whose output is `alpha`.
/// `lower` carries the previous solution since successive alphas increase.
fn solve_tension_curve(alpha: f32, lower: &mut f32, p1: f32, p2: f32) -> (f32, f32) {
    let mut upper = 1.0f32;
    loop {
        let mid = *lower + (upper - *lower) / 2.0;
        let coef = 3.0 * mid * (1.0 - mid);
        let value = coef * ((1.0 - mid) * p1 + mid * p2) + mid * mid * mid;
        if (value - alpha).abs() < 1e-5 {
            return (mid, coef);
        }
        if value > alpha {
            upper = mid;
        } else {
            *lower = mid;
        }
    }
}

/// Distance and velocity coefficients at some point of a fling.
#[derive(Debug, Clone, Copy)]
pub struct FlingResult {
    /// Fraction of the total distance covered (0.0 to 1.0).
    pub distance_coefficient: f32,
    /// Slope of the distance curve at this point.
    pub velocity_coefficient: f32,
}

/// Android fling spline.
pub struct AndroidFlingSpline;

impl AndroidFlingSpline {
    /// Samples the spline at `time` in [0, 1].
    pub fn fling_position(time: f32) -> FlingResult {
        let time = time.clamp(0.0, 1.0);
        let index = (NB_SAMPLES as f32 * time) as usize;
        if index >= NB_SAMPLES {
            return FlingResult {
                distance_coefficient: 1.0,
                velocity_coefficient: 0.0,
            };
        }

        let t_inf = index as f32 / NB_SAMPLES as f32;
        let t_sup = (index + 1) as f32 / NB_SAMPLES as f32;
        let d_inf = SPLINE_POSITIONS[index];
        let d_sup = SPLINE_POSITIONS[index + 1];
        let velocity = (d_sup - d_inf) / (t_sup - t_inf);
        FlingResult {
            distance_coefficient: d_inf + (time - t_inf) * velocity,
            velocity_coefficient: velocity,
        }
    }

    pub fn deceleration(velocity: f32, friction: f32) -> f64 {
        (INFLECTION as f64 * velocity.abs() as f64 / friction as f64).ln()
    }
}

// ============================================================================
// Fling calculator
// ============================================================================

const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// `(ln(0.78) / ln(0.9)).abs()`
const DECELERATION_RATE: f32 = 2.358_201_6;

fn physical_coefficient(density: f32) -> f32 {
    GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * 0.84
}

/// Rejected decay parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecaySpecError {
    NonPositiveFriction(f32),
    NonPositiveDensity(f32),
    NonPositiveVelocityThreshold(f32),
}

impl fmt::Display for DecaySpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecaySpecError::NonPositiveFriction(value) => {
                write!(f, "friction must be positive and finite, got {value}")
            }
            DecaySpecError::NonPositiveDensity(value) => {
                write!(f, "density must be positive and finite, got {value}")
            }
            DecaySpecError::NonPositiveVelocityThreshold(value) => {
                write!(f, "velocity threshold must be positive and finite, got {value}")
            }
        }
    }
}

impl std::error::Error for DecaySpecError {}

fn require_positive(value: f32, error: fn(f32) -> DecaySpecError) -> Result<f32, DecaySpecError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(error(value))
    }
}

/// Precomputed fling for one initial velocity.
#[derive(Debug, Clone, Copy)]
pub struct FlingInfo {
    /// Initial velocity in px/sec.
    pub initial_velocity: f32,
    /// Unsigned total distance.
    pub distance: f32,
    /// Total duration in milliseconds.
    pub duration: i64,
}

impl FlingInfo {
    fn spline_time(&self, time_ms: i64) -> f32 {
        if self.duration > 0 {
            time_ms as f32 / self.duration as f32
        } else {
            1.0
        }
    }

    /// Signed displacement from the fling start at `time_ms`.
    pub fn position(&self, time_ms: i64) -> f32 {
        let coefficient = AndroidFlingSpline::fling_position(self.spline_time(time_ms));
        self.distance * self.initial_velocity.signum() * coefficient.distance_coefficient
    }

    /// Signed velocity in px/sec at `time_ms`. A zero-length fling is at rest.
    pub fn velocity(&self, time_ms: i64) -> f32 {
        if self.duration <= 0 {
            return 0.0;
        }
        let coefficient = AndroidFlingSpline::fling_position(self.spline_time(time_ms));
        coefficient.velocity_coefficient * self.initial_velocity.signum() * self.distance
            / self.duration as f32
            * 1000.0
    }

    pub fn is_finished(&self, time_ms: i64) -> bool {
        time_ms >= self.duration
    }
}

/// Android scroller physics for a given friction and screen density.
#[derive(Debug, Clone, Copy)]
pub struct FlingCalculator {
    friction: f32,
    magic_physical_coefficient: f32,
}

impl FlingCalculator {
    /// `ViewConfiguration.getScrollFriction()`
    pub const DEFAULT_FRICTION: f32 = 0.015;

    pub fn new(friction: f32, density: f32) -> Result<Self, DecaySpecError> {
        let friction = require_positive(friction, DecaySpecError::NonPositiveFriction)?;
        let density = require_positive(density, DecaySpecError::NonPositiveDensity)?;
        Ok(Self {
            friction,
            magic_physical_coefficient: physical_coefficient(density),
        })
    }

    pub fn with_density(density: f32) -> Result<Self, DecaySpecError> {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    fn spline_deceleration(&self, velocity: f32) -> f64 {
        AndroidFlingSpline::deceleration(velocity, self.friction * self.magic_physical_coefficient)
    }

    /// Duration in milliseconds. Zero for a zero velocity.
    pub fn fling_duration(&self, velocity: f32) -> i64 {
        let l = self.spline_deceleration(velocity);
        (1000.0 * (l / (DECELERATION_RATE as f64 - 1.0)).exp()) as i64
    }

    /// Unsigned distance. Zero for a zero velocity.
    pub fn fling_distance(&self, velocity: f32) -> f32 {
        let l = self.spline_deceleration(velocity);
        let exponent = DECELERATION_RATE as f64 / (DECELERATION_RATE as f64 - 1.0) * l;
        self.friction * self.magic_physical_coefficient * exponent.exp() as f32
    }

    pub fn fling_info(&self, velocity: f32) -> FlingInfo {
        FlingInfo {
            initial_velocity: velocity,
            distance: self.fling_distance(velocity),
            duration: self.fling_duration(velocity),
        }
    }
}

impl Default for FlingCalculator {
    fn default() -> Self {
        Self {
            friction: Self::DEFAULT_FRICTION,
            magic_physical_coefficient: physical_coefficient(1.0),
        }
    }
}

// ============================================================================
// Decay specs
// ============================================================================

/// Position/velocity of a decelerating value over time.
pub trait FloatDecayAnimationSpec {
    /// Speed below which the decay counts as finished.
    fn abs_velocity_threshold(&self) -> f32;

    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    fn get_duration_nanos(&self, initial_value: f32, initial_velocity: f32) -> i64;

    /// Value the decay comes to rest at.
    fn get_target_value(&self, initial_value: f32, initial_velocity: f32) -> f32;
}

/// Where a fling starting at `initial_value` with `initial_velocity` will stop.
pub fn calculate_target_value(
    spec: &dyn FloatDecayAnimationSpec,
    initial_value: f32,
    initial_velocity: f32,
) -> f32 {
    spec.get_target_value(initial_value, initial_velocity)
}

/// Android-feel fling deceleration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplineBasedDecaySpec {
    calculator: FlingCalculator,
}

impl SplineBasedDecaySpec {
    pub fn new(density: f32) -> Result<Self, DecaySpecError> {
        Ok(Self {
            calculator: FlingCalculator::with_density(density)?,
        })
    }

    pub fn with_calculator(calculator: FlingCalculator) -> Self {
        Self { calculator }
    }
}

impl FloatDecayAnimationSpec for SplineBasedDecaySpec {
    fn abs_velocity_threshold(&self) -> f32 {
        0.0
    }

    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let info = self.calculator.fling_info(initial_velocity);
        initial_value + info.position(play_time_nanos / 1_000_000)
    }

    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        _initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let info = self.calculator.fling_info(initial_velocity);
        info.velocity(play_time_nanos / 1_000_000)
    }

    fn get_duration_nanos(&self, _initial_value: f32, initial_velocity: f32) -> i64 {
        self.calculator.fling_duration(initial_velocity) * 1_000_000
    }

    fn get_target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        let distance = self.calculator.fling_distance(initial_velocity);
        initial_value + distance * initial_velocity.signum()
    }
}

/// Velocity decays as `v0 * e^(friction * t)` with `friction = -4.2 * multiplier`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecaySpec {
    friction: f32,
    abs_velocity_threshold: f32,
}

impl ExponentialDecaySpec {
    const FRICTION_SCALE: f32 = -4.2;

    pub fn new(friction_multiplier: f32, abs_velocity_threshold: f32) -> Result<Self, DecaySpecError> {
        let multiplier =
            require_positive(friction_multiplier, DecaySpecError::NonPositiveFriction)?;
        let threshold = require_positive(
            abs_velocity_threshold,
            DecaySpecError::NonPositiveVelocityThreshold,
        )?;
        Ok(Self {
            friction: Self::FRICTION_SCALE * multiplier,
            abs_velocity_threshold: threshold,
        })
    }
}

impl Default for ExponentialDecaySpec {
    fn default() -> Self {
        Self {
            friction: Self::FRICTION_SCALE,
            abs_velocity_threshold: 0.1,
        }
    }
}

impl FloatDecayAnimationSpec for ExponentialDecaySpec {
    fn abs_velocity_threshold(&self) -> f32 {
        self.abs_velocity_threshold
    }

    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let seconds = play_time_nanos as f32 / 1_000_000_000.0;
        initial_value - initial_velocity / self.friction
            + initial_velocity / self.friction * (self.friction * seconds).exp()
    }

    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        _initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let seconds = play_time_nanos as f32 / 1_000_000_000.0;
        initial_velocity * (self.friction * seconds).exp()
    }

    fn get_duration_nanos(&self, _initial_value: f32, initial_velocity: f32) -> i64 {
        if initial_velocity.abs() <= self.abs_velocity_threshold {
            return 0;
        }
        let millis =
            ((self.abs_velocity_threshold / initial_velocity.abs()).ln() / self.friction) * 1000.0;
        (millis as f64 * 1_000_000.0) as i64
    }

    fn get_target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        initial_value - initial_velocity / self.friction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_endpoints() {
        let start = AndroidFlingSpline::fling_position(0.0);
        assert!(start.distance_coefficient.abs() < 0.01);

        let end = AndroidFlingSpline::fling_position(1.0);
        assert!((end.distance_coefficient - 1.0).abs() < 0.01);
    }

    #[test]
    fn spline_is_monotonic() {
        let mut previous = 0.0;
        for i in 0..=100 {
            let result = AndroidFlingSpline::fling_position(i as f32 / 100.0);
            assert!(result.distance_coefficient >= previous);
            previous = result.distance_coefficient;
        }
    }

    #[test]
    fn faster_flings_go_further_and_longer() {
        let calc = FlingCalculator::with_density(2.0).expect("valid density");
        let duration = calc.fling_duration(5000.0);
        let distance = calc.fling_distance(5000.0);

        assert!(duration > 0);
        assert!(distance > 0.0);
        assert!(calc.fling_duration(10_000.0) > duration);
        assert!(calc.fling_distance(10_000.0) > distance);
    }

    #[test]
    fn zero_velocity_fling_is_at_rest() {
        let info = FlingCalculator::default().fling_info(0.0);
        assert_eq!(info.duration, 0);
        assert_eq!(info.distance, 0.0);
        assert_eq!(info.position(0), 0.0);
        assert_eq!(info.velocity(0), 0.0);

        let spec = SplineBasedDecaySpec::default();
        assert_eq!(spec.get_target_value(42.0, 0.0), 42.0);
        assert_eq!(spec.get_velocity_from_nanos(16_000_000, 42.0, 0.0), 0.0);
    }

    #[test]
    fn spline_decay_ends_at_target() {
        let spec = SplineBasedDecaySpec::new(2.0).expect("valid density");
        let initial_value = 100.0;
        let velocity = 5000.0;

        let start = spec.get_value_from_nanos(0, initial_value, velocity);
        assert!((start - initial_value).abs() < 1.0);

        let duration = spec.get_duration_nanos(initial_value, velocity);
        let target = calculate_target_value(&spec, initial_value, velocity);
        let end = spec.get_value_from_nanos(duration, initial_value, velocity);
        assert!((end - target).abs() < 10.0, "end {} vs target {}", end, target);
    }

    #[test]
    fn negative_velocity_moves_backwards() {
        let calc = FlingCalculator::with_density(2.0).expect("valid density");
        let info = calc.fling_info(-5000.0);
        assert!(info.position(info.duration / 2) < 0.0);
        assert!(info.velocity(info.duration / 2) < 0.0);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert_eq!(
            FlingCalculator::new(0.0, 1.0).unwrap_err(),
            DecaySpecError::NonPositiveFriction(0.0)
        );
        assert!(matches!(
            SplineBasedDecaySpec::new(f32::NAN),
            Err(DecaySpecError::NonPositiveDensity(_))
        ));
        assert_eq!(
            ExponentialDecaySpec::new(1.0, -1.0).unwrap_err(),
            DecaySpecError::NonPositiveVelocityThreshold(-1.0)
        );
        assert_eq!(
            DecaySpecError::NonPositiveDensity(0.0).to_string(),
            "density must be positive and finite, got 0"
        );
    }

    #[test]
    fn exponential_decay_converges_to_target() {
        let spec = ExponentialDecaySpec::default();
        let target = spec.get_target_value(10.0, 420.0);
        assert!((target - 110.0).abs() < 1e-3);

        let duration = spec.get_duration_nanos(10.0, 420.0);
        assert!(duration > 0);
        let end = spec.get_value_from_nanos(duration, 10.0, 420.0);
        assert!((end - target).abs() < 0.1);
        let end_velocity = spec.get_velocity_from_nanos(duration, 10.0, 420.0);
        assert!(end_velocity.abs() <= spec.abs_velocity_threshold() + 1e-3);
    }

    #[test]
    fn exponential_decay_below_threshold_has_no_duration() {
        let spec = ExponentialDecaySpec::default();
        assert_eq!(spec.get_duration_nanos(0.0, 0.05), 0);
    }
}
