//! Release velocity estimation.
//!
//! Uses the impulse strategy: each segment between two samples transfers
//! kinetic energy to a unit mass, and the final velocity is the one matching
//! the accumulated energy. Recent, fast segments dominate; jitter from slow
//! segments mostly cancels out.

use flingkit_ui_graphics::{Point, Velocity};
use smallvec::SmallVec;

/// Ring buffer capacity.
const HISTORY_SIZE: usize = 20;

/// Samples older than this (relative to the newest one) are ignored.
const HORIZON_MS: i64 = 100;

/// A sample further than this from the newest one means the pointer rested in
/// between; everything from that sample back is ignored.
pub const ASSUME_STOPPED_MS: i64 = 40;

/// One pointer position at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Monotonic input timestamp in milliseconds.
    pub uptime_millis: i64,
    pub position: Point,
}

impl PointerSample {
    pub fn new(uptime_millis: i64, position: Point) -> Self {
        Self {
            uptime_millis,
            position,
        }
    }
}

/// How added data points are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingMode {
    /// Each point is an absolute position.
    Absolute,
    /// Each point is the change since the previous one.
    Differential,
}

#[derive(Clone, Copy, Debug, Default)]
struct TimedValue {
    time_ms: i64,
    value: f32,
}

/// Velocity estimator for a single axis.
#[derive(Clone)]
pub struct VelocityTracker1D {
    samples: [Option<TimedValue>; HISTORY_SIZE],
    newest: usize,
    mode: TrackingMode,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self::with_mode(TrackingMode::Absolute)
    }

    pub fn differential() -> Self {
        Self::with_mode(TrackingMode::Differential)
    }

    pub fn with_mode(mode: TrackingMode) -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            newest: 0,
            mode,
        }
    }

    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    pub fn add_data_point(&mut self, time_ms: i64, value: f32) {
        self.newest = (self.newest + 1) % HISTORY_SIZE;
        self.samples[self.newest] = Some(TimedValue { time_ms, value });
    }

    /// Samples that contribute to the estimate, newest first.
    fn recent_samples(&self) -> SmallVec<[TimedValue; HISTORY_SIZE]> {
        let mut recent = SmallVec::new();
        let Some(newest) = self.samples[self.newest] else {
            return recent;
        };

        let mut previous = newest;
        for offset in 0..HISTORY_SIZE {
            let index = (self.newest + HISTORY_SIZE - offset) % HISTORY_SIZE;
            let Some(sample) = self.samples[index] else {
                break;
            };
            let age = newest.time_ms - sample.time_ms;
            let gap = (sample.time_ms - previous.time_ms).abs();
            previous = match self.mode {
                TrackingMode::Differential => sample,
                TrackingMode::Absolute => newest,
            };
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            recent.push(sample);
        }
        recent
    }

    /// Estimated velocity in units per second. Zero with fewer than two
    /// usable samples.
    pub fn calculate_velocity(&self) -> f32 {
        let recent = self.recent_samples();
        if recent.len() < 2 {
            return 0.0;
        }
        impulse_velocity(&recent, self.mode) * 1000.0
    }

    /// Like [`calculate_velocity`](Self::calculate_velocity), clamped to
    /// `±max_velocity`. A non-positive or non-finite cap yields zero.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.calculate_velocity();
        if velocity == 0.0 || velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.newest = 0;
    }
}

/// Units per millisecond. `samples` is newest first.
fn impulse_velocity(samples: &[TimedValue], mode: TrackingMode) -> f32 {
    let mut work = 0.0f32;
    // Oldest segment first.
    for (step, pair) in samples.windows(2).rev().enumerate() {
        let (newer, older) = (pair[0], pair[1]);
        let dt = (newer.time_ms - older.time_ms) as f32;
        if dt == 0.0 {
            continue;
        }
        let displacement = match mode {
            TrackingMode::Absolute => newer.value - older.value,
            TrackingMode::Differential => newer.value,
        };
        let segment_velocity = displacement / dt;
        let previous_velocity = kinetic_energy_to_velocity(work);
        work += (segment_velocity - previous_velocity) * segment_velocity.abs();
        if step == 0 {
            work *= 0.5;
        }
    }
    kinetic_energy_to_velocity(work)
}

/// `E = v^2 / 2` for a unit mass, keeping the sign.
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

/// Two-axis velocity estimator fed with pointer positions.
#[derive(Clone, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_position(&mut self, uptime_millis: i64, position: Point) {
        self.x.add_data_point(uptime_millis, position.x);
        self.y.add_data_point(uptime_millis, position.y);
    }

    pub fn add_sample(&mut self, sample: PointerSample) {
        self.add_position(sample.uptime_millis, sample.position);
    }

    pub fn calculate_velocity(&self) -> Velocity {
        Velocity::new(self.x.calculate_velocity(), self.y.calculate_velocity())
    }

    /// Each axis is clamped independently.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> Velocity {
        Velocity::new(
            self.x.calculate_velocity_with_max(max_velocity),
            self.y.calculate_velocity_with_max(max_velocity),
        )
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}
