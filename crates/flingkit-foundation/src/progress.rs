//! Animated circular progress indicator model.
//!
//! Each new target restarts the fill from zero over 1.5 s, pops the label in
//! from nothing, and once the fill settles loops a short shimmer arc around
//! the filled part.

use flingkit_animation::{
    Animatable, AnimationEndReason, AnimationSpec, Easing, RepeatMode, RepeatableSpec,
};
use flingkit_core::{FrameClock, State};

const FILL_DURATION_MILLIS: u64 = 1500;
const SHIMMER_DURATION_MILLIS: u64 = 750;

/// Arc length of the shimmer relative to a full turn at 100% progress.
const SHIMMER_ARC_DEGREES: f32 = 45.0;

/// Angle arcs start from (twelve o'clock).
pub const START_ANGLE: f32 = -90.0;

/// Color band the progress value falls in. Bands are closed ranges checked
/// in order, so a boundary value belongs to the lower band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressBand {
    Low,
    Medium,
    High,
    Full,
    OutOfRange,
}

impl ProgressBand {
    pub fn of(progress: f32) -> Self {
        if (0.0..=25.0).contains(&progress) {
            ProgressBand::Low
        } else if (25.0..=50.0).contains(&progress) {
            ProgressBand::Medium
        } else if (50.0..=75.0).contains(&progress) {
            ProgressBand::High
        } else if (75.0..=100.0).contains(&progress) {
            ProgressBand::Full
        } else {
            ProgressBand::OutOfRange
        }
    }
}

/// Sweep of the filled arc, in degrees.
pub fn sweep_angle(progress: f32) -> f32 {
    progress / 100.0 * 360.0
}

/// Target for the label scale animation. Fractional progress is truncated.
pub fn label_scale_target(progress: f32) -> f32 {
    progress.trunc() / 100.0 + 1.5
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShimmerArc {
    pub start_angle: f32,
    pub sweep: f32,
}

impl ShimmerArc {
    /// Arc trailing the shimmer head; never starts before twelve o'clock.
    pub fn new(shimmer_progress: f32, progress: f32) -> Self {
        let sweep = progress / 100.0 * SHIMMER_ARC_DEGREES;
        let start_angle = (START_ANGLE + sweep_angle(shimmer_progress) - sweep).max(START_ANGLE);
        Self { start_angle, sweep }
    }

    pub fn is_empty(&self) -> bool {
        self.sweep <= 0.0
    }
}

pub struct ProgressIndicatorState {
    progress: Animatable<f32>,
    label_scale: Animatable<f32>,
    shimmer: Animatable<f32>,
}

impl ProgressIndicatorState {
    pub fn new(frame_clock: FrameClock) -> Self {
        Self {
            progress: Animatable::new(0.0, frame_clock.clone()),
            label_scale: Animatable::new(0.0, frame_clock.clone()),
            shimmer: Animatable::new(0.0, frame_clock),
        }
    }

    /// Restarts every animation towards `target` (0 to 100).
    pub fn set_progress(&self, target: f32) {
        log::debug!("progress target {}", target);
        let fill = AnimationSpec::tween(FILL_DURATION_MILLIS, Easing::FastOutSlowInEasing);

        self.label_scale.snap_to(0.0);
        self.label_scale
            .animate_to(label_scale_target(target), fill, 0.0, |_| {});

        self.shimmer.snap_to(0.0);
        let shimmer = self.shimmer.clone();
        self.progress.snap_to(0.0);
        self.progress.animate_to(target, fill, 0.0, move |result| {
            if result.end_reason != AnimationEndReason::Finished {
                return;
            }
            let repeat = RepeatableSpec::infinite(
                AnimationSpec::tween(SHIMMER_DURATION_MILLIS, Easing::FastOutSlowInEasing),
                RepeatMode::Restart,
            );
            shimmer.animate_to(target, repeat, 0.0, |_| {});
        });
    }

    /// Halts all animations where they are, including the shimmer loop.
    pub fn stop(&self) {
        self.progress.stop();
        self.label_scale.stop();
        self.shimmer.stop();
    }

    pub fn progress(&self) -> State<f32> {
        self.progress.state()
    }

    pub fn label_scale(&self) -> State<f32> {
        self.label_scale.state()
    }

    pub fn shimmer_progress(&self) -> State<f32> {
        self.shimmer.state()
    }

    pub fn target(&self) -> f32 {
        self.progress.target_value()
    }

    pub fn is_filling(&self) -> bool {
        self.progress.is_running()
    }

    pub fn band(&self) -> ProgressBand {
        ProgressBand::of(self.progress.value())
    }

    pub fn sweep_angle(&self) -> f32 {
        sweep_angle(self.progress.value())
    }

    /// Shimmer to draw, or `None` while the fill is still animating.
    pub fn shimmer_arc(&self) -> Option<ShimmerArc> {
        if self.is_filling() {
            return None;
        }
        Some(ShimmerArc::new(self.shimmer.value(), self.target()))
    }
}

#[cfg(test)]
#[path = "tests/progress_tests.rs"]
mod tests;
