//! Scripted, headless tour of the flingkit gesture models.
//!
//! Each scenario feeds synthetic pointer input on a virtual 60 Hz clock into a
//! [`StdRuntime`] and reports where things came to rest.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Context;
use flingkit_core::FrameClock;
use flingkit_foundation::{
    AnimatedVisibilityState, DecayKind, PointerEvent, ProgressBand, ProgressIndicatorState,
    ShimmerArc, SwipeDirection, SwipeToDismissConfig, SwipeToDismissController,
    TransformGestureDetector, TransformableState,
};
use flingkit_runtime_std::StdRuntime;
use flingkit_ui_graphics::Point;

/// Frames a scenario may run before it is considered stuck.
const MAX_SETTLE_FRAMES: usize = 2_000;

#[derive(Clone, Debug)]
pub struct DemoOptions {
    pub container_width: f32,
    pub frame_millis: u64,
    pub direction: SwipeDirection,
    pub decay: DecayKind,
    /// Horizontal distance per frame of the scripted fling.
    pub fling_step: f32,
    pub fling_frames: usize,
    pub progress_target: f32,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            container_width: 400.0,
            frame_millis: 16,
            direction: SwipeDirection::Both,
            decay: DecayKind::default(),
            fling_step: 40.0,
            fling_frames: 4,
            progress_target: 80.0,
        }
    }
}

impl DemoOptions {
    pub fn with_container_width(mut self, container_width: f32) -> Self {
        self.container_width = container_width;
        self
    }

    pub fn with_frame_millis(mut self, frame_millis: u64) -> Self {
        self.frame_millis = frame_millis.max(1);
        self
    }

    pub fn with_direction(mut self, direction: SwipeDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_decay(mut self, decay: DecayKind) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_fling(mut self, step: f32, frames: usize) -> Self {
        self.fling_step = step;
        self.fling_frames = frames.max(1);
        self
    }

    pub fn with_progress_target(mut self, progress_target: f32) -> Self {
        self.progress_target = progress_target;
        self
    }

    fn swipe_config(&self) -> SwipeToDismissConfig {
        SwipeToDismissConfig::new(self.container_width)
            .with_direction(self.direction)
            .with_decay(self.decay)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeOutcome {
    pub dismissed: bool,
    pub dismiss_callbacks: u32,
    pub final_offset: f32,
    pub frames: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformOutcome {
    pub scale: f32,
    pub rotation: f32,
    pub offset: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressOutcome {
    pub progress: f32,
    pub label_scale: f32,
    pub band: ProgressBand,
    pub shimmer: Option<ShimmerArc>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityOutcome {
    pub exit_frames: usize,
    pub present_after_exit: bool,
    pub enter_frames: usize,
}

#[derive(Clone, Debug)]
pub struct DemoReport {
    pub fling: SwipeOutcome,
    pub snap_back: SwipeOutcome,
    pub transform: TransformOutcome,
    pub progress: ProgressOutcome,
    pub visibility: VisibilityOutcome,
}

impl DemoReport {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "fling:      dismissed={} callbacks={} offset={:.1} after {} frames",
                self.fling.dismissed,
                self.fling.dismiss_callbacks,
                self.fling.final_offset,
                self.fling.frames
            ),
            format!(
                "snap back:  dismissed={} offset={:.1} after {} frames",
                self.snap_back.dismissed, self.snap_back.final_offset, self.snap_back.frames
            ),
            format!(
                "transform:  scale={:.2} rotation={:.1}deg offset=({:.1}, {:.1})",
                self.transform.scale,
                self.transform.rotation,
                self.transform.offset.x,
                self.transform.offset.y
            ),
            format!(
                "progress:   {:.0}% ({:?}), label scale {:.2}",
                self.progress.progress, self.progress.band, self.progress.label_scale
            ),
        ];
        if let Some(arc) = self.progress.shimmer {
            lines.push(format!(
                "shimmer:    start {:.1}deg sweep {:.1}deg",
                arc.start_angle, arc.sweep
            ));
        }
        lines.push(format!(
            "visibility: exit {} frames (present after: {}), enter {} frames",
            self.visibility.exit_frames,
            self.visibility.present_after_exit,
            self.visibility.enter_frames
        ));
        lines
    }
}

/// Virtual-time host around a [`StdRuntime`].
struct Scene {
    runtime: StdRuntime,
    frame_nanos: u64,
    time_nanos: u64,
}

impl Scene {
    fn new(options: &DemoOptions) -> Self {
        Self {
            runtime: StdRuntime::new(),
            frame_nanos: options.frame_millis * 1_000_000,
            time_nanos: 0,
        }
    }

    fn frame_clock(&self) -> FrameClock {
        self.runtime.frame_clock()
    }

    fn now_millis(&self) -> i64 {
        (self.time_nanos / 1_000_000) as i64
    }

    fn frame(&mut self) {
        self.time_nanos += self.frame_nanos;
        self.runtime.take_frame_request();
        self.runtime.drain_frame_callbacks(self.time_nanos);
    }

    fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    /// Runs frames while the runtime keeps asking for them.
    fn settle(&mut self) -> anyhow::Result<usize> {
        let mut frames = 0;
        while self.runtime.runtime().needs_frame() {
            if frames == MAX_SETTLE_FRAMES {
                anyhow::bail!("animation still running after {MAX_SETTLE_FRAMES} frames");
            }
            self.frame();
            frames += 1;
        }
        Ok(frames)
    }
}

fn swipe(
    options: &DemoOptions,
    step: f32,
    steps: usize,
    hold_frames: usize,
) -> anyhow::Result<SwipeOutcome> {
    let mut scene = Scene::new(options);
    let controller = SwipeToDismissController::new(options.swipe_config(), scene.frame_clock())
        .context("building swipe-to-dismiss controller")?;
    let callbacks = Rc::new(Cell::new(0));
    {
        let callbacks = Rc::clone(&callbacks);
        controller.set_on_dismissed(move || {
            callbacks.set(callbacks.get() + 1);
            log::info!("dismissed");
        });
    }

    let start = Point::new(options.container_width / 2.0, 40.0);
    controller.handle_pointer_event(&PointerEvent::down(start, scene.now_millis()));
    let mut position = start;
    for _ in 0..steps {
        scene.frame();
        position.x += step;
        controller.handle_pointer_event(&PointerEvent::moved(position, scene.now_millis()));
    }
    scene.frames(hold_frames);
    controller.handle_pointer_event(&PointerEvent::up(position, scene.now_millis()));
    log::info!(
        "released at offset {:.1} in phase {:?}",
        controller.current_offset(),
        controller.current_phase()
    );

    let frames = scene.settle()?;
    Ok(SwipeOutcome {
        dismissed: controller.is_dismissed(),
        dismiss_callbacks: callbacks.get(),
        final_offset: controller.current_offset(),
        frames,
    })
}

fn transform() -> TransformOutcome {
    let state = TransformableState::new();
    let mut detector = TransformGestureDetector::new();
    let script = [
        PointerEvent::down(Point::new(100.0, 100.0), 0).with_id(1),
        PointerEvent::down(Point::new(200.0, 100.0), 0).with_id(2),
        // Spread to twice the span while turning a quarter.
        PointerEvent::moved(Point::new(100.0, 300.0), 16).with_id(2),
        PointerEvent::up(Point::new(100.0, 300.0), 32).with_id(2),
        // The remaining finger pans.
        PointerEvent::moved(Point::new(130.0, 100.0), 48).with_id(1),
        PointerEvent::up(Point::new(130.0, 100.0), 64).with_id(1),
    ];
    for event in &script {
        detector.apply(event, &state);
    }
    log::info!("transform layer {:?}", state.layer());
    TransformOutcome {
        scale: state.scale().get(),
        rotation: state.rotation().get(),
        offset: state.offset().get(),
    }
}

fn progress(options: &DemoOptions) -> ProgressOutcome {
    let mut scene = Scene::new(options);
    let indicator = ProgressIndicatorState::new(scene.frame_clock());
    indicator.set_progress(options.progress_target);
    let mut frames = 0;
    while indicator.is_filling() && frames < MAX_SETTLE_FRAMES {
        scene.frame();
        frames += 1;
    }
    // Let the shimmer loop run for a while.
    scene.frames(20);
    let outcome = ProgressOutcome {
        progress: indicator.progress().get(),
        label_scale: indicator.label_scale().get(),
        band: indicator.band(),
        shimmer: indicator.shimmer_arc(),
    };
    indicator.stop();
    outcome
}

fn visibility(options: &DemoOptions) -> anyhow::Result<VisibilityOutcome> {
    let mut scene = Scene::new(options);
    let state = AnimatedVisibilityState::new(true, scene.frame_clock());
    state.toggle();
    let exit_frames = scene.settle()?;
    let present_after_exit = state.is_present();
    state.toggle();
    let enter_frames = scene.settle()?;
    Ok(VisibilityOutcome {
        exit_frames,
        present_after_exit,
        enter_frames,
    })
}

/// Runs every scenario once.
pub fn run(options: &DemoOptions) -> anyhow::Result<DemoReport> {
    log::info!("running demo with {:?}", options);
    let fling = swipe(options, options.fling_step, options.fling_frames, 0)
        .context("fling scenario")?;
    let snap_back = swipe(options, 10.0, 8, 10).context("snap-back scenario")?;
    Ok(DemoReport {
        fling,
        snap_back,
        transform: transform(),
        progress: progress(options),
        visibility: visibility(options).context("visibility scenario")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_dismisses_and_snaps_back() {
        let report = run(&DemoOptions::default()).expect("demo runs");
        assert!(report.fling.dismissed);
        assert_eq!(report.fling.dismiss_callbacks, 1);
        assert_eq!(report.fling.final_offset, 400.0);

        assert!(!report.snap_back.dismissed);
        assert_eq!(report.snap_back.final_offset, 0.0);
    }

    #[test]
    fn transform_script_composes() {
        let outcome = transform();
        assert!((outcome.scale - 2.0).abs() < 1e-3);
        assert!((outcome.rotation - 90.0).abs() < 1e-3);
        assert_eq!(outcome.offset, Point::new(-20.0, 100.0));
    }

    #[test]
    fn other_scenarios_settle() {
        let report = run(&DemoOptions::default()).expect("demo runs");
        assert_eq!(report.progress.progress, 80.0);
        assert_eq!(report.progress.band, ProgressBand::Full);
        assert!(report.progress.shimmer.is_some());
        assert!(!report.visibility.present_after_exit);
        assert!(report.visibility.exit_frames > 0);
        assert!(!report.lines().is_empty());
    }

    #[test]
    fn start_only_ignores_a_fling_to_the_end() {
        let options = DemoOptions::default().with_direction(SwipeDirection::StartOnly);
        let report = run(&options).expect("demo runs");
        assert!(!report.fling.dismissed);
        assert_eq!(report.fling.final_offset, 0.0);
    }

    #[test]
    fn invalid_width_is_reported() {
        let options = DemoOptions::default().with_container_width(0.0);
        let err = run(&options).expect_err("zero width is rejected");
        assert!(format!("{err:#}").contains("container width"));
    }
}
