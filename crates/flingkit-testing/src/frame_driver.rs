//! Deterministic frame pacing for tests.
//!
//! A [`FrameDriver`] owns a [`Runtime`] and a virtual clock. Nothing advances
//! unless the test asks for it, so animation values at a given frame are
//! reproducible.

use flingkit_core::{FrameClock, Runtime, RuntimeHandle};

/// 60 Hz.
pub const DEFAULT_FRAME_NANOS: u64 = 16_000_000;

/// Upper bound for [`FrameDriver::run_until_idle`]; infinite animations never
/// go idle.
pub const DEFAULT_MAX_FRAMES: usize = 1_000;

pub struct FrameDriver {
    runtime: Runtime,
    time_nanos: u64,
    frame_nanos: u64,
    frames: usize,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::with_frame_nanos(DEFAULT_FRAME_NANOS)
    }

    pub fn with_frame_nanos(frame_nanos: u64) -> Self {
        Self {
            runtime: Runtime::default(),
            time_nanos: 0,
            frame_nanos: frame_nanos.max(1),
            frames: 0,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.runtime.frame_clock()
    }

    pub fn now_nanos(&self) -> u64 {
        self.time_nanos
    }

    /// Virtual time in milliseconds, for pointer timestamps.
    pub fn now_millis(&self) -> i64 {
        (self.time_nanos / 1_000_000) as i64
    }

    /// Frames produced so far.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn is_idle(&self) -> bool {
        !self.handle().has_frame_callbacks()
    }

    /// Advances one frame interval and drains pending callbacks.
    pub fn frame(&mut self) {
        self.time_nanos += self.frame_nanos;
        self.frames += 1;
        self.handle().drain_frame_callbacks(self.time_nanos);
    }

    pub fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    /// Advances time by `millis`, producing every frame in between. A
    /// remainder shorter than a frame only moves the clock.
    pub fn advance_millis(&mut self, millis: u64) {
        let target = self.time_nanos + millis * 1_000_000;
        while self.time_nanos + self.frame_nanos <= target {
            self.frame();
        }
        self.time_nanos = target;
    }

    /// Runs frames until no callbacks remain or `max_frames` have run.
    /// Returns the number of frames produced.
    pub fn run_until_idle(&mut self, max_frames: usize) -> usize {
        let mut produced = 0;
        while !self.is_idle() && produced < max_frames {
            self.frame();
            produced += 1;
        }
        if !self.is_idle() {
            log::warn!("still animating after {} frames", produced);
        }
        produced
    }

    pub fn settle(&mut self) -> usize {
        self.run_until_idle(DEFAULT_MAX_FRAMES)
    }
}

#[cfg(test)]
#[path = "tests/frame_driver_tests.rs"]
mod tests;
