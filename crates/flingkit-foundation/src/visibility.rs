//! Enter/exit transition for content that can be shown and hidden.
//!
//! Entering slides down from half the content height while scaling up from
//! nothing; exiting fades and scales out in place.

use flingkit_animation::{Animatable, AnimationType, SpringSpec};
use flingkit_core::{FrameClock, MutableState, State};
use flingkit_ui_graphics::GraphicsLayer;

/// Spring stiffness of the default transition.
const STIFFNESS_MEDIUM_LOW: f32 = 400.0;

pub struct AnimatedVisibilityState {
    /// 0 hidden, 1 fully shown.
    transition: Animatable<f32>,
    visible: MutableState<bool>,
    animation: AnimationType,
}

impl AnimatedVisibilityState {
    pub fn new(initially_visible: bool, frame_clock: FrameClock) -> Self {
        let transition = Animatable::new(if initially_visible { 1.0 } else { 0.0 }, frame_clock);
        transition.update_bounds(Some(0.0), Some(1.0));
        Self {
            transition,
            visible: MutableState::new(initially_visible),
            animation: AnimationType::Spring(
                SpringSpec::default().with_stiffness(STIFFNESS_MEDIUM_LOW),
            ),
        }
    }

    pub fn with_animation(mut self, animation: impl Into<AnimationType>) -> Self {
        self.animation = animation.into();
        self
    }

    pub fn set_visible(&self, visible: bool) {
        if !self.visible.set_value(visible) {
            return;
        }
        log::debug!("visibility -> {}", visible);
        let target = if visible { 1.0 } else { 0.0 };
        let velocity = self.transition.velocity();
        self.transition
            .animate_to(target, self.animation, velocity, |_| {});
    }

    pub fn toggle(&self) {
        self.set_visible(!self.visible.get());
    }

    /// Target visibility.
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn visible(&self) -> State<bool> {
        self.visible.as_state()
    }

    /// Whether the content must stay in the tree: it is shown, or still
    /// running its exit.
    pub fn is_present(&self) -> bool {
        self.visible.get() || self.transition.value() > 0.0
    }

    pub fn is_running(&self) -> bool {
        self.transition.is_running()
    }

    pub fn fraction(&self) -> State<f32> {
        self.transition.state()
    }

    /// Layer for content `height` pixels tall.
    pub fn layer(&self, height: f32) -> GraphicsLayer {
        let fraction = self.transition.value().clamp(0.0, 1.0);
        if self.visible.get() {
            GraphicsLayer {
                scale_x: fraction,
                scale_y: fraction,
                translation_y: -(height / 2.0) * (1.0 - fraction),
                ..GraphicsLayer::default()
            }
        } else {
            GraphicsLayer {
                alpha: fraction,
                scale_x: fraction,
                scale_y: fraction,
                ..GraphicsLayer::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/visibility_tests.rs"]
mod tests;
