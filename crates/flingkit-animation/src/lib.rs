//! Animation system for flingkit
//!
//! This crate provides animation specs (tweens, springs, repeats), fling decay
//! physics, and [`Animatable`], the frame-driven value every gesture animates.

pub mod animatable;
pub mod animation;
pub mod decay_spec;

pub use animatable::{Animatable, AnimationEndReason, AnimationHandle, AnimationResult};
pub use animation::*;
pub use decay_spec::{
    calculate_target_value, DecaySpecError, ExponentialDecaySpec, FlingCalculator, FlingInfo,
    FloatDecayAnimationSpec, SplineBasedDecaySpec,
};

pub mod prelude {
    pub use crate::animatable::{Animatable, AnimationEndReason, AnimationResult};
    pub use crate::animation::{AnimationSpec, AnimationType, Easing, RepeatableSpec, SpringSpec};
    pub use crate::decay_spec::{FloatDecayAnimationSpec, SplineBasedDecaySpec};
}
