//! Configuration for [`SwipeToDismissController`](super::SwipeToDismissController).

use std::fmt;
use std::rc::Rc;

use flingkit_animation::{
    DecaySpecError, ExponentialDecaySpec, FloatDecayAnimationSpec, SplineBasedDecaySpec,
    SpringSpec,
};

use crate::gesture_constants::{DRAG_THRESHOLD, MAX_FLING_VELOCITY};

/// Which way an element may be dragged and dismissed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Either way.
    #[default]
    Both,
    /// Towards negative x only (left in a left-to-right layout).
    StartOnly,
    /// Towards positive x only.
    EndOnly,
}

impl SwipeDirection {
    /// Offset range for a container of `width`.
    pub fn bounds(self, width: f32) -> (f32, f32) {
        match self {
            SwipeDirection::Both => (-width, width),
            SwipeDirection::StartOnly => (-width, 0.0),
            SwipeDirection::EndOnly => (0.0, width),
        }
    }

    /// Whether a release whose decay would come to rest at `projected` is
    /// heading in a direction that may dismiss.
    pub fn allows_dismiss_towards(self, projected: f32) -> bool {
        match self {
            SwipeDirection::Both => projected != 0.0,
            SwipeDirection::StartOnly => projected < 0.0,
            SwipeDirection::EndOnly => projected > 0.0,
        }
    }
}

/// Deceleration model used to project and animate a release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DecayKind {
    /// Android fling spline at the given screen density.
    Spline { density: f32 },
    Exponential {
        friction_multiplier: f32,
        velocity_threshold: f32,
    },
}

impl Default for DecayKind {
    fn default() -> Self {
        DecayKind::Spline { density: 1.0 }
    }
}

impl DecayKind {
    pub fn build(self) -> Result<Rc<dyn FloatDecayAnimationSpec>, DecaySpecError> {
        Ok(match self {
            DecayKind::Spline { density } => Rc::new(SplineBasedDecaySpec::new(density)?),
            DecayKind::Exponential {
                friction_multiplier,
                velocity_threshold,
            } => Rc::new(ExponentialDecaySpec::new(
                friction_multiplier,
                velocity_threshold,
            )?),
        })
    }
}

/// Rejected controller configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidContainerWidth(f32),
    InvalidTouchSlop(f32),
    InvalidMaxFlingVelocity(f32),
    InvalidSpring { stiffness: f32, damping_ratio: f32 },
    Decay(DecaySpecError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidContainerWidth(width) => {
                write!(f, "container width must be positive and finite, got {width}")
            }
            ConfigError::InvalidTouchSlop(slop) => {
                write!(f, "touch slop must be non-negative and finite, got {slop}")
            }
            ConfigError::InvalidMaxFlingVelocity(velocity) => {
                write!(f, "max fling velocity must be positive and finite, got {velocity}")
            }
            ConfigError::InvalidSpring {
                stiffness,
                damping_ratio,
            } => write!(
                f,
                "spring needs positive stiffness and damping, got stiffness {stiffness} damping {damping_ratio}"
            ),
            ConfigError::Decay(err) => write!(f, "invalid decay: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Decay(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DecaySpecError> for ConfigError {
    fn from(err: DecaySpecError) -> Self {
        ConfigError::Decay(err)
    }
}

/// Tunables for a swipe-to-dismiss controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeToDismissConfig {
    /// Distance the element must be projected past to dismiss, and the
    /// offset it comes to rest at once dismissed.
    pub container_width: f32,
    pub direction: SwipeDirection,
    /// Total travel below which a press-release is a tap.
    pub touch_slop: f32,
    pub max_fling_velocity: f32,
    pub decay: DecayKind,
    /// Spring used to return to rest.
    pub snap_back: SpringSpec,
}

impl SwipeToDismissConfig {
    pub fn new(container_width: f32) -> Self {
        Self {
            container_width,
            direction: SwipeDirection::Both,
            touch_slop: DRAG_THRESHOLD,
            max_fling_velocity: MAX_FLING_VELOCITY,
            decay: DecayKind::default(),
            snap_back: SpringSpec::default(),
        }
    }

    pub fn with_direction(mut self, direction: SwipeDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_touch_slop(mut self, touch_slop: f32) -> Self {
        self.touch_slop = touch_slop;
        self
    }

    pub fn with_max_fling_velocity(mut self, max_fling_velocity: f32) -> Self {
        self.max_fling_velocity = max_fling_velocity;
        self
    }

    pub fn with_decay(mut self, decay: DecayKind) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_snap_back(mut self, snap_back: SpringSpec) -> Self {
        self.snap_back = snap_back;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.container_width.is_finite() || self.container_width <= 0.0 {
            return Err(ConfigError::InvalidContainerWidth(self.container_width));
        }
        if !self.touch_slop.is_finite() || self.touch_slop < 0.0 {
            return Err(ConfigError::InvalidTouchSlop(self.touch_slop));
        }
        if !self.max_fling_velocity.is_finite() || self.max_fling_velocity <= 0.0 {
            return Err(ConfigError::InvalidMaxFlingVelocity(self.max_fling_velocity));
        }
        let spring = &self.snap_back;
        if !(spring.stiffness > 0.0 && spring.damping_ratio > 0.0)
            || !spring.stiffness.is_finite()
            || !spring.damping_ratio.is_finite()
        {
            return Err(ConfigError::InvalidSpring {
                stiffness: spring.stiffness,
                damping_ratio: spring.damping_ratio,
            });
        }
        self.decay.build()?;
        Ok(())
    }
}
