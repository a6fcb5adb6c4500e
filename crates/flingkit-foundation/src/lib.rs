//! Foundation elements for flingkit: pointer input, velocity tracking, and the
//! gesture and transition models built on [`flingkit_animation`].

pub mod gesture_constants;
pub mod nodes;
pub mod progress;
pub mod velocity_tracker;
pub mod visibility;

pub use nodes::input::gestures;

pub use gestures::{
    ConfigError, DecayKind, DragSession, SwipeDirection, SwipePhase, SwipeToDismissConfig,
    SwipeToDismissController, TransformDelta, TransformGestureDetector, TransformableState,
};
pub use nodes::input::{
    PointerDispatcher, PointerEvent, PointerEventKind, PointerId, PointerInputHandler,
};
pub use progress::{ProgressBand, ProgressIndicatorState, ShimmerArc};
pub use velocity_tracker::{PointerSample, TrackingMode, VelocityTracker, VelocityTracker1D};
pub use visibility::AnimatedVisibilityState;

pub mod prelude {
    pub use crate::gesture_constants::*;
    pub use crate::gestures::{
        SwipeDirection, SwipePhase, SwipeToDismissConfig, SwipeToDismissController,
        TransformableState,
    };
    pub use crate::nodes::input::prelude::*;
    pub use crate::velocity_tracker::{PointerSample, VelocityTracker};
}
