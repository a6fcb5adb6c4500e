pub mod swipe_config;
pub mod swipe_to_dismiss;
pub mod transformable;

pub use swipe_config::{ConfigError, DecayKind, SwipeDirection, SwipeToDismissConfig};
pub use swipe_to_dismiss::{DragSession, SwipePhase, SwipeToDismissController};
pub use transformable::{TransformDelta, TransformGestureDetector, TransformableState};
