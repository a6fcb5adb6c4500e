pub mod dispatcher;
pub mod gestures;
pub mod types;

pub use dispatcher::{PointerDispatcher, PointerInputHandler};
pub use types::{PointerEvent, PointerEventKind, PointerId};

pub mod prelude {
    pub use super::dispatcher::{PointerDispatcher, PointerInputHandler};
    pub use super::types::{PointerEvent, PointerEventKind, PointerId};
}
