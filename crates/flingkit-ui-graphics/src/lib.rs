//! Pure math/data for gesture and animation output.
//!
//! Geometry primitives plus the layer description a renderer applies every
//! frame. Nothing in here knows about time or input.

mod geometry;
mod layer;

pub use geometry::*;
pub use layer::*;

pub mod prelude {
    pub use crate::geometry::{Point, Size, Velocity};
    pub use crate::layer::{AffineTransform, GraphicsLayer, TransformOrigin};
}
