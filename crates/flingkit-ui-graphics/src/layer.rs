//! Per-frame layer properties and the affine matrix they produce.

use crate::geometry::{Point, Size};

/// Pivot for scale and rotation, as fractions of the layer size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformOrigin {
    pub pivot_fraction_x: f32,
    pub pivot_fraction_y: f32,
}

impl TransformOrigin {
    pub const CENTER: TransformOrigin = TransformOrigin {
        pivot_fraction_x: 0.5,
        pivot_fraction_y: 0.5,
    };

    pub const fn new(pivot_fraction_x: f32, pivot_fraction_y: f32) -> Self {
        Self {
            pivot_fraction_x,
            pivot_fraction_y,
        }
    }

    pub fn resolve(&self, size: Size) -> Point {
        Point::new(
            size.width * self.pivot_fraction_x,
            size.height * self.pivot_fraction_y,
        )
    }
}

impl Default for TransformOrigin {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Layer properties consumed by a renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphicsLayer {
    pub alpha: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Clockwise rotation in degrees. Not normalized.
    pub rotation_z: f32,
    pub translation_x: f32,
    pub translation_y: f32,
    pub transform_origin: TransformOrigin,
}

impl Default for GraphicsLayer {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation_z: 0.0,
            translation_x: 0.0,
            translation_y: 0.0,
            transform_origin: TransformOrigin::CENTER,
        }
    }
}

impl GraphicsLayer {
    /// Builds the matrix mapping layer-local points to parent space for a
    /// layer of the given size.
    pub fn to_transform(&self, size: Size) -> AffineTransform {
        let pivot = self.transform_origin.resolve(size);
        AffineTransform::translation(-pivot.x, -pivot.y)
            .then(AffineTransform::scale(self.scale_x, self.scale_y))
            .then(AffineTransform::rotation_degrees(self.rotation_z))
            .then(AffineTransform::translation(
                pivot.x + self.translation_x,
                pivot.y + self.translation_y,
            ))
    }
}

/// 2D affine matrix.
///
/// Maps `(x, y)` to `(a * x + c * y + tx, b * x + d * y + ty)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    pub fn rotation_degrees(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Returns a transform applying `self` first, then `next`.
    pub fn then(self, next: AffineTransform) -> AffineTransform {
        AffineTransform {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            tx: next.a * self.tx + next.c * self.ty + next.tx,
            ty: next.b * self.tx + next.d * self.ty + next.ty,
        }
    }

    pub fn map_point(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.tx,
            self.b * point.x + self.d * point.y + self.ty,
        )
    }

    /// Row-major 3x3 form, for renderers that upload full matrices.
    pub fn to_matrix3(&self) -> [[f32; 3]; 3] {
        [
            [self.a, self.c, self.tx],
            [self.b, self.d, self.ty],
            [0.0, 0.0, 1.0],
        ]
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
