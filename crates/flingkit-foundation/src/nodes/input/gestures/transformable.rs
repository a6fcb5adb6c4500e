//! Pinch, rotate and pan accumulation.

use flingkit_core::{MutableState, State};
use flingkit_ui_graphics::{AffineTransform, GraphicsLayer, Point, Size, TransformOrigin};
use smallvec::SmallVec;

use crate::nodes::input::types::{PointerEvent, PointerEventKind, PointerId};

/// Accumulated scale, rotation and offset of a transformable element.
///
/// Every delta is applied as soon as it arrives; there is no gesture start or
/// end and no clamping.
#[derive(Clone)]
pub struct TransformableState {
    scale: MutableState<f32>,
    rotation: MutableState<f32>,
    offset: MutableState<Point>,
    transform_origin: TransformOrigin,
}

impl Default for TransformableState {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformableState {
    pub fn new() -> Self {
        Self {
            scale: MutableState::new(1.0),
            rotation: MutableState::new(0.0),
            offset: MutableState::new(Point::ZERO),
            transform_origin: TransformOrigin::CENTER,
        }
    }

    pub fn with_transform_origin(mut self, origin: TransformOrigin) -> Self {
        self.transform_origin = origin;
        self
    }

    /// `zoom_change` multiplies the scale, `rotation_change` (degrees) and
    /// `pan_change` add to rotation and offset.
    pub fn transform_by(&self, zoom_change: f32, pan_change: Point, rotation_change: f32) {
        self.scale.update(|scale| *scale *= zoom_change);
        self.rotation.update(|rotation| *rotation += rotation_change);
        self.offset.update(|offset| *offset += pan_change);
    }

    pub fn zoom_by(&self, zoom_change: f32) {
        self.transform_by(zoom_change, Point::ZERO, 0.0);
    }

    pub fn rotate_by(&self, rotation_change: f32) {
        self.transform_by(1.0, Point::ZERO, rotation_change);
    }

    pub fn pan_by(&self, pan_change: Point) {
        self.transform_by(1.0, pan_change, 0.0);
    }

    pub fn reset(&self) {
        self.scale.set(1.0);
        self.rotation.set(0.0);
        self.offset.set(Point::ZERO);
    }

    pub fn scale(&self) -> State<f32> {
        self.scale.as_state()
    }

    pub fn rotation(&self) -> State<f32> {
        self.rotation.as_state()
    }

    pub fn offset(&self) -> State<Point> {
        self.offset.as_state()
    }

    pub fn layer(&self) -> GraphicsLayer {
        let scale = self.scale.get();
        let offset = self.offset.get();
        GraphicsLayer {
            scale_x: scale,
            scale_y: scale,
            rotation_z: self.rotation.get(),
            translation_x: offset.x,
            translation_y: offset.y,
            transform_origin: self.transform_origin,
            ..GraphicsLayer::default()
        }
    }

    /// Matrix for an element of `size`.
    pub fn transform(&self, size: Size) -> AffineTransform {
        self.layer().to_transform(size)
    }
}

/// Turns two-pointer input into `(zoom, pan, rotation)` deltas.
///
/// With one pointer down only pan is produced. Pointers beyond the second are
/// ignored.
#[derive(Default)]
pub struct TransformGestureDetector {
    pointers: SmallVec<[(PointerId, Point); 2]>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformDelta {
    pub zoom: f32,
    pub pan: Point,
    /// Degrees.
    pub rotation: f32,
}

impl TransformGestureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Updates the tracked pointers and returns the delta this event caused.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> Option<TransformDelta> {
        match event.kind {
            PointerEventKind::Down => {
                if self.pointers.len() < 2 && !self.tracks(event.id) {
                    self.pointers.push((event.id, event.position));
                }
                None
            }
            PointerEventKind::Move => {
                let index = self.pointers.iter().position(|(id, _)| *id == event.id)?;
                let before = self.pointers.clone();
                self.pointers[index].1 = event.position;
                Some(delta_between(&before, &self.pointers))
            }
            PointerEventKind::Up | PointerEventKind::Cancel => {
                self.pointers.retain(|(id, _)| *id != event.id);
                None
            }
        }
    }

    /// Feeds `event` and applies the resulting delta to `state`.
    pub fn apply(&mut self, event: &PointerEvent, state: &TransformableState) -> bool {
        match self.on_pointer_event(event) {
            Some(delta) => {
                state.transform_by(delta.zoom, delta.pan, delta.rotation);
                true
            }
            None => false,
        }
    }

    fn tracks(&self, id: PointerId) -> bool {
        self.pointers.iter().any(|(tracked, _)| *tracked == id)
    }
}

fn centroid(pointers: &[(PointerId, Point)]) -> Point {
    let sum = pointers
        .iter()
        .fold(Point::ZERO, |acc, (_, position)| acc + *position);
    sum * (1.0 / pointers.len() as f32)
}

fn delta_between(before: &[(PointerId, Point)], after: &[(PointerId, Point)]) -> TransformDelta {
    let pan = centroid(after) - centroid(before);
    if before.len() < 2 || after.len() < 2 {
        return TransformDelta {
            zoom: 1.0,
            pan,
            rotation: 0.0,
        };
    }

    let span_before = before[1].1 - before[0].1;
    let span_after = after[1].1 - after[0].1;
    let zoom = if span_before.distance() > 0.0 {
        span_after.distance() / span_before.distance()
    } else {
        1.0
    };
    let angle_before = span_before.y.atan2(span_before.x);
    let angle_after = span_after.y.atan2(span_after.x);
    let mut rotation = (angle_after - angle_before).to_degrees();
    if rotation > 180.0 {
        rotation -= 360.0;
    } else if rotation < -180.0 {
        rotation += 360.0;
    }

    TransformDelta {
        zoom,
        pan,
        rotation,
    }
}

#[cfg(test)]
#[path = "../../../tests/transformable_tests.rs"]
mod tests;
