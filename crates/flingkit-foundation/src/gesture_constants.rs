//! Shared gesture thresholds, in logical pixels.
//!
//! Hosts on high-density screens should scale these by the device density
//! before handing them to a controller config.

/// Travel below this distance between press and release is a tap.
///
/// Matches Android's `ViewConfiguration` touch slop (8dp).
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Release velocities are clamped to this many pixels per second.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Below this speed (px/sec) a release is treated as having no velocity.
pub const MIN_FLING_VELOCITY: f32 = 1.0;
