//! Assertion utilities for gesture tests.

use flingkit_ui_graphics::{GraphicsLayer, Point};

/// Assert that a value is within `tolerance` of `expected`.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

pub fn assert_point_approx_eq(actual: Point, expected: Point, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
}

pub fn assert_layer_approx_eq(
    actual: &GraphicsLayer,
    expected: &GraphicsLayer,
    tolerance: f32,
    msg: &str,
) {
    assert_approx_eq(actual.alpha, expected.alpha, tolerance, &format!("{} - alpha", msg));
    assert_approx_eq(
        actual.scale_x,
        expected.scale_x,
        tolerance,
        &format!("{} - scale_x", msg),
    );
    assert_approx_eq(
        actual.scale_y,
        expected.scale_y,
        tolerance,
        &format!("{} - scale_y", msg),
    );
    assert_approx_eq(
        actual.rotation_z,
        expected.rotation_z,
        tolerance,
        &format!("{} - rotation_z", msg),
    );
    assert_approx_eq(
        actual.translation_x,
        expected.translation_x,
        tolerance,
        &format!("{} - translation_x", msg),
    );
    assert_approx_eq(
        actual.translation_y,
        expected.translation_y,
        tolerance,
        &format!("{} - translation_y", msg),
    );
}

/// Assert that consecutive samples never jump by more than `max_step`.
pub fn assert_continuous(samples: &[f32], max_step: f32, msg: &str) {
    for (index, pair) in samples.windows(2).enumerate() {
        let step = (pair[1] - pair[0]).abs();
        assert!(
            step <= max_step,
            "{}: jump of {} between samples {} and {} ({:?})",
            msg,
            step,
            index,
            index + 1,
            pair
        );
    }
}
