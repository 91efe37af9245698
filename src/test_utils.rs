//! Shared test helpers: float/vector closeness assertions, grounded in
//! `subsweep::test_utils`'s `assert_float_is_close`/`assert_vec_is_close`
//! with the `diman`-unit-aware variant dropped since this crate has no
//! compile-time unit system.

use crate::dimension::Dimension;
use crate::dimension::Vector;

pub fn assert_float_is_close(a: f64, b: f64) {
    assert_float_is_close_with_tolerance(a, b, 10.0 * f64::EPSILON);
}

pub fn assert_float_is_close_high_error(a: f64, b: f64) {
    assert_float_is_close_with_tolerance(a, b, 1e3 * f64::EPSILON);
}

pub fn assert_float_is_close_with_tolerance(a: f64, b: f64, tolerance: f64) {
    let scale = a.abs().max(b.abs()).max(1.0);
    assert!(
        (a - b).abs() <= tolerance * scale,
        "expected {a} to be close to {b} (tolerance {tolerance})"
    );
}

pub fn assert_vec_is_close<D: Dimension>(a: D::Point, b: D::Point) {
    let scale = a.length().max(b.length()).max(1.0);
    let diff = a.distance(b);
    assert!(
        diff <= 10.0 * f64::EPSILON * scale,
        "expected {a:?} to be close to {b:?}, distance was {diff}"
    );
}
