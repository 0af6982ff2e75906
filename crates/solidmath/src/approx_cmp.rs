//! Approximate comparison functions.
//!
//! The unsuffixed functions use [`EPSILON`]. The `_tol` variants take an
//! explicit tolerance, which is how kernel code threads its configured
//! tolerances through.

use std::cmp::Ordering;

use crate::{EPSILON, Float};

/// Compares two numbers, but considers them equal if they are separated by at
/// most `tol`.
///
/// Handles infinity specially.
pub fn approx_eq_tol(a: Float, b: Float, tol: Float) -> bool {
    // use native float equality to handle infinities
    a == b || (a - b).abs() <= tol
}
/// Compares two numbers, but considers them equal if they are separated by at
/// most `EPSILON`.
pub fn approx_eq(a: Float, b: Float) -> bool {
    approx_eq_tol(a, b, EPSILON)
}

/// Compares two numbers, considering them equal if they are separated by at
/// most `tol`.
pub fn approx_cmp_tol(a: Float, b: Float, tol: Float) -> Ordering {
    if approx_eq_tol(a, b, tol) {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}
/// Compares two numbers, considering them equal if they are separated by at
/// most `EPSILON`.
pub fn approx_cmp(a: Float, b: Float) -> Ordering {
    approx_cmp_tol(a, b, EPSILON)
}

/// Returns whether one number is less than another by more than `EPSILON`.
pub fn approx_lt(a: Float, b: Float) -> bool {
    a < b && !approx_eq(a, b)
}
/// Returns whether one number is greater than another by more than `EPSILON`.
pub fn approx_gt(a: Float, b: Float) -> bool {
    a > b && !approx_eq(a, b)
}

/// Returns whether `x` has an absolute value greater than `EPSILON`.
pub fn is_approx_nonzero(x: Float) -> bool {
    !approx_eq(x, 0.0)
}
/// Returns whether `x` is less than `-EPSILON`.
pub fn is_approx_negative(x: Float) -> bool {
    approx_lt(x, 0.0)
}
/// Returns whether `x` is greater than `EPSILON`.
pub fn is_approx_positive(x: Float) -> bool {
    approx_gt(x, 0.0)
}

/// Returns whether two numbers agree to within `tol` relative to the larger of
/// their magnitudes (or absolutely, when both are smaller than one).
pub fn approx_eq_relative(a: Float, b: Float, tol: Float) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    approx_eq_tol(a, b, tol * scale)
}
