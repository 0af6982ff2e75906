//! Common mathematical utility functions that didn't fit anywhere else.

use super::Float;

/// Returns the parameter where the line through `(t0, f0)` and `(t1, f1)`
/// crosses zero, clamped to `[t0, t1]`. If the values are equal, returns the
/// midpoint.
pub fn linear_zero(t0: Float, f0: Float, t1: Float, f1: Float) -> Float {
    if f0 == f1 {
        return (t0 + t1) * 0.5;
    }
    let t = t0 + (t1 - t0) * f0 / (f0 - f1);
    t.clamp(t0.min(t1), t0.max(t1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_zero() {
        assert_eq!(linear_zero(0.0, -1.0, 2.0, 1.0), 1.0);
        assert_eq!(linear_zero(0.0, 1.0, 1.0, 1.0), 0.5);
        assert_eq!(linear_zero(0.0, -1.0, 1.0, 3.0), 0.25);
    }
}
