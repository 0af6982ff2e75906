//! Parametric lines.

use std::fmt;

use crate::{Float, Interval, IntervalBox, Point, Vector};

/// Parametric line `origin + t * direction`.
///
/// The direction is not required to be a unit vector, so `t` is measured in
/// multiples of its length.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// Point at `t = 0`.
    pub origin: Point,
    /// Displacement per unit of `t`.
    pub direction: Vector,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + t{}", self.origin, self.direction)
    }
}

impl Line {
    /// Constructs a line from an origin and a direction.
    pub const fn new(origin: Point, direction: Vector) -> Self {
        Self { origin, direction }
    }
    /// Constructs the line through `a` (at `t = 0`) and `b` (at `t = 1`).
    pub fn through(a: Point, b: Point) -> Self {
        Self::new(a, b - a)
    }

    /// Returns the point at parameter `t`.
    pub fn point_at(&self, t: Float) -> Point {
        self.origin + self.direction * t
    }
    /// Returns the smallest box containing the segment of the line over a
    /// range of parameters.
    pub fn segment_bounds(&self, t: Interval) -> IntervalBox {
        if t.is_empty() {
            return IntervalBox::EMPTY;
        }
        IntervalBox::spanning(self.point_at(t.lo), self.point_at(t.hi))
    }
    /// Returns whether the direction is zero, in which case the line is a
    /// single point.
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vector::ZERO
    }
    /// Returns the same line with a unit direction, or `None` if the line is
    /// degenerate.
    pub fn normalize(&self) -> Option<Self> {
        Some(Self::new(self.origin, self.direction.normalize()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_points() {
        let line = Line::through(vector![1.0, 0.0, 0.0], vector![3.0, 2.0, 0.0]);
        assert_eq!(line.point_at(0.5), vector![2.0, 1.0, 0.0]);
        let b = line.segment_bounds(Interval::new(0.0, 1.0));
        assert_eq!(b.lo(), vector![1.0, 0.0, 0.0]);
        assert_eq!(b.hi(), vector![3.0, 2.0, 0.0]);
        assert!(Line::new(Vector::ZERO, Vector::ZERO).normalize().is_none());
    }
}
