//! Oriented planes.

use std::fmt;
use std::ops::Neg;

use crate::{EPSILON, Float, Interval, IntervalBox, Line, Point, Vector};

/// Plane whose field value at `p` is `normal · p + offset`.
///
/// Points with a negative value are on the solid side. Planes built with
/// [`Plane::new`] have a unit normal, so the value is a signed distance;
/// planes produced by scaling transforms may not.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane {
    /// Normal vector, pointing toward air.
    pub normal: Vector,
    /// Value of the field at the origin.
    pub offset: Float,
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plane({}, {})", self.normal, self.offset)
    }
}

impl Neg for Plane {
    type Output = Plane;

    fn neg(self) -> Self::Output {
        Plane {
            normal: -self.normal,
            offset: -self.offset,
        }
    }
}

impl Plane {
    /// Constructs a plane from a normal vector and an offset, scaling both so
    /// that the normal has unit length.
    ///
    /// A zero normal is degenerate: a warning is logged and the plane is kept
    /// as is, so its value is the constant `offset`.
    pub fn new(normal: Vector, offset: Float) -> Self {
        let mag = normal.mag();
        if mag < EPSILON {
            log::warn!("degenerate plane with normal {normal}; using constant field {offset}");
            return Self::from_raw(normal, offset);
        }
        Self::from_raw(normal / mag, offset / mag)
    }
    /// Constructs a plane through `point` with the given normal.
    pub fn through(point: Point, normal: Vector) -> Self {
        let plane = Self::new(normal, 0.0);
        Self::from_raw(plane.normal, -plane.normal.dot(point))
    }
    /// Constructs a plane from a normal vector and an offset without
    /// normalizing.
    pub const fn from_raw(normal: Vector, offset: Float) -> Self {
        Self { normal, offset }
    }

    /// Returns the value of the plane's field at a point.
    pub fn value(&self, p: Point) -> Float {
        self.normal.dot(p) + self.offset
    }
    /// Returns the range of the plane's field over a box.
    pub fn range(&self, b: &IntervalBox) -> Interval {
        (b.x() * self.normal.x() + b.y() * self.normal.y() + b.z() * self.normal.z())
            + self.offset
    }
    /// Returns the coefficients `[c0, c1]` of the plane's field along a line,
    /// as a function of the line parameter: `c0 + c1 * t`.
    pub fn restrict_to_line(&self, line: &Line) -> [Float; 2] {
        [self.value(line.origin), self.normal.dot(line.direction)]
    }
    /// Returns the point on the plane nearest to `p`. For a degenerate plane,
    /// returns `p`.
    pub fn project(&self, p: Point) -> Point {
        let mag2 = self.normal.mag2();
        if mag2 == 0.0 {
            return p;
        }
        p - self.normal * (self.value(p) / mag2)
    }
}

impl approx::AbsDiffEq for Plane {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.normal.abs_diff_eq(&other.normal, epsilon)
            && crate::approx_eq_tol(self.offset, other.offset, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_normalization() {
        let p = Plane::new(vector![0.0, 3.0, 4.0], 10.0);
        crate::assert_approx_eq!(p.normal, vector![0.0, 0.6, 0.8]);
        crate::assert_approx_eq!(p.offset, 2.0);
        let q = Plane::through(vector![0.0, 0.0, 5.0], Vector::Z);
        assert_eq!(q.value(vector![1.0, 1.0, 5.0]), 0.0);
        assert_eq!(q.value(Vector::ZERO), -5.0);
    }

    #[test]
    fn test_degenerate_plane() {
        let p = Plane::new(Vector::ZERO, 2.0);
        assert_eq!(p.value(vector![5.0, -1.0, 3.0]), 2.0);
        assert_eq!(p.project(Vector::X), Vector::X);
    }

    #[test]
    fn test_plane_range_and_restriction() {
        let p = Plane::new(Vector::X, -1.0);
        let b = IntervalBox::cube(Vector::ZERO, 2.0);
        assert_eq!(p.range(&b), Interval::new(-3.0, 1.0));
        let line = Line::new(Vector::ZERO, vector![2.0, 0.0, 0.0]);
        assert_eq!(p.restrict_to_line(&line), [-1.0, 2.0]);
    }
}
