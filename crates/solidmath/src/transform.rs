//! Rigid motions and uniform scaling applied to points and planes.

use std::fmt;

use crate::{EPSILON, Float, Line, Plane, Point, Vector};

/// Geometric transformation.
///
/// Transforms act on fields by substitution: transforming a field `f` by `T`
/// yields `f(T⁻¹ p)`, so the zero set moves by `T`. Planes are mapped exactly
/// and are not renormalized.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transform {
    /// Translation by a vector.
    Translate(Vector),
    /// Rotation by an angle (in radians, right-handed) about an axis line
    /// with a unit direction.
    Spin {
        /// Axis of rotation.
        axis: Line,
        /// Angle of rotation.
        angle: Float,
    },
    /// Uniform scaling about a center.
    Scale {
        /// Fixed point.
        center: Point,
        /// Scale factor (nonzero).
        factor: Float,
    },
    /// Reflection through a plane with a unit normal.
    Mirror(Plane),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Translate(v) => write!(f, "translate({v})"),
            Transform::Spin { axis, angle } => write!(f, "spin({axis}, {angle})"),
            Transform::Scale { center, factor } => write!(f, "scale({center}, {factor})"),
            Transform::Mirror(plane) => write!(f, "mirror({plane})"),
        }
    }
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Transform::Translate(Vector::ZERO);

    /// Constructs a translation.
    pub fn translate(v: Vector) -> Self {
        Transform::Translate(v)
    }
    /// Constructs a rotation about an axis line.
    ///
    /// A degenerate axis logs a warning and yields the identity.
    pub fn spin(axis: Line, angle: Float) -> Self {
        match axis.normalize() {
            Some(axis) => Transform::Spin { axis, angle },
            None => {
                log::warn!("degenerate spin axis {axis}; using identity");
                Self::IDENTITY
            }
        }
    }
    /// Constructs a uniform scaling about a center.
    ///
    /// A zero or non-finite factor logs a warning and yields the identity.
    pub fn scale(center: Point, factor: Float) -> Self {
        if factor.abs() < EPSILON || !factor.is_finite() {
            log::warn!("degenerate scale factor {factor}; using identity");
            return Self::IDENTITY;
        }
        Transform::Scale { center, factor }
    }
    /// Constructs a reflection through a plane.
    ///
    /// A degenerate plane logs a warning and yields the identity.
    pub fn mirror(plane: Plane) -> Self {
        let mag = plane.normal.mag();
        if mag < EPSILON {
            log::warn!("degenerate mirror plane {plane}; using identity");
            return Self::IDENTITY;
        }
        Transform::Mirror(Plane::from_raw(plane.normal / mag, plane.offset / mag))
    }

    /// Applies the transform to a point.
    pub fn apply_point(&self, p: Point) -> Point {
        match *self {
            Transform::Translate(v) => p + v,
            Transform::Spin { axis, angle } => {
                axis.origin + rotate(p - axis.origin, axis.direction, angle)
            }
            Transform::Scale { center, factor } => center + (p - center) * factor,
            Transform::Mirror(m) => p - m.normal * (2.0 * m.value(p)),
        }
    }
    /// Applies the transform to a vector (a displacement, unaffected by
    /// translation).
    pub fn apply_vector(&self, v: Vector) -> Vector {
        self.apply_point(v) - self.apply_point(Vector::ZERO)
    }

    /// Returns the plane whose field is `plane.value(T⁻¹ p)`.
    pub fn apply_plane(&self, plane: &Plane) -> Plane {
        let Plane { normal: n, offset: d } = *plane;
        match *self {
            Transform::Translate(v) => Plane::from_raw(n, d - n.dot(v)),
            Transform::Spin { axis, angle } => {
                let rn = rotate(n, axis.direction, angle);
                let o = axis.origin;
                Plane::from_raw(rn, d + n.dot(o) - rn.dot(o))
            }
            Transform::Scale { center, factor } => {
                Plane::from_raw(n / factor, n.dot(center) * (1.0 - 1.0 / factor) + d)
            }
            Transform::Mirror(m) => {
                let nm = n.dot(m.normal);
                Plane::from_raw(n - m.normal * (2.0 * nm), d - 2.0 * m.offset * nm)
            }
        }
    }
    /// Applies the transform to a line, mapping each parameter to the image
    /// of the same point.
    pub fn apply_line(&self, line: &Line) -> Line {
        Line::new(self.apply_point(line.origin), self.apply_vector(line.direction))
    }
}

/// Rotates `v` about the unit vector `axis` by `angle` (Rodrigues' formula).
fn rotate(v: Vector, axis: Vector, angle: Float) -> Vector {
    let (sin, cos) = angle.sin_cos();
    v * cos + axis.cross(v) * sin + axis * (axis.dot(v) * (1.0 - cos))
}
