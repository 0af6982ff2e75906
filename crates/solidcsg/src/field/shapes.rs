//! Constructors for common solids as [`Expr`] fields.

use solidmath::prelude::*;

use super::Expr;

/// Returns a unit axis direction and two unit vectors perpendicular to it and
/// to each other. A zero direction is degenerate: a warning is logged and the
/// Z axis is used instead.
fn axis_frame(direction: Vector) -> [Vector; 3] {
    let w = direction.normalize().unwrap_or_else(|| {
        tracing::warn!(%direction, "degenerate axis direction; using Z axis");
        Vector::Z
    });
    let u = w.perpendicular().unwrap_or(Vector::X);
    let v = w.cross(u);
    [u, v, w]
}

impl Expr {
    /// Constructs a half-space bounded by a plane through `point`, with solid
    /// on the side opposite `outward_normal`.
    pub fn half_space(point: Point, outward_normal: Vector) -> Self {
        Expr::plane(Plane::through(point, outward_normal))
    }

    /// Constructs a solid sphere.
    pub fn sphere(center: Point, radius: Float) -> Self {
        let [x, y, z] = Axis::ALL.map(|axis| {
            Expr::plane(Plane::from_raw(Vector::unit(axis), -center[axis])).pow(2)
        });
        x + y + z - radius * radius
    }

    /// Constructs an infinite solid cylinder around an axis line.
    pub fn cylinder(axis: Line, radius: Float) -> Self {
        let [u, v, _] = axis_frame(axis.direction);
        let u = Expr::plane(Plane::through(axis.origin, u));
        let v = Expr::plane(Plane::through(axis.origin, v));
        u.pow(2) + v.pow(2) - radius * radius
    }

    /// Constructs an infinite solid double cone with its apex at `axis.origin`
    /// and the given half-angle (in radians) around the axis.
    pub fn cone(axis: Line, half_angle: Float) -> Self {
        let [u, v, w] = axis_frame(axis.direction);
        let u = Expr::plane(Plane::through(axis.origin, u));
        let v = Expr::plane(Plane::through(axis.origin, v));
        let w = Expr::plane(Plane::through(axis.origin, w));
        let tan = half_angle.tan();
        u.pow(2) + v.pow(2) - w.pow(2) * (tan * tan)
    }

    /// Constructs a solid torus centered on `axis.origin` with the given
    /// major (ring) and minor (tube) radii.
    pub fn torus(axis: Line, major_radius: Float, minor_radius: Float) -> Self {
        let [u, v, w] = axis_frame(axis.direction);
        let u2 = Expr::plane(Plane::through(axis.origin, u)).pow(2);
        let v2 = Expr::plane(Plane::through(axis.origin, v)).pow(2);
        let w2 = Expr::plane(Plane::through(axis.origin, w)).pow(2);
        let r2 = major_radius * major_radius;
        let radial = u2 + v2;
        (radial.clone() + w2 + (r2 - minor_radius * minor_radius)).pow(2) - radial * (4.0 * r2)
    }
}
