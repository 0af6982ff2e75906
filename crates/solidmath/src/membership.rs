//! Tri-state membership of a point (or region) in a solid.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Mul, MulAssign, Neg};

use crate::{Float, Interval};

/// Location of a point relative to a solid.
///
/// Implicit fields are negative inside solid, positive in air, and zero on the
/// surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Membership {
    /// The point is outside the solid.
    Air,
    /// The point is on the boundary of the solid.
    Surface,
    /// The point is inside the solid.
    Solid,
}
impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Membership::Air => write!(f, "AIR"),
            Membership::Surface => write!(f, "SURFACE"),
            Membership::Solid => write!(f, "SOLID"),
        }
    }
}
impl Neg for Membership {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Membership::Air => Membership::Solid,
            Membership::Solid => Membership::Air,
            Membership::Surface => Membership::Surface,
        }
    }
}
crate::impl_mul_sign!(impl Mul<crate::Sign> for Membership);
crate::impl_mulassign_sign!(impl MulAssign<crate::Sign> for Membership);

impl Membership {
    /// Classifies a field value. Only an exact zero is on the surface.
    pub fn from_value(value: Float) -> Self {
        Self::from_value_tol(value, 0.0)
    }
    /// Classifies a field value, treating anything within `tol` of zero as
    /// surface.
    pub fn from_value_tol(value: Float, tol: Float) -> Self {
        match crate::approx_cmp_tol(value, 0.0, tol) {
            Ordering::Less => Membership::Solid,
            Ordering::Equal => Membership::Surface,
            Ordering::Greater => Membership::Air,
        }
    }
    /// Classifies the conservative range of a field over a region. A range
    /// that straddles (or touches) zero may contain surface, so it is reported
    /// as [`Membership::Surface`].
    pub fn from_range(range: Interval) -> Self {
        if range.hi < 0.0 {
            Membership::Solid
        } else if range.lo > 0.0 {
            Membership::Air
        } else {
            Membership::Surface
        }
    }

    /// Returns whether the point is strictly inside.
    pub fn is_solid(self) -> bool {
        self == Membership::Solid
    }
    /// Returns whether the point is strictly outside.
    pub fn is_air(self) -> bool {
        self == Membership::Air
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sign;

    #[test]
    fn test_membership_from_value() {
        assert_eq!(Membership::from_value(-1.0), Membership::Solid);
        assert_eq!(Membership::from_value(0.0), Membership::Surface);
        assert_eq!(Membership::from_value(1e-300), Membership::Air);
        assert_eq!(Membership::from_value_tol(1e-9, 1e-6), Membership::Surface);
    }

    #[test]
    fn test_membership_sign() {
        assert_eq!(Membership::Air * Sign::Neg, Membership::Solid);
        assert_eq!(Membership::Surface * Sign::Neg, Membership::Surface);
        assert_eq!(Membership::Solid * Sign::Pos, Membership::Solid);
    }

    #[test]
    fn test_membership_from_range() {
        assert_eq!(Membership::from_range(Interval::new(-2.0, -1.0)), Membership::Solid);
        assert_eq!(Membership::from_range(Interval::new(1.0, 2.0)), Membership::Air);
        assert_eq!(Membership::from_range(Interval::new(-1.0, 2.0)), Membership::Surface);
    }
}
