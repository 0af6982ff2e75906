//! 3D vector math.

use std::fmt;
use std::iter::Sum;
use std::ops::*;

use crate::{AXIS_NAMES, EPSILON, Float};

/// Constructs a 3D vector from its components.
#[macro_export]
macro_rules! vector {
    [$x:expr, $y:expr, $z:expr $(,)?] => {
        $crate::Vector([$x, $y, $z])
    };
    [$v:expr; 3] => {
        $crate::Vector([$v; 3])
    };
}

/// Point in 3D space.
///
/// Points and vectors share a representation; the alias documents intent.
pub type Point = Vector;

/// One of the three coordinate axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// X axis.
    X = 0,
    /// Y axis.
    Y = 1,
    /// Z axis.
    Z = 2,
}
impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = *self as usize;
        write!(f, "{}", &AXIS_NAMES[i..i + 1])
    }
}
impl Axis {
    /// All three axes in order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the axis with a given index, or `None` if the index is out of
    /// range.
    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }
    /// Returns the index of the axis.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// 3D vector.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Vector(pub [Float; 3]);

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0;
        write!(f, "({x}, {y}, {z})")
    }
}

impl Vector {
    /// Zero vector, also used as the origin.
    pub const ZERO: Self = Self([0.0; 3]);
    /// Unit vector along the X axis.
    pub const X: Self = Self([1.0, 0.0, 0.0]);
    /// Unit vector along the Y axis.
    pub const Y: Self = Self([0.0, 1.0, 0.0]);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self([0.0, 0.0, 1.0]);

    /// Constructs a vector from its components.
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self([x, y, z])
    }
    /// Returns a unit vector along an axis.
    pub fn unit(axis: Axis) -> Self {
        let mut ret = Self::ZERO;
        ret[axis] = 1.0;
        ret
    }

    /// Returns the X component.
    pub fn x(self) -> Float {
        self.0[0]
    }
    /// Returns the Y component.
    pub fn y(self) -> Float {
        self.0[1]
    }
    /// Returns the Z component.
    pub fn z(self) -> Float {
        self.0[2]
    }

    /// Returns the dot product of this vector with another.
    pub fn dot(self, rhs: Self) -> Float {
        std::iter::zip(self.0, rhs.0).map(|(l, r)| l * r).sum()
    }
    /// Returns the cross product of this vector with another.
    pub fn cross(self, rhs: Self) -> Self {
        vector![
            self.y() * rhs.z() - self.z() * rhs.y(),
            self.z() * rhs.x() - self.x() * rhs.z(),
            self.x() * rhs.y() - self.y() * rhs.x(),
        ]
    }

    /// Returns the magnitude of the vector.
    pub fn mag(self) -> Float {
        self.mag2().sqrt()
    }
    /// Returns the squared magnitude of the vector.
    pub fn mag2(self) -> Float {
        self.dot(self)
    }

    /// Returns a normalized copy of the vector, or `None` if the vector is
    /// zero.
    #[must_use]
    pub fn normalize(self) -> Option<Self> {
        let mult = 1.0 / self.mag();
        mult.is_finite().then(|| self * mult)
    }

    /// Returns the component-wise minimum of two vectors.
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        self.zip_map(rhs, Float::min)
    }
    /// Returns the component-wise maximum of two vectors.
    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        self.zip_map(rhs, Float::max)
    }
    /// Applies a function to each component.
    #[must_use]
    pub fn map(self, f: impl FnMut(Float) -> Float) -> Self {
        Self(self.0.map(f))
    }
    /// Applies a function to each pair of corresponding components.
    #[must_use]
    pub fn zip_map(self, rhs: Self, mut f: impl FnMut(Float, Float) -> Float) -> Self {
        Self([f(self.0[0], rhs.0[0]), f(self.0[1], rhs.0[1]), f(self.0[2], rhs.0[2])])
    }

    /// Returns the axis along which the vector has the largest absolute
    /// component.
    pub fn dominant_axis(self) -> Axis {
        let [x, y, z] = self.0.map(Float::abs);
        if x >= y && x >= z {
            Axis::X
        } else if y >= z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Returns some unit vector perpendicular to this one, or `None` if this
    /// vector is zero.
    pub fn perpendicular(self) -> Option<Self> {
        let helper = match self.dominant_axis() {
            Axis::X => Self::Y,
            Axis::Y | Axis::Z => Self::X,
        };
        self.cross(helper).normalize()
    }
}

impl Index<usize> for Vector {
    type Output = Float;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}
impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}
impl Index<Axis> for Vector {
    type Output = Float;

    fn index(&self, axis: Axis) -> &Self::Output {
        &self.0[axis as usize]
    }
}
impl IndexMut<Axis> for Vector {
    fn index_mut(&mut self, axis: Axis) -> &mut Self::Output {
        &mut self.0[axis as usize]
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_map(rhs, |l, r| l + r)
    }
}
impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_map(rhs, |l, r| l - r)
    }
}
impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Self::Output {
        self.map(|x| -x)
    }
}
impl Mul<Float> for Vector {
    type Output = Vector;

    fn mul(self, rhs: Float) -> Self::Output {
        self.map(|x| x * rhs)
    }
}
impl Mul<Vector> for Float {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Self::Output {
        rhs * self
    }
}
impl Div<Float> for Vector {
    type Output = Vector;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: Float) -> Self::Output {
        let mult = 1.0 / rhs;
        self * mult
    }
}
impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl MulAssign<Float> for Vector {
    fn mul_assign(&mut self, rhs: Float) {
        *self = *self * rhs;
    }
}

impl Sum for Vector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + b)
    }
}

impl From<[Float; 3]> for Vector {
    fn from(value: [Float; 3]) -> Self {
        Self(value)
    }
}

impl approx::AbsDiffEq for Vector {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        std::iter::zip(self.0, other.0).all(|(l, r)| (l - r).abs() <= epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_vector_arithmetic() {
        let v1 = vector![1.0, 2.0, -10.0];
        let v2 = vector![-5.0, 0.0, 1.0];
        assert_eq!(v1 + v2, vector![-4.0, 2.0, -9.0]);
        assert_eq!(v1 - v2, vector![6.0, 2.0, -11.0]);
        assert_eq!(-v1, vector![-1.0, -2.0, 10.0]);
        assert_eq!(v1 * 2.0, vector![2.0, 4.0, -20.0]);
    }

    #[test]
    pub fn test_dot_and_cross_product() {
        let v1 = vector![1.0, 2.0, -10.0];
        let v2 = vector![-5.0, 16.0, 0.0];
        assert_eq!(v1.dot(v2), 27.0);
        assert_eq!(Vector::X.cross(Vector::Y), Vector::Z);
        assert_eq!(Vector::Y.cross(Vector::X), -Vector::Z);
    }

    #[test]
    pub fn test_perpendicular() {
        for v in [Vector::X, vector![1.0, 1.0, 1.0], vector![0.0, -3.0, 0.5]] {
            let p = v.perpendicular().unwrap();
            crate::assert_approx_eq!(p.dot(v), 0.0);
            crate::assert_approx_eq!(p.mag(), 1.0);
        }
        assert_eq!(Vector::ZERO.perpendicular(), None);
    }
}
