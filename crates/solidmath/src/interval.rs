//! Conservative interval arithmetic.
//!
//! Every operation returns an interval guaranteed to contain the result of
//! applying the operation to any values drawn from the operands. Division
//! between two intervals is deliberately not provided.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, Mul, Neg, Sub};

use crate::{EPSILON, Float, Membership};

/// Closed interval `[lo, hi]`.
///
/// An interval with `lo > hi` is empty; [`Interval::EMPTY`] is the canonical
/// empty value but every inverted interval behaves the same way.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    /// Lower bound.
    pub lo: Float,
    /// Upper bound.
    pub hi: Float,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[empty]")
        } else {
            write!(f, "[{}, {}]", self.lo, self.hi)
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Interval {
    /// Empty interval.
    pub const EMPTY: Self = Self {
        lo: Float::INFINITY,
        hi: Float::NEG_INFINITY,
    };
    /// Entire real line.
    pub const EVERYTHING: Self = Self {
        lo: Float::NEG_INFINITY,
        hi: Float::INFINITY,
    };
    /// Interval containing only zero.
    pub const ZERO: Self = Self { lo: 0.0, hi: 0.0 };

    /// Constructs an interval from its bounds. If `lo > hi`, the interval is
    /// empty.
    pub const fn new(lo: Float, hi: Float) -> Self {
        Self { lo, hi }
    }
    /// Constructs an interval containing a single value.
    pub const fn point(x: Float) -> Self {
        Self { lo: x, hi: x }
    }
    /// Constructs the smallest interval containing two values, in either order.
    pub fn spanning(a: Float, b: Float) -> Self {
        Self::new(a.min(b), a.max(b))
    }

    /// Returns whether the interval is empty.
    pub fn is_empty(self) -> bool {
        !(self.lo <= self.hi)
    }
    /// Returns the width of the interval, or zero if it is empty.
    pub fn width(self) -> Float {
        if self.is_empty() { 0.0 } else { self.hi - self.lo }
    }
    /// Returns the midpoint of the interval.
    pub fn mid(self) -> Float {
        (self.lo + self.hi) * 0.5
    }
    /// Returns the value at parameter `t`, where `0` is `lo` and `1` is `hi`.
    pub fn lerp(self, t: Float) -> Float {
        self.lo + (self.hi - self.lo) * t
    }
    /// Splits the interval in half.
    pub fn bisect(self) -> [Self; 2] {
        let mid = self.mid();
        [Self::new(self.lo, mid), Self::new(mid, self.hi)]
    }

    /// Returns whether `x` is in the interval (bounds included).
    pub fn contains(self, x: Float) -> bool {
        self.lo <= x && x <= self.hi
    }
    /// Returns whether `other` is entirely inside this interval. The empty
    /// interval is inside every interval.
    pub fn contains_interval(self, other: Self) -> bool {
        other.is_empty() || (self.lo <= other.lo && other.hi <= self.hi)
    }
    /// Returns whether the interval contains zero.
    pub fn straddles_zero(self) -> bool {
        self.contains(0.0)
    }

    /// Returns the membership of `x` in the interval. The bounds themselves
    /// are [`Membership::Surface`]; this uses exact comparison.
    pub fn member(self, x: Float) -> Membership {
        if self.is_empty() || x < self.lo || x > self.hi {
            Membership::Air
        } else if x == self.lo || x == self.hi {
            Membership::Surface
        } else {
            Membership::Solid
        }
    }

    /// Returns the interval grown by `amount` on each side.
    #[must_use]
    pub fn expand(self, amount: Float) -> Self {
        if self.is_empty() {
            return self;
        }
        Self::new(self.lo - amount, self.hi + amount)
    }

    /// Returns the interval raised to a non-negative integer power.
    #[must_use]
    pub fn pow(self, n: u32) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        match n {
            0 => Self::point(1.0),
            1 => self,
            _ if n % 2 == 0 => {
                let a = self.abs();
                Self::new(a.lo.powi(n as i32), a.hi.powi(n as i32))
            }
            _ => Self::new(self.lo.powi(n as i32), self.hi.powi(n as i32)),
        }
    }
    /// Returns the absolute value of the interval.
    #[must_use]
    pub fn abs(self) -> Self {
        if self.is_empty() {
            Self::EMPTY
        } else if self.lo >= 0.0 {
            self
        } else if self.hi <= 0.0 {
            -self
        } else {
            Self::new(0.0, self.hi.max(-self.lo))
        }
    }
    /// Returns the range of the signum function (`-1`, `0`, or `1`) over the
    /// interval.
    #[must_use]
    pub fn sign(self) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        let s = |x: Float| {
            if x > 0.0 {
                1.0
            } else if x < 0.0 {
                -1.0
            } else {
                0.0
            }
        };
        Self::new(s(self.lo), s(self.hi))
    }
    /// Returns the pointwise minimum of two intervals.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::EMPTY;
        }
        Self::new(self.lo.min(other.lo), self.hi.min(other.hi))
    }
    /// Returns the pointwise maximum of two intervals.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::EMPTY;
        }
        Self::new(self.lo.max(other.lo), self.hi.max(other.hi))
    }

    /// Returns the range of `sin` over the interval.
    #[must_use]
    pub fn sin(self) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        if self.width() >= TAU || !self.lo.is_finite() || !self.hi.is_finite() {
            return Self::new(-1.0, 1.0);
        }
        let (a, b) = (self.lo.sin(), self.hi.sin());
        let mut ret = Self::spanning(a, b);
        if self.contains_phase(FRAC_PI_2) {
            ret.hi = 1.0;
        }
        if self.contains_phase(-FRAC_PI_2) {
            ret.lo = -1.0;
        }
        ret
    }
    /// Returns the range of `cos` over the interval.
    #[must_use]
    pub fn cos(self) -> Self {
        (self + FRAC_PI_2).sin()
    }
    /// Returns whether the interval contains `phase + 2πk` for some integer
    /// `k`.
    fn contains_phase(self, phase: Float) -> bool {
        let k = ((self.lo - phase) / TAU).ceil();
        phase + k * TAU <= self.hi
    }

    /// Returns the range of `exp` over the interval.
    #[must_use]
    pub fn exp(self) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        Self::new(self.lo.exp(), self.hi.exp())
    }
    /// Returns the range of the natural logarithm over the interval. Values
    /// below zero are clamped to zero, whose logarithm is `-inf`.
    #[must_use]
    pub fn log(self) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        Self::new(self.lo.max(0.0).ln(), self.hi.max(0.0).ln())
    }
    /// Returns the range of the square root over the interval. Values below
    /// zero are clamped to zero.
    #[must_use]
    pub fn sqrt(self) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        Self::new(self.lo.max(0.0).sqrt(), self.hi.max(0.0).sqrt())
    }

    /// Returns the reciprocal of an interval that does not contain zero, or
    /// `None` if it does.
    pub(crate) fn recip_nonzero(self) -> Option<Self> {
        if self.is_empty() || self.contains(0.0) {
            return None;
        }
        Some(Self::new(1.0 / self.hi, 1.0 / self.lo))
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Self) -> Self::Output {
        if self.is_empty() || rhs.is_empty() {
            return Self::EMPTY;
        }
        Self::new(self.lo + rhs.lo, self.hi + rhs.hi)
    }
}
impl Add<Float> for Interval {
    type Output = Interval;

    fn add(self, rhs: Float) -> Self::Output {
        self + Interval::point(rhs)
    }
}
impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}
impl Sub<Float> for Interval {
    type Output = Interval;

    fn sub(self, rhs: Float) -> Self::Output {
        self + -rhs
    }
}
impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Self::Output {
        Self::new(-self.hi, -self.lo)
    }
}
impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.is_empty() || rhs.is_empty() {
            return Self::EMPTY;
        }
        // `0 * inf` must count as zero, not NaN.
        let m = |a: Float, b: Float| if a == 0.0 || b == 0.0 { 0.0 } else { a * b };
        let corners = [
            m(self.lo, rhs.lo),
            m(self.lo, rhs.hi),
            m(self.hi, rhs.lo),
            m(self.hi, rhs.hi),
        ];
        Self::new(
            corners.into_iter().fold(Float::INFINITY, Float::min),
            corners.into_iter().fold(Float::NEG_INFINITY, Float::max),
        )
    }
}
impl Mul<Float> for Interval {
    type Output = Interval;

    fn mul(self, rhs: Float) -> Self::Output {
        self * Interval::point(rhs)
    }
}

/// Intersection.
impl BitAnd for Interval {
    type Output = Interval;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::new(self.lo.max(rhs.lo), self.hi.min(rhs.hi))
    }
}
/// Hull (smallest interval containing both).
impl BitOr for Interval {
    type Output = Interval;

    fn bitor(self, rhs: Self) -> Self::Output {
        if self.is_empty() {
            rhs
        } else if rhs.is_empty() {
            self
        } else {
            Self::new(self.lo.min(rhs.lo), self.hi.max(rhs.hi))
        }
    }
}

impl approx::AbsDiffEq for Interval {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        (self.is_empty() && other.is_empty())
            || (crate::approx_eq_tol(self.lo, other.lo, epsilon)
                && crate::approx_eq_tol(self.hi, other.hi, epsilon))
    }
}
