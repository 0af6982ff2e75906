//! Polynomials in one variable.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use itertools::Itertools;
use smallvec::SmallVec;

use crate::Float;

/// Polynomial with real coefficients, stored lowest degree first.
///
/// Trailing zero coefficients are never stored, so the zero polynomial has no
/// coefficients.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: SmallVec<[Float; 6]>,
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let terms = self
            .coefficients
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| **c != 0.0)
            .map(|(i, c)| match i {
                0 => format!("{c}"),
                1 => format!("{c}t"),
                _ => format!("{c}t^{i}"),
            })
            .join(" + ");
        write!(f, "{terms}")
    }
}

impl Polynomial {
    /// Zero polynomial.
    pub const ZERO: Self = Self {
        coefficients: SmallVec::new_const(),
    };

    /// Constructs a polynomial from its coefficients, lowest degree first.
    pub fn new(coefficients: impl IntoIterator<Item = Float>) -> Self {
        let mut ret = Self {
            coefficients: coefficients.into_iter().collect(),
        };
        ret.trim_exact();
        ret
    }
    /// Constructs a constant polynomial.
    pub fn constant(c: Float) -> Self {
        Self::new([c])
    }
    /// Constructs the polynomial `c0 + c1 * t`.
    pub fn linear(c0: Float, c1: Float) -> Self {
        Self::new([c0, c1])
    }

    fn trim_exact(&mut self) {
        while self.coefficients.last() == Some(&0.0) {
            self.coefficients.pop();
        }
    }

    /// Returns the coefficients, lowest degree first.
    pub fn coefficients(&self) -> &[Float] {
        &self.coefficients
    }
    /// Returns the coefficient of `t^i`.
    pub fn coefficient(&self, i: usize) -> Float {
        self.coefficients.get(i).copied().unwrap_or(0.0)
    }
    /// Returns whether this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }
    /// Returns the degree of the polynomial. The zero polynomial has degree
    /// zero.
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Returns a copy with leading coefficients dropped while they are
    /// negligible relative to the largest coefficient.
    #[must_use]
    pub fn trimmed(&self, relative_tolerance: Float) -> Self {
        let scale = self.coefficients.iter().fold(0.0, |m: Float, c| m.max(c.abs()));
        let mut ret = self.clone();
        while ret
            .coefficients
            .last()
            .is_some_and(|c| c.abs() <= relative_tolerance * scale)
        {
            ret.coefficients.pop();
        }
        ret
    }

    /// Evaluates the polynomial at `t`.
    pub fn eval(&self, t: Float) -> Float {
        self.coefficients.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }
    /// Returns the derivative of the polynomial.
    #[must_use]
    pub fn derivative(&self) -> Self {
        Self::new(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, &c)| c * i as Float),
        )
    }
    /// Returns the polynomial raised to a non-negative integer power.
    #[must_use]
    pub fn pow(&self, n: u32) -> Self {
        let mut ret = Self::constant(1.0);
        let mut base = self.clone();
        let mut n = n;
        while n > 0 {
            if n & 1 == 1 {
                ret = &ret * &base;
            }
            base = &base * &base;
            n >>= 1;
        }
        ret
    }
}

impl<'a> Add for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Self) -> Self::Output {
        let len = self.coefficients.len().max(rhs.coefficients.len());
        Polynomial::new((0..len).map(|i| self.coefficient(i) + rhs.coefficient(i)))
    }
}
impl<'a> Sub for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Self) -> Self::Output {
        self + &-rhs
    }
}
impl<'a> Mul for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::ZERO;
        }
        let mut coefficients = smallvec::smallvec![0.0; self.coefficients.len() + rhs.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in rhs.coefficients.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        let mut ret = Polynomial { coefficients };
        ret.trim_exact();
        ret
    }
}
impl_forward_bin_ops_to_ref! {
    impl Add for Polynomial { fn add() }
    impl Sub for Polynomial { fn sub() }
    impl Mul for Polynomial { fn mul() }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Self::Output {
        Polynomial::new(self.coefficients.iter().map(|c| -c))
    }
}
impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Self::Output {
        -&self
    }
}
impl Mul<Float> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Float) -> Self::Output {
        Polynomial::new(self.coefficients.iter().map(|c| c * rhs))
    }
}
impl Mul<Float> for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Float) -> Self::Output {
        &self * rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polynomial_arithmetic() {
        let a = Polynomial::linear(-1.0, 1.0); // t - 1
        let b = Polynomial::linear(1.0, 1.0); // t + 1
        assert_eq!(&a * &b, Polynomial::new([-1.0, 0.0, 1.0]));
        assert_eq!(a.clone() + b.clone(), Polynomial::linear(0.0, 2.0));
        assert_eq!(a.clone() - a.clone(), Polynomial::ZERO);
        assert_eq!(a.pow(3), Polynomial::new([-1.0, 3.0, -3.0, 1.0]));
        assert_eq!(a.pow(0), Polynomial::constant(1.0));
    }

    #[test]
    fn test_polynomial_eval_and_derivative() {
        let p = Polynomial::new([9.0, 0.0, -10.0, 0.0, 1.0]);
        assert_eq!(p.eval(1.0), 0.0);
        assert_eq!(p.eval(3.0), 0.0);
        assert_eq!(p.degree(), 4);
        assert_eq!(p.derivative(), Polynomial::new([0.0, -20.0, 0.0, 4.0]));
        assert_eq!(Polynomial::constant(5.0).derivative(), Polynomial::ZERO);
    }

    #[test]
    fn test_polynomial_trim() {
        let p = Polynomial::new([1.0, 2.0, 1e-15]);
        assert_eq!(p.degree(), 2);
        assert_eq!(p.trimmed(1e-12).degree(), 1);
    }
}
