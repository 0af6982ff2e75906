//! Simple `Sign` type.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Mul, MulAssign, Neg};

use num_traits::Signed;

/// Positive or negative.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sign {
    /// Positive
    #[default]
    Pos = 0,
    /// Negative
    Neg = 1,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Pos => write!(f, "+"),
            Sign::Neg => write!(f, "-"),
        }
    }
}

impl Neg for Sign {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }
}

impl<T: Signed> From<T> for Sign {
    fn from(value: T) -> Self {
        match value.signum().is_negative() {
            true => Sign::Neg,
            false => Sign::Pos,
        }
    }
}

impl PartialOrd for Sign {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Sign {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_num::<i8>().cmp(&other.to_num::<i8>())
    }
}

impl Sign {
    /// Returns `1` or `-1`.
    pub fn to_num<T: Signed>(self) -> T {
        match self {
            Sign::Pos => T::one(),
            Sign::Neg => -T::one(),
        }
    }
    /// Returns whether the sign is negative.
    pub fn is_neg(self) -> bool {
        self == Sign::Neg
    }
}

/// Implements `Mul<Sign>` for a type that implements `Neg<Output = Self>`.
#[macro_export]
macro_rules! impl_mul_sign {
    (impl $($tok:tt)*) => {
        impl $($tok)* {
            type Output = Self;

            fn mul(self, rhs: $crate::Sign) -> Self {
                match rhs {
                    $crate::Sign::Pos => self,
                    $crate::Sign::Neg => -self,
                }
            }
        }
    };
}
/// Implements `MulAssign<Sign>` for a type. See [`impl_mul_sign`].
#[macro_export]
macro_rules! impl_mulassign_sign {
    (impl $($tok:tt)*) => {
        impl $($tok)* {
            fn mul_assign(&mut self, rhs: $crate::Sign) {
                match rhs {
                    $crate::Sign::Pos => (),
                    $crate::Sign::Neg => *self = -self.clone(),
                }
            }
        }
    };
}

impl_mul_sign!(impl Mul<Sign> for Sign);
impl_mulassign_sign!(impl MulAssign<Sign> for Sign);

impl_mul_sign!(impl Mul<Sign> for f64);
impl_mulassign_sign!(impl MulAssign<Sign> for f64);
