//! Interval, box, line, and polynomial primitives for implicit solid
//! modelling.
//!
//! Everything in this crate is a plain value. Kernel state (sets, models,
//! caches) lives in `solidcsg`.

pub use tinyset::Fits64;
pub use {approx, log, num_traits as num, smallvec};

/// Floating-point type used for geometry.
pub type Float = f64;

/// Small floating-point value used for comparisons and tiny offsets.
pub const EPSILON: Float = 0.000001;

/// Names for the three axes.
pub const AXIS_NAMES: &str = "XYZ";

/// Asserts that both arguments are approximately equal.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $crate::EPSILON)
    };
    ($a:expr, $b:expr, epsilon = $eps:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $eps)
    };
}

#[macro_use]
mod impl_macros;
#[macro_use]
mod vector;
#[macro_use]
pub mod collections;

pub mod approx_cmp;
pub mod interval;
pub mod interval_box;
pub mod line;
pub mod membership;
pub mod plane;
pub mod polynomial;
pub mod roots;
pub mod sign;
pub mod transform;
pub mod util;

pub use sign::Sign;

/// Structs, traits, and constants.
pub mod prelude {
    pub use crate::approx_cmp::*;
    pub use crate::collections::{GenericVec, IndexNewtype, IndexOutOfRange, IndexOverflow};
    pub use crate::interval::Interval;
    pub use crate::interval_box::IntervalBox;
    pub use crate::line::Line;
    pub use crate::membership::Membership;
    pub use crate::plane::Plane;
    pub use crate::polynomial::Polynomial;
    pub use crate::roots::{RootReport, RootStatus};
    pub use crate::sign::Sign;
    pub use crate::transform::Transform;
    pub use crate::vector::*;
    pub use crate::{AXIS_NAMES, EPSILON, Float, vector};
}
pub use prelude::*;
