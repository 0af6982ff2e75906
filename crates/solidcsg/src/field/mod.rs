//! Implicit scalar fields used as CSG primitives.
//!
//! A field is negative inside solid, positive in air, and zero on the
//! surface. The kernel only talks to fields through [`PrimitiveField`];
//! [`Expr`] is the built-in implementation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use solidmath::prelude::*;

mod expr;
mod shapes;

pub use expr::{Expr, Operator, UnaryOp};

use crate::Same;

/// Algebraic classification of a field, used to pick a root-finding
/// strategy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Constant everywhere.
    Constant,
    /// Linear in the coordinates (a plane, possibly unnormalized).
    Planar,
    /// Polynomial in the coordinates.
    Polynomial,
    /// Anything else.
    General,
}
impl FieldKind {
    /// Returns the kind of a field with the given polynomial degree, or
    /// `None` if it is not polynomial.
    pub fn from_degree(degree: Option<u32>) -> Self {
        match degree {
            Some(0) => FieldKind::Constant,
            Some(1) => FieldKind::Planar,
            Some(_) => FieldKind::Polynomial,
            None => FieldKind::General,
        }
    }
    /// Returns whether the field is a polynomial of any degree.
    pub fn is_polynomial(self) -> bool {
        self != FieldKind::General
    }
}

/// Scalar implicit function of a point.
pub trait PrimitiveField: fmt::Debug + fmt::Display + Send + Sync {
    /// Returns the value of the field at a point.
    fn value(&self, p: Point) -> Float;
    /// Returns the gradient of the field at a point.
    ///
    /// The default implementation uses central differences.
    fn gradient(&self, p: Point) -> Vector {
        let h = 1e-6;
        Vector(std::array::from_fn(|i| {
            let mut offset = Vector::ZERO;
            offset[i] = h;
            (self.value(p + offset) - self.value(p - offset)) / (2.0 * h)
        }))
    }
    /// Returns an interval containing every value of the field over a box.
    fn range(&self, b: &IntervalBox) -> Interval;
    /// Returns the polynomial degree of the field, or `None` if it is not a
    /// polynomial in the coordinates.
    fn degree(&self) -> Option<u32>;
    /// Returns the algebraic classification of the field.
    fn kind(&self) -> FieldKind {
        FieldKind::from_degree(self.degree())
    }
    /// Returns the field along a line as a polynomial in the line parameter,
    /// or `None` if the field is not polynomial.
    fn restrict_to_line(&self, _line: &Line) -> Option<Polynomial> {
        None
    }
    /// Returns the field moved by a transform.
    fn transformed(&self, t: &Transform) -> Field;
    /// Returns the symbolic form of the field, if it has one. Fields with a
    /// symbolic form can be compared by [`Field::same()`].
    fn as_expr(&self) -> Option<&Expr> {
        None
    }
}

/// Shared handle to a [`PrimitiveField`].
///
/// Equality and hashing use object identity: two handles are equal only if
/// they point to the same field. Use [`Field::same()`] for a tolerance-based
/// comparison.
#[derive(Clone)]
pub struct Field(Arc<dyn PrimitiveField>);

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}
impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
impl Eq for Field {}
impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}
impl Deref for Field {
    type Target = dyn PrimitiveField;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
impl From<Expr> for Field {
    fn from(value: Expr) -> Self {
        Field::new(value)
    }
}

impl Field {
    /// Wraps a field in a new shared handle.
    pub fn new(field: impl PrimitiveField + 'static) -> Self {
        Self(Arc::new(field))
    }
    /// Returns whether two handles point to the same field.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// Compares two fields up to a tolerance on their coefficients.
    ///
    /// Fields without a symbolic form are only ever [`Same::Identical`] to
    /// themselves.
    pub fn same(&self, other: &Self, tolerance: Float) -> Same {
        if self.ptr_eq(other) {
            return Same::Identical;
        }
        match (self.as_expr(), other.as_expr()) {
            (Some(a), Some(b)) => a.same(b, tolerance),
            _ => Same::Different,
        }
    }
}
