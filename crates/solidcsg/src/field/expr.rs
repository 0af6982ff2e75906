use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use smallvec::{SmallVec, smallvec};
use solidmath::prelude::*;

use super::{Field, PrimitiveField};
use crate::Same;

/// Non-polynomial unary function in an [`Expr`].
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Abs,
    Sign,
    Sqrt,
    Sin,
    Cos,
    Exp,
    Log,
}
impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnaryOp::Abs => "abs",
            UnaryOp::Sign => "sign",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
        };
        write!(f, "{name}")
    }
}
impl UnaryOp {
    fn eval(self, x: Float) -> Float {
        match self {
            UnaryOp::Abs => x.abs(),
            UnaryOp::Sign => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            // Clamp to the domain the same way the interval versions do.
            UnaryOp::Sqrt => x.max(0.0).sqrt(),
            UnaryOp::Sin => x.sin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Exp => x.exp(),
            UnaryOp::Log => x.max(0.0).ln(),
        }
    }
    fn eval_interval(self, x: Interval) -> Interval {
        match self {
            UnaryOp::Abs => x.abs(),
            UnaryOp::Sign => x.sign(),
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Sin => x.sin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Exp => x.exp(),
            UnaryOp::Log => x.log(),
        }
    }
    /// Returns the derivative of the function at `x`.
    fn derivative(self, x: Float) -> Float {
        match self {
            UnaryOp::Abs => UnaryOp::Sign.eval(x),
            UnaryOp::Sign => 0.0,
            UnaryOp::Sqrt if x > 0.0 => 0.5 / x.sqrt(),
            UnaryOp::Sqrt => 0.0,
            UnaryOp::Sin => x.cos(),
            UnaryOp::Cos => -x.sin(),
            UnaryOp::Exp => x.exp(),
            UnaryOp::Log if x > 0.0 => 1.0 / x,
            UnaryOp::Log => 0.0,
        }
    }
}

/// Operator at the root of an [`Expr`].
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Const,
    Plane,
    Neg,
    Add,
    Sub,
    Mul,
    Pow(u32),
    Unary(UnaryOp),
}

/// Symbolic scalar field built from constants and planes.
///
/// Every spatial dependence goes through a [`Plane`] leaf, so transforms are
/// applied exactly by mapping the planes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant value.
    Const(Float),
    /// Value of a plane's field.
    Plane(Plane),
    /// Negation.
    Neg(Arc<Expr>),
    /// Sum.
    Add(Arc<Expr>, Arc<Expr>),
    /// Difference.
    Sub(Arc<Expr>, Arc<Expr>),
    /// Product.
    Mul(Arc<Expr>, Arc<Expr>),
    /// Non-negative integer power.
    Pow(Arc<Expr>, u32),
    /// Non-polynomial function.
    Unary(UnaryOp, Arc<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(c) => write!(f, "{c}"),
            Expr::Plane(p) => write!(f, "{p}"),
            Expr::Neg(a) => write!(f, "-{a}"),
            Expr::Add(a, b) => write!(f, "({a} + {b})"),
            Expr::Sub(a, b) => write!(f, "({a} - {b})"),
            Expr::Mul(a, b) => write!(f, "({a} * {b})"),
            Expr::Pow(a, n) => write!(f, "{a}^{n}"),
            Expr::Unary(op, a) => write!(f, "{op}({a})"),
        }
    }
}

impl Expr {
    /// Constructs a constant.
    pub fn constant(c: Float) -> Self {
        Expr::Const(c)
    }
    /// Constructs the field of a plane.
    pub fn plane(plane: Plane) -> Self {
        Expr::Plane(plane)
    }
    /// Constructs the field equal to one coordinate.
    pub fn coordinate(axis: Axis) -> Self {
        Expr::Plane(Plane::from_raw(Vector::unit(axis), 0.0))
    }

    /// Returns the expression raised to a non-negative integer power.
    #[must_use]
    pub fn pow(self, n: u32) -> Self {
        Expr::Pow(Arc::new(self), n)
    }
    /// Applies a non-polynomial function.
    #[must_use]
    pub fn apply(self, op: UnaryOp) -> Self {
        Expr::Unary(op, Arc::new(self))
    }
    /// Returns the absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        self.apply(UnaryOp::Abs)
    }
    /// Returns the sign (`-1`, `0`, or `1`).
    #[must_use]
    pub fn sign(self) -> Self {
        self.apply(UnaryOp::Sign)
    }
    /// Returns the square root.
    #[must_use]
    pub fn sqrt(self) -> Self {
        self.apply(UnaryOp::Sqrt)
    }
    /// Returns the sine.
    #[must_use]
    pub fn sin(self) -> Self {
        self.apply(UnaryOp::Sin)
    }
    /// Returns the cosine.
    #[must_use]
    pub fn cos(self) -> Self {
        self.apply(UnaryOp::Cos)
    }
    /// Returns the exponential.
    #[must_use]
    pub fn exp(self) -> Self {
        self.apply(UnaryOp::Exp)
    }
    /// Returns the natural logarithm.
    #[must_use]
    pub fn log(self) -> Self {
        self.apply(UnaryOp::Log)
    }

    /// Returns the operator at the root of the expression.
    pub fn operator(&self) -> Operator {
        match self {
            Expr::Const(_) => Operator::Const,
            Expr::Plane(_) => Operator::Plane,
            Expr::Neg(_) => Operator::Neg,
            Expr::Add(_, _) => Operator::Add,
            Expr::Sub(_, _) => Operator::Sub,
            Expr::Mul(_, _) => Operator::Mul,
            Expr::Pow(_, n) => Operator::Pow(*n),
            Expr::Unary(op, _) => Operator::Unary(*op),
        }
    }
    /// Returns the operands of the root operator.
    pub fn operands(&self) -> SmallVec<[&Expr; 2]> {
        match self {
            Expr::Const(_) | Expr::Plane(_) => smallvec![],
            Expr::Neg(a) | Expr::Pow(a, _) | Expr::Unary(_, a) => smallvec![&**a],
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) => smallvec![&**a, &**b],
        }
    }

    /// Returns the value at a point.
    pub fn eval(&self, p: Point) -> Float {
        match self {
            Expr::Const(c) => *c,
            Expr::Plane(plane) => plane.value(p),
            Expr::Neg(a) => -a.eval(p),
            Expr::Add(a, b) => a.eval(p) + b.eval(p),
            Expr::Sub(a, b) => a.eval(p) - b.eval(p),
            Expr::Mul(a, b) => a.eval(p) * b.eval(p),
            Expr::Pow(a, n) => a.eval(p).powi(*n as i32),
            Expr::Unary(op, a) => op.eval(a.eval(p)),
        }
    }
    /// Returns the gradient at a point.
    pub fn eval_gradient(&self, p: Point) -> Vector {
        match self {
            Expr::Const(_) => Vector::ZERO,
            Expr::Plane(plane) => plane.normal,
            Expr::Neg(a) => -a.eval_gradient(p),
            Expr::Add(a, b) => a.eval_gradient(p) + b.eval_gradient(p),
            Expr::Sub(a, b) => a.eval_gradient(p) - b.eval_gradient(p),
            Expr::Mul(a, b) => a.eval_gradient(p) * b.eval(p) + b.eval_gradient(p) * a.eval(p),
            Expr::Pow(_, 0) => Vector::ZERO,
            Expr::Pow(a, n) => a.eval_gradient(p) * (*n as Float * a.eval(p).powi(*n as i32 - 1)),
            Expr::Unary(op, a) => a.eval_gradient(p) * op.derivative(a.eval(p)),
        }
    }
    /// Returns the range over a box.
    pub fn eval_range(&self, b: &IntervalBox) -> Interval {
        match self {
            Expr::Const(c) => Interval::point(*c),
            Expr::Plane(plane) => plane.range(b),
            Expr::Neg(a) => -a.eval_range(b),
            Expr::Add(a, c) => a.eval_range(b) + c.eval_range(b),
            Expr::Sub(a, c) => a.eval_range(b) - c.eval_range(b),
            Expr::Mul(a, c) => a.eval_range(b) * c.eval_range(b),
            Expr::Pow(a, n) => a.eval_range(b).pow(*n),
            Expr::Unary(op, a) => op.eval_interval(a.eval_range(b)),
        }
    }
    /// Returns the polynomial degree in the coordinates, or `None` if the
    /// expression is not polynomial.
    pub fn polynomial_degree(&self) -> Option<u32> {
        match self {
            Expr::Const(_) => Some(0),
            Expr::Plane(plane) if plane.normal == Vector::ZERO => Some(0),
            Expr::Plane(_) => Some(1),
            Expr::Neg(a) => a.polynomial_degree(),
            Expr::Add(a, b) | Expr::Sub(a, b) => {
                Some(a.polynomial_degree()?.max(b.polynomial_degree()?))
            }
            Expr::Mul(a, b) => Some(a.polynomial_degree()? + b.polynomial_degree()?),
            Expr::Pow(a, n) => Some(a.polynomial_degree()? * n),
            Expr::Unary(_, _) => None,
        }
    }
    /// Returns the expression along a line as a polynomial in the line
    /// parameter, or `None` if the expression is not polynomial.
    pub fn restrict(&self, line: &Line) -> Option<Polynomial> {
        Some(match self {
            Expr::Const(c) => Polynomial::constant(*c),
            Expr::Plane(plane) => {
                let [c0, c1] = plane.restrict_to_line(line);
                Polynomial::linear(c0, c1)
            }
            Expr::Neg(a) => -a.restrict(line)?,
            Expr::Add(a, b) => a.restrict(line)? + b.restrict(line)?,
            Expr::Sub(a, b) => a.restrict(line)? - b.restrict(line)?,
            Expr::Mul(a, b) => a.restrict(line)? * b.restrict(line)?,
            Expr::Pow(a, n) => a.restrict(line)?.pow(*n),
            Expr::Unary(_, _) => return None,
        })
    }
    /// Returns the expression moved by a transform.
    #[must_use]
    pub fn transform(&self, t: &Transform) -> Self {
        let f = |a: &Arc<Expr>| Arc::new(a.transform(t));
        match self {
            Expr::Const(c) => Expr::Const(*c),
            Expr::Plane(plane) => Expr::Plane(t.apply_plane(plane)),
            Expr::Neg(a) => Expr::Neg(f(a)),
            Expr::Add(a, b) => Expr::Add(f(a), f(b)),
            Expr::Sub(a, b) => Expr::Sub(f(a), f(b)),
            Expr::Mul(a, b) => Expr::Mul(f(a), f(b)),
            Expr::Pow(a, n) => Expr::Pow(f(a), *n),
            Expr::Unary(op, a) => Expr::Unary(*op, f(a)),
        }
    }

    /// Returns the negation, folding it into constants, planes, and existing
    /// negations.
    #[must_use]
    pub fn negated(&self) -> Self {
        match self {
            Expr::Const(c) => Expr::Const(-c),
            Expr::Plane(plane) => Expr::Plane(-*plane),
            Expr::Neg(a) => (**a).clone(),
            other => Expr::Neg(Arc::new(other.clone())),
        }
    }

    /// Returns whether two expressions have the same structure and all their
    /// coefficients agree to within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: Float) -> bool {
        use solidmath::approx::AbsDiffEq;

        match (self, other) {
            (Expr::Const(a), Expr::Const(b)) => approx_eq_tol(*a, *b, tolerance),
            (Expr::Plane(a), Expr::Plane(b)) => a.abs_diff_eq(b, tolerance),
            (Expr::Neg(a), Expr::Neg(b)) => a.approx_eq(b, tolerance),
            (Expr::Add(a1, a2), Expr::Add(b1, b2))
            | (Expr::Sub(a1, a2), Expr::Sub(b1, b2))
            | (Expr::Mul(a1, a2), Expr::Mul(b1, b2)) => {
                a1.approx_eq(b1, tolerance) && a2.approx_eq(b2, tolerance)
            }
            (Expr::Pow(a, m), Expr::Pow(b, n)) => m == n && a.approx_eq(b, tolerance),
            (Expr::Unary(op1, a), Expr::Unary(op2, b)) => op1 == op2 && a.approx_eq(b, tolerance),
            _ => false,
        }
    }

    /// Compares two expressions up to a tolerance on their coefficients.
    ///
    /// [`Same::AbsOf`] means `self` is the absolute value of `other` (or of
    /// its negation).
    pub fn same(&self, other: &Self, tolerance: Float) -> Same {
        if self.approx_eq(other, tolerance) {
            Same::Identical
        } else if self.approx_eq(&other.negated(), tolerance)
            || self.negated().approx_eq(other, tolerance)
        {
            Same::Complement
        } else if let Expr::Unary(UnaryOp::Abs, inner) = self
            && (inner.approx_eq(other, tolerance) || inner.approx_eq(&other.negated(), tolerance))
        {
            Same::AbsOf
        } else {
            Same::Different
        }
    }
}

impl PrimitiveField for Expr {
    fn value(&self, p: Point) -> Float {
        self.eval(p)
    }
    fn gradient(&self, p: Point) -> Vector {
        self.eval_gradient(p)
    }
    fn range(&self, b: &IntervalBox) -> Interval {
        self.eval_range(b)
    }
    fn degree(&self) -> Option<u32> {
        self.polynomial_degree()
    }
    fn restrict_to_line(&self, line: &Line) -> Option<Polynomial> {
        self.restrict(line)
    }
    fn transformed(&self, t: &Transform) -> Field {
        Field::new(self.transform(t))
    }
    fn as_expr(&self) -> Option<&Expr> {
        Some(self)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        Expr::Neg(Arc::new(self))
    }
}
impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(Arc::new(self), Arc::new(rhs))
    }
}
impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(Arc::new(self), Arc::new(rhs))
    }
}
impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(Arc::new(self), Arc::new(rhs))
    }
}
impl Add<Float> for Expr {
    type Output = Expr;

    fn add(self, rhs: Float) -> Self::Output {
        self + Expr::Const(rhs)
    }
}
impl Sub<Float> for Expr {
    type Output = Expr;

    fn sub(self, rhs: Float) -> Self::Output {
        self - Expr::Const(rhs)
    }
}
impl Mul<Float> for Expr {
    type Output = Expr;

    fn mul(self, rhs: Float) -> Self::Output {
        Expr::Const(rhs) * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_expr() -> Expr {
        // x² + yz - 3
        Expr::coordinate(Axis::X).pow(2) + Expr::coordinate(Axis::Y) * Expr::coordinate(Axis::Z)
            - 3.0
    }

    #[test]
    fn test_eval_and_gradient() {
        let e = sample_expr();
        let p = vector![1.0, 2.0, 3.0];
        assert_eq!(e.eval(p), 4.0);
        assert_eq!(e.eval_gradient(p), vector![2.0, 3.0, 2.0]);
        assert_eq!(e.polynomial_degree(), Some(2));

        let s = Expr::coordinate(Axis::X).sin();
        assert_eq!(s.polynomial_degree(), None);
        solidmath::assert_approx_eq!(s.eval_gradient(Vector::ZERO), Vector::X);
    }

    #[test]
    fn test_range_is_conservative() {
        let e = sample_expr();
        let b = IntervalBox::cube(Vector::ZERO, 1.0);
        let r = e.eval_range(&b);
        for p in b.corners() {
            assert!(r.contains(e.eval(p)));
        }
        assert!(r.contains(e.eval(Vector::ZERO)));
    }

    #[test]
    fn test_restrict_to_line() {
        let e = sample_expr();
        let line = Line::new(vector![1.0, 0.0, 0.0], vector![1.0, 1.0, 1.0]);
        let p = e.restrict(&line).unwrap();
        for t in [-2.0, 0.0, 0.5, 3.0] {
            solidmath::assert_approx_eq!(p.eval(t), e.eval(line.point_at(t)));
        }
        assert!(Expr::coordinate(Axis::X).abs().restrict(&line).is_none());
    }

    #[test]
    fn test_same() {
        let tol = 1e-6;
        let plane = Expr::plane(Plane::new(vector![1.0, 2.0, 0.0], 1.0));
        let nearly = Expr::plane(Plane::new(vector![1.0, 2.0 + 1e-9, 0.0], 1.0));
        assert_eq!(plane.same(&nearly, tol), Same::Identical);
        assert_eq!(plane.same(&plane.negated(), tol), Same::Complement);
        assert_eq!(plane.negated().same(&plane, tol), Same::Complement);
        let e = sample_expr();
        assert_eq!(e.same(&-e.clone(), tol), Same::Complement);
        assert_eq!((-e.clone()).same(&e, tol), Same::Complement);
        assert_eq!(e.clone().abs().same(&e, tol), Same::AbsOf);
        assert_eq!(e.clone().abs().same(&-e.clone(), tol), Same::AbsOf);
        assert_eq!(e.same(&plane, tol), Same::Different);
    }
}
