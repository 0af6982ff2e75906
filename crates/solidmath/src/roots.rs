//! Real roots of polynomials.
//!
//! Degrees up to four are solved in closed form (quadratic formula,
//! trigonometric/Cardano cubic, Neumark's quartic). Higher degrees use the
//! derivative chain: between adjacent roots of the derivative a polynomial is
//! monotonic, so each such piece holds at most one root, which is bracketed
//! and then refined.

use std::f64::consts::TAU;

use float_ord::FloatOrd;
use smallvec::{SmallVec, smallvec};

use crate::{Float, Interval, Polynomial};

/// List of real roots, sorted in ascending order.
pub type Roots = SmallVec<[Float; 4]>;

/// Whether a root search ran to completion.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RootStatus {
    /// Every root was found.
    #[default]
    Complete,
    /// More roots exist than the configured maximum; the list was truncated.
    TooManyRoots,
    /// Refinement hit the iteration cap; some roots are approximate or
    /// missing.
    NoConvergence,
}
impl RootStatus {
    /// Returns whether every root was found.
    pub fn is_complete(self) -> bool {
        self == RootStatus::Complete
    }
    /// Combines two statuses, keeping the more severe one.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }
}

/// Result of a root search.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RootReport {
    /// Roots in ascending order.
    pub roots: Roots,
    /// Whether the search was complete.
    pub status: RootStatus,
}

/// Limits on iterative root searches.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RootLimits {
    /// Width below which a bracketed root is considered converged, and
    /// distance below which two roots are considered the same.
    pub tolerance: Float,
    /// Maximum number of refinement iterations per root.
    pub max_iterations: usize,
    /// Maximum number of roots to report.
    pub max_roots: usize,
}
impl Default for RootLimits {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            max_iterations: 100,
            max_roots: 32,
        }
    }
}

/// Returns the real roots of `a t² + b t + c`. A double root is reported
/// once.
pub fn solve_quadratic(a: Float, b: Float, c: Float) -> Roots {
    if a == 0.0 {
        if b == 0.0 {
            return smallvec![];
        }
        return smallvec![-c / b];
    }
    let mut disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        // Rounding can push a double root slightly negative.
        if disc < -1e-12 * (b * b).max((4.0 * a * c).abs()) {
            return smallvec![];
        }
        disc = 0.0;
    }
    if disc == 0.0 {
        return smallvec![-b / (2.0 * a)];
    }
    // Numerically stable form avoiding cancellation.
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    let mut roots: Roots = if q == 0.0 {
        smallvec![0.0]
    } else {
        smallvec![q / a, c / q]
    };
    sort_and_dedup(&mut roots, 0.0);
    roots
}

/// Returns the real roots of `a t³ + b t² + c t + d`.
pub fn solve_cubic(a: Float, b: Float, c: Float, d: Float) -> Roots {
    if a == 0.0 {
        return solve_quadratic(b, c, d);
    }
    let (a2, a1, a0) = (b / a, c / a, d / a);
    let third = a2 / 3.0;
    let q = (a2 * a2 - 3.0 * a1) / 9.0;
    let r = (2.0 * a2 * a2 * a2 - 9.0 * a2 * a1 + 27.0 * a0) / 54.0;
    let q3 = q * q * q;
    let r2 = r * r;

    let mut roots: Roots = if q == 0.0 && r == 0.0 {
        smallvec![-third]
    } else if q3 > 0.0 && r2 <= q3 * (1.0 + 1e-12) {
        // Three real roots (possibly repeated).
        let theta = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        let m = -2.0 * q.sqrt();
        smallvec![
            m * (theta / 3.0).cos() - third,
            m * ((theta + TAU) / 3.0).cos() - third,
            m * ((theta - TAU) / 3.0).cos() - third,
        ]
    } else {
        // One real root.
        let big_a = -r.signum() * (r.abs() + (r2 - q3).sqrt()).cbrt();
        let big_b = if big_a == 0.0 { 0.0 } else { q / big_a };
        smallvec![big_a + big_b - third]
    };

    let p = Polynomial::new([d, c, b, a]);
    for root in &mut roots {
        *root = newton_polish(&p, *root);
    }
    sort_and_dedup(&mut roots, 1e-9);
    roots
}

/// Returns the real roots of `a t⁴ + b t³ + c t² + d t + e` using Neumark's
/// factorization into two quadratics.
pub fn solve_quartic(a: Float, b: Float, c: Float, d: Float, e: Float) -> Roots {
    if a == 0.0 {
        return solve_cubic(b, c, d, e);
    }
    let p = Polynomial::new([e, d, c, b, a]);
    let (a, b, c, d) = (b / a, c / a, d / a, e / a);

    // Resolvent cubic.
    let mut resolvent = solve_cubic(
        1.0,
        -2.0 * b,
        b * b + a * c - 4.0 * d,
        a * a * d - a * b * c + c * c,
    );
    resolvent.reverse();

    for y in resolvent {
        let scale = 1.0 + a.abs() + b.abs() + c.abs() + d.abs() + y.abs();
        let tol = 1e-10 * scale * scale;
        let g_disc = a * a - 4.0 * y;
        let h_disc = (b - y) * (b - y) - 4.0 * d;
        if g_disc < -tol || h_disc < -tol {
            continue;
        }
        let g1 = a / 2.0;
        let h1 = (b - y) / 2.0;
        let g2 = g_disc.max(0.0).sqrt() / 2.0;
        let mut h2 = h_disc.max(0.0).sqrt() / 2.0;
        if a * (b - y) - 2.0 * c < 0.0 {
            h2 = -h2;
        }
        let (big_g, small_g) = (g1 + g2, g1 - g2);
        let (big_h, small_h) = (h1 + h2, h1 - h2);

        let mut roots = solve_quadratic(1.0, big_g, big_h);
        roots.extend(solve_quadratic(1.0, small_g, small_h));
        for root in &mut roots {
            *root = newton_polish(&p, *root);
        }
        sort_and_dedup(&mut roots, 1e-9);
        return roots;
    }

    // No usable resolvent root; fall back to the iterative solver.
    solve_by_derivative_chain(&p, Interval::EVERYTHING, RootLimits::default()).roots
}

/// Returns the real roots of a polynomial of any degree.
pub fn solve_polynomial(p: &Polynomial, limits: RootLimits) -> RootReport {
    solve_polynomial_in(p, Interval::EVERYTHING, limits)
}

/// Returns the real roots of a polynomial within `range`.
pub fn solve_polynomial_in(p: &Polynomial, range: Interval, limits: RootLimits) -> RootReport {
    if range.is_empty() {
        return RootReport::default();
    }
    let p = p.trimmed(1e-14);
    let c = |i| p.coefficient(i);
    let mut report = match p.degree() {
        0 => RootReport::default(),
        1 => closed_form(solve_quadratic(0.0, c(1), c(0))),
        2 => closed_form(solve_quadratic(c(2), c(1), c(0))),
        3 => closed_form(solve_cubic(c(3), c(2), c(1), c(0))),
        4 => closed_form(solve_quartic(c(4), c(3), c(2), c(1), c(0))),
        _ => solve_by_derivative_chain(&p, range, limits),
    };
    report.roots.retain(|t| range.contains(*t));
    if report.roots.len() > limits.max_roots {
        report.roots.truncate(limits.max_roots);
        report.status = report.status.combine(RootStatus::TooManyRoots);
    }
    report
}

fn closed_form(roots: Roots) -> RootReport {
    RootReport {
        roots,
        status: RootStatus::Complete,
    }
}

/// Returns a bound on the magnitude of every root of `p` (Cauchy's bound).
pub fn root_bound(p: &Polynomial) -> Float {
    let lead = p.coefficient(p.degree());
    if lead == 0.0 {
        return 0.0;
    }
    let max_ratio = p.coefficients()[..p.degree()]
        .iter()
        .fold(0.0, |m: Float, c| m.max((c / lead).abs()));
    1.0 + max_ratio
}

/// Finds roots by solving the derivative, then refining one root in each
/// monotonic piece between adjacent critical points.
fn solve_by_derivative_chain(p: &Polynomial, range: Interval, limits: RootLimits) -> RootReport {
    let bound = root_bound(p);
    let range = range & Interval::new(-bound, bound);
    if range.is_empty() {
        return RootReport::default();
    }

    let derivative = p.derivative();
    let critical = if derivative.degree() <= 4 {
        solve_polynomial_in(&derivative, range, limits)
    } else {
        solve_by_derivative_chain(&derivative, range, limits)
    };
    let mut status = critical.status;

    let mut breakpoints: SmallVec<[Float; 8]> = smallvec![range.lo];
    breakpoints.extend(critical.roots.iter().copied().filter(|t| range.contains(*t)));
    breakpoints.push(range.hi);

    let mut roots = Roots::new();
    for (&lo, &hi) in breakpoints.iter().zip(&breakpoints[1..]) {
        let (f_lo, f_hi) = (p.eval(lo), p.eval(hi));
        let root = if f_lo == 0.0 {
            Some(lo)
        } else if f_hi == 0.0 {
            Some(hi)
        } else if f_lo.signum() != f_hi.signum() {
            let (root, converged) = refine_bracket(|t| p.eval(t), lo, hi, limits);
            if !converged {
                status = status.combine(RootStatus::NoConvergence);
            }
            Some(root)
        } else {
            None
        };
        roots.extend(root);
        if roots.len() > limits.max_roots {
            status = status.combine(RootStatus::TooManyRoots);
            break;
        }
    }

    sort_and_dedup(&mut roots, limits.tolerance);
    roots.truncate(limits.max_roots);
    RootReport { roots, status }
}

/// Refines a root of `f` bracketed by `lo` and `hi`, where `f(lo)` and
/// `f(hi)` have opposite signs, alternating bisection and false position.
///
/// Returns the best estimate and whether it converged within the tolerance.
pub fn refine_bracket(
    f: impl Fn(Float) -> Float,
    mut lo: Float,
    mut hi: Float,
    limits: RootLimits,
) -> (Float, bool) {
    let mut f_lo = f(lo);
    let mut f_hi = f(hi);
    for i in 0..limits.max_iterations {
        if hi - lo <= limits.tolerance {
            return ((lo + hi) * 0.5, true);
        }
        let mid = if i % 2 == 0 || f_hi == f_lo {
            (lo + hi) * 0.5
        } else {
            let t = lo - f_lo * (hi - lo) / (f_hi - f_lo);
            // Keep false position strictly inside the bracket.
            if t > lo && t < hi { t } else { (lo + hi) * 0.5 }
        };
        let f_mid = f(mid);
        if f_mid == 0.0 {
            return (mid, true);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
            f_hi = f_mid;
        }
    }
    ((lo + hi) * 0.5, hi - lo <= limits.tolerance)
}

/// Improves a root estimate with a few Newton steps, keeping the estimate
/// whenever a step would make it worse.
fn newton_polish(p: &Polynomial, mut t: Float) -> Float {
    let dp = p.derivative();
    let mut value = p.eval(t);
    for _ in 0..4 {
        let slope = dp.eval(t);
        if value == 0.0 || slope == 0.0 {
            break;
        }
        let next = t - value / slope;
        let next_value = p.eval(next);
        if !next.is_finite() || next_value.abs() >= value.abs() {
            break;
        }
        t = next;
        value = next_value;
    }
    t
}

/// Sorts roots in ascending order, dropping non-finite values and merging
/// roots closer than `tolerance`.
pub fn sort_and_dedup(roots: &mut Roots, tolerance: Float) {
    roots.retain(|t| t.is_finite());
    roots.sort_by_key(|&t| FloatOrd(t));
    roots.dedup_by(|a, b| crate::approx_eq_tol(*a, *b, tolerance));
}
