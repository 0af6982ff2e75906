use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;
use solidmath::prelude::*;
use solidmath::roots::{self, RootLimits, Roots};
use solidmath::util::linear_zero;

use super::SortedIntervalList;
use crate::field::PrimitiveField;
use crate::{Field, Set, SetData, SetOp, SetSpace};

/// Finds the roots of a primitive along a ray.
///
/// Primitives that reduce to a polynomial in the ray parameter are solved
/// directly. Anything else is isolated by interval bisection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RootFinder {
    /// Limits on the search.
    pub limits: RootLimits,
}
impl RootFinder {
    /// Constructs a root finder with the given limits.
    pub fn new(limits: RootLimits) -> Self {
        Self { limits }
    }

    /// Returns the sorted roots of `field` along `line` within `interval`.
    pub fn find(&self, field: &dyn PrimitiveField, line: &Line, interval: Interval) -> RootReport {
        if interval.is_empty() {
            return RootReport::default();
        }
        match field.restrict_to_line(line) {
            Some(poly) => roots::solve_polynomial_in(&poly, interval, self.limits),
            None => self.find_by_bisection(field, line, interval),
        }
    }

    /// Returns the roots of `field` along `line` within `interval` by
    /// subdividing the interval wherever the field's range over the
    /// corresponding segment contains zero, then interpolating linearly
    /// between the endpoint values once a piece is narrower than the
    /// tolerance.
    ///
    /// Tangent roots, where the field touches zero without changing sign, are
    /// not reported.
    pub fn find_by_bisection(
        &self,
        field: &dyn PrimitiveField,
        line: &Line,
        interval: Interval,
    ) -> RootReport {
        let RootLimits {
            tolerance,
            max_iterations,
            max_roots,
        } = self.limits;
        let budget = max_iterations.saturating_mul(max_roots.max(1));
        let f = |t: Float| field.value(line.point_at(t));

        let mut report = RootReport::default();
        let mut stack: SmallVec<[Interval; 32]> = SmallVec::new();
        stack.push(interval);
        let mut steps = 0;
        while let Some(piece) = stack.pop() {
            steps += 1;
            if steps > budget {
                report.status = report.status.combine(RootStatus::NoConvergence);
                break;
            }
            if !field.range(&line.segment_bounds(piece)).straddles_zero() {
                continue;
            }
            if piece.width() <= tolerance {
                let (f_lo, f_hi) = (f(piece.lo), f(piece.hi));
                if f_lo == 0.0 || f_hi == 0.0 || (f_lo < 0.0) != (f_hi < 0.0) {
                    report.roots.push(linear_zero(piece.lo, f_lo, piece.hi, f_hi));
                }
                continue;
            }
            let [lo, hi] = piece.bisect();
            // Process the low half first so that roots come out roughly in
            // order.
            stack.push(hi);
            stack.push(lo);
        }

        roots::sort_and_dedup(&mut report.roots, tolerance);
        if report.roots.len() > max_roots {
            report.roots.truncate(max_roots);
            report.status = report.status.combine(RootStatus::TooManyRoots);
        }
        report
    }
}

/// State of a single ray query.
///
/// The roots of each primitive are found once, over the whole query
/// interval, and reused in every leaf that the ray visits.
#[derive(Debug)]
pub struct RayQuery<'a> {
    space: &'a SetSpace,
    finder: RootFinder,
    line: Line,
    interval: Interval,
    roots: HashMap<Field, Arc<Roots>>,
    status: RootStatus,
}
impl<'a> RayQuery<'a> {
    /// Constructs a query for the part of `line` within `interval`.
    pub fn new(space: &'a SetSpace, line: Line, interval: Interval) -> Self {
        Self {
            space,
            finder: RootFinder::new(space.config().root_limits()),
            line,
            interval,
            roots: HashMap::new(),
            status: RootStatus::Complete,
        }
    }

    /// Returns the ray.
    pub fn line(&self) -> &Line {
        &self.line
    }
    /// Returns the parameter interval of the query.
    pub fn interval(&self) -> Interval {
        self.interval
    }
    /// Returns the most severe status of every root search so far.
    pub fn status(&self) -> RootStatus {
        self.status
    }

    /// Returns the roots of a field along the ray, searching only the first
    /// time the field is seen.
    pub fn roots(&mut self, field: &Field) -> Arc<Roots> {
        if let Some(roots) = self.roots.get(field) {
            return Arc::clone(roots);
        }
        let report = self.finder.find(&**field, &self.line, self.interval);
        if !report.status.is_complete() {
            tracing::warn!(
                %field,
                status = ?report.status,
                found = report.roots.len(),
                "root search was incomplete",
            );
        }
        self.status = self.status.combine(report.status);
        let roots = Arc::new(report.roots);
        self.roots.insert(field.clone(), Arc::clone(&roots));
        roots
    }

    /// Returns where the ray is inside `set` within `domain`, by combining
    /// the lists of its primitives with the set's own operators.
    pub fn intervals(&mut self, set: Set, domain: Interval) -> SortedIntervalList {
        let node = self.space.node(set);
        let list = match &node.data {
            SetData::Everything => SortedIntervalList::solid(domain),
            SetData::Primitive(field) => {
                let roots = self.roots(field);
                let line = self.line;
                SortedIntervalList::from_roots(domain, set.unsigned(), &roots, |t| {
                    field.value(line.point_at(t)) < 0.0
                })
            }
            SetData::Compound { op, children: [a, b] } => {
                let list_a = self.intervals(*a, domain);
                let list_b = self.intervals(*b, domain);
                match op {
                    SetOp::Union => list_a.union(&list_b),
                    SetOp::Intersection => list_a.intersection(&list_b),
                }
            }
        };
        match set.sign {
            Sign::Pos => list,
            Sign::Neg => list.complement(),
        }
    }
}

#[cfg(test)]
mod tests {
    use solidmath::assert_approx_eq;

    use super::*;
    use crate::field::{Expr, UnaryOp};

    fn finder() -> RootFinder {
        RootFinder::new(RootLimits::default())
    }

    #[test]
    fn test_polynomial_roots_along_line() {
        let sphere = Expr::sphere(Vector::ZERO, 2.0);
        let line = Line::new(vector![-5.0, 0.0, 0.0], Vector::X);
        let report = finder().find(&sphere, &line, Interval::new(0.0, 10.0));
        assert!(report.status.is_complete());
        assert_eq!(report.roots.len(), 2);
        assert_approx_eq!(report.roots[0], 3.0);
        assert_approx_eq!(report.roots[1], 7.0);

        let report = finder().find(&sphere, &line, Interval::new(4.0, 10.0));
        assert_eq!(report.roots.len(), 1);
    }

    #[test]
    fn test_bisection_roots() {
        // sin(x) < 0 between π and 2π, 3π and 4π, ...
        let wave = Expr::coordinate(Axis::X).apply(UnaryOp::Sin);
        assert_eq!(wave.degree(), None);
        let line = Line::new(Vector::ZERO, Vector::X);
        let report = finder().find(&wave, &line, Interval::new(1.0, 10.0));
        assert!(report.status.is_complete());
        let expected = [1.0, 2.0, 3.0].map(|k| k * std::f64::consts::PI);
        assert_eq!(report.roots.len(), expected.len(), "{:?}", report.roots);
        for (actual, expected) in report.roots.iter().zip(expected) {
            assert_approx_eq!(*actual, expected);
        }
    }

    #[test]
    fn test_bisection_budget() {
        let wave = Expr::coordinate(Axis::X).apply(UnaryOp::Sin);
        let line = Line::new(Vector::ZERO, Vector::X);
        let limits = RootLimits {
            tolerance: 1e-9,
            max_iterations: 10,
            max_roots: 2,
        };
        let report = RootFinder::new(limits).find(&wave, &line, Interval::new(1.0, 100.0));
        assert_eq!(report.status, RootStatus::NoConvergence);
        assert!(report.roots.len() <= 2);
    }
}
