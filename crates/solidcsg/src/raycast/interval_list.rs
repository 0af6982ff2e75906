use std::fmt;

use itertools::Itertools;
use smallvec::SmallVec;
use solidmath::prelude::*;

use crate::Set;

/// Solid stretch of a ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Span {
    /// Range of the ray parameter. Always nonempty with `lo < hi`.
    pub interval: Interval,
    /// Primitive whose surface the ray crosses at `interval.lo`, or `None` if
    /// the span starts at the edge of the list's domain.
    pub lo_set: Option<Set>,
    /// Primitive whose surface the ray crosses at `interval.hi`, or `None` if
    /// the span ends at the edge of the list's domain.
    pub hi_set: Option<Set>,
}
impl Span {
    fn new(lo: Float, hi: Float, lo_set: Option<Set>, hi_set: Option<Set>) -> Self {
        Span {
            interval: Interval::new(lo, hi),
            lo_set,
            hi_set,
        }
    }
}

/// Surface crossing along a ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Crossing {
    /// Ray parameter.
    pub t: Float,
    /// Primitive whose surface is crossed.
    pub primitive: Set,
    /// Whether the ray enters solid (rather than leaving it).
    pub entering: bool,
}

/// Membership of a solid along a ray, as a sorted list of disjoint solid
/// spans within a domain. Everything else in the domain is air.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedIntervalList {
    domain: Interval,
    spans: SmallVec<[Span; 4]>,
}
impl fmt::Display for SortedIntervalList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spans = self.spans.iter().map(|span| span.interval).join(", ");
        write!(f, "{{{spans}}} in {}", self.domain)
    }
}
impl SortedIntervalList {
    /// Returns a list with no solid.
    pub fn air(domain: Interval) -> Self {
        Self {
            domain,
            spans: SmallVec::new(),
        }
    }
    /// Returns a list that is solid across the whole domain.
    pub fn solid(domain: Interval) -> Self {
        let mut ret = Self::air(domain);
        if domain.lo < domain.hi {
            ret.spans.push(Span::new(domain.lo, domain.hi, None, None));
        }
        ret
    }
    /// Returns the list for a single primitive, given its sorted roots and a
    /// function that reports whether a parameter is inside solid.
    ///
    /// The sign of the primitive between adjacent roots is sampled at the
    /// midpoint, so tangent roots that do not change the sign are absorbed.
    pub fn from_roots(
        domain: Interval,
        primitive: Set,
        roots: &[Float],
        mut is_solid: impl FnMut(Float) -> bool,
    ) -> Self {
        let mut ret = Self::air(domain);
        if !(domain.lo < domain.hi) {
            return ret;
        }

        let mut breaks: SmallVec<[(Float, Option<Set>); 8]> = SmallVec::new();
        breaks.push((domain.lo, None));
        for &t in roots {
            if t == domain.lo {
                breaks[0].1 = Some(primitive);
            } else if domain.lo < t && t <= domain.hi {
                breaks.push((t, Some(primitive)));
            }
        }
        if breaks.last().is_some_and(|&(t, _)| t < domain.hi) {
            breaks.push((domain.hi, None));
        }

        for w in breaks.windows(2) {
            let [(lo, lo_set), (hi, hi_set)] = [w[0], w[1]];
            if !(lo < hi) || !is_solid((lo + hi) * 0.5) {
                continue;
            }
            match ret.spans.last_mut() {
                // Tangent root inside solid.
                Some(last) if last.interval.hi == lo => {
                    last.interval.hi = hi;
                    last.hi_set = hi_set;
                }
                _ => ret.spans.push(Span::new(lo, hi, lo_set, hi_set)),
            }
        }
        ret
    }

    /// Returns the domain of the list.
    pub fn domain(&self) -> Interval {
        self.domain
    }
    /// Returns the solid spans, sorted.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }
    /// Returns whether there is no solid in the domain.
    pub fn is_air(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns the list for the complement of the solid.
    #[must_use]
    pub fn complement(&self) -> Self {
        let mut ret = Self::air(self.domain);
        let mut lo = self.domain.lo;
        let mut lo_set = None;
        for span in &self.spans {
            if lo < span.interval.lo {
                ret.spans.push(Span::new(lo, span.interval.lo, lo_set, span.lo_set));
            }
            lo = span.interval.hi;
            lo_set = span.hi_set;
        }
        if lo < self.domain.hi {
            ret.spans.push(Span::new(lo, self.domain.hi, lo_set, None));
        }
        ret
    }

    /// Returns the list for the union of two solids over the same domain.
    ///
    /// Spans that overlap or touch are merged.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut ret = Self::air(self.domain);
        let mut a = self.spans.iter().peekable();
        let mut b = other.spans.iter().peekable();
        loop {
            let next = match (a.peek(), b.peek()) {
                (Some(x), Some(y)) if y.interval.lo < x.interval.lo => b.next(),
                (Some(_), _) => a.next(),
                (None, _) => b.next(),
            };
            let Some(&span) = next else { break };
            match ret.spans.last_mut() {
                Some(last) if span.interval.lo <= last.interval.hi => {
                    if span.interval.hi > last.interval.hi {
                        last.interval.hi = span.interval.hi;
                        last.hi_set = span.hi_set;
                    }
                }
                _ => ret.spans.push(span),
            }
        }
        ret
    }

    /// Returns the list for the intersection of two solids over the same
    /// domain.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut ret = Self::air(self.domain);
        let (mut i, mut j) = (0, 0);
        while let (Some(x), Some(y)) = (self.spans.get(i), other.spans.get(j)) {
            let (lo, lo_set) = match y.interval.lo > x.interval.lo {
                true => (y.interval.lo, y.lo_set),
                false => (x.interval.lo, x.lo_set),
            };
            let (hi, hi_set) = match y.interval.hi < x.interval.hi {
                true => (y.interval.hi, y.hi_set),
                false => (x.interval.hi, x.hi_set),
            };
            if lo < hi {
                ret.spans.push(Span::new(lo, hi, lo_set, hi_set));
            }
            if x.interval.hi < y.interval.hi {
                i += 1;
            } else {
                j += 1;
            }
        }
        ret
    }

    /// Returns the first surface crossing at or after `t`.
    ///
    /// If `inside` is true the ray is known to be inside solid at `t`, so
    /// only exits are reported.
    pub fn first_crossing(&self, t: Float, inside: bool) -> Option<Crossing> {
        self.spans.iter().find_map(|span| {
            let entry = (span.lo_set, span.interval.lo, true);
            let exit = (span.hi_set, span.interval.hi, false);
            [entry, exit]
                .into_iter()
                .filter(|&(_, _, entering)| !(inside && entering))
                .find_map(|(set, crossing_t, entering)| {
                    Some(Crossing {
                        t: crossing_t,
                        primitive: set?,
                        entering,
                    })
                    .filter(|c| c.t >= t)
                })
        })
    }
}
