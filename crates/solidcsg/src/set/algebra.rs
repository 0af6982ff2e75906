//! Boolean combination of sets.

use std::cmp::Ordering;

use super::{Attributes, Set, SetData, SetOp, SetSpace};
use crate::KernelResult;

impl SetSpace {
    /// Returns the union of two sets.
    pub fn union(&self, a: Set, b: Set) -> KernelResult<Set> {
        self.combine(SetOp::Union, a, b)
    }
    /// Returns the intersection of two sets.
    pub fn intersection(&self, a: Set, b: Set) -> KernelResult<Set> {
        self.combine(SetOp::Intersection, a, b)
    }
    /// Returns the points in `a` that are not in `b`.
    pub fn difference(&self, a: Set, b: Set) -> KernelResult<Set> {
        self.intersection(a, -b)
    }
    /// Returns the points in exactly one of `a` and `b`.
    pub fn symmetric_difference(&self, a: Set, b: Set) -> KernelResult<Set> {
        let a_only = self.difference(a, b)?;
        let b_only = self.difference(b, a)?;
        self.union(a_only, b_only)
    }
    /// Returns the complement of a set. This never allocates.
    pub fn complement(&self, a: Set) -> Set {
        -a
    }

    /// Returns the union of any number of sets.
    pub fn union_all(&self, sets: impl IntoIterator<Item = Set>) -> KernelResult<Set> {
        self.combine_all(SetOp::Union, sets)
    }
    /// Returns the intersection of any number of sets.
    pub fn intersection_all(&self, sets: impl IntoIterator<Item = Set>) -> KernelResult<Set> {
        self.combine_all(SetOp::Intersection, sets)
    }
    fn combine_all(&self, op: SetOp, sets: impl IntoIterator<Item = Set>) -> KernelResult<Set> {
        sets.into_iter()
            .try_fold(op.identity(), |acc, s| self.combine(op, acc, s))
    }

    /// Combines two sets with a Boolean operator.
    ///
    /// Trivial combinations are answered without touching the arena. Otherwise
    /// the simpler operand is placed first, so `a | b` and `b | a` are the
    /// same node.
    pub fn combine(&self, op: SetOp, a: Set, b: Set) -> KernelResult<Set> {
        if let Some(quick) = self.quick_combine(op, a, b) {
            return Ok(quick);
        }
        let children = match self.cmp_complexity(a, b) {
            Ordering::Greater => [b, a],
            _ => [a, b],
        };
        let id = self.add_node(SetData::Compound { op, children }, Attributes::new())?;
        Ok(id.into())
    }

    /// Returns the result of a combination that does not need a new node.
    fn quick_combine(&self, op: SetOp, a: Set, b: Set) -> Option<Set> {
        if a == b {
            return Some(a);
        }
        if a == -b {
            return Some(op.absorbing());
        }
        for (x, other) in [(a, b), (b, a)] {
            if self.is_constant(x) {
                return Some(match x.sign == op.absorbing().sign {
                    true => op.absorbing(),
                    false => other,
                });
            }
        }
        None
    }

    /// Orders two sets by structural complexity: fewer primitives first, then
    /// lower degree, then by handle so that the order is total.
    pub(super) fn cmp_complexity(&self, a: Set, b: Set) -> Ordering {
        let key = |s: Set| {
            let node = self.node(s);
            (node.primitive_count(), node.degree().unwrap_or(u32::MAX), s)
        };
        key(a).cmp(&key(b))
    }
}
