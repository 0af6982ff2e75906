//! Tolerance-based comparison and algebraic simplification of sets.

use solidmath::Sign;

use super::{Same, Set, SetData, SetOp, SetSpace};
use crate::KernelResult;

/// Largest number of primitives in a subtree that [`SetSpace::regularize()`]
/// flattens and simplifies as a whole. Larger trees are simplified one
/// operand at a time.
pub const MAX_REGULARIZE_PRIMITIVES: usize = 5;

impl SetSpace {
    /// Compares two sets up to the space's `same_tolerance`.
    ///
    /// This never reports a relation that does not hold, but it may report
    /// [`Same::Different`] for sets that are in fact related.
    pub fn same(&self, a: Set, b: Set) -> Same {
        if a == b {
            return Same::Identical;
        }
        if a == -b {
            return Same::Complement;
        }

        let (node_a, node_b) = (self.node(a), self.node(b));
        let tolerance = self.config().same_tolerance;
        let unsigned = match (&node_a.data, &node_b.data) {
            (SetData::Everything, SetData::Everything) => Same::Identical,
            (SetData::Primitive(f), SetData::Primitive(g)) => f.same(g, tolerance),
            (
                SetData::Compound { op: op_a, children: [a1, a2] },
                SetData::Compound { op: op_b, children: [b1, b2] },
            ) => {
                let pairwise = |expected: Same| {
                    (self.same(*a1, *b1) == expected && self.same(*a2, *b2) == expected)
                        || (self.same(*a1, *b2) == expected && self.same(*a2, *b1) == expected)
                };
                if op_a == op_b && pairwise(Same::Identical) {
                    Same::Identical
                } else if *op_a == op_b.dual() && pairwise(Same::Complement) {
                    // De Morgan
                    Same::Complement
                } else {
                    Same::Different
                }
            }
            _ => Same::Different,
        };

        match (unsigned, a.sign * b.sign) {
            (Same::Identical, Sign::Neg) => Same::Complement,
            (Same::Complement, Sign::Neg) => Same::Identical,
            // `-|x|` is not the absolute value of anything.
            (Same::AbsOf, _) if a.sign.is_neg() => Same::Different,
            (same, _) => same,
        }
    }

    /// Returns an equivalent set with redundant operands removed.
    ///
    /// Subtrees with at most [`MAX_REGULARIZE_PRIMITIVES`] primitives are
    /// flattened into a list of operands of a single operator, compared
    /// pairwise with [`SetSpace::same()`], and rebuilt without duplicates.
    /// Complementary operands collapse the whole subtree to a constant.
    /// Regularizing a regularized set returns it unchanged.
    #[tracing::instrument(level = "debug", skip_all, fields(set = %set))]
    pub fn regularize(&self, set: Set) -> KernelResult<Set> {
        let node = self.node(set);
        let SetData::Compound { op, children } = &node.data else {
            return Ok(set);
        };

        let result = if node.primitive_count() <= MAX_REGULARIZE_PRIMITIVES {
            let op = op.signed(set.sign);
            let mut flat = vec![];
            for &child in children {
                self.flatten(child * set.sign, op, &mut flat);
            }
            let mut operands = vec![];
            for operand in flat {
                let regularized = self.regularize(operand)?;
                self.flatten(regularized, op, &mut operands);
            }
            match self.simplify_operands(op, operands) {
                Ok(operands) => operands
                    .into_iter()
                    .try_fold(op.identity(), |acc, s| self.combine(op, acc, s))?,
                Err(constant) => constant,
            }
        } else {
            let [a, b] = *children;
            let a = self.regularize(a)?;
            let b = self.regularize(b)?;
            let rebuilt = self.combine(*op, a, b)? * set.sign;
            if self.primitive_count(rebuilt) <= MAX_REGULARIZE_PRIMITIVES {
                self.regularize(rebuilt)?
            } else {
                rebuilt
            }
        };

        self.reattach(result, &node.attributes)
    }

    /// Appends the operands of `set` under `op` to `out`, descending through
    /// nested nodes with the same effective operator. Nodes with attributes
    /// are kept whole.
    fn flatten(&self, set: Set, op: SetOp, out: &mut Vec<Set>) {
        let node = self.node(set);
        if let SetData::Compound { op: node_op, children } = &node.data {
            if node.attributes.is_empty() && node_op.signed(set.sign) == op {
                for &child in children {
                    self.flatten(child * set.sign, op, out);
                }
                return;
            }
        }
        out.push(set);
    }

    /// Removes redundant operands of `op`, returning them in canonical order,
    /// or returns the constant that the whole combination reduces to.
    fn simplify_operands(&self, op: SetOp, mut operands: Vec<Set>) -> Result<Vec<Set>, Set> {
        operands.sort_by(|&a, &b| self.cmp_complexity(a, b));

        let mut kept: Vec<Set> = Vec::with_capacity(operands.len());
        'operands: for x in operands {
            if self.is_constant(x) {
                if x.sign == op.absorbing().sign {
                    return Err(op.absorbing());
                }
                continue;
            }
            let mut i = 0;
            while i < kept.len() {
                let y = kept[i];
                match (self.same(x, y), self.same(y, x)) {
                    (Same::Identical, _) | (_, Same::Identical) => continue 'operands,
                    (Same::Complement, _) | (_, Same::Complement) => return Err(op.absorbing()),
                    // `|y|` is nowhere negative, so it is empty as a solid.
                    (Same::AbsOf, _) => match op {
                        SetOp::Union => continue 'operands,
                        SetOp::Intersection => {
                            kept.remove(i);
                            continue;
                        }
                    },
                    (_, Same::AbsOf) => match op {
                        SetOp::Union => {
                            kept.remove(i);
                            continue;
                        }
                        SetOp::Intersection => continue 'operands,
                    },
                    (Same::Different, Same::Different) => (),
                }
                i += 1;
            }
            kept.push(x);
        }
        Ok(kept)
    }
}
