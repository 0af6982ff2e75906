use solidmath::prelude::*;

use super::{Decision, DecisionPolicy, Division, Model, ModelNode, SetList, prune_all};
use crate::{KernelError, KernelResult, Set, SetSpace};

impl Model {
    /// Builds a new tree over the same box for a new set list, asking
    /// `policy` how to divide each node.
    ///
    /// Wherever the new tree has the same split and the same (identical) sets
    /// as this one, the existing subtree is reused instead of allocating a
    /// new one. If nothing changed, this returns a handle to `self`.
    ///
    /// The two children of a node are built on the rayon thread pool for
    /// nodes shallower than the space's `parallel_depth`.
    #[tracing::instrument(skip_all, fields(bounds = %self.bounds))]
    pub fn redivide(
        &self,
        space: &SetSpace,
        sets: impl IntoIterator<Item = Set>,
        policy: &dyn DecisionPolicy,
    ) -> KernelResult<Model> {
        if self.bounds.is_empty() {
            return Err(KernelError::EmptyBox);
        }
        let sets = prune_all(space, sets, &self.bounds)?;
        let ret = Redivider { space, policy }.build(Some(self), self.bounds, sets, 0)?;
        tracing::debug!(
            reused = ret.ptr_eq(self),
            leaves = ret.leaf_count(),
            depth = ret.depth(),
            "redivided model",
        );
        Ok(ret)
    }
}

struct Redivider<'a> {
    space: &'a SetSpace,
    policy: &'a dyn DecisionPolicy,
}
impl Redivider<'_> {
    fn build(
        &self,
        old: Option<&Model>,
        bounds: IntervalBox,
        sets: SetList,
        depth: u32,
    ) -> KernelResult<Model> {
        let mut node = ModelNode {
            bounds,
            sets,
            division: Division::Leaf,
        };

        if let Decision::Split {
            axis,
            cut,
            children,
        } = self.policy.decide(self.space, &node, depth)
        {
            if bounds[axis].lo < cut && cut < bounds[axis].hi {
                let child_sets = self.child_sets(&node, axis, cut, children)?;
                node.division = self.build_split(old, &node, axis, cut, child_sets, depth)?;
            } else {
                tracing::warn!(%axis, cut, %bounds, "cut is outside the box; keeping leaf");
            }
        }

        if let Some(old) = old
            && old.bounds == node.bounds
            && old.sets == node.sets
            && old.division.ptr_eq(&node.division)
        {
            return Ok(old.clone());
        }
        Ok(Model::from_node(node))
    }

    fn child_sets(
        &self,
        node: &ModelNode,
        axis: Axis,
        cut: Float,
        children: Option<[Vec<Set>; 2]>,
    ) -> KernelResult<[SetList; 2]> {
        match children {
            Some([lo, hi]) => {
                // A policy that returns the wrong number of sets is a bug.
                assert_eq!(lo.len(), node.sets.len(), "wrong number of sets for low child");
                assert_eq!(hi.len(), node.sets.len(), "wrong number of sets for high child");
                Ok([SetList::try_from(lo)?, SetList::try_from(hi)?])
            }
            None => {
                let swell = self.space.config().swell_fraction;
                let [lo, hi] = node.bounds.split_swollen(axis, cut, swell);
                Ok([
                    prune_all(self.space, node.sets.iter_values().copied(), &lo)?,
                    prune_all(self.space, node.sets.iter_values().copied(), &hi)?,
                ])
            }
        }
    }

    fn build_split(
        &self,
        old: Option<&Model>,
        node: &ModelNode,
        axis: Axis,
        cut: Float,
        [lo_sets, hi_sets]: [SetList; 2],
        depth: u32,
    ) -> KernelResult<Division> {
        let [lo_bounds, hi_bounds] = node.bounds.split(axis, cut);
        let [old_lo, old_hi] = match old.map(|m| &m.division) {
            Some(Division::Split {
                axis: old_axis,
                cut: old_cut,
                children: [lo, hi],
            }) if *old_axis == axis && *old_cut == cut => [Some(lo), Some(hi)],
            _ => [None, None],
        };

        let build_lo = || self.build(old_lo, lo_bounds, lo_sets, depth + 1);
        let build_hi = || self.build(old_hi, hi_bounds, hi_sets, depth + 1);
        let (lo, hi) = if depth < self.space.config().parallel_depth {
            rayon::join(build_lo, build_hi)
        } else {
            (build_lo(), build_hi())
        };

        Ok(Division::Split {
            axis,
            cut,
            children: [lo?, hi?],
        })
    }
}
