use solidmath::prelude::*;

use super::{Set, SetData, SetSpace};
use crate::KernelResult;

impl SetSpace {
    /// Returns a set that agrees with `set` inside a box, with every
    /// primitive whose sign is uniform over the box replaced by the universal
    /// or empty set and the enclosing operators simplified.
    ///
    /// If the space is configured with `regularize_after_prune`, the result
    /// is also regularized.
    pub fn prune(&self, set: Set, b: &IntervalBox) -> KernelResult<Set> {
        let pruned = self.prune_unsigned(set.unsigned(), b)? * set.sign;
        match self.config().regularize_after_prune {
            true => self.regularize(pruned),
            false => Ok(pruned),
        }
    }

    fn prune_unsigned(&self, set: Set, b: &IntervalBox) -> KernelResult<Set> {
        let node = self.node(set);
        match &node.data {
            SetData::Everything => Ok(set),
            SetData::Primitive(field) => Ok(match Membership::from_range(field.range(b)) {
                Membership::Solid => Set::EVERYTHING,
                Membership::Air => Set::NOTHING,
                Membership::Surface => set,
            }),
            SetData::Compound { op, children: [c1, c2] } => {
                let new_c1 = self.prune_unsigned(c1.unsigned(), b)? * c1.sign;
                let new_c2 = self.prune_unsigned(c2.unsigned(), b)? * c2.sign;
                if new_c1 == *c1 && new_c2 == *c2 {
                    return Ok(set);
                }
                let combined = self.combine(*op, new_c1, new_c2)?;
                self.reattach(combined, &node.attributes)
            }
        }
    }
}
