use solidmath::prelude::*;

use super::{DivisionKind, ModelNode};
use crate::{Set, SetSpace};

/// Decision made by a [`DecisionPolicy`] about one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Keep the node undivided.
    Leaf,
    /// Split the node in two by the plane `p[axis] == cut`.
    Split {
        /// Axis perpendicular to the cut.
        axis: Axis,
        /// Coordinate of the cut, strictly inside the node's box.
        cut: Float,
        /// Set lists for the low and high children, each as long as the
        /// node's set list. If omitted, each set is pruned to the child's
        /// box, swollen across the cut.
        children: Option<[Vec<Set>; 2]>,
    },
}
impl Decision {
    /// Returns a split at `cut` along `axis`, with children computed by
    /// pruning.
    pub fn split(axis: Axis, cut: Float) -> Self {
        Decision::Split {
            axis,
            cut,
            children: None,
        }
    }
    /// Returns the kind of node that the decision produces.
    pub fn kind(&self) -> DivisionKind {
        match self {
            Decision::Leaf => DivisionKind::Leaf,
            Decision::Split { axis, .. } => DivisionKind::split(*axis),
        }
    }
}

/// Strategy for dividing a model.
///
/// The policy is called once per node, root first, with the node's box and
/// pruned set list. Any per-policy context belongs in the implementing type.
pub trait DecisionPolicy: Send + Sync {
    /// Decides whether and where to split a node at `depth` (0 for the root).
    fn decide(&self, space: &SetSpace, node: &ModelNode, depth: u32) -> Decision;
}
impl<F> DecisionPolicy for F
where
    F: Fn(&SetSpace, &ModelNode, u32) -> Decision + Send + Sync,
{
    fn decide(&self, space: &SetSpace, node: &ModelNode, depth: u32) -> Decision {
        self(space, node, depth)
    }
}

/// Policy that halves the longest side of a box until every set in it is
/// simple enough, the tree is deep enough, or the box is small enough.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaxContentsPolicy {
    /// Largest number of primitives allowed in each set of a leaf.
    pub max_primitives: usize,
    /// Depth at which nodes are never split.
    pub max_depth: u32,
    /// Box diagonal below which nodes are never split.
    pub min_diagonal: Float,
}
impl Default for MaxContentsPolicy {
    fn default() -> Self {
        Self {
            max_primitives: 1,
            max_depth: 12,
            min_diagonal: 0.001,
        }
    }
}
impl DecisionPolicy for MaxContentsPolicy {
    fn decide(&self, space: &SetSpace, node: &ModelNode, depth: u32) -> Decision {
        let bounds = node.bounds();
        let simple_enough = node
            .sets()
            .iter_values()
            .all(|&s| space.primitive_count(s) <= self.max_primitives);
        if simple_enough || depth >= self.max_depth || bounds.diag2() < self.min_diagonal.powi(2) {
            return Decision::Leaf;
        }
        let axis = bounds.longest_axis();
        Decision::split(axis, bounds[axis].mid())
    }
}
