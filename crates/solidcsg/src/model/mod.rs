//! Adaptive box-tree over a list of sets.
//!
//! A [`Model`] is an immutable tree. Each node covers a box and holds every
//! set of the model pruned to that box, so the set at a given [`SetIndex`] is
//! the same solid (restricted to the box) at every node. Trees are never
//! mutated: [`Model::redivide()`] builds a new tree, sharing every subtree
//! that did not change.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use solidmath::prelude::*;

mod cursor;
mod policy;
mod redivide;

pub use cursor::ModelCursor;
pub use policy::{Decision, DecisionPolicy, MaxContentsPolicy};

use crate::{KernelError, KernelResult, Set, SetSpace};

solidmath::idx_struct! {
    /// Index of a set in the set list of a [`Model`].
    pub struct SetIndex(pub u32);
}

/// Sets of a model node, indexed by [`SetIndex`].
pub type SetList = GenericVec<SetIndex, Set>;

/// State of a model node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DivisionKind {
    /// Undivided.
    Leaf,
    /// Split perpendicular to the X axis.
    XDiv,
    /// Split perpendicular to the Y axis.
    YDiv,
    /// Split perpendicular to the Z axis.
    ZDiv,
}
impl DivisionKind {
    /// Returns the kind of node split perpendicular to `axis`.
    pub fn split(axis: Axis) -> Self {
        match axis {
            Axis::X => DivisionKind::XDiv,
            Axis::Y => DivisionKind::YDiv,
            Axis::Z => DivisionKind::ZDiv,
        }
    }
    /// Returns the axis perpendicular to the split, or `None` for a leaf.
    pub fn axis(self) -> Option<Axis> {
        match self {
            DivisionKind::Leaf => None,
            DivisionKind::XDiv => Some(Axis::X),
            DivisionKind::YDiv => Some(Axis::Y),
            DivisionKind::ZDiv => Some(Axis::Z),
        }
    }
}

/// Children of a model node.
#[derive(Debug, Clone)]
pub enum Division {
    /// Undivided.
    Leaf,
    /// Split in two by the plane `p[axis] == cut`. The first child covers
    /// the low side.
    Split {
        /// Axis perpendicular to the cut.
        axis: Axis,
        /// Coordinate of the cut along `axis`.
        cut: Float,
        /// Low and high children.
        children: [Model; 2],
    },
}
impl Division {
    /// Returns the kind of the division.
    pub fn kind(&self) -> DivisionKind {
        match self {
            Division::Leaf => DivisionKind::Leaf,
            Division::Split { axis, .. } => DivisionKind::split(*axis),
        }
    }
    /// Returns whether two divisions are the same, comparing children by
    /// identity.
    fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Division::Leaf, Division::Leaf) => true,
            (
                Division::Split { axis: a1, cut: c1, children: [l1, h1] },
                Division::Split { axis: a2, cut: c2, children: [l2, h2] },
            ) => a1 == a2 && c1 == c2 && l1.ptr_eq(l2) && h1.ptr_eq(h2),
            _ => false,
        }
    }
}

/// Node of a model tree.
#[derive(Debug)]
pub struct ModelNode {
    bounds: IntervalBox,
    sets: SetList,
    division: Division,
}
impl ModelNode {
    /// Returns the box covered by the node.
    pub fn bounds(&self) -> IntervalBox {
        self.bounds
    }
    /// Returns the model's sets, pruned to the node's box.
    pub fn sets(&self) -> &SetList {
        &self.sets
    }
    /// Returns the children of the node.
    pub fn division(&self) -> &Division {
        &self.division
    }
    /// Returns the state of the node.
    pub fn kind(&self) -> DivisionKind {
        self.division.kind()
    }
    /// Returns whether the node is undivided.
    pub fn is_leaf(&self) -> bool {
        matches!(self.division, Division::Leaf)
    }
    /// Returns the children of the node, or `None` for a leaf.
    pub fn children(&self) -> Option<&[Model; 2]> {
        match &self.division {
            Division::Leaf => None,
            Division::Split { children, .. } => Some(children),
        }
    }
}

/// Shared handle to an immutable [`ModelNode`].
#[derive(Debug, Clone)]
pub struct Model(Arc<ModelNode>);
impl Deref for Model {
    type Target = ModelNode;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            for _ in 0..depth {
                write!(f, "  ")?;
            }
            match &node.division {
                Division::Leaf => writeln!(f, "leaf {} {:?}", node.bounds, node.sets)?,
                Division::Split { axis, cut, children } => {
                    writeln!(f, "{axis} = {cut}")?;
                    stack.extend(children.iter().rev().map(|c| (c, depth + 1)));
                }
            }
        }
        Ok(())
    }
}

impl Model {
    /// Constructs an undivided model over a box, with each set pruned to the
    /// box.
    pub fn new(
        space: &SetSpace,
        bounds: IntervalBox,
        sets: impl IntoIterator<Item = Set>,
    ) -> KernelResult<Self> {
        if bounds.is_empty() {
            return Err(KernelError::EmptyBox);
        }
        let sets = prune_all(space, sets, &bounds)?;
        Ok(Self::from_node(ModelNode {
            bounds,
            sets,
            division: Division::Leaf,
        }))
    }
    /// Constructs a model over a box and divides it according to a policy.
    pub fn build(
        space: &SetSpace,
        bounds: IntervalBox,
        sets: impl IntoIterator<Item = Set>,
        policy: &dyn DecisionPolicy,
    ) -> KernelResult<Self> {
        let sets: Vec<Set> = sets.into_iter().collect();
        Self::new(space, bounds, sets.iter().copied())?.redivide(space, sets, policy)
    }

    fn from_node(node: ModelNode) -> Self {
        Self(Arc::new(node))
    }

    /// Returns whether two handles point to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns a cursor at the root of the model.
    pub fn cursor(&self) -> ModelCursor {
        ModelCursor::new(self.clone())
    }
    /// Iterates over the leaves of the model, from low to high along each
    /// cut.
    pub fn leaves(&self) -> impl Iterator<Item = &Model> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            loop {
                let node = stack.pop()?;
                match &node.division {
                    Division::Leaf => return Some(node),
                    Division::Split { children: [lo, hi], .. } => stack.extend([hi, lo]),
                }
            }
        })
    }
    /// Returns the number of leaves in the model.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }
    /// Iterates over the sets of every node in the model, including interior
    /// nodes. Sets appear once per node that holds them.
    pub fn all_sets(&self) -> impl Iterator<Item = Set> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let Some(children) = node.children() {
                stack.extend(children);
            }
            Some(node.sets.iter_values().copied())
        })
        .flatten()
    }
    /// Returns the length of the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(children) = node.children() {
                stack.extend(children.iter().map(|c| (c, depth + 1)));
            }
        }
        max_depth
    }
    /// Returns a cursor at the leaf containing a point, or `None` if the point
    /// is outside the model. Points on a cut belong to the low side.
    pub fn leaf_containing(&self, p: Point) -> Option<ModelCursor> {
        if !self.bounds.contains(p) {
            return None;
        }
        let mut cursor = self.cursor();
        while let Division::Split { axis, cut, .. } = cursor.node().division {
            let i = if p[axis] <= cut { 0 } else { 1 };
            cursor = cursor.child(i)?;
        }
        Some(cursor)
    }
}

fn prune_all(
    space: &SetSpace,
    sets: impl IntoIterator<Item = Set>,
    bounds: &IntervalBox,
) -> KernelResult<SetList> {
    let pruned = sets
        .into_iter()
        .map(|s| space.prune(s, bounds))
        .collect::<KernelResult<Vec<Set>>>()?;
    Ok(SetList::try_from(pruned)?)
}
