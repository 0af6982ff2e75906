//! CSG set algebra over implicit primitives.
//!
//! Sets live in a [`SetSpace`], a memoizing arena in which every node is
//! unique, and are referred to by signed handles ([`Set`]). The complement of
//! a set is the same node with the opposite sign, so complementing never
//! allocates and `-(-a)` is `a` by identity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use solidmath::prelude::*;
use tinyset::Set64;

mod algebra;
mod attributes;
mod eval;
mod flags;
mod prune;
mod regularize;
mod signedref;
mod transform;

pub use attributes::{Attribute, AttributeValue, Attributes};
pub use flags::SetFlags;
pub use regularize::MAX_REGULARIZE_PRIMITIVES;
pub use signedref::SignedRef;

use crate::field::{Field, FieldKind};
use crate::slabmap::SlabMap;
use crate::{KernelConfig, KernelResult};

solidmath::idx_struct! {
    /// ID for a memoized node in a [`SetSpace`].
    pub struct SetId(pub u32);
}

/// Oriented handle to a set in a [`SetSpace`].
pub type Set = SignedRef<SetId>;

impl SignedRef<SetId> {
    /// Set containing every point.
    pub const EVERYTHING: Set = SignedRef {
        id: SetId(0),
        sign: Sign::Pos,
    };
    /// Set containing no points.
    pub const NOTHING: Set = SignedRef {
        id: SetId(0),
        sign: Sign::Neg,
    };
}

/// Boolean operator of a compound set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SetOp {
    /// Points in either operand.
    Union,
    /// Points in both operands.
    Intersection,
}
impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOp::Union => write!(f, "|"),
            SetOp::Intersection => write!(f, "&"),
        }
    }
}
impl SetOp {
    /// Returns the operator that this one becomes under complement.
    #[must_use]
    pub fn dual(self) -> Self {
        match self {
            SetOp::Union => SetOp::Intersection,
            SetOp::Intersection => SetOp::Union,
        }
    }
    /// Returns the set `x` for which `a op x == a`.
    pub fn identity(self) -> Set {
        match self {
            SetOp::Union => Set::NOTHING,
            SetOp::Intersection => Set::EVERYTHING,
        }
    }
    /// Returns the set `x` for which `a op x == x`.
    pub fn absorbing(self) -> Set {
        -self.identity()
    }
    /// Returns the operator as seen through a handle with sign `sign`.
    pub fn signed(self, sign: Sign) -> Self {
        match sign {
            Sign::Pos => self,
            Sign::Neg => self.dual(),
        }
    }
}

/// Result of comparing two sets with [`SetSpace::same()`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Same {
    /// The sets are not known to be related.
    Different,
    /// The sets are equal up to tolerance.
    Identical,
    /// Each set is the complement of the other, up to tolerance.
    Complement,
    /// The first set's field is the absolute value of the second's.
    AbsOf,
}

/// Geometry of a set node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SetData {
    /// Every point. Its complement is the empty set.
    Everything,
    /// Points where a field is negative.
    Primitive(Field),
    /// Boolean combination of two sets. The structurally simpler operand is
    /// always first.
    Compound {
        /// Operator.
        op: SetOp,
        /// Operands.
        children: [Set; 2],
    },
}

/// Memoized node in a [`SetSpace`].
#[derive(Debug, Clone)]
pub struct SetNode {
    /// Geometry.
    pub data: SetData,
    /// Side-channel data such as names and colours.
    pub attributes: Attributes,

    primitive_count: usize,
    degree: Option<u32>,
    flags: SetFlags,
}
impl PartialEq for SetNode {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.attributes == other.attributes
    }
}
impl Eq for SetNode {}
impl Hash for SetNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
        self.attributes.hash(state);
    }
}
impl SetNode {
    /// Returns the number of primitive leaves in the tree, counting repeats.
    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }
    /// Returns the highest polynomial degree of any primitive, or `None` if
    /// some primitive is not polynomial.
    pub fn degree(&self) -> Option<u32> {
        self.degree
    }
    /// Returns the classification flags of the node (ignoring the sign of
    /// any handle to it).
    pub fn flags(&self) -> SetFlags {
        self.flags
    }
}

/// Memoizing arena of CSG sets.
///
/// A space owns the [`KernelConfig`] used by every operation on its sets.
/// Nodes stay in the space until [`SetSpace::gc()`] finds them unreachable
/// from the sets still in use.
pub struct SetSpace {
    config: KernelConfig,
    nodes: RwLock<SlabMap<SetId, SetNode>>,
}
impl fmt::Debug for SetSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetSpace")
            .field("config", &self.config)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl SetSpace {
    /// Constructs a new space with a validated configuration.
    pub fn new(config: KernelConfig) -> KernelResult<Arc<Self>> {
        config.validate()?;
        let mut nodes = SlabMap::new();
        let everything = SetNode {
            data: SetData::Everything,
            attributes: Attributes::new(),
            primitive_count: 0,
            degree: Some(0),
            flags: SetFlags::all(),
        };
        let id = nodes.get_or_insert(everything)?.key();
        debug_assert_eq!(id, Set::EVERYTHING.id);
        Ok(Arc::new(Self {
            config,
            nodes: RwLock::new(nodes),
        }))
    }

    /// Returns the configuration of the space.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
    /// Returns the number of nodes in the space.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }
    /// Returns whether the space only contains the universal set.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Returns a view of a set for convenient operations and formatting.
    pub fn get(&self, set: Set) -> SetRef<'_> {
        SetRef { space: self, set }
    }
    /// Returns the node for a set. The sign of the handle is ignored.
    pub fn node(&self, set: Set) -> Arc<SetNode> {
        Arc::clone(&self.nodes.read()[set.id])
    }
    /// Returns the geometry of the node for a set. The sign of the handle is
    /// ignored.
    pub fn data(&self, set: Set) -> SetData {
        self.node(set).data.clone()
    }

    /// Returns the set where a field is negative.
    pub fn primitive(&self, field: impl Into<Field>) -> KernelResult<Set> {
        let id = self.add_node(SetData::Primitive(field.into()), Attributes::new())?;
        Ok(id.into())
    }

    /// Returns whether a set is the universal or empty set, ignoring
    /// attributes.
    pub fn is_constant(&self, set: Set) -> bool {
        matches!(self.node(set).data, SetData::Everything)
    }
    /// Returns the number of primitive leaves in a set, counting repeats.
    pub fn primitive_count(&self, set: Set) -> usize {
        self.node(set).primitive_count
    }
    /// Returns the highest polynomial degree of any primitive in a set, or
    /// `None` if some primitive is not polynomial.
    pub fn degree(&self, set: Set) -> Option<u32> {
        self.node(set).degree
    }
    /// Returns the classification flags of a set, accounting for its sign.
    pub fn flags(&self, set: Set) -> SetFlags {
        let node = self.node(set);
        match (&node.data, set.sign) {
            // The complement of a convex compound is not convex.
            (SetData::Compound { .. }, Sign::Neg) => node.flags - SetFlags::CONVEX,
            _ => node.flags,
        }
    }
    /// Returns the IDs of the distinct primitive nodes in a set.
    pub fn primitives(&self, set: Set) -> Set64<SetId> {
        let mut ret = Set64::new();
        let mut stack = vec![set];
        while let Some(s) = stack.pop() {
            match &self.node(s).data {
                SetData::Everything => (),
                SetData::Primitive(_) => {
                    ret.insert(s.id);
                }
                SetData::Compound { children, .. } => stack.extend(children),
            }
        }
        ret
    }

    /// Adds a node to the arena, or returns the existing ID of an equal node.
    pub(crate) fn add_node(&self, data: SetData, attributes: Attributes) -> KernelResult<SetId> {
        let (primitive_count, degree, flags) = match &data {
            SetData::Everything => (0, Some(0), SetFlags::all()),
            SetData::Primitive(field) => {
                let flags = match field.kind() {
                    FieldKind::Constant | FieldKind::Planar => SetFlags::all(),
                    FieldKind::Polynomial => SetFlags::POLYNOMIAL,
                    FieldKind::General => SetFlags::empty(),
                };
                (1, field.degree(), flags)
            }
            SetData::Compound { op, children: [a, b] } => {
                let (node_a, node_b) = (self.node(*a), self.node(*b));
                let (flags_a, flags_b) = (self.flags(*a), self.flags(*b));
                let mut flags = flags_a & flags_b & SetFlags::INHERITED;
                if *op == SetOp::Intersection && (flags_a & flags_b).contains(SetFlags::CONVEX) {
                    flags |= SetFlags::CONVEX;
                }
                let degree = Option::zip(node_a.degree, node_b.degree).map(|(a, b)| a.max(b));
                (node_a.primitive_count + node_b.primitive_count, degree, flags)
            }
        };
        let node = SetNode {
            data,
            attributes,
            primitive_count,
            degree,
            flags,
        };
        let entry = self.nodes.write().get_or_insert(node)?;
        if entry.is_new() {
            tracing::debug!(id = %entry.key(), "new set node");
        }
        Ok(entry.key())
    }

    /// Garbage-collects every node that is not reachable from `roots`, and
    /// returns the number of nodes removed. The universal set is always kept.
    ///
    /// Handles to removed nodes become invalid, and their IDs may be reused
    /// by later operations. Sets held by a [`crate::Model`] can be listed with
    /// [`crate::Model::all_sets()`].
    #[tracing::instrument(skip_all)]
    pub fn gc(&self, roots: impl IntoIterator<Item = Set>) -> usize {
        let mut stack: Vec<SetId> = roots.into_iter().map(|s| s.id).collect();
        let mut nodes = self.nodes.write();

        let total = nodes.len();
        let mut keys_to_delete: Set64<SetId> = nodes.keys().collect();
        keys_to_delete.remove(&Set::EVERYTHING.id);
        while let Some(id) = stack.pop() {
            if keys_to_delete.remove(&id)
                && let SetData::Compound { children, .. } = &nodes[id].data
            {
                stack.extend(children.iter().map(|c| c.id));
            }
        }

        let num_deleted = keys_to_delete.len();
        for id in keys_to_delete.iter() {
            nodes.remove(id);
        }
        tracing::debug!("garbage-collected {num_deleted}/{total} set nodes");
        num_deleted
    }

    /// Returns a string with a multiline human-friendly representation of a
    /// set, one node per line.
    pub fn dump_to_string(&self, root: Set) -> String {
        let mut s = String::new();
        let mut stack = vec![(root, 0)];
        while let Some((set, depth)) = stack.pop() {
            for _ in 0..depth {
                s += "  ";
            }
            let node = self.node(set);
            s += &match &node.data {
                SetData::Everything if set.sign.is_neg() => format!("{set}: nothing"),
                SetData::Everything => format!("{set}: everything"),
                SetData::Primitive(field) => format!("{set}: primitive {field}"),
                SetData::Compound { op, children } => {
                    stack.extend(children.iter().rev().map(|&c| (c, depth + 1)));
                    format!("{set}: {op}")
                }
            };
            if !node.attributes.is_empty() {
                s += &format!(" {}", node.attributes);
            }
            s += "\n";
        }
        s
    }

    fn fmt_set(&self, set: Set, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node(set);
        match (&node.data, set.sign) {
            (SetData::Everything, Sign::Pos) => write!(f, "everything"),
            (SetData::Everything, Sign::Neg) => write!(f, "nothing"),
            (SetData::Primitive(field), sign) => {
                if sign.is_neg() {
                    write!(f, "-")?;
                }
                write!(f, "[{field}]")
            }
            (SetData::Compound { op, children: [a, b] }, sign) => {
                if sign.is_neg() {
                    write!(f, "-")?;
                }
                write!(f, "(")?;
                self.fmt_set(*a, f)?;
                write!(f, " {op} ")?;
                self.fmt_set(*b, f)?;
                write!(f, ")")
            }
        }
    }
}

/// Set in a [`SetSpace`], bundled with the space so that it can be combined
/// with operators and formatted.
#[derive(Copy, Clone)]
pub struct SetRef<'a> {
    /// Space containing the set.
    pub space: &'a SetSpace,
    /// Set handle.
    pub set: Set,
}
impl fmt::Debug for SetRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.set, f)
    }
}
impl fmt::Display for SetRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.space.fmt_set(self.set, f)
    }
}
impl PartialEq for SetRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.space, other.space) && self.set == other.set
    }
}
impl std::ops::Neg for SetRef<'_> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        SetRef {
            space: self.space,
            set: -self.set,
        }
    }
}
impl<'a> std::ops::BitOr for SetRef<'a> {
    type Output = KernelResult<SetRef<'a>>;

    fn bitor(self, rhs: Self) -> Self::Output {
        debug_assert!(std::ptr::eq(self.space, rhs.space), "sets from different spaces");
        Ok(self.space.get(self.space.union(self.set, rhs.set)?))
    }
}
impl<'a> std::ops::BitAnd for SetRef<'a> {
    type Output = KernelResult<SetRef<'a>>;

    fn bitand(self, rhs: Self) -> Self::Output {
        debug_assert!(std::ptr::eq(self.space, rhs.space), "sets from different spaces");
        Ok(self.space.get(self.space.intersection(self.set, rhs.set)?))
    }
}
impl<'a> SetRef<'a> {
    /// Returns the membership of a point in the set.
    pub fn member(self, p: Point) -> Membership {
        self.space.member(self.set, p)
    }
    /// Returns a conservative range of the set's value over a box.
    pub fn range(self, b: &IntervalBox) -> Interval {
        self.space.range(self.set, b)
    }
    /// Returns the set with primitives that are uniformly signed over a box
    /// replaced by constants.
    pub fn prune(self, b: &IntervalBox) -> KernelResult<SetRef<'a>> {
        Ok(self.space.get(self.space.prune(self.set, b)?))
    }
    /// Returns an equivalent, simpler set.
    pub fn regularize(self) -> KernelResult<SetRef<'a>> {
        Ok(self.space.get(self.space.regularize(self.set)?))
    }
}

#[cfg(test)]
mod tests;
