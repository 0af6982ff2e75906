//! Side-channel data attached to set nodes.
//!
//! Attributes never affect geometry. They take part in node identity, so the
//! same geometry with different attributes is a different node, but
//! [`SetSpace::geometry_eq()`] ignores them.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use smallvec::SmallVec;

use super::{Set, SetData, SetSpace, SignedRef};
use crate::KernelResult;

/// Value of an [`Attribute`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    /// Name or free-form text.
    Name(Arc<str>),
    /// RGB colour.
    Colour([u8; 3]),
    /// Integer, such as a material ID.
    Integer(i64),
}
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Name(name) => write!(f, "{name:?}"),
            AttributeValue::Colour([r, g, b]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

/// Tagged value attached to a set node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// Tag, such as `"material"` or `"colour"`. A node has at most one
    /// attribute per tag.
    pub tag: Arc<str>,
    /// Value.
    pub value: AttributeValue,
}
impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.tag, self.value)
    }
}
impl Attribute {
    /// Constructs an attribute.
    pub fn new(tag: impl Into<Arc<str>>, value: AttributeValue) -> Self {
        Self {
            tag: tag.into(),
            value,
        }
    }
    /// Constructs a `name` attribute.
    pub fn name(name: impl Into<Arc<str>>) -> Self {
        Self::new("name", AttributeValue::Name(name.into()))
    }
    /// Constructs a `colour` attribute.
    pub fn colour(rgb: [u8; 3]) -> Self {
        Self::new("colour", AttributeValue::Colour(rgb))
    }
}

/// Attributes of a node, sorted by tag.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Attributes(SmallVec<[Attribute; 1]>);
impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}
impl FromIterator<Attribute> for Attributes {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        let mut ret = Self::new();
        for attr in iter {
            ret.insert(attr);
        }
        ret
    }
}
impl Attributes {
    /// Constructs an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Iterates over the attributes in tag order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }
    /// Returns the value for a tag.
    pub fn get(&self, tag: &str) -> Option<&AttributeValue> {
        let i = self.position(tag).ok()?;
        Some(&self.0[i].value)
    }
    /// Adds an attribute, replacing any existing one with the same tag.
    /// Returns the replaced value.
    pub fn insert(&mut self, attr: Attribute) -> Option<AttributeValue> {
        match self.position(&attr.tag) {
            Ok(i) => Some(std::mem::replace(&mut self.0[i], attr).value),
            Err(i) => {
                self.0.insert(i, attr);
                None
            }
        }
    }
    /// Removes the attribute with a tag and returns its value.
    pub fn remove(&mut self, tag: &str) -> Option<AttributeValue> {
        let i = self.position(tag).ok()?;
        Some(self.0.remove(i).value)
    }
    /// Adds every attribute from `other` whose tag is not already present.
    /// Returns whether anything was added.
    pub fn merge_missing(&mut self, other: &Attributes) -> bool {
        let mut changed = false;
        for attr in other.iter() {
            if let Err(i) = self.position(&attr.tag) {
                self.0.insert(i, attr.clone());
                changed = true;
            }
        }
        changed
    }

    fn position(&self, tag: &str) -> Result<usize, usize> {
        self.0.binary_search_by(|attr| (*attr.tag).cmp(tag))
    }
}

impl SetSpace {
    /// Returns the attributes attached to a set.
    ///
    /// Attributes belong to the node, so a set and its complement share them.
    pub fn attributes(&self, set: Set) -> Attributes {
        self.node(set).attributes.clone()
    }
    /// Returns the value of one attribute of a set.
    pub fn attribute(&self, set: Set, tag: &str) -> Option<AttributeValue> {
        self.node(set).attributes.get(tag).cloned()
    }

    /// Returns a set with the same geometry and an attribute added, replacing
    /// any existing attribute with the same tag.
    pub fn with_attribute(&self, set: Set, attr: Attribute) -> KernelResult<Set> {
        let node = self.node(set);
        let mut attributes = node.attributes.clone();
        attributes.insert(attr);
        self.with_attributes(set, attributes)
    }
    /// Returns a set with the same geometry and no attributes at the root.
    pub fn without_attributes(&self, set: Set) -> KernelResult<Set> {
        self.with_attributes(set, Attributes::new())
    }
    fn with_attributes(&self, set: Set, attributes: Attributes) -> KernelResult<Set> {
        let node = self.node(set);
        if node.attributes == attributes {
            return Ok(set);
        }
        let id = self.add_node(node.data.clone(), attributes)?;
        Ok(SignedRef { id, sign: set.sign })
    }

    /// Adds `attributes` to the root of `set` wherever it does not already
    /// have an attribute with the same tag. Constant sets are returned
    /// unchanged.
    pub(super) fn reattach(&self, set: Set, attributes: &Attributes) -> KernelResult<Set> {
        if attributes.is_empty() {
            return Ok(set);
        }
        let node = self.node(set);
        if matches!(node.data, SetData::Everything) {
            return Ok(set);
        }
        let mut merged = node.attributes.clone();
        match merged.merge_missing(attributes) {
            true => self.with_attributes(set, merged),
            false => Ok(set),
        }
    }

    /// Pushes every attribute down to the primitives below it that lack an
    /// attribute with the same tag.
    ///
    /// Consumers such as shading only look at the attributes of the primitive
    /// that was hit, so this must be called before handing a set to them.
    #[tracing::instrument(level = "debug", skip_all, fields(set = %set))]
    pub fn percolate(&self, set: Set) -> KernelResult<Set> {
        self.percolate_from(set, &Attributes::new())
    }
    fn percolate_from(&self, set: Set, inherited: &Attributes) -> KernelResult<Set> {
        let node = self.node(set);
        let mut attributes = node.attributes.clone();
        attributes.merge_missing(inherited);
        match &node.data {
            SetData::Everything => Ok(set),
            SetData::Primitive(_) => self.with_attributes(set, attributes),
            SetData::Compound { op, children: [a, b] } => {
                let new_a = self.percolate_from(*a, &attributes)?;
                let new_b = self.percolate_from(*b, &attributes)?;
                if new_a == *a && new_b == *b {
                    return Ok(set);
                }
                let combined = self.combine(*op, new_a, new_b)? * set.sign;
                self.reattach(combined, &node.attributes)
            }
        }
    }

    /// Returns whether two sets have the same geometry, ignoring attributes
    /// at every level.
    pub fn geometry_eq(&self, a: Set, b: Set) -> bool {
        if a == b {
            return true;
        }
        if a.sign != b.sign {
            return false;
        }
        let (node_a, node_b) = (self.node(a), self.node(b));
        match (&node_a.data, &node_b.data) {
            (SetData::Everything, SetData::Everything) => true,
            (SetData::Primitive(f), SetData::Primitive(g)) => f == g,
            (
                SetData::Compound { op: op_a, children: [a1, a2] },
                SetData::Compound { op: op_b, children: [b1, b2] },
            ) => {
                op_a == op_b
                    && ((self.geometry_eq(*a1, *b1) && self.geometry_eq(*a2, *b2))
                        || (self.geometry_eq(*a1, *b2) && self.geometry_eq(*a2, *b1)))
            }
            _ => false,
        }
    }
}
