//! Point and box evaluation of sets.

use solidmath::prelude::*;

use super::{Set, SetData, SetOp, SetSpace};

impl SetSpace {
    /// Returns the membership of a point in a set.
    ///
    /// A union stops at its first solid operand and an intersection at its
    /// first air operand. Otherwise the point is on the surface if it is on
    /// the surface of either operand.
    pub fn member(&self, set: Set, p: Point) -> Membership {
        let node = self.node(set);
        let m = match &node.data {
            SetData::Everything => Membership::Solid,
            SetData::Primitive(field) => Membership::from_value(field.value(p)),
            SetData::Compound { op, children: [a, b] } => {
                let decisive = match op {
                    SetOp::Union => Membership::Solid,
                    SetOp::Intersection => Membership::Air,
                };
                let m_a = self.member(*a, p);
                if m_a == decisive {
                    decisive
                } else {
                    let m_b = self.member(*b, p);
                    if m_b == decisive {
                        decisive
                    } else if m_a == Membership::Surface || m_b == Membership::Surface {
                        Membership::Surface
                    } else {
                        -decisive
                    }
                }
            }
        };
        m * set.sign
    }

    /// Returns the value of a set at a point, along with the primitive whose
    /// value was chosen.
    ///
    /// The value of a union is the minimum of its operands and the value of
    /// an intersection is the maximum. The universal set has value −∞ and no
    /// primitive. The returned primitive carries the sign with which it
    /// appears in the set.
    pub fn value(&self, set: Set, p: Point) -> (Float, Option<Set>) {
        let node = self.node(set);
        let (value, leaf) = match &node.data {
            SetData::Everything => (Float::NEG_INFINITY, None),
            SetData::Primitive(field) => (field.value(p), Some(set.unsigned())),
            SetData::Compound { op, children: [a, b] } => {
                let (value_a, leaf_a) = self.value(*a, p);
                let (value_b, leaf_b) = self.value(*b, p);
                let b_wins = match op {
                    SetOp::Union => value_b < value_a,
                    SetOp::Intersection => value_b > value_a,
                };
                match b_wins {
                    true => (value_b, leaf_b),
                    false => (value_a, leaf_a),
                }
            }
        };
        match set.sign {
            Sign::Pos => (value, leaf),
            Sign::Neg => (-value, leaf.map(|l| -l)),
        }
    }

    /// Returns an interval containing every value of a set over a box.
    pub fn range(&self, set: Set, b: &IntervalBox) -> Interval {
        let node = self.node(set);
        let range = match &node.data {
            SetData::Everything => Interval::point(Float::NEG_INFINITY),
            SetData::Primitive(field) => field.range(b),
            SetData::Compound { op, children: [c1, c2] } => {
                let (r1, r2) = (self.range(*c1, b), self.range(*c2, b));
                match op {
                    SetOp::Union => r1.min(r2),
                    SetOp::Intersection => r1.max(r2),
                }
            }
        };
        match set.sign {
            Sign::Pos => range,
            Sign::Neg => -range,
        }
    }

    /// Classifies a whole box against a set. Boxes that may contain surface
    /// are reported as [`Membership::Surface`].
    pub fn classify_box(&self, set: Set, b: &IntervalBox) -> Membership {
        Membership::from_range(self.range(set, b))
    }
}
