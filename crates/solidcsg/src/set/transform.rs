use std::collections::HashMap;

use solidmath::prelude::*;

use super::{Set, SetData, SetId, SetSpace, SignedRef};
use crate::KernelResult;

impl SetSpace {
    /// Returns a set moved by a transform. Attributes are carried along.
    ///
    /// Every primitive is transformed once, even if it appears several times
    /// in the tree.
    #[tracing::instrument(level = "debug", skip_all, fields(set = %set, transform = %t))]
    pub fn transform(&self, set: Set, t: &Transform) -> KernelResult<Set> {
        let mut memo = HashMap::new();
        Ok(self.transform_unsigned(set.unsigned(), t, &mut memo)? * set.sign)
    }
    /// Returns a set moved by a vector.
    pub fn translate(&self, set: Set, v: Vector) -> KernelResult<Set> {
        self.transform(set, &Transform::translate(v))
    }
    /// Returns a set rotated by `angle` radians about an axis.
    pub fn spin(&self, set: Set, axis: Line, angle: Float) -> KernelResult<Set> {
        self.transform(set, &Transform::spin(axis, angle))
    }
    /// Returns a set scaled uniformly about a center.
    pub fn scale(&self, set: Set, center: Point, factor: Float) -> KernelResult<Set> {
        self.transform(set, &Transform::scale(center, factor))
    }
    /// Returns a set reflected through a plane.
    pub fn mirror(&self, set: Set, plane: Plane) -> KernelResult<Set> {
        self.transform(set, &Transform::mirror(plane))
    }

    fn transform_unsigned(
        &self,
        set: Set,
        t: &Transform,
        memo: &mut HashMap<SetId, Set>,
    ) -> KernelResult<Set> {
        if let Some(&ret) = memo.get(&set.id) {
            return Ok(ret);
        }
        let node = self.node(set);
        let ret = match &node.data {
            SetData::Everything => set,
            SetData::Primitive(field) => {
                let data = SetData::Primitive(field.transformed(t));
                let id = self.add_node(data, node.attributes.clone())?;
                SignedRef::from(id)
            }
            SetData::Compound { op, children: [a, b] } => {
                let new_a = self.transform_unsigned(a.unsigned(), t, memo)? * a.sign;
                let new_b = self.transform_unsigned(b.unsigned(), t, memo)? * b.sign;
                let combined = self.combine(*op, new_a, new_b)?;
                self.reattach(combined, &node.attributes)?
            }
        };
        memo.insert(set.id, ret);
        Ok(ret)
    }
}
