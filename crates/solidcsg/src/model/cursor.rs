use super::Model;

/// Position in a model tree, remembering the path from the root.
///
/// Subtrees may be shared between several trees, so nodes do not know their
/// parents. A cursor records the path taken to reach a node instead.
#[derive(Debug, Clone)]
pub struct ModelCursor {
    ancestors: Vec<Model>,
    node: Model,
}
impl ModelCursor {
    /// Returns a cursor at the root of a model.
    pub fn new(root: Model) -> Self {
        Self {
            ancestors: vec![],
            node: root,
        }
    }

    /// Returns the node at the cursor.
    pub fn node(&self) -> &Model {
        &self.node
    }
    /// Returns the root of the tree.
    pub fn root(&self) -> &Model {
        self.ancestors.first().unwrap_or(&self.node)
    }
    /// Returns the number of steps from the root to the node.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
    /// Returns the ancestors of the node, root first.
    pub fn ancestors(&self) -> &[Model] {
        &self.ancestors
    }

    /// Returns a cursor at the parent of the node, or `None` at the root.
    pub fn parent(&self) -> Option<ModelCursor> {
        let mut ancestors = self.ancestors.clone();
        let node = ancestors.pop()?;
        Some(Self { ancestors, node })
    }
    /// Returns a cursor at the low (`0`) or high (`1`) child of the node, or
    /// `None` at a leaf.
    pub fn child(&self, i: usize) -> Option<ModelCursor> {
        let child = self.node.children()?.get(i)?.clone();
        let mut ancestors = self.ancestors.clone();
        ancestors.push(self.node.clone());
        Some(Self {
            ancestors,
            node: child,
        })
    }
}
