use crate::NodeId;

/// Link from a node to the node its transform is resolved against.
///
/// Read by propagation through
/// [`TransformStorage::parent`](crate::TransformStorage::parent). Written
/// only by the functions in [`hierarchy`](crate::hierarchy), which keep the
/// parent's [`Children`] in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub NodeId);

impl Parent {
    pub fn node(self) -> NodeId {
        self.0
    }
}

/// Reverse links of [`Parent`], in attach order.
///
/// Propagation never reads this; it exists so a node can be unlinked from
/// its children when it is despawned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Children(pub Vec<NodeId>);

impl Children {
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.0.contains(&node)
    }

    /// Appends `node` unless it is already listed. Returns whether it was added.
    pub(crate) fn attach(&mut self, node: NodeId) -> bool {
        if self.contains(node) {
            return false;
        }
        self.0.push(node);
        true
    }

    /// Drops `node` from the list, keeping the order of the rest.
    pub(crate) fn detach(&mut self, node: NodeId) -> bool {
        let before = self.0.len();
        self.0.retain(|&c| c != node);
        self.0.len() != before
    }
}
