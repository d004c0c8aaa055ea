use crate::NodeId;
use crate::commands::CommandBuffer;
use crate::components::{
    Anchor, Children, EulerAngles, Parent, Pivot, Position, Rotation, Scale, TransformNode,
    WorldRotation, WorldTransform,
};
use crate::node::NodeAllocator;
use crate::sparse_set::SparseSet;
use crate::storage::{AttributeKind, LocalAttribute, TransformStorage};

/// Number of handles handed to a single `visit_transform_nodes` callback.
const VISIT_BATCH: usize = 256;

/// A value that can be attached to a node in a [`World`].
///
/// Implemented for every attribute, marker and hierarchy type in
/// [`components`](crate::components). Each type has its own dense storage.
pub trait Component: Send + Sized + 'static {
    /// The storage holding every value of this type.
    fn storage(world: &World) -> &SparseSet<Self>;
    /// Mutable access to the storage holding every value of this type.
    fn storage_mut(world: &mut World) -> &mut SparseSet<Self>;
}

macro_rules! component_storages {
    ($($field:ident: $ty:ty),* $(,)?) => {
        #[derive(Default)]
        struct Storages {
            $($field: SparseSet<$ty>,)*
        }

        impl Storages {
            fn remove_all(&mut self, index: u32) {
                $(self.$field.remove(index);)*
            }
        }

        $(
            impl Component for $ty {
                fn storage(world: &World) -> &SparseSet<Self> {
                    &world.storages.$field
                }

                fn storage_mut(world: &mut World) -> &mut SparseSet<Self> {
                    &mut world.storages.$field
                }
            }
        )*
    };
}

component_storages! {
    transform_nodes: TransformNode,
    positions: Position,
    scales: Scale,
    rotations: Rotation,
    euler_angles: EulerAngles,
    pivots: Pivot,
    anchors: Anchor,
    parents: Parent,
    children: Children,
    world_transforms: WorldTransform,
    world_rotations: WorldRotation,
}

/// The in-crate node store.
///
/// Owns node handles and one [`SparseSet`] per component type, and
/// implements [`TransformStorage`] so it can be driven by
/// [`TransformPropagation`](crate::TransformPropagation) directly.
///
/// Structural changes requested by the propagation pass are applied as
/// soon as the pass flushes them, so new nodes receive their results in
/// the same pass.
pub struct World {
    nodes: NodeAllocator,
    storages: Storages,
    commands: CommandBuffer,
    /// Result attribute insertions requested during a propagation pass.
    result_requests: CommandBuffer,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self {
            nodes: NodeAllocator::new(),
            storages: Storages::default(),
            commands: CommandBuffer::new(),
            result_requests: CommandBuffer::new(),
        }
    }

    // ---- Node management ----

    /// Spawns a bare node and returns its handle.
    pub fn spawn(&mut self) -> NodeId {
        self.nodes.allocate()
    }

    /// Spawns a node carrying the [`TransformNode`] marker.
    pub fn spawn_node(&mut self) -> NodeId {
        let node = self.spawn();
        self.insert(node, TransformNode);
        node
    }

    /// Despawns a node, removing all its components.
    ///
    /// The node is dropped from its parent's [`Children`] and its own
    /// children become roots. Returns `false` if the node was already dead.
    /// To take the children down with it use
    /// [`despawn_recursive`](crate::hierarchy::despawn_recursive).
    pub fn despawn(&mut self, node: NodeId) -> bool {
        if !self.nodes.is_alive(node) {
            return false;
        }
        crate::hierarchy::unlink(self, node);
        self.storages.remove_all(node.index());
        self.nodes.free(node)
    }

    /// Returns whether the node is currently alive.
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.is_alive(node)
    }

    /// Returns the number of alive nodes.
    pub fn node_count(&self) -> u32 {
        self.nodes.len()
    }

    /// Iterates over all currently alive handles.
    pub fn iter_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter_alive()
    }

    /// Highest handle ever allocated; an upper bound on every live handle.
    pub fn max_live_handle(&self) -> u32 {
        self.nodes.max_handle()
    }

    // ---- Components ----

    /// Inserts a component, returning the value it replaced.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    pub fn insert<T: Component>(&mut self, node: NodeId, component: T) -> Option<T> {
        assert!(
            self.nodes.is_alive(node),
            "Cannot insert component on dead node {node}"
        );
        T::storage_mut(self).insert(node.index(), component)
    }

    /// Removes a component from a node.
    pub fn remove<T: Component>(&mut self, node: NodeId) -> Option<T> {
        T::storage_mut(self).remove(node.index())
    }

    pub fn get<T: Component>(&self, node: NodeId) -> Option<&T> {
        T::storage(self).get(node.index())
    }

    pub fn get_mut<T: Component>(&mut self, node: NodeId) -> Option<&mut T> {
        T::storage_mut(self).get_mut(node.index())
    }

    pub fn contains<T: Component>(&self, node: NodeId) -> bool {
        T::storage(self).contains(node.index())
    }

    /// Iterates over every `(node, &T)` pair in storage order.
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        T::storage(self)
            .iter()
            .map(|(index, value)| (NodeId::new(index), value))
    }

    /// Whether the node participates in transform propagation.
    pub fn is_transform_node(&self, node: NodeId) -> bool {
        self.contains::<TransformNode>(node)
    }

    // ---- Commands ----

    /// The deferred command buffer for this world.
    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    /// Drains and applies all queued commands, in the order they were queued.
    pub fn apply_commands(&mut self) {
        for cmd in self.commands.drain() {
            cmd(self);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStorage for World {
    fn max_live_handle(&self) -> u32 {
        self.nodes.max_handle()
    }

    fn visit_transform_nodes(&self, visit: &mut dyn FnMut(&[NodeId])) {
        let mut batch = [NodeId::NONE; VISIT_BATCH];
        for chunk in self.storages.transform_nodes.indices().chunks(VISIT_BATCH) {
            for (slot, &index) in batch.iter_mut().zip(chunk) {
                *slot = NodeId::new(index);
            }
            visit(&batch[..chunk.len()]);
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.storages.parents.get(node.index()).map(|p| p.0)
    }

    fn local_attribute(&self, node: NodeId, kind: AttributeKind) -> Option<LocalAttribute> {
        let index = node.index();
        let s = &self.storages;
        match kind {
            AttributeKind::Position => s.positions.get(index).map(|v| LocalAttribute::Position(v.0)),
            AttributeKind::Scale => s.scales.get(index).map(|v| LocalAttribute::Scale(v.0)),
            AttributeKind::Rotation => s.rotations.get(index).map(|v| LocalAttribute::Rotation(v.0)),
            AttributeKind::EulerAngles => s
                .euler_angles
                .get(index)
                .map(|v| LocalAttribute::EulerAngles(v.0)),
            AttributeKind::Pivot => s.pivots.get(index).map(|v| LocalAttribute::Pivot(v.0)),
            AttributeKind::Anchor => s.anchors.get(index).map(|a| LocalAttribute::Anchor(*a)),
        }
    }

    fn visit_local_attributes(&self, visit: &mut dyn FnMut(NodeId, LocalAttribute)) {
        let s = &self.storages;
        let marked = |index: u32| s.transform_nodes.contains(index);

        for (index, v) in s.positions.iter().filter(|(i, _)| marked(*i)) {
            visit(NodeId::new(index), LocalAttribute::Position(v.0));
        }
        for (index, v) in s.scales.iter().filter(|(i, _)| marked(*i)) {
            visit(NodeId::new(index), LocalAttribute::Scale(v.0));
        }
        for (index, v) in s.rotations.iter().filter(|(i, _)| marked(*i)) {
            visit(NodeId::new(index), LocalAttribute::Rotation(v.0));
        }
        for (index, v) in s.euler_angles.iter().filter(|(i, _)| marked(*i)) {
            visit(NodeId::new(index), LocalAttribute::EulerAngles(v.0));
        }
        for (index, v) in s.pivots.iter().filter(|(i, _)| marked(*i)) {
            visit(NodeId::new(index), LocalAttribute::Pivot(v.0));
        }
        for (index, a) in s.anchors.iter().filter(|(i, _)| marked(*i)) {
            visit(NodeId::new(index), LocalAttribute::Anchor(*a));
        }
    }

    fn has_result_attributes(&self, node: NodeId) -> bool {
        let index = node.index();
        self.storages.world_transforms.contains(index) && self.storages.world_rotations.contains(index)
    }

    fn request_result_attributes(&self, nodes: &[NodeId]) {
        let nodes = nodes.to_vec();
        self.result_requests.push(move |world| {
            for node in nodes {
                if !world.is_alive(node) {
                    continue;
                }
                if !world.contains::<WorldTransform>(node) {
                    world.insert(node, WorldTransform::IDENTITY);
                }
                if !world.contains::<WorldRotation>(node) {
                    world.insert(node, WorldRotation::IDENTITY);
                }
            }
        });
    }

    fn flush_structural_changes(&mut self) {
        for cmd in self.result_requests.drain() {
            cmd(self);
        }
    }

    fn set_world_transform(&mut self, node: NodeId, value: WorldTransform) -> bool {
        match self.storages.world_transforms.get_mut(node.index()) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn set_world_rotation(&mut self, node: NodeId, value: WorldRotation) -> bool {
        match self.storages.world_rotations.get_mut(node.index()) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}
