//! The storage boundary of transform propagation.
//!
//! [`TransformPropagation`](crate::TransformPropagation) never owns node
//! data. Everything it reads or writes goes through [`TransformStorage`],
//! which any entity store can implement. [`World`](crate::World) is the
//! in-crate implementation.

use trellis_core::math::{Quat, Vec3};

use crate::NodeId;
use crate::components::{Anchor, WorldRotation, WorldTransform};

/// The kinds of local attribute a node may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    Scale,
    Rotation,
    EulerAngles,
    Pivot,
    Anchor,
}

impl AttributeKind {
    /// Every attribute kind, in cache load order.
    pub const ALL: [AttributeKind; 6] = [
        AttributeKind::Position,
        AttributeKind::Scale,
        AttributeKind::Rotation,
        AttributeKind::EulerAngles,
        AttributeKind::Pivot,
        AttributeKind::Anchor,
    ];
}

/// A present local attribute value.
///
/// Absence is expressed as `None` at the call site; there is no "missing"
/// variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalAttribute {
    Position(Vec3),
    Scale(Vec3),
    Rotation(Quat),
    /// Euler angles in radians.
    EulerAngles(Vec3),
    Pivot(Vec3),
    Anchor(Anchor),
}

impl LocalAttribute {
    /// The kind of this value.
    pub fn kind(&self) -> AttributeKind {
        match self {
            LocalAttribute::Position(_) => AttributeKind::Position,
            LocalAttribute::Scale(_) => AttributeKind::Scale,
            LocalAttribute::Rotation(_) => AttributeKind::Rotation,
            LocalAttribute::EulerAngles(_) => AttributeKind::EulerAngles,
            LocalAttribute::Pivot(_) => AttributeKind::Pivot,
            LocalAttribute::Anchor(_) => AttributeKind::Anchor,
        }
    }
}

/// Capabilities transform propagation needs from an entity store.
///
/// Implementations must keep every handle they report at or below
/// [`max_live_handle`](TransformStorage::max_live_handle) for the duration
/// of a pass.
pub trait TransformStorage {
    /// Upper bound (inclusive) on any handle reported this tick.
    fn max_live_handle(&self) -> u32;

    /// Visits every node carrying the [`TransformNode`](crate::components::TransformNode)
    /// marker. Batches and order are arbitrary; each node appears once.
    fn visit_transform_nodes(&self, visit: &mut dyn FnMut(&[NodeId]));

    /// The node's parent, or `None` for a root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// The node's value for one attribute kind, if present.
    fn local_attribute(&self, node: NodeId, kind: AttributeKind) -> Option<LocalAttribute>;

    /// Visits every present local attribute of every transform node.
    ///
    /// The default walks [`visit_transform_nodes`](TransformStorage::visit_transform_nodes)
    /// and queries each kind; stores that can iterate attributes densely
    /// should override it.
    fn visit_local_attributes(&self, visit: &mut dyn FnMut(NodeId, LocalAttribute)) {
        self.visit_transform_nodes(&mut |batch| {
            for &node in batch {
                for kind in AttributeKind::ALL {
                    if let Some(value) = self.local_attribute(node, kind) {
                        visit(node, value);
                    }
                }
            }
        });
    }

    /// Whether the node carries both [`WorldTransform`] and [`WorldRotation`].
    fn has_result_attributes(&self, node: NodeId) -> bool;

    /// Requests that every listed node be given both result attributes.
    ///
    /// Called at most once per pass with the full batch. Nodes that already
    /// have the attributes must be left untouched.
    fn request_result_attributes(&self, nodes: &[NodeId]);

    /// Applies pending structural changes, if the store applies them
    /// eagerly. Stores that defer to their own tick boundary keep the
    /// default no-op and the nodes are written on the next pass.
    fn flush_structural_changes(&mut self) {}

    /// Overwrites the node's world transform. Returns `false` if the node
    /// does not carry the attribute.
    fn set_world_transform(&mut self, node: NodeId, value: WorldTransform) -> bool;

    /// Overwrites the node's world rotation. Returns `false` if the node
    /// does not carry the attribute.
    fn set_world_rotation(&mut self, node: NodeId, value: WorldRotation) -> bool;
}
