use crate::NodeId;
use crate::components::{WorldRotation, WorldTransform};
use crate::storage::TransformStorage;

use super::propagate::Resolved;

/// Publishes resolved values to every node that carries the result
/// attributes. Returns the number of nodes written.
pub(crate) fn write_results<S: TransformStorage + ?Sized>(
    nodes: &[NodeId],
    resolved: &Resolved,
    storage: &mut S,
) -> usize {
    let mut written = 0;
    for &node in nodes {
        if !storage.has_result_attributes(node) {
            continue;
        }
        let slot = node.index() as usize;
        storage.set_world_transform(node, WorldTransform(resolved.world[slot]));
        storage.set_world_rotation(node, WorldRotation(resolved.rotation[slot]));
        written += 1;
    }
    written
}
