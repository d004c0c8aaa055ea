use trellis_core::math::{Mat4, Quat, mat4_from_scale_rotation_translation};

use super::cache::AttributeCache;

/// A node's pose relative to its parent frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LocalPose {
    /// Scale, then rotation, then pivot-adjusted translation.
    pub local_to_parent: Mat4,
    /// Euler rotation followed by the explicit rotation.
    pub rotation: Quat,
}

/// Composes the local pose of the node in `slot`.
///
/// The pivot is applied here only for nodes without an anchor. Anchored
/// nodes get their pivot once the anchor box, and with it their real world
/// scale, is known.
pub(crate) fn compose_local(cache: &AttributeCache, slot: usize) -> LocalPose {
    let scale = cache.scales[slot];
    let rotation = (cache.eulers[slot] * cache.rotations[slot]).normalize();

    let mut translation = cache.positions[slot];
    if !cache.has_anchor.contains(slot) {
        translation -= cache.pivots[slot] * scale;
    }

    LocalPose {
        local_to_parent: mat4_from_scale_rotation_translation(scale, rotation, translation),
        rotation,
    }
}
