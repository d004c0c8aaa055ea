use std::collections::TryReserveError;

use fixedbitset::FixedBitSet;
use trellis_core::math::{
    Mat4, Quat, Vec3, mat4_from_scale_translation, mat4_from_translation, scale_of, translation_of,
};

use super::cache::AttributeCache;
use super::compose::compose_local;
use super::depth::DepthBuckets;
use super::grow_slots;
use crate::components::Anchor;

/// Resolved world state per node slot, valid after a completed pass.
pub(crate) struct Resolved {
    pub(crate) world: Vec<Mat4>,
    pub(crate) rotation: Vec<Quat>,
}

impl Resolved {
    pub fn new() -> Self {
        Self {
            world: Vec::new(),
            rotation: Vec::new(),
        }
    }

    pub fn grow(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        grow_slots(&mut self.world, capacity, Mat4::IDENTITY)?;
        grow_slots(&mut self.rotation, capacity, Quat::IDENTITY)
    }

    pub fn reset(&mut self) {
        self.world.fill(Mat4::IDENTITY);
        self.rotation.fill(Quat::IDENTITY);
    }
}

/// Resolves every classified node, shallowest depth first.
///
/// Parents always sit in a lower bucket than their children, so a parent's
/// slot in `resolved` is final by the time any child reads it. Each bucket
/// is cleared as soon as it has been consumed.
pub(crate) fn propagate(
    cache: &AttributeCache,
    buckets: &mut DepthBuckets,
    participating: &FixedBitSet,
    resolved: &mut Resolved,
) {
    for depth in 0..buckets.depth_count() {
        for &node in buckets.bucket(depth) {
            let slot = node.index() as usize;
            let local = compose_local(cache, slot);
            let parent = buckets.parent_of[slot] as usize;

            if parent == 0 || !participating.contains(parent) {
                // No parent frame: anchor and deferred pivot do not apply.
                resolved.world[slot] = local.local_to_parent;
                resolved.rotation[slot] = local.rotation;
                continue;
            }

            let parent_world = resolved.world[parent];
            let parent_rotation = resolved.rotation[parent];

            resolved.world[slot] = if cache.has_anchor.contains(slot) {
                let world = anchor_frame(&cache.anchors[slot], &parent_world) * local.local_to_parent;
                let pivot_offset = cache.pivots[slot] * scale_of(&world);
                mat4_from_translation(-pivot_offset) * world
            } else {
                parent_world * local.local_to_parent
            };
            resolved.rotation[slot] = (parent_rotation * local.rotation).normalize();
        }
        buckets.clear_bucket(depth);
    }
    buckets.finish();
}

/// The box an anchor carves out of its parent, as a scale-then-translate frame.
fn anchor_frame(anchor: &Anchor, parent_world: &Mat4) -> Mat4 {
    let parent_position = translation_of(parent_world);
    let parent_size = scale_of(parent_world);
    let min_edges = anchor.min();
    let max_edges = anchor.max();

    let mut offset = Vec3::ZERO;
    let mut extent = Vec3::ONE;
    for axis in 0..3 {
        let size = parent_size[axis];
        let min = min_edges[axis].resolve_min(size);
        let max = max_edges[axis].resolve_max(size);
        let span = max - min;
        offset[axis] = min;
        extent[axis] = if span == 0.0 { 1.0 } else { span };
    }

    mat4_from_scale_translation(extent, parent_position + offset)
}
