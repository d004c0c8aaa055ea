use std::collections::TryReserveError;

use fixedbitset::FixedBitSet;
use trellis_core::math::{EulerRot, Quat, Vec3, quat_from_euler};

use super::grow_slots;
use crate::components::Anchor;
use crate::storage::{LocalAttribute, TransformStorage};

/// Dense, handle-indexed copies of every node's local attributes.
///
/// Slots for nodes without an attribute hold that attribute's identity
/// default, so the composer never branches on presence except for anchors.
pub(crate) struct AttributeCache {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) scales: Vec<Vec3>,
    pub(crate) rotations: Vec<Quat>,
    /// Euler angles, already converted to quaternions.
    pub(crate) eulers: Vec<Quat>,
    pub(crate) pivots: Vec<Vec3>,
    pub(crate) anchors: Vec<Anchor>,
    pub(crate) has_anchor: FixedBitSet,
}

impl AttributeCache {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            scales: Vec::new(),
            rotations: Vec::new(),
            eulers: Vec::new(),
            pivots: Vec::new(),
            anchors: Vec::new(),
            has_anchor: FixedBitSet::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    /// Grows every buffer to `capacity` slots. Never shrinks.
    ///
    /// Each buffer is grown on its own, so a call after a failed one picks
    /// up where it stopped.
    pub fn grow(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        grow_slots(&mut self.positions, capacity, Vec3::ZERO)?;
        grow_slots(&mut self.scales, capacity, Vec3::ONE)?;
        grow_slots(&mut self.rotations, capacity, Quat::IDENTITY)?;
        grow_slots(&mut self.eulers, capacity, Quat::IDENTITY)?;
        grow_slots(&mut self.pivots, capacity, Vec3::ZERO)?;
        grow_slots(&mut self.anchors, capacity, Anchor::default())?;
        self.has_anchor.grow(capacity);
        Ok(())
    }

    /// Restores every slot to its default without releasing memory.
    pub fn reset(&mut self) {
        self.positions.fill(Vec3::ZERO);
        self.scales.fill(Vec3::ONE);
        self.rotations.fill(Quat::IDENTITY);
        self.eulers.fill(Quat::IDENTITY);
        self.pivots.fill(Vec3::ZERO);
        self.has_anchor.clear();
    }

    /// Copies every present attribute from `storage` into its slot.
    ///
    /// Handles beyond the current capacity are skipped and keep defaults.
    pub fn load<S: TransformStorage + ?Sized>(&mut self, storage: &S, euler_order: EulerRot) {
        let capacity = self.capacity();
        let mut skipped = 0usize;
        storage.visit_local_attributes(&mut |node, attribute| {
            let slot = node.index() as usize;
            if slot >= capacity {
                skipped += 1;
                return;
            }
            match attribute {
                LocalAttribute::Position(v) => self.positions[slot] = v,
                LocalAttribute::Scale(v) => self.scales[slot] = v,
                LocalAttribute::Rotation(q) => self.rotations[slot] = q,
                LocalAttribute::EulerAngles(v) => self.eulers[slot] = quat_from_euler(euler_order, v),
                LocalAttribute::Pivot(v) => self.pivots[slot] = v,
                LocalAttribute::Anchor(a) => {
                    self.anchors[slot] = a;
                    self.has_anchor.insert(slot);
                }
            }
        });
        if skipped > 0 {
            log::debug!("attribute cache skipped {skipped} values outside capacity {capacity}");
        }
    }
}
