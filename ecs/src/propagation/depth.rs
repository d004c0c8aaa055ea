use std::collections::TryReserveError;

use fixedbitset::FixedBitSet;

use super::grow_slots;
use crate::NodeId;
use crate::error::PropagationError;
use crate::storage::TransformStorage;

/// Nodes grouped by hierarchy depth, plus each node's resolved parent.
///
/// `buckets[d]` holds every participating node whose parent chain has
/// exactly `d` hops. Bucket vectors keep their allocation across ticks.
///
/// Depths are memoized per pass: a chain is walked only up to the first
/// ancestor whose depth is already known, and every node passed on the way
/// is classified by the same walk. A pass therefore visits each parent link
/// once regardless of enumeration order.
pub(crate) struct DepthBuckets {
    buckets: Vec<Vec<NodeId>>,
    /// Buckets populated this tick; entries past this are empty.
    used: usize,
    /// Direct parent index per node slot, `0` for none.
    pub(crate) parent_of: Vec<u32>,
    depth_of: Vec<u32>,
    /// Slots whose `depth_of` is valid this pass.
    known: FixedBitSet,
    /// Nodes and parent indices of the chain being walked, deepest first.
    path: Vec<(NodeId, u32)>,
}

impl DepthBuckets {
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            used: 0,
            parent_of: Vec::new(),
            depth_of: Vec::new(),
            known: FixedBitSet::new(),
            path: Vec::new(),
        }
    }

    /// Grows the per-slot tables to `capacity` slots. Never shrinks.
    pub fn grow(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        grow_slots(&mut self.parent_of, capacity, 0)?;
        grow_slots(&mut self.depth_of, capacity, 0)?;
        self.known.grow(capacity);
        Ok(())
    }

    /// Empties every bucket, keeping their allocations.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets[..self.used] {
            bucket.clear();
        }
        self.used = 0;
    }

    /// Number of populated depth levels.
    pub fn depth_count(&self) -> usize {
        self.used
    }

    /// Places every node in the bucket matching its depth.
    ///
    /// Ancestors outside `participating` still count towards depth but are
    /// not bucketed. A chain longer than `max_hops` can only be a cycle and
    /// aborts the classification. So does a parent handle outside the table.
    pub fn classify<S: TransformStorage + ?Sized>(
        &mut self,
        nodes: &[NodeId],
        participating: &FixedBitSet,
        storage: &S,
        max_hops: u64,
    ) -> Result<(), PropagationError> {
        self.clear();
        self.known.clear();
        for &node in nodes {
            if !self.known.contains(node.index() as usize) {
                self.classify_chain(node, participating, storage, max_hops)?;
            }
        }
        Ok(())
    }

    fn classify_chain<S: TransformStorage + ?Sized>(
        &mut self,
        node: NodeId,
        participating: &FixedBitSet,
        storage: &S,
        max_hops: u64,
    ) -> Result<(), PropagationError> {
        let capacity = self.parent_of.len();
        self.path.clear();

        let mut cursor = node;
        let top_depth = loop {
            let parent = storage.parent(cursor).filter(|p| p.is_some());
            self.path.push((cursor, parent.map_or(0, NodeId::index)));
            let Some(parent) = parent else {
                break 0;
            };
            let slot = parent.index() as usize;
            if slot >= capacity {
                return Err(PropagationError::HandleOutOfRange {
                    node: parent,
                    capacity,
                });
            }
            if self.known.contains(slot) {
                break self.depth_of[slot] + 1;
            }
            if parent == node || self.path.len() as u64 > max_hops {
                return Err(PropagationError::CyclicHierarchy { node });
            }
            cursor = parent;
        };

        let top = self.path.len() - 1;
        for (i, &(entry, parent)) in self.path.iter().enumerate() {
            let slot = entry.index() as usize;
            let depth = top_depth + (top - i) as u32;
            self.depth_of[slot] = depth;
            self.known.insert(slot);
            if !participating.contains(slot) {
                continue;
            }

            self.parent_of[slot] = parent;
            let depth = depth as usize;
            if depth >= self.buckets.len() {
                self.buckets.resize_with(depth + 1, Vec::new);
            }
            self.buckets[depth].push(entry);
            self.used = self.used.max(depth + 1);
        }
        Ok(())
    }

    /// Nodes at `depth`, in classification order.
    pub fn bucket(&self, depth: usize) -> &[NodeId] {
        &self.buckets[depth]
    }

    /// Clears a single bucket once it has been processed.
    pub fn clear_bucket(&mut self, depth: usize) {
        self.buckets[depth].clear();
    }

    /// Marks every bucket as consumed after the last one was cleared.
    pub fn finish(&mut self) {
        self.used = 0;
    }
}
