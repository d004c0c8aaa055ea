//! Depth-ordered transform propagation.
//!
//! [`TransformPropagation`] resolves every transform node's world transform
//! and world rotation once per call to [`run`](TransformPropagation::run):
//!
//! 1. grow scratch buffers to cover the store's handle range
//! 2. reset the attribute cache and load every present local attribute
//! 3. bucket nodes by parent-chain depth
//! 4. request missing result attributes in a single batch
//! 5. compose and propagate, root depth first
//! 6. write results back to the store
//!
//! All scratch state is owned by the kernel, indexed directly by node handle
//! and reused across passes. Nothing is written to the store until every node
//! has been resolved, so a pass that fails leaves previous results intact.

mod cache;
mod compose;
mod depth;
mod propagate;
mod reconcile;
mod writer;

use std::collections::TryReserveError;

use fixedbitset::FixedBitSet;
use trellis_core::math::EulerRot;
use trellis_core::{profile_plot, profile_scope};

use crate::NodeId;
use crate::components::{WorldRotation, WorldTransform};
use crate::error::PropagationError;
use crate::storage::TransformStorage;

use cache::AttributeCache;
use depth::DepthBuckets;
use propagate::Resolved;
use reconcile::Reconciler;

/// Tuning knobs for [`TransformPropagation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationSettings {
    /// Axis order used to turn [`EulerAngles`](crate::components::EulerAngles)
    /// into a quaternion.
    pub euler_order: EulerRot,
    /// Handle range to allocate scratch space for up front.
    pub initial_capacity: u32,
    /// Largest number of handle slots the scratch buffers may grow to.
    /// A store whose handle range needs more fails with
    /// [`PropagationError::CapacityOverflow`].
    pub max_capacity: usize,
}

/// Default for [`PropagationSettings::max_capacity`], about 16.7 million slots.
pub const DEFAULT_MAX_CAPACITY: usize = 1 << 24;

impl Default for PropagationSettings {
    fn default() -> Self {
        Self {
            euler_order: EulerRot::XYZ,
            initial_capacity: 0,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// Counters from one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Transform nodes resolved.
    pub nodes: usize,
    /// Distinct hierarchy depths (0 when there were no nodes).
    pub depth_levels: usize,
    /// Nodes for which result attributes were requested.
    pub attributes_requested: usize,
    /// Nodes whose result attributes were written.
    pub written: usize,
}

/// The transform propagation kernel.
///
/// Holds only scratch state; the hierarchy itself lives in the
/// [`TransformStorage`] passed to [`run`](TransformPropagation::run).
pub struct TransformPropagation {
    settings: PropagationSettings,
    capacity: usize,
    cache: AttributeCache,
    buckets: DepthBuckets,
    resolved: Resolved,
    reconciler: Reconciler,
    /// Transform nodes enumerated this pass, in enumeration order.
    nodes: Vec<NodeId>,
    participating: FixedBitSet,
    last_pass_complete: bool,
}

impl TransformPropagation {
    /// Creates a kernel with default settings.
    pub fn new() -> Self {
        Self::with_settings(PropagationSettings::default())
    }

    /// Creates a kernel with explicit settings.
    pub fn with_settings(settings: PropagationSettings) -> Self {
        let mut kernel = Self {
            settings,
            capacity: 0,
            cache: AttributeCache::new(),
            buckets: DepthBuckets::new(),
            resolved: Resolved::new(),
            reconciler: Reconciler::new(),
            nodes: Vec::new(),
            participating: FixedBitSet::new(),
            last_pass_complete: false,
        };
        if settings.initial_capacity > 0
            && let Err(err) = kernel.ensure_capacity(settings.initial_capacity)
        {
            log::warn!("transform scratch not preallocated, growing on first pass: {err}");
        }
        kernel
    }

    /// The active settings.
    pub fn settings(&self) -> &PropagationSettings {
        &self.settings
    }

    /// Number of handle slots currently allocated in every scratch buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Runs one full pass over `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError`] for a cyclic parent chain, a handle
    /// range that cannot be allocated, or a store reporting handles above
    /// its own `max_live_handle`. No results are written in that case.
    pub fn run<S: TransformStorage + ?Sized>(
        &mut self,
        storage: &mut S,
    ) -> Result<PassStats, PropagationError> {
        profile_scope!("transform_propagation");

        self.last_pass_complete = false;
        let result = self.run_pass(storage);
        match &result {
            Ok(stats) => {
                self.last_pass_complete = true;
                profile_plot!("transform_nodes", stats.nodes);
                log::trace!(
                    "transform pass: {} nodes over {} levels, {} requested, {} written",
                    stats.nodes,
                    stats.depth_levels,
                    stats.attributes_requested,
                    stats.written
                );
            }
            Err(err) => {
                self.buckets.clear();
                log::error!("transform propagation aborted: {err}");
            }
        }
        result
    }

    /// World transform resolved for `node` by the last completed pass.
    pub fn world_transform(&self, node: NodeId) -> Option<WorldTransform> {
        self.resolved_slot(node)
            .map(|slot| WorldTransform(self.resolved.world[slot]))
    }

    /// World rotation resolved for `node` by the last completed pass.
    pub fn world_rotation(&self, node: NodeId) -> Option<WorldRotation> {
        self.resolved_slot(node)
            .map(|slot| WorldRotation(self.resolved.rotation[slot]))
    }

    fn resolved_slot(&self, node: NodeId) -> Option<usize> {
        let slot = node.index() as usize;
        (self.last_pass_complete && node.is_some() && self.participating.contains(slot))
            .then_some(slot)
    }

    fn run_pass<S: TransformStorage + ?Sized>(
        &mut self,
        storage: &mut S,
    ) -> Result<PassStats, PropagationError> {
        let max_live_handle = storage.max_live_handle();
        self.ensure_capacity(max_live_handle)?;

        self.cache.reset();
        self.resolved.reset();
        self.collect_nodes(&*storage)?;

        {
            profile_scope!("transform_cache_load");
            self.cache.load(&*storage, self.settings.euler_order);
        }
        {
            profile_scope!("transform_classify");
            self.buckets.classify(
                &self.nodes,
                &self.participating,
                &*storage,
                u64::from(max_live_handle),
            )?;
        }
        let depth_levels = self.buckets.depth_count();

        let attributes_requested = self.reconciler.reconcile(&self.nodes, storage);

        {
            profile_scope!("transform_propagate");
            propagate::propagate(
                &self.cache,
                &mut self.buckets,
                &self.participating,
                &mut self.resolved,
            );
        }

        let written = {
            profile_scope!("transform_write");
            writer::write_results(&self.nodes, &self.resolved, storage)
        };

        Ok(PassStats {
            nodes: self.nodes.len(),
            depth_levels,
            attributes_requested,
            written,
        })
    }

    /// Enumerates transform nodes once each, marking them as participating.
    fn collect_nodes<S: TransformStorage + ?Sized>(
        &mut self,
        storage: &S,
    ) -> Result<(), PropagationError> {
        self.nodes.clear();
        self.participating.clear();

        let capacity = self.capacity;
        let nodes = &mut self.nodes;
        let participating = &mut self.participating;
        let mut out_of_range = None;

        storage.visit_transform_nodes(&mut |batch| {
            for &node in batch {
                let slot = node.index() as usize;
                if node.is_none() {
                    continue;
                }
                if slot >= capacity {
                    out_of_range.get_or_insert(node);
                    continue;
                }
                if !participating.put(slot) {
                    nodes.push(node);
                }
            }
        });

        match out_of_range {
            Some(node) => Err(PropagationError::HandleOutOfRange { node, capacity }),
            None => Ok(()),
        }
    }

    /// Grows every scratch buffer to the next power of two above
    /// `max_live_handle`, clamped to `max_capacity`. Never shrinks.
    ///
    /// `self.capacity` only moves once every buffer has grown, so a failed
    /// allocation is retried in full by the next pass.
    fn ensure_capacity(&mut self, max_live_handle: u32) -> Result<(), PropagationError> {
        let requested = u64::from(max_live_handle) + 1;
        let overflow = PropagationError::CapacityOverflow { requested };
        let limit = u64::try_from(self.settings.max_capacity).unwrap_or(u64::MAX);
        if requested > limit {
            return Err(overflow);
        }
        let capacity = requested
            .checked_next_power_of_two()
            .map_or(limit, |c| c.min(limit));
        let capacity = usize::try_from(capacity).map_err(|_| overflow.clone())?;

        if capacity > self.capacity {
            log::debug!(
                "growing transform scratch buffers from {} to {capacity} slots",
                self.capacity
            );
            self.cache
                .grow(capacity)
                .and_then(|()| self.buckets.grow(capacity))
                .and_then(|()| self.resolved.grow(capacity))
                .map_err(|_| overflow)?;
            self.participating.grow(capacity);
            self.capacity = capacity;
        }
        Ok(())
    }
}

/// Resizes `buffer` to `capacity` slots filled with `fill`, reporting an
/// allocation failure instead of aborting.
fn grow_slots<T: Clone>(
    buffer: &mut Vec<T>,
    capacity: usize,
    fill: T,
) -> Result<(), TryReserveError> {
    if capacity > buffer.len() {
        buffer.try_reserve_exact(capacity - buffer.len())?;
        buffer.resize(capacity, fill);
    }
    Ok(())
}

impl Default for TransformPropagation {
    fn default() -> Self {
        Self::new()
    }
}
