use thiserror::Error;

use crate::NodeId;

/// Faults that abort a propagation pass.
///
/// These indicate broken hierarchy data or a store that violates its
/// contract. No result attributes are written by a pass that fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropagationError {
    /// Walking the parent chain of `node` did not reach a root.
    #[error("cyclic parent chain detected at {node}")]
    CyclicHierarchy { node: NodeId },

    /// The scratch capacity needed for `requested` handles is not representable.
    #[error("cannot grow scratch buffers to hold {requested} node handles")]
    CapacityOverflow { requested: u64 },

    /// A store reported a handle above its own `max_live_handle`.
    #[error("{node} is outside the scratch capacity of {capacity}")]
    HandleOutOfRange { node: NodeId, capacity: usize },
}
