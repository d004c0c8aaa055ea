use crate::NodeId;
use crate::storage::TransformStorage;

/// Collects nodes missing result attributes and requests them in one batch.
pub(crate) struct Reconciler {
    pending: Vec<NodeId>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Issues a single structural request covering every node in `nodes`
    /// that lacks a result attribute. Returns how many nodes were requested.
    pub fn reconcile<S: TransformStorage + ?Sized>(
        &mut self,
        nodes: &[NodeId],
        storage: &mut S,
    ) -> usize {
        self.pending.clear();
        self.pending.extend(
            nodes
                .iter()
                .copied()
                .filter(|&node| !storage.has_result_attributes(node)),
        );

        let requested = self.pending.len();
        if requested > 0 {
            log::debug!("requesting result attributes for {requested} nodes");
            storage.request_result_attributes(&self.pending);
            storage.flush_structural_changes();
            self.pending.clear();
        }
        requested
    }
}
