/// Typed sparse set storing one value of type `T` per node.
///
/// Uses a sparse array (node index → dense index) and a dense array
/// (contiguous values + node mapping) for O(1) insert/remove/get and
/// cache-friendly iteration.
pub struct SparseSet<T> {
    /// Sparse array: `node_index -> dense_index`. `None` means the node
    /// does not carry this value.
    sparse: Vec<Option<u32>>,
    /// Dense array of values (contiguous for iteration).
    dense: Vec<T>,
    /// Node indices corresponding to each dense element.
    indices: Vec<u32>,
}

impl<T> SparseSet<T> {
    /// Creates a new empty sparse set.
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Inserts a value for the given node index, returning the previous one.
    pub fn insert(&mut self, index: u32, value: T) -> Option<T> {
        let idx = index as usize;

        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }

        if let Some(dense_idx) = self.sparse[idx] {
            Some(std::mem::replace(&mut self.dense[dense_idx as usize], value))
        } else {
            self.sparse[idx] = Some(self.dense.len() as u32);
            self.dense.push(value);
            self.indices.push(index);
            None
        }
    }

    /// Removes the value for the given node index.
    pub fn remove(&mut self, index: u32) -> Option<T> {
        let idx = index as usize;
        let dense_idx = (*self.sparse.get(idx)?)? as usize;
        self.sparse[idx] = None;

        let last_dense = self.dense.len() - 1;
        if dense_idx != last_dense {
            // Swap-remove: move last element into the removed slot
            let swapped = self.indices[last_dense];
            self.sparse[swapped as usize] = Some(dense_idx as u32);
            self.indices[dense_idx] = swapped;
        }

        self.indices.pop();
        Some(self.dense.swap_remove(dense_idx))
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        let dense_idx = (*self.sparse.get(index as usize)?)? as usize;
        Some(&self.dense[dense_idx])
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        let dense_idx = (*self.sparse.get(index as usize)?)? as usize;
        Some(&mut self.dense[dense_idx])
    }

    pub fn contains(&self, index: u32) -> bool {
        matches!(self.sparse.get(index as usize), Some(Some(_)))
    }

    /// Returns the number of values stored.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Iterates over `(node_index, &value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.indices.iter().copied().zip(self.dense.iter())
    }

    /// Node indices in dense order.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Values in dense order, parallel to [`indices`](SparseSet::indices).
    pub fn values(&self) -> &[T] {
        &self.dense
    }
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
