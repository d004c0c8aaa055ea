/// A dense node handle.
///
/// Handles are plain `u32` slot indices. Index `0` is reserved as the
/// [`NONE`](NodeId::NONE) sentinel meaning "no node" (for example, "no
/// parent"), so a live node always has a non-zero index.
///
/// Handles are reused after a node is despawned; they carry no generation.
/// Scratch buffers sized by [`World::max_live_handle`](crate::World::max_live_handle)
/// can be indexed by `index() as usize` directly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel handle: no node.
    pub const NONE: Self = Self(0);

    /// Creates a handle from a raw slot index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the slot index of this node.
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns `true` for the [`NONE`](NodeId::NONE) sentinel.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` for any handle other than the sentinel.
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Allocates and recycles node handles.
///
/// Slot 0 is never handed out. Despawned slots go onto a LIFO free list
/// and are reused by the next spawn.
pub(crate) struct NodeAllocator {
    /// Alive flag per slot. Index = node index; slot 0 is the sentinel.
    alive: Vec<bool>,
    /// Free list of recyclable indices (LIFO stack).
    free_list: Vec<u32>,
    /// Total number of currently alive nodes.
    count: u32,
}

impl NodeAllocator {
    /// Creates a new empty allocator.
    pub fn new() -> Self {
        Self {
            alive: vec![false],
            free_list: Vec::new(),
            count: 0,
        }
    }

    /// Allocates a node handle, reusing a freed slot if available.
    pub fn allocate(&mut self) -> NodeId {
        self.count += 1;
        if let Some(index) = self.free_list.pop() {
            self.alive[index as usize] = true;
            NodeId(index)
        } else {
            let index = u32::try_from(self.alive.len())
                .unwrap_or_else(|_| panic!("node handle space exhausted"));
            self.alive.push(true);
            NodeId(index)
        }
    }

    /// Frees a node handle. Returns `false` if it was not alive.
    pub fn free(&mut self, node: NodeId) -> bool {
        if !self.is_alive(node) {
            return false;
        }
        self.alive[node.0 as usize] = false;
        self.free_list.push(node.0);
        self.count -= 1;
        true
    }

    /// Returns whether the handle refers to a live node.
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.alive.get(node.0 as usize).copied().unwrap_or(false)
    }

    /// Number of currently alive nodes.
    pub fn len(&self) -> u32 {
        self.count
    }

    /// Highest slot index ever handed out (0 when nothing was spawned).
    pub fn max_handle(&self) -> u32 {
        (self.alive.len() - 1) as u32
    }

    /// Iterates over all live handles in slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(index, _)| NodeId(index as u32))
    }
}

impl Default for NodeAllocator {
    fn default() -> Self {
        Self::new()
    }
}
