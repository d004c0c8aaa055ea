use parking_lot::Mutex;

use crate::NodeId;
use crate::world::{Component, World};

/// A boxed command closure that mutates the world.
pub type Command = Box<dyn FnOnce(&mut World) + Send>;

/// A boxed insert closure that inserts a component on a specific node.
type InsertFn = Box<dyn FnOnce(&mut World, NodeId) + Send>;

/// A thread-safe buffer for deferred world mutations.
///
/// Anything holding `&World` can queue structural changes here. They are
/// applied in order by [`World::apply_commands`].
///
/// # Example
///
/// ```ignore
/// world.commands().spawn_node()
///     .with(Position(Vec3::X))
///     .with(Scale::uniform(2.0))
///     .build();
///
/// world.apply_commands();
/// ```
pub struct CommandBuffer {
    commands: Mutex<Vec<Command>>,
}

impl CommandBuffer {
    /// Creates a new empty command buffer.
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Queues a raw command closure.
    ///
    /// The closure will receive `&mut World` when `apply_commands` is called.
    pub fn push(&self, cmd: impl FnOnce(&mut World) + Send + 'static) {
        self.commands.lock().push(Box::new(cmd));
    }

    /// Queues a node despawn.
    pub fn despawn(&self, node: NodeId) {
        self.push(move |world| {
            world.despawn(node);
        });
    }

    /// Queues a component insertion on a node.
    pub fn insert<T: Component>(&self, node: NodeId, component: T) {
        self.push(move |world| {
            if world.is_alive(node) {
                world.insert(node, component);
            }
        });
    }

    /// Queues a component removal from a node.
    pub fn remove<T: Component>(&self, node: NodeId) {
        self.push(move |world| {
            world.remove::<T>(node);
        });
    }

    /// Begins building a spawn command that creates a transform node.
    pub fn spawn_node(&self) -> SpawnBuilder<'_> {
        SpawnBuilder {
            buffer: self,
            inserts: Vec::new(),
        }
    }

    /// Drains all queued commands, returning them.
    pub fn drain(&self) -> Vec<Command> {
        std::mem::take(&mut *self.commands.lock())
    }

    /// Returns the number of queued commands.
    pub fn len(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.lock().is_empty()
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for spawning a transform node with multiple components.
///
/// Created by [`CommandBuffer::spawn_node`]. The node is spawned and every
/// component is inserted in a single command when [`build`](SpawnBuilder::build)
/// is called.
pub struct SpawnBuilder<'a> {
    buffer: &'a CommandBuffer,
    inserts: Vec<InsertFn>,
}

impl SpawnBuilder<'_> {
    /// Adds a component to the node being built.
    pub fn with<T: Component>(mut self, component: T) -> Self {
        self.inserts.push(Box::new(move |world, node| {
            world.insert(node, component);
        }));
        self
    }

    /// Finalizes the builder, queuing the spawn command.
    pub fn build(self) {
        let inserts = self.inserts;
        self.buffer.push(move |world| {
            let node = world.spawn_node();
            for insert_fn in inserts {
                insert_fn(world, node);
            }
        });
    }
}
