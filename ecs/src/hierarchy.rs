//! Parent-child links between nodes.
//!
//! A node's [`Parent`] is the only link propagation reads. [`Children`] is
//! kept as its mirror so that despawning a node can find and release every
//! node that points at it. Handles are reused without generations, so a
//! stale [`Parent`] would silently attach a child to whatever node is
//! spawned into the freed slot next. [`World::despawn`] therefore clears
//! both sides of every link the node takes part in.
//!
//! Cycles are not rejected here. Transform propagation reports them.
//!
//! ```ignore
//! set_parent(&mut world, child, parent);
//! remove_parent(&mut world, child);
//! despawn_recursive(&mut world, node);
//!
//! // Deferred
//! world.commands().cmd_set_parent(child, parent);
//! world.apply_commands();
//! ```

use crate::components::{Children, Parent};
use crate::{CommandBuffer, NodeId, World};

/// Resolves `node` against `parent` from the next pass on.
///
/// Moves `node` out of its previous parent's children. Setting the parent
/// it already has is a no-op.
///
/// # Panics
///
/// Panics if `node == parent` or if either node is dead. Nothing is
/// modified in that case.
pub fn set_parent(world: &mut World, node: NodeId, parent: NodeId) {
    assert_ne!(node, parent, "Cannot set node as its own parent: {node}");
    assert!(world.is_alive(node), "Cannot set parent of dead node {node}");
    assert!(
        world.is_alive(parent),
        "Cannot attach {node} to dead parent {parent}"
    );

    if world.get::<Parent>(node).map(|p| p.node()) == Some(parent) {
        return;
    }

    detach(world, node);
    world.insert(node, Parent(parent));
    match world.get_mut::<Children>(parent) {
        Some(children) => {
            children.attach(node);
        }
        None => {
            world.insert(parent, Children(vec![node]));
        }
    }
}

/// Makes `node` a root. Does nothing if it has no parent.
pub fn remove_parent(world: &mut World, node: NodeId) {
    detach(world, node);
}

/// Despawns `node` and every node below it. Returns how many were despawned.
///
/// `node` is detached from its own parent first, so the survivors above it
/// never list a freed handle.
pub fn despawn_recursive(world: &mut World, node: NodeId) -> usize {
    if !world.is_alive(node) {
        return 0;
    }
    detach(world, node);

    let mut despawned = 0;
    let mut pending = vec![node];
    while let Some(next) = pending.pop() {
        pending.extend(release_children(world, next));
        if world.despawn(next) {
            despawned += 1;
        }
    }
    despawned
}

/// Clears every hierarchy link to and from `node`.
///
/// Its parent forgets it and each of its children becomes a root.
pub(crate) fn unlink(world: &mut World, node: NodeId) {
    detach(world, node);
    release_children(world, node);
}

/// Removes `node` from its parent's children and drops its [`Parent`].
fn detach(world: &mut World, node: NodeId) -> Option<NodeId> {
    let parent = world.remove::<Parent>(node)?.node();
    if let Some(children) = world.get_mut::<Children>(parent) {
        children.detach(node);
    }
    Some(parent)
}

/// Takes `node`'s children and drops their [`Parent`] links.
fn release_children(world: &mut World, node: NodeId) -> Vec<NodeId> {
    let children = world
        .remove::<Children>(node)
        .map(|c| c.0)
        .unwrap_or_default();
    for &child in &children {
        if world.get::<Parent>(child).map(|p| p.node()) == Some(node) {
            world.remove::<Parent>(child);
        }
    }
    children
}

/// Hierarchy operations queued on a [`CommandBuffer`].
pub trait HierarchyCommands {
    fn cmd_set_parent(&self, node: NodeId, parent: NodeId);
    fn cmd_remove_parent(&self, node: NodeId);
    fn cmd_despawn_recursive(&self, node: NodeId);
}

impl HierarchyCommands for CommandBuffer {
    fn cmd_set_parent(&self, node: NodeId, parent: NodeId) {
        self.push(move |world| set_parent(world, node, parent));
    }

    fn cmd_remove_parent(&self, node: NodeId) {
        self.push(move |world| remove_parent(world, node));
    }

    fn cmd_despawn_recursive(&self, node: NodeId) {
        self.push(move |world| {
            despawn_recursive(world, node);
        });
    }
}
