//! # Trellis ECS
//!
//! Hierarchical transform propagation over a pluggable node store.
//!
//! ## Kernel
//!
//! - [`TransformPropagation`]: Resolves world transforms and rotations once per tick
//! - [`PropagationSettings`]: Euler order, scratch pre-allocation and its ceiling
//! - [`PassStats`]: Counters from a completed pass
//! - [`PropagationError`]: Faults that abort a pass before anything is written
//!
//! ## Storage Boundary
//!
//! - [`TransformStorage`]: Capabilities the kernel needs from any entity store
//! - [`AttributeKind`] / [`LocalAttribute`]: Typed access to local attributes
//!
//! ## Reference Store
//!
//! - [`World`]: Sparse-set node store implementing [`TransformStorage`]
//! - [`CommandBuffer`]: Deferred structural changes
//! - [`hierarchy`]: Parent-child helpers that keep [`Parent`](components::Parent)
//!   and [`Children`](components::Children) consistent
//! - [`run_transform_systems`]: Applies commands, then runs one pass

mod commands;
pub mod components;
mod error;
pub mod hierarchy;
mod node;
pub mod propagation;
mod sparse_set;
pub mod storage;
pub mod systems;
mod world;

pub use commands::{Command, CommandBuffer, SpawnBuilder};
pub use error::PropagationError;
pub use hierarchy::{HierarchyCommands, despawn_recursive, remove_parent, set_parent};
pub use node::NodeId;
pub use propagation::{DEFAULT_MAX_CAPACITY, PassStats, PropagationSettings, TransformPropagation};
pub use sparse_set::SparseSet;
pub use storage::{AttributeKind, LocalAttribute, TransformStorage};
pub use systems::run_transform_systems;
pub use world::{Component, World};
