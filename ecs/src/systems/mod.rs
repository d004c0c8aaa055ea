//! Per-tick entry points that drive the kernel over a [`World`](crate::World).
//!
//! - [`transform_propagation`]: resolves world transforms after pending
//!   commands have been applied
//!
//! # Running Systems
//!
//! ```
//! use trellis_ecs::{TransformPropagation, World, run_transform_systems};
//!
//! let mut world = World::new();
//! let mut propagation = TransformPropagation::new();
//! world.spawn_node();
//! run_transform_systems(&mut world, &mut propagation).unwrap();
//! ```

mod transform_propagation;

pub use transform_propagation::run_transform_systems;
