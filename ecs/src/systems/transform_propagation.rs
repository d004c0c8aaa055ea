//! Transform propagation for hierarchy-based transforms.
//!
//! Applies queued structural commands, then runs one
//! [`TransformPropagation`] pass so that [`WorldTransform`] and
//! [`WorldRotation`] reflect the hierarchy as of this tick.
//!
//! [`WorldTransform`]: crate::components::WorldTransform
//! [`WorldRotation`]: crate::components::WorldRotation

use crate::error::PropagationError;
use crate::propagation::{PassStats, TransformPropagation};
use crate::world::World;

/// Runs the transform systems once.
///
/// Commands queued on the world's [`CommandBuffer`](crate::CommandBuffer)
/// are applied first so newly spawned or reparented nodes are resolved in
/// the same tick.
///
/// # Errors
///
/// Propagates [`PropagationError`] from the pass. The world's results are
/// left as they were before the call.
pub fn run_transform_systems(
    world: &mut World,
    propagation: &mut TransformPropagation,
) -> Result<PassStats, PropagationError> {
    world.apply_commands();
    propagation.run(world)
}
