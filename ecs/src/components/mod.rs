//! Attribute types read and written by transform propagation.
//!
//! - Marker: [`TransformNode`]
//! - Local: [`Position`], [`Scale`], [`Rotation`], [`EulerAngles`], [`Pivot`], [`Anchor`]
//! - Results: [`WorldTransform`], [`WorldRotation`]
//! - Hierarchy: [`Parent`], [`Children`]

mod anchor;
mod hierarchy;
mod transform;

pub use anchor::{Anchor, AnchorEdge};
pub use hierarchy::{Children, Parent};
pub use transform::{
    EulerAngles, Pivot, Position, Rotation, Scale, TransformNode, WorldRotation, WorldTransform,
};
