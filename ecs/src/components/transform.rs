use trellis_core::math::{Mat4, Quat, Vec3, scale_of, translation_of};

/// Marks a node as a participant in transform propagation.
///
/// Only nodes carrying this marker are enumerated, classified and written
/// by [`TransformPropagation`](crate::TransformPropagation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformNode;

/// Local position relative to the parent frame. Defaults to the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Position(pub Vec3);

/// Local non-uniform scale. Defaults to one on every axis.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Scale(pub Vec3);

impl Scale {
    /// Unit scale.
    pub const ONE: Self = Self(Vec3::ONE);

    /// The same factor on every axis.
    pub fn uniform(factor: f32) -> Self {
        Self(Vec3::splat(factor))
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::ONE
    }
}

/// Local rotation as a quaternion, applied on top of [`EulerAngles`].
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Rotation(pub Quat);

impl Default for Rotation {
    fn default() -> Self {
        Self(Quat::IDENTITY)
    }
}

/// Local rotation as euler angles in radians.
///
/// Converted with [`PropagationSettings::euler_order`](crate::PropagationSettings)
/// and applied before [`Rotation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct EulerAngles(pub Vec3);

/// Offset of the node origin, as a fraction of the node's own scale.
///
/// `Pivot(Vec3::splat(0.5))` on a unit-sized node centres it on its
/// position.
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Pivot(pub Vec3);

/// World-space transform as a 4x4 matrix.
///
/// Written by [`TransformPropagation`](crate::TransformPropagation) once per
/// pass. For a root node this equals its local-to-parent matrix.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct WorldTransform(pub Mat4);

impl WorldTransform {
    /// Identity world transform.
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    /// Extract the world-space translation.
    pub fn translation(&self) -> Vec3 {
        translation_of(&self.0)
    }

    /// Extract the world-space scale.
    pub fn scale(&self) -> Vec3 {
        scale_of(&self.0)
    }

    /// Rotation recovered from the matrix.
    ///
    /// Lossy under non-uniform scale; prefer [`WorldRotation`].
    pub fn decomposed_rotation(&self) -> Quat {
        self.0.to_scale_rotation_translation().1
    }

    /// Get the forward direction vector (-Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        -self.0.z_axis.truncate().normalize()
    }

    /// Get the right direction vector (+X).
    pub fn right(&self) -> Vec3 {
        self.0.x_axis.truncate().normalize()
    }

    /// Get the up direction vector (+Y).
    pub fn up(&self) -> Vec3 {
        self.0.y_axis.truncate().normalize()
    }

    /// Transform a point from node space to world space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.0.transform_point3(point)
    }
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// World-space rotation, accumulated by quaternion multiplication only.
///
/// Tracked separately from [`WorldTransform`] so that scale never leaks
/// into the rotation.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct WorldRotation(pub Quat);

impl WorldRotation {
    /// Identity world rotation.
    pub const IDENTITY: Self = Self(Quat::IDENTITY);
}

impl Default for WorldRotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}
