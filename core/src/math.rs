//! Math type aliases and helper functions.
//!
//! All hierarchy math is f32 and built on `glam`. `glam` uses column
//! vectors, so a transform that applies scale, then rotation, then
//! translation is written `T * R * S`, and a child placed in its parent's
//! frame is `parent * child`.

pub use glam;
pub use glam::EulerRot;

/// 3D vector (f32).
pub type Vec3 = glam::Vec3;

/// Quaternion (f32), stored as `[x, y, z, w]`.
pub type Quat = glam::Quat;

/// 4x4 matrix (f32), column-major.
pub type Mat4 = glam::Mat4;

// ===== Composition =====

/// Build a 4x4 matrix that scales, then rotates, then translates (T * R * S).
pub fn mat4_from_scale_rotation_translation(
    scale: Vec3,
    rotation: Quat,
    translation: Vec3,
) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, rotation, translation)
}

/// Build a 4x4 matrix that scales, then translates (T * S).
pub fn mat4_from_scale_translation(scale: Vec3, translation: Vec3) -> Mat4 {
    #[rustfmt::skip]
    let result = Mat4::from_cols_array(&[
        scale.x,       0.0,           0.0,           0.0,
        0.0,           scale.y,       0.0,           0.0,
        0.0,           0.0,           scale.z,       0.0,
        translation.x, translation.y, translation.z, 1.0,
    ]);
    result
}

/// Build a translation-only 4x4 matrix.
pub fn mat4_from_translation(t: Vec3) -> Mat4 {
    Mat4::from_translation(t)
}

/// Convert euler angles (radians) to a quaternion using the given axis order.
pub fn quat_from_euler(order: EulerRot, angles: Vec3) -> Quat {
    Quat::from_euler(order, angles.x, angles.y, angles.z)
}

// ===== Decomposition =====

/// Extract the translation column of an affine matrix.
pub fn translation_of(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

/// Extract the per-axis scale of an affine matrix.
///
/// Lengths of the basis columns; the X axis takes the determinant's sign
/// so mirrored transforms decompose the same way `glam` does.
pub fn scale_of(m: &Mat4) -> Vec3 {
    let det = m.determinant();
    Vec3::new(
        m.x_axis.truncate().length() * det.signum(),
        m.y_axis.truncate().length(),
        m.z_axis.truncate().length(),
    )
}

/// Rotate a vector by a quaternion.
pub fn quat_rotate_vec3(q: Quat, v: Vec3) -> Vec3 {
    q * v
}
