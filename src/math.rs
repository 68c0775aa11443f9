//! Transform math shared by the importer, the hierarchy and the bone markers.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Below this length a direction is treated as zero.
const DIRECTION_EPSILON: f32 = 1e-6;

/// Translation, Euler rotation (degrees, intrinsic XYZ) and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trs {
    pub translation: Vec3,
    pub rotation_degrees: Vec3,
    pub scale: Vec3,
}

impl Trs {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation_degrees: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Decomposes an affine matrix. Shear is lost.
    #[must_use]
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation_degrees: quat_to_euler_degrees(rotation),
            scale,
        }
    }

    /// `Translation · Rotation · Scale`
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            euler_degrees_to_quat(self.rotation_degrees),
            self.translation,
        )
    }
}

impl Default for Trs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[inline]
#[must_use]
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}

#[inline]
#[must_use]
pub fn quat_to_euler_degrees(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Shortest rotation taking `from` onto `to`.
///
/// Both inputs are normalized first. Opposite vectors rotate 180° around an
/// arbitrary axis perpendicular to `from`; a zero-length input yields the
/// identity.
#[must_use]
pub fn shortest_arc(from: Vec3, to: Vec3) -> Quat {
    let from = from.normalize_or_zero();
    let to = to.normalize_or_zero();
    if from.length_squared() < DIRECTION_EPSILON || to.length_squared() < DIRECTION_EPSILON {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(from, to)
}
