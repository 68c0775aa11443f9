use glam::{Affine3A, Mat4, Quat, Vec3};

use crate::math::{Trs, euler_degrees_to_quat, quat_to_euler_degrees};

/// Transform 组件
///
/// Local pose of a node (position, Euler rotation in degrees applied in
/// intrinsic X-Y-Z order, scale) plus cached local and world matrices.
///
/// The world matrix is only refreshed by
/// [`NodeHierarchy::compute_world_transforms`](crate::scene::NodeHierarchy::compute_world_transforms);
/// after editing the pose it is stale until that pass runs.
#[derive(Debug, Clone)]
pub struct Transform {
    // === Public 属性 ===
    pub position: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,

    // === 矩阵缓存 ===
    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    // === 脏检查状态 ===
    last_position: Vec3,
    last_rotation: Vec3,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Vec3::ZERO,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    #[must_use]
    pub fn from_trs(trs: Trs) -> Self {
        let mut transform = Self::new();
        transform.set_trs(trs);
        transform
    }

    // ========================================================================
    // 脏检查更新
    // ========================================================================

    /// Rebuilds the local matrix if the pose changed since the last call.
    ///
    /// Returns whether the matrix was rebuilt.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix = Affine3A::from_scale_rotation_translation(
                self.scale,
                self.rotation_quat(),
                self.position,
            );

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    // ========================================================================
    // Getters & Helpers
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn rotation_quat(&self) -> Quat {
        euler_degrees_to_quat(self.rotation)
    }

    /// Stores `rotation` as Euler degrees.
    pub fn set_rotation_quat(&mut self, rotation: Quat) {
        self.rotation = quat_to_euler_degrees(rotation);
    }

    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Vec3::new(x, y, z);
    }

    #[must_use]
    pub fn trs(&self) -> Trs {
        Trs {
            translation: self.position,
            rotation_degrees: self.rotation,
            scale: self.scale,
        }
    }

    pub fn set_trs(&mut self, trs: Trs) {
        self.position = trs.translation;
        self.rotation = trs.rotation_degrees;
        self.scale = trs.scale;
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn local_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.local_matrix)
    }

    #[inline]
    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    /// World-space position, valid after the last hierarchy pass.
    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        Vec3::from(self.world_matrix.translation)
    }

    pub(crate) fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    /// Sets the local matrix directly and decomposes it back into the pose.
    ///
    /// Shear is lost in the decomposition.
    pub fn apply_local_matrix(&mut self, mat: Mat4) {
        self.set_trs(Trs::from_matrix(&mat));
        self.local_matrix = Affine3A::from_mat4(mat);

        self.last_position = self.position;
        self.last_rotation = self.rotation;
        self.last_scale = self.scale;

        // 矩阵已更新，但世界矩阵需要重算
        self.mark_dirty();
    }

    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
