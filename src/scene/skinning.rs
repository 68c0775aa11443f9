use glam::Mat4;

use crate::errors::SkinningError;

/// Name of the shader uniform array holding the skinning matrices.
pub const FINAL_BONES_UNIFORM: &str = "finalBonesMatrices";

/// Minimal shader abstraction the skinning matrices are uploaded through.
pub trait UniformSink {
    fn set_matrix(&mut self, name: &str, matrix: &Mat4);
}

/// Fixed-size array of per-bone skinning matrices, indexed by bone id.
///
/// Slots that no bone writes stay at identity.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinningMatrices {
    matrices: Vec<Mat4>,
}

impl SkinningMatrices {
    #[must_use]
    pub fn new(max_bone_count: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; max_bone_count],
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.matrices.len()
    }

    /// Fails if `id` does not fit the array. The array is never resized.
    pub fn set(&mut self, id: usize, matrix: Mat4) -> Result<(), SkinningError> {
        let max = self.matrices.len();
        let slot = self
            .matrices
            .get_mut(id)
            .ok_or(SkinningError::BoneIndexOutOfRange { id, max })?;
        *slot = matrix;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&Mat4> {
        self.matrices.get(id)
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Column-major bytes for a single buffer upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices)
    }

    pub fn reset(&mut self) {
        self.matrices.fill(Mat4::IDENTITY);
    }

    /// Writes every slot as `finalBonesMatrices[i]`.
    pub fn upload(&self, sink: &mut dyn UniformSink) {
        for (i, matrix) in self.matrices.iter().enumerate() {
            sink.set_matrix(&format!("{FINAL_BONES_UNIFORM}[{i}]"), matrix);
        }
    }
}
