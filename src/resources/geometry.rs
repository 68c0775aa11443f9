//! Vertex layout and raw geometry buffers.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Maximum number of bones that may influence a single vertex.
pub const MAX_BONE_INFLUENCE: usize = 4;

/// Interleaved vertex as consumed by the skinning shader.
///
/// `bone_ids` uses `-1` for unused influence slots.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub bone_ids: [i32; MAX_BONE_INFLUENCE],
    pub bone_weights: [f32; MAX_BONE_INFLUENCE],
}

impl Vertex {
    #[must_use]
    pub fn new(position: Vec3, normal: Vec3, tex_coord: [f32; 2]) -> Self {
        Self {
            position: position.extend(1.0).to_array(),
            normal: normal.to_array(),
            tex_coord,
            bone_ids: [-1; MAX_BONE_INFLUENCE],
            bone_weights: [0.0; MAX_BONE_INFLUENCE],
        }
    }

    /// Records a bone influence in the first free slot.
    ///
    /// Returns `false` when all slots are taken and the influence was dropped.
    pub fn add_bone_influence(&mut self, bone_id: i32, weight: f32) -> bool {
        match self.bone_ids.iter().position(|&id| id < 0) {
            Some(slot) => {
                self.bone_ids[slot] = bone_id;
                self.bone_weights[slot] = weight;
                true
            }
            None => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn position3(&self) -> Vec3 {
        Vec3::new(self.position[0], self.position[1], self.position[2])
    }
}

/// Vertex and index buffers without a material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    #[must_use]
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw bytes of the vertex buffer, ready for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Axis-aligned bounds of all vertex positions, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(Vertex::position3);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}
