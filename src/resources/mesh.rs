use std::sync::Arc;

use crate::resources::geometry::{Geometry, Vertex};
use crate::resources::material::SharedMaterial;

/// Triangulated geometry bound to one shared material.
///
/// Meshes are built once during import and never change afterwards.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
    pub material: SharedMaterial,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>, geometry: Geometry, material: SharedMaterial) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
        }
    }

    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.geometry.vertices
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.geometry.indices
    }

    /// Whether both meshes point at the very same material instance.
    #[must_use]
    pub fn shares_material_with(&self, other: &Mesh) -> bool {
        Arc::ptr_eq(&self.material, &other.material)
    }
}
