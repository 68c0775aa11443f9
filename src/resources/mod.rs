//! Core resource definitions.
//!
//! CPU-side data only; nothing here touches the GPU:
//! - Mesh: triangulated geometry plus a shared material
//! - Material: colors, scalars and texture maps
//! - Texture: decoded pixels and their provenance
//! - Geometry: interleaved vertices and indices
//! - primitives: sphere, box and plane generators

pub mod geometry;
pub mod material;
pub mod mesh;
pub mod primitives;
pub mod texture;

pub use geometry::{Geometry, MAX_BONE_INFLUENCE, Vertex};
pub use material::{Material, SharedMaterial, TextureMapSlot};
pub use mesh::Mesh;
pub use texture::{Texture, TextureSource};
