//! Material definition.
//!
//! A [`Material`] is shared between every mesh that references it by name.
//! Meshes hold a [`SharedMaterial`], so editing the material through any mesh
//! is visible to all of them.

use std::sync::Arc;

use glam::Vec4;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::resources::texture::Texture;

/// Reference-counted, mutable material handle.
pub type SharedMaterial = Arc<RwLock<Material>>;

/// The texture maps a material can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureMapSlot {
    Diffuse,
    Specular,
    Normal,
    Metallic,
    Emissive,
}

impl TextureMapSlot {
    pub const ALL: [Self; 5] = [
        Self::Diffuse,
        Self::Specular,
        Self::Normal,
        Self::Metallic,
        Self::Emissive,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Sampler uniform name the shader binds this slot to.
    #[must_use]
    pub const fn uniform_name(self) -> &'static str {
        match self {
            Self::Diffuse => "diffuseMap",
            Self::Specular => "specularMap",
            Self::Normal => "normalMap",
            Self::Metallic => "metallicMap",
            Self::Emissive => "emissiveMap",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,

    pub ambient_color: Vec4,
    pub diffuse_color: Vec4,
    pub specular_color: Vec4,
    pub opacity: f32,
    pub shininess: f32,

    maps: [Option<Arc<Texture>>; 5],
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient_color: Vec4::ONE,
            diffuse_color: Vec4::ONE,
            specular_color: Vec4::ONE,
            opacity: 1.0,
            shininess: 32.0,
            maps: Default::default(),
        }
    }

    /// Wraps the material for sharing between meshes.
    #[must_use]
    pub fn into_shared(self) -> SharedMaterial {
        Arc::new(RwLock::new(self))
    }

    #[inline]
    #[must_use]
    pub fn map(&self, slot: TextureMapSlot) -> Option<&Arc<Texture>> {
        self.maps[slot.index()].as_ref()
    }

    pub fn set_map(&mut self, slot: TextureMapSlot, texture: Arc<Texture>) {
        self.maps[slot.index()] = Some(texture);
    }

    pub fn clear_map(&mut self, slot: TextureMapSlot) -> Option<Arc<Texture>> {
        self.maps[slot.index()].take()
    }

    /// Slots that currently hold a texture.
    pub fn assigned_maps(&self) -> impl Iterator<Item = (TextureMapSlot, &Arc<Texture>)> {
        TextureMapSlot::ALL
            .into_iter()
            .filter_map(|slot| self.map(slot).map(|texture| (slot, texture)))
    }

    #[must_use]
    pub fn with_ambient(mut self, color: Vec4) -> Self {
        self.ambient_color = color;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("DefaultMaterial")
    }
}
