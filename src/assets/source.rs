//! Parser-neutral view of an external asset.
//!
//! An [`AssetReader`] turns a file into a [`SourceScene`]; the importer only
//! ever sees this representation. Meshes are already triangulated.

use std::path::Path;

use glam::{Mat4, Vec3, Vec4};

use crate::errors::SourceError;
use crate::resources::TextureMapSlot;

/// Material property keys.
pub mod keys {
    pub const COLOR_DIFFUSE: &str = "$clr.diffuse";
    pub const COLOR_SPECULAR: &str = "$clr.specular";
    pub const COLOR_AMBIENT: &str = "$clr.ambient";
    pub const OPACITY: &str = "$mat.opacity";
    pub const SHININESS: &str = "$mat.shininess";
}

pub trait AssetReader {
    fn read(&self, path: &Path) -> Result<SourceScene, SourceError>;
}

#[derive(Debug, Clone, Default)]
pub struct SourceScene {
    pub root: Option<SourceNode>,
    pub meshes: Vec<SourceMesh>,
    pub materials: Vec<SourceMaterial>,
    pub embedded_textures: Vec<EmbeddedTexture>,
    /// Set by parsers that could only read part of the file.
    pub incomplete: bool,
}

#[derive(Debug, Clone)]
pub struct SourceNode {
    pub name: String,
    pub transform: Mat4,
    /// Indices into [`SourceScene::meshes`].
    pub meshes: Vec<usize>,
    pub children: Vec<SourceNode>,
}

impl SourceNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_meshes(mut self, meshes: impl IntoIterator<Item = usize>) -> Self {
        self.meshes.extend(meshes);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    /// Same length as `positions`, or empty.
    pub normals: Vec<Vec3>,
    /// First UV channel, if the asset has one.
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub faces: Vec<[u32; 3]>,
    /// Index into [`SourceScene::materials`].
    pub material: usize,
    pub bones: Vec<SourceBone>,
}

#[derive(Debug, Clone)]
pub struct SourceBone {
    /// Name of the joint node.
    pub name: String,
    /// Inverse bind matrix.
    pub offset: Mat4,
    /// `(vertex index, weight)` pairs.
    pub weights: Vec<(u32, f32)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Color(Vec4),
    Float(f32),
}

#[derive(Debug, Clone, Default)]
pub struct SourceMaterial {
    pub name: String,
    pub properties: Vec<(String, PropertyValue)>,
    /// Texture references by slot, in declaration order.
    pub textures: Vec<(TextureMapSlot, String)>,
}

impl SourceMaterial {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_color(mut self, key: &str, color: Vec4) -> Self {
        self.properties.push((key.to_string(), PropertyValue::Color(color)));
        self
    }

    #[must_use]
    pub fn with_float(mut self, key: &str, value: f32) -> Self {
        self.properties.push((key.to_string(), PropertyValue::Float(value)));
        self
    }

    #[must_use]
    pub fn with_texture(mut self, slot: TextureMapSlot, filename: impl Into<String>) -> Self {
        self.textures.push((slot, filename.into()));
        self
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        self.properties.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// A color property; a float property is widened to an opaque grey.
    #[must_use]
    pub fn color(&self, key: &str) -> Option<Vec4> {
        match self.property(key)? {
            PropertyValue::Color(c) => Some(c),
            PropertyValue::Float(f) => Some(Vec4::new(f, f, f, 1.0)),
        }
    }

    #[must_use]
    pub fn float(&self, key: &str) -> Option<f32> {
        match self.property(key)? {
            PropertyValue::Float(f) => Some(f),
            PropertyValue::Color(_) => None,
        }
    }

    /// References for `slot`, in declaration order.
    pub fn textures_for(&self, slot: TextureMapSlot) -> impl Iterator<Item = &str> {
        self.textures
            .iter()
            .filter(move |(s, _)| *s == slot)
            .map(|(_, file)| file.as_str())
    }
}

/// Compressed image bytes stored inside the asset.
#[derive(Debug, Clone)]
pub struct EmbeddedTexture {
    /// Name materials use to reference this blob.
    pub filename: String,
    pub data: Vec<u8>,
}

impl EmbeddedTexture {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
