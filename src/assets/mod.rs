//! Asset import.
//!
//! - [`AssetReader`]: parses a file into a parser-neutral [`SourceScene`]
//! - [`GltfReader`]: the built-in glTF 2.0 reader
//! - [`ModelImporter`]: turns a [`SourceScene`] into a [`Model`](crate::scene::Model)
//! - [`MaterialTextureCache`]: name-keyed dedup of materials and textures

pub mod cache;
pub mod importer;
pub mod io;
pub mod loaders;
pub mod source;

pub use cache::{MaterialTextureCache, NamedCache};
pub use importer::ModelImporter;
pub use io::{decode_texture, load_texture_file};
pub use loaders::GltfReader;
pub use source::{
    AssetReader, EmbeddedTexture, PropertyValue, SourceBone, SourceMaterial, SourceMesh, SourceNode, SourceScene,
};
