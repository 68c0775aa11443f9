//! Texture file I/O and decoding.

use std::path::{Path, PathBuf};

use image::GenericImageView;

use crate::errors::TextureError;
use crate::resources::{Texture, TextureSource};

/// Decodes compressed image bytes into an RGBA8 [`Texture`].
pub fn decode_texture(name: &str, bytes: &[u8], source: TextureSource) -> Result<Texture, TextureError> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    let rgba = img.to_rgba8();
    Ok(Texture::new(name, width, height, rgba.into_vec(), source))
}

/// Reads and decodes the texture at `path`, named `name`.
pub fn load_texture_file(name: &str, path: &Path) -> Result<Texture, TextureError> {
    let bytes = std::fs::read(path)?;
    decode_texture(name, &bytes, TextureSource::External(path.to_path_buf()))
}

/// Joins a texture reference onto the asset directory.
///
/// References written on Windows use `\`; they are normalized so the join
/// works on every platform.
#[must_use]
pub fn resolve_texture_path(directory: &Path, reference: &str) -> PathBuf {
    let normalized = reference.replace('\\', "/");
    directory.join(normalized.trim_start_matches("./"))
}
