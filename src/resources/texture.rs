use std::path::PathBuf;

/// Where a texture's pixels came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    /// Extracted from a blob stored inside the asset file.
    Embedded,
    /// Loaded from a file next to the asset.
    External(PathBuf),
}

/// Decoded RGBA8 image keyed by name.
#[derive(Debug, Clone)]
pub struct Texture {
    /// Cache key, normally the filename the asset refers to.
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub data: Vec<u8>,
    pub source: TextureSource,
}

impl Texture {
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32, data: Vec<u8>, source: TextureSource) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            data,
            source,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.source == TextureSource::Embedded
    }
}
