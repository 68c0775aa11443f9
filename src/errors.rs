//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! Failures are grouped by the subsystem that raises them:
//! - [`SourceError`]: the external asset could not be parsed
//! - [`ImportError`]: a model import was aborted
//! - [`TextureError`]: a single texture could not be read or decoded
//! - [`SceneError`]: an invalid operation on the node hierarchy
//! - [`SkinningError`]: bone configuration problems
//!
//! [`SkeinError`] wraps all of them, and [`Result<T>`] is the crate-wide alias.
//!
//! Recoverable per-item problems found while importing are not errors. They
//! are reported as [`ImportWarning`] values, logged, and kept on the model.
//!
//! ```rust,ignore
//! use skein::errors::{SkeinError, Result};
//!
//! fn load() -> Result<()> {
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::resources::material::TextureMapSlot;

/// The umbrella error type for the crate.
#[derive(Error, Debug)]
pub enum SkeinError {
    /// Importing a model failed.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// A node hierarchy operation failed.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// A skinning operation failed.
    #[error(transparent)]
    Skinning(#[from] SkinningError),

    /// Settings could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Asset Source Errors
// ============================================================================

/// Errors raised by an [`AssetReader`](crate::assets::AssetReader) while
/// parsing an external asset.
#[derive(Error, Debug)]
pub enum SourceError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The glTF document or one of its buffers is malformed.
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    /// A data URI payload is not valid base64.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A buffer the document declares could not be located.
    #[error("Missing buffer data: {0}")]
    MissingBuffer(String),

    /// The document contains no scene to import.
    #[error("Asset has no root node")]
    MissingRoot,

    /// The parser flagged the scene as incomplete.
    #[error("Asset scene is incomplete")]
    Incomplete,

    /// An accessor's component type or element shape does not fit the data
    /// read through it.
    #[error("Accessor {index} used as {role} has layout {found}")]
    InvalidAccessor {
        /// Accessor index in the document
        index: usize,
        /// Attribute or property the accessor is bound to
        role: &'static str,
        /// Component type and dimensions actually declared
        found: String,
    },
}

// ============================================================================
// Import Errors
// ============================================================================

/// Fatal errors of a model import. No model is produced.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The asset could not be parsed, or the parsed scene is unusable.
    #[error("Asset unreadable: {}: {source}", path.display())]
    AssetUnreadable {
        /// Path that was passed to the importer
        path: PathBuf,
        /// Underlying parser failure
        #[source]
        source: SourceError,
    },

    /// A mesh references a material index the scene does not define.
    #[error("Mesh '{mesh}' references missing material index {index}")]
    MaterialIndexOutOfBounds {
        /// Name of the offending mesh
        mesh: String,
        /// The invalid index
        index: usize,
    },

    /// A node references a mesh index the scene does not define.
    #[error("Node '{node}' references missing mesh index {index}")]
    MeshIndexOutOfBounds {
        /// Name of the offending node
        node: String,
        /// The invalid index
        index: usize,
    },

    /// The bone configuration of the asset does not fit the skinning array.
    #[error(transparent)]
    Skinning(#[from] SkinningError),
}

/// Failure to produce a single texture.
#[derive(Error, Debug)]
pub enum TextureError {
    /// The texture file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a supported image.
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Recoverable problems found while importing. The import continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportWarning {
    /// A referenced texture could not be loaded; the slot was left unset.
    #[error("Material '{material}': failed to load {slot:?} texture '{}': {reason}", path.display())]
    TextureLoad {
        /// Material that referenced the texture
        material: String,
        /// Slot the texture was meant for
        slot: TextureMapSlot,
        /// Resolved path that was tried
        path: PathBuf,
        /// Human readable cause
        reason: String,
    },

    /// An embedded texture blob could not be decoded and was skipped.
    #[error("Embedded texture '{name}' could not be decoded: {reason}")]
    EmbeddedTextureDecode {
        /// In-asset filename of the blob
        name: String,
        /// Human readable cause
        reason: String,
    },

    /// A bone name matched no node; the bone was created unbound.
    #[error("Bone '{name}' has no matching node")]
    UnboundBone {
        /// Bone (joint) name
        name: String,
    },
}

// ============================================================================
// Scene Errors
// ============================================================================

/// Invalid operations on a [`NodeHierarchy`](crate::scene::NodeHierarchy).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The child already belongs to another parent.
    #[error("Node '{child}' already has a parent")]
    AlreadyParented {
        /// Name of the child node
        child: String,
    },

    /// Linking would make a node its own ancestor.
    #[error("Attaching '{child}' under '{parent}' would create a cycle")]
    CycleDetected {
        /// Name of the requested parent
        parent: String,
        /// Name of the requested child
        child: String,
    },

    /// A handle does not refer to a live node.
    #[error("Invalid node handle")]
    InvalidHandle,

    /// A required node lookup found nothing.
    #[error("Node not found: {0}")]
    NodeNotFound(String),
}

// ============================================================================
// Skinning Errors
// ============================================================================

/// Bone configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkinningError {
    /// A bone id does not fit the fixed skinning array.
    #[error("Bone id {id} exceeds the maximum bone count {max}")]
    BoneIndexOutOfRange {
        /// The offending bone id
        id: usize,
        /// Capacity of the skinning array
        max: usize,
    },

    /// The joint node of an unbound bone was requested.
    #[error("Bone '{name}' is not bound to a node")]
    UnboundBone {
        /// Bone (joint) name
        name: String,
    },
}

/// Alias for `Result<T, SkeinError>`.
pub type Result<T> = std::result::Result<T, SkeinError>;
