//! Engine Settings
//!
//! Startup configuration consumed by [`SceneContext`](crate::scene::SceneContext)
//! and the model importer. Every struct implements [`Default`] and is
//! `#[serde(default)]`, so a JSON file only needs the fields it changes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use skein::settings::{EngineSettings, SceneMode};
//!
//! let settings = EngineSettings::from_json_str(r#"{ "scene_mode": "WithoutEditorCamera" }"#)?;
//! assert_eq!(settings.scene_mode, SceneMode::WithoutEditorCamera);
//! assert_eq!(settings.skinning.max_bone_count, 100);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;

// ---------------------------------------------------------------------------
// SceneMode
// ---------------------------------------------------------------------------

/// Selects how [`SceneContext::create_new_scene`](crate::scene::SceneContext::create_new_scene)
/// populates a fresh scene.
///
/// | Content                | `WithEditorCamera` | `WithoutEditorCamera` |
/// |------------------------|--------------------|-----------------------|
/// | Editor camera root     | yes                | no                    |
/// | Scene camera           | yes                | yes                   |
/// | Ground plane and light | yes                | yes                   |
/// | Startup model          | no                 | if configured         |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SceneMode {
    /// Authoring setup with a free editor camera.
    #[default]
    WithEditorCamera,
    /// Runtime setup; only the scene camera is present.
    WithoutEditorCamera,
}

// ---------------------------------------------------------------------------
// MarkerSpace
// ---------------------------------------------------------------------------

/// Coordinate frame the bone marker matrices are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerSpace {
    /// Markers take the joint world matrices as they are.
    #[default]
    World,
    /// Markers are additionally pre-multiplied by the model root's world
    /// matrix, for renderers that draw them relative to a separate root.
    RootRelative,
}

// ---------------------------------------------------------------------------
// Import / Skinning
// ---------------------------------------------------------------------------

/// Options applied while building meshes from an external asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Flip the V texture coordinate (`v' = 1 - v`).
    pub flip_uvs: bool,
}

/// Skinning array capacity and debug marker appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinningSettings {
    /// Length of the `finalBonesMatrices` uniform array.
    pub max_bone_count: usize,
    /// Cross-section of the bone segment boxes.
    pub marker_thickness: f32,
    /// Radius of the joint spheres.
    pub joint_marker_radius: f32,
    /// RGBA color of every marker.
    pub marker_color: [f32; 4],
    pub marker_space: MarkerSpace,
}

impl Default for SkinningSettings {
    fn default() -> Self {
        Self {
            max_bone_count: 100,
            marker_thickness: 0.1,
            joint_marker_radius: 0.1,
            marker_color: [1.0, 0.647, 0.0, 1.0],
            marker_space: MarkerSpace::World,
        }
    }
}

/// Model instantiated when a scene is created in
/// [`SceneMode::WithoutEditorCamera`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupModel {
    pub path: PathBuf,
    #[serde(default = "StartupModel::default_scale")]
    pub scale: f32,
}

impl StartupModel {
    fn default_scale() -> f32 {
        0.01
    }
}

// ---------------------------------------------------------------------------
// EngineSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub scene_mode: SceneMode,
    pub import: ImportSettings,
    pub skinning: SkinningSettings,
    pub startup_model: Option<StartupModel>,
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
