#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod assets;
pub mod errors;
pub mod math;
pub mod resources;
pub mod scene;
pub mod settings;

pub use assets::{AssetReader, GltfReader, MaterialTextureCache, ModelImporter, SourceScene};
pub use errors::{ImportError, ImportWarning, Result, SceneError, SkeinError, SkinningError};
pub use resources::{Material, Mesh, Texture, TextureMapSlot, Vertex};
pub use scene::{Bone, Model, Node, NodeHandle, NodeHierarchy, Scene, SceneContext, Transform};
pub use settings::{EngineSettings, SceneMode};
