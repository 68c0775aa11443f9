//! 场景图系统模块
//!
//! - Node / NodeKind: scene graph element and its tagged role
//! - Transform: local pose plus cached matrices
//! - NodeHierarchy: node arena with top-down transform computation
//! - Model: one imported asset with its skeleton
//! - Bone / SkinningMatrices: joint binding and skinning output
//! - Scene / SceneContext: scene container and explicit engine context

pub mod bone;
pub mod camera;
pub mod context;
pub mod hierarchy;
pub mod light;
pub mod model;
pub mod node;
pub mod scene;
pub mod skinning;
pub mod transform;
pub mod transform_system;

pub use bone::{Bone, BoneMarkers, MarkerMeshes};
pub use camera::Camera;
pub use context::SceneContext;
pub use hierarchy::NodeHierarchy;
pub use light::Light;
pub use model::Model;
pub use node::{EntityId, Node, NodeKind};
pub use scene::{ModelInstance, PickHit, Scene};
pub use skinning::{FINAL_BONES_UNIFORM, SkinningMatrices, UniformSink};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct ModelKey;
}
