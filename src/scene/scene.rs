use std::sync::atomic::{AtomicU32, Ordering};

use glam::Affine3A;
use slotmap::SlotMap;

use crate::errors::{SceneError, SkinningError};
use crate::scene::hierarchy::NodeHierarchy;
use crate::scene::model::Model;
use crate::scene::node::{EntityId, Node, NodeKind};
use crate::scene::{ModelKey, NodeHandle};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// A model placed in a scene below an anchor node.
#[derive(Debug)]
pub struct ModelInstance {
    pub anchor: NodeHandle,
    pub model: Model,
}

/// Result of [`Scene::pick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickHit {
    pub model: ModelKey,
    pub bone: usize,
}

/// Scene container.
///
/// The scene owns its own hierarchy (cameras, lights, ground, model anchors)
/// and the models placed in it. Each model keeps its private hierarchy and
/// is updated with its anchor's world matrix as parent.
#[derive(Debug)]
pub struct Scene {
    pub id: u32,
    pub name: String,

    pub hierarchy: NodeHierarchy,
    root: NodeHandle,
    pub(crate) scene_camera: Option<NodeHandle>,
    pub(crate) editor_camera: Option<NodeHandle>,

    models: SlotMap<ModelKey, ModelInstance>,
}

impl Scene {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut hierarchy = NodeHierarchy::new();
        let root = hierarchy.create_node(name.clone());
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            name,
            hierarchy,
            root,
            scene_camera: None,
            editor_camera: None,
            models: SlotMap::with_key(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn scene_camera(&self) -> Option<NodeHandle> {
        self.scene_camera
    }

    /// Only present in [`SceneMode::WithEditorCamera`](crate::settings::SceneMode).
    #[inline]
    #[must_use]
    pub fn editor_camera(&self) -> Option<NodeHandle> {
        self.editor_camera
    }

    /// The camera a renderer should draw through: the editor camera when
    /// present, the scene camera otherwise.
    #[must_use]
    pub fn active_camera(&self) -> Option<NodeHandle> {
        self.editor_camera.or(self.scene_camera)
    }

    /// Adds `node` below `parent`, or below the scene root.
    pub fn add_node(&mut self, node: Node, parent: Option<NodeHandle>) -> Result<NodeHandle, SceneError> {
        self.hierarchy.add_node_under(parent.unwrap_or(self.root), node)
    }

    // ========================================================================
    // Models
    // ========================================================================

    /// Places `model` below a new anchor node named after it.
    pub fn instantiate_model(&mut self, model: Model, parent: Option<NodeHandle>) -> Result<ModelKey, SceneError> {
        let anchor = self.add_node(Node::new(model.name().to_string()), parent)?;
        log::debug!("Instantiated model {} in scene {}", model.name(), self.name);
        Ok(self.models.insert(ModelInstance { anchor, model }))
    }

    /// Removes the model and its anchor subtree, handing the model back.
    pub fn unload_model(&mut self, key: ModelKey) -> Option<Model> {
        let instance = self.models.remove(key)?;
        self.hierarchy.remove_subtree(instance.anchor);
        Some(instance.model)
    }

    #[must_use]
    pub fn model(&self, key: ModelKey) -> Option<&ModelInstance> {
        self.models.get(key)
    }

    pub fn model_mut(&mut self, key: ModelKey) -> Option<&mut ModelInstance> {
        self.models.get_mut(key)
    }

    pub fn models(&self) -> impl Iterator<Item = (ModelKey, &ModelInstance)> {
        self.models.iter()
    }

    /// Drops every model.
    pub fn flush(&mut self) {
        let keys: Vec<ModelKey> = self.models.keys().collect();
        for key in keys {
            self.unload_model(key);
        }
    }

    // ========================================================================
    // Per-frame update
    // ========================================================================

    /// Recomputes scene transforms, refreshes cameras, then updates every
    /// model under its anchor.
    pub fn update(&mut self) -> Result<(), SkinningError> {
        self.hierarchy.compute_all();

        let handles: Vec<NodeHandle> = self.hierarchy.iter().map(|(h, _)| h).collect();
        for handle in handles {
            let Some(node) = self.hierarchy.get_mut(handle) else {
                continue;
            };
            let world = *node.world_matrix();
            match &mut node.kind {
                NodeKind::Camera(camera) => camera.update_view_projection(&world),
                NodeKind::Group
                | NodeKind::MeshRenderer
                | NodeKind::Light(_)
                | NodeKind::JointMarker { .. }
                | NodeKind::BoneMarker { .. } => {}
            }
        }

        for instance in self.models.values_mut() {
            let anchor_world = self
                .hierarchy
                .get(instance.anchor)
                .map_or(Affine3A::IDENTITY, |n| *n.world_matrix());
            instance.model.update_with_parent(anchor_world)?;
        }
        Ok(())
    }

    /// Finds the model bone whose marker carries `entity`.
    #[must_use]
    pub fn pick(&self, entity: EntityId) -> Option<PickHit> {
        self.models.iter().find_map(|(key, instance)| {
            instance.model.pick_bone(entity).map(|bone| PickHit { model: key, bone: bone.id })
        })
    }
}
