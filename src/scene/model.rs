//! Imported model: node tree, meshes, materials and skeleton.
//!
//! A [`Model`] owns its own [`NodeHierarchy`]. Besides the imported tree it
//! holds a separate marker root for the bone debug geometry, so markers are
//! never affected by the model's own transforms.
//!
//! # Per-frame order
//!
//! [`Model::update`] runs the three steps in the order they depend on each
//! other:
//!
//! 1. world transforms of the imported tree,
//! 2. skinning matrices (`joint.world · offset`),
//! 3. marker transforms, then the marker subtree's world transforms.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Affine3A, Mat4};
use rustc_hash::FxHashMap;

use crate::assets::cache::MaterialTextureCache;
use crate::errors::{ImportWarning, SceneError, SkinningError};
use crate::resources::{Mesh, SharedMaterial, Texture};
use crate::scene::NodeHandle;
use crate::scene::bone::{Bone, MarkerMeshes};
use crate::scene::hierarchy::NodeHierarchy;
use crate::scene::node::{EntityId, Node};
use crate::scene::skinning::{SkinningMatrices, UniformSink};
use crate::settings::{MarkerSpace, SkinningSettings};

/// Everything the importer hands over to build a [`Model`].
pub(crate) struct ModelParts {
    pub name: String,
    pub directory: PathBuf,
    pub hierarchy: NodeHierarchy,
    pub root: NodeHandle,
    pub nodes: Vec<NodeHandle>,
    pub meshes: Vec<Arc<Mesh>>,
    pub cache: MaterialTextureCache,
    pub warnings: Vec<ImportWarning>,
}

#[derive(Debug)]
pub struct Model {
    name: String,
    directory: PathBuf,

    hierarchy: NodeHierarchy,
    root: NodeHandle,
    marker_root: NodeHandle,
    nodes: Vec<NodeHandle>,
    meshes: Vec<Arc<Mesh>>,
    cache: MaterialTextureCache,

    bones: Vec<Bone>,
    bone_lookup: FxHashMap<String, usize>,
    skinning: SkinningMatrices,
    marker_meshes: MarkerMeshes,
    settings: SkinningSettings,

    warnings: Vec<ImportWarning>,
    last_parent_world: Option<Affine3A>,
}

impl Model {
    pub(crate) fn from_parts(parts: ModelParts, settings: &SkinningSettings) -> Self {
        let ModelParts {
            name,
            directory,
            mut hierarchy,
            root,
            nodes,
            meshes,
            cache,
            warnings,
        } = parts;
        let marker_root = hierarchy.create_node(format!("{name}-Markers"));

        Self {
            name,
            directory,
            hierarchy,
            root,
            marker_root,
            nodes,
            meshes,
            cache,
            bones: Vec::new(),
            bone_lookup: FxHashMap::default(),
            skinning: SkinningMatrices::new(settings.max_bone_count),
            marker_meshes: MarkerMeshes::new(settings),
            settings: settings.clone(),
            warnings,
            last_parent_world: None,
        }
    }

    /// Wraps a hand-built hierarchy. Every node under `root` is recorded,
    /// along with the meshes attached to them.
    #[must_use]
    pub fn from_hierarchy(
        name: impl Into<String>,
        hierarchy: NodeHierarchy,
        root: NodeHandle,
        settings: &SkinningSettings,
    ) -> Self {
        let nodes = hierarchy.descendants(root);
        let mut meshes: Vec<Arc<Mesh>> = Vec::new();
        for mesh in nodes.iter().filter_map(|&h| hierarchy.get(h)).flat_map(|n| n.meshes.iter()) {
            if !meshes.iter().any(|m| Arc::ptr_eq(m, mesh)) {
                meshes.push(mesh.clone());
            }
        }

        let parts = ModelParts {
            name: name.into(),
            directory: PathBuf::new(),
            hierarchy,
            root,
            nodes,
            meshes,
            cache: MaterialTextureCache::new(),
            warnings: Vec::new(),
        };
        Self::from_parts(parts, settings)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the asset was loaded from.
    #[inline]
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Parent of every bone marker node.
    #[inline]
    #[must_use]
    pub fn marker_root(&self) -> NodeHandle {
        self.marker_root
    }

    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &NodeHierarchy {
        &self.hierarchy
    }

    /// Mutable access for posing. World matrices are stale until the next
    /// [`update`](Self::update).
    #[inline]
    pub fn hierarchy_mut(&mut self) -> &mut NodeHierarchy {
        &mut self.hierarchy
    }

    #[inline]
    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.hierarchy.get(handle)
    }

    /// Every imported node, in pre-order. Marker nodes are not included.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn meshes(&self) -> &[Arc<Mesh>] {
        &self.meshes
    }

    /// Every distinct material, in first-use order.
    pub fn materials(&self) -> impl Iterator<Item = &SharedMaterial> {
        self.cache.materials.iter()
    }

    #[must_use]
    pub fn material(&self, name: &str) -> Option<SharedMaterial> {
        self.cache.material(name)
    }

    pub fn textures(&self) -> impl Iterator<Item = &Arc<Texture>> {
        self.cache.textures.iter()
    }

    #[inline]
    #[must_use]
    pub fn cache(&self) -> &MaterialTextureCache {
        &self.cache
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, id: usize) -> Option<&Bone> {
        self.bones.get(id)
    }

    #[must_use]
    pub fn find_bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.bone_lookup.get(name).and_then(|&id| self.bones.get(id))
    }

    /// Searches the imported tree only.
    #[must_use]
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.hierarchy.find_node_by_name(self.root, name)
    }

    pub fn require_node(&self, name: &str) -> Result<NodeHandle, SceneError> {
        self.hierarchy.require_node(self.root, name)
    }

    /// Recoverable problems found while importing.
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[ImportWarning] {
        &self.warnings
    }

    #[inline]
    #[must_use]
    pub fn skinning_matrices(&self) -> &SkinningMatrices {
        &self.skinning
    }

    #[inline]
    #[must_use]
    pub fn skinning_settings(&self) -> &SkinningSettings {
        &self.settings
    }

    // ========================================================================
    // Skeleton
    // ========================================================================

    /// Binds the next bone id to the node named `name` under the model root.
    ///
    /// A name that is already bound returns its existing id. Without a
    /// matching node the bone is created unbound: it skins with identity and
    /// gets no markers. Ids beyond the skinning array are rejected.
    pub fn initialize_bone(&mut self, name: &str, offset: Mat4) -> Result<usize, SkinningError> {
        if let Some(&id) = self.bone_lookup.get(name) {
            log::debug!("Bone {name} already initialized as {id}");
            return Ok(id);
        }

        let id = self.bones.len();
        let max = self.skinning.capacity();
        if id >= max {
            return Err(SkinningError::BoneIndexOutOfRange { id, max });
        }

        let node = self.find_node_by_name(name);
        if node.is_none() {
            log::warn!("Bone {name} has no matching node in model {}", self.name);
            self.warnings.push(ImportWarning::UnboundBone { name: name.to_string() });
        }

        let mut bone = Bone::new(id, name, offset, node);
        bone.create_markers(&mut self.hierarchy, self.marker_root, &self.marker_meshes);
        self.bones.push(bone);
        self.bone_lookup.insert(name.to_string(), id);
        Ok(id)
    }

    /// Returns the bone owning the marker with `entity`, if any.
    #[must_use]
    pub fn pick_bone(&self, entity: EntityId) -> Option<&Bone> {
        self.bones.iter().find(|b| b.pick_node(&self.hierarchy, entity))
    }

    pub fn set_markers_visible(&mut self, visible: bool) {
        for handle in self.hierarchy.descendants(self.marker_root) {
            if let Some(node) = self.hierarchy.get_mut(handle) {
                node.visible = visible;
            }
        }
    }

    // ========================================================================
    // Per-frame update
    // ========================================================================

    /// Refreshes world transforms, skinning matrices and markers.
    pub fn update(&mut self) -> Result<(), SkinningError> {
        self.update_with_parent(Affine3A::IDENTITY)
    }

    /// Like [`update`](Self::update) with the model root hung below a node
    /// whose world matrix is `parent_world`.
    pub fn update_with_parent(&mut self, parent_world: Affine3A) -> Result<(), SkinningError> {
        let parent_changed = self.last_parent_world != Some(parent_world);
        self.last_parent_world = Some(parent_world);

        self.hierarchy
            .compute_world_transforms_with_parent(self.root, parent_world, parent_changed);
        self.update_skinning()?;
        self.update_markers();
        Ok(())
    }

    /// Recomputes every bone's skinning matrix. World transforms must be
    /// current.
    pub fn update_skinning(&mut self) -> Result<(), SkinningError> {
        for bone in &mut self.bones {
            bone.update(&self.hierarchy, &mut self.skinning)?;
        }
        Ok(())
    }

    /// Moves every marker onto the current pose.
    pub fn update_markers(&mut self) {
        let frame = match self.settings.marker_space {
            MarkerSpace::World => Affine3A::IDENTITY,
            MarkerSpace::RootRelative => self
                .hierarchy
                .get(self.root)
                .map_or(Affine3A::IDENTITY, |root| *root.world_matrix()),
        };
        let thickness = self.settings.marker_thickness;

        for bone in &self.bones {
            bone.update_markers(&mut self.hierarchy, frame, thickness);
        }
        self.hierarchy.compute_world_transforms(self.marker_root);
    }

    /// Uploads the skinning matrices as `finalBonesMatrices[i]`.
    pub fn upload_skinning(&self, sink: &mut dyn UniformSink) {
        self.skinning.upload(sink);
    }
}
