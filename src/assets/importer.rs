//! Builds a [`Model`] from an external asset.
//!
//! # Pipeline
//!
//! 1. Parse the file with the configured [`AssetReader`]. A parse failure, a
//!    missing root or an incomplete scene aborts with
//!    [`ImportError::AssetUnreadable`].
//! 2. Decode every embedded texture up front and cache it under its in-asset
//!    filename.
//! 3. Walk the node tree recursively: decompose each node matrix into the
//!    node's [`Transform`](crate::scene::Transform), build and attach its
//!    meshes, then recurse into the children in order.
//! 4. Meshes reuse an already built material of the same name; otherwise the
//!    material is built (5) and cached.
//! 5. Texture references resolve to an embedded texture of the same name
//!    first, then to a file next to the asset. A failed load leaves the slot
//!    empty and records an [`ImportWarning`].
//! 6. Once the tree exists, every bone seen on a mesh is bound by name and
//!    the model runs its first update.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;

use crate::assets::cache::MaterialTextureCache;
use crate::assets::io::{decode_texture, load_texture_file, resolve_texture_path};
use crate::assets::source::{AssetReader, SourceMaterial, SourceMesh, SourceNode, SourceScene, keys};
use crate::errors::{ImportError, ImportWarning, SkinningError, SourceError};
use crate::math::Trs;
use crate::resources::{Geometry, Material, Mesh, SharedMaterial, Texture, TextureMapSlot, TextureSource, Vertex};
use crate::scene::model::{Model, ModelParts};
use crate::scene::node::Node;
use crate::scene::{NodeHandle, NodeHierarchy};
use crate::settings::{ImportSettings, SkinningSettings};

pub struct ModelImporter<'a> {
    reader: &'a dyn AssetReader,
    import: &'a ImportSettings,
    skinning: &'a SkinningSettings,
}

impl<'a> ModelImporter<'a> {
    #[must_use]
    pub fn new(reader: &'a dyn AssetReader, import: &'a ImportSettings, skinning: &'a SkinningSettings) -> Self {
        Self {
            reader,
            import,
            skinning,
        }
    }

    /// Parses and imports the asset at `path`.
    pub fn import(&self, path: impl AsRef<Path>) -> Result<Model, ImportError> {
        let path = path.as_ref();
        let unreadable = |source| ImportError::AssetUnreadable {
            path: path.to_path_buf(),
            source,
        };

        let scene = self.reader.read(path).map_err(unreadable)?;
        let name = path
            .file_stem()
            .map_or_else(|| "Model".to_string(), |s| s.to_string_lossy().into_owned());
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();

        self.import_scene(&name, &scene, &directory).map_err(|err| match err {
            ImportError::AssetUnreadable { source, .. } => unreadable(source),
            other => other,
        })
    }

    /// Imports an already parsed scene. Texture files are looked up relative
    /// to `directory`.
    pub fn import_scene(&self, name: &str, scene: &SourceScene, directory: &Path) -> Result<Model, ImportError> {
        let unreadable = |source| ImportError::AssetUnreadable {
            path: directory.join(name),
            source,
        };
        if scene.incomplete {
            return Err(unreadable(SourceError::Incomplete));
        }
        let Some(root) = &scene.root else {
            return Err(unreadable(SourceError::MissingRoot));
        };

        let mut session = ImportSession {
            scene,
            directory,
            settings: self.import,
            max_bone_count: self.skinning.max_bone_count,
            hierarchy: NodeHierarchy::new(),
            cache: MaterialTextureCache::new(),
            nodes: Vec::new(),
            meshes: Vec::new(),
            bones: Vec::new(),
            bone_ids: FxHashMap::default(),
            warnings: Vec::new(),
        };

        session.process_embedded_textures();
        let root_handle = session.process_node(root, None)?;

        let ImportSession {
            hierarchy,
            cache,
            nodes,
            meshes,
            bones,
            warnings,
            ..
        } = session;

        let mut model = Model::from_parts(
            ModelParts {
                name: name.to_string(),
                directory: directory.to_path_buf(),
                hierarchy,
                root: root_handle,
                nodes,
                meshes,
                cache,
                warnings,
            },
            self.skinning,
        );

        for (bone_name, offset) in bones {
            model.initialize_bone(&bone_name, offset)?;
        }
        model.update()?;

        log::info!(
            "Imported model '{}': {} nodes, {} meshes, {} materials, {} textures, {} bones",
            model.name(),
            model.nodes().len(),
            model.meshes().len(),
            model.cache().materials.len(),
            model.cache().textures.len(),
            model.bones().len()
        );
        Ok(model)
    }
}

/// Mutable state of one import call.
struct ImportSession<'a> {
    scene: &'a SourceScene,
    directory: &'a Path,
    settings: &'a ImportSettings,
    max_bone_count: usize,

    hierarchy: NodeHierarchy,
    cache: MaterialTextureCache,
    nodes: Vec<NodeHandle>,
    meshes: Vec<Arc<Mesh>>,
    /// `(name, offset)` in id order.
    bones: Vec<(String, Mat4)>,
    bone_ids: FxHashMap<String, usize>,
    warnings: Vec<ImportWarning>,
}

impl ImportSession<'_> {
    fn warn(&mut self, warning: ImportWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    // ------------------------------------------------------------------------
    // Embedded textures
    // ------------------------------------------------------------------------

    fn process_embedded_textures(&mut self) {
        let scene = self.scene;
        for embedded in &scene.embedded_textures {
            if self.cache.textures.contains(&embedded.filename) {
                continue;
            }
            match decode_texture(&embedded.filename, &embedded.data, TextureSource::Embedded) {
                Ok(texture) => {
                    log::debug!("Extracted embedded texture {} ({} bytes)", embedded.filename, embedded.len());
                    self.cache.textures.insert(&embedded.filename, Arc::new(texture));
                }
                Err(err) => self.warn(ImportWarning::EmbeddedTextureDecode {
                    name: embedded.filename.clone(),
                    reason: err.to_string(),
                }),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------------

    fn process_node(&mut self, source: &SourceNode, parent: Option<NodeHandle>) -> Result<NodeHandle, ImportError> {
        let mut node = Node::new(source.name.clone());
        node.transform.set_trs(Trs::from_matrix(&source.transform));

        for &index in &source.meshes {
            let scene = self.scene;
            let mesh_source = scene
                .meshes
                .get(index)
                .ok_or_else(|| ImportError::MeshIndexOutOfBounds {
                    node: source.name.clone(),
                    index,
                })?;
            let mesh = self.process_mesh(mesh_source)?;
            node.attach_mesh(mesh);
        }

        let handle = match parent {
            Some(parent) => self.hierarchy.insert_child(parent, node),
            None => self.hierarchy.add_node(node),
        };
        self.nodes.push(handle);

        for child in &source.children {
            self.process_node(child, Some(handle))?;
        }
        Ok(handle)
    }

    // ------------------------------------------------------------------------
    // Meshes
    // ------------------------------------------------------------------------

    fn process_mesh(&mut self, source: &SourceMesh) -> Result<Arc<Mesh>, ImportError> {
        let mut vertices: Vec<Vertex> = source
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| {
                let normal = source.normals.get(i).copied().unwrap_or(Vec3::ZERO);
                let mut uv = source
                    .tex_coords
                    .as_ref()
                    .and_then(|uvs| uvs.get(i).copied())
                    .unwrap_or([0.0, 0.0]);
                if self.settings.flip_uvs {
                    uv[1] = 1.0 - uv[1];
                }
                Vertex::new(position, normal, uv)
            })
            .collect();

        let indices: Vec<u32> = source.faces.iter().flatten().copied().collect();

        for bone in &source.bones {
            let id = self.bone_id(&bone.name, bone.offset)?;
            for &(vertex, weight) in &bone.weights {
                let Some(v) = vertices.get_mut(vertex as usize) else {
                    continue;
                };
                if !v.add_bone_influence(id as i32, weight) {
                    log::debug!("Mesh {}: vertex {vertex} has more than 4 influences, dropping {}", source.name, bone.name);
                }
            }
        }

        let material = self.resolve_material(source)?;
        let mesh = Arc::new(Mesh::new(source.name.clone(), Geometry::new(vertices, indices), material));
        self.meshes.push(mesh.clone());
        Ok(mesh)
    }

    fn bone_id(&mut self, name: &str, offset: Mat4) -> Result<usize, SkinningError> {
        if let Some(&id) = self.bone_ids.get(name) {
            return Ok(id);
        }
        let id = self.bones.len();
        if id >= self.max_bone_count {
            return Err(SkinningError::BoneIndexOutOfRange {
                id,
                max: self.max_bone_count,
            });
        }
        self.bones.push((name.to_string(), offset));
        self.bone_ids.insert(name.to_string(), id);
        Ok(id)
    }

    // ------------------------------------------------------------------------
    // Materials
    // ------------------------------------------------------------------------

    fn resolve_material(&mut self, mesh: &SourceMesh) -> Result<SharedMaterial, ImportError> {
        let scene = self.scene;
        let source = scene
            .materials
            .get(mesh.material)
            .ok_or_else(|| ImportError::MaterialIndexOutOfBounds {
                mesh: mesh.name.clone(),
                index: mesh.material,
            })?;

        if let Some(existing) = self.cache.material(&source.name) {
            log::debug!("Material {} already processed", source.name);
            return Ok(existing);
        }

        let material = self.process_material(source);
        Ok(self.cache.materials.insert(&source.name, material.into_shared()))
    }

    fn process_material(&mut self, source: &SourceMaterial) -> Material {
        let mut material = Material::new(source.name.clone());
        if let Some(color) = source.color(keys::COLOR_DIFFUSE) {
            material.diffuse_color = color;
        }
        if let Some(color) = source.color(keys::COLOR_SPECULAR) {
            material.specular_color = color;
        }
        if let Some(color) = source.color(keys::COLOR_AMBIENT) {
            material.ambient_color = color;
        }
        if let Some(opacity) = source.float(keys::OPACITY) {
            material.opacity = opacity;
        }
        if let Some(shininess) = source.float(keys::SHININESS) {
            material.shininess = shininess;
        }

        for slot in TextureMapSlot::ALL {
            for filename in source.textures_for(slot) {
                if let Some(texture) = self.resolve_texture(&source.name, slot, filename) {
                    material.set_map(slot, texture);
                }
            }
        }
        material
    }

    fn resolve_texture(&mut self, material: &str, slot: TextureMapSlot, filename: &str) -> Option<Arc<Texture>> {
        if let Some(texture) = self.cache.texture(filename) {
            return Some(texture);
        }

        let path: PathBuf = resolve_texture_path(self.directory, filename);
        match self
            .cache
            .textures
            .try_get_or_create(filename, || load_texture_file(filename, &path))
        {
            Ok(texture) => Some(texture),
            Err(err) => {
                self.warn(ImportWarning::TextureLoad {
                    material: material.to_string(),
                    slot,
                    path,
                    reason: err.to_string(),
                });
                None
            }
        }
    }
}
