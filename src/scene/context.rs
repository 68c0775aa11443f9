//! Explicit engine context.
//!
//! [`SceneContext`] carries the startup settings and the asset reader. It is
//! created once and passed to whatever needs to import models or build
//! scenes; there is no global state.

use std::path::Path;
use std::sync::Arc;

use glam::{Vec3, Vec4};

use crate::assets::importer::ModelImporter;
use crate::assets::loaders::GltfReader;
use crate::assets::source::AssetReader;
use crate::errors::{ImportError, Result};
use crate::resources::primitives::{PlaneOptions, create_plane};
use crate::resources::{Material, Mesh};
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::model::Model;
use crate::scene::node::{Node, NodeKind};
use crate::scene::scene::Scene;
use crate::settings::{EngineSettings, SceneMode};

const CAMERA_FOV: f32 = 60.0;
const CAMERA_ASPECT: f32 = 1.77;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;

const EDITOR_CAMERA_POSITION: Vec3 = Vec3::new(-0.738, 5.788, 14.731);
const EDITOR_CAMERA_EULER: Vec3 = Vec3::new(-18.102, 0.066, 0.0);
const SCENE_CAMERA_POSITION: Vec3 = Vec3::new(7.156, 2.951, 8.770);
const SCENE_CAMERA_EULER: Vec3 = Vec3::new(-13.235, 38.064, 0.0);

const GROUND_SCALE: f32 = 10.0;
const GROUND_AMBIENT: Vec4 = Vec4::new(0.7, 0.7, 0.7, 1.0);

pub struct SceneContext {
    settings: EngineSettings,
    reader: Box<dyn AssetReader>,
}

impl SceneContext {
    /// Context reading assets with the built-in glTF reader.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_reader(settings, Box::new(GltfReader::new()))
    }

    #[must_use]
    pub fn with_reader(settings: EngineSettings, reader: Box<dyn AssetReader>) -> Self {
        Self { settings, reader }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn importer(&self) -> ModelImporter<'_> {
        ModelImporter::new(self.reader.as_ref(), &self.settings.import, &self.settings.skinning)
    }

    pub fn load_model(&self, path: impl AsRef<Path>) -> std::result::Result<Model, ImportError> {
        self.importer().import(path)
    }

    /// Builds a fresh scene according to the configured [`SceneMode`].
    ///
    /// World transforms are computed once before the scene is returned.
    pub fn create_new_scene(&self, name: impl Into<String>) -> Result<Scene> {
        let mut scene = Scene::new(name);

        if self.settings.scene_mode == SceneMode::WithEditorCamera {
            let mut editor = Node::new("EditorCamera").with_kind(NodeKind::Camera(Self::default_camera()));
            editor.transform.position = EDITOR_CAMERA_POSITION;
            editor.transform.rotation = EDITOR_CAMERA_EULER;
            // 编辑器相机不属于场景内容，作为独立根节点
            scene.editor_camera = Some(scene.hierarchy.add_node(editor));
        }

        let mut camera = Node::new("SceneCamera").with_kind(NodeKind::Camera(Self::default_camera()));
        camera.transform.position = SCENE_CAMERA_POSITION;
        camera.transform.rotation = SCENE_CAMERA_EULER;
        scene.scene_camera = Some(scene.add_node(camera, None)?);

        let mut light = Node::new("DirectionalLight").with_kind(NodeKind::Light(Light::new_directional(Vec3::ONE, 1.0)));
        light.transform.rotation = Vec3::new(-45.0, 45.0, 0.0);
        scene.add_node(light, None)?;

        scene.add_node(Self::ground_node(), None)?;

        if self.settings.scene_mode == SceneMode::WithoutEditorCamera
            && let Some(startup) = &self.settings.startup_model
        {
            let model = self.load_model(&startup.path)?;
            let key = scene.instantiate_model(model, None)?;
            let anchor = scene.model(key).map(|instance| instance.anchor);
            if let Some(anchor) = anchor.and_then(|h| scene.hierarchy.get_mut(h)) {
                anchor.transform.scale = Vec3::splat(startup.scale);
            }
        }

        scene.update()?;
        log::info!("Created scene {} ({:?})", scene.name, self.settings.scene_mode);
        Ok(scene)
    }

    fn default_camera() -> Camera {
        Camera::new_perspective(CAMERA_FOV, CAMERA_ASPECT, CAMERA_NEAR, CAMERA_FAR)
    }

    fn ground_node() -> Node {
        let material = Material::new("Ground").with_ambient(GROUND_AMBIENT).into_shared();
        let mesh = Mesh::new("Ground", create_plane(&PlaneOptions::default()), material);

        let mut ground = Node::new("Ground").with_mesh(Arc::new(mesh));
        ground.transform.rotation = Vec3::new(-90.0, 0.0, 0.0);
        ground.transform.scale = Vec3::splat(GROUND_SCALE);
        ground
    }
}
