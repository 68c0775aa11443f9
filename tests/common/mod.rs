//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3, Vec4};
use skein::assets::source::keys;
use skein::assets::{AssetReader, SourceBone, SourceMaterial, SourceMesh, SourceNode, SourceScene};
use skein::errors::SourceError;

pub const EPSILON: f32 = 1e-4;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

/// Unique scratch directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("skein-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Reader that hands out a fixed scene regardless of the path.
pub struct StubReader(pub SourceScene);

impl AssetReader for StubReader {
    fn read(&self, _path: &Path) -> Result<SourceScene, SourceError> {
        Ok(self.0.clone())
    }
}

/// Four vertices, two triangles, material index `material`.
pub fn quad_mesh(name: &str, material: usize) -> SourceMesh {
    SourceMesh {
        name: name.to_string(),
        positions: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        normals: vec![Vec3::Z; 4],
        tex_coords: None,
        faces: vec![[0, 1, 2], [0, 2, 3]],
        material,
        bones: Vec::new(),
    }
}

/// A small rig in bind pose:
///
/// ```text
/// Armature
/// ├── Body        (mesh 0)
/// └── Hips        (0, 1, 0)
///     ├── Spine   (0, 1, 0)
///     │   └── Head (0, 0.5, 0)
///     └── LeftLeg (0.2, -1, 0)
/// ```
///
/// The mesh is skinned to Hips, Spine and Head with offsets that make every
/// skinning matrix identity in this pose.
pub fn rigged_scene() -> SourceScene {
    let translate = |x: f32, y: f32, z: f32| Mat4::from_translation(Vec3::new(x, y, z));

    let mut body = quad_mesh("BodyMesh", 0);
    body.bones = vec![
        SourceBone {
            name: "Hips".into(),
            offset: translate(0.0, -1.0, 0.0),
            weights: vec![(0, 1.0), (1, 1.0)],
        },
        SourceBone {
            name: "Spine".into(),
            offset: translate(0.0, -2.0, 0.0),
            weights: vec![(2, 1.0), (3, 0.5)],
        },
        SourceBone {
            name: "Head".into(),
            offset: translate(0.0, -2.5, 0.0),
            weights: vec![(3, 0.5)],
        },
    ];

    let root = SourceNode::new("Armature")
        .with_child(SourceNode::new("Body").with_meshes([0]))
        .with_child(
            SourceNode::new("Hips")
                .with_transform(translate(0.0, 1.0, 0.0))
                .with_child(
                    SourceNode::new("Spine")
                        .with_transform(translate(0.0, 1.0, 0.0))
                        .with_child(SourceNode::new("Head").with_transform(translate(0.0, 0.5, 0.0))),
                )
                .with_child(SourceNode::new("LeftLeg").with_transform(translate(0.2, -1.0, 0.0))),
        );

    SourceScene {
        root: Some(root),
        meshes: vec![body],
        materials: vec![SourceMaterial::new("Skin").with_color(keys::COLOR_DIFFUSE, Vec4::new(0.8, 0.6, 0.5, 1.0))],
        embedded_textures: Vec::new(),
        incomplete: false,
    }
}
