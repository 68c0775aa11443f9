//! Asset import tests
//!
//! Tests for:
//! - Node tree reconstruction and transform decomposition
//! - Mesh building (missing UVs and normals, face flattening)
//! - Material and texture deduplication by name
//! - Texture resolution order (embedded before file) and load failures
//! - Unreadable, incomplete and malformed sources
//! - End-to-end glTF import, skins and malformed accessors

mod common;

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::{StubReader, init_logger, quad_mesh, scratch_dir, vec3_approx};
use glam::{Mat4, Quat, Vec3, Vec4};
use skein::assets::source::keys;
use skein::assets::{EmbeddedTexture, SourceMaterial, SourceMesh, SourceNode, SourceScene};
use skein::errors::{ImportError, ImportWarning, SourceError};
use skein::resources::TextureSource;
use skein::settings::{ImportSettings, SkinningSettings};
use skein::{GltfReader, Model, ModelImporter, TextureMapSlot};

// ============================================================================
// Helper
// ============================================================================

fn import_scene(scene: &SourceScene, dir: &Path) -> Result<Model, ImportError> {
    import_scene_with(scene, dir, &ImportSettings::default())
}

fn import_scene_with(scene: &SourceScene, dir: &Path, settings: &ImportSettings) -> Result<Model, ImportError> {
    init_logger();
    let reader = StubReader(SourceScene::default());
    let skinning = SkinningSettings::default();
    ModelImporter::new(&reader, settings, &skinning).import_scene("test", scene, dir)
}

fn single_mesh_scene(mesh: SourceMesh, material: SourceMaterial) -> SourceScene {
    SourceScene {
        root: Some(SourceNode::new("Root").with_meshes([0])),
        meshes: vec![mesh],
        materials: vec![material],
        ..SourceScene::default()
    }
}

fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(color));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}

// ============================================================================
// Node Tree
// ============================================================================

#[test]
fn node_tree_mirrors_source() {
    let rotation = Quat::from_rotation_x(30f32.to_radians());
    let transform = Mat4::from_scale_rotation_translation(Vec3::splat(2.0), rotation, Vec3::new(1.0, 2.0, 3.0));
    let scene = SourceScene {
        root: Some(
            SourceNode::new("Root")
                .with_child(SourceNode::new("A").with_transform(transform).with_child(SourceNode::new("A1")))
                .with_child(SourceNode::new("B")),
        ),
        ..SourceScene::default()
    };
    let model = import_scene(&scene, Path::new(".")).unwrap();

    let names: Vec<&str> = model
        .nodes()
        .iter()
        .map(|&h| model.hierarchy()[h].name.as_str())
        .collect();
    assert_eq!(names, ["Root", "A", "A1", "B"]);

    let a = model.find_node_by_name("A").unwrap();
    let t = &model.hierarchy()[a].transform;
    assert!(vec3_approx(t.position, Vec3::new(1.0, 2.0, 3.0)));
    assert!(vec3_approx(t.rotation, Vec3::new(30.0, 0.0, 0.0)));
    assert!(vec3_approx(t.scale, Vec3::splat(2.0)));

    // First update already ran during import
    let a1 = model.find_node_by_name("A1").unwrap();
    assert!(
        model.hierarchy()[a1]
            .transform
            .world_matrix_as_mat4()
            .abs_diff_eq(transform, 1e-4)
    );
}

#[test]
fn mesh_index_out_of_bounds_is_an_error() {
    let scene = SourceScene {
        root: Some(SourceNode::new("Root").with_meshes([3])),
        ..SourceScene::default()
    };
    let err = import_scene(&scene, Path::new(".")).unwrap_err();
    assert!(matches!(err, ImportError::MeshIndexOutOfBounds { index: 3, .. }));
}

// ============================================================================
// Meshes
// ============================================================================

#[test]
fn missing_uvs_and_normals_default_to_zero() {
    let mut mesh = quad_mesh("Quad", 0);
    mesh.normals.clear();
    let model = import_scene(&single_mesh_scene(mesh, SourceMaterial::new("M")), Path::new(".")).unwrap();

    let mesh = &model.meshes()[0];
    assert_eq!(mesh.name, "Quad");
    for v in mesh.vertices() {
        assert_eq!(v.tex_coord, [0.0, 0.0]);
        assert_eq!(v.normal, [0.0, 0.0, 0.0]);
        assert_eq!(v.bone_ids, [-1; 4]);
    }
    assert_eq!(mesh.vertices()[2].position, [1.0, 1.0, 0.0, 1.0]);
}

#[test]
fn faces_flatten_in_order() {
    let model = import_scene(&single_mesh_scene(quad_mesh("Quad", 0), SourceMaterial::new("M")), Path::new(".")).unwrap();
    assert_eq!(model.meshes()[0].indices(), &[0, 1, 2, 0, 2, 3]);
    assert_eq!(model.meshes()[0].geometry.triangle_count(), 2);
}

#[test]
fn uv_flip_is_optional() {
    let mut mesh = quad_mesh("Quad", 0);
    mesh.tex_coords = Some(vec![[0.0, 0.25], [1.0, 0.25], [1.0, 1.0], [0.0, 1.0]]);
    let scene = single_mesh_scene(mesh, SourceMaterial::new("M"));

    let plain = import_scene(&scene, Path::new(".")).unwrap();
    assert_eq!(plain.meshes()[0].vertices()[0].tex_coord, [0.0, 0.25]);

    let flipped = import_scene_with(&scene, Path::new("."), &ImportSettings { flip_uvs: true }).unwrap();
    assert_eq!(flipped.meshes()[0].vertices()[0].tex_coord, [0.0, 0.75]);
}

#[test]
fn node_with_meshes_becomes_renderer() {
    let model = import_scene(&single_mesh_scene(quad_mesh("Quad", 0), SourceMaterial::new("M")), Path::new(".")).unwrap();
    let root = &model.hierarchy()[model.root()];
    assert_eq!(root.meshes.len(), 1);
    assert!(Arc::ptr_eq(&root.meshes[0], &model.meshes()[0]));
}

// ============================================================================
// Materials
// ============================================================================

#[test]
fn materials_are_deduplicated_by_name() {
    let scene = SourceScene {
        root: Some(
            SourceNode::new("Root")
                .with_child(SourceNode::new("Left").with_meshes([0]))
                .with_child(SourceNode::new("Right").with_meshes([1])),
        ),
        meshes: vec![quad_mesh("LeftMesh", 0), quad_mesh("RightMesh", 1)],
        materials: vec![
            SourceMaterial::new("Skin").with_float(keys::SHININESS, 8.0),
            // Same name, different content: the first one wins
            SourceMaterial::new("Skin").with_float(keys::SHININESS, 99.0),
        ],
        ..SourceScene::default()
    };
    let model = import_scene(&scene, Path::new(".")).unwrap();

    assert_eq!(model.meshes().len(), 2);
    assert_eq!(model.materials().count(), 1);
    let [left, right] = model.meshes() else {
        panic!("expected two meshes");
    };
    assert!(left.shares_material_with(right));
    assert!(Arc::ptr_eq(&left.material, &model.material("Skin").unwrap()));
    assert!((left.material.read().shininess - 8.0).abs() < f32::EPSILON);
}

#[test]
fn material_properties_are_copied() {
    let material = SourceMaterial::new("Paint")
        .with_color(keys::COLOR_DIFFUSE, Vec4::new(1.0, 0.0, 0.0, 1.0))
        .with_color(keys::COLOR_SPECULAR, Vec4::new(0.5, 0.5, 0.5, 1.0))
        .with_color(keys::COLOR_AMBIENT, Vec4::new(0.1, 0.1, 0.1, 1.0))
        .with_float(keys::OPACITY, 0.5)
        .with_float(keys::SHININESS, 64.0);
    let model = import_scene(&single_mesh_scene(quad_mesh("Quad", 0), material), Path::new(".")).unwrap();

    let material = model.material("Paint").unwrap();
    let m = material.read();
    assert_eq!(m.diffuse_color, Vec4::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(m.specular_color, Vec4::new(0.5, 0.5, 0.5, 1.0));
    assert_eq!(m.ambient_color, Vec4::new(0.1, 0.1, 0.1, 1.0));
    assert!((m.opacity - 0.5).abs() < f32::EPSILON);
    assert!((m.shininess - 64.0).abs() < f32::EPSILON);
    assert_eq!(m.assigned_maps().count(), 0);
}

#[test]
fn material_index_out_of_bounds_is_an_error() {
    let scene = SourceScene {
        root: Some(SourceNode::new("Root").with_meshes([0])),
        meshes: vec![quad_mesh("Quad", 5)],
        ..SourceScene::default()
    };
    let err = import_scene(&scene, Path::new(".")).unwrap_err();
    assert!(matches!(err, ImportError::MaterialIndexOutOfBounds { index: 5, .. }));
}

// ============================================================================
// Textures
// ============================================================================

#[test]
fn missing_texture_file_leaves_slot_empty() {
    let dir = scratch_dir();
    let material = SourceMaterial::new("Skin").with_texture(TextureMapSlot::Diffuse, "missing.png");
    let model = import_scene(&single_mesh_scene(quad_mesh("Quad", 0), material), &dir).unwrap();

    assert!(model.material("Skin").unwrap().read().map(TextureMapSlot::Diffuse).is_none());
    assert_eq!(model.textures().count(), 0);
    assert!(model.warnings().iter().any(|w| matches!(
        w,
        ImportWarning::TextureLoad { material, slot: TextureMapSlot::Diffuse, .. } if material == "Skin"
    )));
}

#[test]
fn external_texture_is_loaded_once_and_shared() -> anyhow::Result<()> {
    let dir = scratch_dir();
    std::fs::create_dir_all(dir.join("textures"))?;
    std::fs::write(dir.join("textures/skin.png"), png_bytes(2, 2, [0, 255, 0, 255]))?;

    let scene = SourceScene {
        root: Some(SourceNode::new("Root").with_meshes([0, 1])),
        meshes: vec![quad_mesh("A", 0), quad_mesh("B", 1)],
        materials: vec![
            SourceMaterial::new("First").with_texture(TextureMapSlot::Diffuse, "textures\\skin.png"),
            SourceMaterial::new("Second").with_texture(TextureMapSlot::Normal, "textures\\skin.png"),
        ],
        ..SourceScene::default()
    };
    let model = import_scene(&scene, &dir)?;
    assert!(model.warnings().is_empty(), "{:?}", model.warnings());
    assert_eq!(model.textures().count(), 1);

    let first = model.material("First").unwrap().read().map(TextureMapSlot::Diffuse).cloned().unwrap();
    let second = model.material("Second").unwrap().read().map(TextureMapSlot::Normal).cloned().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!((first.width, first.height), (2, 2));
    assert_eq!(&first.data[..4], &[0, 255, 0, 255]);
    assert_eq!(first.source, TextureSource::External(dir.join("textures/skin.png")));
    Ok(())
}

#[test]
fn embedded_texture_wins_over_file() {
    let dir = scratch_dir();
    std::fs::write(dir.join("skin.png"), png_bytes(4, 4, [0, 0, 255, 255])).unwrap();

    let mut scene = single_mesh_scene(
        quad_mesh("Quad", 0),
        SourceMaterial::new("Skin").with_texture(TextureMapSlot::Diffuse, "skin.png"),
    );
    scene.embedded_textures.push(EmbeddedTexture {
        filename: "skin.png".into(),
        data: png_bytes(1, 1, [255, 0, 0, 255]),
    });
    let model = import_scene(&scene, &dir).unwrap();

    let texture = model.material("Skin").unwrap().read().map(TextureMapSlot::Diffuse).cloned().unwrap();
    assert!(texture.is_embedded());
    assert_eq!((texture.width, texture.height), (1, 1));
}

#[test]
fn undecodable_embedded_texture_is_skipped() {
    let mut scene = single_mesh_scene(quad_mesh("Quad", 0), SourceMaterial::new("M"));
    scene.embedded_textures.push(EmbeddedTexture {
        filename: "*0".into(),
        data: b"definitely not a png".to_vec(),
    });
    let model = import_scene(&scene, Path::new(".")).unwrap();

    assert_eq!(model.textures().count(), 0);
    assert!(matches!(
        model.warnings(),
        [ImportWarning::EmbeddedTextureDecode { name, .. }] if name == "*0"
    ));
}

// ============================================================================
// Unreadable Sources
// ============================================================================

#[test]
fn nonexistent_file_is_unreadable() {
    let settings = skein::EngineSettings::default();
    let ctx = skein::SceneContext::new(settings);
    let err = ctx.load_model("/no/such/dir/model.gltf").unwrap_err();
    assert!(matches!(err, ImportError::AssetUnreadable { source: SourceError::Io(_), .. }));
}

#[test]
fn corrupt_file_is_unreadable() {
    let dir = scratch_dir();
    let path = dir.join("broken.gltf");
    std::fs::write(&path, b"{ this is not json").unwrap();

    let reader = GltfReader::new();
    let import = ImportSettings::default();
    let skinning = SkinningSettings::default();
    let err = ModelImporter::new(&reader, &import, &skinning).import(&path).unwrap_err();
    match err {
        ImportError::AssetUnreadable { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn incomplete_scene_is_unreadable() {
    let mut scene = single_mesh_scene(quad_mesh("Quad", 0), SourceMaterial::new("M"));
    scene.incomplete = true;
    let err = import_scene(&scene, Path::new(".")).unwrap_err();
    assert!(matches!(err, ImportError::AssetUnreadable { source: SourceError::Incomplete, .. }));
}

#[test]
fn rootless_scene_is_unreadable() {
    let err = import_scene(&SourceScene::default(), Path::new(".")).unwrap_err();
    assert!(matches!(err, ImportError::AssetUnreadable { source: SourceError::MissingRoot, .. }));
}

// ============================================================================
// glTF End-to-End
// ============================================================================

/// One triangle mesh without UVs or normals, used by two nodes.
fn write_triangle_gltf(dir: &Path) -> anyhow::Result<std::path::PathBuf> {
    let mut buffer = Vec::new();
    for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in p {
            buffer.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        buffer.extend_from_slice(&i.to_le_bytes());
    }
    let uri = format!("data:application/octet-stream;base64,{}", STANDARD.encode(&buffer));

    let json = serde_json::json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "Body", "mesh": 0, "translation": [1.0, 2.0, 3.0], "children": [1] },
            { "name": "Arm", "mesh": 0 }
        ],
        "meshes": [{
            "name": "Triangle",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }]
        }],
        "materials": [{ "name": "Skin" }],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
        ],
        "buffers": [{ "byteLength": buffer.len(), "uri": uri }]
    });

    let path = dir.join("triangle.gltf");
    std::fs::write(&path, serde_json::to_vec_pretty(&json)?)?;
    Ok(path)
}

#[test]
fn gltf_file_imports_end_to_end() -> anyhow::Result<()> {
    init_logger();
    let dir = scratch_dir();
    let path = write_triangle_gltf(&dir)?;

    let ctx = skein::SceneContext::new(skein::EngineSettings::default());
    let model = ctx.load_model(&path)?;

    assert_eq!(model.name(), "triangle");
    assert_eq!(model.directory(), dir.as_path());

    let body = model.find_node_by_name("Body").unwrap();
    let arm = model.find_node_by_name("Arm").unwrap();
    assert_eq!(model.hierarchy().parent_of(body), Some(model.root()));
    assert_eq!(model.hierarchy().parent_of(arm), Some(body));
    assert!(vec3_approx(
        model.hierarchy()[arm].transform.world_position(),
        Vec3::new(1.0, 2.0, 3.0)
    ));

    // One mesh per node reference, one shared material
    assert_eq!(model.meshes().len(), 2);
    assert_eq!(model.materials().count(), 1);
    assert!(model.meshes()[0].shares_material_with(&model.meshes()[1]));

    let mesh = &model.meshes()[0];
    assert_eq!(mesh.indices(), &[0, 1, 2]);
    assert!(mesh.vertices().iter().all(|v| v.tex_coord == [0.0, 0.0]));
    assert_eq!(mesh.vertices()[1].position, [1.0, 0.0, 0.0, 1.0]);
    Ok(())
}

// ============================================================================
// glTF Skins & Malformed Accessors
// ============================================================================

/// Appends `bytes` at the next 4-byte boundary and returns its buffer view.
fn push_view(buffer: &mut Vec<u8>, bytes: &[u8]) -> serde_json::Value {
    while buffer.len() % 4 != 0 {
        buffer.push(0);
    }
    let offset = buffer.len();
    buffer.extend_from_slice(bytes);
    serde_json::json!({ "buffer": 0, "byteOffset": offset, "byteLength": bytes.len() })
}

/// Writes `doc` with `buffer` inlined as its only buffer.
fn write_gltf(dir: &Path, file: &str, buffer: &[u8], mut doc: serde_json::Value) -> anyhow::Result<std::path::PathBuf> {
    doc["asset"] = serde_json::json!({ "version": "2.0" });
    doc["buffers"] = serde_json::json!([{
        "byteLength": buffer.len(),
        "uri": format!("data:application/octet-stream;base64,{}", STANDARD.encode(buffer)),
    }]);
    let path = dir.join(file);
    std::fs::write(&path, serde_json::to_vec_pretty(&doc)?)?;
    Ok(path)
}

fn read_gltf(path: &Path) -> Result<Model, ImportError> {
    init_logger();
    let reader = GltfReader::new();
    let import = ImportSettings::default();
    let skinning = SkinningSettings::default();
    ModelImporter::new(&reader, &import, &skinning).import(path)
}

/// Hips (0,1,0) -> Spine (0,1,0) skin; every vertex follows Spine only.
fn write_skinned_gltf(dir: &Path) -> anyhow::Result<std::path::PathBuf> {
    let positions: [[f32; 3]; 3] = [[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 2.0, 0.0]];
    let indices: [u16; 3] = [0, 1, 2];
    let joints: [[u16; 4]; 3] = [[1, 0, 0, 0]; 3];
    let weights: [[f32; 4]; 3] = [[1.0, 0.0, 0.0, 0.0]; 3];
    let ibms = [
        Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)).to_cols_array(),
        Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0)).to_cols_array(),
    ];

    let mut buffer = Vec::new();
    let views = vec![
        push_view(&mut buffer, bytemuck::cast_slice(&positions)),
        push_view(&mut buffer, bytemuck::cast_slice(&indices)),
        push_view(&mut buffer, bytemuck::cast_slice(&joints)),
        push_view(&mut buffer, bytemuck::cast_slice(&weights)),
        push_view(&mut buffer, bytemuck::cast_slice(&ibms)),
    ];

    let doc = serde_json::json!({
        "scene": 0,
        "scenes": [{ "nodes": [0, 1] }],
        "nodes": [
            { "name": "Body", "mesh": 0, "skin": 0 },
            { "name": "Hips", "translation": [0.0, 1.0, 0.0], "children": [2] },
            { "name": "Spine", "translation": [0.0, 1.0, 0.0] }
        ],
        "skins": [{ "joints": [1, 2], "inverseBindMatrices": 4 }],
        "meshes": [{
            "name": "Blob",
            "primitives": [{
                "attributes": { "POSITION": 0, "JOINTS_0": 2, "WEIGHTS_0": 3 },
                "indices": 1
            }]
        }],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 1.0, 0.0], "max": [1.0, 2.0, 0.0]
            },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" },
            { "bufferView": 2, "componentType": 5123, "count": 3, "type": "VEC4" },
            { "bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC4" },
            { "bufferView": 4, "componentType": 5126, "count": 2, "type": "MAT4" }
        ],
        "bufferViews": views
    });
    write_gltf(dir, "rig.gltf", &buffer, doc)
}

#[test]
fn gltf_skin_joints_become_bones() -> anyhow::Result<()> {
    let dir = scratch_dir();
    let model = read_gltf(&write_skinned_gltf(&dir)?)?;

    // Joint order gives the ids; Hips carries no weights but is still a bone
    let names: Vec<&str> = model.bones().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Hips", "Spine"]);

    let hips = model.find_bone_by_name("Hips").unwrap();
    let spine = model.find_bone_by_name("Spine").unwrap();
    assert!(hips.is_bound() && spine.is_bound());
    assert!(hips.offset.abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)), 1e-6));
    assert!(spine.offset.abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0)), 1e-6));

    // Weightless joints still get their markers
    assert_eq!(hips.markers().unwrap().segments.len(), 1);

    let mesh = &model.meshes()[0];
    for v in mesh.vertices() {
        assert_eq!(v.bone_ids, [spine.id as i32, -1, -1, -1]);
        assert_eq!(v.bone_weights, [1.0, 0.0, 0.0, 0.0]);
    }

    // Bind pose skins to identity
    for bone in model.bones() {
        let m = model.skinning_matrices().get(bone.id).unwrap();
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-5), "{}: {m:?}", bone.name);
    }
    Ok(())
}

#[test]
fn gltf_float_indices_are_unreadable() -> anyhow::Result<()> {
    let dir = scratch_dir();
    let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let indices: [f32; 3] = [0.0, 1.0, 2.0];
    let mut buffer = Vec::new();
    let views = vec![
        push_view(&mut buffer, bytemuck::cast_slice(&positions)),
        push_view(&mut buffer, bytemuck::cast_slice(&indices)),
    ];
    let doc = serde_json::json!({
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "Body", "mesh": 0 }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "SCALAR" }
        ],
        "bufferViews": views
    });
    let path = write_gltf(&dir, "float_indices.gltf", &buffer, doc)?;

    let err = read_gltf(&path).unwrap_err();
    assert!(
        matches!(
            err,
            ImportError::AssetUnreadable { source: SourceError::InvalidAccessor { index: 1, role: "indices", .. }, .. }
        ),
        "{err}"
    );
    Ok(())
}

#[test]
fn gltf_inverse_bind_matrices_must_be_mat4() -> anyhow::Result<()> {
    let dir = scratch_dir();
    let path = write_skinned_gltf(&dir)?;

    // Point the skin at the U16 index accessor instead
    let mut doc: serde_json::Value = serde_json::from_slice(&std::fs::read(&path)?)?;
    doc["skins"][0]["inverseBindMatrices"] = serde_json::json!(1);
    std::fs::write(&path, serde_json::to_vec_pretty(&doc)?)?;

    let err = read_gltf(&path).unwrap_err();
    assert!(
        matches!(
            err,
            ImportError::AssetUnreadable {
                source: SourceError::InvalidAccessor { role: "inverseBindMatrices", .. },
                ..
            }
        ),
        "{err}"
    );
    Ok(())
}
