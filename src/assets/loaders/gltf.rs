//! glTF 2.0 reader.
//!
//! Maps a `.gltf`/`.glb` document onto a [`SourceScene`]:
//! - the default scene (or the first one) hangs below a synthetic root node;
//! - every primitive becomes one triangulated [`SourceMesh`];
//! - images stored in the file become embedded textures keyed by image name,
//!   or `*{index}` for unnamed ones; images referenced by URI stay filename
//!   references resolved by the importer;
//! - skins become per-mesh bones named after their joint nodes.

use std::borrow::Cow;
use std::path::Path;

use base64::Engine as _;
use glam::{Mat4, Vec3, Vec4};
use gltf::Semantic;
use gltf::accessor::{DataType, Dimensions};
use gltf::image::Source as ImageSource;
use gltf::mesh::Mode;
use rustc_hash::FxHashMap;

use crate::assets::source::{
    AssetReader, EmbeddedTexture, SourceBone, SourceMaterial, SourceMesh, SourceNode, SourceScene, keys,
};
use crate::errors::SourceError;
use crate::resources::TextureMapSlot;

const DEFAULT_MATERIAL_NAME: &str = "DefaultMaterial";

/// Reads glTF files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct GltfReader;

impl GltfReader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AssetReader for GltfReader {
    fn read(&self, path: &Path) -> Result<SourceScene, SourceError> {
        let bytes = std::fs::read(path)?;
        let gltf = gltf::Gltf::from_slice(&bytes)?;
        let base_path = path.parent().unwrap_or_else(|| Path::new("."));
        let buffers = load_buffers(&gltf, base_path)?;

        let mut builder = SceneBuilder::new(&buffers);
        builder.load_images(&gltf)?;
        builder.load_materials(&gltf);

        let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) else {
            return Ok(builder.finish(None));
        };
        let root_name = scene.name().unwrap_or("RootNode").to_string();
        let mut root = SourceNode::new(root_name);
        for node in scene.nodes() {
            root.children.push(builder.load_node(&node)?);
        }
        log::debug!(
            "glTF '{}': {} meshes, {} materials, {} embedded images",
            path.display(),
            builder.meshes.len(),
            builder.materials.len(),
            builder.embedded.len()
        );
        Ok(builder.finish(Some(root)))
    }
}

fn load_buffers(gltf: &gltf::Gltf, base_path: &Path) -> Result<Vec<Vec<u8>>, SourceError> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| SourceError::MissingBuffer("GLB binary chunk".to_string()))?,
            gltf::buffer::Source::Uri(uri) => match decode_data_uri(uri) {
                Some(decoded) => decoded?,
                None => std::fs::read(base_path.join(decode_uri(uri).as_ref()))?,
            },
        };
        if data.len() < buffer.length() {
            return Err(SourceError::MissingBuffer(format!(
                "buffer {} holds {} of {} bytes",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        buffer_data.push(data);
    }
    Ok(buffer_data)
}

/// Payload of a `data:...;base64,` URI, `None` for any other URI.
fn decode_data_uri(uri: &str) -> Option<Result<Vec<u8>, base64::DecodeError>> {
    let (_, payload) = uri.strip_prefix("data:")?.split_once(";base64,")?;
    Some(base64::engine::general_purpose::STANDARD.decode(payload))
}

/// Relative URI with `%XX` escapes decoded; kept as is when the escapes are
/// not valid UTF-8.
fn decode_uri(uri: &str) -> Cow<'_, str> {
    urlencoding::decode(uri).unwrap_or(Cow::Borrowed(uri))
}

/// Rejects accessors whose layout the `gltf` readers cannot iterate.
fn check_accessor(
    accessor: &gltf::Accessor,
    role: &'static str,
    data_types: &[DataType],
    dimensions: Dimensions,
) -> Result<(), SourceError> {
    if data_types.contains(&accessor.data_type()) && accessor.dimensions() == dimensions {
        return Ok(());
    }
    Err(SourceError::InvalidAccessor {
        index: accessor.index(),
        role,
        found: format!("{:?} {:?}", accessor.data_type(), accessor.dimensions()),
    })
}

fn check_primitive(primitive: &gltf::Primitive, skinned: bool) -> Result<(), SourceError> {
    if let Some(accessor) = primitive.get(&Semantic::Positions) {
        check_accessor(&accessor, "POSITION", &[DataType::F32], Dimensions::Vec3)?;
    }
    if let Some(accessor) = primitive.get(&Semantic::Normals) {
        check_accessor(&accessor, "NORMAL", &[DataType::F32], Dimensions::Vec3)?;
    }
    if let Some(accessor) = primitive.get(&Semantic::TexCoords(0)) {
        check_accessor(&accessor, "TEXCOORD_0", &[DataType::F32, DataType::U8, DataType::U16], Dimensions::Vec2)?;
    }
    if let Some(accessor) = primitive.indices() {
        check_accessor(&accessor, "indices", &[DataType::U8, DataType::U16, DataType::U32], Dimensions::Scalar)?;
    }
    if skinned {
        if let Some(accessor) = primitive.get(&Semantic::Joints(0)) {
            check_accessor(&accessor, "JOINTS_0", &[DataType::U8, DataType::U16], Dimensions::Vec4)?;
        }
        if let Some(accessor) = primitive.get(&Semantic::Weights(0)) {
            check_accessor(&accessor, "WEIGHTS_0", &[DataType::F32, DataType::U8, DataType::U16], Dimensions::Vec4)?;
        }
    }
    Ok(())
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

struct SceneBuilder<'a> {
    buffers: &'a [Vec<u8>],
    /// Texture reference name per glTF image index.
    image_keys: Vec<String>,
    embedded: Vec<EmbeddedTexture>,
    materials: Vec<SourceMaterial>,
    default_material: Option<usize>,
    meshes: Vec<SourceMesh>,
    /// Unskinned glTF mesh index -> produced source meshes.
    mesh_cache: FxHashMap<usize, Vec<usize>>,
}

impl<'a> SceneBuilder<'a> {
    fn new(buffers: &'a [Vec<u8>]) -> Self {
        Self {
            buffers,
            image_keys: Vec::new(),
            embedded: Vec::new(),
            materials: Vec::new(),
            default_material: None,
            meshes: Vec::new(),
            mesh_cache: FxHashMap::default(),
        }
    }

    fn finish(self, root: Option<SourceNode>) -> SourceScene {
        SourceScene {
            root,
            meshes: self.meshes,
            materials: self.materials,
            embedded_textures: self.embedded,
            incomplete: false,
        }
    }

    // ------------------------------------------------------------------------
    // Images & Materials
    // ------------------------------------------------------------------------

    fn load_images(&mut self, gltf: &gltf::Gltf) -> Result<(), SourceError> {
        for image in gltf.images() {
            let embedded_key = || {
                image
                    .name()
                    .map_or_else(|| format!("*{}", image.index()), str::to_string)
            };
            let key = match image.source() {
                ImageSource::View { view, .. } => {
                    let buffer = self
                        .buffers
                        .get(view.buffer().index())
                        .ok_or_else(|| SourceError::MissingBuffer(format!("image {}", image.index())))?;
                    let start = view.offset();
                    let end = start + view.length();
                    let data = buffer
                        .get(start..end)
                        .ok_or_else(|| SourceError::MissingBuffer(format!("image {} view", image.index())))?
                        .to_vec();
                    let key = embedded_key();
                    self.embedded.push(EmbeddedTexture {
                        filename: key.clone(),
                        data,
                    });
                    key
                }
                ImageSource::Uri { uri, .. } => match decode_data_uri(uri) {
                    Some(decoded) => {
                        let key = embedded_key();
                        self.embedded.push(EmbeddedTexture {
                            filename: key.clone(),
                            data: decoded?,
                        });
                        key
                    }
                    None => decode_uri(uri).into_owned(),
                },
            };
            self.image_keys.push(key);
        }
        Ok(())
    }

    fn load_materials(&mut self, gltf: &gltf::Gltf) {
        for material in gltf.materials() {
            let index = material.index().unwrap_or(self.materials.len());
            let name = material
                .name()
                .map_or_else(|| format!("Material_{index}"), str::to_string);

            let pbr = material.pbr_metallic_roughness();
            let base_color = Vec4::from_array(pbr.base_color_factor());
            // Blinn-Phong 近似：粗糙度越低，高光越集中
            let shininess = (1.0 - pbr.roughness_factor()).powi(2) * 128.0;

            let mut source = SourceMaterial::new(name)
                .with_color(keys::COLOR_DIFFUSE, base_color)
                .with_float(keys::OPACITY, base_color.w)
                .with_float(keys::SHININESS, shininess.max(1.0));

            let mut add = |slot, texture: gltf::Texture| {
                if let Some(key) = self.image_keys.get(texture.source().index()) {
                    source.textures.push((slot, key.clone()));
                }
            };
            if let Some(info) = pbr.base_color_texture() {
                add(TextureMapSlot::Diffuse, info.texture());
            }
            if let Some(info) = pbr.metallic_roughness_texture() {
                add(TextureMapSlot::Metallic, info.texture());
            }
            if let Some(normal) = material.normal_texture() {
                add(TextureMapSlot::Normal, normal.texture());
            }
            if let Some(info) = material.emissive_texture() {
                add(TextureMapSlot::Emissive, info.texture());
            }

            self.materials.push(source);
        }
    }

    fn material_index(&mut self, material: &gltf::Material) -> usize {
        if let Some(index) = material.index() {
            return index;
        }
        *self.default_material.get_or_insert_with(|| {
            self.materials.push(SourceMaterial::new(DEFAULT_MATERIAL_NAME));
            self.materials.len() - 1
        })
    }

    // ------------------------------------------------------------------------
    // Nodes & Meshes
    // ------------------------------------------------------------------------

    fn load_node(&mut self, node: &gltf::Node) -> Result<SourceNode, SourceError> {
        let transform = Mat4::from_cols_array_2d(&node.transform().matrix());
        let mut source = SourceNode::new(node_name(node)).with_transform(transform);

        if let Some(mesh) = node.mesh() {
            let meshes = match node.skin() {
                Some(skin) => self.load_mesh(&mesh, Some(&skin))?,
                None => match self.mesh_cache.get(&mesh.index()) {
                    Some(cached) => cached.clone(),
                    None => {
                        let produced = self.load_mesh(&mesh, None)?;
                        self.mesh_cache.insert(mesh.index(), produced.clone());
                        produced
                    }
                },
            };
            source.meshes = meshes;
        }

        for child in node.children() {
            source.children.push(self.load_node(&child)?);
        }
        Ok(source)
    }

    fn load_mesh(&mut self, mesh: &gltf::Mesh, skin: Option<&gltf::Skin>) -> Result<Vec<usize>, SourceError> {
        let base_name = mesh
            .name()
            .map_or_else(|| format!("Mesh_{}", mesh.index()), str::to_string);
        let primitive_count = mesh.primitives().count();
        let mut produced = Vec::with_capacity(primitive_count);

        for primitive in mesh.primitives() {
            let name = if primitive_count == 1 {
                base_name.clone()
            } else {
                format!("{base_name}_{}", primitive.index())
            };
            match self.load_primitive(&name, &primitive, skin)? {
                Some(source) => {
                    produced.push(self.meshes.len());
                    self.meshes.push(source);
                }
                None => log::warn!("Skipping primitive {} of mesh '{base_name}': mode {:?} is not triangles", primitive.index(), primitive.mode()),
            }
        }
        Ok(produced)
    }

    fn load_primitive(
        &mut self,
        name: &str,
        primitive: &gltf::Primitive,
        skin: Option<&gltf::Skin>,
    ) -> Result<Option<SourceMesh>, SourceError> {
        check_primitive(primitive, skin.is_some())?;
        let buffers = self.buffers;
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .map(|iter| iter.map(Vec3::from_array).collect())
            .unwrap_or_default();
        let vertex_count = positions.len() as u32;

        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..vertex_count).collect(),
        };
        let Some(faces) = triangulate(primitive.mode(), &indices) else {
            return Ok(None);
        };

        let normals = reader
            .read_normals()
            .map(|iter| iter.map(Vec3::from_array).collect())
            .unwrap_or_default();
        let tex_coords = reader.read_tex_coords(0).map(|t| t.into_f32().collect());

        let bones = match (skin, reader.read_joints(0), reader.read_weights(0)) {
            (Some(skin), Some(joints), Some(weights)) => {
                let joints: Vec<[u16; 4]> = joints.into_u16().collect();
                let weights: Vec<[f32; 4]> = weights.into_f32().collect();
                Self::load_bones(skin, buffers, &joints, &weights)?
            }
            (Some(skin), ..) => Self::load_bones(skin, buffers, &[], &[])?,
            _ => Vec::new(),
        };

        Ok(Some(SourceMesh {
            name: name.to_string(),
            positions,
            normals,
            tex_coords,
            faces,
            material: self.material_index(&primitive.material()),
            bones,
        }))
    }

    /// One bone per skin joint, including joints no vertex is weighted to.
    fn load_bones(
        skin: &gltf::Skin,
        buffers: &[Vec<u8>],
        joints: &[[u16; 4]],
        weights: &[[f32; 4]],
    ) -> Result<Vec<SourceBone>, SourceError> {
        if let Some(accessor) = skin.inverse_bind_matrices() {
            check_accessor(&accessor, "inverseBindMatrices", &[DataType::F32], Dimensions::Mat4)?;
        }
        let reader = skin.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
        let ibms: Vec<Mat4> = reader
            .read_inverse_bind_matrices()
            .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
            .unwrap_or_default();

        let mut bones: Vec<SourceBone> = skin
            .joints()
            .enumerate()
            .map(|(i, joint)| SourceBone {
                name: node_name(&joint),
                offset: ibms.get(i).copied().unwrap_or(Mat4::IDENTITY),
                weights: Vec::new(),
            })
            .collect();

        for (vertex, (joint_ids, joint_weights)) in joints.iter().zip(weights).enumerate() {
            for (&joint, &weight) in joint_ids.iter().zip(joint_weights) {
                if weight <= 0.0 {
                    continue;
                }
                if let Some(bone) = bones.get_mut(usize::from(joint)) {
                    bone.weights.push((vertex as u32, weight));
                }
            }
        }
        Ok(bones)
    }
}

/// Converts an index list into triangles; `None` for point and line modes.
fn triangulate(mode: Mode, indices: &[u32]) -> Option<Vec<[u32; 3]>> {
    let faces = match mode {
        Mode::Triangles => indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect(),
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .map(|(i, w)| if i % 2 == 0 { [w[0], w[1], w[2]] } else { [w[1], w[0], w[2]] })
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((&center, rest)) => rest.windows(2).map(|w| [center, w[0], w[1]]).collect(),
            None => Vec::new(),
        },
        Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip => return None,
    };
    Some(faces)
}
