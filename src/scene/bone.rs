//! Skeleton joints bound to scene nodes.
//!
//! A [`Bone`] pairs a joint node with its inverse bind matrix. Every frame,
//! after world transforms are refreshed, the bone writes
//! `joint.world · offset` into the [`SkinningMatrices`] at its id.
//!
//! Bound bones also own debug markers: a sphere at the joint and one box per
//! child of the joint node, stretched from the joint to that child. Markers
//! never feed back into skinning; they exist to be drawn and picked.

use std::sync::Arc;

use glam::{Affine3A, Mat4, Vec3, Vec4};

use crate::errors::SkinningError;
use crate::math::{Trs, quat_to_euler_degrees, shortest_arc};
use crate::resources::primitives::{SphereOptions, create_box, create_sphere};
use crate::resources::{Material, Mesh};
use crate::scene::NodeHandle;
use crate::scene::hierarchy::NodeHierarchy;
use crate::scene::node::{EntityId, Node, NodeKind};
use crate::scene::skinning::SkinningMatrices;
use crate::settings::SkinningSettings;

/// Axis the unit segment box is stretched along.
const SEGMENT_AXIS: Vec3 = Vec3::X;

/// Segments shorter than this keep a minimal length so the marker matrix
/// stays invertible.
const MIN_SEGMENT_LENGTH: f32 = 1e-4;

/// Meshes shared by all markers of one model.
#[derive(Debug, Clone)]
pub struct MarkerMeshes {
    pub joint: Arc<Mesh>,
    pub segment: Arc<Mesh>,
}

impl MarkerMeshes {
    #[must_use]
    pub fn new(settings: &SkinningSettings) -> Self {
        let color = Vec4::from_array(settings.marker_color);
        let mut material = Material::new("BoneMarker").with_ambient(color);
        material.diffuse_color = color;
        let material = material.into_shared();

        let sphere = create_sphere(&SphereOptions {
            radius: settings.joint_marker_radius,
            ..SphereOptions::default()
        });

        Self {
            joint: Arc::new(Mesh::new("BoneMarker-Sphere", sphere, material.clone())),
            segment: Arc::new(Mesh::new("BoneMarker-Box", create_box(1.0, 1.0, 1.0), material)),
        }
    }
}

/// Marker nodes owned by one bone.
#[derive(Debug, Clone)]
pub struct BoneMarkers {
    pub joint: NodeHandle,
    /// One per child of the joint node, in child order.
    pub segments: Vec<NodeHandle>,
}

#[derive(Debug, Clone)]
pub struct Bone {
    pub id: usize,
    pub name: String,
    /// Inverse bind pose.
    pub offset: Mat4,
    node: Option<NodeHandle>,
    final_matrix: Mat4,
    markers: Option<BoneMarkers>,
}

impl Bone {
    #[must_use]
    pub fn new(id: usize, name: impl Into<String>, offset: Mat4, node: Option<NodeHandle>) -> Self {
        Self {
            id,
            name: name.into(),
            offset,
            node,
            final_matrix: Mat4::IDENTITY,
            markers: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.node.is_some()
    }

    #[inline]
    #[must_use]
    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }

    /// The joint node, or an error for an unbound bone.
    pub fn joint_node(&self) -> Result<NodeHandle, SkinningError> {
        self.node.ok_or_else(|| SkinningError::UnboundBone {
            name: self.name.clone(),
        })
    }

    /// Last computed skinning matrix.
    #[inline]
    #[must_use]
    pub fn final_matrix(&self) -> &Mat4 {
        &self.final_matrix
    }

    #[inline]
    #[must_use]
    pub fn markers(&self) -> Option<&BoneMarkers> {
        self.markers.as_ref()
    }

    /// Creates the joint sphere and one segment box per child of the joint
    /// node under `marker_root`. Runs once; later calls are ignored.
    pub(crate) fn create_markers(
        &mut self,
        hierarchy: &mut NodeHierarchy,
        marker_root: NodeHandle,
        meshes: &MarkerMeshes,
    ) {
        if self.markers.is_some() {
            return;
        }
        let Some(joint) = self.node.and_then(|h| hierarchy.get(h)) else {
            return;
        };
        let child_count = joint.children().len();

        let sphere = Node::new(format!("{}-SphereGui", self.name))
            .with_mesh(meshes.joint.clone())
            .with_kind(NodeKind::JointMarker { bone: self.id });
        let joint_marker = hierarchy.insert_child(marker_root, sphere);

        let segments = (0..child_count)
            .map(|child| {
                let segment = Node::new(format!("{}-BoneGui", self.name))
                    .with_mesh(meshes.segment.clone())
                    .with_kind(NodeKind::BoneMarker { bone: self.id, child });
                hierarchy.insert_child(marker_root, segment)
            })
            .collect();

        self.markers = Some(BoneMarkers {
            joint: joint_marker,
            segments,
        });
    }

    /// Computes `joint.world · offset` and stores it at this bone's id.
    ///
    /// World transforms must be current. An unbound bone, or one whose node
    /// has been removed, writes identity.
    pub fn update(&mut self, hierarchy: &NodeHierarchy, skinning: &mut SkinningMatrices) -> Result<(), SkinningError> {
        self.final_matrix = match self.node.and_then(|h| hierarchy.get(h)) {
            Some(joint) => Mat4::from(*joint.world_matrix()) * self.offset,
            None => Mat4::IDENTITY,
        };
        skinning.set(self.id, self.final_matrix)
    }

    /// Moves the markers onto the current pose.
    ///
    /// `frame` is pre-multiplied onto every marker matrix. The marker nodes'
    /// world matrices are stale until the marker subtree is recomputed.
    pub fn update_markers(&self, hierarchy: &mut NodeHierarchy, frame: Affine3A, thickness: f32) {
        let (Some(markers), Some(joint_handle)) = (&self.markers, self.node) else {
            return;
        };
        let Some(joint) = hierarchy.get(joint_handle) else {
            return;
        };

        let joint_world = *joint.world_matrix();
        let joint_position = Vec3::from(joint_world.translation);
        let child_positions: Vec<Vec3> = joint
            .children()
            .iter()
            .map(|&c| hierarchy.get(c).map_or(joint_position, |n| n.transform.world_position()))
            .collect();

        if let Some(sphere) = hierarchy.get_mut(markers.joint) {
            sphere.transform.apply_local_matrix(Mat4::from(frame * joint_world));
        }

        for (&segment, child_position) in markers.segments.iter().zip(child_positions) {
            let delta = joint_position - child_position;
            let length = delta.length().max(MIN_SEGMENT_LENGTH);
            let rotation = shortest_arc(SEGMENT_AXIS, delta);
            let midpoint = (joint_position + child_position) * 0.5;

            let Some(node) = hierarchy.get_mut(segment) else {
                continue;
            };
            if frame == Affine3A::IDENTITY {
                node.transform.set_trs(Trs {
                    translation: midpoint,
                    rotation_degrees: quat_to_euler_degrees(rotation),
                    scale: Vec3::new(length, thickness, thickness),
                });
            } else {
                let local = Mat4::from_scale_rotation_translation(
                    Vec3::new(length, thickness, thickness),
                    rotation,
                    midpoint,
                );
                node.transform.apply_local_matrix(Mat4::from(frame) * local);
            }
        }
    }

    /// Whether `entity` is this bone's joint marker or one of its segments.
    #[must_use]
    pub fn pick_node(&self, hierarchy: &NodeHierarchy, entity: EntityId) -> bool {
        let Some(markers) = &self.markers else {
            return false;
        };
        std::iter::once(markers.joint)
            .chain(markers.segments.iter().copied())
            .filter_map(|h| hierarchy.get(h))
            .any(|node| node.entity_id() == entity)
    }
}
