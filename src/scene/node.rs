use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Affine3A;
use smallvec::SmallVec;

use crate::resources::Mesh;
use crate::scene::NodeHandle;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::transform::Transform;

static NEXT_ENTITY_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique id written into the picking buffer for a node.
///
/// Id `0` is never handed out and can mean "nothing picked".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub const NONE: Self = Self(0);

    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// What a node represents. The scene and model updaters dispatch on this.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure grouping node.
    Group,
    /// Renders its attached meshes.
    MeshRenderer,
    Camera(Camera),
    Light(Light),
    /// Sphere proxy drawn at a joint.
    JointMarker { bone: usize },
    /// Box proxy between a joint and its `child`-th child.
    BoneMarker { bone: usize, child: usize },
}

impl NodeKind {
    #[inline]
    #[must_use]
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::JointMarker { .. } | Self::BoneMarker { .. })
    }
}

/// Scene graph element.
///
/// Hierarchy links are arena handles; the parent link is informational and
/// never owns anything. Children keep insertion order.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub(crate) entity_id: EntityId,

    // === Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub meshes: SmallVec<[Arc<Mesh>; 1]>,
    pub kind: NodeKind,
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_id: EntityId::next(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            meshes: SmallVec::new(),
            kind: NodeKind::Group,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: Arc<Mesh>) -> Self {
        self.attach_mesh(mesh);
        self
    }

    /// Attaches a mesh and turns a group node into a mesh renderer.
    pub fn attach_mesh(&mut self, mesh: Arc<Mesh>) {
        self.meshes.push(mesh);
        if matches!(self.kind, NodeKind::Group) {
            self.kind = NodeKind::MeshRenderer;
        }
    }

    #[inline]
    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}
