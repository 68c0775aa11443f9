//! Node arena with explicit parent/child links.
//!
//! Nodes live in a [`SlotMap`] and refer to each other through
//! [`NodeHandle`]s. A node without a parent is a root; roots are kept in
//! creation order.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::errors::SceneError;
use crate::scene::NodeHandle;
use crate::scene::node::Node;
use crate::scene::transform_system::update_hierarchy_iterative;

#[derive(Debug, Default, Clone)]
pub struct NodeHierarchy {
    nodes: SlotMap<NodeHandle, Node>,
    roots: Vec<NodeHandle>,
}

impl NodeHierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Inserts a detached node as a new root.
    pub fn add_node(&mut self, mut node: Node) -> NodeHandle {
        node.parent = None;
        node.children.clear();
        let handle = self.nodes.insert(node);
        self.roots.push(handle);
        handle
    }

    pub fn create_node(&mut self, name: impl Into<String>) -> NodeHandle {
        self.add_node(Node::new(name))
    }

    /// Appends `child` to `parent`'s children.
    ///
    /// Linking a child to the parent it already has is a no-op. A child that
    /// belongs to another parent is rejected; there is no implicit
    /// re-parenting.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<(), SceneError> {
        let child_node = self.nodes.get(child).ok_or(SceneError::InvalidHandle)?;
        let parent_node = self.nodes.get(parent).ok_or(SceneError::InvalidHandle)?;

        match child_node.parent {
            Some(existing) if existing == parent => return Ok(()),
            Some(_) => {
                return Err(SceneError::AlreadyParented {
                    child: child_node.name.clone(),
                });
            }
            None => {}
        }

        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::CycleDetected {
                parent: parent_node.name.clone(),
                child: child_node.name.clone(),
            });
        }

        if let Some(pos) = self.roots.iter().position(|&r| r == child) {
            self.roots.remove(pos);
        }
        self.nodes[parent].children.push(child);
        let child_node = &mut self.nodes[child];
        child_node.parent = Some(parent);
        // 强制标记脏，确保矩阵更新
        child_node.transform.mark_dirty();
        Ok(())
    }

    /// Inserts `node` and links it under `parent` in one step.
    pub fn add_node_under(&mut self, parent: NodeHandle, node: Node) -> Result<NodeHandle, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::InvalidHandle);
        }
        Ok(self.insert_child(parent, node))
    }

    /// Inserts a fresh node below `parent`, or as a root if `parent` is gone.
    ///
    /// A freshly inserted node can neither be parented nor form a cycle, so
    /// no validation is needed.
    pub(crate) fn insert_child(&mut self, parent: NodeHandle, mut node: Node) -> NodeHandle {
        node.children.clear();
        if !self.nodes.contains_key(parent) {
            return self.add_node(node);
        }
        node.parent = Some(parent);
        let handle = self.nodes.insert(node);
        self.nodes[parent].children.push(handle);
        handle
    }

    /// Removes `handle` and all of its descendants.
    ///
    /// Returns the number of nodes removed.
    pub fn remove_subtree(&mut self, handle: NodeHandle) -> usize {
        let Some(node) = self.nodes.get(handle) else {
            return 0;
        };

        match node.parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.retain(|&c| c != handle);
                }
            }
            None => self.roots.retain(|&r| r != handle),
        }

        let doomed = self.descendants(handle);
        for h in &doomed {
            self.nodes.remove(*h);
        }
        doomed.len()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn parent_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(handle).and_then(|n| n.parent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    /// `root` and every node below it, depth-first pre-order.
    #[must_use]
    pub fn descendants(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First node named `name` in a depth-first pre-order walk from `root`.
    ///
    /// Names are not unique; the first match wins.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if node.name == name {
                return Some(handle);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Like [`find_node_by_name`](Self::find_node_by_name) but a miss is an error.
    pub fn require_node(&self, root: NodeHandle, name: &str) -> Result<NodeHandle, SceneError> {
        self.find_node_by_name(root, name)
            .ok_or_else(|| SceneError::NodeNotFound(name.to_string()))
    }

    fn is_ancestor_or_self(&self, ancestor: NodeHandle, mut handle: NodeHandle) -> bool {
        loop {
            if handle == ancestor {
                return true;
            }
            match self.parent_of(handle) {
                Some(parent) => handle = parent,
                None => return false,
            }
        }
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Recomputes the subtree under `root`; `root.world = root.local`.
    ///
    /// Must run after any pose edit and before world matrices are read.
    pub fn compute_world_transforms(&mut self, root: NodeHandle) {
        update_hierarchy_iterative(&mut self.nodes, &[root], Affine3A::IDENTITY, false);
    }

    /// Recomputes the subtree under `root` as if it hung below a node whose
    /// world matrix is `parent_world`.
    ///
    /// Pass `parent_changed = true` whenever `parent_world` differs from the
    /// previous call, otherwise clean nodes keep their old world matrices.
    pub fn compute_world_transforms_with_parent(
        &mut self,
        root: NodeHandle,
        parent_world: Affine3A,
        parent_changed: bool,
    ) {
        update_hierarchy_iterative(&mut self.nodes, &[root], parent_world, parent_changed);
    }

    /// Recomputes every root subtree.
    pub fn compute_all(&mut self) {
        update_hierarchy_iterative(&mut self.nodes, &self.roots, Affine3A::IDENTITY, false);
    }
}

impl std::ops::Index<NodeHandle> for NodeHierarchy {
    type Output = Node;

    fn index(&self, handle: NodeHandle) -> &Node {
        &self.nodes[handle]
    }
}

impl std::ops::IndexMut<NodeHandle> for NodeHierarchy {
    fn index_mut(&mut self, handle: NodeHandle) -> &mut Node {
        &mut self.nodes[handle]
    }
}
