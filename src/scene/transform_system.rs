//! 变换系统 (Transform System)
//!
//! Top-down world matrix propagation over a node arena. Kept apart from
//! [`NodeHierarchy`](crate::scene::NodeHierarchy) so it only borrows the
//! node storage.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Refreshes local and world matrices for the subtrees under `roots`.
///
/// Every root is composed with `parent_world`. A node's world matrix is
/// rebuilt when its own pose changed or any ancestor's world matrix changed;
/// `force` treats every node as changed.
///
/// 使用显式栈替代递归，避免深层级场景的栈溢出。
pub fn update_hierarchy_iterative(
    nodes: &mut SlotMap<NodeHandle, Node>,
    roots: &[NodeHandle],
    parent_world: Affine3A,
    force: bool,
) {
    // 工作栈：(节点句柄, 父世界矩阵, 父是否变化)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root in roots.iter().rev() {
        stack.push((root, parent_world, force));
    }

    while let Some((handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;
        // 逆序入栈以保持先序遍历
        for &child in node.children.iter().rev() {
            stack.push((child, current_world, world_needs_update));
        }
    }
}
