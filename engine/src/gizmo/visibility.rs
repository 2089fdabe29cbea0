//! Visibility Propagation
//!
//! Show or hide a node and its whole subtree.

use crate::scene::{NodeId, SceneHost};

/// Set `visible` on `node` and every descendant, depth-first.
///
/// `None` is a no-op. Scene graphs are trees, so this always terminates.
pub fn set_visibility(host: &mut dyn SceneHost, node: Option<NodeId>, visible: bool) {
    let Some(node) = node else { return };
    host.set_visible(node, visible);
    for child in host.children(node) {
        set_visibility(host, Some(child), visible);
    }
}

/// True when `node` and every descendant are visible.
pub fn is_subtree_visible(host: &dyn SceneHost, node: NodeId) -> bool {
    host.is_visible(node)
        && host
            .children(node)
            .into_iter()
            .all(|child| is_subtree_visible(host, child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;

    fn tree(scene: &mut SceneGraph) -> (NodeId, NodeId, NodeId) {
        let root = scene.create_node("root");
        let mid = scene.create_node("mid");
        let leaf = scene.create_node("leaf");
        scene.set_parent(mid, Some(root));
        scene.set_parent(leaf, Some(mid));
        (root, mid, leaf)
    }

    #[test]
    fn test_hides_whole_subtree() {
        let mut scene = SceneGraph::new();
        let (root, mid, leaf) = tree(&mut scene);
        set_visibility(&mut scene, Some(root), false);
        assert!(!scene.is_visible(root));
        assert!(!scene.is_visible(mid));
        assert!(!scene.is_visible(leaf));
    }

    #[test]
    fn test_idempotent_and_reversible() {
        let mut scene = SceneGraph::new();
        let (root, _, leaf) = tree(&mut scene);
        set_visibility(&mut scene, Some(root), false);
        set_visibility(&mut scene, Some(root), false);
        assert!(!scene.is_visible(leaf));
        set_visibility(&mut scene, Some(root), true);
        assert!(is_subtree_visible(&scene, root));
    }

    #[test]
    fn test_subtree_only() {
        let mut scene = SceneGraph::new();
        let (root, mid, leaf) = tree(&mut scene);
        set_visibility(&mut scene, Some(mid), false);
        assert!(scene.is_visible(root));
        assert!(!scene.is_visible(leaf));
        assert!(!is_subtree_visible(&scene, root));
    }

    #[test]
    fn test_absent_node_is_noop() {
        let mut scene = SceneGraph::new();
        set_visibility(&mut scene, None, false);
        assert_eq!(scene.node_count(), 0);
    }
}
