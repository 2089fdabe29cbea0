//! Gizmo Module
//!
//! Construction and lifetime of the editor's on-screen handles. A
//! `GizmoBundle` owns one group node, the named parts parented (directly or
//! indirectly) under it and the materials created for them. Disposing the
//! bundle disposes the group, which cascades to every part.

pub mod arrow;
pub mod visibility;

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::GizmoConfig;
use crate::scene::{Material, MaterialId, NodeId, RenderFlags, SceneHost};

pub use arrow::{ArrowParts, create_arrow};
pub use visibility::{is_subtree_visible, set_visibility};

/// Flag a node as gizmo geometry drawn in the overlay pass.
pub fn mark_editor_part(host: &mut dyn SceneHost, node: NodeId, config: &GizmoConfig) {
    host.set_render_flags(
        node,
        RenderFlags {
            editor_only: true,
            pointer_move_events: true,
            rendering_group: config.overlay_group,
            cast_shadow: false,
        },
    );
}

/// The nodes and materials of one shape editor's gizmo.
#[derive(Debug, Clone)]
pub struct GizmoBundle {
    pub group: NodeId,
    parts: BTreeMap<&'static str, NodeId>,
    materials: Vec<MaterialId>,
}

impl GizmoBundle {
    /// Create the root group node.
    pub fn new(host: &mut dyn SceneHost, name: &str) -> Self {
        Self {
            group: host.create_node(name),
            parts: BTreeMap::new(),
            materials: Vec::new(),
        }
    }

    /// Register a part under a name and parent it to `parent` (the bundle
    /// group when `None`).
    pub fn add_part(
        &mut self,
        host: &mut dyn SceneHost,
        name: &'static str,
        node: NodeId,
        parent: Option<NodeId>,
    ) -> NodeId {
        host.set_parent(node, Some(parent.unwrap_or(self.group)));
        self.parts.insert(name, node);
        node
    }

    /// Register an arrow. Its group goes under the bundle group; `names` are
    /// the part names for group, shaft, control shaft and tip.
    pub fn add_arrow(
        &mut self,
        host: &mut dyn SceneHost,
        names: [&'static str; 4],
        arrow: ArrowParts,
    ) -> ArrowParts {
        self.add_part(host, names[0], arrow.group, None);
        // The remaining parts are already parented to the arrow group
        for (name, node) in names.into_iter().zip(arrow.nodes()).skip(1) {
            self.parts.insert(name, node);
        }
        arrow
    }

    pub fn create_material(&mut self, host: &mut dyn SceneHost, material: Material) -> MaterialId {
        let id = host.create_material(material);
        self.materials.push(id);
        id
    }

    pub fn part(&self, name: &str) -> Option<NodeId> {
        self.parts.get(name).copied()
    }

    pub fn parts(&self) -> impl Iterator<Item = (&'static str, NodeId)> + '_ {
        self.parts.iter().map(|(&name, &node)| (name, node))
    }

    pub fn materials(&self) -> &[MaterialId] {
        &self.materials
    }

    /// True when `node` is the group or one of the registered parts.
    pub fn owns(&self, node: NodeId) -> bool {
        node == self.group || self.parts.values().any(|&part| part == node)
    }

    pub fn set_visible(&self, host: &mut dyn SceneHost, visible: bool) {
        set_visibility(host, Some(self.group), visible);
    }

    /// Dispose the group (cascading to every part) and the materials.
    pub fn dispose(self, host: &mut dyn SceneHost) {
        host.dispose(self.group);
        for material in &self.materials {
            host.dispose_material(*material);
        }
        debug!(
            parts = self.parts.len(),
            materials = self.materials.len(),
            "gizmo disposed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PrimitiveShape, SceneGraph};
    use glam::Vec3;

    #[test]
    fn test_dispose_cascades_to_parts_and_materials() {
        let mut scene = SceneGraph::new();
        let config = GizmoConfig::default();
        let mut bundle = GizmoBundle::new(&mut scene, "gizmo");
        let material = bundle.create_material(&mut scene, Material::new("blue", [0.0, 0.0, 1.0]));
        let control = bundle.create_material(&mut scene, Material::transparent("ctrl"));
        let arrow = create_arrow(&mut scene, material, control, Vec3::ZERO, 2.0, 0.0, &config);
        bundle.add_arrow(&mut scene, ["arrowGroup", "shaft", "ctrlShaft", "tip"], arrow);
        let ring = scene.create_primitive(
            "ring",
            &PrimitiveShape::Torus {
                diameter: 1.0,
                thickness: 0.05,
                tessellation: 30,
            },
        );
        bundle.add_part(&mut scene, "ring", ring, None);

        assert_eq!(scene.node_count(), 6);
        assert!(bundle.owns(arrow.tip));
        assert_eq!(bundle.part("ring"), Some(ring));

        bundle.dispose(&mut scene);
        assert_eq!(scene.node_count(), 0);
        assert_eq!(scene.material_count(), 0);
    }

    #[test]
    fn test_visibility_reaches_nested_arrow_parts() {
        let mut scene = SceneGraph::new();
        let config = GizmoConfig::default();
        let mut bundle = GizmoBundle::new(&mut scene, "gizmo");
        let material = bundle.create_material(&mut scene, Material::new("green", [0.0, 1.0, 0.0]));
        let arrow = create_arrow(&mut scene, material, material, Vec3::ZERO, 0.5, 0.25, &config);
        bundle.add_arrow(&mut scene, ["g", "s", "c", "t"], arrow);

        bundle.set_visible(&mut scene, false);
        assert!(!scene.is_visible(arrow.control_shaft));
        bundle.set_visible(&mut scene, true);
        assert!(is_subtree_visible(&scene, bundle.group));
    }
}
