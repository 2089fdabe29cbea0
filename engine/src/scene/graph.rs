//! Scene Graph
//!
//! In-memory `SceneHost`: a node arena with parent/child links, generated
//! geometry per node, a perspective camera for picking and a tiny animation
//! player. Nothing is drawn; everything a renderer would need is kept as data
//! so the editor can run headless.

use std::collections::{BTreeMap, HashMap};

use glam::{Mat4, Vec2, Vec3};
use tracing::trace;

use super::picking::{Ray, ray_aabb_intersect, ray_triangle_intersect};
use super::{
    Camera, CursorStyle, Material, MaterialId, NodeId, PickHit, PrimitiveShape, RenderFlags,
    SceneHost, Transform,
};
use crate::animation::AnimationClip;
use crate::geometry::{Aabb, Mesh};

/// Geometry attached to a node.
#[derive(Clone, Debug)]
pub struct NodeGeometry {
    pub shape: PrimitiveShape,
    pub mesh: Mesh,
    /// Local-space bounds, `None` for an empty mesh
    pub bounds: Option<Aabb>,
}

impl NodeGeometry {
    fn build(shape: &PrimitiveShape) -> Self {
        let mesh = shape.mesh();
        let bounds = mesh.bounds();
        Self {
            shape: *shape,
            mesh,
            bounds,
        }
    }
}

/// One node of the arena.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: Transform,
    pub geometry: Option<NodeGeometry>,
    pub material: Option<MaterialId>,
    pub visible: bool,
    pub pickable: bool,
    pub flags: RenderFlags,
    pub highlighted: bool,
}

impl SceneNode {
    fn new(name: &str, geometry: Option<NodeGeometry>) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::default(),
            geometry,
            material: None,
            visible: true,
            pickable: true,
            flags: RenderFlags::default(),
            highlighted: false,
        }
    }
}

/// A clip being played on a node.
#[derive(Clone, Debug)]
pub struct ActiveAnimation {
    pub clip: AnimationClip,
    /// Seconds since the clip started
    pub elapsed: f32,
}

/// The headless scene.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<SceneNode>>,
    materials: BTreeMap<MaterialId, Material>,
    next_material: u32,
    animations: HashMap<NodeId, ActiveAnimation>,
    camera: Camera,
    cursor: CursorStyle,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(camera: Camera) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Screen pixel of a world point.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        self.camera.project(world)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Live node count.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Live material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn is_highlighted(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.highlighted)
    }

    /// First live node with this name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.as_ref().is_some_and(|n| n.name == name))
            .map(|(i, _)| NodeId(i as u32))
    }

    pub fn animation(&self, node: NodeId) -> Option<&ActiveAnimation> {
        self.animations.get(&node)
    }

    pub fn is_animating(&self, node: NodeId) -> bool {
        self.animations.contains_key(&node)
    }

    /// Advance every playing clip by `dt` seconds and write the sampled values.
    /// Clips stop on their last keyframe.
    pub fn advance(&mut self, dt: f32) {
        let mut finished = Vec::new();
        let mut samples = Vec::new();
        for (&node, active) in self.animations.iter_mut() {
            active.elapsed += dt;
            if let Some(value) = active.clip.sample(active.elapsed) {
                samples.push((node, value));
            }
            if active.elapsed >= active.clip.duration() && !active.clip.looping {
                finished.push(node);
            }
        }
        for (node, value) in samples {
            if let Some(n) = self.node_mut(node) {
                n.transform.position.y = value;
            }
        }
        for node in finished {
            self.animations.remove(&node);
            trace!(?node, "animation finished");
        }
    }

    fn insert(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.node(node).and_then(|n| n.parent);
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|&c| c != node);
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }
}

impl SceneHost for SceneGraph {
    fn create_node(&mut self, name: &str) -> NodeId {
        self.insert(SceneNode::new(name, None))
    }

    fn create_primitive(&mut self, name: &str, shape: &PrimitiveShape) -> NodeId {
        self.insert(SceneNode::new(name, Some(NodeGeometry::build(shape))))
    }

    fn set_geometry(&mut self, node: NodeId, shape: &PrimitiveShape) {
        if let Some(n) = self.node_mut(node) {
            n.geometry = Some(NodeGeometry::build(shape));
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    fn name(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|n| n.name.clone())
    }

    fn dispose(&mut self, node: NodeId) {
        if !self.contains(node) {
            return;
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.get_mut(id.0 as usize).and_then(Option::take) {
                stack.extend(removed.children);
            }
            self.animations.remove(&id);
        }
    }

    fn create_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.next_material);
        self.next_material += 1;
        self.materials.insert(id, material);
        id
    }

    fn set_material(&mut self, node: NodeId, material: MaterialId) {
        if let Some(n) = self.node_mut(node) {
            n.material = Some(material);
        }
    }

    fn dispose_material(&mut self, material: MaterialId) {
        self.materials.remove(&material);
        for node in self.nodes.iter_mut().flatten() {
            if node.material == Some(material) {
                node.material = None;
            }
        }
    }

    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) {
        if !self.contains(node) {
            return;
        }
        // Refuse anything that would create a cycle
        if let Some(p) = parent {
            if !self.contains(p) || self.is_ancestor(node, p) {
                return;
            }
        }
        self.detach(node);
        if let Some(p) = parent {
            if let Some(parent_node) = self.node_mut(p) {
                parent_node.children.push(node);
            }
            if let Some(n) = self.node_mut(node) {
                n.parent = Some(p);
            }
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn transform(&self, node: NodeId) -> Option<Transform> {
        self.node(node).map(|n| n.transform)
    }

    fn set_transform(&mut self, node: NodeId, transform: Transform) {
        if let Some(n) = self.node_mut(node) {
            n.transform = transform;
        }
    }

    fn world_matrix(&self, node: NodeId) -> Option<Mat4> {
        let mut matrix = self.node(node)?.transform.matrix();
        let mut parent = self.parent(node);
        while let Some(p) = parent {
            let parent_node = self.node(p)?;
            matrix = parent_node.transform.matrix() * matrix;
            parent = parent_node.parent;
        }
        Some(matrix)
    }

    fn world_bounds(&self, node: NodeId) -> Option<Aabb> {
        let local = self.node(node)?.geometry.as_ref()?.bounds?;
        Some(local.transformed(&self.world_matrix(node)?))
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(n) = self.node_mut(node) {
            n.visible = visible;
        }
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.visible)
    }

    fn set_pickable(&mut self, node: NodeId, pickable: bool) {
        if let Some(n) = self.node_mut(node) {
            n.pickable = pickable;
        }
    }

    fn set_render_flags(&mut self, node: NodeId, flags: RenderFlags) {
        if let Some(n) = self.node_mut(node) {
            n.flags = flags;
        }
    }

    fn render_flags(&self, node: NodeId) -> Option<RenderFlags> {
        self.node(node).map(|n| n.flags)
    }

    fn set_highlight(&mut self, node: NodeId, highlighted: bool) {
        if let Some(n) = self.node_mut(node) {
            n.highlighted = highlighted;
        }
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    fn picking_ray(&self, screen: Vec2) -> Ray {
        self.camera.picking_ray(screen)
    }

    fn multi_pick(&self, ray: &Ray) -> Vec<PickHit> {
        let mut hits = Vec::new();
        for (index, slot) in self.nodes.iter().enumerate() {
            let Some(node) = slot else { continue };
            if !node.visible || !node.pickable {
                continue;
            }
            let Some(geometry) = &node.geometry else { continue };
            let Some(bounds) = geometry.bounds else { continue };
            let id = NodeId(index as u32);
            let Some(world) = self.world_matrix(id) else { continue };
            // Singular matrices (zero scale) cannot be hit
            if world.determinant().abs() < 1e-12 {
                continue;
            }
            let local = ray.transformed(&world.inverse());
            if ray_aabb_intersect(&local, bounds.min, bounds.max).is_none() {
                continue;
            }
            let nearest = geometry
                .mesh
                .triangles()
                .filter_map(|[a, b, c]| ray_triangle_intersect(&local, a, b, c))
                .min_by(|a, b| a.total_cmp(b));
            if let Some(t) = nearest {
                hits.push(PickHit {
                    node: id,
                    point: ray.at(t),
                    distance: t,
                });
            }
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn play_animation(&mut self, node: NodeId, clip: AnimationClip) {
        if !self.contains(node) {
            return;
        }
        if let Some(value) = clip.sample(0.0) {
            if let Some(n) = self.node_mut(node) {
                n.transform.position.y = value;
            }
        }
        self.animations.insert(node, ActiveAnimation { clip, elapsed: 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimatedProperty, Keyframe};

    fn unit_box() -> PrimitiveShape {
        PrimitiveShape::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut scene = SceneGraph::new();
        let parent = scene.create_node("parent");
        let child = scene.create_node("child");
        scene.set_parent(child, Some(parent));
        scene.set_position(parent, Vec3::new(1.0, 0.0, 0.0));
        scene.set_scaling(parent, Vec3::splat(2.0));
        scene.set_position(child, Vec3::new(0.0, 1.0, 0.0));

        let world = scene.world_position(child).unwrap();
        assert!((world - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let mut scene = SceneGraph::new();
        let node = scene.create_primitive("box", &unit_box());
        scene.set_position(node, Vec3::new(2.0, 0.0, 0.0));
        scene.set_scaling(node, Vec3::new(1.0, 3.0, 1.0));
        let bounds = scene.world_bounds(node).unwrap();
        assert!((bounds.center() - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert!((bounds.half_extents().y - 1.5).abs() < 1e-5);
        let group = scene.create_node("group");
        assert!(scene.world_bounds(group).is_none());
    }

    #[test]
    fn test_dispose_cascades_and_detaches() {
        let mut scene = SceneGraph::new();
        let root = scene.create_node("root");
        let group = scene.create_node("group");
        let leaf = scene.create_primitive("leaf", &unit_box());
        scene.set_parent(group, Some(root));
        scene.set_parent(leaf, Some(group));

        scene.dispose(group);
        assert!(!scene.contains(group));
        assert!(!scene.contains(leaf));
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut scene = SceneGraph::new();
        let a = scene.create_node("a");
        let b = scene.create_node("b");
        scene.set_parent(b, Some(a));
        scene.set_parent(a, Some(b));
        assert_eq!(scene.parent(a), None);
        assert_eq!(scene.parent(b), Some(a));
    }

    #[test]
    fn test_multi_pick_sorted_and_filtered() {
        let mut scene = SceneGraph::new();
        let near = scene.create_primitive("near", &unit_box());
        let far = scene.create_primitive("far", &unit_box());
        let hidden = scene.create_primitive("hidden", &unit_box());
        scene.set_position(near, Vec3::new(0.0, 0.0, 2.0));
        scene.set_position(far, Vec3::new(0.0, 0.0, -2.0));
        scene.set_visible(hidden, false);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let hits = scene.multi_pick(&ray);
        let nodes: Vec<_> = hits.iter().map(|h| h.node).collect();
        assert_eq!(nodes, vec![near, far]);
        assert!((hits[0].distance - 7.5).abs() < 1e-4);
        assert_eq!(scene.pick(&ray).map(|h| h.node), Some(near));
    }

    #[test]
    fn test_transparent_material_still_pickable() {
        let mut scene = SceneGraph::new();
        let node = scene.create_primitive("ghost", &unit_box());
        let material = scene.create_material(Material::transparent("ghost"));
        scene.set_material(node, material);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert_eq!(scene.pick(&ray).map(|h| h.node), Some(node));
    }

    #[test]
    fn test_dispose_material_clears_references() {
        let mut scene = SceneGraph::new();
        let node = scene.create_primitive("box", &unit_box());
        let material = scene.create_material(Material::new("red", [1.0, 0.0, 0.0]));
        scene.set_material(node, material);
        scene.dispose_material(material);
        assert_eq!(scene.material_count(), 0);
        assert_eq!(scene.node(node).and_then(|n| n.material), None);
    }

    #[test]
    fn test_animation_plays_and_stops() {
        let mut scene = SceneGraph::new();
        let node = scene.create_primitive("box", &unit_box());
        let clip = AnimationClip {
            name: "drop".to_string(),
            property: AnimatedProperty::PositionY,
            frame_rate: 10.0,
            keyframes: vec![Keyframe::new(0.0, 2.0), Keyframe::new(10.0, 0.0)],
            looping: false,
        };
        scene.play_animation(node, clip);
        assert_eq!(scene.transform(node).unwrap().position.y, 2.0);

        scene.advance(0.5);
        assert!((scene.transform(node).unwrap().position.y - 1.0).abs() < 1e-5);
        assert!(scene.is_animating(node));

        scene.advance(0.6);
        assert_eq!(scene.transform(node).unwrap().position.y, 0.0);
        assert!(!scene.is_animating(node));
    }
}
