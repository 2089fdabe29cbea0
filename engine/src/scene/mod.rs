//! Scene Module
//!
//! The seam between the editor and whatever renders it. Controllers only talk
//! to a `SceneHost`: they create nodes and materials, move them around, ask for
//! bounding boxes and picking results, and dispose what they created.
//! `SceneGraph` is the in-memory host used headless, in tests and in the
//! browser wrapper.

pub mod camera;
pub mod graph;
pub mod picking;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::AnimationClip;
use crate::geometry::{
    Aabb, Mesh, generate_box, generate_cylinder, generate_ground, generate_icosphere,
    generate_torus,
};

pub use camera::Camera;
pub use graph::SceneGraph;
pub use picking::Ray;

// ============================================================================
// HANDLES
// ============================================================================

/// Handle of a scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Handle of a material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

// ============================================================================
// DESCRIPTIONS
// ============================================================================

/// Geometry a host can build.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveShape {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// Cylinder, or a cone when one diameter is zero
    Cylinder {
        diameter_top: f32,
        diameter_bottom: f32,
        height: f32,
        tessellation: u32,
    },
    IcoSphere {
        radius: f32,
        subdivisions: u32,
    },
    /// Ring lying in the XZ plane
    Torus {
        diameter: f32,
        thickness: f32,
        tessellation: u32,
    },
    /// Flat plane lying in the XZ plane
    Ground {
        width: f32,
        height: f32,
    },
}

impl PrimitiveShape {
    /// Generate the triangle mesh for this shape.
    pub fn mesh(&self) -> Mesh {
        match *self {
            PrimitiveShape::Box {
                width,
                height,
                depth,
            } => generate_box(width, height, depth),
            PrimitiveShape::Cylinder {
                diameter_top,
                diameter_bottom,
                height,
                tessellation,
            } => generate_cylinder(diameter_top, diameter_bottom, height, tessellation),
            PrimitiveShape::IcoSphere {
                radius,
                subdivisions,
            } => generate_icosphere(radius, subdivisions),
            PrimitiveShape::Torus {
                diameter,
                thickness,
                tessellation,
            } => generate_torus(diameter, thickness, tessellation),
            PrimitiveShape::Ground { width, height } => generate_ground(width, height),
        }
    }
}

/// Local transform of a node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied yaw (Y), pitch (X), roll (Z)
    pub rotation: Vec3,
    pub scaling: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scaling: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.rotation.y, self.rotation.x, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scaling, self.quaternion(), self.position)
    }
}

/// Flat-colored material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub color: [f32; 3],
    /// 0 is fully transparent; transparent nodes are still pickable
    pub alpha: f32,
}

impl Material {
    pub fn new(name: impl Into<String>, color: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            color,
            alpha: 1.0,
        }
    }

    /// Invisible material for hit-target geometry.
    pub fn transparent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: [1.0, 1.0, 1.0],
            alpha: 0.0,
        }
    }
}

/// Per-node render and interaction flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFlags {
    /// Gizmo geometry: never a selectable scene mesh
    pub editor_only: bool,
    /// Node receives pointer-move events (hover feedback)
    pub pointer_move_events: bool,
    /// Higher groups draw after lower ones, on top regardless of depth
    pub rendering_group: u8,
    pub cast_shadow: bool,
}

/// Mouse cursor shown over the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
}

/// One picking hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    pub node: NodeId,
    pub point: Vec3,
    pub distance: f32,
}

// ============================================================================
// HOST TRAIT
// ============================================================================

/// Everything the editor needs from a rendering engine.
///
/// Operations on handles that no longer exist are no-ops (setters) or return
/// `None`/empty (queries).
pub trait SceneHost {
    // ----- nodes -----

    /// Empty transform node.
    fn create_node(&mut self, name: &str) -> NodeId;

    /// Node with generated geometry.
    fn create_primitive(&mut self, name: &str, shape: &PrimitiveShape) -> NodeId;

    /// Replace a node's geometry.
    fn set_geometry(&mut self, node: NodeId, shape: &PrimitiveShape);

    fn contains(&self, node: NodeId) -> bool;

    fn name(&self, node: NodeId) -> Option<String>;

    /// Dispose a node and all of its descendants.
    fn dispose(&mut self, node: NodeId);

    // ----- materials -----

    fn create_material(&mut self, material: Material) -> MaterialId;

    fn set_material(&mut self, node: NodeId, material: MaterialId);

    fn dispose_material(&mut self, material: MaterialId);

    // ----- hierarchy -----

    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>);

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    // ----- transforms -----

    fn transform(&self, node: NodeId) -> Option<Transform>;

    fn set_transform(&mut self, node: NodeId, transform: Transform);

    fn set_position(&mut self, node: NodeId, position: Vec3) {
        if let Some(mut transform) = self.transform(node) {
            transform.position = position;
            self.set_transform(node, transform);
        }
    }

    fn set_rotation(&mut self, node: NodeId, rotation: Vec3) {
        if let Some(mut transform) = self.transform(node) {
            transform.rotation = rotation;
            self.set_transform(node, transform);
        }
    }

    fn set_scaling(&mut self, node: NodeId, scaling: Vec3) {
        if let Some(mut transform) = self.transform(node) {
            transform.scaling = scaling;
            self.set_transform(node, transform);
        }
    }

    fn world_matrix(&self, node: NodeId) -> Option<Mat4>;

    fn world_position(&self, node: NodeId) -> Option<Vec3> {
        self.world_matrix(node).map(|m| m.w_axis.truncate())
    }

    /// World-aligned bounding box of the node's own geometry.
    fn world_bounds(&self, node: NodeId) -> Option<Aabb>;

    // ----- visibility and flags -----

    fn set_visible(&mut self, node: NodeId, visible: bool);

    fn is_visible(&self, node: NodeId) -> bool;

    fn set_pickable(&mut self, node: NodeId, pickable: bool);

    fn set_render_flags(&mut self, node: NodeId, flags: RenderFlags);

    fn render_flags(&self, node: NodeId) -> Option<RenderFlags>;

    fn set_highlight(&mut self, node: NodeId, highlighted: bool);

    fn set_cursor(&mut self, cursor: CursorStyle);

    // ----- picking -----

    /// World-space ray through a screen pixel.
    fn picking_ray(&self, screen: Vec2) -> Ray;

    /// Every hit along the ray, nearest first.
    fn multi_pick(&self, ray: &Ray) -> Vec<PickHit>;

    /// Nearest hit along the ray.
    fn pick(&self, ray: &Ray) -> Option<PickHit> {
        self.multi_pick(ray).into_iter().next()
    }

    // ----- animation -----

    /// Start a clip on a node, replacing any clip already playing there.
    fn play_animation(&mut self, node: NodeId, clip: AnimationClip);
}
