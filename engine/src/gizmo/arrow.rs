//! Arrow Gizmo
//!
//! An arrow is a thin visible shaft, a thicker invisible control shaft used as
//! the hit target, and a cone tip at the end of the shaft, all under one group
//! node. Parts run along the group's local +Y; the group rotation orients the
//! whole arrow.

use glam::Vec3;

use super::mark_editor_part;
use crate::config::GizmoConfig;
use crate::scene::{MaterialId, NodeId, PrimitiveShape, SceneHost};

/// Tessellation of shafts and tips.
const ARROW_TESSELLATION: u32 = 16;

/// Nodes of one arrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrowParts {
    pub shaft: NodeId,
    pub control_shaft: NodeId,
    pub tip: NodeId,
    pub group: NodeId,
}

impl ArrowParts {
    pub fn nodes(&self) -> [NodeId; 4] {
        [self.group, self.shaft, self.control_shaft, self.tip]
    }
}

/// Cone used for arrow tips, point up.
pub fn tip_shape(config: &GizmoConfig) -> PrimitiveShape {
    PrimitiveShape::Cylinder {
        diameter_top: 0.0,
        diameter_bottom: config.tip_diameter,
        height: config.tip_height,
        tessellation: ARROW_TESSELLATION,
    }
}

/// Build an arrow.
///
/// # Arguments
/// * `material` - Material of the visible shaft and tip
/// * `control_material` - Material of the hit-target shaft (normally transparent)
/// * `rotation` - Euler rotation of the arrow group
/// * `length` - Shaft length; the tip sits at this height
/// * `offset` - Height of the shaft center
pub fn create_arrow(
    host: &mut dyn SceneHost,
    material: MaterialId,
    control_material: MaterialId,
    rotation: Vec3,
    length: f32,
    offset: f32,
    config: &GizmoConfig,
) -> ArrowParts {
    let group = host.create_node("arrowGroup");

    let control_shaft = host.create_primitive(
        "ctrlShaft",
        &PrimitiveShape::Cylinder {
            diameter_top: config.control_radius * 2.0,
            diameter_bottom: config.control_radius * 2.0,
            height: length,
            tessellation: ARROW_TESSELLATION,
        },
    );
    host.set_material(control_shaft, control_material);

    let shaft = host.create_primitive(
        "shaft",
        &PrimitiveShape::Cylinder {
            diameter_top: config.shaft_radius * 2.0,
            diameter_bottom: config.shaft_radius * 2.0,
            height: length,
            tessellation: ARROW_TESSELLATION,
        },
    );
    host.set_material(shaft, material);

    let tip = host.create_primitive("tip", &tip_shape(config));
    host.set_material(tip, material);

    host.set_position(shaft, Vec3::new(0.0, offset, 0.0));
    host.set_position(control_shaft, Vec3::new(0.0, offset, 0.0));
    host.set_position(tip, Vec3::new(0.0, length, 0.0));

    for part in [shaft, control_shaft, tip] {
        mark_editor_part(host, part, config);
        host.set_parent(part, Some(group));
    }
    host.set_rotation(group, rotation);

    ArrowParts {
        shaft,
        control_shaft,
        tip,
        group,
    }
}
