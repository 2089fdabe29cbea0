//! Cylinder Editor
//!
//! A red ring around the cylinder for the diameter and a vertical blue arrow
//! through it, with a tip at each end, for the height. The ring is sized to
//! the horizontal extent and the arrow spans the vertical extent, both
//! scaled by the fit factor.
//!
//! The ring-and-arrow arrangement is shared with the icosphere editor.

use std::f32::consts::PI;

use glam::Vec3;

use super::{DragHandle, GizmoLayout, ShapeEditor};
use crate::config::GizmoConfig;
use crate::geometry::Aabb;
use crate::gizmo::arrow::tip_shape;
use crate::gizmo::{ArrowParts, GizmoBundle, create_arrow, mark_editor_part};
use crate::scene::{Material, NodeId, PrimitiveShape, SceneHost};
use crate::store::{ParamField, ShapeKind};

/// Controller for cylinder records.
pub type CylinderEditor = ShapeEditor<CylinderGizmo>;

// ============================================================================
// RING + VERTICAL ARROW
// ============================================================================

/// Ring, control ring, vertical arrow and the extra bottom tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingArrowParts {
    /// Bundle group, placed at the mesh center
    pub group: NodeId,
    pub ring: NodeId,
    pub control_ring: NodeId,
    pub arrow: ArrowParts,
    pub bottom_tip: NodeId,
}

impl RingArrowParts {
    /// Build the parts into `bundle`.
    pub fn build(host: &mut dyn SceneHost, bundle: &mut GizmoBundle, config: &GizmoConfig) -> Self {
        let ring_material = bundle.create_material(host, Material::new("ringMaterial", [1.0, 0.0, 0.0]));
        let arrow_material = bundle.create_material(host, Material::new("arrowMaterial", [0.0, 0.0, 1.0]));
        let control_material = bundle.create_material(host, Material::transparent("transparentMaterial"));

        let torus = |thickness| PrimitiveShape::Torus {
            diameter: 1.0,
            thickness,
            tessellation: config.ring_tessellation,
        };
        let control_ring = host.create_primitive("ctrlRing", &torus(config.control_ring_thickness));
        host.set_material(control_ring, control_material);
        let ring = host.create_primitive("ring", &torus(config.ring_thickness));
        host.set_material(ring, ring_material);
        for node in [ring, control_ring] {
            mark_editor_part(host, node, config);
        }
        bundle.add_part(host, "ring", ring, None);
        bundle.add_part(host, "ctrlRing", control_ring, None);

        let arrow = create_arrow(
            host,
            arrow_material,
            control_material,
            Vec3::ZERO,
            config.vertical_arrow_length,
            config.vertical_arrow_offset,
            config,
        );
        let arrow = bundle.add_arrow(
            host,
            ["arrowGroup", "arrowShaft", "ctrlArrowShaft", "arrowTipTop"],
            arrow,
        );

        let bottom_tip = host.create_primitive("arrowTipBot", &tip_shape(config));
        host.set_material(bottom_tip, arrow_material);
        host.set_rotation(bottom_tip, Vec3::new(PI, 0.0, 0.0));
        mark_editor_part(host, bottom_tip, config);
        bundle.add_part(host, "arrowTipBot", bottom_tip, Some(arrow.group));

        Self {
            group: bundle.group,
            ring,
            control_ring,
            arrow,
            bottom_tip,
        }
    }

    /// Ring handle editing the diameter, dragged along its local X.
    pub fn ring_handle(&self) -> DragHandle {
        DragHandle {
            node: self.control_ring,
            reference: self.group,
            field: ParamField::Diameter,
            local_axis: Vec3::X,
            rest_position: Vec3::ZERO,
            multiplier: 1.0,
        }
    }

    /// Control shaft handle, dragged along its local Y.
    pub fn shaft_handle(&self, field: ParamField, multiplier: f32, config: &GizmoConfig) -> DragHandle {
        DragHandle {
            node: self.arrow.control_shaft,
            reference: self.arrow.group,
            field,
            local_axis: Vec3::Y,
            rest_position: Vec3::new(0.0, config.vertical_arrow_offset, 0.0),
            multiplier,
        }
    }

    /// Size the ring to the horizontal extent and the arrow to the vertical one.
    pub fn fit(&self, host: &mut dyn SceneHost, bounds: &Aabb, config: &GizmoConfig) {
        let size = bounds.size();
        let ring_scale = config.fit_factor * size.x.max(size.z);
        host.set_scaling(self.ring, Vec3::splat(ring_scale));
        host.set_scaling(self.control_ring, Vec3::splat(ring_scale));

        let span = config.fit_factor * size.y;
        let shaft_scale = if config.vertical_arrow_length > 0.0 {
            span / config.vertical_arrow_length
        } else {
            1.0
        };
        for shaft in [self.arrow.shaft, self.arrow.control_shaft] {
            host.set_scaling(shaft, Vec3::new(1.0, shaft_scale, 1.0));
        }

        let tip_offset = (span + config.tip_height) * 0.5;
        let center = config.vertical_arrow_offset;
        host.set_position(self.arrow.tip, Vec3::new(0.0, center + tip_offset, 0.0));
        host.set_position(self.bottom_tip, Vec3::new(0.0, center - tip_offset, 0.0));
    }
}

// ============================================================================
// CYLINDER
// ============================================================================

/// Gizmo of the cylinder editor.
#[derive(Debug, Clone)]
pub struct CylinderGizmo {
    bundle: GizmoBundle,
    pub parts: RingArrowParts,
    handles: [DragHandle; 2],
}

impl GizmoLayout for CylinderGizmo {
    const KIND: ShapeKind = ShapeKind::Cylinder;

    fn build(host: &mut dyn SceneHost, config: &GizmoConfig) -> Self {
        let mut bundle = GizmoBundle::new(host, "cylinderEditor");
        let parts = RingArrowParts::build(host, &mut bundle, config);
        let handles = [
            parts.ring_handle(),
            parts.shaft_handle(ParamField::Height, 1.0, config),
        ];
        Self {
            bundle,
            parts,
            handles,
        }
    }

    fn bundle(&self) -> &GizmoBundle {
        &self.bundle
    }

    fn into_bundle(self) -> GizmoBundle {
        self.bundle
    }

    fn drag_handles(&self) -> &[DragHandle] {
        &self.handles
    }

    fn fit(&self, host: &mut dyn SceneHost, bounds: &Aabb, config: &GizmoConfig) {
        self.parts.fit(host, bounds, config);
    }
}
