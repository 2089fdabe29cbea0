//! Cube Editor
//!
//! Three arrows from the cube's center: green along +Y for height, blue along
//! -X for width, red along +Z for depth. Each arrow group is stretched along
//! its shaft so the tip sits just outside the matching face.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::{DragHandle, GizmoLayout, ShapeEditor};
use crate::config::GizmoConfig;
use crate::geometry::Aabb;
use crate::gizmo::{ArrowParts, GizmoBundle, create_arrow};
use crate::scene::{Material, MaterialId, SceneHost};
use crate::store::{ParamField, ShapeKind};

/// Controller for cube records.
pub type CubeEditor = ShapeEditor<CubeGizmo>;

/// Arrows of the cube gizmo.
#[derive(Debug, Clone)]
pub struct CubeGizmo {
    bundle: GizmoBundle,
    pub width: ArrowParts,
    pub height: ArrowParts,
    pub depth: ArrowParts,
    handles: [DragHandle; 3],
}

impl GizmoLayout for CubeGizmo {
    const KIND: ShapeKind = ShapeKind::Cube;

    fn build(host: &mut dyn SceneHost, config: &GizmoConfig) -> Self {
        let mut bundle = GizmoBundle::new(host, "cubeEditor");
        let height_material = bundle.create_material(host, Material::new("heightArrowMaterial", [0.0, 1.0, 0.0]));
        let width_material = bundle.create_material(host, Material::new("widthArrowMaterial", [0.0, 0.0, 1.0]));
        let depth_material = bundle.create_material(host, Material::new("depthArrowMaterial", [1.0, 0.0, 0.0]));
        let control_material = bundle.create_material(host, Material::transparent("transparentMaterial"));

        let height = cube_arrow(
            host,
            &mut bundle,
            height_material,
            Vec3::new(0.0, FRAC_PI_2, 0.0),
            ["heightArrowGroup", "heightArrowShaft", "heightCtrlArrowShaft", "heightArrowTipTop"],
            control_material,
            config,
        );
        let width = cube_arrow(
            host,
            &mut bundle,
            width_material,
            Vec3::new(0.0, 0.0, FRAC_PI_2),
            ["widthArrowGroup", "widthArrowShaft", "widthCtrlArrowShaft", "widthArrowTipTop"],
            control_material,
            config,
        );
        let depth = cube_arrow(
            host,
            &mut bundle,
            depth_material,
            Vec3::new(FRAC_PI_2, 0.0, 0.0),
            ["depthArrowGroup", "depthArrowShaft", "depthCtrlArrowShaft", "depthArrowTipTop"],
            control_material,
            config,
        );

        let offset = config.cube_arrow_offset;
        let handle = |parts: &ArrowParts, field| DragHandle {
            node: parts.control_shaft,
            reference: parts.group,
            field,
            local_axis: Vec3::Y,
            rest_position: Vec3::new(0.0, offset, 0.0),
            multiplier: 1.0,
        };
        let handles = [
            handle(&width, ParamField::Width),
            handle(&height, ParamField::Height),
            handle(&depth, ParamField::Depth),
        ];

        Self {
            bundle,
            width,
            height,
            depth,
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
        let size = bounds.size();
        for (arrow, extent) in [
            (&self.width, size.x),
            (&self.height, size.y),
            (&self.depth, size.z),
        ] {
            host.set_scaling(arrow.group, Vec3::new(1.0, config.fit_factor * extent, 1.0));
        }
    }
}

/// One short arrow of the cube gizmo, registered under `names`.
fn cube_arrow(
    host: &mut dyn SceneHost,
    bundle: &mut GizmoBundle,
    material: MaterialId,
    rotation: Vec3,
    names: [&'static str; 4],
    control_material: MaterialId,
    config: &GizmoConfig,
) -> ArrowParts {
    let parts = create_arrow(
        host,
        material,
        control_material,
        rotation,
        config.cube_arrow_length,
        config.cube_arrow_offset,
        config,
    );
    bundle.add_arrow(host, names, parts)
}
