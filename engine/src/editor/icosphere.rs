//! IcoSphere Editor
//!
//! Same ring and vertical arrow as the cylinder editor. The ring edits the
//! diameter; dragging the arrow shaft edits the subdivision count (ten steps
//! per world unit), and pressing the top or bottom tip adds or removes one
//! subdivision.

use super::cylinder::RingArrowParts;
use super::{DragHandle, GizmoLayout, ShapeEditor, StepHandle};
use crate::config::GizmoConfig;
use crate::geometry::Aabb;
use crate::gizmo::GizmoBundle;
use crate::scene::SceneHost;
use crate::store::{ParamField, ShapeKind};

/// Controller for icosphere records.
pub type IcoSphereEditor = ShapeEditor<IcoSphereGizmo>;

/// Gizmo of the icosphere editor.
#[derive(Debug, Clone)]
pub struct IcoSphereGizmo {
    bundle: GizmoBundle,
    pub parts: RingArrowParts,
    handles: [DragHandle; 2],
    steps: [StepHandle; 2],
}

impl GizmoLayout for IcoSphereGizmo {
    const KIND: ShapeKind = ShapeKind::IcoSphere;

    fn build(host: &mut dyn SceneHost, config: &GizmoConfig) -> Self {
        let mut bundle = GizmoBundle::new(host, "icosphereEditor");
        let parts = RingArrowParts::build(host, &mut bundle, config);
        let handles = [
            parts.ring_handle(),
            parts.shaft_handle(ParamField::Subdivisions, config.subdivision_drag_multiplier, config),
        ];
        let steps = [
            StepHandle {
                node: parts.arrow.tip,
                field: ParamField::Subdivisions,
                step: 1.0,
            },
            StepHandle {
                node: parts.bottom_tip,
                field: ParamField::Subdivisions,
                step: -1.0,
            },
        ];
        Self {
            bundle,
            parts,
            handles,
            steps,
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

    fn step_handles(&self) -> &[StepHandle] {
        &self.steps
    }

    fn fit(&self, host: &mut dyn SceneHost, bounds: &Aabb, config: &GizmoConfig) {
        self.parts.fit(host, bounds, config);
    }
}
