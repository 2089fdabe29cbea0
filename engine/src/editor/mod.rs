//! Shape Editors
//!
//! One controller per editable primitive kind. A controller owns a gizmo,
//! shows it only while a record of its kind is selected, keeps it fitted to
//! that record's world bounding box and turns drags on its handles into
//! parameter writes.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --mount--> Idle --pointer down on handle--> Dragging
//!      ^                    ^  |                              |
//!      +------unmount-------+  +<------- pointer up ----------+
//! ```
//!
//! Visibility is tracked separately from the drag state and only changes on
//! selection changes.
//!
//! The per-kind differences (which parts exist, which handle edits which
//! field, how parts are fitted to the bounds) live in a `GizmoLayout`;
//! `ShapeEditor` runs the shared state machine over any layout.

pub mod cube;
pub mod cylinder;
pub mod drag;
pub mod icosphere;

use glam::{Vec2, Vec3};
use tracing::{debug, trace};

use crate::config::{EditorConfig, GizmoConfig};
use crate::error::Result;
use crate::geometry::Aabb;
use crate::gizmo::{GizmoBundle, set_visibility};
use crate::scene::{NodeId, SceneHost};
use crate::store::{ChangeSource, MeshId, MeshStore, ParamField, PropertyBus, PropertyChange, ShapeKind};

pub use cube::{CubeEditor, CubeGizmo};
pub use cylinder::{CylinderEditor, CylinderGizmo};
pub use drag::{AxisConstraint, DragSession, drag_value, is_toward_center};
pub use icosphere::{IcoSphereEditor, IcoSphereGizmo};

// ============================================================================
// CONTEXT AND EVENTS
// ============================================================================

/// Everything a controller may touch while handling an event.
pub struct EditorContext<'a> {
    pub host: &'a mut dyn SceneHost,
    pub store: &'a mut MeshStore,
    pub bus: &'a mut PropertyBus,
    pub config: &'a EditorConfig,
}

impl EditorContext<'_> {
    /// Clamp and store a parameter, rebuild the record's geometry and
    /// publish the change. Returns the stored value.
    pub fn write_parameter(
        &mut self,
        id: &MeshId,
        field: ParamField,
        value: f32,
        source: ChangeSource,
    ) -> Result<f32> {
        let applied = self.store.set_parameter(id, field, value)?;
        if let Some(record) = self.store.get(id) {
            if let Some(node) = record.mesh {
                self.host.set_geometry(node, &record.parameters.primitive());
            }
        }
        self.bus.publish(PropertyChange {
            record: id.clone(),
            field,
            value: applied,
            source,
        });
        Ok(applied)
    }

    /// Selected record id and scene node, if it is of `kind` and attached.
    pub fn selected_of_kind(&self, kind: ShapeKind) -> Option<(MeshId, NodeId)> {
        let record = self.store.selected()?;
        if record.kind() != kind {
            return None;
        }
        Some((record.id.clone(), record.mesh?))
    }
}

/// A low-level pointer event in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: i32,
    pub screen: Vec2,
}

impl PointerEvent {
    pub fn new(pointer_id: i32, screen: Vec2) -> Self {
        Self { pointer_id, screen }
    }
}

// ============================================================================
// CONTROLLER TRAIT
// ============================================================================

/// A shape editor as seen by the viewport.
pub trait ShapeController {
    fn kind(&self) -> ShapeKind;

    /// Build the gizmo, hidden.
    fn mount(&mut self, host: &mut dyn SceneHost, config: &EditorConfig);

    /// Cancel any drag and dispose the gizmo.
    fn unmount(&mut self, host: &mut dyn SceneHost);

    /// Show and fit the gizmo if the selection is of this kind, hide it otherwise.
    fn on_selection_changed(&mut self, ctx: &mut EditorContext<'_>);

    /// Refit a visible gizmo to the selected record.
    fn resync(&mut self, ctx: &mut EditorContext<'_>);

    /// Secondary hit test on raw pointer-down. Returns true when the event
    /// started a drag or triggered a handle action.
    fn pointer_down(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> bool;

    /// Returns true when the event belonged to an active drag.
    fn pointer_move(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> bool;

    /// Returns true when the event ended an active drag.
    fn pointer_up(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> bool;

    fn is_mounted(&self) -> bool;

    fn is_visible(&self) -> bool;

    fn is_dragging(&self) -> bool;

    fn bundle(&self) -> Option<&GizmoBundle>;
}

// ============================================================================
// LAYOUTS
// ============================================================================

/// A part that edits a field when dragged along its local axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragHandle {
    /// Hit-tested node
    pub node: NodeId,
    /// Node whose world position is the reference center
    pub reference: NodeId,
    pub field: ParamField,
    /// Drag direction in the handle's local frame
    pub local_axis: Vec3,
    /// Local position restored when the drag ends
    pub rest_position: Vec3,
    pub multiplier: f32,
}

/// A part that bumps an integer field by `step` when pressed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepHandle {
    pub node: NodeId,
    pub field: ParamField,
    pub step: f32,
}

/// Per-kind gizmo construction and fitting.
pub trait GizmoLayout {
    const KIND: ShapeKind;

    /// Build every part, parented under a new bundle.
    fn build(host: &mut dyn SceneHost, config: &GizmoConfig) -> Self;

    fn bundle(&self) -> &GizmoBundle;

    fn into_bundle(self) -> GizmoBundle;

    fn drag_handles(&self) -> &[DragHandle];

    fn step_handles(&self) -> &[StepHandle] {
        &[]
    }

    /// Fit the parts to the selected mesh's world bounds. The bundle group is
    /// already at the mesh's world position.
    fn fit(&self, host: &mut dyn SceneHost, bounds: &Aabb, config: &GizmoConfig);
}

// ============================================================================
// GENERIC CONTROLLER
// ============================================================================

/// Drag state of a controller.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EditorState {
    #[default]
    Uninitialized,
    Idle,
    Dragging(DragSession),
}

/// The shared controller state machine over a layout.
#[derive(Debug)]
pub struct ShapeEditor<L: GizmoLayout> {
    layout: Option<L>,
    state: EditorState,
    visible: bool,
}

impl<L: GizmoLayout> Default for ShapeEditor<L> {
    fn default() -> Self {
        Self {
            layout: None,
            state: EditorState::Uninitialized,
            visible: false,
        }
    }
}

impl<L: GizmoLayout> ShapeEditor<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(&self) -> Option<&L> {
        self.layout.as_ref()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Refit to a target node. No-op without bounds.
    fn fit_to(&self, host: &mut dyn SceneHost, target: NodeId, config: &GizmoConfig) {
        let Some(layout) = &self.layout else { return };
        let (Some(bounds), Some(center)) = (host.world_bounds(target), host.world_position(target)) else {
            trace!(?target, "no bounds to fit gizmo to");
            return;
        };
        host.set_position(layout.bundle().group, center);
        layout.fit(host, &bounds, config);
        debug!(kind = ?L::KIND, size = ?bounds.size(), "gizmo resynced");
    }

    /// Put a dragged handle back and return to idle.
    fn end_drag(&mut self, host: &mut dyn SceneHost) {
        if let EditorState::Dragging(session) = &self.state {
            if let Some(handle) = self.layout.as_ref().and_then(|l| l.drag_handles().get(session.handle)) {
                host.set_position(handle.node, handle.rest_position);
            }
            debug!(field = session.field.name(), record = %session.record, "drag ended");
            self.state = EditorState::Idle;
        }
    }

    fn start_drag(
        &mut self,
        ctx: &mut EditorContext<'_>,
        event: &PointerEvent,
        index: usize,
        record: MeshId,
    ) -> bool {
        let Some(handle) = self.layout.as_ref().and_then(|l| l.drag_handles().get(index).copied()) else {
            return false;
        };
        let ray = ctx.host.picking_ray(event.screen);
        let (Some(world), Some(handle_start), Some(center)) = (
            ctx.host.world_matrix(handle.node),
            ctx.host.world_position(handle.node),
            ctx.host.world_position(handle.reference),
        ) else {
            return false;
        };
        let axis = world.transform_vector3(handle.local_axis).normalize_or_zero();
        if axis == Vec3::ZERO {
            return false;
        }

        // The drag plane contains the handle's axis line
        let anchor = handle_start;
        let Some((plane_normal, initial_coordinate)) = DragSession::open_plane(&ray, anchor, axis) else {
            trace!("drag plane degenerate, ignoring pointer down");
            return false;
        };

        let Some(range) = ctx.config.limits.range(L::KIND, handle.field) else {
            return false;
        };
        let Some(initial_value) = ctx.store.get(&record).and_then(|r| r.parameters.get(handle.field)) else {
            return false;
        };
        let constraint = if handle.field.is_integer() {
            AxisConstraint::stepped(range, handle.multiplier)
        } else {
            AxisConstraint {
                multiplier: handle.multiplier,
                ..AxisConstraint::continuous(range)
            }
        };

        debug!(field = handle.field.name(), record = %record, initial_value, "drag started");
        self.state = EditorState::Dragging(DragSession {
            pointer_id: event.pointer_id,
            handle: index,
            record,
            field: handle.field,
            axis,
            anchor,
            plane_normal,
            initial_coordinate,
            initial_value,
            reference_center: center.dot(axis),
            handle_start,
            constraint,
            moved_node: handle.node,
        });
        true
    }

    fn step(&mut self, ctx: &mut EditorContext<'_>, handle: StepHandle, record: &MeshId, target: NodeId) {
        let Some(current) = ctx.store.get(record).and_then(|r| r.parameters.get(handle.field)) else {
            return;
        };
        if ctx
            .write_parameter(record, handle.field, current + handle.step, ChangeSource::Gizmo)
            .is_ok()
        {
            self.fit_to(ctx.host, target, &ctx.config.gizmo);
        }
    }
}

impl<L: GizmoLayout> ShapeController for ShapeEditor<L> {
    fn kind(&self) -> ShapeKind {
        L::KIND
    }

    fn mount(&mut self, host: &mut dyn SceneHost, config: &EditorConfig) {
        if let Some(layout) = self.layout.take() {
            layout.into_bundle().dispose(host);
        }
        let layout = L::build(host, &config.gizmo);
        layout.bundle().set_visible(host, false);
        self.layout = Some(layout);
        self.state = EditorState::Idle;
        self.visible = false;
    }

    fn unmount(&mut self, host: &mut dyn SceneHost) {
        self.end_drag(host);
        if let Some(layout) = self.layout.take() {
            layout.into_bundle().dispose(host);
        }
        self.state = EditorState::Uninitialized;
        self.visible = false;
    }

    fn on_selection_changed(&mut self, ctx: &mut EditorContext<'_>) {
        self.end_drag(ctx.host);
        let Some(group) = self.layout.as_ref().map(|l| l.bundle().group) else {
            return;
        };
        match ctx.selected_of_kind(L::KIND) {
            Some((_, target)) => {
                set_visibility(ctx.host, Some(group), true);
                self.visible = true;
                self.fit_to(ctx.host, target, &ctx.config.gizmo);
            }
            None => {
                set_visibility(ctx.host, Some(group), false);
                self.visible = false;
            }
        }
    }

    fn resync(&mut self, ctx: &mut EditorContext<'_>) {
        if !self.visible {
            return;
        }
        if let Some((_, target)) = ctx.selected_of_kind(L::KIND) {
            self.fit_to(ctx.host, target, &ctx.config.gizmo);
        }
    }

    fn pointer_down(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> bool {
        // A second down from the same pointer means its up was lost
        if matches!(&self.state, EditorState::Dragging(session) if session.pointer_id == event.pointer_id) {
            self.end_drag(ctx.host);
        }
        if !self.visible || !matches!(self.state, EditorState::Idle) {
            return false;
        }
        let Some((record, target)) = ctx.selected_of_kind(L::KIND) else {
            return false;
        };
        let Some(layout) = &self.layout else { return false };
        let drag_handles = layout.drag_handles().to_vec();
        let step_handles = layout.step_handles().to_vec();

        let ray = ctx.host.picking_ray(event.screen);
        for hit in ctx.host.multi_pick(&ray) {
            if let Some(index) = drag_handles.iter().position(|h| h.node == hit.node) {
                return self.start_drag(ctx, event, index, record);
            }
            if let Some(handle) = step_handles.iter().find(|h| h.node == hit.node) {
                self.step(ctx, *handle, &record, target);
                return true;
            }
        }
        false
    }

    fn pointer_move(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> bool {
        let session = match &self.state {
            EditorState::Dragging(session) if session.pointer_id == event.pointer_id => session.clone(),
            _ => return false,
        };
        let ray = ctx.host.picking_ray(event.screen);
        let Some(coordinate) = session.coordinate(&ray) else {
            return true;
        };

        let value = session.value_at(coordinate);
        if ctx
            .write_parameter(&session.record, session.field, value, ChangeSource::Gizmo)
            .is_err()
        {
            return true;
        }
        if let Some(target) = ctx.store.get(&session.record).and_then(|r| r.mesh) {
            self.fit_to(ctx.host, target, &ctx.config.gizmo);
        }

        // The handle follows the pointer along the axis
        let follow = session.handle_position(coordinate);
        let parent_world = ctx
            .host
            .parent(session.moved_node)
            .and_then(|parent| ctx.host.world_matrix(parent));
        if let Some(parent_world) = parent_world {
            if parent_world.determinant().abs() > 1e-12 {
                let local = parent_world.inverse().transform_point3(follow);
                ctx.host.set_position(session.moved_node, local);
            }
        }
        true
    }

    fn pointer_up(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> bool {
        let ends_drag = matches!(
            &self.state,
            EditorState::Dragging(session) if session.pointer_id == event.pointer_id
        );
        if ends_drag {
            self.end_drag(ctx.host);
        }
        ends_drag
    }

    fn is_mounted(&self) -> bool {
        self.layout.is_some()
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_dragging(&self) -> bool {
        matches!(self.state, EditorState::Dragging(_))
    }

    fn bundle(&self) -> Option<&GizmoBundle> {
        self.layout.as_ref().map(GizmoLayout::bundle)
    }
}

/// One editor per editable kind, ready to mount.
pub fn default_controllers() -> Vec<Box<dyn ShapeController>> {
    vec![
        Box::new(CubeEditor::new()),
        Box::new(CylinderEditor::new()),
        Box::new(IcoSphereEditor::new()),
    ]
}
