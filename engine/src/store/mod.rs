//! Mesh Store
//!
//! The editor's shared state: one `MeshRecord` per shape instance, keyed by id,
//! plus the currently selected and hovered ids. Shape editors, the selection
//! controller and the property panel all read and write through this type.
//!
//! Selection is always updated as one transition: the complete next set of
//! `selected` flags is computed from the target id before any record changes,
//! so no reader can observe zero or two selected records mid-update.
//!
//! # Example
//!
//! ```ignore
//! use mesh_editor_engine::store::{MeshStore, MeshId, ParamField};
//!
//! let mut store = MeshStore::demo();
//! store.set_selected(&MeshId::new("demoCube"), true)?;
//! let width = store.set_parameter(&MeshId::new("demoCube"), ParamField::Width, 5.0)?;
//! assert_eq!(width, 2.0); // clamped to the configured max
//! ```

pub mod property_bus;

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ParameterLimits;
use crate::error::{EditorError, Result};
use crate::scene::{NodeId, PrimitiveShape};

pub use property_bus::{ChangeSource, PropertyBus, PropertyChange, PropertyFilter, SubscriptionId};

/// Tessellation used when rebuilding cylinder records.
pub const CYLINDER_TESSELLATION: u32 = 24;

// ============================================================================
// IDS AND TAGS
// ============================================================================

/// Stable identifier of a mesh record (e.g. `"demoCube"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(String);

impl MeshId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MeshId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Primitive type of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Cube,
    Cylinder,
    IcoSphere,
    Plane,
}

impl ShapeKind {
    /// Lower-case tag used in UI labels.
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::IcoSphere => "icosphere",
            ShapeKind::Plane => "plane",
        }
    }
}

/// A named numeric slot inside `ShapeParameters`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamField {
    Width,
    Height,
    Depth,
    Diameter,
    Radius,
    Subdivisions,
}

impl ParamField {
    pub fn name(self) -> &'static str {
        match self {
            ParamField::Width => "width",
            ParamField::Height => "height",
            ParamField::Depth => "depth",
            ParamField::Diameter => "diameter",
            ParamField::Radius => "radius",
            ParamField::Subdivisions => "subdivisions",
        }
    }

    /// Integer fields are rounded before they are clamped and stored.
    pub fn is_integer(self) -> bool {
        matches!(self, ParamField::Subdivisions)
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Variant-specific parameters of a record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ShapeParameters {
    Cube { width: f32, height: f32, depth: f32 },
    Cylinder { diameter: f32, height: f32 },
    IcoSphere { radius: f32, subdivisions: u32 },
    Plane { width: f32, height: f32 },
}

impl ShapeParameters {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeParameters::Cube { .. } => ShapeKind::Cube,
            ShapeParameters::Cylinder { .. } => ShapeKind::Cylinder,
            ShapeParameters::IcoSphere { .. } => ShapeKind::IcoSphere,
            ShapeParameters::Plane { .. } => ShapeKind::Plane,
        }
    }

    /// Read a field. `Diameter` on an icosphere is a view of `2 * radius`.
    pub fn get(&self, field: ParamField) -> Option<f32> {
        match (*self, field) {
            (ShapeParameters::Cube { width, .. }, ParamField::Width) => Some(width),
            (ShapeParameters::Cube { height, .. }, ParamField::Height) => Some(height),
            (ShapeParameters::Cube { depth, .. }, ParamField::Depth) => Some(depth),
            (ShapeParameters::Cylinder { diameter, .. }, ParamField::Diameter) => Some(diameter),
            (ShapeParameters::Cylinder { height, .. }, ParamField::Height) => Some(height),
            (ShapeParameters::IcoSphere { radius, .. }, ParamField::Radius) => Some(radius),
            (ShapeParameters::IcoSphere { radius, .. }, ParamField::Diameter) => Some(radius * 2.0),
            (ShapeParameters::IcoSphere { subdivisions, .. }, ParamField::Subdivisions) => {
                Some(subdivisions as f32)
            }
            (ShapeParameters::Plane { width, .. }, ParamField::Width) => Some(width),
            (ShapeParameters::Plane { height, .. }, ParamField::Height) => Some(height),
            _ => None,
        }
    }

    /// Copy of these parameters with one field replaced, or `None` when the
    /// field does not belong to this shape.
    pub fn with(&self, field: ParamField, value: f32) -> Option<Self> {
        let mut next = *self;
        match (&mut next, field) {
            (ShapeParameters::Cube { width, .. }, ParamField::Width) => *width = value,
            (ShapeParameters::Cube { height, .. }, ParamField::Height) => *height = value,
            (ShapeParameters::Cube { depth, .. }, ParamField::Depth) => *depth = value,
            (ShapeParameters::Cylinder { diameter, .. }, ParamField::Diameter) => *diameter = value,
            (ShapeParameters::Cylinder { height, .. }, ParamField::Height) => *height = value,
            (ShapeParameters::IcoSphere { radius, .. }, ParamField::Radius) => *radius = value,
            (ShapeParameters::IcoSphere { radius, .. }, ParamField::Diameter) => {
                *radius = value * 0.5
            }
            (ShapeParameters::IcoSphere { subdivisions, .. }, ParamField::Subdivisions) => {
                *subdivisions = value.round().max(0.0) as u32
            }
            (ShapeParameters::Plane { width, .. }, ParamField::Width) => *width = value,
            (ShapeParameters::Plane { height, .. }, ParamField::Height) => *height = value,
            _ => return None,
        }
        Some(next)
    }

    /// Stored fields of a kind, in panel order.
    pub fn fields(kind: ShapeKind) -> &'static [ParamField] {
        match kind {
            ShapeKind::Cube => &[ParamField::Width, ParamField::Height, ParamField::Depth],
            ShapeKind::Cylinder => &[ParamField::Diameter, ParamField::Height],
            ShapeKind::IcoSphere => &[ParamField::Radius, ParamField::Subdivisions],
            ShapeKind::Plane => &[ParamField::Width, ParamField::Height],
        }
    }

    /// Clamp every stored field into its configured range.
    pub fn clamped(&self, limits: &ParameterLimits) -> Self {
        let kind = self.kind();
        let mut next = *self;
        for &field in Self::fields(kind) {
            if let (Some(value), Some(range)) = (next.get(field), limits.range(kind, field)) {
                let value = if field.is_integer() { value.round() } else { value };
                if let Some(clamped) = next.with(field, range.clamp(value)) {
                    next = clamped;
                }
            }
        }
        next
    }

    /// Geometry description the scene host builds for these parameters.
    pub fn primitive(&self) -> PrimitiveShape {
        match *self {
            ShapeParameters::Cube {
                width,
                height,
                depth,
            } => PrimitiveShape::Box {
                width,
                height,
                depth,
            },
            ShapeParameters::Cylinder { diameter, height } => PrimitiveShape::Cylinder {
                diameter_top: diameter,
                diameter_bottom: diameter,
                height,
                tessellation: CYLINDER_TESSELLATION,
            },
            ShapeParameters::IcoSphere {
                radius,
                subdivisions,
            } => PrimitiveShape::IcoSphere {
                radius,
                subdivisions,
            },
            ShapeParameters::Plane { width, height } => PrimitiveShape::Ground { width, height },
        }
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// One shape instance in the editor.
#[derive(Clone, Debug)]
pub struct MeshRecord {
    pub id: MeshId,
    /// Display label
    pub name: String,
    pub parameters: ShapeParameters,
    /// Initial placement, applied once when the scene node is created
    pub position: Option<Vec3>,
    /// Initial Euler rotation (radians), applied once at creation
    pub rotation: Option<Vec3>,
    pub selectable: bool,
    pub cast_shadow: bool,
    /// At most one record is selected at any time
    pub selected: bool,
    /// Scene node, `None` until the viewport has created it
    pub mesh: Option<NodeId>,
}

impl MeshRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parameters: ShapeParameters) -> Self {
        Self {
            id: MeshId::new(id),
            name: name.into(),
            parameters,
            position: None,
            rotation: None,
            selectable: true,
            cast_shadow: true,
            selected: false,
            mesh: None,
        }
    }

    /// A non-selectable backdrop that does not cast shadows.
    pub fn backdrop(id: impl Into<String>, name: impl Into<String>, parameters: ShapeParameters) -> Self {
        Self {
            selectable: false,
            cast_shadow: false,
            ..Self::new(id, name, parameters)
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.parameters.kind()
    }
}

/// Result of a selection transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<MeshId>,
    pub current: Option<MeshId>,
}

impl SelectionChange {
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

/// Row of the mesh list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshListEntry {
    pub id: MeshId,
    pub name: String,
    pub selected: bool,
}

// ============================================================================
// STORE
// ============================================================================

/// Map of mesh id to record, plus selection and hover state.
#[derive(Clone, Debug, Default)]
pub struct MeshStore {
    records: BTreeMap<MeshId, MeshRecord>,
    /// Insertion order, used by the mesh list
    order: Vec<MeshId>,
    selected_id: Option<MeshId>,
    hovered_id: Option<MeshId>,
    limits: ParameterLimits,
}

impl MeshStore {
    pub fn new(limits: ParameterLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    /// The three editable demo shapes and a ground backdrop.
    pub fn demo() -> Self {
        Self::demo_with_limits(ParameterLimits::default())
    }

    pub fn demo_with_limits(limits: ParameterLimits) -> Self {
        let mut store = Self::new(limits);
        store.add_mesh(
            MeshRecord::new(
                "demoCube",
                "Cube",
                ShapeParameters::Cube {
                    width: 1.0,
                    height: 1.0,
                    depth: 1.0,
                },
            )
            .with_rotation(Vec3::new(0.0, std::f32::consts::PI, 0.0)),
        );
        store.add_mesh(
            MeshRecord::new(
                "demoIcosphere",
                "IcoSphere",
                ShapeParameters::IcoSphere {
                    radius: 1.0,
                    subdivisions: 4,
                },
            )
            .with_position(Vec3::new(-2.0, 0.0, 0.0)),
        );
        store.add_mesh(
            MeshRecord::new(
                "demoCylinder",
                "Cylinder",
                ShapeParameters::Cylinder {
                    diameter: 1.0,
                    height: 2.0,
                },
            )
            .with_position(Vec3::new(2.0, 0.0, 0.0)),
        );
        store.add_mesh(
            MeshRecord::backdrop(
                "ground",
                "Ground",
                ShapeParameters::Plane {
                    width: 10.0,
                    height: 10.0,
                },
            )
            .with_position(Vec3::new(0.0, -1.5, 0.0)),
        );
        store
    }

    pub fn limits(&self) -> &ParameterLimits {
        &self.limits
    }

    /// Insert or replace a record. Parameters are clamped on the way in.
    pub fn add_mesh(&mut self, mut record: MeshRecord) {
        record.parameters = record.parameters.clamped(&self.limits);
        record.selected = false;
        let id = record.id.clone();
        if self.records.insert(id.clone(), record).is_none() {
            self.order.push(id.clone());
        }
        if self.selected_id.as_ref() == Some(&id) {
            self.selected_id = None;
        }
    }

    pub fn get(&self, id: &MeshId) -> Option<&MeshRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &MeshId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MeshRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Owned copy of every record, in insertion order.
    pub fn snapshot(&self) -> Vec<MeshRecord> {
        self.iter().cloned().collect()
    }

    /// Merge-update a record in place. Parameters are re-clamped afterwards and
    /// the selection flag is restored; selection only changes via `set_selected`.
    pub fn update_mesh(&mut self, id: &MeshId, update: impl FnOnce(&mut MeshRecord)) -> Result<()> {
        let limits = self.limits;
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| EditorError::UnknownMesh(id.clone()))?;
        let selected = record.selected;
        update(record);
        record.id = id.clone();
        record.selected = selected;
        record.parameters = record.parameters.clamped(&limits);
        Ok(())
    }

    /// Record the scene node created for a record.
    pub fn attach_mesh(&mut self, id: &MeshId, node: NodeId) -> Result<()> {
        self.update_mesh(id, |record| record.mesh = Some(node))
    }

    /// Forget every scene node handle (viewport teardown).
    pub fn detach_all(&mut self) {
        for record in self.records.values_mut() {
            record.mesh = None;
        }
    }

    /// Forget one record's scene node handle.
    pub fn detach_mesh(&mut self, id: &MeshId) -> Result<()> {
        self.update_mesh(id, |record| record.mesh = None)
    }

    pub fn record_for_node(&self, node: NodeId) -> Option<&MeshRecord> {
        self.records.values().find(|record| record.mesh == Some(node))
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn selected_id(&self) -> Option<&MeshId> {
        self.selected_id.as_ref()
    }

    pub fn selected(&self) -> Option<&MeshRecord> {
        self.selected_id.as_ref().and_then(|id| self.records.get(id))
    }

    pub fn selected_count(&self) -> usize {
        self.records.values().filter(|record| record.selected).count()
    }

    /// Select (or deselect) a record.
    ///
    /// Selecting clears every other record in the same transition. Deselecting
    /// the current selection leaves nothing selected. Selecting a
    /// non-selectable record (a backdrop) clears the selection.
    ///
    /// # Errors
    /// `UnknownMesh` when `id` is not in the store; state is left untouched.
    pub fn set_selected(&mut self, id: &MeshId, selected: bool) -> Result<SelectionChange> {
        let Some(record) = self.records.get(id) else {
            warn!("mesh {} not found", id);
            return Err(EditorError::UnknownMesh(id.clone()));
        };

        let next = if selected && record.selectable {
            Some(id.clone())
        } else if !selected && self.selected_id.as_ref() != Some(id) {
            self.selected_id.clone()
        } else {
            None
        };

        Ok(self.apply_selection(next))
    }

    /// Flip the selection state of a record (mesh list click).
    pub fn toggle_selected(&mut self, id: &MeshId) -> Result<SelectionChange> {
        let selected = self
            .records
            .get(id)
            .map(|record| record.selected)
            .ok_or_else(|| EditorError::UnknownMesh(id.clone()))?;
        self.set_selected(id, !selected)
    }

    pub fn clear_selection(&mut self) -> SelectionChange {
        self.apply_selection(None)
    }

    fn apply_selection(&mut self, next: Option<MeshId>) -> SelectionChange {
        for record in self.records.values_mut() {
            record.selected = next.as_ref() == Some(&record.id);
        }
        let previous = std::mem::replace(&mut self.selected_id, next.clone());
        debug!(?previous, current = ?next, "selection changed");
        SelectionChange {
            previous,
            current: next,
        }
    }

    pub fn hovered_id(&self) -> Option<&MeshId> {
        self.hovered_id.as_ref()
    }

    /// Set the hovered record. Returns true when the value changed.
    pub fn set_hovered(&mut self, id: Option<MeshId>) -> bool {
        if self.hovered_id == id {
            return false;
        }
        self.hovered_id = id;
        true
    }

    // ------------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------------

    /// Clamp `value` into the field's range and write it to the record.
    ///
    /// Integer fields are rounded first. Returns the value actually stored
    /// (for icosphere `Diameter` this is the diameter view, i.e. twice the
    /// stored radius).
    pub fn set_parameter(&mut self, id: &MeshId, field: ParamField, value: f32) -> Result<f32> {
        let limits = self.limits;
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| EditorError::UnknownMesh(id.clone()))?;
        let kind = record.kind();
        let unsupported = || EditorError::UnsupportedField { kind, field };

        let range = limits.range(kind, field).ok_or_else(unsupported)?;
        let value = if field.is_integer() { value.round() } else { value };
        let applied = range.clamp(value);
        record.parameters = record
            .parameters
            .with(field, applied)
            .ok_or_else(unsupported)?;

        debug!(mesh = %id, field = field.name(), value = applied, "parameter written");
        Ok(applied)
    }

    /// Mesh list rows, in insertion order.
    pub fn entries(&self) -> Vec<MeshListEntry> {
        self.iter()
            .map(|record| MeshListEntry {
                id: record.id.clone(),
                name: record.name.clone(),
                selected: record.selected,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> MeshId {
        MeshId::new(s)
    }

    #[test]
    fn test_demo_store_contents() {
        let store = MeshStore::demo();
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(&id("demoCube")).map(|r| r.kind()), Some(ShapeKind::Cube));
        assert!(!store.get(&id("ground")).map(|r| r.selectable).unwrap_or(true));
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_select_then_select_other() {
        let mut store = MeshStore::demo();
        store.set_selected(&id("demoCube"), true).unwrap();
        let change = store.set_selected(&id("demoCylinder"), true).unwrap();

        assert_eq!(change.previous, Some(id("demoCube")));
        assert_eq!(change.current, Some(id("demoCylinder")));
        assert!(!store.get(&id("demoCube")).unwrap().selected);
        assert!(store.get(&id("demoCylinder")).unwrap().selected);
        assert_eq!(store.selected_count(), 1);
    }

    #[test]
    fn test_deselect_current_leaves_none() {
        let mut store = MeshStore::demo();
        store.set_selected(&id("demoCube"), true).unwrap();
        store.set_selected(&id("demoCube"), false).unwrap();
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_deselect_other_keeps_current() {
        let mut store = MeshStore::demo();
        store.set_selected(&id("demoCube"), true).unwrap();
        let change = store.set_selected(&id("demoIcosphere"), false).unwrap();
        assert!(change.is_noop());
        assert_eq!(store.selected_id(), Some(&id("demoCube")));
    }

    #[test]
    fn test_unknown_id_preserves_state() {
        let mut store = MeshStore::demo();
        store.set_selected(&id("demoCube"), true).unwrap();
        let result = store.set_selected(&id("nope"), true);
        assert!(matches!(result, Err(EditorError::UnknownMesh(_))));
        assert_eq!(store.selected_id(), Some(&id("demoCube")));
    }

    #[test]
    fn test_backdrop_selection_clears() {
        let mut store = MeshStore::demo();
        store.set_selected(&id("demoCube"), true).unwrap();
        store.set_selected(&id("ground"), true).unwrap();
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_toggle_selected() {
        let mut store = MeshStore::demo();
        store.toggle_selected(&id("demoIcosphere")).unwrap();
        assert_eq!(store.selected_id(), Some(&id("demoIcosphere")));
        store.toggle_selected(&id("demoIcosphere")).unwrap();
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_set_parameter_clamps() {
        let mut store = MeshStore::demo();
        let cube = id("demoCube");
        assert_eq!(store.set_parameter(&cube, ParamField::Width, 1.5).unwrap(), 1.5);
        assert_eq!(store.set_parameter(&cube, ParamField::Width, 2.5).unwrap(), 2.0);
        assert_eq!(store.set_parameter(&cube, ParamField::Depth, -3.0).unwrap(), 0.1);
        assert_eq!(
            store.get(&cube).unwrap().parameters,
            ShapeParameters::Cube {
                width: 2.0,
                height: 1.0,
                depth: 0.1
            }
        );
    }

    #[test]
    fn test_set_parameter_rounds_subdivisions() {
        let mut store = MeshStore::demo();
        let sphere = id("demoIcosphere");
        assert_eq!(store.set_parameter(&sphere, ParamField::Subdivisions, 6.4).unwrap(), 6.0);
        assert_eq!(store.set_parameter(&sphere, ParamField::Subdivisions, 42.0).unwrap(), 10.0);
        assert_eq!(
            store.get(&sphere).unwrap().parameters.get(ParamField::Subdivisions),
            Some(10.0)
        );
    }

    #[test]
    fn test_icosphere_diameter_view() {
        let mut store = MeshStore::demo();
        let sphere = id("demoIcosphere");
        store.set_parameter(&sphere, ParamField::Diameter, 1.2).unwrap();
        let params = store.get(&sphere).unwrap().parameters;
        assert!((params.get(ParamField::Radius).unwrap() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_unsupported_field() {
        let mut store = MeshStore::demo();
        let result = store.set_parameter(&id("demoCube"), ParamField::Subdivisions, 3.0);
        assert!(matches!(result, Err(EditorError::UnsupportedField { .. })));
    }

    #[test]
    fn test_update_mesh_keeps_selection_and_clamps() {
        let mut store = MeshStore::demo();
        let cube = id("demoCube");
        store.set_selected(&cube, true).unwrap();
        store
            .update_mesh(&cube, |record| {
                record.selected = false;
                record.parameters = ShapeParameters::Cube {
                    width: 9.0,
                    height: 1.0,
                    depth: 1.0,
                };
            })
            .unwrap();
        let record = store.get(&cube).unwrap();
        assert!(record.selected);
        assert_eq!(record.parameters.get(ParamField::Width), Some(2.0));
    }

    #[test]
    fn test_entries_in_insertion_order() {
        let store = MeshStore::demo();
        let names: Vec<_> = store.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Cube", "IcoSphere", "Cylinder", "Ground"]);
    }

    #[test]
    fn test_attach_and_detach_nodes() {
        let mut store = MeshStore::demo();
        store.attach_mesh(&id("demoCube"), NodeId(7)).unwrap();
        store.attach_mesh(&id("ground"), NodeId(8)).unwrap();
        assert_eq!(store.record_for_node(NodeId(7)).map(|r| r.id.clone()), Some(id("demoCube")));

        store.detach_mesh(&id("demoCube")).unwrap();
        assert!(store.record_for_node(NodeId(7)).is_none());
        store.detach_all();
        assert!(store.iter().all(|r| r.mesh.is_none()));
        assert!(store.detach_mesh(&id("missing")).is_err());
    }
}
