//! Property Panel
//!
//! Model behind the selected record's property sheet: a parameter folder with
//! one slider per editable field, position/rotation/scaling folders bound to
//! the node transform and an animation folder that runs the bounce preview.
//!
//! The panel is the second writer of shape parameters next to the gizmos.
//! Both write through `EditorContext::write_parameter`; the panel listens on
//! the property bus for its record so a gizmo drag updates the displayed
//! value (and opens the parameter folder).

use std::collections::BTreeSet;

use glam::Vec3;
use tracing::{debug, trace};

use crate::animation::apply_bouncing;
use crate::config::{BounceSettings, EditorConfig, PanelRanges, ParamRange};
use crate::editor::EditorContext;
use crate::error::{EditorError, Result};
use crate::scene::{NodeId, SceneHost, Transform};
use crate::store::{
    ChangeSource, MeshId, MeshStore, ParamField, PropertyBus, PropertyFilter, ShapeKind, SubscriptionId,
};

/// Collapsible sections of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PanelFolder {
    Position,
    Rotation,
    Scaling,
    Parameters,
    Animation,
}

/// One parameter slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelField {
    pub label: &'static str,
    pub field: ParamField,
    pub range: ParamRange,
    /// Slider increment, `None` for continuous
    pub step: Option<f32>,
    pub value: f32,
}

/// Sliders of the animation folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationSetting {
    Amplitude,
    Duration,
    Cor,
    Gravity,
}

/// Folder title and fields shown for a shape kind. The icosphere size is
/// shown as a diameter and stored as half of it.
pub fn parameter_layout(kind: ShapeKind) -> Option<(&'static str, &'static [(&'static str, ParamField)])> {
    match kind {
        ShapeKind::Cube => Some((
            "Cube parameters",
            &[
                ("width", ParamField::Width),
                ("height", ParamField::Height),
                ("depth", ParamField::Depth),
            ],
        )),
        ShapeKind::Cylinder => Some((
            "Cylinder parameters",
            &[("diameter", ParamField::Diameter), ("height", ParamField::Height)],
        )),
        ShapeKind::IcoSphere => Some((
            "IcoSphere parameters",
            &[
                ("diameter", ParamField::Diameter),
                ("subdivisions", ParamField::Subdivisions),
            ],
        )),
        ShapeKind::Plane => None,
    }
}

/// The property sheet of the selected record.
#[derive(Debug)]
pub struct PropertyPanel {
    record: Option<MeshId>,
    node: Option<NodeId>,
    title: Option<&'static str>,
    fields: Vec<PanelField>,
    transform: Transform,
    open: BTreeSet<PanelFolder>,
    animation: BounceSettings,
    ranges: PanelRanges,
    subscription: Option<SubscriptionId>,
}

impl PropertyPanel {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            record: None,
            node: None,
            title: None,
            fields: Vec::new(),
            transform: Transform::default(),
            open: BTreeSet::new(),
            animation: config.bounce,
            ranges: config.panel,
            subscription: None,
        }
    }

    /// Rebuild the panel for the store's current selection. Hidden when
    /// nothing is selected or the record has no node yet.
    pub fn show_selected(&mut self, host: &dyn SceneHost, store: &MeshStore, bus: &mut PropertyBus) {
        self.hide(bus);
        let Some(record) = store.selected() else { return };
        let Some(node) = record.mesh else {
            trace!(record = %record.id, "selected record not attached, panel stays hidden");
            return;
        };

        let kind = record.kind();
        if let Some((title, layout)) = parameter_layout(kind) {
            self.title = Some(title);
            self.fields = layout
                .iter()
                .filter_map(|&(label, field)| {
                    Some(PanelField {
                        label,
                        field,
                        range: store.limits().range(kind, field)?,
                        step: field.is_integer().then_some(1.0),
                        value: record.parameters.get(field)?,
                    })
                })
                .collect();
            self.open.insert(PanelFolder::Parameters);
        }
        self.open.insert(PanelFolder::Animation);
        self.transform = host.transform(node).unwrap_or_default();
        self.subscription = Some(bus.subscribe(PropertyFilter::record(record.id.clone())));
        self.record = Some(record.id.clone());
        self.node = Some(node);
        debug!(record = %record.id, fields = self.fields.len(), "panel shown");
    }

    /// Close the panel and drop its bus subscription.
    pub fn hide(&mut self, bus: &mut PropertyBus) {
        if let Some(subscription) = self.subscription.take() {
            bus.unsubscribe(subscription);
        }
        self.record = None;
        self.node = None;
        self.title = None;
        self.fields.clear();
        self.open.clear();
    }

    pub fn is_shown(&self) -> bool {
        self.record.is_some()
    }

    pub fn record(&self) -> Option<&MeshId> {
        self.record.as_ref()
    }

    pub fn title(&self) -> Option<&'static str> {
        self.title
    }

    pub fn fields(&self) -> &[PanelField] {
        &self.fields
    }

    /// Displayed value of a parameter slider.
    pub fn value(&self, field: ParamField) -> Option<f32> {
        self.fields.iter().find(|f| f.field == field).map(|f| f.value)
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn is_open(&self, folder: PanelFolder) -> bool {
        self.open.contains(&folder)
    }

    pub fn set_open(&mut self, folder: PanelFolder, open: bool) {
        if open {
            self.open.insert(folder);
        } else {
            self.open.remove(&folder);
        }
    }

    /// Apply queued changes for the shown record. Returns how many arrived.
    pub fn sync(&mut self, bus: &mut PropertyBus) -> usize {
        let Some(subscription) = self.subscription else { return 0 };
        let changes = bus.drain(subscription);
        for change in &changes {
            if let Some(slot) = self.fields.iter_mut().find(|f| f.field == change.field) {
                slot.value = change.value;
            }
            if change.source == ChangeSource::Gizmo {
                self.open.insert(PanelFolder::Parameters);
            }
        }
        changes.len()
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Slider edit of a shape parameter. Returns the stored value.
    pub fn edit_parameter(&mut self, ctx: &mut EditorContext<'_>, field: ParamField, value: f32) -> Result<f32> {
        let Some(record) = self.record.clone() else {
            return Err(EditorError::NothingSelected);
        };
        let applied = ctx.write_parameter(&record, field, value, ChangeSource::Panel)?;
        if let Some(slot) = self.fields.iter_mut().find(|f| f.field == field) {
            slot.value = applied;
        }
        Ok(applied)
    }

    pub fn set_position(&mut self, host: &mut dyn SceneHost, position: Vec3) -> Option<Vec3> {
        let position = clamp_vec(position, self.ranges.position);
        self.transform.position = position;
        host.set_position(self.node?, position);
        Some(position)
    }

    pub fn set_rotation(&mut self, host: &mut dyn SceneHost, rotation: Vec3) -> Option<Vec3> {
        let rotation = clamp_vec(rotation, self.ranges.rotation);
        self.transform.rotation = rotation;
        host.set_rotation(self.node?, rotation);
        Some(rotation)
    }

    pub fn set_scaling(&mut self, host: &mut dyn SceneHost, scaling: Vec3) -> Option<Vec3> {
        let scaling = clamp_vec(scaling, self.ranges.scaling);
        self.transform.scaling = scaling;
        host.set_scaling(self.node?, scaling);
        Some(scaling)
    }

    // ------------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------------

    pub fn animation(&self) -> &BounceSettings {
        &self.animation
    }

    /// Set an animation slider, clamped to its range. Returns the stored value.
    pub fn set_animation(&mut self, setting: AnimationSetting, value: f32) -> f32 {
        let ranges = self.ranges;
        let (slot, range) = match setting {
            AnimationSetting::Amplitude => (&mut self.animation.amplitude, ranges.amplitude),
            AnimationSetting::Duration => (&mut self.animation.duration, ranges.duration),
            AnimationSetting::Cor => (&mut self.animation.cor, ranges.cor),
            AnimationSetting::Gravity => (&mut self.animation.gravity, ranges.gravity),
        };
        *slot = range.clamp(value);
        *slot
    }

    pub fn set_use_duration(&mut self, use_duration: bool) {
        self.animation.use_duration = use_duration;
    }

    /// "Run animation": bounce the shown record's node. Returns the clip
    /// length in seconds.
    pub fn run_animation(&self, host: &mut dyn SceneHost) -> Option<f32> {
        apply_bouncing(host, self.node?, &self.animation)
    }
}

fn clamp_vec(value: Vec3, range: ParamRange) -> Vec3 {
    Vec3::new(range.clamp(value.x), range.clamp(value.y), range.clamp(value.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;

    struct Fixture {
        scene: SceneGraph,
        store: MeshStore,
        bus: PropertyBus,
        config: EditorConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let mut scene = SceneGraph::new();
            let mut store = MeshStore::demo();
            for record in store.snapshot() {
                let node = scene.create_primitive(record.id.as_str(), &record.parameters.primitive());
                store.attach_mesh(&record.id, node).unwrap();
            }
            Self {
                scene,
                store,
                bus: PropertyBus::new(),
                config: EditorConfig::default(),
            }
        }

        fn select(&mut self, id: &str, panel: &mut PropertyPanel) {
            self.store.set_selected(&MeshId::new(id), true).unwrap();
            panel.show_selected(&self.scene, &self.store, &mut self.bus);
        }

        fn ctx(&mut self) -> EditorContext<'_> {
            EditorContext {
                host: &mut self.scene,
                store: &mut self.store,
                bus: &mut self.bus,
                config: &self.config,
            }
        }
    }

    #[test]
    fn test_icosphere_fields_show_diameter() {
        let mut fx = Fixture::new();
        let mut panel = PropertyPanel::new(&fx.config);
        fx.select("demoIcosphere", &mut panel);

        assert_eq!(panel.title(), Some("IcoSphere parameters"));
        let labels: Vec<_> = panel.fields().iter().map(|f| f.label).collect();
        assert_eq!(labels, vec!["diameter", "subdivisions"]);
        assert_eq!(panel.value(ParamField::Diameter), Some(2.0));
        assert_eq!(panel.fields()[1].step, Some(1.0));

        // Written back as half the slider value
        let applied = panel.edit_parameter(&mut fx.ctx(), ParamField::Diameter, 1.0).unwrap();
        assert_eq!(applied, 1.0);
        let radius = fx.store.get(&MeshId::new("demoIcosphere")).and_then(|r| r.parameters.get(ParamField::Radius));
        assert_eq!(radius, Some(0.5));
    }

    #[test]
    fn test_gizmo_change_updates_value_and_opens_folder() {
        let mut fx = Fixture::new();
        let mut panel = PropertyPanel::new(&fx.config);
        fx.select("demoCube", &mut panel);
        panel.set_open(PanelFolder::Parameters, false);

        fx.ctx()
            .write_parameter(&MeshId::new("demoCube"), ParamField::Width, 1.5, ChangeSource::Gizmo)
            .unwrap();
        fx.ctx()
            .write_parameter(&MeshId::new("demoCylinder"), ParamField::Height, 1.0, ChangeSource::Gizmo)
            .unwrap();
        assert_eq!(panel.sync(&mut fx.bus), 1);
        assert_eq!(panel.value(ParamField::Width), Some(1.5));
        assert!(panel.is_open(PanelFolder::Parameters));
    }

    #[test]
    fn test_hide_unsubscribes() {
        let mut fx = Fixture::new();
        let mut panel = PropertyPanel::new(&fx.config);
        fx.select("demoCube", &mut panel);
        assert_eq!(fx.bus.subscription_count(), 1);
        fx.select("demoCylinder", &mut panel);
        assert_eq!(fx.bus.subscription_count(), 1);
        panel.hide(&mut fx.bus);
        assert_eq!(fx.bus.subscription_count(), 0);
        assert!(panel.edit_parameter(&mut fx.ctx(), ParamField::Width, 1.0).is_err());
    }

    #[test]
    fn test_transform_and_animation_sliders_clamp() {
        let mut fx = Fixture::new();
        let mut panel = PropertyPanel::new(&fx.config);
        fx.select("demoCube", &mut panel);

        let position = panel.set_position(&mut fx.scene, Vec3::new(10.0, 0.5, -10.0)).unwrap();
        assert_eq!(position, Vec3::new(4.0, 0.5, -4.0));
        let node = fx.store.selected().and_then(|r| r.mesh).unwrap();
        assert_eq!(fx.scene.transform(node).map(|t| t.position), Some(position));
        assert_eq!(panel.set_scaling(&mut fx.scene, Vec3::ZERO), Some(Vec3::splat(0.1)));

        assert_eq!(panel.set_animation(AnimationSetting::Cor, 1.5), 1.0);
        assert_eq!(panel.set_animation(AnimationSetting::Gravity, 0.0), -1.0);
        assert_eq!(panel.set_animation(AnimationSetting::Amplitude, 2.0), 2.0);
    }

    #[test]
    fn test_run_animation_bounces_selected_node() {
        let mut fx = Fixture::new();
        let mut panel = PropertyPanel::new(&fx.config);
        assert!(panel.run_animation(&mut fx.scene).is_none());

        fx.select("demoCube", &mut panel);
        let duration = panel.run_animation(&mut fx.scene).unwrap();
        assert!((duration - fx.config.bounce.duration).abs() < 1.0 / 60.0);
        let node = fx.store.selected().and_then(|r| r.mesh).unwrap();
        assert!(fx.scene.is_animating(node));
    }
}
