//! Property Tests - Clamping, Single Selection and the Bounce Curve
//!
//! Invariants that hold for any input, checked with proptest.

use mesh_editor_engine::animation::bounce::simulate_bounce;
use mesh_editor_engine::config::{BounceSettings, ParamRange};
use mesh_editor_engine::editor::drag::{AxisConstraint, drag_value};
use mesh_editor_engine::{MeshId, MeshStore, ParamField};
use proptest::prelude::*;

const IDS: [&str; 5] = ["demoCube", "demoCylinder", "demoIcosphere", "ground", "ghost"];

const FIELDS: [ParamField; 6] = [
    ParamField::Width,
    ParamField::Height,
    ParamField::Depth,
    ParamField::Diameter,
    ParamField::Radius,
    ParamField::Subdivisions,
];

#[derive(Clone, Debug)]
enum SelectionOp {
    Select(usize),
    Deselect(usize),
    Toggle(usize),
    Clear,
}

fn selection_op() -> impl Strategy<Value = SelectionOp> {
    prop_oneof![
        (0..IDS.len()).prop_map(SelectionOp::Select),
        (0..IDS.len()).prop_map(SelectionOp::Deselect),
        (0..IDS.len()).prop_map(SelectionOp::Toggle),
        Just(SelectionOp::Clear),
    ]
}

// ============================================================================
// Drag values
// ============================================================================

proptest! {
    #[test]
    fn prop_drag_value_stays_in_range(
        start in 0.1f32..2.0,
        initial in -5.0f32..5.0,
        current in -5.0f32..5.0,
        center in -5.0f32..5.0,
        multiplier in 0.1f32..10.0,
    ) {
        let range = ParamRange::new(0.1, 2.0);
        let constraint = AxisConstraint { range, multiplier, integer: false };
        let value = drag_value(start, initial, current, center, &constraint);
        prop_assert!(range.contains(value));
    }

    #[test]
    fn prop_stepped_drag_is_whole(
        start in 1u32..=10,
        initial in -5.0f32..5.0,
        current in -5.0f32..5.0,
        center in -5.0f32..5.0,
    ) {
        let range = ParamRange::new(1.0, 10.0);
        let constraint = AxisConstraint::stepped(range, 10.0);
        let value = drag_value(start as f32, initial, current, center, &constraint);
        prop_assert!(range.contains(value));
        prop_assert_eq!(value.fract(), 0.0);
    }

    #[test]
    fn prop_inward_drag_never_grows(
        start in 0.1f32..2.0,
        side in 0.05f32..5.0,
        near in 0.0f32..1.0,
        far in 0.0f32..1.0,
        negative in any::<bool>(),
    ) {
        // Two pointer positions past the start toward and beyond the center
        let sign = if negative { -1.0 } else { 1.0 };
        let initial = sign * side;
        let (a, b) = if near <= far { (near, far) } else { (far, near) };
        let first = initial - sign * a * 2.0 * side;
        let second = initial - sign * b * 2.0 * side;
        let constraint = AxisConstraint::continuous(ParamRange::new(0.1, 2.0));
        let v1 = drag_value(start, initial, first, 0.0, &constraint);
        let v2 = drag_value(start, initial, second, 0.0, &constraint);
        prop_assert!(v1 <= start);
        prop_assert!(v2 <= v1);
    }

    #[test]
    fn prop_drag_without_motion_keeps_value(
        start in 0.1f32..2.0,
        at in -5.0f32..5.0,
        center in -5.0f32..5.0,
    ) {
        let constraint = AxisConstraint::continuous(ParamRange::new(0.1, 2.0));
        prop_assert_eq!(drag_value(start, at, at, center, &constraint), start);
    }
}

// ============================================================================
// Store
// ============================================================================

proptest! {
    #[test]
    fn prop_set_parameter_respects_limits(
        id in 0..IDS.len(),
        field in 0..FIELDS.len(),
        value in -100.0f32..100.0,
    ) {
        let mut store = MeshStore::demo();
        let id = MeshId::new(IDS[id]);
        let field = FIELDS[field];
        if let Ok(applied) = store.set_parameter(&id, field, value) {
            let record = store.get(&id).unwrap();
            let range = store.limits().range(record.kind(), field).unwrap();
            prop_assert!(range.contains(applied));
            if field.is_integer() {
                prop_assert_eq!(applied.fract(), 0.0);
            }
            let stored = record.parameters.get(field).unwrap();
            prop_assert!((stored - applied).abs() < 1e-5);
        }
    }

    #[test]
    fn prop_at_most_one_selected(ops in prop::collection::vec(selection_op(), 0..40)) {
        let mut store = MeshStore::demo();
        for op in ops {
            // Unknown ids are rejected and leave the state alone
            let _ = match op {
                SelectionOp::Select(i) => store.set_selected(&MeshId::new(IDS[i]), true).map(|_| ()),
                SelectionOp::Deselect(i) => store.set_selected(&MeshId::new(IDS[i]), false).map(|_| ()),
                SelectionOp::Toggle(i) => store.toggle_selected(&MeshId::new(IDS[i])).map(|_| ()),
                SelectionOp::Clear => {
                    store.clear_selection();
                    Ok(())
                }
            };
            prop_assert!(store.selected_count() <= 1);
            match store.selected_id() {
                Some(id) => {
                    prop_assert_eq!(store.selected_count(), 1);
                    prop_assert!(store.get(id).unwrap().selected);
                }
                None => prop_assert_eq!(store.selected_count(), 0),
            }
        }
    }
}

// ============================================================================
// Bounce
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_bounce_never_sinks_and_peaks_decay(
        contact in -2.0f32..2.0,
        amplitude in 0.1f32..10.0,
        cor in 0.1f32..0.8,
        gravity in -20.0f32..-1.0,
    ) {
        let settings = BounceSettings {
            amplitude,
            cor,
            gravity,
            use_duration: false,
            ..BounceSettings::default()
        };
        let simulation = simulate_bounce(contact, amplitude, &settings);
        let values: Vec<f32> = simulation.keyframes.iter().map(|k| k.value).collect();

        prop_assert!(values.iter().all(|&v| v >= contact - 1e-4));
        prop_assert!(simulation.keyframes.windows(2).all(|w| w[0].frame < w[1].frame));

        let mut last_peak = values[0];
        for w in values.windows(3) {
            if w[1] > w[0] && w[1] >= w[2] {
                prop_assert!(w[1] <= last_peak + 1e-2);
                last_peak = w[1];
            }
        }
    }

    #[test]
    fn prop_locked_duration_is_exact(
        duration in 0.5f32..10.0,
        amplitude in 0.5f32..10.0,
    ) {
        let settings = BounceSettings {
            duration,
            amplitude,
            use_duration: true,
            ..BounceSettings::default()
        };
        let simulation = simulate_bounce(0.0, amplitude, &settings);
        let last = simulation.keyframes.last().unwrap();
        let seconds = last.frame / settings.frame_rate;
        prop_assert!((seconds - duration).abs() < 1e-3 * duration.max(1.0));
    }
}
