//! Selection Tests - Gizmo Visibility, Highlight and Hover
//!
//! Selection changes from clicks, the mesh list and the API, and what each
//! shape editor, the highlight and the panel do in response.

use glam::Vec3;
use mesh_editor_engine::editor::PointerEvent;
use mesh_editor_engine::gizmo::is_subtree_visible;
use mesh_editor_engine::scene::CursorStyle;
use mesh_editor_engine::{EditorConfig, MeshId, ParamField, SceneGraph, SceneHost, ShapeKind, Viewport};

/// A point inside the fitted width arrow tip of the unit cube, past the end
/// of the width control shaft.
const WIDTH_TIP: Vec3 = Vec3::new(-0.605, 0.0, 0.0);

fn viewport() -> Viewport<SceneGraph> {
    let mut viewport = Viewport::demo(SceneGraph::new(), EditorConfig::default());
    viewport.mount();
    viewport
}

fn click(viewport: &mut Viewport<SceneGraph>, world: Vec3) -> bool {
    let at = viewport.host().project(world).unwrap();
    let down = viewport.pointer_down(PointerEvent::new(1, at));
    viewport.pointer_up(PointerEvent::new(1, at));
    down
}

fn gizmo_group(viewport: &Viewport<SceneGraph>, kind: ShapeKind) -> mesh_editor_engine::scene::NodeId {
    viewport.editor(kind).and_then(|editor| editor.bundle()).unwrap().group
}

fn record_node(viewport: &Viewport<SceneGraph>, id: &str) -> mesh_editor_engine::scene::NodeId {
    viewport.store().get(&MeshId::new(id)).and_then(|r| r.mesh).unwrap()
}

// ============================================================================
// Gizmo visibility follows the selected kind
// ============================================================================

#[test]
fn test_selecting_cube_hides_cylinder_gizmo() {
    let mut viewport = viewport();
    viewport.select(&MeshId::new("demoCylinder")).unwrap();
    let cylinder_group = gizmo_group(&viewport, ShapeKind::Cylinder);
    assert!(is_subtree_visible(viewport.host(), cylinder_group));

    viewport.select(&MeshId::new("demoCube")).unwrap();
    let cube_group = gizmo_group(&viewport, ShapeKind::Cube);
    assert!(!viewport.editor(ShapeKind::Cylinder).unwrap().is_visible());
    assert!(!viewport.host().is_visible(cylinder_group));
    assert!(viewport.editor(ShapeKind::Cube).unwrap().is_visible());
    assert!(is_subtree_visible(viewport.host(), cube_group));

    let cube = record_node(&viewport, "demoCube");
    let at = viewport.host().world_position(cube_group).unwrap();
    assert!((at - viewport.host().world_position(cube).unwrap()).length() < 1e-6);
}

#[test]
fn test_only_matching_editor_is_visible() {
    let mut viewport = viewport();
    for (id, kind) in [
        ("demoCube", ShapeKind::Cube),
        ("demoCylinder", ShapeKind::Cylinder),
        ("demoIcosphere", ShapeKind::IcoSphere),
    ] {
        viewport.select(&MeshId::new(id)).unwrap();
        for other in [ShapeKind::Cube, ShapeKind::Cylinder, ShapeKind::IcoSphere] {
            assert_eq!(viewport.editor(other).unwrap().is_visible(), other == kind);
        }
    }
    viewport.clear_selection();
    for kind in [ShapeKind::Cube, ShapeKind::Cylinder, ShapeKind::IcoSphere] {
        assert!(!viewport.editor(kind).unwrap().is_visible());
    }
}

#[test]
fn test_reselect_resyncs_from_live_bounds() {
    let mut viewport = viewport();
    viewport.select(&MeshId::new("demoCylinder")).unwrap();
    viewport.select(&MeshId::new("demoCube")).unwrap();

    // Move the cylinder while its gizmo is hidden
    let cylinder = record_node(&viewport, "demoCylinder");
    viewport.host_mut().set_position(cylinder, Vec3::new(1.5, 0.5, -1.0));

    viewport.select(&MeshId::new("demoCylinder")).unwrap();
    let group = gizmo_group(&viewport, ShapeKind::Cylinder);
    let at = viewport.host().world_position(group).unwrap();
    assert!((at - Vec3::new(1.5, 0.5, -1.0)).length() < 1e-5);
}

// ============================================================================
// Clicks
// ============================================================================

#[test]
fn test_click_selects_and_highlights() {
    let mut viewport = viewport();
    assert!(click(&mut viewport, Vec3::new(2.0, 0.0, 0.0)));
    assert_eq!(viewport.store().selected_id(), Some(&MeshId::new("demoCylinder")));
    let cylinder = record_node(&viewport, "demoCylinder");
    assert!(viewport.host().is_highlighted(cylinder));

    click(&mut viewport, Vec3::new(-2.0, 0.0, 0.0));
    assert_eq!(viewport.store().selected_id(), Some(&MeshId::new("demoIcosphere")));
    assert_eq!(viewport.store().selected_count(), 1);
    assert!(!viewport.host().is_highlighted(cylinder));
    assert!(viewport.panel().is_shown());
    assert_eq!(viewport.panel().value(ParamField::Subdivisions), Some(4.0));
}

#[test]
fn test_click_on_ground_clears_selection() {
    let mut viewport = viewport();
    viewport.select(&MeshId::new("demoCube")).unwrap();
    click(&mut viewport, Vec3::new(0.0, -1.5, 3.0));
    assert_eq!(viewport.store().selected_id(), None);
    assert_eq!(viewport.store().selected_count(), 0);
    assert!(!viewport.editor(ShapeKind::Cube).unwrap().is_visible());
    assert!(!viewport.panel().is_shown());
}

#[test]
fn test_click_on_visible_tip_keeps_selection() {
    let mut viewport = viewport();
    viewport.select(&MeshId::new("demoCube")).unwrap();
    // Not a handle, and gizmo geometry never changes the selection
    assert!(!click(&mut viewport, WIDTH_TIP));
    assert_eq!(viewport.store().selected_id(), Some(&MeshId::new("demoCube")));
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn test_hover_cursor_over_gizmo() {
    let mut viewport = viewport();
    viewport.select(&MeshId::new("demoCube")).unwrap();
    let at = viewport.host().project(WIDTH_TIP).unwrap();
    viewport.pointer_move(PointerEvent::new(1, at));
    assert_eq!(viewport.host().cursor(), CursorStyle::Pointer);

    let at = viewport.host().project(Vec3::new(2.0, 0.0, 0.0)).unwrap();
    viewport.pointer_move(PointerEvent::new(1, at));
    assert_eq!(viewport.host().cursor(), CursorStyle::Default);
    assert_eq!(viewport.store().hovered_id(), Some(&MeshId::new("demoCylinder")));
}
