//! Mesh Editor Demo
//!
//! Headless scripted session over the in-memory scene graph: mount the demo
//! shapes, select the cube, drag its width handle, edit the cylinder from
//! the panel, step the icosphere's subdivisions and run a bounce preview.
//!
//! Run with: `cargo run --bin mesh_editor_demo`
//! Optional: `cargo run --bin mesh_editor_demo -- path/to/config.json`
//! Log level: `RUST_LOG=debug cargo run --bin mesh_editor_demo`

use std::path::Path;

use glam::{Vec2, Vec3};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mesh_editor_engine::editor::PointerEvent;
use mesh_editor_engine::{EditorConfig, MeshId, ParamField, SceneGraph, SceneHost, ShapeKind, Viewport};

const POINTER: i32 = 1;
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EditorConfig::load(Path::new(&path)).unwrap_or_else(|err| {
            warn!("could not load {path}: {err}, using defaults");
            EditorConfig::default()
        }),
        None => EditorConfig::default(),
    };

    let mut viewport = Viewport::demo(SceneGraph::new(), config);
    viewport.mount();

    drag_cube_width(&mut viewport);
    edit_cylinder(&mut viewport);
    step_icosphere(&mut viewport);
    bounce(&mut viewport);

    for entry in viewport.mesh_list() {
        if let Some(record) = viewport.store().get(&entry.id) {
            info!(id = %entry.id, selected = entry.selected, parameters = ?record.parameters, "final");
        }
    }
    viewport.unmount();
}

fn screen(viewport: &Viewport<SceneGraph>, world: Vec3) -> Option<Vec2> {
    viewport.host().project(world)
}

/// Select the cube by clicking it, then drag the width arrow outward.
fn drag_cube_width(viewport: &mut Viewport<SceneGraph>) {
    let Some(at) = screen(viewport, Vec3::ZERO) else { return };
    viewport.pointer_down(PointerEvent::new(POINTER, at));
    viewport.pointer_up(PointerEvent::new(POINTER, at));
    info!(selected = ?viewport.store().selected_id(), "clicked the cube");

    // The width arrow runs along -X from the cube's center
    let (Some(start), Some(end)) = (
        screen(viewport, Vec3::new(-0.3, 0.0, 0.0)),
        screen(viewport, Vec3::new(-0.8, 0.0, 0.0)),
    ) else {
        return;
    };
    if !viewport.pointer_down(PointerEvent::new(POINTER, start)) {
        warn!("width handle not hit");
        return;
    }
    for i in 1..=10 {
        let t = i as f32 / 10.0;
        viewport.pointer_move(PointerEvent::new(POINTER, start.lerp(end, t)));
    }
    viewport.pointer_up(PointerEvent::new(POINTER, end));

    let cube = MeshId::new("demoCube");
    let width = viewport
        .store()
        .get(&cube)
        .and_then(|record| record.parameters.get(ParamField::Width));
    let dragging = viewport
        .editor(ShapeKind::Cube)
        .is_some_and(|editor| editor.is_dragging());
    info!(?width, dragging, "width drag done");
}

/// Pick the cylinder from the mesh list and set its height from the panel.
fn edit_cylinder(viewport: &mut Viewport<SceneGraph>) {
    if let Err(err) = viewport.toggle_selected(&MeshId::new("demoCylinder")) {
        warn!("{err}");
        return;
    }
    match viewport.edit_parameter(ParamField::Height, 5.0) {
        Ok(height) => info!(height, "cylinder height set from the panel (clamped)"),
        Err(err) => warn!("{err}"),
    }
}

/// Click the icosphere's top arrow tip twice.
fn step_icosphere(viewport: &mut Viewport<SceneGraph>) {
    if let Err(err) = viewport.select(&MeshId::new("demoIcosphere")) {
        warn!("{err}");
        return;
    }
    let Some(tip) = viewport
        .editor(ShapeKind::IcoSphere)
        .and_then(|editor| editor.bundle())
        .and_then(|bundle| bundle.part("arrowTipTop"))
    else {
        return;
    };
    let Some(at) = viewport
        .host()
        .world_position(tip)
        .and_then(|world| screen(viewport, world))
    else {
        return;
    };
    for _ in 0..2 {
        viewport.pointer_down(PointerEvent::new(POINTER, at));
        viewport.pointer_up(PointerEvent::new(POINTER, at));
    }
    let subdivisions = viewport
        .store()
        .get(&MeshId::new("demoIcosphere"))
        .and_then(|record| record.parameters.get(ParamField::Subdivisions));
    info!(?subdivisions, "icosphere stepped");
}

/// Bounce the selected shape and play the clip to the end.
fn bounce(viewport: &mut Viewport<SceneGraph>) {
    let duration = match viewport.run_bounce() {
        Ok(duration) => duration,
        Err(err) => {
            warn!("{err}");
            return;
        }
    };
    let frames = (duration / FRAME_DT).ceil() as u32 + 1;
    for _ in 0..frames {
        viewport.advance(FRAME_DT);
    }
    info!(duration, frames, "bounce played");
}
