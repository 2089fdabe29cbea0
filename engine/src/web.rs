//! Browser Bindings
//!
//! `WebEditor` exposes the viewport over the in-memory scene graph to
//! JavaScript: the page forwards canvas pointer events and calls `frame`
//! from `requestAnimationFrame`. Only built for `wasm32`.

use glam::{Vec2, Vec3};
use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::editor::PointerEvent;
use crate::scene::{CursorStyle, SceneGraph};
use crate::store::{MeshId, ParamField};
use crate::viewport::Viewport;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
}

fn field_from_name(name: &str) -> Option<ParamField> {
    match name {
        "width" => Some(ParamField::Width),
        "height" => Some(ParamField::Height),
        "depth" => Some(ParamField::Depth),
        "diameter" => Some(ParamField::Diameter),
        "radius" => Some(ParamField::Radius),
        "subdivisions" => Some(ParamField::Subdivisions),
        _ => None,
    }
}

/// The editor as seen from the page.
#[wasm_bindgen]
pub struct WebEditor {
    viewport: Viewport<SceneGraph>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Demo scene with the default config, sized to the canvas.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebEditor {
        let mut scene = SceneGraph::new();
        scene.camera_mut().set_viewport(width, height);
        let mut viewport = Viewport::demo(scene, EditorConfig::default());
        viewport.mount();
        WebEditor { viewport }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.host_mut().camera_mut().set_viewport(width, height);
    }

    pub fn pointer_down(&mut self, pointer_id: i32, x: f32, y: f32) -> bool {
        self.viewport.pointer_down(PointerEvent::new(pointer_id, Vec2::new(x, y)))
    }

    pub fn pointer_move(&mut self, pointer_id: i32, x: f32, y: f32) -> bool {
        self.viewport.pointer_move(PointerEvent::new(pointer_id, Vec2::new(x, y)))
    }

    pub fn pointer_up(&mut self, pointer_id: i32, x: f32, y: f32) -> bool {
        self.viewport.pointer_up(PointerEvent::new(pointer_id, Vec2::new(x, y)))
    }

    /// CSS cursor for the canvas.
    pub fn cursor(&self) -> String {
        match self.viewport.host().cursor() {
            CursorStyle::Default => "default".to_string(),
            CursorStyle::Pointer => "pointer".to_string(),
        }
    }

    /// Mesh list click.
    pub fn toggle_selected(&mut self, id: &str) -> bool {
        self.viewport.toggle_selected(&MeshId::new(id)).is_ok()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.viewport.store().selected_id().map(|id| id.as_str().to_string())
    }

    /// Mesh list rows as JSON.
    pub fn mesh_list(&self) -> Result<String, JsValue> {
        let rows: Vec<_> = self
            .viewport
            .mesh_list()
            .into_iter()
            .map(|entry| (entry.id.as_str().to_string(), entry.name, entry.selected))
            .collect();
        serde_json::to_string(&rows).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Panel slider edit. Returns the stored value.
    pub fn edit_parameter(&mut self, field: &str, value: f32) -> Result<f32, JsValue> {
        let field = field_from_name(field).ok_or_else(|| JsValue::from_str("unknown field"))?;
        self.viewport
            .edit_parameter(field, value)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.viewport.set_position(Vec3::new(x, y, z));
    }

    /// "Run animation". Returns the clip length in seconds.
    pub fn run_bounce(&mut self) -> Result<f32, JsValue> {
        self.viewport.run_bounce().map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Per-frame hook, `dt` in seconds.
    pub fn frame(&mut self, dt: f32) {
        self.viewport.advance(dt);
    }
}
