//! Viewport Module
//!
//! Owns the scene host, the mesh store, the property bus, the selection
//! controller, one shape editor per editable kind and the property panel.
//! Pointer events enter here and are routed in a fixed order: shape editors
//! first (their multi-hit pass reaches handles hidden inside solid meshes),
//! then the primary-pick selection. `frame` is the per-frame hook.
//!
//! Every selection change, wherever it comes from (click, mesh list, API),
//! goes through `selection_changed` so the gizmos, the highlight and the
//! panel switch in the same update.

use glam::Vec3;
use tracing::{info, warn};

use crate::config::EditorConfig;
use crate::editor::{EditorContext, PointerEvent, ShapeController, default_controllers};
use crate::error::{EditorError, Result};
use crate::panel::PropertyPanel;
use crate::scene::{RenderFlags, SceneGraph, SceneHost};
use crate::selection::SelectionController;
use crate::store::{MeshId, MeshListEntry, MeshStore, ParamField, PropertyBus, SelectionChange, ShapeKind};

/// The editor viewport over a scene host.
pub struct Viewport<H: SceneHost> {
    // -- Collaborators --
    host: H,
    store: MeshStore,
    bus: PropertyBus,
    config: EditorConfig,

    // -- Controllers --
    selection: SelectionController,
    editors: Vec<Box<dyn ShapeController>>,
    panel: PropertyPanel,

    mounted: bool,
}

impl<H: SceneHost> Viewport<H> {
    pub fn new(host: H, store: MeshStore, config: EditorConfig) -> Self {
        let panel = PropertyPanel::new(&config);
        Self {
            host,
            store,
            bus: PropertyBus::new(),
            config,
            selection: SelectionController::new(),
            editors: default_controllers(),
            panel,
            mounted: false,
        }
    }

    /// The demo shapes over `host`, with store limits taken from `config`.
    pub fn demo(host: H, config: EditorConfig) -> Self {
        let store = MeshStore::demo_with_limits(config.limits);
        Self::new(host, store, config)
    }

    fn split(&mut self) -> (EditorContext<'_>, &mut [Box<dyn ShapeController>]) {
        let Self {
            host,
            store,
            bus,
            config,
            editors,
            ..
        } = self;
        let ctx = EditorContext {
            host,
            store,
            bus,
            config,
        };
        (ctx, editors.as_mut_slice())
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Create a node for every record and build the (hidden) gizmos.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        for record in self.store.snapshot() {
            if record.mesh.is_some() {
                continue;
            }
            let node = self.host.create_primitive(record.id.as_str(), &record.parameters.primitive());
            // Initial placement is applied once, at creation
            if let Some(rotation) = record.rotation {
                self.host.set_rotation(node, rotation);
            }
            if let Some(position) = record.position {
                self.host.set_position(node, position);
            }
            self.host.set_render_flags(
                node,
                RenderFlags {
                    cast_shadow: record.cast_shadow,
                    ..RenderFlags::default()
                },
            );
            self.host.set_pickable(node, true);
            if let Err(err) = self.store.attach_mesh(&record.id, node) {
                warn!("failed to attach mesh: {err}");
            }
        }
        for editor in &mut self.editors {
            editor.mount(&mut self.host, &self.config);
        }
        self.mounted = true;
        info!(meshes = self.store.len(), editors = self.editors.len(), "viewport mounted");

        // A selection made before mounting shows up now
        if self.store.selected_id().is_some() {
            self.selection_changed();
        }
    }

    /// Dispose the gizmos and every record node.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        for editor in &mut self.editors {
            editor.unmount(&mut self.host);
        }
        self.panel.hide(&mut self.bus);
        self.selection.reset(&mut self.host);
        for record in self.store.iter() {
            if let Some(node) = record.mesh {
                self.host.dispose(node);
            }
        }
        self.store.detach_all();
        self.mounted = false;
        info!("viewport unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // ------------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------------

    /// Returns true when a gizmo consumed the event or the selection changed.
    pub fn pointer_down(&mut self, event: PointerEvent) -> bool {
        if !self.mounted {
            return false;
        }
        let consumed = {
            let (mut ctx, editors) = self.split();
            editors.iter_mut().any(|editor| editor.pointer_down(&mut ctx, &event))
        };
        if consumed {
            self.panel.sync(&mut self.bus);
            return true;
        }

        match self.selection.pointer_down(&mut self.host, &mut self.store, event.screen) {
            Some(change) if !change.is_noop() => {
                self.selection_changed();
                true
            }
            _ => false,
        }
    }

    /// Drag motion when a gizmo drag is active, hover feedback otherwise.
    pub fn pointer_move(&mut self, event: PointerEvent) -> bool {
        if !self.mounted {
            return false;
        }
        let dragged = {
            let (mut ctx, editors) = self.split();
            editors.iter_mut().any(|editor| editor.pointer_move(&mut ctx, &event))
        };
        if dragged {
            self.panel.sync(&mut self.bus);
            return true;
        }
        self.selection.pointer_move(&mut self.host, &mut self.store, event.screen)
    }

    pub fn pointer_up(&mut self, event: PointerEvent) -> bool {
        if !self.mounted {
            return false;
        }
        let (mut ctx, editors) = self.split();
        editors.iter_mut().any(|editor| editor.pointer_up(&mut ctx, &event))
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Select a record by id (mesh list, API).
    pub fn select(&mut self, id: &MeshId) -> Result<SelectionChange> {
        let change = self.store.set_selected(id, true)?;
        self.selection_changed();
        Ok(change)
    }

    /// Mesh list click: flip one record's selection.
    pub fn toggle_selected(&mut self, id: &MeshId) -> Result<SelectionChange> {
        let change = self.store.toggle_selected(id).inspect_err(|err| warn!("{err}"))?;
        self.selection_changed();
        Ok(change)
    }

    pub fn clear_selection(&mut self) -> SelectionChange {
        let change = self.store.clear_selection();
        self.selection_changed();
        change
    }

    fn selection_changed(&mut self) {
        if self.mounted {
            let (mut ctx, editors) = self.split();
            for editor in editors.iter_mut() {
                editor.on_selection_changed(&mut ctx);
            }
        }
        self.selection.sync_highlight(&mut self.host, &self.store);
        self.panel.show_selected(&self.host, &self.store, &mut self.bus);
    }

    // ------------------------------------------------------------------------
    // Panel edits
    // ------------------------------------------------------------------------

    /// Panel slider edit of the selected record's parameter.
    pub fn edit_parameter(&mut self, field: ParamField, value: f32) -> Result<f32> {
        let applied = {
            let Self {
                host,
                store,
                bus,
                config,
                panel,
                ..
            } = self;
            let mut ctx = EditorContext {
                host,
                store,
                bus,
                config,
            };
            panel.edit_parameter(&mut ctx, field, value)?
        };
        self.resync_editors();
        self.panel.sync(&mut self.bus);
        Ok(applied)
    }

    pub fn set_position(&mut self, position: Vec3) -> Option<Vec3> {
        let applied = self.panel.set_position(&mut self.host, position);
        self.resync_editors();
        applied
    }

    pub fn set_rotation(&mut self, rotation: Vec3) -> Option<Vec3> {
        let applied = self.panel.set_rotation(&mut self.host, rotation);
        self.resync_editors();
        applied
    }

    pub fn set_scaling(&mut self, scaling: Vec3) -> Option<Vec3> {
        let applied = self.panel.set_scaling(&mut self.host, scaling);
        self.resync_editors();
        applied
    }

    /// "Run animation" on the selected record, with the panel's settings.
    pub fn run_bounce(&mut self) -> Result<f32> {
        let record = self.store.selected().ok_or(EditorError::NothingSelected)?;
        let id = record.id.clone();
        if record.mesh.is_none() {
            return Err(EditorError::MeshNotAttached(id));
        }
        self.panel
            .run_animation(&mut self.host)
            .ok_or(EditorError::MeshNotAttached(id))
    }

    // ------------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------------

    /// Per-frame hook: keep visible gizmos on their meshes and the panel
    /// current.
    pub fn frame(&mut self) {
        if !self.mounted {
            return;
        }
        self.resync_editors();
        self.panel.sync(&mut self.bus);
    }

    fn resync_editors(&mut self) {
        let (mut ctx, editors) = self.split();
        for editor in editors.iter_mut() {
            editor.resync(&mut ctx);
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &MeshStore {
        &self.store
    }

    pub fn bus_mut(&mut self) -> &mut PropertyBus {
        &mut self.bus
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn panel(&self) -> &PropertyPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PropertyPanel {
        &mut self.panel
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// The shape editor for a kind.
    pub fn editor(&self, kind: ShapeKind) -> Option<&dyn ShapeController> {
        self.editors
            .iter()
            .find(|editor| editor.kind() == kind)
            .map(|editor| editor.as_ref())
    }

    pub fn mesh_list(&self) -> Vec<MeshListEntry> {
        self.store.entries()
    }
}

impl Viewport<SceneGraph> {
    /// Advance animations by `dt` seconds and run the frame hook.
    pub fn advance(&mut self, dt: f32) {
        self.host.advance(dt);
        self.frame();
    }
}
