//! Selection and Hover
//!
//! Turns the primary pick under the pointer into the store's selected and
//! hovered ids, keeps the selection highlight on the selected record's node
//! and switches the cursor while hovering gizmo parts.
//!
//! Gizmo parts are never selectable: a primary hit on one leaves the
//! selection alone. A hit on a non-selectable record (the ground) or on
//! nothing clears it.

use glam::Vec2;
use tracing::trace;

use crate::scene::{CursorStyle, NodeId, SceneHost};
use crate::store::{MeshId, MeshStore, SelectionChange};

/// What the primary pick landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickTarget {
    /// Gizmo geometry
    Editor { hover_feedback: bool },
    /// A node backing a store record
    Record { id: MeshId, selectable: bool },
    /// Empty space or an unknown node
    Nothing,
}

/// Classify the nearest pickable node under `screen`.
pub fn classify_pick(host: &dyn SceneHost, store: &MeshStore, screen: Vec2) -> PickTarget {
    let ray = host.picking_ray(screen);
    let Some(hit) = host.pick(&ray) else {
        return PickTarget::Nothing;
    };
    if let Some(flags) = host.render_flags(hit.node) {
        if flags.editor_only {
            return PickTarget::Editor {
                hover_feedback: flags.pointer_move_events,
            };
        }
    }
    match store.record_for_node(hit.node) {
        Some(record) => PickTarget::Record {
            id: record.id.clone(),
            selectable: record.selectable,
        },
        None => PickTarget::Nothing,
    }
}

/// Primary-pick selection, hover tracking and highlight.
#[derive(Debug, Default)]
pub struct SelectionController {
    highlighted: Option<NodeId>,
    cursor: CursorStyle,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node currently carrying the selection highlight.
    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Select whatever the primary pick under `screen` lands on.
    ///
    /// Returns `None` when the selection was left untouched (a gizmo hit).
    pub fn pointer_down(
        &mut self,
        host: &mut dyn SceneHost,
        store: &mut MeshStore,
        screen: Vec2,
    ) -> Option<SelectionChange> {
        let change = match classify_pick(host, store, screen) {
            PickTarget::Editor { .. } => {
                trace!("pointer down on gizmo part, selection unchanged");
                return None;
            }
            PickTarget::Record { id, .. } => store.set_selected(&id, true).ok()?,
            PickTarget::Nothing => store.clear_selection(),
        };
        self.sync_highlight(host, store);
        Some(change)
    }

    /// Update the hovered record and the cursor. Returns true when the
    /// hovered id changed.
    pub fn pointer_move(&mut self, host: &mut dyn SceneHost, store: &mut MeshStore, screen: Vec2) -> bool {
        let (cursor, hovered) = match classify_pick(host, store, screen) {
            PickTarget::Editor { hover_feedback: true } => (CursorStyle::Pointer, None),
            PickTarget::Record { id, selectable: true } => (CursorStyle::Default, Some(id)),
            _ => (CursorStyle::Default, None),
        };
        if cursor != self.cursor {
            host.set_cursor(cursor);
            self.cursor = cursor;
        }
        store.set_hovered(hovered)
    }

    /// Move the highlight to the selected record's node.
    pub fn sync_highlight(&mut self, host: &mut dyn SceneHost, store: &MeshStore) {
        let target = store.selected().and_then(|record| record.mesh);
        if target == self.highlighted {
            return;
        }
        if let Some(previous) = self.highlighted {
            host.set_highlight(previous, false);
        }
        if let Some(node) = target {
            host.set_highlight(node, true);
        }
        self.highlighted = target;
    }

    /// Drop the highlight and restore the default cursor.
    pub fn reset(&mut self, host: &mut dyn SceneHost) {
        if let Some(node) = self.highlighted.take() {
            host.set_highlight(node, false);
        }
        host.set_cursor(CursorStyle::Default);
        self.cursor = CursorStyle::Default;
    }
}
