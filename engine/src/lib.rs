//! Mesh Editor Library
//!
//! Core of an interactive primitive mesh editor: shapes (cube, cylinder,
//! icosphere) are selected in a 3D viewport and resized with on-screen drag
//! handles, edited numerically in a property panel, and previewed with a
//! bouncing animation.
//!
//! # Modules
//!
//! - [`scene`] - The `SceneHost` seam and the in-memory `SceneGraph` (camera, picking, animation)
//! - [`geometry`] - Primitive mesh generation and bounding boxes
//! - [`store`] - Mesh records, selection state and the property bus
//! - [`gizmo`] - Arrow construction, gizmo bundles and visibility propagation
//! - [`editor`] - Per-shape editor controllers and the axis-constrained drag
//! - [`selection`] - Primary-pick selection, hover and highlight
//! - [`panel`] - Property panel model
//! - [`animation`] - Keyframe clips and the bounce simulation
//! - [`viewport`] - Composition and pointer routing
//!
//! # Example
//!
//! ```ignore
//! use mesh_editor_engine::{EditorConfig, MeshId, ParamField, SceneGraph, Viewport};
//!
//! let mut viewport = Viewport::demo(SceneGraph::new(), EditorConfig::default());
//! viewport.mount();
//! viewport.select(&MeshId::new("demoCube"))?;
//! viewport.edit_parameter(ParamField::Width, 1.5)?;
//! viewport.run_bounce()?;
//! viewport.advance(1.0 / 60.0);
//! ```

pub mod animation;
pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod gizmo;
pub mod panel;
pub mod scene;
pub mod selection;
pub mod store;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
pub mod web;

// Re-export the types most callers need
pub use config::{BounceSettings, EditorConfig, GizmoConfig, ParamRange, ParameterLimits};
pub use editor::{PointerEvent, ShapeController};
pub use error::{EditorError, Result};
pub use scene::{SceneGraph, SceneHost};
pub use store::{MeshId, MeshRecord, MeshStore, ParamField, ShapeKind, ShapeParameters};
pub use viewport::Viewport;
