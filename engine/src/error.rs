//! Editor Errors
//!
//! A single error type shared by the store, the config loader and the viewport.
//! Pointer and frame handlers never return errors: missing collaborators are
//! treated as "nothing to do" and handled by early returns.

use thiserror::Error;

use crate::store::{MeshId, ParamField, ShapeKind};

/// Errors surfaced by editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The id does not name any record in the store.
    #[error("mesh {0} not found")]
    UnknownMesh(MeshId),

    /// The record exists but its scene node has not been created yet.
    #[error("mesh {0} has no scene node attached")]
    MeshNotAttached(MeshId),

    /// An operation on "the selected record" ran with nothing selected.
    #[error("no mesh selected")]
    NothingSelected,

    /// The parameter field is not part of this shape's parameter record.
    #[error("{kind:?} has no {field:?} parameter")]
    UnsupportedField { kind: ShapeKind, field: ParamField },

    /// Reading a config file failed.
    #[error("config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// A config file was not valid JSON for `EditorConfig`.
    #[error("config JSON error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
