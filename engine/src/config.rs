//! Editor Configuration
//!
//! Centralized tunables for parameter clamping, gizmo construction, the
//! bounce preview and the property panel's slider ranges. `Default` gives the
//! stock editor values; a JSON file can override any subset of them.

use std::f32::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{ParamField, ShapeKind};

// ============================================================================
// RANGES
// ============================================================================

/// Inclusive numeric range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Saturating clamp. NaN collapses to `min`.
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }
}

/// Allowed range of every editable shape parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterLimits {
    pub cube_width: ParamRange,
    pub cube_height: ParamRange,
    pub cube_depth: ParamRange,
    pub cylinder_diameter: ParamRange,
    pub cylinder_height: ParamRange,
    /// Icosphere size is edited as a diameter; the stored radius range is half
    pub icosphere_diameter: ParamRange,
    pub icosphere_subdivisions: ParamRange,
    pub plane_width: ParamRange,
    pub plane_height: ParamRange,
}

impl Default for ParameterLimits {
    fn default() -> Self {
        Self {
            cube_width: ParamRange::new(0.1, 2.0),
            cube_height: ParamRange::new(0.1, 2.0),
            cube_depth: ParamRange::new(0.1, 2.0),
            cylinder_diameter: ParamRange::new(0.1, 2.0),
            cylinder_height: ParamRange::new(0.1, 2.0),
            icosphere_diameter: ParamRange::new(0.1, 2.0),
            icosphere_subdivisions: ParamRange::new(1.0, 10.0),
            plane_width: ParamRange::new(0.1, 20.0),
            plane_height: ParamRange::new(0.1, 20.0),
        }
    }
}

impl ParameterLimits {
    /// Range for a field of a shape kind, `None` if the shape has no such field.
    pub fn range(&self, kind: ShapeKind, field: ParamField) -> Option<ParamRange> {
        match (kind, field) {
            (ShapeKind::Cube, ParamField::Width) => Some(self.cube_width),
            (ShapeKind::Cube, ParamField::Height) => Some(self.cube_height),
            (ShapeKind::Cube, ParamField::Depth) => Some(self.cube_depth),
            (ShapeKind::Cylinder, ParamField::Diameter) => Some(self.cylinder_diameter),
            (ShapeKind::Cylinder, ParamField::Height) => Some(self.cylinder_height),
            (ShapeKind::IcoSphere, ParamField::Diameter) => Some(self.icosphere_diameter),
            (ShapeKind::IcoSphere, ParamField::Radius) => Some(self.icosphere_diameter.scaled(0.5)),
            (ShapeKind::IcoSphere, ParamField::Subdivisions) => Some(self.icosphere_subdivisions),
            (ShapeKind::Plane, ParamField::Width) => Some(self.plane_width),
            (ShapeKind::Plane, ParamField::Height) => Some(self.plane_height),
            _ => None,
        }
    }
}

// ============================================================================
// GIZMO
// ============================================================================

/// Dimensions of the editor gizmos (world units at scale 1).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoConfig {
    /// Radius of the visible arrow shaft
    pub shaft_radius: f32,
    /// Radius of the invisible hit-target shaft
    pub control_radius: f32,
    pub tip_diameter: f32,
    pub tip_height: f32,
    pub ring_thickness: f32,
    pub control_ring_thickness: f32,
    pub ring_tessellation: u32,
    /// Gizmos are sized to this multiple of the selected mesh's extent
    pub fit_factor: f32,
    /// Rendering group drawn after the scene (overlay pass)
    pub overlay_group: u8,
    pub cube_arrow_length: f32,
    pub cube_arrow_offset: f32,
    pub vertical_arrow_length: f32,
    pub vertical_arrow_offset: f32,
    /// Parameter units per world unit when dragging icosphere subdivisions
    pub subdivision_drag_multiplier: f32,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            shaft_radius: 0.025,
            control_radius: 0.075,
            tip_diameter: 0.1,
            tip_height: 0.2,
            ring_thickness: 0.05,
            control_ring_thickness: 0.15,
            ring_tessellation: 30,
            fit_factor: 1.1,
            overlay_group: 1,
            cube_arrow_length: 0.5,
            cube_arrow_offset: 0.25,
            vertical_arrow_length: 2.0,
            vertical_arrow_offset: 0.0,
            subdivision_drag_multiplier: 10.0,
        }
    }
}

// ============================================================================
// BOUNCE
// ============================================================================

/// Inputs of the bounce preview.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceSettings {
    /// Drop height above the resting position (meters)
    pub amplitude: f32,
    /// Requested playback length when `use_duration` is set (seconds)
    pub duration: f32,
    /// Coefficient of restitution (0.9 is roughly a ping pong ball)
    pub cor: f32,
    /// Vertical acceleration (m/s², negative is down)
    pub gravity: f32,
    pub use_duration: bool,
    /// Simulation steps per second, also the keyframe rate
    pub frame_rate: f32,
    /// Hard cap on simulated steps
    pub max_steps: u32,
}

impl Default for BounceSettings {
    fn default() -> Self {
        Self {
            amplitude: 5.0,
            duration: 2.0,
            cor: 0.9,
            gravity: -9.81,
            use_duration: true,
            frame_rate: 60.0,
            max_steps: 9999,
        }
    }
}

// ============================================================================
// PANEL
// ============================================================================

/// Slider ranges of the property panel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelRanges {
    pub position: ParamRange,
    pub rotation: ParamRange,
    pub scaling: ParamRange,
    pub amplitude: ParamRange,
    pub duration: ParamRange,
    pub cor: ParamRange,
    pub gravity: ParamRange,
}

impl Default for PanelRanges {
    fn default() -> Self {
        Self {
            position: ParamRange::new(-4.0, 4.0),
            rotation: ParamRange::new(-PI, PI),
            scaling: ParamRange::new(0.1, 2.0),
            amplitude: ParamRange::new(0.2, 5.0),
            duration: ParamRange::new(1.0, 10.0),
            cor: ParamRange::new(0.0, 1.0),
            gravity: ParamRange::new(-20.0, -1.0),
        }
    }
}

// ============================================================================
// ROOT
// ============================================================================

/// Everything configurable about the editor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub limits: ParameterLimits,
    pub gizmo: GizmoConfig,
    pub bounce: BounceSettings,
    pub panel: PanelRanges,
}

impl EditorConfig {
    /// Parse a JSON document; missing sections and fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
