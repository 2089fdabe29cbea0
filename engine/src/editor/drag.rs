//! Axis-Constrained Drag
//!
//! Turns pointer motion along one world axis into a clamped parameter value.
//! The same procedure drives every handle of every shape editor; handles only
//! differ in axis, range, multiplier and whether the value is an integer.
//!
//! Direction: a drag is "toward the center" (shrinking) when the pointer moves
//! from its start toward the side of the reference center, so it comes
//! closer to the center than where the drag started. Crossing the center
//! keeps shrinking. The magnitude is the distance travelled along the axis.

use glam::Vec3;

use crate::config::ParamRange;
use crate::scene::picking::{Ray, drag_plane_normal, ray_plane_intersect};
use crate::scene::NodeId;
use crate::store::{MeshId, ParamField};

/// How a handle maps motion to a value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisConstraint {
    pub range: ParamRange,
    /// Parameter units per world unit of motion
    pub multiplier: f32,
    /// Round before clamping
    pub integer: bool,
}

impl AxisConstraint {
    pub fn continuous(range: ParamRange) -> Self {
        Self {
            range,
            multiplier: 1.0,
            integer: false,
        }
    }

    pub fn stepped(range: ParamRange, multiplier: f32) -> Self {
        Self {
            range,
            multiplier,
            integer: true,
        }
    }
}

/// True when the motion from `initial` to `current` points at `center`.
///
/// A drag starting on the center has no inward direction.
pub fn is_toward_center(initial: f32, current: f32, center: f32) -> bool {
    let side = initial - center;
    let motion = current - initial;
    (side > 0.0 && motion < 0.0) || (side < 0.0 && motion > 0.0)
}

/// New parameter value for a pointer at `current`.
pub fn drag_value(
    initial_value: f32,
    initial: f32,
    current: f32,
    center: f32,
    constraint: &AxisConstraint,
) -> f32 {
    let mut delta = (current - initial).abs() * constraint.multiplier;
    if is_toward_center(initial, current, center) {
        delta = -delta;
    }
    let raw = initial_value + delta;
    let raw = if constraint.integer { raw.round() } else { raw };
    constraint.range.clamp(raw)
}

/// State of one pointer drag, from pointer-down to pointer-up.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub pointer_id: i32,
    /// Index of the handle in the editor's handle list
    pub handle: usize,
    pub record: MeshId,
    pub field: ParamField,
    /// Unit world-space drag axis
    pub axis: Vec3,
    /// Point on the axis line through the handle
    pub anchor: Vec3,
    /// Drag plane normal, fixed for the whole drag
    pub plane_normal: Vec3,
    pub initial_coordinate: f32,
    pub initial_value: f32,
    pub reference_center: f32,
    /// Handle world position at drag start
    pub handle_start: Vec3,
    pub constraint: AxisConstraint,
    /// Node moved along with the pointer
    pub moved_node: NodeId,
}

impl DragSession {
    /// Open a drag plane through `anchor` containing `axis`, facing `ray`.
    ///
    /// Returns the plane normal and the pointer's coordinate along the axis,
    /// or `None` when the ray runs along the axis.
    pub fn open_plane(ray: &Ray, anchor: Vec3, axis: Vec3) -> Option<(Vec3, f32)> {
        let normal = drag_plane_normal(axis, ray.direction)?;
        let t = ray_plane_intersect(ray, anchor, normal)?;
        Some((normal, ray.at(t).dot(axis)))
    }

    /// Pointer coordinate along the axis for a new ray, `None` when the ray
    /// misses the drag plane.
    pub fn coordinate(&self, ray: &Ray) -> Option<f32> {
        let t = ray_plane_intersect(ray, self.anchor, self.plane_normal)?;
        Some(ray.at(t).dot(self.axis))
    }

    /// Value for a pointer coordinate.
    pub fn value_at(&self, coordinate: f32) -> f32 {
        drag_value(
            self.initial_value,
            self.initial_coordinate,
            coordinate,
            self.reference_center,
            &self.constraint,
        )
    }

    /// World position the moved handle should follow to.
    pub fn handle_position(&self, coordinate: f32) -> Vec3 {
        self.handle_start + self.axis * (coordinate - self.initial_coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width() -> AxisConstraint {
        AxisConstraint::continuous(ParamRange::new(0.1, 2.0))
    }

    #[test]
    fn test_outward_drag_grows() {
        // Handle on the +X side of a center at 0
        assert!((drag_value(1.0, 0.55, 1.05, 0.0, &width()) - 1.5).abs() < 1e-6);
        // Handle on the -X side dragged further out
        assert!((drag_value(1.0, -0.55, -1.05, 0.0, &width()) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_inward_drag_shrinks() {
        assert!((drag_value(1.0, 0.55, 0.25, 0.0, &width()) - 0.7).abs() < 1e-6);
        assert!((drag_value(1.0, -0.55, -0.25, 0.0, &width()) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_clamped_both_ways() {
        assert_eq!(drag_value(1.0, 0.5, 50.0, 0.0, &width()), 2.0);
        assert_eq!(drag_value(1.0, 0.5, 0.01, 0.0, &width()), 0.1);
    }

    #[test]
    fn test_no_motion_keeps_value() {
        assert_eq!(drag_value(1.25, 0.5, 0.5, 0.0, &width()), 1.25);
    }

    #[test]
    fn test_stepped_constraint_rounds() {
        let subdivisions = AxisConstraint::stepped(ParamRange::new(1.0, 10.0), 10.0);
        assert_eq!(drag_value(4.0, 0.5, 0.63, 0.0, &subdivisions), 5.0);
        assert_eq!(drag_value(4.0, 0.5, 0.47, 0.0, &subdivisions), 4.0);
        assert_eq!(drag_value(4.0, 0.5, 5.0, 0.0, &subdivisions), 10.0);
        assert_eq!(drag_value(4.0, 0.5, 0.0, 0.0, &subdivisions), 1.0);
    }

    #[test]
    fn test_toward_center_rule() {
        assert!(is_toward_center(1.0, 0.5, 0.0));
        assert!(!is_toward_center(1.0, 1.5, 0.0));
        assert!(is_toward_center(1.0, -1.0, 0.0));
        assert!(is_toward_center(-1.0, -0.2, 0.0));
        assert!(!is_toward_center(-1.0, -1.5, 0.0));
        assert!(!is_toward_center(0.0, 0.5, 0.0));
        assert!(!is_toward_center(0.0, -0.5, 0.0));
    }

    #[test]
    fn test_inward_drag_through_center_keeps_shrinking() {
        let mut last = 1.0;
        for current in [0.3, 0.0, -0.3, -0.49, -0.51, -1.5] {
            let value = drag_value(1.0, 0.5, current, 0.0, &width());
            assert!(value <= last, "{current}: {value} > {last}");
            last = value;
        }
        assert_eq!(last, 0.1);

        let height = AxisConstraint::continuous(ParamRange::new(0.1, 2.0));
        assert!((drag_value(2.0, 0.5, -0.55, 0.0, &height) - 0.95).abs() < 1e-5);
    }

    #[test]
    fn test_session_plane_tracks_axis() {
        let camera = Vec3::new(0.0, 2.0, 6.0);
        let anchor = Vec3::new(0.3, 0.0, 0.0);
        let start = Ray::new(camera, (anchor - camera).normalize());
        let (normal, initial) = DragSession::open_plane(&start, anchor, Vec3::X).unwrap();
        assert!((initial - 0.3).abs() < 1e-5);

        let session = DragSession {
            pointer_id: 1,
            handle: 0,
            record: MeshId::new("demoCube"),
            field: ParamField::Width,
            axis: Vec3::X,
            anchor,
            plane_normal: normal,
            initial_coordinate: initial,
            initial_value: 1.0,
            reference_center: 0.0,
            handle_start: anchor,
            constraint: width(),
            moved_node: NodeId(0),
        };
        let target = Vec3::new(0.8, 0.0, 0.0);
        let ray = Ray::new(camera, (target - camera).normalize());
        let coordinate = session.coordinate(&ray).unwrap();
        assert!((coordinate - 0.8).abs() < 1e-4);
        assert!((session.value_at(coordinate) - 1.5).abs() < 1e-4);
        assert!((session.handle_position(coordinate) - target).length() < 1e-4);
    }
}
