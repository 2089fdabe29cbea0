//! Picking Math
//!
//! Rays, slab-method ray/AABB tests, ray/triangle tests and the axis-constrained
//! drag plane used by the gizmo handles.
//!
//! # Drag Plane
//!
//! A handle constrained to an axis is dragged on the plane that contains the
//! axis line through the handle's anchor and faces the viewing ray as much as
//! possible. The pointer ray is intersected with that plane and the hit is
//! reduced to a single coordinate along the axis.

use glam::{Mat4, Vec3};

/// A ray with origin and direction. The direction is normalized for rays
/// produced by a camera; transformed rays may carry a scaled direction, in
/// which case `t` values stay comparable with the untransformed ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray expressed in another space.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}

/// Ray-AABB intersection using the slab method.
///
/// # Returns
///
/// * `Some(t)` - Ray parameter of the nearest intersection (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(ray: &Ray, aabb_min: Vec3, aabb_max: Vec3) -> Option<f32> {
    let dir = ray.direction;
    // Near-zero components get huge reciprocals instead of a division by zero
    let inv_dir = Vec3::new(
        if dir.x.abs() > 1e-10 { 1.0 / dir.x } else { f32::MAX * dir.x.signum() },
        if dir.y.abs() > 1e-10 { 1.0 / dir.y } else { f32::MAX * dir.y.signum() },
        if dir.z.abs() > 1e-10 { 1.0 / dir.z } else { f32::MAX * dir.z.signum() },
    );

    let t1 = (aabb_min - ray.origin) * inv_dir;
    let t2 = (aabb_max - ray.origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}

/// Two-sided Möller-Trumbore ray/triangle test.
///
/// Returns the ray parameter of the hit, if it lies in front of the origin.
pub fn ray_triangle_intersect(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-9;

    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

/// Intersect a ray with the plane through `point` with `normal`.
pub fn ray_plane_intersect(ray: &Ray, point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = ray.direction.dot(normal);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (point - ray.origin).dot(normal) / denom;
    (t >= 0.0).then_some(t)
}

/// Normal of the drag plane for an axis, chosen to face the ray.
///
/// `None` when the ray runs (almost) parallel to the axis; no stable plane
/// exists then.
pub fn drag_plane_normal(axis: Vec3, ray_direction: Vec3) -> Option<Vec3> {
    let axis = axis.normalize_or_zero();
    // Component of the view direction perpendicular to the axis
    let normal = ray_direction - axis * ray_direction.dot(axis);
    (normal.length_squared() > 1e-8).then(|| normal.normalize())
}
