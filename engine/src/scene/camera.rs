//! Camera Module
//!
//! Perspective camera of the headless scene: turns screen pixels into picking
//! rays and world points back into screen pixels. Screen coordinates are in
//! pixels with (0,0) at the top-left corner of the viewport.

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::picking::Ray;

/// Look-at perspective camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Viewport size in pixels
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    /// Slightly raised view of the origin, wide enough to frame the demo row.
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.24, 3.8) * 1.6,
            target: Vec3::ZERO,
            fov: 0.8,
            width: 1280.0,
            height: 720.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 { self.width / self.height } else { 1.0 }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Resize the viewport (window resize).
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    /// World-space ray through a screen pixel.
    pub fn picking_ray(&self, screen: Vec2) -> Ray {
        let ndc = Vec2::new(
            screen.x / self.width * 2.0 - 1.0,
            1.0 - screen.y / self.height * 2.0,
        );
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(self.position, (far - near).normalize_or(Vec3::NEG_Z))
    }

    /// Screen pixel of a world point, `None` when it lies behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        ))
    }
}
