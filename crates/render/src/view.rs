use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::pick::Ray;

/// Camera/view configuration for rendering and picking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Width over height of the viewport.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 18.0, 36.0),
            target: Vec3::new(0.0, 10.0, 0.0),
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl RenderView {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect.max(1e-3),
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point in normalized device coordinates
    /// (`-1..1` on both axes, +y up).
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }
}

/// Pointer position in pixels (origin top-left) to normalized device coordinates.
pub fn pointer_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    let (w, h) = (width.max(1.0), height.max(1.0));
    Vec2::new(x / w * 2.0 - 1.0, -(y / h * 2.0 - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 75.0);
        assert!(view.eye.y > view.target.y);
    }

    #[test]
    fn centre_ray_points_at_target() {
        let view = RenderView::default();
        let ray = view.ray(Vec2::ZERO);
        let expected = (view.target - view.eye).normalize();
        assert!(ray.direction.dot(expected) > 0.9999);
        // starts on the near plane, just in front of the eye
        assert!(ray.origin.distance(view.eye) < 0.2);
    }

    #[test]
    fn ndc_corners() {
        assert_eq!(pointer_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn right_of_centre_ray_leans_right() {
        let view = RenderView {
            eye: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            ..RenderView::default()
        };
        let ray = view.ray(Vec2::new(0.5, 0.0));
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.z < 0.0);
    }
}
