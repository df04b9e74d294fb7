use glam::Vec3;
use jenga_render::RenderView;

const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 300.0;
const PITCH_LIMIT: f32 = 1.5;

/// Camera orbiting a fixed target at a distance, driven by mouse drag and wheel.
/// Camera motion lives outside the world; only the `RenderView` it produces reaches the kernel.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Radians around +Y, 0 looks down -Z.
    pub yaw: f32,
    /// Radians above the horizon.
    pub pitch: f32,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 10.0, 2.4),
            distance: 40.0,
            yaw: 0.0,
            pitch: 0.25,
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.005,
            zoom_speed: 2.0,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        );
        self.target + offset * self.distance
    }

    /// Orbit by a mouse delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Positive `delta` (wheel up) moves closer.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta * self.zoom_speed).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> RenderView {
        RenderView {
            eye: self.eye(),
            target: self.target,
            fov_degrees: self.fov_degrees,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_eye_sits_in_front_and_above() {
        let cam = OrbitCamera::default();
        let eye = cam.eye();
        assert!(eye.z > cam.target.z);
        assert!(eye.y > cam.target.y);
        assert!((eye.distance(cam.target) - cam.distance).abs() < 1e-4);
    }

    #[test]
    fn rotate_keeps_distance_and_clamps_pitch() {
        let mut cam = OrbitCamera::default();
        cam.rotate(300.0, 10_000.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        assert!((cam.eye().distance(cam.target) - cam.distance).abs() < 1e-3);
        cam.rotate(0.0, -100_000.0);
        assert_eq!(cam.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1_000.0);
        assert_eq!(cam.distance, MIN_DISTANCE);
        cam.zoom(-1_000.0);
        assert_eq!(cam.distance, MAX_DISTANCE);
    }

    #[test]
    fn zero_sized_window_keeps_aspect() {
        let mut cam = OrbitCamera::default();
        cam.set_aspect(0, 600);
        assert_eq!(cam.aspect, 16.0 / 9.0);
        cam.set_aspect(800, 400);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn view_looks_at_target() {
        let cam = OrbitCamera::default();
        let view = cam.view();
        assert_eq!(view.target, cam.target);
        assert_eq!(view.eye, cam.eye());
        let ray = view.ray(glam::Vec2::ZERO);
        let to_target = (cam.target - view.eye).normalize();
        assert!(ray.direction.dot(to_target) > 0.999);
    }
}
