//! Ray casting against scene geometry.

use glam::Vec3;
use jenga_common::{BlockId, Pose};

use crate::scene::NodeHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One hit of a ray on a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub node: NodeHandle,
    pub distance: f32,
    pub point: Vec3,
    pub user_data: Option<BlockId>,
}

/// Ray against an oriented box. The ray is moved into box space and tested
/// with the slab method.
pub fn ray_box(ray: &Ray, pose: &Pose, half_extents: Vec3) -> Option<f32> {
    let inverse = pose.rotation.inverse();
    let origin = inverse * (ray.origin - pose.position);
    let dir = inverse * ray.direction;

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let (o, d, h) = (origin[axis], dir[axis], half_extents[axis]);
        if d.abs() < 1e-8 {
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (t1, t2) = ((-h - o) * inv, (h - o) * inv);
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }

    if t_max < t_min || t_max < 0.0 {
        return None;
    }
    // Origin inside the box: report the exit face.
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

/// Ray against a horizontal square centred on the pose.
pub fn ray_plane(ray: &Ray, pose: &Pose, half_extent: f32) -> Option<f32> {
    if ray.direction.y.abs() < 1e-8 {
        return None;
    }
    let t = (pose.position.y - ray.origin.y) / ray.direction.y;
    if t < 0.0 {
        return None;
    }
    let hit = ray.at(t);
    let inside = (hit.x - pose.position.x).abs() <= half_extent
        && (hit.z - pose.position.z).abs() <= half_extent;
    inside.then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;

    const HALF: Vec3 = Vec3::new(3.6, 0.7, 1.2);

    #[test]
    fn head_on_box_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray_box(&ray, &Pose::default(), HALF).unwrap();
        assert!((t - 8.8).abs() < 1e-5);
    }

    #[test]
    fn box_behind_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(ray_box(&ray, &Pose::default(), HALF).is_none());
    }

    #[test]
    fn rotation_changes_the_face_hit() {
        // Unrotated the long side spans x; a ray at x=3 grazes it.
        let ray = Ray::new(Vec3::new(3.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!(ray_box(&ray, &Pose::default(), HALF).is_some());

        let turned = Pose::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));
        assert!(ray_box(&ray, &turned, HALF).is_none());

        let centred = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray_box(&centred, &turned, HALF).unwrap();
        assert!((t - 6.4).abs() < 1e-4);
    }

    #[test]
    fn ray_from_inside_reports_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let t = ray_box(&ray, &Pose::default(), HALF).unwrap();
        assert!((t - 0.7).abs() < 1e-5);
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 10.0), Vec3::NEG_Z);
        assert!(ray_box(&ray, &Pose::default(), HALF).is_none());
    }

    #[test]
    fn plane_is_bounded() {
        let pose = Pose::from_position(Vec3::new(0.0, -0.7, 0.0));
        let down = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!((ray_plane(&down, &pose, 10.0).unwrap() - 5.7).abs() < 1e-5);

        let outside = Ray::new(Vec3::new(20.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(ray_plane(&outside, &pose, 10.0).is_none());

        let flat = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        assert!(ray_plane(&flat, &pose, 10.0).is_none());
    }
}
