//! Narrow-phase contact generation.
//!
//! Box-box contacts use the separating axis test over the 15 candidate axes of
//! two oriented boxes (3 face normals each, 9 edge cross products). The axis of
//! least overlap becomes the contact normal.

use glam::{Quat, Vec3};

use crate::body::{RigidBody, Shape};

/// Overlaps at or below this depth count as resting, not penetrating.
pub const CONTACT_SLOP: f32 = 1e-5;

/// Penetration between two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first body towards the second.
    pub normal: Vec3,
    /// Penetration depth along `normal`.
    pub depth: f32,
}

fn box_axes(rotation: Quat) -> [Vec3; 3] {
    [rotation * Vec3::X, rotation * Vec3::Y, rotation * Vec3::Z]
}

/// Half-length of a box's shadow on `axis`.
fn projected_radius(half_extents: Vec3, axes: &[Vec3; 3], axis: Vec3) -> f32 {
    half_extents.x * axes[0].dot(axis).abs()
        + half_extents.y * axes[1].dot(axis).abs()
        + half_extents.z * axes[2].dot(axis).abs()
}

/// Separating axis test between two oriented boxes.
///
/// Returns `None` when any axis separates them (or they only touch).
pub fn cuboid_cuboid(
    center_a: Vec3,
    rotation_a: Quat,
    half_a: Vec3,
    center_b: Vec3,
    rotation_b: Quat,
    half_b: Vec3,
) -> Option<Contact> {
    let axes_a = box_axes(rotation_a);
    let axes_b = box_axes(rotation_b);
    let delta = center_b - center_a;

    let mut best: Option<Contact> = None;
    let mut overlaps_on = |axis: Vec3| -> bool {
        let len_sq = axis.length_squared();
        if len_sq < 1e-8 {
            // Parallel edges: the cross product carries no information.
            return true;
        }
        let axis = axis / len_sq.sqrt();
        let distance = delta.dot(axis);
        let overlap = projected_radius(half_a, &axes_a, axis)
            + projected_radius(half_b, &axes_b, axis)
            - distance.abs();
        if overlap <= CONTACT_SLOP {
            return false;
        }
        if best.is_none_or(|c| overlap < c.depth) {
            let normal = if distance < 0.0 { -axis } else { axis };
            best = Some(Contact {
                normal,
                depth: overlap,
            });
        }
        true
    };

    for axis in axes_a.iter().chain(axes_b.iter()) {
        if !overlaps_on(*axis) {
            return None;
        }
    }
    for a in &axes_a {
        for b in &axes_b {
            if !overlaps_on(a.cross(*b)) {
                return None;
            }
        }
    }
    best
}

/// Penetration of a box into the ground half-space at `ground_height`.
fn cuboid_ground(center: Vec3, rotation: Quat, half: Vec3, ground_height: f32) -> Option<Contact> {
    let lowest = center.y - projected_radius(half, &box_axes(rotation), Vec3::Y);
    let depth = ground_height - lowest;
    (depth > CONTACT_SLOP).then_some(Contact {
        normal: Vec3::NEG_Y,
        depth,
    })
}

/// Contact between any two bodies, normal pointing from `a` to `b`.
pub fn contact_between(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
    match (a.shape, b.shape) {
        (Shape::Cuboid { half_extents: ha }, Shape::Cuboid { half_extents: hb }) => {
            let reach = a.shape.bounding_radius() + b.shape.bounding_radius();
            if a.position.distance_squared(b.position) > reach * reach {
                return None;
            }
            cuboid_cuboid(a.position, a.orientation, ha, b.position, b.orientation, hb)
        }
        (Shape::Cuboid { half_extents }, Shape::Ground) => {
            cuboid_ground(a.position, a.orientation, half_extents, b.position.y)
        }
        (Shape::Ground, Shape::Cuboid { half_extents }) => {
            cuboid_ground(b.position, b.orientation, half_extents, a.position.y).map(|c| Contact {
                normal: -c.normal,
                depth: c.depth,
            })
        }
        (Shape::Ground, Shape::Ground) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyDesc;
    use jenga_common::Pose;

    const HALF: Vec3 = Vec3::new(3.6, 0.7, 1.2);

    #[test]
    fn separated_boxes_have_no_contact() {
        let c = cuboid_cuboid(
            Vec3::ZERO,
            Quat::IDENTITY,
            HALF,
            Vec3::new(0.0, 2.0, 0.0),
            Quat::IDENTITY,
            HALF,
        );
        assert!(c.is_none());
    }

    #[test]
    fn touching_boxes_are_resting_not_penetrating() {
        let c = cuboid_cuboid(
            Vec3::ZERO,
            Quat::IDENTITY,
            HALF,
            Vec3::new(0.0, 1.4, 0.0),
            Quat::IDENTITY,
            HALF,
        );
        assert!(c.is_none());
    }

    #[test]
    fn stacked_overlap_resolves_vertically() {
        let c = cuboid_cuboid(
            Vec3::ZERO,
            Quat::IDENTITY,
            HALF,
            Vec3::new(0.0, 1.3, 0.0),
            Quat::IDENTITY,
            HALF,
        )
        .unwrap();
        assert!((c.normal - Vec3::Y).length() < 1e-5);
        assert!((c.depth - 0.1).abs() < 1e-4);
    }

    #[test]
    fn crossed_course_overlap_resolves_vertically() {
        let rotated = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let c = cuboid_cuboid(
            Vec3::new(0.0, 1.35, 0.0),
            Quat::IDENTITY,
            HALF,
            Vec3::new(-2.4, 0.0, 0.0),
            rotated,
            HALF,
        )
        .unwrap();
        // b sits below a
        assert!((c.normal - Vec3::NEG_Y).length() < 1e-4);
        assert!((c.depth - 0.05).abs() < 1e-3);
    }

    #[test]
    fn side_overlap_pushes_sideways() {
        let c = cuboid_cuboid(
            Vec3::ZERO,
            Quat::IDENTITY,
            HALF,
            Vec3::new(0.0, 0.0, -2.3),
            Quat::IDENTITY,
            HALF,
        )
        .unwrap();
        assert!((c.normal - Vec3::NEG_Z).length() < 1e-5);
        assert!((c.depth - 0.1).abs() < 1e-4);
    }

    #[test]
    fn box_sunk_into_ground() {
        let ground = BodyDesc::ground(-0.7).build();
        let block = BodyDesc::dynamic(0.05, Shape::Cuboid { half_extents: HALF })
            .with_pose(Pose::from_position(Vec3::new(0.0, -0.1, 0.0)))
            .build();

        let c = contact_between(&ground, &block).unwrap();
        assert!((c.normal - Vec3::Y).length() < 1e-6);
        assert!((c.depth - 0.1).abs() < 1e-5);

        let flipped = contact_between(&block, &ground).unwrap();
        assert!((flipped.normal - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn tilted_box_reaches_lower() {
        let tilted = Quat::from_rotation_z(0.3);
        let resting = cuboid_ground(Vec3::ZERO, Quat::IDENTITY, HALF, -0.7);
        let sunk = cuboid_ground(Vec3::ZERO, tilted, HALF, -0.7);
        assert!(resting.is_none());
        assert!(sunk.is_some());
    }

    #[test]
    fn far_boxes_skip_narrow_phase() {
        let a = BodyDesc::dynamic(1.0, Shape::cuboid(Vec3::ONE)).build();
        let b = BodyDesc::dynamic(1.0, Shape::cuboid(Vec3::ONE))
            .with_pose(Pose::from_position(Vec3::splat(50.0)))
            .build();
        assert!(contact_between(&a, &b).is_none());
    }

    #[test]
    fn rotated_box_within_reach_still_collides() {
        let a = BodyDesc::dynamic(1.0, Shape::Cuboid { half_extents: HALF }).build();
        // Yawed 90 degrees, its long side crosses a's end.
        let b = BodyDesc::dynamic(1.0, Shape::Cuboid { half_extents: HALF })
            .with_pose(Pose::new(
                Vec3::new(4.7, 0.0, 0.0),
                Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ))
            .build();
        let c = contact_between(&a, &b).unwrap();
        assert!((c.normal - Vec3::X).length() < 1e-4);
        assert!((c.depth - 0.1).abs() < 1e-3);
    }
}
