//! One tower element: a scene node and a rigid body describing the same box.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use jenga_common::{BlockId, Pose};
use jenga_physics::{BodyDesc, BodyHandle, PhysicsBackend, PhysicsMaterial, Shape};
use jenga_render::{Node, NodeHandle, Scene, WoodGrain};
use jenga_tower::LayoutRecord;

/// Light enough to topple, heavy enough to stay dynamic.
pub const BLOCK_MASS: f32 = 0.05;
pub const BLOCK_FRICTION: f32 = 0.5;
pub const BLOCK_RESTITUTION: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub size: Vec3,
    pub grain: WoodGrain,
    pub visual: NodeHandle,
    pub body: BodyHandle,
    /// Pose both proxies were created with.
    pub initial: Pose,
}

/// World pose of a layout record.
///
/// Rotated records keep their layout position and get a quarter turn about +Y.
/// Unrotated records swap x and z. Assigned once for both proxies.
pub fn initial_pose(record: &LayoutRecord) -> Pose {
    let p = record.position;
    if record.rotated {
        Pose::new(p, Quat::from_rotation_y(FRAC_PI_2))
    } else {
        Pose::new(Vec3::new(p.z, p.y, p.x), Quat::IDENTITY)
    }
}

impl Block {
    /// Create both proxies for `record`. Never fails.
    pub fn spawn<P: PhysicsBackend>(
        record: &LayoutRecord,
        grain: WoodGrain,
        physics: &mut P,
        scene: &mut Scene,
    ) -> Self {
        let pose = initial_pose(record);
        let body = physics.add_body(
            BodyDesc::dynamic(BLOCK_MASS, Shape::cuboid(record.size))
                .with_material(PhysicsMaterial::new(BLOCK_FRICTION, BLOCK_RESTITUTION))
                .with_pose(pose),
        );
        let visual = scene.add(
            Node::cuboid(record.size, grain.material())
                .with_pose(pose)
                .with_user_data(record.id),
        );
        Self {
            id: record.id,
            size: record.size,
            grain,
            visual,
            body,
            initial: pose,
        }
    }

    /// Remove both proxies.
    pub fn despawn<P: PhysicsBackend>(&self, physics: &mut P, scene: &mut Scene) {
        physics.remove_body(self.body);
        scene.remove(self.visual);
    }

    pub fn visual_pose(&self, scene: &Scene) -> Option<Pose> {
        scene.pose(self.visual)
    }

    pub fn physics_pose<P: PhysicsBackend>(&self, physics: &P) -> Option<Pose> {
        physics.pose(self.body)
    }
}
