use glam::Vec3;
use jenga_common::Pose;

use crate::body::{BodyDesc, BodyHandle, RigidBody};

/// Errors from body operations.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("body {0:?} not found")]
    UnknownBody(BodyHandle),
}

/// Physics engine interface. Consumers drive bodies only through this trait.
pub trait PhysicsBackend {
    /// Insert a body and return its handle.
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Remove a body. Returns it if it existed.
    fn remove_body(&mut self, handle: BodyHandle) -> Option<RigidBody>;

    fn body(&self, handle: BodyHandle) -> Option<&RigidBody>;

    /// Teleport a body. Velocities are left untouched.
    fn set_pose(&mut self, handle: BodyHandle, pose: Pose) -> Result<(), PhysicsError>;

    fn set_velocity(
        &mut self,
        handle: BodyHandle,
        linear: Vec3,
        angular: Vec3,
    ) -> Result<(), PhysicsError>;

    /// Advance the simulation by exactly `dt` seconds.
    fn step(&mut self, dt: f32);

    /// Remove every body.
    fn clear(&mut self);

    fn body_count(&self) -> usize;

    fn pose(&self, handle: BodyHandle) -> Option<Pose> {
        self.body(handle).map(RigidBody::pose)
    }
}
