use jenga_common::BlockId;
use jenga_physics::PhysicsError;
use jenga_render::SceneError;

#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("block {0} does not exist")]
    UnknownBlock(BlockId),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}
