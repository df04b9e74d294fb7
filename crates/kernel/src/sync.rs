//! Per-frame reconciliation of scene nodes and rigid bodies.

use glam::Vec3;
use jenga_common::BlockId;
use jenga_physics::PhysicsBackend;
use jenga_render::Scene;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::error::KernelError;
use crate::tower::Tower;

/// Which proxy was authoritative for a block this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncDirection {
    /// The body drove the node: gravity and contacts.
    PhysicsToVisual,
    /// The node drove the body: manual control.
    VisualToPhysics,
}

/// Copy each block's pose in exactly one direction.
///
/// `controlled` must be the controlled block as of the start of the frame.
/// Returns one entry per block, in tower order: the direction copied, or
/// `None` if the copy failed and the block was skipped.
pub fn reconcile<P: PhysicsBackend>(
    tower: &Tower,
    controlled: Option<BlockId>,
    physics: &mut P,
    scene: &mut Scene,
) -> Vec<Option<SyncDirection>> {
    tower
        .iter()
        .map(|block| {
            let direction = if controlled == Some(block.id) {
                SyncDirection::VisualToPhysics
            } else {
                SyncDirection::PhysicsToVisual
            };
            match copy_pose(block, direction, physics, scene) {
                Ok(()) => Some(direction),
                Err(err) => {
                    tracing::warn!(id = %block.id, %err, "sync skipped");
                    None
                }
            }
        })
        .collect()
}

fn copy_pose<P: PhysicsBackend>(
    block: &Block,
    direction: SyncDirection,
    physics: &mut P,
    scene: &mut Scene,
) -> Result<(), KernelError> {
    match direction {
        SyncDirection::VisualToPhysics => {
            let pose = block
                .visual_pose(scene)
                .ok_or(KernelError::UnknownBlock(block.id))?;
            physics.set_pose(block.body, pose)?;
            physics.set_velocity(block.body, Vec3::ZERO, Vec3::ZERO)?;
        }
        SyncDirection::PhysicsToVisual => {
            let pose = block
                .physics_pose(physics)
                .ok_or(KernelError::UnknownBlock(block.id))?;
            scene.set_pose(block.visual, pose)?;
        }
    }
    Ok(())
}
