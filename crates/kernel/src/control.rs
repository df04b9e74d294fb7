//! Manual-control input mapper. Moves the controlled block's scene node only;
//! the body follows during reconciliation.

use glam::Quat;
use jenga_common::Pose;
use jenga_input::{ControlAction, KeyBindings};
use jenga_render::Scene;

use crate::selection::Selection;
use crate::tower::Tower;

/// Distance moved per frame by a translation action.
pub const TRANSLATE_STEP: f32 = 0.1;
/// Radians turned per frame by a rotation action.
pub const ROTATE_STEP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlOutcome {
    /// Nothing controlled, no key, or an unbound key.
    Inactive,
    Moved(Pose),
    ReleaseRequested,
}

/// One frame's increment of `action` applied to `pose`.
///
/// Translations are along world axes; rotation turns about the block's own
/// vertical axis.
pub fn step_pose(pose: Pose, action: ControlAction) -> Pose {
    let position = pose.position + action.translation_axis() * TRANSLATE_STEP;
    let yaw = action.yaw_sign() * ROTATE_STEP;
    let rotation = if yaw == 0.0 {
        pose.rotation
    } else {
        (pose.rotation * Quat::from_rotation_y(yaw)).normalize()
    };
    Pose::new(position, rotation)
}

#[derive(Debug, Clone, Default)]
pub struct ManualControl {
    pub bindings: KeyBindings,
}

impl ManualControl {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Apply the active key to the controlled block, if both exist.
    pub fn apply(&self, selection: &Selection, tower: &Tower, scene: &mut Scene) -> ControlOutcome {
        let (Some(id), Some(key)) = (selection.controlled(), selection.active_key()) else {
            return ControlOutcome::Inactive;
        };
        let Some(action) = self.bindings.action_for(key) else {
            return ControlOutcome::Inactive;
        };
        if action == ControlAction::Release {
            return ControlOutcome::ReleaseRequested;
        }

        let Some(node) = tower.get(id).and_then(|b| scene.get_mut(b.visual)) else {
            tracing::warn!(%id, "controlled block has no scene node");
            return ControlOutcome::Inactive;
        };
        node.pose = step_pose(node.pose, action);
        tracing::trace!(%id, action = action.label(), "manual step");
        ControlOutcome::Moved(node.pose)
    }
}
