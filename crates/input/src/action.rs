use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::key::Key;

/// A manual-control action on the controlled block.
///
/// The kernel consumes actions, never raw keys, so bindings can change
/// without touching world logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlAction {
    MoveXPos,
    MoveXNeg,
    MoveZPos,
    MoveZNeg,
    Raise,
    Lower,
    /// Counter-clockwise seen from above.
    RotateLeft,
    RotateRight,
    /// Hand the block back to physics.
    Release,
}

impl ControlAction {
    pub const ALL: [ControlAction; 9] = [
        ControlAction::MoveXPos,
        ControlAction::MoveXNeg,
        ControlAction::MoveZPos,
        ControlAction::MoveZNeg,
        ControlAction::Raise,
        ControlAction::Lower,
        ControlAction::RotateLeft,
        ControlAction::RotateRight,
        ControlAction::Release,
    ];

    /// Unit world-space direction of a translation action, zero otherwise.
    pub fn translation_axis(&self) -> Vec3 {
        match self {
            ControlAction::MoveXPos => Vec3::X,
            ControlAction::MoveXNeg => Vec3::NEG_X,
            ControlAction::MoveZPos => Vec3::Z,
            ControlAction::MoveZNeg => Vec3::NEG_Z,
            ControlAction::Raise => Vec3::Y,
            ControlAction::Lower => Vec3::NEG_Y,
            _ => Vec3::ZERO,
        }
    }

    /// Sign of the yaw applied by a rotation action, zero otherwise.
    pub fn yaw_sign(&self) -> f32 {
        match self {
            ControlAction::RotateLeft => 1.0,
            ControlAction::RotateRight => -1.0,
            _ => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControlAction::MoveXPos => "move +x",
            ControlAction::MoveXNeg => "move -x",
            ControlAction::MoveZPos => "move +z",
            ControlAction::MoveZNeg => "move -z",
            ControlAction::Raise => "raise",
            ControlAction::Lower => "lower",
            ControlAction::RotateLeft => "rotate left",
            ControlAction::RotateRight => "rotate right",
            ControlAction::Release => "release",
        }
    }
}

/// Raw input as delivered by the host shell.
///
/// Pointer coordinates are normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerMoved(Vec2),
    PointerClicked(Vec2),
    KeyDown(Key),
    KeyUp(Key),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translations_are_unit_and_exclusive() {
        for action in ControlAction::ALL {
            let moves = action.translation_axis() != Vec3::ZERO;
            let turns = action.yaw_sign() != 0.0;
            assert!(!(moves && turns), "{action:?}");
            if moves {
                assert!((action.translation_axis().length() - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn release_neither_moves_nor_turns() {
        assert_eq!(ControlAction::Release.translation_axis(), Vec3::ZERO);
        assert_eq!(ControlAction::Release.yaw_sign(), 0.0);
    }

    #[test]
    fn opposite_pairs_cancel() {
        let pairs = [
            (ControlAction::MoveXPos, ControlAction::MoveXNeg),
            (ControlAction::MoveZPos, ControlAction::MoveZNeg),
            (ControlAction::Raise, ControlAction::Lower),
        ];
        for (a, b) in pairs {
            assert_eq!(a.translation_axis() + b.translation_axis(), Vec3::ZERO);
        }
        assert_eq!(
            ControlAction::RotateLeft.yaw_sign() + ControlAction::RotateRight.yaw_sign(),
            0.0
        );
    }
}
