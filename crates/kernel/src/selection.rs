//! Selection state machine: hover, manual control and the active key.

use jenga_common::BlockId;
use jenga_input::{ActiveKey, Key};
use jenga_render::{HIGHLIGHT_EMISSIVE, NO_EMISSIVE, Scene};

use crate::tower::Tower;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    Controlling(BlockId),
}

/// Single authoritative selection record, owned by the world.
///
/// Transitions return the blocks whose highlight may have changed; the caller
/// passes them to [`Selection::apply_highlights`].
#[derive(Debug, Clone, Default)]
pub struct Selection {
    hovered: Option<BlockId>,
    control: ControlState,
    active_key: ActiveKey,
}

impl Selection {
    pub fn hovered(&self) -> Option<BlockId> {
        self.hovered
    }

    pub fn state(&self) -> ControlState {
        self.control
    }

    pub fn controlled(&self) -> Option<BlockId> {
        match self.control {
            ControlState::Idle => None,
            ControlState::Controlling(id) => Some(id),
        }
    }

    pub fn active_key(&self) -> Option<Key> {
        self.active_key.get()
    }

    pub fn is_highlighted(&self, id: BlockId) -> bool {
        self.hovered == Some(id) || self.controlled() == Some(id)
    }

    /// Pointer click resolved to `pick`. A miss changes nothing.
    pub fn click(&mut self, pick: Option<BlockId>) -> Vec<BlockId> {
        let Some(id) = pick else {
            return Vec::new();
        };
        let previous = self.controlled();
        self.control = ControlState::Controlling(id);
        tracing::debug!(%id, ?previous, "block controlled");
        previous.into_iter().chain([id]).collect()
    }

    /// Hand the controlled block back to physics. No-op while idle.
    pub fn release(&mut self) -> Vec<BlockId> {
        let Some(id) = self.controlled() else {
            return Vec::new();
        };
        self.control = ControlState::Idle;
        self.active_key.clear();
        tracing::debug!(%id, "block released");
        vec![id]
    }

    /// Pointer moved over `pick`.
    pub fn hover(&mut self, pick: Option<BlockId>) -> Vec<BlockId> {
        if self.hovered == pick {
            return Vec::new();
        }
        let previous = std::mem::replace(&mut self.hovered, pick);
        tracing::debug!(?previous, ?pick, "hover changed");
        previous.into_iter().chain(pick).collect()
    }

    pub fn key_down(&mut self, key: Key) {
        if let Some(replaced) = self.active_key.press(key) {
            tracing::debug!(%key, %replaced, "active key replaced");
        } else {
            tracing::debug!(%key, "key active");
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.active_key.release(key);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set each touched block's emissive tint from the current state.
    pub fn apply_highlights(&self, touched: &[BlockId], tower: &Tower, scene: &mut Scene) {
        for &id in touched {
            let Some(block) = tower.get(id) else {
                tracing::warn!(%id, "highlight for a block outside the tower");
                continue;
            };
            let emissive = if self.is_highlighted(id) {
                HIGHLIGHT_EMISSIVE
            } else {
                NO_EMISSIVE
            };
            if let Err(err) = scene.set_emissive(block.visual, emissive) {
                tracing::warn!(%id, %err, "highlight skipped");
            }
        }
    }
}
