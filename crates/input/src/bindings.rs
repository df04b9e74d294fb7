use std::collections::HashMap;

use crate::action::ControlAction;
use crate::key::Key;

/// Maps keys to manual-control actions. Several keys may share an action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    key_to_action: HashMap<Key, ControlAction>,
}

impl Default for KeyBindings {
    /// Arrows and WASD translate in the horizontal plane, Space/ControlLeft
    /// raise and lower, E/Q turn, Enter releases.
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind(Key::ArrowUp, ControlAction::MoveZPos);
        bindings.bind(Key::W, ControlAction::MoveZPos);
        bindings.bind(Key::ArrowDown, ControlAction::MoveZNeg);
        bindings.bind(Key::S, ControlAction::MoveZNeg);
        bindings.bind(Key::ArrowLeft, ControlAction::MoveXNeg);
        bindings.bind(Key::A, ControlAction::MoveXNeg);
        bindings.bind(Key::ArrowRight, ControlAction::MoveXPos);
        bindings.bind(Key::D, ControlAction::MoveXPos);
        bindings.bind(Key::Space, ControlAction::Raise);
        bindings.bind(Key::ControlLeft, ControlAction::Lower);
        bindings.bind(Key::E, ControlAction::RotateLeft);
        bindings.bind(Key::Q, ControlAction::RotateRight);
        bindings.bind(Key::Enter, ControlAction::Release);
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            key_to_action: HashMap::new(),
        }
    }

    /// Bind `key` to `action`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: Key, action: ControlAction) -> Option<ControlAction> {
        let previous = self.key_to_action.insert(key, action);
        if let Some(old) = previous.filter(|old| *old != action) {
            tracing::debug!(%key, ?old, ?action, "key rebound");
        }
        previous
    }

    pub fn unbind(&mut self, key: Key) -> Option<ControlAction> {
        self.key_to_action.remove(&key)
    }

    pub fn action_for(&self, key: Key) -> Option<ControlAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Keys bound to `action`, in stable order.
    pub fn keys_for(&self, action: ControlAction) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .key_to_action
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect();
        keys.sort();
        keys
    }

    pub fn is_bound(&self, key: Key) -> bool {
        self.key_to_action.contains_key(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_cover_every_action() {
        let bindings = KeyBindings::default();
        for action in ControlAction::ALL {
            assert!(!bindings.keys_for(action).is_empty(), "{action:?} unbound");
        }
        assert!(!bindings.is_bound(Key::Other));
    }

    #[test]
    fn arrows_and_letters_agree() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for(Key::ArrowUp), bindings.action_for(Key::W));
        assert_eq!(bindings.action_for(Key::ArrowLeft), Some(ControlAction::MoveXNeg));
        assert_eq!(bindings.action_for(Key::E), Some(ControlAction::RotateLeft));
        assert_eq!(bindings.action_for(Key::Enter), Some(ControlAction::Release));
        assert_eq!(
            bindings.keys_for(ControlAction::MoveZNeg),
            vec![Key::ArrowDown, Key::S]
        );
    }

    #[test]
    fn rebinding_replaces() {
        let mut bindings = KeyBindings::default();
        let old = bindings.bind(Key::Q, ControlAction::Release);
        assert_eq!(old, Some(ControlAction::RotateRight));
        assert!(bindings.keys_for(ControlAction::RotateRight).is_empty());
        assert_eq!(bindings.unbind(Key::Q), Some(ControlAction::Release));
        assert_eq!(bindings.action_for(Key::Q), None);
    }
}
