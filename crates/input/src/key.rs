use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Keys the tower understands, independent of the windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Q,
    E,
    Space,
    ControlLeft,
    Enter,
    /// Any key without a binding.
    Other,
}

impl Key {
    pub const ALL: [Key; 14] = [
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
        Key::Space,
        Key::ControlLeft,
        Key::Enter,
        Key::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::W => "KeyW",
            Key::A => "KeyA",
            Key::S => "KeyS",
            Key::D => "KeyD",
            Key::Q => "KeyQ",
            Key::E => "KeyE",
            Key::Space => "Space",
            Key::ControlLeft => "ControlLeft",
            Key::Enter => "Enter",
            Key::Other => "Other",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown key name `{0}`")]
pub struct ParseKeyError(pub String);

impl FromStr for Key {
    type Err = ParseKeyError;

    /// Accepts the key-code names (`KeyW`, `ArrowUp`) and bare letters (`w`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Key::ALL
            .into_iter()
            .filter(|k| *k != Key::Other)
            .find(|k| {
                let name = k.name();
                name.eq_ignore_ascii_case(wanted)
                    || name
                        .strip_prefix("Key")
                        .is_some_and(|letter| letter.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| ParseKeyError(wanted.to_string()))
    }
}

/// The single most recently pressed, not yet released key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveKey(Option<Key>);

impl ActiveKey {
    pub fn get(&self) -> Option<Key> {
        self.0
    }

    /// Make `key` the active key. Returns the key it replaced.
    pub fn press(&mut self, key: Key) -> Option<Key> {
        self.0.replace(key)
    }

    /// Clear the active key if it is `key`. Returns whether anything changed.
    pub fn release(&mut self, key: Key) -> bool {
        if self.0 == Some(key) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_names_and_letters() {
        assert_eq!("KeyW".parse::<Key>(), Ok(Key::W));
        assert_eq!("w".parse::<Key>(), Ok(Key::W));
        assert_eq!("arrowleft".parse::<Key>(), Ok(Key::ArrowLeft));
        assert_eq!(" Enter ".parse::<Key>(), Ok(Key::Enter));
        assert!("Other".parse::<Key>().is_err());
        assert_eq!("F13".parse::<Key>(), Err(ParseKeyError("F13".into())));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for key in Key::ALL.into_iter().filter(|k| *k != Key::Other) {
            assert_eq!(key.to_string().parse::<Key>(), Ok(key));
        }
    }

    #[test]
    fn second_press_replaces_first() {
        let mut active = ActiveKey::default();
        assert_eq!(active.press(Key::W), None);
        assert_eq!(active.press(Key::D), Some(Key::W));
        assert_eq!(active.get(), Some(Key::D));

        // W is no longer active; lifting it must not stop D.
        assert!(!active.release(Key::W));
        assert_eq!(active.get(), Some(Key::D));
        assert!(active.release(Key::D));
        assert_eq!(active.get(), None);
    }

    fn key_strategy() -> impl Strategy<Value = Key> {
        prop::sample::select(Key::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn active_key_is_last_pressed_still_held(
            ops in prop::collection::vec((any::<bool>(), key_strategy()), 0..40)
        ) {
            let mut active = ActiveKey::default();
            let mut last_pressed: Option<Key> = None;
            for (down, key) in ops {
                if down {
                    active.press(key);
                    last_pressed = Some(key);
                } else {
                    active.release(key);
                    if last_pressed == Some(key) {
                        last_pressed = None;
                    }
                }
                prop_assert_eq!(active.get(), last_pressed);
            }
        }
    }
}
