//! Input surface: windowing-independent keys mapped to manual-control actions.
//!
//! # Invariants
//! - At most one key is active at a time; the last key pressed wins.
//! - Releasing a key that is not the active key changes nothing.
//! - Input reaches the world only as queued [`InputEvent`]s.

pub mod action;
pub mod bindings;
pub mod key;

pub use action::{ControlAction, InputEvent};
pub use bindings::KeyBindings;
pub use key::{ActiveKey, Key, ParseKeyError};
