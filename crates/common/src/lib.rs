//! Shared value types used by every jenga crate.
//!
//! # Invariants
//! - Types here are plain data: no engine state, no I/O.

mod types;

pub use types::{BlockId, Pose, round_tenths};
