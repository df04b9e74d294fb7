//! Developer Tooling: read-only tower inspector.
//!
//! # Invariants
//! - Tools never mutate the world.

mod inspector;

pub use inspector::{BlockInfo, TowerInspector, TowerSummary};
