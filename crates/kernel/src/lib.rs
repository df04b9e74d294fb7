//! Jenga Kernel: blocks, selection, manual control and the physics-visual sync loop.
//!
//! # Invariants
//! - Each block pairs exactly one scene node with exactly one rigid body.
//! - At most one block is under manual control.
//! - A block is highlighted iff it is hovered or controlled.
//! - Every frame copies each block's pose in exactly one direction, chosen by
//!   the controlled block at the start of the frame.
//! - The controlled block leaves every frame with zero linear and angular velocity.
//! - Input only mutates selection state; poses change inside `frame()`.

pub mod block;
pub mod config;
pub mod control;
pub mod error;
pub mod pick;
pub mod selection;
pub mod sync;
pub mod tower;
pub mod world;

pub use block::Block;
pub use config::{FIXED_TIMESTEP, JengaConfig};
pub use control::{ControlOutcome, ManualControl};
pub use error::KernelError;
pub use pick::{first_block, resolve_pick};
pub use selection::{ControlState, Selection};
pub use sync::{SyncDirection, reconcile};
pub use tower::Tower;
pub use world::{FrameReport, JengaWorld, WorldEvent};
