//! Physics collaborator: rigid bodies, a fixed-step world, and the backend seam.
//!
//! # Invariants
//! - Bodies are addressed by stable handles; removing one never renumbers others.
//! - `step` advances by exactly the given timestep. No accumulation happens here.
//! - A body with zero mass is static: it is never moved by the solver.
//!
//! # Workaround
//! `BoxWorld` is a position-based solver for boxes on a ground plane. It keeps a
//! tower standing and lets blocks be pushed around; it does not model contact
//! torques. Any engine can stand in by implementing [`PhysicsBackend`].

mod backend;
mod body;
mod contact;
mod world;

pub use backend::{PhysicsBackend, PhysicsError};
pub use body::{BodyDesc, BodyHandle, PhysicsMaterial, RigidBody, Shape};
pub use contact::{Contact, contact_between, cuboid_cuboid};
pub use world::{BoxWorld, WorldConfig};
