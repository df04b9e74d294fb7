//! wgpu render backend for the jenga tower.
//!
//! Draws every visible scene node as an instanced box (the table is a thin
//! slab), lit by an ambient term and one spot light, with distance fog and the
//! emissive highlight added on top. The spot light renders a shadow map from
//! the nodes with `cast_shadow`; nodes with `receive_shadow` sample it with
//! 3x3 PCF. The camera orbits the tower.
//!
//! # Invariants
//! - Renderer never mutates the scene.
//! - Camera motion is not part of the sync loop.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::WgpuRenderer;
