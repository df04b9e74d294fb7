//! Rendering Adapter: scene graph, camera, picking, renderer-agnostic interface.
//!
//! # Invariants
//! - Node handles are stable for the lifetime of a scene; removal never renumbers.
//! - Picking reports intersections nearest first and never fails on an empty hit list.
//! - Renderers read the scene; they never mutate it.
//!
//! # Workaround
//! Provides a debug text renderer next to the GPU backend so the scene can be
//! inspected headless. The trait is stable; backends swap without changing consumers.

mod palette;
mod pick;
mod renderer;
mod scene;
mod view;

pub use palette::{HIGHLIGHT_EMISSIVE, NO_EMISSIVE, TABLE_COLOR, WoodGrain, rgb};
pub use pick::{Intersection, Ray, ray_box, ray_plane};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{
    Fog, Material, Node, NodeHandle, NodeKind, Rgb, Scene, SceneError, SceneSettings, SpotLight,
};
pub use view::{RenderView, pointer_ndc};
