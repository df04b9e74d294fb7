use std::fmt::Write as _;

use crate::palette::NO_EMISSIVE;
use crate::scene::{NodeKind, Scene};
use crate::view::RenderView;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view configuration, then produces
/// output. It never mutates the scene; poses are written by the kernel.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Debug text renderer. Stands in for the GPU backend in headless runs.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Scene (nodes={}) ===", scene.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );

        for (handle, node) in scene.nodes() {
            let p = node.pose.position;
            let kind = match node.kind {
                NodeKind::Box { .. } => "box",
                NodeKind::Plane { .. } => "plane",
            };
            let _ = write!(
                out,
                "  [{:>3}] {kind:<5} pos=({:.2}, {:.2}, {:.2})",
                handle.0, p.x, p.y, p.z
            );
            if let Some(id) = node.user_data {
                let _ = write!(out, " block={id}");
            }
            if node.material.emissive != NO_EMISSIVE {
                out.push_str(" *lit*");
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{HIGHLIGHT_EMISSIVE, TABLE_COLOR, WoodGrain};
    use crate::scene::{Material, Node};
    use glam::Vec3;
    use jenga_common::{BlockId, Pose};

    #[test]
    fn debug_renderer_empty_scene() {
        let output = DebugTextRenderer::new().render(&Scene::default(), &RenderView::default());
        assert!(output.contains("nodes=0"));
        assert!(output.contains("fov=75"));
    }

    #[test]
    fn debug_renderer_lists_nodes() {
        let mut scene = Scene::default();
        scene.add(Node::plane(500.0, -0.7, Material::new(TABLE_COLOR)));
        let h = scene.add(
            Node::cuboid(Vec3::new(7.2, 1.4, 2.4), WoodGrain::Dark.material())
                .with_pose(Pose::from_position(Vec3::new(1.0, 2.0, 3.0)))
                .with_user_data(BlockId(4)),
        );
        scene.set_emissive(h, HIGHLIGHT_EMISSIVE).unwrap();

        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("nodes=2"));
        assert!(output.contains("plane"));
        assert!(output.contains("pos=(1.00, 2.00, 3.00) block=#4 *lit*"));
    }
}
