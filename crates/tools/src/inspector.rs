use glam::Vec3;
use jenga_common::{BlockId, Pose};
use jenga_input::Key;
use jenga_kernel::JengaWorld;
use jenga_physics::PhysicsBackend;

/// Tower inspector for developer tooling.
///
/// Read-only queries for debugging and the desktop side panel.
pub struct TowerInspector;

impl TowerInspector {
    /// Produce a summary of the tower and selection.
    pub fn summary<P: PhysicsBackend>(world: &JengaWorld<P>) -> TowerSummary {
        let displaced = Self::displaced_blocks(world).len();
        TowerSummary {
            frame: world.frame_count(),
            block_count: world.tower().len(),
            hovered: world.selection().hovered(),
            controlled: world.selection().controlled(),
            active_key: world.selection().active_key(),
            displaced,
        }
    }

    /// Both proxies of one block side by side.
    pub fn inspect_block<P: PhysicsBackend>(
        world: &JengaWorld<P>,
        id: BlockId,
    ) -> Option<BlockInfo> {
        let (block, visual, body) = match (world.block(id), world.visual_pose(id), world.body(id)) {
            (Ok(block), Ok(visual), Ok(body)) => (block, visual, body),
            _ => {
                tracing::trace!(%id, "inspect: unknown block");
                return None;
            }
        };
        Some(BlockInfo {
            id,
            grain: block.grain.name(),
            visual,
            physics: body.pose(),
            velocity: body.velocity,
            angular_velocity: body.angular_velocity,
            drift: visual.position.distance(body.position),
            controlled: world.selection().controlled() == Some(id),
        })
    }

    /// Ids of blocks that have moved off their starting spot.
    pub fn displaced_blocks<P: PhysicsBackend>(world: &JengaWorld<P>) -> Vec<BlockId> {
        world
            .tower()
            .iter()
            .filter(|b| {
                b.visual_pose(world.scene())
                    .is_some_and(|p| p.position.distance(b.initial.position) > b.size.y)
            })
            .map(|b| b.id)
            .collect()
    }
}

/// Summary of the tower for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct TowerSummary {
    pub frame: u64,
    pub block_count: usize,
    pub hovered: Option<BlockId>,
    pub controlled: Option<BlockId>,
    pub active_key: Option<Key>,
    /// Blocks more than one block height away from where they started.
    pub displaced: usize,
}

fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl std::fmt::Display for TowerSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tower: frame={} blocks={} hovered={} controlled={} key={} displaced={}",
            self.frame,
            self.block_count,
            or_dash(self.hovered),
            or_dash(self.controlled),
            or_dash(self.active_key),
            self.displaced
        )
    }
}

/// Detailed info about a single block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInfo {
    pub id: BlockId,
    pub grain: &'static str,
    pub visual: Pose,
    pub physics: Pose,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Distance between the node and body positions.
    pub drift: f32,
    pub controlled: bool,
}

impl std::fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.visual.position;
        let (yaw, _, _) = self.visual.rotation.to_euler(glam::EulerRot::YXZ);
        let v = self.velocity;
        write!(f, "Block {} ({}) ", self.id, self.grain)?;
        write!(f, "pos=({:.2}, {:.2}, {:.2}) yaw={:.2} ", p.x, p.y, p.z, yaw)?;
        write!(f, "vel=({:.2}, {:.2}, {:.2}) drift={:.3}", v.x, v.y, v.z, self.drift)?;
        if self.controlled {
            write!(f, " [held]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jenga_input::InputEvent;
    use jenga_kernel::JengaConfig;

    fn world(blocks: usize) -> JengaWorld {
        JengaWorld::new(JengaConfig::default().with_blocks(blocks))
    }

    #[test]
    fn summary_fresh_tower() {
        let summary = TowerInspector::summary(&world(54));
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.block_count, 54);
        assert_eq!(summary.controlled, None);
        assert_eq!(summary.displaced, 0);
    }

    #[test]
    fn summary_tracks_selection_and_displacement() {
        let mut w = world(9);
        w.select(BlockId(8)).unwrap();
        w.push_input(InputEvent::KeyDown(Key::Space));
        for _ in 0..20 {
            w.frame();
        }
        let summary = TowerInspector::summary(&w);
        assert_eq!(summary.frame, 20);
        assert_eq!(summary.controlled, Some(BlockId(8)));
        assert_eq!(summary.active_key, Some(Key::Space));
        assert!(summary.displaced >= 1);
        assert!(TowerInspector::displaced_blocks(&w).contains(&BlockId(8)));
    }

    #[test]
    fn inspect_block_found() {
        let w = world(3);
        let info = TowerInspector::inspect_block(&w, BlockId(0)).unwrap();
        assert!(info.visual.position.abs_diff_eq(Vec3::new(-2.4, 0.0, 2.4), 1e-6));
        assert_eq!(info.drift, 0.0);
        assert!(!info.controlled);
    }

    #[test]
    fn inspect_block_not_found() {
        assert!(TowerInspector::inspect_block(&world(3), BlockId(3)).is_none());
    }

    #[test]
    fn inspect_block_gone_after_rebuild() {
        let mut w = world(6);
        assert!(TowerInspector::inspect_block(&w, BlockId(5)).is_some());
        w.rebuild(jenga_tower::TowerConfig {
            block_count: 3,
            ..jenga_tower::TowerConfig::default()
        });
        assert!(TowerInspector::inspect_block(&w, BlockId(5)).is_none());
        assert!(TowerInspector::inspect_block(&w, BlockId(2)).is_some());
    }

    #[test]
    fn held_block_has_no_drift_or_velocity() {
        let mut w = world(6);
        w.select(BlockId(4)).unwrap();
        w.push_input(InputEvent::KeyDown(Key::D));
        w.frame();
        let info = TowerInspector::inspect_block(&w, BlockId(4)).unwrap();
        assert!(info.controlled);
        assert_eq!(info.drift, 0.0);
        assert_eq!(info.velocity, Vec3::ZERO);
        assert!(info.to_string().contains("[held]"));
    }

    #[test]
    fn summary_display() {
        let s = format!("{}", TowerInspector::summary(&world(3)));
        assert!(s.contains("frame=0"));
        assert!(s.contains("controlled=-"));
    }
}
