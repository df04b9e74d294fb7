use jenga_physics::WorldConfig;
use jenga_render::SceneSettings;
use jenga_tower::TowerConfig;
use serde::{Deserialize, Serialize};

/// Seconds the physics world advances per frame, whatever the frame took.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Half the edge length of the table plane.
pub const TABLE_HALF_EXTENT: f32 = 500.0;

/// Everything needed to set up a world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JengaConfig {
    pub tower: TowerConfig,
    pub physics: WorldConfig,
    pub scene: SceneSettings,
    /// Height of the table surface, shared by the ground body and the table plane.
    pub table_height: f32,
}

impl Default for JengaConfig {
    fn default() -> Self {
        Self {
            tower: TowerConfig::default(),
            physics: WorldConfig::default(),
            scene: SceneSettings::default(),
            table_height: -0.7,
        }
    }
}

impl JengaConfig {
    pub fn with_blocks(mut self, block_count: usize) -> Self {
        self.tower.block_count = block_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.tower.seed = seed;
        self
    }
}
