use jenga_common::BlockId;
use jenga_physics::PhysicsBackend;
use jenga_render::{Scene, WoodGrain};
use jenga_tower::{TowerConfig, generate_layout};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::block::Block;

/// The ordered block sequence. `blocks[i].id == BlockId(i)`.
#[derive(Debug, Clone, Default)]
pub struct Tower {
    blocks: Vec<Block>,
}

impl Tower {
    /// Generate the layout and spawn every block into `physics` and `scene`.
    pub fn build<P: PhysicsBackend>(
        config: &TowerConfig,
        physics: &mut P,
        scene: &mut Scene,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let blocks = generate_layout(config)
            .iter()
            .map(|record| {
                let grain = WoodGrain::ALL[rng.random_range(0..WoodGrain::ALL.len())];
                Block::spawn(record, grain, physics, scene)
            })
            .collect();
        Self { blocks }
    }

    /// Remove every block from both engines at once.
    pub fn teardown<P: PhysicsBackend>(&mut self, physics: &mut P, scene: &mut Scene) {
        for block in self.blocks.drain(..) {
            block.despawn(physics, scene);
        }
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    pub fn contains(&self, id: BlockId) -> bool {
        id.index() < self.blocks.len()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }
}
