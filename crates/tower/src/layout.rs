use glam::Vec3;
use jenga_common::{BlockId, round_tenths};
use serde::{Deserialize, Serialize};

/// Blocks per course.
pub const COURSE_SIZE: usize = 3;

/// Tower generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerConfig {
    /// Number of blocks to stack.
    pub block_count: usize,
    /// Full block extents: x = length, y = height, z = width.
    pub block_size: Vec3,
    /// Seed for cosmetic per-block choices (wood grain). Does not affect layout.
    pub seed: u64,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            block_count: 54,
            block_size: Vec3::new(7.2, 1.4, 2.4),
            seed: 0,
        }
    }
}

/// Placement of one block as produced by the generator.
///
/// `position` is in layout axes. Rotated records are placed as-is with a
/// quarter turn about +Y; unrotated records swap x and z when placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    pub id: BlockId,
    pub course: usize,
    pub size: Vec3,
    pub position: Vec3,
    pub rotated: bool,
}

/// Compute the layout for `config.block_count` blocks.
///
/// Pure function of the config: the same input always yields the same records.
/// A count of zero yields an empty layout.
pub fn generate_layout(config: &TowerConfig) -> Vec<LayoutRecord> {
    let size = config.block_size;
    let height = size.y;
    let width = size.z;

    let records: Vec<LayoutRecord> = (0..config.block_count)
        .map(|index| {
            // Offset follows parity of the tower-wide index, not the slot in the course.
            let mut position = Vec3::ZERO;
            if index % COURSE_SIZE != 0 {
                position.x = if index % 2 == 0 { 2.0 * width } else { width };
            }

            let course = index / COURSE_SIZE;
            position.y = course as f32 * height;

            let rotated = course % 2 == 0;
            if rotated {
                position.x -= width;
                position.z += width;
            }

            LayoutRecord {
                id: BlockId(index),
                course,
                size,
                position: Vec3::new(
                    round_tenths(position.x),
                    round_tenths(position.y),
                    round_tenths(position.z),
                ),
                rotated,
            }
        })
        .collect();

    tracing::debug!(
        blocks = records.len(),
        courses = records.len().div_ceil(COURSE_SIZE),
        "generated tower layout"
    );
    records
}

/// Total height of the stacked courses, bottom face of course 0 to top face of the last.
pub fn tower_height(config: &TowerConfig) -> f32 {
    config.block_count.div_ceil(COURSE_SIZE) as f32 * config.block_size.y
}
