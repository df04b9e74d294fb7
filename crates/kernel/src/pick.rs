//! Pick resolver: pointer position to the block under it.

use glam::Vec2;
use jenga_common::BlockId;
use jenga_render::{Intersection, RenderView, Scene};

/// Block tag of the first intersection, if it names a block of the tower.
///
/// An empty hit list, an untagged first hit (the table) and an out-of-range
/// tag all resolve to `None`.
pub fn first_block(hits: &[Intersection], block_count: usize) -> Option<BlockId> {
    let id = hits.first()?.user_data?;
    if id.index() >= block_count {
        tracing::warn!(%id, block_count, "pick hit a tag outside the tower");
        return None;
    }
    Some(id)
}

/// Cast a ray through `ndc` and resolve it to a block.
pub fn resolve_pick(
    scene: &Scene,
    view: &RenderView,
    ndc: Vec2,
    block_count: usize,
) -> Option<BlockId> {
    let hits = scene.intersect(&view.ray(ndc));
    first_block(&hits, block_count)
}
