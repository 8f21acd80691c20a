use crate::tile_grid::TileGrid;
use macroquad::prelude::*;
use std::ops::Range;

/// Extra cells past the viewport so partially visible tiles on the far edge
/// are still drawn.
const CULL_MARGIN_TILES: usize = 2;

/// Cells along one axis that may be visible from `pos`.
pub fn visible_range(pos: f32, tile_size: u32, viewport: f32, ceiling: usize) -> Range<usize> {
    let tile_size = tile_size.max(1) as usize;
    let start = pos.max(0.0) as usize / tile_size;
    let end = (start + viewport.max(0.0) as usize / tile_size + CULL_MARGIN_TILES).min(ceiling);
    start.min(end)..end
}

/// Column and row ranges visible through a viewport whose top-left is `cam`.
pub fn visible_tiles(grid: &TileGrid, cam: Vec2, viewport: Vec2) -> (Range<usize>, Range<usize>) {
    (
        visible_range(cam.x, grid.tile_w, viewport.x, grid.width),
        visible_range(cam.y, grid.tile_h, viewport.y, grid.height),
    )
}
