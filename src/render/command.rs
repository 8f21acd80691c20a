use crate::actor::Actor;
use crate::render::cull::visible_tiles;
use crate::tile::{TileFlags, TilePos};
use crate::tile_grid::TileGrid;
use macroquad::prelude::*;

/// One blit from a tileset texture to the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub tileset: usize,
    pub src: Rect,
    pub dest: Rect,
    /// Degrees, clockwise about the destination centre.
    pub rotation: f32,
    pub flip_x: bool,
    pub flip_y: bool,
}

/// Rotation and flips for a tile's transform bits. A rotated tile inverts
/// the sense of its horizontal flip.
pub fn tile_transform(flags: TileFlags) -> (f32, bool, bool) {
    let rotation = if flags.rotate { 90.0 } else { 0.0 };
    (rotation, flags.flip_x ^ flags.rotate, flags.flip_y)
}

/// Tile blits for the visible part of every visible layer, cell by cell
/// with layers back to front inside each cell.
pub fn tile_commands(grid: &TileGrid, cam: Vec2, viewport: Vec2) -> Vec<DrawCommand> {
    let (cols, rows) = visible_tiles(grid, cam, viewport);
    let (tw, th) = (grid.tile_w as f32, grid.tile_h as f32);
    let mut out = Vec::new();

    for x in cols {
        for y in rows.clone() {
            let pos = TilePos::new(x as i32, y as i32);
            for layer in grid.layers().iter().filter(|l| l.visible) {
                let Some(image) = layer.get(pos).and_then(|id| grid.image_for(id)) else {
                    continue;
                };
                let (rotation, flip_x, flip_y) = tile_transform(image.flags);
                out.push(DrawCommand {
                    tileset: image.tileset,
                    src: image.src,
                    dest: Rect::new(x as f32 * tw - cam.x, y as f32 * th - cam.y, tw, th),
                    rotation,
                    flip_x,
                    flip_y,
                });
            }
        }
    }
    out
}

/// Actor sprites at their world position, untransformed.
pub fn actor_commands(grid: &TileGrid, actors: &[Actor], cam: Vec2) -> Vec<DrawCommand> {
    actors
        .iter()
        .filter_map(|actor| {
            let image = grid.image_for(actor.sprite?)?;
            let pos = actor.pos.floor() - cam;
            Some(DrawCommand {
                tileset: image.tileset,
                src: image.src,
                dest: Rect::new(pos.x, pos.y, image.src.w, image.src.h),
                rotation: 0.0,
                flip_x: false,
                flip_y: false,
            })
        })
        .collect()
}
