pub mod command;
pub mod cull;
pub mod textures;

use crate::actor::Actor;
use crate::tile_grid::TileGrid;
use command::{actor_commands, tile_commands, DrawCommand};
use macroquad::prelude::*;
use textures::TileTextures;

const DEBUG_POINT_COLOR: Color = RED;
const HUD_FONT_SIZE: f32 = 16.0;

/// Draws the visible map, actors and the optional collision overlay.
pub struct Renderer {
    textures: TileTextures,
    pub debug: bool,
}

impl Renderer {
    pub fn new(textures: TileTextures, debug: bool) -> Self {
        Renderer { textures, debug }
    }

    /// `samples` is drained every call, drawn first when debugging.
    pub fn render(
        &self,
        grid: &TileGrid,
        actors: &[Actor],
        camera_pos: Vec2,
        viewport: Vec2,
        samples: &mut Vec<Vec2>,
    ) {
        let cam = camera_pos.floor();
        clear_background(grid.background.unwrap_or(BLACK));

        for cmd in tile_commands(grid, cam, viewport) {
            self.draw(&cmd);
        }
        for cmd in actor_commands(grid, actors, cam) {
            self.draw(&cmd);
        }

        for p in samples.drain(..) {
            if self.debug {
                draw_rectangle(p.x - cam.x, p.y - cam.y, 1.0, 1.0, DEBUG_POINT_COLOR);
            }
        }
    }

    fn draw(&self, cmd: &DrawCommand) {
        let Some(tex) = self.textures.get(cmd.tileset) else {
            return;
        };
        draw_texture_ex(
            tex,
            cmd.dest.x,
            cmd.dest.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(cmd.dest.w, cmd.dest.h)),
                source: Some(cmd.src),
                rotation: cmd.rotation.to_radians(),
                flip_x: cmd.flip_x,
                flip_y: cmd.flip_y,
                pivot: None,
            },
        );
    }
}

pub fn draw_hud(treasure: usize, viewport: Vec2) {
    let text = format!("Treasure: {treasure}");
    let size = measure_text(&text, None, HUD_FONT_SIZE as u16, 1.0);
    draw_text(&text, viewport.x - size.width - 4.0, HUD_FONT_SIZE, HUD_FONT_SIZE, WHITE);
}
