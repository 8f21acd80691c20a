use crate::actor::{find_hero, Actor};
use crate::camera::Camera;
use crate::config::GameConfig;
use crate::error::MapError;
use crate::input::InputSnapshot;
use crate::physics::Physics;
use crate::tile_grid::TileGrid;
use macroquad::prelude::*;
use tracing::info;

/// All per-level state owned by the game loop.
pub struct Game {
    pub grid: TileGrid,
    pub actors: Vec<Actor>,
    pub camera: Camera,
    pub physics: Physics,
    pub hero: Option<usize>,
    pub treasure: usize,
    /// Probe points since the last render.
    pub samples: Vec<Vec2>,
}

impl Game {
    pub fn new(grid: TileGrid, config: &GameConfig) -> Result<Self, MapError> {
        let physics = Physics::new(&grid, config.physics)?;
        let actors: Vec<Actor> = grid.objects().iter().map(Actor::from_object).collect();
        let hero = find_hero(&actors, &config.hero_name);
        info!(actors = actors.len(), hero = ?hero, "spawned actors");

        let camera = Camera::new(
            config.screen_size(),
            config.camera_slack,
            vec2(grid.width_px(), grid.height_px()),
        );

        let mut game = Game {
            grid,
            actors,
            camera,
            physics,
            hero,
            treasure: 0,
            samples: Vec::new(),
        };
        game.follow_hero();
        Ok(game)
    }

    /// Input, physics, then camera.
    pub fn update(&mut self, input: &InputSnapshot, frame_dt: f32) {
        if let Some(hero) = self.hero.and_then(|i| self.actors.get_mut(i)) {
            hero.control(input, self.physics.config.accel, frame_dt);
        }

        let report = self.physics.advance(&mut self.grid, &mut self.actors, frame_dt);
        if !report.treasure.is_empty() {
            self.treasure += report.treasure.len();
            info!(total = self.treasure, "treasure collected");
        }
        self.samples.extend(report.samples);

        self.follow_hero();
    }

    fn follow_hero(&mut self) {
        let Some(hero) = self.hero.and_then(|i| self.actors.get(i)) else {
            return;
        };
        let half_tile = vec2(self.grid.tile_w as f32, self.grid.tile_h as f32) / 2.0;
        self.camera.look_at(hero.pos + half_tile);
    }
}
