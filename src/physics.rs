use crate::actor::Actor;
use crate::config::PhysicsConfig;
use crate::error::MapError;
use crate::tile::{TileId, TilePos};
use crate::tile_grid::TileGrid;
use crate::util::clamp;
use macroquad::prelude::*;
use tracing::{debug, warn};

pub const SOLID_LAYER: &str = "Solid";
pub const TREASURE_LAYER: &str = "Treasure";

/// Distance between the foot probes and the ledge probes above them.
const LEDGE_PROBE_RISE: f32 = 6.0;
/// Half-width of the interaction probes, roughly the sprite's visible width.
const ACTION_PROBE_HALF_WIDTH: f32 = 5.0;
const ACTION_PROBE_RISE: f32 = 4.0;

/// What happened during one or more ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Every probe point sampled, in world pixels. Consumed by the debug overlay.
    pub samples: Vec<Vec2>,
    /// Treasure cells cleared.
    pub treasure: Vec<TilePos>,
    /// Door cells opened.
    pub doors: Vec<TilePos>,
    /// Indices of actors that left the map this tick.
    pub fell_off: Vec<usize>,
}

impl TickReport {
    pub fn merge(&mut self, other: TickReport) {
        self.samples.extend(other.samples);
        self.treasure.extend(other.treasure);
        self.doors.extend(other.doors);
        self.fell_off.extend(other.fell_off);
    }
}

/// Gravity, drag and tile collision against the "Solid" layer.
#[derive(Debug, Clone)]
pub struct Physics {
    pub config: PhysicsConfig,
    solid: usize,
    treasure: Option<usize>,
}

impl Physics {
    pub fn new(grid: &TileGrid, config: PhysicsConfig) -> Result<Self, MapError> {
        let solid = grid
            .layer_index(SOLID_LAYER)
            .ok_or_else(|| MapError::MissingLayer(SOLID_LAYER.to_owned()))?;
        Ok(Physics {
            config,
            solid,
            treasure: grid.layer_index(TREASURE_LAYER),
        })
    }

    /// Runs `tick` in equal steps no longer than `max_step`, so a stalled
    /// frame cannot carry an actor through thin geometry.
    pub fn advance(&self, grid: &mut TileGrid, actors: &mut [Actor], frame_dt: f32) -> TickReport {
        let frame_dt = frame_dt.max(0.0);
        let steps = if self.config.max_step > 0.0 {
            (frame_dt / self.config.max_step).ceil().max(1.0) as u32
        } else {
            1
        };
        let dt = frame_dt / steps as f32;

        let mut report = TickReport::default();
        for _ in 0..steps {
            report.merge(self.tick(grid, actors, dt));
        }
        report
    }

    /// One integration step over every actor, in order.
    pub fn tick(&self, grid: &mut TileGrid, actors: &mut [Actor], dt: f32) -> TickReport {
        let mut report = TickReport::default();
        for (i, actor) in actors.iter_mut().enumerate() {
            let was_on_map = !actor.is_off_map();
            self.integrate(grid, actor, dt);
            self.collide(grid, actor, dt, &mut report);
            if was_on_map && actor.is_off_map() {
                warn!(actor = i, name = ?actor.name, pos = ?actor.pos, "actor fell off the map");
                report.fell_off.push(i);
            }
        }
        report
    }

    /// Velocity clamp, gravity, motion, then clamp into the map.
    pub fn integrate(&self, grid: &TileGrid, actor: &mut Actor, dt: f32) {
        let c = &self.config;
        actor.vel.x = actor.vel.x.clamp(-c.vx_max, c.vx_max);
        if actor.mass > 0.0 {
            actor.vel.y = (actor.vel.y + c.gravity * dt).min(c.vy_max);
        }

        actor.pos.y += actor.vel.y * dt;
        actor.pos.x += actor.vel.x * dt;

        actor.pos.x = clamp(actor.pos.x, 0.0, grid.width_px());
        actor.pos.y = clamp(actor.pos.y, 0.0, grid.height_px());
    }

    /// Probes the tiles around the actor's feet and resolves landing, jumping,
    /// pickups, doors and walls. Probe points are appended to `report.samples`.
    pub fn collide(&self, grid: &mut TileGrid, actor: &mut Actor, dt: f32, report: &mut TickReport) {
        let tw = grid.tile_w as f32;
        let th = grid.tile_h as f32;
        let center = vec2(actor.pos.x.floor() + tw / 2.0, actor.pos.y.floor() + th / 2.0);
        let quarter = tw / 4.0;

        // bottom-left, bottom-right, upper-left, upper-right
        let foot = actor.pos.y + th;
        let ledge = foot - LEDGE_PROBE_RISE;
        let points = [
            vec2(center.x - quarter, foot),
            vec2(center.x + quarter, foot),
            vec2(center.x - quarter, ledge),
            vec2(center.x + quarter, ledge),
        ];
        report.samples.extend(points);
        let tiles = points.map(|p| to_tile(p, tw, th));

        if tiles.iter().any(|&t| !grid.contains(t)) {
            actor.vel = Vec2::ZERO;
            actor.mass = 0.0;
            return;
        }

        let sensors = tiles.map(|t| self.is_solid(grid, t));
        let left_ledge = sensors[0] && !sensors[2];
        let right_ledge = sensors[1] && !sensors[3];
        if left_ledge || right_ledge {
            let on_tile = if left_ledge { tiles[0] } else { tiles[1] };
            actor.vel.x -= actor.vel.x * self.config.drag * dt;
            actor.vel.y = 0.0;
            // stand in the cell above the one underfoot
            actor.pos.y = (on_tile.y - 1) as f32 * th;
        }
        if sensors.iter().any(|&s| s) {
            actor.vel.y = if actor.jump { self.config.v_jump } else { 0.0 };
        }

        let probe_y = actor.pos.y + th - ACTION_PROBE_RISE;
        let probes = [
            vec2(center.x - ACTION_PROBE_HALF_WIDTH, probe_y),
            vec2(center.x + ACTION_PROBE_HALF_WIDTH, probe_y),
        ];
        report.samples.extend(probes);
        let probe_tiles = probes.map(|p| to_tile(p, tw, th));

        if let Some(treasure) = self.treasure {
            for pos in probe_tiles {
                // A cleared cell reads as empty, so a shared tile is taken once.
                if take_tile(grid, treasure, pos) {
                    debug!(x = pos.x, y = pos.y, "treasure collected");
                    report.treasure.push(pos);
                }
            }
        }

        let mut walls = [false; 2];
        for (wall, pos) in walls.iter_mut().zip(probe_tiles) {
            let Some(id) = grid.tile_at(self.solid, pos).filter(|id| !id.is_empty()) else {
                continue;
            };
            if actor.action && grid.is_door(id) {
                take_tile(grid, self.solid, pos);
                debug!(x = pos.x, y = pos.y, "door opened");
                report.doors.push(pos);
                continue;
            }
            *wall = true;
        }

        // Evaluated independently; when both hit, the right-hand wall wins.
        if walls[0] {
            actor.pos.x = (probe_tiles[0].x + 1) as f32 * tw - tw / 2.0 + ACTION_PROBE_HALF_WIDTH;
            actor.vel.x = 0.0;
        }
        if walls[1] {
            actor.pos.x = probe_tiles[1].x as f32 * tw - tw / 2.0 - ACTION_PROBE_HALF_WIDTH - 1.0;
            actor.vel.x = 0.0;
        }
    }

    fn is_solid(&self, grid: &TileGrid, pos: TilePos) -> bool {
        grid.tile_at(self.solid, pos).is_some_and(|id| !id.is_empty())
    }
}

#[inline]
fn to_tile(p: Vec2, tw: f32, th: f32) -> TilePos {
    TilePos::new((p.x / tw).floor() as i32, (p.y / th).floor() as i32)
}

/// Clears a non-empty cell. Returns whether anything was there.
fn take_tile(grid: &mut TileGrid, layer: usize, pos: TilePos) -> bool {
    let occupied = grid.tile_at(layer, pos).is_some_and(|id| !id.is_empty());
    occupied && grid.layer_mut(layer).is_some_and(|l| l.set(pos, TileId::EMPTY))
}
