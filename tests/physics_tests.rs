// tests/physics_tests.rs

use macroquad::prelude::{vec2, Vec2};
use one_room::config::{PhysicsConfig, GRAVITY, V_JUMP, VY_MAX};
use one_room::ir_map::{IrTileMeta, IrTileset};
use one_room::physics::{SOLID_LAYER, TREASURE_LAYER};
use one_room::{Actor, Layer, Physics, TileGrid, TileId, TilePos};
use std::path::Path;

const W: usize = 10;
const H: usize = 6;
const FLOOR_ROW: usize = 4;
/// y of an actor standing on the floor.
const STANDING_Y: f32 = ((FLOOR_ROW - 1) * 16) as f32;
const STONE: u32 = 1;
const DOOR: u32 = 3;
const GOLD: u32 = 4;
const DT: f32 = 1.0 / 60.0;

/// Floor across rows 4 and 5; `walls` adds solid cells, `gold` treasure.
fn level(walls: &[(usize, usize, u32)], gold: &[(usize, usize)]) -> TileGrid {
    let mut grid = TileGrid::new(W, H, 16, 16);
    grid.add_tileset(
        IrTileset {
            first_gid: 1,
            image: "tiles.png".into(),
            image_w: 64,
            image_h: 16,
            tile_w: 16,
            tile_h: 16,
            tilecount: 4,
            columns: 4,
            spacing: 0,
            margin: 0,
            transparent: None,
            tiles: vec![IrTileMeta { id: 2, name: Some("Door".into()) }],
        },
        Path::new("."),
    )
    .unwrap();

    let mut solid = vec![0; W * H];
    for x in 0..W {
        solid[FLOOR_ROW * W + x] = STONE;
        solid[(FLOOR_ROW + 1) * W + x] = STONE;
    }
    for &(x, y, gid) in walls {
        solid[y * W + x] = gid;
    }
    let mut treasure = vec![0; W * H];
    for &(x, y) in gold {
        treasure[y * W + x] = GOLD;
    }

    grid.add_layer(Layer::new(SOLID_LAYER, W, H, solid).unwrap()).unwrap();
    grid.add_layer(Layer::new(TREASURE_LAYER, W, H, treasure).unwrap()).unwrap();
    grid
}

fn physics(grid: &TileGrid) -> Physics {
    Physics::new(grid, PhysicsConfig::default()).unwrap()
}

fn cell(grid: &TileGrid, layer: &str, x: i32, y: i32) -> TileId {
    let index = grid.layer_index(layer).unwrap();
    grid.tile_at(index, TilePos::new(x, y)).unwrap()
}

#[test]
fn hero_falls_then_lands_on_floor_top() {
    let mut grid = level(&[], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(40.0, STANDING_Y - 3.0))];

    physics.tick(&mut grid, &mut actors, DT);
    assert!(actors[0].vel.y > 0.0, "should be falling");

    let mut last_vy = actors[0].vel.y;
    let mut landed = false;
    for _ in 0..120 {
        physics.tick(&mut grid, &mut actors, DT);
        if actors[0].vel.y == 0.0 {
            landed = true;
            break;
        }
        assert!(actors[0].vel.y > last_vy);
        last_vy = actors[0].vel.y;
    }

    assert!(landed, "never touched the floor");
    assert_eq!(actors[0].pos.y, STANDING_Y);
}

#[test]
fn grounded_actor_stays_put() {
    let mut grid = level(&[], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(40.0, STANDING_Y))];

    for _ in 0..30 {
        physics.tick(&mut grid, &mut actors, DT);
        assert_eq!(actors[0].pos.y, STANDING_Y);
        assert_eq!(actors[0].vel.y, 0.0);
    }
}

#[test]
fn jump_launches_then_gravity_takes_over() {
    let mut grid = level(&[], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(40.0, STANDING_Y))];

    actors[0].jump = true;
    physics.tick(&mut grid, &mut actors, DT);
    assert_eq!(actors[0].vel.y, V_JUMP);

    actors[0].jump = false;
    let mut last_vy = actors[0].vel.y;
    for _ in 0..30 {
        physics.tick(&mut grid, &mut actors, DT);
        let vy = actors[0].vel.y;
        assert!(vy > last_vy, "vy should rise monotonically, {vy} after {last_vy}");
        assert!(vy <= VY_MAX);
        assert!(actors[0].pos.y < STANDING_Y);
        last_vy = vy;
    }
}

#[test]
fn jump_is_ignored_in_the_air() {
    let mut grid = level(&[], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(40.0, 0.0))];
    actors[0].jump = true;

    physics.tick(&mut grid, &mut actors, DT);
    assert!(actors[0].vel.y > 0.0);
}

#[test]
fn ground_drag_slows_horizontal_motion() {
    let mut grid = level(&[], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(40.0, STANDING_Y))];
    actors[0].vel.x = 30.0;

    physics.tick(&mut grid, &mut actors, DT);
    let expected = 30.0 - 30.0 * 2.0 * DT;
    assert!((actors[0].vel.x - expected).abs() < 1e-4);
}

#[test]
fn falling_off_the_map_freezes_the_actor() {
    let mut grid = TileGrid::new(W, H, 16, 16);
    grid.add_layer(Layer::new(SOLID_LAYER, W, H, vec![0; W * H]).unwrap())
        .unwrap();
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(40.0, 80.0))];
    actors[0].vel = vec2(20.0, 30.0);

    let report = physics.tick(&mut grid, &mut actors, DT);
    assert_eq!(report.fell_off, vec![0]);
    assert_eq!(actors[0].vel, Vec2::ZERO);
    assert_eq!(actors[0].mass, 0.0);

    let pos = actors[0].pos;
    let report = physics.tick(&mut grid, &mut actors, DT);
    assert!(report.fell_off.is_empty());
    assert_eq!(actors[0].pos, pos);
}

#[test]
fn blocked_overhead_still_allows_a_jump() {
    // Stones level with the upper sensors; the feet are over empty cells.
    let mut grid = level(&[(2, 2, STONE), (3, 2, STONE)], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(40.0, 34.0)), Actor::new(vec2(40.0, 34.0))];
    actors[0].jump = true;

    physics.tick(&mut grid, &mut actors, DT);
    assert_eq!(actors[0].vel.y, V_JUMP);
    assert_eq!(actors[1].vel.y, 0.0);
    // Not a ledge, so no snap onto a tile top.
    let fallen = 34.0 + (GRAVITY * DT) * DT;
    assert!((actors[1].pos.y - fallen).abs() < 1e-4);
}

#[test]
fn running_off_the_right_edge_kills_the_actor() {
    let mut grid = level(&[], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(150.0, STANDING_Y))];
    actors[0].vel.x = 60.0;

    let report = physics.tick(&mut grid, &mut actors, 0.5);
    assert_eq!(report.fell_off, vec![0]);
    assert_eq!(actors[0].pos.x, grid.width_px());
    assert_eq!(actors[0].vel, Vec2::ZERO);
    assert_eq!(actors[0].mass, 0.0);
}

#[test]
fn treasure_is_collected_once() {
    let mut grid = level(&[], &[(2, 3)]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(40.0, STANDING_Y))];

    let report = physics.tick(&mut grid, &mut actors, DT);
    assert_eq!(report.treasure, vec![TilePos::new(2, 3)]);
    assert!(cell(&grid, TREASURE_LAYER, 2, 3).is_empty());

    let report = physics.tick(&mut grid, &mut actors, DT);
    assert!(report.treasure.is_empty());
    assert!(cell(&grid, TREASURE_LAYER, 2, 3).is_empty());
}

#[test]
fn both_probes_in_one_treasure_cell_count_once() {
    let mut grid = level(&[], &[(2, 3)]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(32.0, STANDING_Y))];

    let report = physics.tick(&mut grid, &mut actors, DT);
    assert_eq!(report.treasure.len(), 1);
}

#[test]
fn door_blocks_until_action() {
    let mut grid = level(&[(4, 3, DOOR)], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(52.0, STANDING_Y))];
    actors[0].vel.x = 10.0;

    let report = physics.tick(&mut grid, &mut actors, DT);
    assert!(report.doors.is_empty());
    assert_eq!(actors[0].pos.x, 50.0);
    assert_eq!(actors[0].vel.x, 0.0);

    actors[0].pos.x = 52.0;
    actors[0].action = true;
    let report = physics.tick(&mut grid, &mut actors, DT);
    assert_eq!(report.doors, vec![TilePos::new(4, 3)]);
    assert!(cell(&grid, SOLID_LAYER, 4, 3).is_empty());
    assert_eq!(actors[0].pos.x, 52.0);
}

#[test]
fn action_does_not_open_plain_walls() {
    let mut grid = level(&[(4, 3, STONE)], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(52.0, STANDING_Y))];
    actors[0].action = true;

    let report = physics.tick(&mut grid, &mut actors, DT);
    assert!(report.doors.is_empty());
    assert_eq!(cell(&grid, SOLID_LAYER, 4, 3), TileId(STONE));
    assert_eq!(actors[0].pos.x, 50.0);
}

#[test]
fn wall_on_the_left_pushes_right() {
    let mut grid = level(&[(1, 3, STONE)], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(20.0, STANDING_Y))];
    actors[0].vel.x = -10.0;

    physics.tick(&mut grid, &mut actors, DT);
    assert_eq!(actors[0].pos.x, 29.0);
    assert_eq!(actors[0].vel.x, 0.0);
}

#[test]
fn walls_on_both_sides_resolve_to_the_right_hand_correction() {
    let mut grid = level(&[(1, 3, STONE), (2, 3, STONE)], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(20.0, STANDING_Y))];

    physics.tick(&mut grid, &mut actors, DT);
    // Left wall alone would give 29; the right-hand check runs last.
    assert_eq!(actors[0].pos.x, 18.0);
    assert_eq!(actors[0].vel.x, 0.0);
}

#[test]
fn substeps_keep_fast_fall_from_tunnelling() {
    let mut grid = level(&[], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(40.0, 8.0))];
    actors[0].vel.y = VY_MAX;

    let report = physics.advance(&mut grid, &mut actors, 2.0);
    assert!(report.fell_off.is_empty());
    assert_eq!(actors[0].pos.y, STANDING_Y);
    assert_eq!(actors[0].vel.y, 0.0);
    assert_eq!(actors[0].mass, 1.0);

    // A single unbounded step falls straight through the floor.
    let mut grid = level(&[], &[]);
    let mut actors = [Actor::new(vec2(40.0, 8.0))];
    actors[0].vel.y = VY_MAX;
    let report = physics.tick(&mut grid, &mut actors, 2.0);
    assert_eq!(report.fell_off, vec![0]);
}

#[test]
fn advance_samples_every_substep() {
    let mut grid = level(&[], &[]);
    let physics = physics(&grid);
    let mut actors = [Actor::new(vec2(40.0, STANDING_Y)), Actor::new(vec2(100.0, STANDING_Y))];

    let report = physics.advance(&mut grid, &mut actors, 0.25);
    assert_eq!(report.samples.len(), 8 * 2 * 6);
}
