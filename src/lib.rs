//! One Room: a small tile-grid platformer on Macroquad.
//!
//! Maps are Tiled JSON files. Actors spawn from placed objects, collide
//! with the "Solid" layer, pick up cells of the "Treasure" layer and open
//! tiles named "Door". A slack-box camera follows the hero and only the
//! visible part of the map is drawn.

pub mod actor;
pub mod camera;
pub mod config;
mod error;
pub mod game;
pub mod input;
pub mod ir_map;
mod loader {
    pub mod json_loader;
}
pub mod physics;
pub mod render;
pub mod tile;
pub mod tile_grid;
pub mod util;

pub use actor::Actor;
pub use camera::Camera;
pub use config::{GameConfig, PhysicsConfig};
pub use error::MapError;
pub use game::Game;
pub use input::InputSnapshot;
pub use loader::json_loader::{decode_map_file_to_ir, parse_hex_color};
pub use physics::{Physics, TickReport};
pub use tile::{TileFlags, TileId, TilePos};
pub use tile_grid::{Layer, PlacedObject, TileGrid, TileImage};
