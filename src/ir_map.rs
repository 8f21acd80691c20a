// src/ir_map.rs
use macroquad::prelude::*;

/// Canonical, format-agnostic map.
#[derive(Debug, Clone)]
pub struct IrMap {
    pub width: usize,
    pub height: usize,
    pub tile_w: u32,
    pub tile_h: u32,
    pub background: Option<Color>,
    pub tilesets: Vec<IrTileset>, // must be sorted by first_gid
    pub layers: Vec<IrLayer>,     // draw order: array order
}

/// One image atlas with a regular grid.
#[derive(Debug, Clone)]
pub struct IrTileset {
    pub first_gid: u32,
    pub image: String,
    pub image_w: u32, // 0 if the file did not say
    pub image_h: u32,
    pub tile_w: u32,
    pub tile_h: u32,
    pub tilecount: u32,
    pub columns: u32,
    pub spacing: u32, // 0 if not used
    pub margin: u32,  // 0 if not used
    pub transparent: Option<Color>,
    pub tiles: Vec<IrTileMeta>,
}

/// Per-tile metadata; only the `name` property is consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct IrTileMeta {
    pub id: u32,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub enum IrLayerKind {
    Tiles {
        width: usize,
        height: usize,
        data: Vec<u32>, // raw GIDs (including flip flags ok)
    },
    Objects {
        objects: Vec<IrObject>,
    },
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct IrLayer {
    pub name: String,
    pub visible: bool,
    pub kind: IrLayerKind,
}

/// A placed object. `y` is already the top edge for tile objects.
#[derive(Debug, Clone, PartialEq)]
pub struct IrObject {
    pub id: u32,
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub gid: Option<u32>,
}
