// src/loader/json_loader.rs
use crate::error::MapError;
use crate::ir_map::*;
use crate::tile::{GID_MASK, MAX_GID, MAX_TILECOUNT};
use macroquad::prelude::*;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" expected here
    #[serde(default)]
    objects: Vec<JsonObject>,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    source: String,
}

#[derive(Deserialize)]
struct JsonMap {
    width: usize,
    height: usize,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    backgroundcolor: Option<String>,
    layers: Vec<JsonLayer>,
    tilesets: Vec<JsonTilesetRef>,
}

#[derive(Deserialize)]
struct ExternalTileset {
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    columns: u32,
    image: String,
    #[serde(default)]
    imagewidth: u32,
    #[serde(default)]
    imageheight: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    transparentcolor: Option<String>,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    gid: Option<u32>,
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

/// Parses `#rrggbb` or `#aarrggbb` (the leading `#` is optional).
pub fn parse_hex_color(text: &str) -> Option<Color> {
    let hex = text.trim_start_matches('#');
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Color::from_rgba(byte(0)?, byte(2)?, byte(4)?, 0xff)),
        8 => Some(Color::from_rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
        _ => None,
    }
}

fn optional_color(value: Option<String>, what: &str) -> Result<Option<Color>, MapError> {
    match value {
        None => Ok(None),
        Some(s) => parse_hex_color(&s)
            .map(Some)
            .ok_or_else(|| MapError::InvalidMap(format!("bad {what} colour '{s}'"))),
    }
}

fn tile_to_ir(tile: JsonTile) -> IrTileMeta {
    let name = tile
        .properties
        .into_iter()
        .find(|p| p.name == "name")
        .and_then(|p| p.value.as_str().map(str::to_owned));
    IrTileMeta { id: tile.id, name }
}

fn object_to_ir(obj: JsonObject) -> IrObject {
    // Tiled anchors tile objects at their bottom-left corner.
    let y = if obj.gid.is_some() {
        obj.y - obj.height
    } else {
        obj.y
    };
    IrObject {
        id: obj.id,
        name: (!obj.name.is_empty()).then_some(obj.name),
        x: obj.x,
        y,
        width: obj.width,
        height: obj.height,
        gid: obj.gid,
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Decodes a Tiled JSON map and its external tilesets. Returns the IR and
/// the directory image paths are relative to.
pub fn decode_map_file_to_ir(path: &Path) -> Result<(IrMap, PathBuf), MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(path.display().to_string()));
    }

    let j: JsonMap = read_json(path)?;

    let map_dir = path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    if j.width == 0 || j.height == 0 || j.tilewidth == 0 || j.tileheight == 0 {
        return Err(MapError::InvalidMap(format!(
            "map {} has zero size",
            path.display()
        )));
    }

    // Build IR tilesets
    let mut ir_tilesets = Vec::with_capacity(j.tilesets.len());
    for ts in &j.tilesets {
        if !ts.source.ends_with(".json") {
            return Err(MapError::InvalidMap(format!(
                "External tileset must be JSON: {}",
                ts.source
            )));
        }
        let ext: ExternalTileset = read_json(&map_dir.join(&ts.source))?;
        if ext.columns == 0 {
            return Err(MapError::InvalidMap(format!(
                "tileset {} has zero columns",
                ts.source
            )));
        }
        if ext.tilecount > MAX_TILECOUNT {
            return Err(MapError::InvalidMap(format!(
                "tileset {} declares {} tiles (max {MAX_TILECOUNT})",
                ts.source, ext.tilecount
            )));
        }
        if ts.firstgid.checked_add(ext.tilecount).map_or(true, |end| end > MAX_GID) {
            return Err(MapError::InvalidMap(format!(
                "tileset {} gids {}+{} exceed {MAX_GID}",
                ts.source, ts.firstgid, ext.tilecount
            )));
        }

        // (We keep image path relative; TileGrid::from_ir joins it with map_dir)
        ir_tilesets.push(IrTileset {
            first_gid: ts.firstgid,
            image: ext.image,
            image_w: ext.imagewidth,
            image_h: ext.imageheight,
            tile_w: ext.tilewidth,
            tile_h: ext.tileheight,
            tilecount: ext.tilecount,
            columns: ext.columns,
            spacing: ext.spacing,
            margin: ext.margin,
            transparent: optional_color(ext.transparentcolor, "transparent")?,
            tiles: ext.tiles.into_iter().map(tile_to_ir).collect(),
        });
    }

    // Sort by first_gid to make LUT building trivial
    ir_tilesets.sort_by_key(|t| t.first_gid);

    let max_gid = ir_tilesets
        .iter()
        .map(|t| t.first_gid + t.tilecount.saturating_sub(1))
        .max()
        .unwrap_or(0);

    // Build IR layers
    let mut ir_layers = Vec::with_capacity(j.layers.len());
    for l in j.layers {
        let layer_name = l.name.clone();
        let layer_kind = match l.kind.as_deref().unwrap_or("tilelayer") {
            "tilelayer" => {
                let expected = l.width.checked_mul(l.height);
                if l.width != j.width || l.height != j.height || expected != Some(l.data.len()) {
                    return Err(MapError::InvalidLayerSize {
                        layer: layer_name,
                        expected: j.width.saturating_mul(j.height),
                        actual: l.data.len(),
                    });
                }
                for &raw_gid in &l.data {
                    let gid = raw_gid & GID_MASK;
                    if gid != 0 && gid > max_gid {
                        return Err(MapError::InvalidTileGid {
                            layer: layer_name,
                            gid,
                            max_gid,
                        });
                    }
                }
                IrLayerKind::Tiles {
                    width: l.width,
                    height: l.height,
                    data: l.data,
                }
            }
            "objectgroup" => IrLayerKind::Objects {
                objects: l
                    .objects
                    .into_iter()
                    .map(|obj| {
                        if let Some(raw_gid) = obj.gid {
                            let gid = raw_gid & GID_MASK;
                            if gid == 0 || gid > max_gid {
                                return Err(MapError::InvalidObjectGid {
                                    layer: layer_name.clone(),
                                    object_id: obj.id,
                                    gid,
                                    max_gid,
                                });
                            }
                        }
                        Ok(object_to_ir(obj))
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            },
            _ => IrLayerKind::Unsupported,
        };
        ir_layers.push(IrLayer {
            name: l.name,
            visible: l.visible,
            kind: layer_kind,
        });
    }

    Ok((
        IrMap {
            width: j.width,
            height: j.height,
            tile_w: j.tilewidth,
            tile_h: j.tileheight,
            background: optional_color(j.backgroundcolor, "background")?,
            tilesets: ir_tilesets,
            layers: ir_layers,
        },
        map_dir,
    ))
}
