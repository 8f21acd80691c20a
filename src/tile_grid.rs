use crate::error::MapError;
use crate::ir_map::*;
use crate::loader::json_loader::decode_map_file_to_ir;
use crate::tile::{TileFlags, TileId, TilePos, MAX_GID, MAX_TILECOUNT};
use macroquad::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One named grid of tile ids, row-major.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl Layer {
    pub fn new(name: impl Into<String>, width: usize, height: usize, data: Vec<u32>) -> Result<Self, MapError> {
        let name = name.into();
        if width.checked_mul(height) != Some(data.len()) {
            return Err(MapError::InvalidLayerSize {
                layer: name,
                expected: width.saturating_mul(height),
                actual: data.len(),
            });
        }
        Ok(Layer {
            name,
            visible: true,
            width,
            height,
            data,
        })
    }

    #[inline]
    fn index(&self, pos: TilePos) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        in_bounds.then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// `None` outside the grid; `Some(TileId::EMPTY)` for an empty cell.
    pub fn get(&self, pos: TilePos) -> Option<TileId> {
        self.index(pos).map(|i| TileId(self.data[i]))
    }

    /// Writes a cell. Returns false when `pos` is outside the grid.
    pub fn set(&mut self, pos: TilePos, id: TileId) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.data[i] = id.raw();
                true
            }
            None => false,
        }
    }
}

/// Tileset geometry plus the resolved image path.
#[derive(Debug, Clone)]
pub struct TilesetInfo {
    pub tilecount: u32,
    pub cols: u32,
    pub image: PathBuf,
    pub tile_w: u32,
    pub tile_h: u32,
    pub spacing: u32,
    pub margin: u32,
    pub transparent: Option<Color>,
}

impl TilesetInfo {
    /// Top-left corner of a tile's region, `None` if it does not fit in u32.
    fn region_origin(&self, local: u32) -> Option<(u32, u32)> {
        let col = local.checked_rem(self.cols)?;
        let row = local.checked_div(self.cols)?;
        let x = col
            .checked_mul(self.tile_w.checked_add(self.spacing)?)?
            .checked_add(self.margin)?;
        let y = row
            .checked_mul(self.tile_h.checked_add(self.spacing)?)?
            .checked_add(self.margin)?;
        Some((x, y))
    }

    /// Fails on the first tile whose region is not inside a `image_w` x
    /// `image_h` image.
    pub fn check_image_size(&self, image_w: u32, image_h: u32) -> Result<(), MapError> {
        for local in 0..self.tilecount {
            let origin = self.region_origin(local);
            let fits = origin.is_some_and(|(x, y)| {
                x.checked_add(self.tile_w).is_some_and(|r| r <= image_w)
                    && y.checked_add(self.tile_h).is_some_and(|b| b <= image_h)
            });
            if !fits {
                let (x, y) = origin.unwrap_or((u32::MAX, u32::MAX));
                let err = MapError::TileOutOfBounds {
                    image: self.image.display().to_string(),
                    local_id: local,
                    x,
                    y,
                    image_w,
                    image_h,
                };
                error!("{err}");
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Where a placed object sits in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub id: u32,
    pub name: Option<String>,
    pub pos: Vec2,
    pub gid: Option<TileId>,
}

/// Everything needed to blit one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileImage {
    pub tileset: usize,
    pub src: Rect,
    pub flags: TileFlags,
}

#[derive(Debug, Clone, Default)]
struct TileSlot {
    tileset: usize,
    src: Rect,
    name: Option<String>,
}

/// Map data the game runs on: layers, tile regions and placed objects.
#[derive(Debug, Clone)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    pub tile_w: u32,
    pub tile_h: u32,
    pub background: Option<Color>,
    pub tilesets: Vec<TilesetInfo>,
    layers: Vec<Layer>,
    slots: Vec<Option<TileSlot>>, // indexed by clean gid
    objects: Vec<PlacedObject>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize, tile_w: u32, tile_h: u32) -> Self {
        TileGrid {
            width,
            height,
            tile_w,
            tile_h,
            background: None,
            tilesets: Vec::new(),
            layers: Vec::new(),
            slots: vec![None],
            objects: Vec::new(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let (ir, base) = decode_map_file_to_ir(path.as_ref())?;
        let grid = Self::from_ir(ir, &base)?;
        info!(
            map = %path.as_ref().display(),
            width = grid.width,
            height = grid.height,
            layers = grid.layers.len(),
            tilesets = grid.tilesets.len(),
            objects = grid.objects.len(),
            "loaded map"
        );
        Ok(grid)
    }

    pub fn from_ir(ir: IrMap, base_dir: &Path) -> Result<Self, MapError> {
        let mut grid = TileGrid::new(ir.width, ir.height, ir.tile_w, ir.tile_h);
        grid.background = ir.background;

        for ts in ir.tilesets {
            grid.add_tileset(ts, base_dir)?;
        }

        for layer in ir.layers {
            match layer.kind {
                IrLayerKind::Tiles { width, height, data } => {
                    let mut l = Layer::new(layer.name, width, height, data)?;
                    l.visible = layer.visible;
                    grid.add_layer(l)?;
                }
                IrLayerKind::Objects { objects } => {
                    grid.objects.extend(objects.into_iter().map(|o| PlacedObject {
                        id: o.id,
                        name: o.name,
                        pos: vec2(o.x, o.y),
                        gid: o.gid.map(TileId),
                    }));
                }
                IrLayerKind::Unsupported => {}
            }
        }

        Ok(grid)
    }

    /// Registers a tileset and computes the source rectangle of every tile.
    /// When the image size is known, a rectangle outside it is a fatal load
    /// error; otherwise the check runs once the image is decoded.
    pub fn add_tileset(&mut self, ts: IrTileset, base_dir: &Path) -> Result<(), MapError> {
        if ts.columns == 0 || ts.first_gid == 0 {
            return Err(MapError::InvalidMap(format!(
                "tileset {} has zero columns or first gid",
                ts.image
            )));
        }
        let last_gid = ts
            .first_gid
            .checked_add(ts.tilecount)
            .filter(|&end| ts.tilecount <= MAX_TILECOUNT && end <= MAX_GID)
            .ok_or_else(|| {
                MapError::InvalidMap(format!(
                    "tileset {} gids {}+{} out of range",
                    ts.image, ts.first_gid, ts.tilecount
                ))
            })?;

        let info = TilesetInfo {
            tilecount: ts.tilecount,
            cols: ts.columns,
            image: base_dir.join(&ts.image),
            tile_w: ts.tile_w,
            tile_h: ts.tile_h,
            spacing: ts.spacing,
            margin: ts.margin,
            transparent: ts.transparent,
        };
        if ts.image_w > 0 && ts.image_h > 0 {
            info.check_image_size(ts.image_w, ts.image_h)?;
        }

        let index = self.tilesets.len();
        if self.slots.len() < last_gid as usize {
            self.slots.resize(last_gid as usize, None);
        }
        for local in 0..info.tilecount {
            let (sx, sy) = info.region_origin(local).ok_or_else(|| {
                MapError::InvalidMap(format!("tileset {} geometry overflows", ts.image))
            })?;
            let name = ts
                .tiles
                .iter()
                .find(|t| t.id == local)
                .and_then(|t| t.name.clone());
            self.slots[(ts.first_gid + local) as usize] = Some(TileSlot {
                tileset: index,
                src: Rect::new(sx as f32, sy as f32, info.tile_w as f32, info.tile_h as f32),
                name,
            });
        }

        self.tilesets.push(info);
        Ok(())
    }

    pub fn add_layer(&mut self, layer: Layer) -> Result<(), MapError> {
        if layer.width != self.width || layer.height != self.height {
            return Err(MapError::InvalidLayerSize {
                layer: layer.name,
                expected: self.width.saturating_mul(self.height),
                actual: layer.data.len(),
            });
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// Bounds-checked lookup; `None` when the layer or cell does not exist.
    pub fn tile_at(&self, layer: usize, pos: TilePos) -> Option<TileId> {
        self.layers.get(layer)?.get(pos)
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn width_px(&self) -> f32 {
        self.width as f32 * self.tile_w as f32
    }

    pub fn height_px(&self) -> f32 {
        self.height as f32 * self.tile_h as f32
    }

    fn slot(&self, id: TileId) -> Option<&TileSlot> {
        self.slots.get(id.clean() as usize)?.as_ref()
    }

    /// Source region and transform for a cell; `None` for empty cells.
    pub fn image_for(&self, id: TileId) -> Option<TileImage> {
        if id.is_empty() {
            return None;
        }
        let slot = self.slot(id)?;
        Some(TileImage {
            tileset: slot.tileset,
            src: slot.src,
            flags: id.flags(),
        })
    }

    /// The tile's `name` property, if it has one.
    pub fn tile_name(&self, id: TileId) -> Option<&str> {
        self.slot(id)?.name.as_deref()
    }

    pub fn is_door(&self, id: TileId) -> bool {
        self.tile_name(id) == Some("Door")
    }

    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }
}
