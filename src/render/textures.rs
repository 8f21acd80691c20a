use crate::tile_grid::{TileGrid, TilesetInfo};
use anyhow::Context;
use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

/// GPU textures for every tileset. Tilesets sharing an image share a texture.
pub struct TileTextures {
    per_tileset: Vec<Texture2D>,
}

impl TileTextures {
    pub async fn load(grid: &TileGrid) -> anyhow::Result<Self> {
        let mut by_path: HashMap<PathBuf, (Texture2D, u32, u32)> = HashMap::new();
        let mut per_tileset = Vec::with_capacity(grid.tilesets.len());

        for ts in &grid.tilesets {
            if let Some((tex, w, h)) = by_path.get(&ts.image) {
                ts.check_image_size(*w, *h)?;
                per_tileset.push(tex.clone());
                continue;
            }

            let path = ts
                .image
                .to_str()
                .with_context(|| format!("Tileset image path is not UTF-8: {}", ts.image.display()))?;
            let bytes = load_file(path)
                .await
                .with_context(|| format!("Loading texture {path}"))?;
            let image = decode_tileset_image(ts, &bytes)?;

            let tex = Texture2D::from_image(&image);
            tex.set_filter(FilterMode::Nearest);
            by_path.insert(
                ts.image.clone(),
                (tex.clone(), image.width() as u32, image.height() as u32),
            );
            per_tileset.push(tex);
        }

        info!(
            tilesets = per_tileset.len(),
            textures = by_path.len(),
            "loaded tileset textures"
        );
        Ok(TileTextures { per_tileset })
    }

    pub fn get(&self, tileset: usize) -> Option<&Texture2D> {
        self.per_tileset.get(tileset)
    }
}

/// Decodes a tileset image, checks every tile region against its real size
/// and applies the colour key.
pub fn decode_tileset_image(ts: &TilesetInfo, bytes: &[u8]) -> anyhow::Result<Image> {
    let mut image = Image::from_file_with_format(bytes, None)
        .with_context(|| format!("Decoding texture {}", ts.image.display()))?;
    ts.check_image_size(image.width() as u32, image.height() as u32)?;
    if let Some(key) = ts.transparent {
        apply_color_key(&mut image, key);
    }
    Ok(image)
}

/// Makes every pixel of colour `key` fully transparent.
pub fn apply_color_key(image: &mut Image, key: Color) {
    let [r, g, b, _]: [u8; 4] = key.into();
    for px in image.bytes.chunks_exact_mut(4) {
        if px[..3] == [r, g, b] {
            px[3] = 0;
        }
    }
}
