use std::io;
use std::path::PathBuf;

/// Errors raised while loading a map and its tilesets.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// File I/O error
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
    /// JSON parse error
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// Unsupported file format (non-JSON)
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// Structurally invalid map or tileset
    #[error("invalid map: {0}")]
    InvalidMap(String),
    /// A layer's data length does not match width * height
    #[error("layer '{layer}' has {actual} cells, expected {expected}")]
    InvalidLayerSize {
        /// Layer name
        layer: String,
        /// width * height
        expected: usize,
        /// data.len()
        actual: usize,
    },
    /// A tile layer references a gid no tileset provides
    #[error("layer '{layer}' references gid {gid}, max is {max_gid}")]
    InvalidTileGid {
        /// Layer name
        layer: String,
        /// Offending gid (flip bits removed)
        gid: u32,
        /// Highest gid covered by a tileset
        max_gid: u32,
    },
    /// A placed object references a gid no tileset provides
    #[error("object {object_id} in layer '{layer}' references gid {gid}, max is {max_gid}")]
    InvalidObjectGid {
        /// Layer name
        layer: String,
        /// Object id
        object_id: u32,
        /// Offending gid (flip bits removed)
        gid: u32,
        /// Highest gid covered by a tileset
        max_gid: u32,
    },
    /// A tile's pixel region falls outside its tileset image
    #[error("tile {local_id} of '{image}' at ({x}, {y}) lies outside the {image_w}x{image_h} image")]
    TileOutOfBounds {
        /// Tileset image path
        image: String,
        /// Tile index within the tileset
        local_id: u32,
        /// Region left edge
        x: u32,
        /// Region top edge
        y: u32,
        /// Image width in pixels
        image_w: u32,
        /// Image height in pixels
        image_h: u32,
    },
    /// A layer the game depends on is absent
    #[error("map has no '{0}' layer")]
    MissingLayer(String),
}
