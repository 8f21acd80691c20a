pub const FLIP_H: u32 = 0x8000_0000; // bit 31
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
pub const FLIP_D: u32 = 0x2000_0000; // bit 29, drawn as a 90 degree rotation
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits (bit 28 is free)

/// Largest tileset a map may declare.
pub const MAX_TILECOUNT: u32 = 1 << 16;
/// Gids at or above this are rejected at load.
pub const MAX_GID: u32 = 1 << 20;

/// A raw grid cell: gid plus transform bits. 0 is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileId(pub u32);

impl TileId {
    pub const EMPTY: TileId = TileId(0);

    #[inline] pub fn raw(self) -> u32 { self.0 }
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    #[inline] pub fn is_empty(self) -> bool { self.clean() == 0 }
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }

    #[inline]
    pub fn flags(self) -> TileFlags {
        TileFlags {
            flip_x: self.flip_h(),
            flip_y: self.flip_v(),
            rotate: self.flip_d(),
        }
    }
}

/// Per-cell transform decoded from the gid high bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileFlags {
    pub flip_x: bool,
    pub flip_y: bool,
    pub rotate: bool,
}

/// Integer tile coordinate. May lie outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        TilePos { x, y }
    }
}
