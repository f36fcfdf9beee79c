//! The 64x64 tile grid ZRLE decodes into.
//!
//! A ZRLE rectangle is partitioned into tiles of at most 64x64 pixels,
//! laid out row-major with edge tiles clipped to the rectangle. Each tile
//! is decoded independently into a flat row-major pixel vector and the
//! tiles are then composed back into the rectangle's pixel grid.
//!
//! ```text
//!     0    64   128  192  ...
//!   0 +----+----+----+--+
//!     |    |    |    |  |
//!  64 +----+----+----+--+
//!     |    |    |   edge|
//! ... +----+----+----+--+
//!               edge tiles
//! ```

use rfb_common::Rect;
use rfb_pixel::CPixel;

/// Standard tile edge length; edge tiles are smaller.
pub const TILE_SIZE: u16 = 64;

/// One ZRLE tile.
///
/// Coordinates are relative to the enclosing rectangle's top-left corner.
/// After a successful decode `pixels` holds exactly `width * height`
/// CPIXELs in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<CPixel>,
}

impl Tile {
    /// Create an empty tile at the given rectangle-relative position.
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
            pixels: Vec::new(),
        }
    }

    /// Number of pixels this tile covers.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The tile's footprint as a rectangle-relative [`Rect`].
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x as i32,
            self.y as i32,
            self.width as u32,
            self.height as u32,
        )
    }

    /// View the flat pixel vector as rows of `width` pixels.
    pub fn to_pixel_grid(&self) -> Vec<Vec<CPixel>> {
        self.pixels
            .chunks(self.width as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Partition a `width x height` rectangle into row-major tiles.
///
/// The returned tiles cover the rectangle exactly once: no overlap, no
/// gap, every tile between 1 and [`TILE_SIZE`] on each side. Zero-sized
/// rectangles produce no tiles.
pub fn create_tiles(width: u16, height: u16) -> Vec<Tile> {
    let mut tiles = Vec::new();

    let mut y = 0;
    while y < height {
        let tile_height = TILE_SIZE.min(height - y);

        let mut x = 0;
        while x < width {
            let tile_width = TILE_SIZE.min(width - x);
            tiles.push(Tile::new(x, y, tile_width, tile_height));
            x += tile_width;
        }
        y += tile_height;
    }

    tiles
}

/// Compose decoded tiles into the rectangle's `height x width` pixel grid.
///
/// `tiles` must be the row-major cover produced by [`create_tiles`], each
/// with its pixel vector filled.
pub fn tiles_to_pixels(width: u16, height: u16, tiles: &[Tile]) -> Vec<Vec<CPixel>> {
    let mut rows: Vec<Vec<CPixel>> = (0..height)
        .map(|_| Vec::with_capacity(width as usize))
        .collect();

    for tile in tiles {
        for (dy, tile_row) in tile.pixels.chunks(tile.width as usize).enumerate() {
            rows[tile.y as usize + dy].extend_from_slice(tile_row);
        }
    }

    rows
}
