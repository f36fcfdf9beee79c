//! ZRLE encoding decoder - zlib-compressed RLE with 64x64 tiling.
//!
//! ZRLE (type 16) wraps a run-length/palette scheme in the connection's
//! single zlib stream. Each rectangle carries one length-prefixed chunk of
//! that stream; inflated, the chunk holds the rectangle's tiles in
//! row-major order, each tile starting with a one-byte sub-encoding
//! selector.
//!
//! # Wire Format
//!
//! ```text
//! +------------------+
//! | length           |  4 bytes (u32 big-endian)
//! +------------------+
//! | zlib_data        |  'length' bytes of the connection's zlib stream
//! +------------------+
//! ```
//!
//! # Sub-encoding Byte
//!
//! | byte      | meaning        | palette size |
//! |-----------|----------------|--------------|
//! | 0         | raw            | -            |
//! | 1         | solid          | -            |
//! | 2..=16    | packed palette | byte         |
//! | 17..=127  | reserved       | -            |
//! | 128       | plain RLE      | -            |
//! | 129       | reserved       | -            |
//! | 130..=255 | palette RLE    | byte - 128   |
//!
//! The reserved values are a hard protocol error; nothing after an
//! unrecognised selector can be framed.
//!
//! # Run Lengths
//!
//! A run length is one plus the sum of its code bytes: every 255 byte
//! continues the code, the first byte below 255 ends it.
//!
//! ```text
//! [10]          -> 11
//! [255, 100]    -> 356
//! [255, 255, 0] -> 511
//! ```
//!
//! # Packed Palette Bit Order
//!
//! Palette indices are packed MSB-first, 1/2/4 bits each depending on
//! palette size. Rows are padded to a byte boundary; packing never runs
//! across a row edge.
//!
//! Tiles hold CPIXELs (see [`rfb_pixel::CPixel`]): in the common
//! 32bpp/depth-24 true-colour case only the three significant bytes of
//! each pixel are on the wire.

use crate::error::DecodeError;
use crate::tile::{create_tiles, tiles_to_pixels, Tile};
use crate::zlib::ZlibStream;
use rfb_pixel::{CPixel, PixelError, PixelFormat};
use rfb_protocol::io::RfbInStream;
use rfb_protocol::messages::types::Rectangle;
use tokio::io::AsyncRead;

/// Decode a ZRLE rectangle into its `height x width` CPIXEL grid.
///
/// Reads the compressed payload from the transport, feeds it into the
/// connection's [`ZlibStream`], then decodes the rectangle's tiles from
/// the inflated data. Any error leaves the zlib stream in an undefined
/// position; the session must tear the connection down rather than decode
/// further rectangles.
pub async fn decode<R: AsyncRead + Unpin>(
    stream: &mut RfbInStream<R>,
    rect: &Rectangle,
    format: &PixelFormat,
    zlib: &mut ZlibStream,
) -> Result<Vec<Vec<CPixel>>, DecodeError> {
    if rect.width == 0 || rect.height == 0 {
        return Ok(Vec::new());
    }

    let bytes_per_cpixel = format.bytes_per_cpixel();
    if bytes_per_cpixel == 0 || bytes_per_cpixel > 4 {
        return Err(PixelError::UnsupportedWidth {
            got: bytes_per_cpixel,
        }
        .into());
    }

    let compressed_len = stream.read_u32().await?;
    let mut compressed = vec![0u8; compressed_len as usize];
    stream.read_bytes(&mut compressed).await?;
    zlib.feed(&compressed);

    tracing::debug!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        compressed_len,
        buffered = stream.available(),
        "ZRLE rectangle"
    );

    let mut tiles = create_tiles(rect.width, rect.height);

    for tile in &mut tiles {
        let selector = zlib.read_u8()?;
        let sub_encoding = SubEncoding::from_byte(selector)?;
        tracing::trace!(
            tile_x = tile.x,
            tile_y = tile.y,
            tile_width = tile.width,
            tile_height = tile.height,
            ?sub_encoding,
            "ZRLE tile"
        );
        sub_encoding.read(zlib, tile, bytes_per_cpixel)?;
        debug_assert_eq!(tile.pixels.len(), tile.area());
    }

    Ok(tiles_to_pixels(rect.width, rect.height, &tiles))
}

/// The per-tile decoding scheme, parsed from the sub-encoding byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubEncoding {
    /// Every pixel verbatim.
    Raw,
    /// One pixel filling the whole tile.
    Solid,
    /// 1/2/4-bit indices into a palette of 2..=16 entries.
    PackedPalette { palette_size: u8 },
    /// Runs of literal pixels.
    PlainRle,
    /// Runs of indices into a palette of 2..=127 entries.
    PaletteRle { palette_size: u8 },
}

impl SubEncoding {
    /// Parse a sub-encoding byte; reserved values (17..=127, 129) fail.
    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        match byte {
            0 => Ok(Self::Raw),
            1 => Ok(Self::Solid),
            2..=16 => Ok(Self::PackedPalette { palette_size: byte }),
            128 => Ok(Self::PlainRle),
            130..=255 => Ok(Self::PaletteRle {
                palette_size: byte - 128,
            }),
            _ => Err(DecodeError::InvalidSubencoding(byte)),
        }
    }

    /// Decode one tile's pixels from the zlib stream.
    ///
    /// Consumes exactly the bytes this scheme defines, leaving the stream
    /// positioned at the next tile's selector byte.
    pub fn read(
        &self,
        zlib: &mut ZlibStream,
        tile: &mut Tile,
        bytes_per_cpixel: usize,
    ) -> Result<(), DecodeError> {
        match *self {
            Self::Raw => read_raw(zlib, tile, bytes_per_cpixel),
            Self::Solid => read_solid(zlib, tile, bytes_per_cpixel),
            Self::PackedPalette { palette_size } => {
                read_packed_palette(zlib, tile, palette_size, bytes_per_cpixel)
            }
            Self::PlainRle => read_plain_rle(zlib, tile, bytes_per_cpixel),
            Self::PaletteRle { palette_size } => {
                read_palette_rle(zlib, tile, palette_size, bytes_per_cpixel)
            }
        }
    }
}

/// Read one CPIXEL from the zlib stream.
fn read_cpixel(zlib: &mut ZlibStream, bytes_per_cpixel: usize) -> Result<CPixel, DecodeError> {
    let mut buf = [0u8; 4];
    zlib.read_exact(&mut buf[..bytes_per_cpixel])?;
    Ok(CPixel::new(&buf[..bytes_per_cpixel])?)
}

/// Read a tile palette of `size` CPIXELs.
fn read_palette(
    zlib: &mut ZlibStream,
    size: usize,
    bytes_per_cpixel: usize,
) -> Result<Vec<CPixel>, DecodeError> {
    let data = zlib.read(size * bytes_per_cpixel)?;
    let palette = data
        .chunks(bytes_per_cpixel)
        .map(CPixel::new)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(palette)
}

/// Read a run length: one plus the sum of 255-terminated code bytes.
///
/// `limit` bounds the number of code bytes; a run that keeps reading 255
/// past it can never fit a tile and fails instead of spinning on a
/// malicious stream.
fn read_run_length(zlib: &mut ZlibStream, limit: usize) -> Result<usize, DecodeError> {
    let mut length = 1usize;
    let mut code_bytes = 0usize;

    loop {
        let byte = zlib.read_u8()?;
        code_bytes += 1;
        length += byte as usize;
        if byte != 255 {
            return Ok(length);
        }
        if code_bytes >= limit {
            return Err(DecodeError::RunUnterminated { limit });
        }
    }
}

/// Raw: `width * height` CPIXELs verbatim.
fn read_raw(
    zlib: &mut ZlibStream,
    tile: &mut Tile,
    bytes_per_cpixel: usize,
) -> Result<(), DecodeError> {
    let data = zlib.read(tile.area() * bytes_per_cpixel)?;
    tile.pixels = data
        .chunks(bytes_per_cpixel)
        .map(CPixel::new)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(())
}

/// Solid: one CPIXEL replicated across the tile.
fn read_solid(
    zlib: &mut ZlibStream,
    tile: &mut Tile,
    bytes_per_cpixel: usize,
) -> Result<(), DecodeError> {
    let pixel = read_cpixel(zlib, bytes_per_cpixel)?;
    tile.pixels = vec![pixel; tile.area()];
    Ok(())
}

/// Packed palette: a palette followed by bit-packed indices, row by row.
fn read_packed_palette(
    zlib: &mut ZlibStream,
    tile: &mut Tile,
    palette_size: u8,
    bytes_per_cpixel: usize,
) -> Result<(), DecodeError> {
    let palette = read_palette(zlib, palette_size as usize, bytes_per_cpixel)?;

    let index_bits: usize = match palette_size {
        2 => 1,
        3..=4 => 2,
        _ => 4, // 5..=16
    };
    let index_mask = (1u8 << index_bits) - 1;
    let row_bytes = (tile.width as usize * index_bits).div_ceil(8);

    let mut pixels = Vec::with_capacity(tile.area());
    for _ in 0..tile.height {
        // Packing restarts at every row edge
        let packed = zlib.read(row_bytes)?;

        let mut bit_offset = 0;
        for _ in 0..tile.width {
            let byte = packed[bit_offset / 8];
            let shift = 8 - (bit_offset % 8) - index_bits;
            let index = (byte >> shift) & index_mask;

            if index >= palette_size {
                return Err(DecodeError::PaletteIndexOob {
                    index,
                    palette_size,
                });
            }

            pixels.push(palette[index as usize]);
            bit_offset += index_bits;
        }
    }

    tile.pixels = pixels;
    Ok(())
}

/// Plain RLE: literal CPIXELs, each followed by a run length.
fn read_plain_rle(
    zlib: &mut ZlibStream,
    tile: &mut Tile,
    bytes_per_cpixel: usize,
) -> Result<(), DecodeError> {
    let area = tile.area();
    let mut pixels = Vec::with_capacity(area);

    while pixels.len() < area {
        let pixel = read_cpixel(zlib, bytes_per_cpixel)?;
        let run = read_run_length(zlib, area)?;

        let remaining = area - pixels.len();
        if run > remaining {
            return Err(DecodeError::RunOverrun { run, remaining });
        }

        pixels.resize(pixels.len() + run, pixel);
    }

    tile.pixels = pixels;
    Ok(())
}

/// Palette RLE: a palette, then index bytes where the top bit selects
/// between a single pixel and a run.
fn read_palette_rle(
    zlib: &mut ZlibStream,
    tile: &mut Tile,
    palette_size: u8,
    bytes_per_cpixel: usize,
) -> Result<(), DecodeError> {
    let palette = read_palette(zlib, palette_size as usize, bytes_per_cpixel)?;

    let area = tile.area();
    let mut pixels = Vec::with_capacity(area);

    while pixels.len() < area {
        let code = zlib.read_u8()?;
        let (index, run) = if code < 128 {
            (code, 1)
        } else {
            (code - 128, read_run_length(zlib, area)?)
        };

        if index >= palette_size {
            return Err(DecodeError::PaletteIndexOob {
                index,
                palette_size,
            });
        }

        let remaining = area - pixels.len();
        if run > remaining {
            return Err(DecodeError::RunOverrun { run, remaining });
        }

        pixels.resize(pixels.len() + run, palette[index as usize]);
    }

    tile.pixels = pixels;
    Ok(())
}
