//! The decode error taxonomy.
//!
//! Every kind is fatal to the rectangle it occurred in. Kinds raised inside
//! a ZRLE decode are fatal to the whole connection as well, because the
//! shared inflater state cannot be resynchronised; the session must close
//! the transport rather than retry. Transport errors from the other
//! encodings are equally unrecoverable since rectangle framing is lost
//! without a parseable header.

use rfb_pixel::PixelError;
use thiserror::Error;

/// Errors from decoding one framebuffer-update rectangle.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The transport or the zlib stream ran out before the encoding was
    /// complete. Closing the transport mid-decode surfaces as this kind.
    #[error("input truncated: {0}")]
    Truncated(String),

    /// The rectangle header named an encoding this client never offered.
    #[error("unknown encoding identifier {0}")]
    UnknownEncoding(i32),

    /// A ZRLE tile used a reserved sub-encoding byte (17-127 or 129).
    #[error("invalid ZRLE sub-encoding byte {0}")]
    InvalidSubencoding(u8),

    /// A palette index referenced an entry past the tile's palette.
    #[error("palette index {index} out of bounds for palette of {palette_size}")]
    PaletteIndexOob { index: u8, palette_size: u8 },

    /// A run-length code kept reading 255 without a terminating byte.
    #[error("run length not terminated within {limit} bytes")]
    RunUnterminated { limit: usize },

    /// Run lengths added up to more pixels than the tile holds.
    #[error("run of {run} pixels overruns tile with {remaining} pixels remaining")]
    RunOverrun { run: usize, remaining: usize },

    /// An RRE sub-rectangle extended past its enclosing rectangle.
    #[error("RRE sub-rectangle {index} at ({x},{y}) size {width}x{height} exceeds its rectangle")]
    SubrectOutOfBounds {
        index: u32,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },

    /// A pixel could not be decoded against the session's pixel format.
    #[error("malformed pixel: {0}")]
    MalformedPixel(#[from] PixelError),

    /// The inflater reported stream corruption.
    #[error("zlib inflate failed: {0}")]
    Zlib(#[from] flate2::DecompressError),
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        Self::Truncated(err.to_string())
    }
}
