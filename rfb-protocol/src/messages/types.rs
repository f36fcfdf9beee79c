//! Core RFB wire types.
//!
//! Defines the [`Rectangle`] update header and the encoding identifier
//! constants a client of this decoding core can negotiate.

use crate::io::{RfbInStream, RfbOutStream};
use tokio::io::{AsyncRead, AsyncWrite};

/// Rectangle header for framebuffer updates.
///
/// Describes a rectangular region of the screen along with the encoding
/// used for the pixel data that follows.
///
/// # Wire Format
///
/// 12 bytes, big-endian:
/// - 2 bytes: x position
/// - 2 bytes: y position
/// - 2 bytes: width
/// - 2 bytes: height
/// - 4 bytes: encoding identifier (signed)
///
/// Only the header is framed here; the payload after it is owned by the
/// decoder selected by `encoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub encoding: i32,
}

impl Rectangle {
    /// Number of pixels covered by this rectangle.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Read a rectangle header from the stream.
    pub async fn read_from<R: AsyncRead + Unpin>(
        stream: &mut RfbInStream<R>,
    ) -> std::io::Result<Self> {
        Ok(Self {
            x: stream.read_u16().await?,
            y: stream.read_u16().await?,
            width: stream.read_u16().await?,
            height: stream.read_u16().await?,
            encoding: stream.read_i32().await?,
        })
    }

    /// Write a rectangle header to the stream.
    pub fn write_to<W: AsyncWrite + Unpin>(&self, stream: &mut RfbOutStream<W>) {
        stream.write_u16(self.x);
        stream.write_u16(self.y);
        stream.write_u16(self.width);
        stream.write_u16(self.height);
        stream.write_i32(self.encoding);
    }
}

//
// Encoding identifiers (RFC 6143 §7.7-§7.8)
//

/// Raw encoding - uncompressed pixel data.
pub const ENCODING_RAW: i32 = 0;

/// CopyRect encoding - copy from another screen region.
pub const ENCODING_COPYRECT: i32 = 1;

/// RRE (Rise-and-Run-length Encoding) - background plus solid sub-rectangles.
pub const ENCODING_RRE: i32 = 2;

/// ZRLE (Zlib Run-Length Encoding) - zlib + RLE in 64x64 tiles.
pub const ENCODING_ZRLE: i32 = 16;

/// Cursor pseudo-encoding - the server sets the local cursor shape.
pub const ENCODING_CURSOR: i32 = -239;

/// DesktopSize pseudo-encoding - framebuffer dimensions changed.
pub const ENCODING_DESKTOP_SIZE: i32 = -223;
