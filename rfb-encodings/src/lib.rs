//! Rectangle decoders for RFB (VNC) framebuffer updates.
//!
//! The session layer reads rectangle headers off the wire and hands each
//! one to [`decode_rectangle`], which dispatches on the header's encoding
//! identifier and returns the decoded payload as an owned
//! [`DecodedRectangle`]. Decoders borrow the transport, the pixel format
//! and (for ZRLE) the connection's [`ZlibStream`] for the duration of one
//! rectangle and retain nothing.
//!
//! # Supported Encodings
//!
//! - [`ENCODING_RAW`] (0): uncompressed pixels
//! - [`ENCODING_COPYRECT`] (1): copy from another screen region
//! - [`ENCODING_RRE`] (2): background colour plus solid sub-rectangles
//! - [`ENCODING_ZRLE`] (16): zlib-compressed RLE in 64x64 tiles
//! - [`ENCODING_CURSOR`] (-239): cursor shape pseudo-encoding
//! - [`ENCODING_DESKTOP_SIZE`] (-223): framebuffer resize pseudo-encoding
//!
//! Anything else fails with [`DecodeError::UnknownEncoding`]; there is no
//! way to skip an unknown payload, so the session must close the
//! connection.
//!
//! # Ordering
//!
//! Rectangles must be decoded in the server's send order, and within ZRLE
//! the tiles of a rectangle in row-major order. Both the shared inflater
//! state and the visible composition of updates depend on it. The decoders
//! are synchronous apart from transport reads; there is no concurrency
//! inside a rectangle.
//!
//! # Failure Model
//!
//! Every [`DecodeError`] is fatal to its rectangle and, for ZRLE, to the
//! connection: the persistent zlib stream cannot be resynchronised after
//! an error. No partially decoded rectangle is ever returned.

pub mod copyrect;
pub mod cursor;
pub mod error;
pub mod raw;
pub mod rre;
pub mod tile;
pub mod zlib;
pub mod zrle;

pub use error::DecodeError;
pub use rre::RreSubRect;
pub use tile::{create_tiles, tiles_to_pixels, Tile, TILE_SIZE};
pub use zlib::ZlibStream;
pub use zrle::SubEncoding;

pub use rfb_protocol::messages::types::{
    Rectangle, ENCODING_COPYRECT, ENCODING_CURSOR, ENCODING_DESKTOP_SIZE, ENCODING_RAW,
    ENCODING_RRE, ENCODING_ZRLE,
};

use rfb_pixel::{CPixel, Color, ColorMap, PixelFormat};
use rfb_protocol::io::RfbInStream;
use tokio::io::AsyncRead;

/// The decoded payload of one framebuffer-update rectangle.
///
/// Owned by the caller; nothing borrows the transport or the decoder
/// state after [`decode_rectangle`] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedRectangle {
    /// A full colour grid, `height` rows of `width` pixels.
    Raw { pixels: Vec<Vec<Color>> },

    /// Copy an equally-sized region from `(src_x, src_y)` of the existing
    /// framebuffer.
    CopyRect { src_x: u16, src_y: u16 },

    /// A background colour and solid sub-rectangles to paint over it, in
    /// order.
    Rre {
        background: Color,
        sub_rects: Vec<RreSubRect>,
    },

    /// A `height x width` grid of CPIXELs in the server's pixel format.
    Zrle { pixels: Vec<Vec<CPixel>> },

    /// A cursor image (raw PIXEL bytes) and its MSB-first visibility mask.
    Cursor { pixels: Vec<u8>, mask: Vec<u8> },

    /// The framebuffer changed size; prior contents are void.
    DesktopSize { width: u16, height: u16 },
}

/// Decode one rectangle according to its header's encoding identifier.
///
/// `zlib` is the connection-scoped ZRLE stream; it is only touched when
/// the rectangle is ZRLE-encoded but must be the same instance for every
/// rectangle of the connection. `color_map` is consulted only by
/// non-true-colour pixel formats.
pub async fn decode_rectangle<R: AsyncRead + Unpin>(
    stream: &mut RfbInStream<R>,
    format: &PixelFormat,
    color_map: Option<&ColorMap>,
    zlib: &mut ZlibStream,
    rect: &Rectangle,
) -> Result<DecodedRectangle, DecodeError> {
    tracing::debug!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        encoding = rect.encoding,
        "decoding rectangle"
    );

    match rect.encoding {
        ENCODING_RAW => {
            let pixels = raw::decode(stream, rect, format, color_map).await?;
            Ok(DecodedRectangle::Raw { pixels })
        }
        ENCODING_COPYRECT => {
            let (src_x, src_y) = copyrect::decode(stream, rect).await?;
            Ok(DecodedRectangle::CopyRect { src_x, src_y })
        }
        ENCODING_RRE => {
            let (background, sub_rects) = rre::decode(stream, rect, format, color_map).await?;
            Ok(DecodedRectangle::Rre {
                background,
                sub_rects,
            })
        }
        ENCODING_ZRLE => {
            let pixels = zrle::decode(stream, rect, format, zlib).await?;
            Ok(DecodedRectangle::Zrle { pixels })
        }
        ENCODING_CURSOR => {
            let (pixels, mask) = cursor::decode(stream, rect, format).await?;
            Ok(DecodedRectangle::Cursor { pixels, mask })
        }
        // No payload; the header itself carries the new dimensions
        ENCODING_DESKTOP_SIZE => Ok(DecodedRectangle::DesktopSize {
            width: rect.width,
            height: rect.height,
        }),
        other => Err(DecodeError::UnknownEncoding(other)),
    }
}
