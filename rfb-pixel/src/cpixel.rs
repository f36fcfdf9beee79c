//! The ZRLE compact pixel.
//!
//! For 32bpp true-colour formats with `depth <= 24` one byte of every pixel
//! is always zero, and ZRLE leaves it off the wire: the CPIXEL is the three
//! significant bytes. In a little-endian layout those are the low bytes (the
//! zero sits at the end); in a big-endian layout the zero comes first. Every
//! other format transmits the full PIXEL.
//!
//! [`CPixel`] stores the wire bytes verbatim; it is never reinterpreted as
//! an integer without the [`PixelFormat`] in hand.

use crate::color::{Color, ColorMap, PixelError};
use crate::format::PixelFormat;

/// One compact pixel as read off the wire (at most 4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CPixel {
    bytes: [u8; 4],
    len: u8,
}

impl CPixel {
    /// Wrap wire bytes; `data` must be 1..=4 bytes.
    pub fn new(data: &[u8]) -> Result<Self, PixelError> {
        if data.is_empty() || data.len() > 4 {
            return Err(PixelError::UnsupportedWidth { got: data.len() });
        }
        let mut bytes = [0u8; 4];
        bytes[..data.len()].copy_from_slice(data);
        Ok(Self {
            bytes,
            len: data.len() as u8,
        })
    }

    /// The wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of wire bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; a CPixel carries at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Widen this CPIXEL to the full PIXEL layout of `format`.
    ///
    /// For compact formats the dropped zero byte is restored at the most
    /// significant position: appended for little-endian layouts, prepended
    /// for big-endian. For everything else CPIXEL and PIXEL are the same
    /// bytes.
    pub fn to_pixel_bytes(&self, format: &PixelFormat) -> Result<Vec<u8>, PixelError> {
        let want = format.bytes_per_cpixel();
        if self.len() != want {
            return Err(PixelError::WrongLength {
                want,
                got: self.len(),
            });
        }

        if !format.is_compact_pixel() {
            return Ok(self.as_bytes().to_vec());
        }

        let mut pixel = Vec::with_capacity(4);
        if format.big_endian {
            pixel.push(0);
            pixel.extend_from_slice(self.as_bytes());
        } else {
            pixel.extend_from_slice(self.as_bytes());
            pixel.push(0);
        }
        Ok(pixel)
    }

    /// Decode this CPIXEL to a [`Color`], widening first if needed.
    pub fn to_color(
        &self,
        format: &PixelFormat,
        map: Option<&ColorMap>,
    ) -> Result<Color, PixelError> {
        let pixel = self.to_pixel_bytes(format)?;
        Color::decode(format, map, &pixel)
    }
}
