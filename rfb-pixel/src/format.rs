//! RFB pixel format descriptions.
//!
//! The server advertises a [`PixelFormat`] during initialisation and every
//! rectangle's pixel data is laid out according to it. The format stays
//! fixed for the life of the session as far as the decoders are concerned.
//!
//! # Pixel Format Components
//!
//! - **bits_per_pixel**: storage size in bits (8, 16 or 32)
//! - **depth**: significant colour bits (at most `bits_per_pixel`)
//! - **big_endian**: byte order for multi-byte pixels
//! - **true_color**: direct colour vs. colour-map indices
//! - **red/green/blue_max**: maximum value of each channel
//! - **red/green/blue_shift**: bit position of each channel's least
//!   significant bit
//!
//! # Compact Pixels
//!
//! ZRLE transmits a CPIXEL instead of a PIXEL. For 32bpp true-colour
//! formats with `depth <= 24` one byte of every pixel is always zero, so
//! only the three significant bytes go on the wire; in every other format
//! CPIXEL and PIXEL are identical. See [`PixelFormat::bytes_per_cpixel`].

/// Describes how pixels are encoded on the wire.
///
/// # Example
///
/// ```
/// use rfb_pixel::PixelFormat;
///
/// let pf = PixelFormat::rgb888();
/// assert_eq!(pf.bytes_per_pixel(), 4);
/// assert_eq!(pf.bytes_per_cpixel(), 3); // depth 24 fits in three bytes
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    /// Bits used per pixel on the wire (8, 16 or 32).
    pub bits_per_pixel: u8,

    /// Significant colour bits (at most `bits_per_pixel`).
    pub depth: u8,

    /// Byte order for multi-byte pixels (`true` = big endian).
    pub big_endian: bool,

    /// Direct colour when `true`; colour-map indices when `false`.
    pub true_color: bool,

    /// Maximum valid red component value in this format.
    pub red_max: u16,

    /// Maximum valid green component value in this format.
    pub green_max: u16,

    /// Maximum valid blue component value in this format.
    pub blue_max: u16,

    /// Bit shift for the least significant bit of the red component.
    pub red_shift: u8,

    /// Bit shift for the least significant bit of the green component.
    pub green_shift: u8,

    /// Bit shift for the least significant bit of the blue component.
    pub blue_shift: u8,
}

impl PixelFormat {
    /// Bytes per PIXEL (storage width, rounded up to whole bytes).
    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel.div_ceil(8) as usize
    }

    /// Bytes per CPIXEL.
    ///
    /// Three for 32bpp true-colour formats whose depth fits in 24 bits;
    /// otherwise the same as [`bytes_per_pixel`](Self::bytes_per_pixel).
    pub fn bytes_per_cpixel(&self) -> usize {
        if self.is_compact_pixel() {
            3
        } else {
            self.bytes_per_pixel()
        }
    }

    /// True when this format transmits 3-byte compact pixels.
    pub fn is_compact_pixel(&self) -> bool {
        self.bits_per_pixel == 32 && self.depth <= 24 && self.true_color
    }

    /// Standard little-endian 32bpp RGB888 format.
    ///
    /// Red at bit 16, green at bit 8, blue at bit 0; a pixel with R=0xAA,
    /// G=0xBB, B=0xCC is stored as `[0xCC, 0xBB, 0xAA, 0x00]`.
    pub fn rgb888() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            true_color: true,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        }
    }

    /// Little-endian 16bpp RGB565 format.
    pub fn rgb565() -> Self {
        Self {
            bits_per_pixel: 16,
            depth: 16,
            big_endian: false,
            true_color: true,
            red_max: 31,
            green_max: 63,
            blue_max: 31,
            red_shift: 11,
            green_shift: 5,
            blue_shift: 0,
        }
    }

    /// 8bpp indexed-colour format (pixels are colour-map indices).
    pub fn indexed8() -> Self {
        Self {
            bits_per_pixel: 8,
            depth: 8,
            big_endian: false,
            true_color: false,
            red_max: 0,
            green_max: 0,
            blue_max: 0,
            red_shift: 0,
            green_shift: 0,
            blue_shift: 0,
        }
    }
}
