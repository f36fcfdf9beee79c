//! RFB pixel formats and colour decoding.
//!
//! This crate describes how pixels are laid out on the wire and turns wire
//! bytes into device-independent colours:
//!
//! - [`PixelFormat`]: bit depths, endianness, channel layout, colour model
//! - [`Color`] / [`ColorMap`]: decoded 16-bit-per-channel colour and the
//!   lookup table used by indexed (non-true-colour) formats
//! - [`CPixel`]: the compact pixel used by ZRLE, which drops the always-zero
//!   byte of 32bpp/depth<=24 true-colour pixels
//!
//! # Key Concepts
//!
//! A PIXEL is `bits_per_pixel / 8` bytes in the server's byte order. A
//! CPIXEL is the same thing except in the one format family where only
//! three of the four bytes are significant; [`PixelFormat::bytes_per_cpixel`]
//! tells the two apart. [`Color`] is the decoded form, independent of either
//! layout.

pub mod color;
pub mod cpixel;
pub mod format;

pub use color::{Color, ColorMap, PixelError};
pub use cpixel::CPixel;
pub use format::PixelFormat;
