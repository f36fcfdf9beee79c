//! Cursor pseudo-encoding decoder.
//!
//! A client advertising the Cursor pseudo-encoding (-239) draws the
//! pointer locally; the server then ships cursor shape changes as a
//! rectangle whose position is the hotspot and whose payload is the
//! cursor image plus a transparency bitmask.
//!
//! The image is `width * height` PIXELs followed by `height * ceil(width
//! / 8)` mask bytes, MSB-first: a set bit makes the corresponding pixel
//! visible. The image bytes are surfaced as-is; rendering the cursor is
//! not this crate's job.

use crate::error::DecodeError;
use rfb_pixel::PixelFormat;
use rfb_protocol::io::RfbInStream;
use rfb_protocol::messages::types::Rectangle;
use tokio::io::AsyncRead;

/// Decode a cursor update into `(pixels, mask)`.
///
/// `pixels` is the raw image in the server's pixel format; `mask` is the
/// MSB-first visibility bitmap, one bit per pixel with rows padded to a
/// byte. A zero-area rectangle yields two empty vectors.
pub async fn decode<R: AsyncRead + Unpin>(
    stream: &mut RfbInStream<R>,
    rect: &Rectangle,
    format: &PixelFormat,
) -> Result<(Vec<u8>, Vec<u8>), DecodeError> {
    let mut pixels = vec![0u8; rect.area() * format.bytes_per_pixel()];
    stream.read_bytes(&mut pixels).await?;

    let mask_len = rect.height as usize * (rect.width as usize).div_ceil(8);
    let mut mask = vec![0u8; mask_len];
    stream.read_bytes(&mut mask).await?;

    Ok((pixels, mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cursor_rect(width: u16, height: u16) -> Rectangle {
        Rectangle {
            x: 3, // hotspot
            y: 4,
            width,
            height,
            encoding: -239,
        }
    }

    #[tokio::test]
    async fn test_decode_image_and_mask() {
        let format = PixelFormat::rgb888();

        // 2x2 cursor: 16 image bytes, 2 mask bytes (one per row)
        let mut data = Vec::new();
        for i in 0..16u8 {
            data.push(i);
        }
        data.push(0b1000_0000); // row 0: only the left pixel visible
        data.push(0b1100_0000); // row 1: both visible

        let mut stream = RfbInStream::new(Cursor::new(data));
        let (pixels, mask) = decode(&mut stream, &cursor_rect(2, 2), &format)
            .await
            .unwrap();

        assert_eq!(pixels.len(), 16);
        assert_eq!(pixels[0], 0);
        assert_eq!(pixels[15], 15);
        assert_eq!(mask, vec![0b1000_0000, 0b1100_0000]);
    }

    #[tokio::test]
    async fn test_mask_rows_are_byte_padded() {
        let format = PixelFormat::rgb565();

        // 9x2 cursor: mask rows are ceil(9/8) = 2 bytes each
        let image_len = 9 * 2 * 2;
        let mut data = vec![0u8; image_len];
        data.extend_from_slice(&[0xFF, 0x80, 0x00, 0x00]);

        let mut stream = RfbInStream::new(Cursor::new(data));
        let (pixels, mask) = decode(&mut stream, &cursor_rect(9, 2), &format)
            .await
            .unwrap();

        assert_eq!(pixels.len(), image_len);
        assert_eq!(mask.len(), 4);
    }

    #[tokio::test]
    async fn test_zero_sized_cursor_is_empty() {
        let format = PixelFormat::rgb888();
        let mut stream = RfbInStream::new(Cursor::new(Vec::<u8>::new()));

        let (pixels, mask) = decode(&mut stream, &cursor_rect(0, 0), &format)
            .await
            .unwrap();
        assert!(pixels.is_empty());
        assert!(mask.is_empty());
    }

    #[tokio::test]
    async fn test_missing_mask_is_truncated() {
        let format = PixelFormat::rgb888();

        // Image bytes only, no mask
        let mut stream = RfbInStream::new(Cursor::new(vec![0u8; 16]));
        let err = decode(&mut stream, &cursor_rect(2, 2), &format)
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::Truncated(_)), "got {err:?}");
    }
}
