//! RRE encoding decoder - Rise-and-Run-length Encoding.
//!
//! RRE (type 2) describes a rectangle as a background colour plus a list
//! of solid-colour sub-rectangles painted over it, in order.
//!
//! # Wire Format
//!
//! ```text
//! +------------------+
//! | num_subrects     |  4 bytes (u32 big-endian)
//! +------------------+
//! | background PIXEL |  bytes_per_pixel bytes
//! +------------------+
//! | sub-rectangle 1  |  PIXEL, then u16 x, y, width, height
//! | ...              |
//! | sub-rectangle N  |
//! +------------------+
//! ```
//!
//! Sub-rectangle coordinates are relative to the enclosing rectangle and
//! must stay inside it.

use crate::error::DecodeError;
use rfb_pixel::{Color, ColorMap, PixelFormat};
use rfb_protocol::io::RfbInStream;
use rfb_protocol::messages::types::Rectangle;
use tokio::io::AsyncRead;

/// One solid-colour RRE sub-rectangle, positioned relative to its
/// enclosing rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RreSubRect {
    pub color: Color,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Decode an RRE rectangle: background colour plus ordered sub-rectangles.
pub async fn decode<R: AsyncRead + Unpin>(
    stream: &mut RfbInStream<R>,
    rect: &Rectangle,
    format: &PixelFormat,
    color_map: Option<&ColorMap>,
) -> Result<(Color, Vec<RreSubRect>), DecodeError> {
    if rect.width == 0 || rect.height == 0 {
        return Ok((Color::default(), Vec::new()));
    }

    let bytes_per_pixel = format.bytes_per_pixel();
    let mut pixel = vec![0u8; bytes_per_pixel];

    let num_subrects = stream.read_u32().await?;

    stream.read_bytes(&mut pixel).await?;
    let background = Color::decode(format, color_map, &pixel)?;

    let mut sub_rects = Vec::new();
    for index in 0..num_subrects {
        stream.read_bytes(&mut pixel).await?;
        let color = Color::decode(format, color_map, &pixel)?;

        let x = stream.read_u16().await?;
        let y = stream.read_u16().await?;
        let width = stream.read_u16().await?;
        let height = stream.read_u16().await?;

        // u32 arithmetic: u16 sums cannot overflow it
        if x as u32 + width as u32 > rect.width as u32
            || y as u32 + height as u32 > rect.height as u32
        {
            return Err(DecodeError::SubrectOutOfBounds {
                index,
                x,
                y,
                width,
                height,
            });
        }

        sub_rects.push(RreSubRect {
            color,
            x,
            y,
            width,
            height,
        });
    }

    Ok((background, sub_rects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn rre_rect(width: u16, height: u16) -> Rectangle {
        Rectangle {
            x: 0,
            y: 0,
            width,
            height,
            encoding: 2,
        }
    }

    /// Assemble an RRE payload from a background pixel and raw sub-rects.
    fn make_rre_payload(bg: &[u8], subrects: &[(&[u8], u16, u16, u16, u16)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&(subrects.len() as u32).to_be_bytes());
        data.extend_from_slice(bg);
        for (pixel, x, y, w, h) in subrects {
            data.extend_from_slice(pixel);
            data.extend_from_slice(&x.to_be_bytes());
            data.extend_from_slice(&y.to_be_bytes());
            data.extend_from_slice(&w.to_be_bytes());
            data.extend_from_slice(&h.to_be_bytes());
        }
        data
    }

    #[tokio::test]
    async fn test_decode_background_only() {
        let format = PixelFormat::rgb888();
        let payload = make_rre_payload(&[0xFF, 0x00, 0x00, 0x00], &[]); // blue
        let mut stream = RfbInStream::new(Cursor::new(payload));

        let (background, sub_rects) = decode(&mut stream, &rre_rect(10, 10), &format, None)
            .await
            .unwrap();

        assert_eq!(background, Color::from_rgb8(0, 0, 0xFF));
        assert!(sub_rects.is_empty());
    }

    #[tokio::test]
    async fn test_decode_subrects_in_order_from_index_zero() {
        let format = PixelFormat::rgb888();
        let red: &[u8] = &[0x00, 0x00, 0xFF, 0x00];
        let green: &[u8] = &[0x00, 0xFF, 0x00, 0x00];
        let white: &[u8] = &[0xFF, 0xFF, 0xFF, 0x00];

        let payload = make_rre_payload(white, &[(red, 0, 0, 5, 5), (green, 15, 0, 5, 5)]);
        let mut stream = RfbInStream::new(Cursor::new(payload));

        let (background, sub_rects) = decode(&mut stream, &rre_rect(20, 20), &format, None)
            .await
            .unwrap();

        assert_eq!(background, Color::from_rgb8(255, 255, 255));
        // Real entries start at index 0, in wire order
        assert_eq!(sub_rects.len(), 2);
        assert_eq!(
            sub_rects[0],
            RreSubRect {
                color: Color::from_rgb8(255, 0, 0),
                x: 0,
                y: 0,
                width: 5,
                height: 5,
            }
        );
        assert_eq!(sub_rects[1].color, Color::from_rgb8(0, 255, 0));
        assert_eq!(sub_rects[1].x, 15);
    }

    #[tokio::test]
    async fn test_decode_subrect_touching_edges() {
        let format = PixelFormat::rgb888();
        let red: &[u8] = &[0x00, 0x00, 0xFF, 0x00];
        let payload = make_rre_payload(&[0u8; 4], &[(red, 7, 7, 3, 3)]);
        let mut stream = RfbInStream::new(Cursor::new(payload));

        // 7 + 3 == 10: exactly touches the corner, still valid
        let (_, sub_rects) = decode(&mut stream, &rre_rect(10, 10), &format, None)
            .await
            .unwrap();
        assert_eq!(sub_rects.len(), 1);
    }

    #[tokio::test]
    async fn test_decode_subrect_out_of_bounds() {
        let format = PixelFormat::rgb888();
        let red: &[u8] = &[0x00, 0x00, 0xFF, 0x00];
        // x=8, width=5 extends to 13 in a 10-wide rectangle
        let payload = make_rre_payload(&[0u8; 4], &[(red, 8, 0, 5, 5)]);
        let mut stream = RfbInStream::new(Cursor::new(payload));

        let err = decode(&mut stream, &rre_rect(10, 10), &format, None)
            .await
            .unwrap_err();
        assert!(
            matches!(err, DecodeError::SubrectOutOfBounds { index: 0, x: 8, .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_decode_huge_coordinates_do_not_overflow() {
        let format = PixelFormat::rgb888();
        let red: &[u8] = &[0x00, 0x00, 0xFF, 0x00];
        let payload = make_rre_payload(&[0u8; 4], &[(red, 65535, 0, 65535, 5)]);
        let mut stream = RfbInStream::new(Cursor::new(payload));

        let err = decode(&mut stream, &rre_rect(10, 10), &format, None)
            .await
            .unwrap_err();
        assert!(
            matches!(err, DecodeError::SubrectOutOfBounds { .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_decode_eof_mid_subrect_is_truncated() {
        let format = PixelFormat::rgb888();
        let mut payload = Vec::new();
        payload.extend_from_slice(&1u32.to_be_bytes());
        payload.extend_from_slice(&[0u8; 4]); // background
        payload.extend_from_slice(&[0x00, 0x00, 0xFF, 0x00]); // subrect pixel
        // x, y, width, height missing

        let mut stream = RfbInStream::new(Cursor::new(payload));
        let err = decode(&mut stream, &rre_rect(10, 10), &format, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::Truncated(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_decode_rgb565() {
        let format = PixelFormat::rgb565();
        let blue_bg: &[u8] = &[0x1F, 0x00]; // 0x001F little-endian
        let red_sub: &[u8] = &[0x00, 0xF8]; // 0xF800

        let payload = make_rre_payload(blue_bg, &[(red_sub, 3, 3, 4, 4)]);
        let mut stream = RfbInStream::new(Cursor::new(payload));

        let (background, sub_rects) = decode(&mut stream, &rre_rect(10, 10), &format, None)
            .await
            .unwrap();
        assert_eq!(background, Color::new(0, 0, 0xFFFF));
        assert_eq!(sub_rects[0].color, Color::new(0xFFFF, 0, 0));
    }
}
