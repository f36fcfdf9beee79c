//! Raw encoding decoder - uncompressed pixel data.
//!
//! Raw encoding (type 0) transmits `width * height` PIXELs in row-major
//! order, each in the server's pixel format. It is the mandatory fallback
//! every client must accept.

use crate::error::DecodeError;
use rfb_pixel::{Color, ColorMap, PixelFormat};
use rfb_protocol::io::RfbInStream;
use rfb_protocol::messages::types::Rectangle;
use tokio::io::AsyncRead;

/// Decode a raw rectangle into a `height x width` colour grid.
pub async fn decode<R: AsyncRead + Unpin>(
    stream: &mut RfbInStream<R>,
    rect: &Rectangle,
    format: &PixelFormat,
    color_map: Option<&ColorMap>,
) -> Result<Vec<Vec<Color>>, DecodeError> {
    if rect.width == 0 || rect.height == 0 {
        return Ok(Vec::new());
    }

    let bytes_per_pixel = format.bytes_per_pixel();
    let row_bytes = rect.width as usize * bytes_per_pixel;

    let mut data = vec![0u8; rect.height as usize * row_bytes];
    stream.read_bytes(&mut data).await?;

    let mut rows = Vec::with_capacity(rect.height as usize);
    for row in data.chunks(row_bytes) {
        let colors = row
            .chunks(bytes_per_pixel)
            .map(|pixel| Color::decode(format, color_map, pixel))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(colors);
    }

    Ok(rows)
}
