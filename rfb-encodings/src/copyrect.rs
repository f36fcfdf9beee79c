//! CopyRect encoding decoder - copy from another screen location.
//!
//! CopyRect (type 1) carries no pixels at all: just the source position of
//! an equally-sized region already on screen. The consumer performs the
//! copy out of its own framebuffer, which makes this the cheapest encoding
//! for scrolling and window moves regardless of rectangle size.

use crate::error::DecodeError;
use rfb_protocol::io::RfbInStream;
use rfb_protocol::messages::types::Rectangle;
use tokio::io::AsyncRead;

/// Decode a CopyRect rectangle: the `(src_x, src_y)` to copy from.
///
/// The rectangle header gives the destination and size; the wire payload
/// is only the two source coordinates.
pub async fn decode<R: AsyncRead + Unpin>(
    stream: &mut RfbInStream<R>,
    _rect: &Rectangle,
) -> Result<(u16, u16), DecodeError> {
    let src_x = stream.read_u16().await?;
    let src_y = stream.read_u16().await?;
    Ok((src_x, src_y))
}
