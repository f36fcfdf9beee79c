//! Client-to-server RFB messages.
//!
//! Only the message the decoding core has a stake in lives here:
//! [`SetEncodings`], which tells the server which encodings the client
//! decodes and in what order of preference. The server may still send any
//! encoding it likes, but a well-behaved one picks the earliest entry it
//! supports, so the ordering is observable behaviour.

use crate::io::{RfbInStream, RfbOutStream};
use tokio::io::{AsyncRead, AsyncWrite};

/// Serialise an encoding list as consecutive big-endian `i32`s.
///
/// This is the body of a SetEncodings message without the framing; the
/// order of `encodings` is preserved byte for byte.
pub fn marshal_encodings(encodings: &[i32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(encodings.len() * 4);
    for encoding in encodings {
        bytes.extend_from_slice(&encoding.to_be_bytes());
    }
    bytes
}

/// Parse consecutive big-endian `i32`s back into an encoding list.
///
/// The inverse of [`marshal_encodings`]. A trailing fragment shorter than
/// four bytes is ignored.
pub fn decode_encoding_list(bytes: &[u8]) -> Vec<i32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// SetEncodings message - declare supported encodings.
///
/// # Wire Format
///
/// - 1 byte: message type (2)
/// - 1 byte: padding
/// - 2 bytes: number of encodings
/// - N * 4 bytes: encoding identifiers (signed, big-endian)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetEncodings {
    pub encodings: Vec<i32>,
}

impl SetEncodings {
    const MESSAGE_TYPE: u8 = 2;

    /// Read a SetEncodings body (after the message-type byte).
    pub async fn read_from<R: AsyncRead + Unpin>(
        stream: &mut RfbInStream<R>,
    ) -> std::io::Result<Self> {
        stream.skip(1).await?; // padding
        let count = stream.read_u16().await? as usize;

        let mut encodings = Vec::with_capacity(count);
        for _ in 0..count {
            encodings.push(stream.read_i32().await?);
        }

        Ok(Self { encodings })
    }

    /// Write the full message including type byte and framing.
    pub fn write_to<W: AsyncWrite + Unpin>(&self, stream: &mut RfbOutStream<W>) {
        stream.write_u8(Self::MESSAGE_TYPE);
        stream.write_u8(0); // padding
        stream.write_u16(self.encodings.len() as u16);
        stream.write_bytes(&marshal_encodings(&self.encodings));
    }
}
