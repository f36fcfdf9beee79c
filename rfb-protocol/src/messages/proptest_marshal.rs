//! Property tests for marshalling and header framing.
//!
//! Real network streams fragment at arbitrary byte boundaries; the header
//! parser must produce identical results no matter where the transport
//! splits a read. The encoding-list marshaller must also be a bijection on
//! 4-byte-aligned input, since the server interprets the list positionally.

use super::client::{decode_encoding_list, marshal_encodings, SetEncodings};
use super::types::Rectangle;
use crate::io::{RfbInStream, RfbOutStream};
use proptest::prelude::*;

/// Reader that forces a split at a fixed byte boundary.
struct FragmentingReader {
    data: Vec<u8>,
    pos: usize,
    boundary: usize,
}

impl FragmentingReader {
    fn new(data: Vec<u8>, boundary: usize) -> Self {
        let boundary = boundary.min(data.len());
        Self {
            data,
            pos: 0,
            boundary,
        }
    }
}

impl tokio::io::AsyncRead for FragmentingReader {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        if self.pos >= self.data.len() {
            return std::task::Poll::Ready(Ok(()));
        }

        let available = if self.pos < self.boundary {
            (self.boundary - self.pos).min(buf.remaining())
        } else {
            (self.data.len() - self.pos).min(buf.remaining())
        };

        if available == 0 {
            return std::task::Poll::Ready(Ok(()));
        }

        let pos = self.pos;
        buf.put_slice(&self.data[pos..pos + available]);
        self.pos += available;

        std::task::Poll::Ready(Ok(()))
    }
}

fn arbitrary_rectangle() -> impl Strategy<Value = Rectangle> {
    (
        0u16..=4096,
        0u16..=4096,
        0u16..=1920,
        0u16..=1080,
        prop::sample::select(vec![0i32, 1, 2, 16, -239, -223]),
    )
        .prop_map(|(x, y, width, height, encoding)| Rectangle {
            x,
            y,
            width,
            height,
            encoding,
        })
}

proptest! {
    /// A rectangle header parses identically across every fragmentation
    /// boundary.
    #[test]
    fn rectangle_header_survives_fragmentation(
        rect in arbitrary_rectangle(),
        boundary in 0usize..=12,
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(async {
            let mut buffer = Vec::new();
            let mut out = RfbOutStream::new(&mut buffer);
            rect.write_to(&mut out);
            out.flush().await.unwrap();

            let reader = FragmentingReader::new(buffer, boundary);
            let mut inp = RfbInStream::new(reader);
            let read_back = Rectangle::read_from(&mut inp).await.unwrap();
            prop_assert_eq!(rect, read_back);
            Ok(())
        })?;
    }

    /// marshal is the left inverse of decode on aligned byte strings.
    #[test]
    fn marshal_decode_idempotent_on_aligned_bytes(words in prop::collection::vec(any::<[u8; 4]>(), 0..64)) {
        let bytes: Vec<u8> = words.into_iter().flatten().collect();
        prop_assert_eq!(marshal_encodings(&decode_encoding_list(&bytes)), bytes);
    }

    /// decode is the left inverse of marshal on any identifier list.
    #[test]
    fn decode_marshal_round_trips_identifiers(ids in prop::collection::vec(any::<i32>(), 0..64)) {
        prop_assert_eq!(decode_encoding_list(&marshal_encodings(&ids)), ids);
    }

    /// The full SetEncodings message round-trips its list unchanged.
    #[test]
    fn set_encodings_round_trip(ids in prop::collection::vec(any::<i32>(), 0..32)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(async {
            let message = SetEncodings { encodings: ids };

            let mut buffer = Vec::new();
            let mut out = RfbOutStream::new(&mut buffer);
            message.write_to(&mut out);
            out.flush().await.unwrap();

            // Strip the message-type byte the reader does not consume
            let mut inp = RfbInStream::new(std::io::Cursor::new(buffer[1..].to_vec()));
            let read_back = SetEncodings::read_from(&mut inp).await.unwrap();
            prop_assert_eq!(message, read_back);
            Ok(())
        })?;
    }
}
