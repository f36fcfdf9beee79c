//! The connection-scoped zlib stream used by ZRLE.
//!
//! ZRLE compresses all of a connection's tile data as ONE zlib stream,
//! chopped into per-rectangle chunks on the wire. Only the first chunk
//! carries the zlib header; later chunks are deflate continuation data
//! whose back-references may reach into earlier rectangles. The inflater
//! must therefore live as long as the connection: dropping or resetting it
//! mid-session corrupts every subsequent ZRLE rectangle.
//!
//! [`ZlibStream`] pairs that long-lived inflater with a FIFO of compressed
//! input. The session [`feed`](ZlibStream::feed)s each rectangle's payload
//! in, and the tile readers pull exact byte counts out. A rectangle's
//! payload is treated as self-contained: when the inflater can make no
//! progress on what has been fed so far, the read fails as truncated
//! rather than waiting for a future rectangle.

use crate::error::DecodeError;
use bytes::{Buf, BytesMut};
use flate2::{Decompress, FlushDecompress, Status};

/// A persistent inflater with a tail-appendable compressed-input buffer.
pub struct ZlibStream {
    /// Created on first read so a connection that never sees ZRLE never
    /// allocates inflate state.
    inflater: Option<Decompress>,
    input: BytesMut,
}

impl ZlibStream {
    /// Create an empty stream. No inflate state exists until the first read.
    pub fn new() -> Self {
        Self {
            inflater: None,
            input: BytesMut::new(),
        }
    }

    /// Append compressed bytes to the input FIFO. Never inflates, never
    /// blocks.
    pub fn feed(&mut self, compressed: &[u8]) {
        self.input.extend_from_slice(compressed);
    }

    /// Compressed bytes fed but not yet consumed by the inflater.
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Inflate exactly `out.len()` bytes into `out`.
    ///
    /// Fails with [`DecodeError::Truncated`] if the inflater exhausts the
    /// fed input first, and with [`DecodeError::Zlib`] if the stream is
    /// corrupt. On error the stream must be considered unusable; ZRLE
    /// cannot resynchronise a shared inflater.
    pub fn read_exact(&mut self, out: &mut [u8]) -> Result<(), DecodeError> {
        let inflater = self
            .inflater
            .get_or_insert_with(|| Decompress::new(true)); // true = zlib wrapper

        let mut filled = 0;
        while filled < out.len() {
            let before_in = inflater.total_in();
            let before_out = inflater.total_out();

            let status = inflater.decompress(&self.input, &mut out[filled..], FlushDecompress::Sync)?;

            let consumed = (inflater.total_in() - before_in) as usize;
            let produced = (inflater.total_out() - before_out) as usize;
            self.input.advance(consumed);
            filled += produced;

            if filled >= out.len() {
                break;
            }

            if matches!(status, Status::StreamEnd) {
                return Err(DecodeError::Truncated(format!(
                    "zlib stream ended after {} of {} bytes",
                    filled,
                    out.len()
                )));
            }

            // No progress with output space free means the inflater wants
            // compressed bytes the session has not fed.
            if consumed == 0 && produced == 0 {
                return Err(DecodeError::Truncated(format!(
                    "zlib input exhausted after {} of {} bytes",
                    filled,
                    out.len()
                )));
            }
        }

        Ok(())
    }

    /// Inflate exactly `n` bytes into a fresh buffer.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>, DecodeError> {
        let mut out = vec![0u8; n];
        self.read_exact(&mut out)?;
        Ok(out)
    }

    /// Inflate a single byte.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}

impl Default for ZlibStream {
    fn default() -> Self {
        Self::new()
    }
}
