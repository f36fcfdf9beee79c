//! Buffered streams for RFB wire traffic.
//!
//! [`RfbInStream`] wraps an [`AsyncRead`] transport and hands out the
//! primitive types the protocol is built from (`u8`/`u16`/`u32`/`i32`,
//! all network byte order) plus exact-length byte reads. Data is pulled
//! from the transport into an internal [`BytesMut`] buffer on demand, so
//! a fragmented TCP stream never surfaces a partial value.
//!
//! [`RfbOutStream`] is the write-side mirror: values accumulate in a
//! buffer and hit the transport only on [`flush`](RfbOutStream::flush).
//!
//! End-of-stream before a value is complete is reported as
//! [`std::io::ErrorKind::UnexpectedEof`]; the decoding layer maps that to
//! its truncation error.

use bytes::{Buf, BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Buffered input stream over an async byte transport.
pub struct RfbInStream<R> {
    reader: R,
    buffer: BytesMut,
}

impl<R: AsyncRead + Unpin> RfbInStream<R> {
    /// Create an input stream with the default buffer capacity (8 KiB).
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_CAPACITY)
    }

    /// Create an input stream with a specific initial buffer capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Fill the buffer until it holds at least `n` bytes.
    async fn ensure_bytes(&mut self, n: usize) -> std::io::Result<()> {
        while self.buffer.len() < n {
            let read = self.reader.read_buf(&mut self.buffer).await?;
            if read == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("expected {} bytes, got {}", n, self.buffer.len()),
                ));
            }
        }
        Ok(())
    }

    /// Read a single byte.
    pub async fn read_u8(&mut self) -> std::io::Result<u8> {
        self.ensure_bytes(1).await?;
        Ok(self.buffer.get_u8())
    }

    /// Read a big-endian `u16`.
    pub async fn read_u16(&mut self) -> std::io::Result<u16> {
        self.ensure_bytes(2).await?;
        Ok(self.buffer.get_u16())
    }

    /// Read a big-endian `u32`.
    pub async fn read_u32(&mut self) -> std::io::Result<u32> {
        self.ensure_bytes(4).await?;
        Ok(self.buffer.get_u32())
    }

    /// Read a big-endian `i32` (encoding identifiers are signed).
    pub async fn read_i32(&mut self) -> std::io::Result<i32> {
        self.ensure_bytes(4).await?;
        Ok(self.buffer.get_i32())
    }

    /// Fill `buf` completely or fail with `UnexpectedEof`.
    pub async fn read_bytes(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
        self.ensure_bytes(buf.len()).await?;
        self.buffer.copy_to_slice(buf);
        Ok(())
    }

    /// Read and discard `n` bytes (padding).
    pub async fn skip(&mut self, n: usize) -> std::io::Result<()> {
        self.ensure_bytes(n).await?;
        self.buffer.advance(n);
        Ok(())
    }

    /// Bytes currently buffered, readable without touching the transport.
    pub fn available(&self) -> usize {
        self.buffer.len()
    }
}

/// Buffered output stream over an async byte transport.
///
/// Writes accumulate internally; nothing reaches the transport until
/// [`flush`](Self::flush) runs. Dropping the stream discards unflushed
/// data.
pub struct RfbOutStream<W> {
    writer: W,
    buffer: BytesMut,
}

impl<W: AsyncWrite + Unpin> RfbOutStream<W> {
    /// Create an output stream with the default buffer capacity (8 KiB).
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(DEFAULT_BUFFER_CAPACITY),
        }
    }

    /// Buffer a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.put_u8(value);
    }

    /// Buffer a big-endian `u16`.
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.put_u16(value);
    }

    /// Buffer a big-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.put_u32(value);
    }

    /// Buffer a big-endian `i32`.
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.put_i32(value);
    }

    /// Buffer a byte slice verbatim.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Write all buffered data to the transport and flush it.
    pub async fn flush(&mut self) -> std::io::Result<()> {
        if !self.buffer.is_empty() {
            self.writer.write_all(&self.buffer).await?;
            self.buffer.clear();
        }
        self.writer.flush().await
    }

    /// Bytes buffered but not yet flushed.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}
