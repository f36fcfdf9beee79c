//! RFB protocol message types.
//!
//! - [`types`] - the rectangle header and encoding identifier constants
//! - [`client`] - client-to-server messages (SetEncodings)
//!
//! All multi-byte integers on the wire are big-endian (network byte
//! order). Parsers fail fast: short input surfaces as `UnexpectedEof`,
//! never as a silently padded value.

pub mod client;
pub mod types;

#[cfg(test)]
mod proptest_marshal;
