//! Pluggable frame header codec.
//!
//! The core never interprets header bytes; it only needs their length to
//! compute the frame's total size and to know how many bytes to skip before
//! the ISO payload begins. Implementers supply the actual layout.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::Result;

/// A decoded or to-be-encoded header value.
///
/// The original source left the header value untyped (`interface{}` in Go).
/// This tagged variant keeps the same flexibility: a codec that doesn't use
/// headers at all produces `Empty`, a codec with a fixed binary layout
/// produces `Bytes`, and a codec with named sub-fields (e.g. a
/// network-management header with separate "node id" / "terminal id"
/// sub-fields) produces `Structured`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HeaderValue {
    /// No header present.
    #[default]
    Empty,
    /// Opaque header bytes, already encoded.
    Bytes(Vec<u8>),
    /// Named sub-fields, for codecs that want to expose header contents for
    /// logging without a bespoke type.
    Structured(BTreeMap<String, String>),
}

/// Pack and unpack the header portion of a frame.
///
/// Implementations are pure: no global state, no side effects beyond the
/// reader they're given.
#[async_trait]
pub trait HeaderCodec: Send + Sync {
    /// Encode `value` into wire bytes. Returns the encoded bytes; callers
    /// derive the header length from `bytes.len()`.
    fn pack(&self, value: &HeaderValue) -> Vec<u8>;

    /// Decode a header from `reader`, returning the decoded value and the
    /// number of bytes consumed.
    async fn unpack(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<(HeaderValue, usize)>;
}

/// No-op header codec: zero-length header on the wire.
///
/// This is the default used when a packager doesn't define a header layout,
/// matching `header.Pack`/`header.Unpack` in the original source, which are
/// literal no-ops ("not implemented").
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHeaderCodec;

#[async_trait]
impl HeaderCodec for NoOpHeaderCodec {
    fn pack(&self, _value: &HeaderValue) -> Vec<u8> {
        Vec::new()
    }

    async fn unpack(
        &self,
        _reader: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<(HeaderValue, usize)> {
        Ok((HeaderValue::Empty, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_header_round_trips_empty() {
        let codec = NoOpHeaderCodec;
        let bytes = codec.pack(&HeaderValue::Empty);
        assert!(bytes.is_empty());

        let mut cursor: &[u8] = &[];
        let (value, len) = codec.unpack(&mut cursor).await.expect("unpack");
        assert_eq!(value, HeaderValue::Empty);
        assert_eq!(len, 0);
    }
}
