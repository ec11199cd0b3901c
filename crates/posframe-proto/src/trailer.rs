//! Pluggable frame trailer codec.
//!
//! Unlike the header, the trailer is unpacked from an already-buffered
//! payload slice rather than streamed from the socket directly: the server
//! read loop must know the trailer's length up front (via
//! [`TrailerCodec::trailer_length`]) to size its payload read before the
//! trailer bytes are consumed.

use crate::error::Result;
use crate::header::HeaderValue as TrailerValueInner;

/// A decoded or to-be-encoded trailer value.
///
/// Reuses the same tagged-variant shape as [`crate::header::HeaderValue`]
/// since both are opaque, codec-defined wire fragments the core never
/// interprets.
pub type TrailerValue = TrailerValueInner;

/// Pack and unpack the trailer portion of a frame.
pub trait TrailerCodec: Send + Sync {
    /// Encode `value` into wire bytes.
    fn pack(&self, value: &TrailerValue) -> Vec<u8>;

    /// Decode a trailer from the tail of an already-read buffer, returning
    /// the decoded value and the number of bytes it occupied.
    fn unpack(&self, bytes: &[u8]) -> Result<(TrailerValue, usize)>;

    /// Length, in bytes, of the trailer this codec produces. The server
    /// needs this *before* reading the payload so it knows how many bytes
    /// of the frame body belong to the ISO payload versus the trailer.
    fn trailer_length(&self) -> usize;
}

/// No-op trailer codec: zero-length trailer on the wire.
///
/// Matches `trailer.Pack`/`trailer.Unpack` in the original source, which are
/// literal no-ops.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpTrailerCodec;

impl TrailerCodec for NoOpTrailerCodec {
    fn pack(&self, _value: &TrailerValue) -> Vec<u8> {
        Vec::new()
    }

    fn unpack(&self, _bytes: &[u8]) -> Result<(TrailerValue, usize)> {
        Ok((TrailerValue::Empty, 0))
    }

    fn trailer_length(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_trailer_has_zero_length() {
        let codec = NoOpTrailerCodec;
        assert_eq!(codec.trailer_length(), 0);
        assert!(codec.pack(&TrailerValue::Empty).is_empty());
        let (value, len) = codec.unpack(&[]).expect("unpack");
        assert_eq!(value, TrailerValue::Empty);
        assert_eq!(len, 0);
    }
}
