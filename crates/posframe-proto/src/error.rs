//! Wire-level protocol errors.
//!
//! These describe failures in the framing codecs (length prefix, header,
//! trailer) and in packager pack/unpack calls. They never describe
//! connection lifecycle or correlation failures — those live closer to the
//! session layer in `posframe-core`.

use thiserror::Error;

/// Errors produced while packing or unpacking a frame.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The peer cleanly closed the connection before a frame boundary.
    #[error("connection closed")]
    Eof,

    /// The announced frame length exceeds the configured maximum.
    #[error("announced length {size} exceeds maximum {max}")]
    MessageTooLarge {
        /// Announced length, in bytes.
        size: usize,
        /// Configured maximum, in bytes.
        max: usize,
    },

    /// A length-prefix, header, or trailer codec failed to decode its bytes.
    #[error("{part} decode failed: {reason}")]
    CodecDecode {
        /// Which part of the frame failed to decode (`"length"`, `"header"`,
        /// `"trailer"`).
        part: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// The payload could not be unpacked by the packager.
    #[error("payload unpack failed: {0}")]
    PayloadUnpack(String),

    /// The payload could not be packed by the packager.
    #[error("payload pack failed: {0}")]
    PayloadPack(String),

    /// Underlying I/O failure while reading or writing a frame.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the proto crate.
pub type Result<T> = std::result::Result<T, ProtocolError>;
