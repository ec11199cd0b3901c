//! Wire framing and packager plugin contracts for the posframe POS protocol
//! core.
//!
//! This crate defines the pluggable pieces of a frame — length prefix,
//! header, trailer — and the interface a caller-supplied ISO 8583 packager
//! must satisfy. It has no notion of sockets, sessions, or correlation;
//! those live in `posframe-core` and above.
//!
//! Wire format (bit-exact):
//! `prefix_bytes || header_bytes || payload_bytes || trailer_bytes`

#![forbid(unsafe_code)]

mod error;
mod header;
mod length;
mod mti;
mod packager;
mod trailer;

pub use error::{ProtocolError, Result};
pub use header::{HeaderCodec, HeaderValue, NoOpHeaderCodec};
pub use length::{AsciiLengthCodec, LengthCodec};
pub use mti::{UnknownMti, response_mti};
pub use packager::{IsoMessage, Packager};
pub use trailer::{NoOpTrailerCodec, TrailerCodec, TrailerValue};
