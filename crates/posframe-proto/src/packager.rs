//! Packager and message plugin contracts.
//!
//! The core treats the ISO 8583 packager as a black box: it only relies on
//! `pack`/`unpack` to move between wire bytes and a message, and on
//! `get_field`/`set_field`/`bitmap`/`log` to build correlation keys and emit
//! structured log lines. Field layout, bitmap encoding, and data element
//! formats are entirely the packager's concern.

use crate::error::Result;

/// An ISO 8583 message as the core needs to see it.
///
/// Field ids are the two- or three-digit data element numbers from the ISO
/// 8583 standard (field 0 is the MTI, field 11 is the STAN, etc); this trait
/// represents them as plain `u32`s rather than naming specific fields, since
/// field semantics are the packager's concern, not the core's.
pub trait IsoMessage: Send + Sync + Clone + std::fmt::Debug {
    /// Look up a field's string value, if present in the bitmap.
    fn get_field(&self, id: u32) -> Option<&str>;

    /// Set a field's string value, marking it present in the bitmap.
    fn set_field(&mut self, id: u32, value: impl Into<String>)
    where
        Self: Sized;

    /// Ids of all fields currently present.
    fn bitmap(&self) -> Vec<u32>;

    /// Render the message as a JSON string for structured logging.
    fn log(&self) -> String;
}

/// Encodes and decodes the ISO payload portion of a frame.
///
/// A packager owns the field table (tag/length/format rules) and the bitmap
/// encoding; the core never inspects payload bytes except through this
/// trait.
pub trait Packager: Send + Sync {
    /// Message type produced by this packager.
    type Message: IsoMessage;

    /// Serialize a message into wire bytes (MTI + bitmap + fields).
    fn pack(&self, msg: &Self::Message) -> Result<Vec<u8>>;

    /// Deserialize wire bytes into a message.
    fn unpack(&self, bytes: &[u8]) -> Result<Self::Message>;
}
