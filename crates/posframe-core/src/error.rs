//! Correlation-layer errors.
//!
//! Distinct from [`posframe_proto::ProtocolError`]: these describe failures
//! in building or resolving a correlation key, not failures in decoding
//! wire bytes.

use thiserror::Error;

/// Errors raised while constructing a correlation key from a message's
/// configured match fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    /// One of the configured match fields was absent from the message.
    #[error("missing field {field} required for correlation key")]
    MissingField {
        /// The field id that was absent.
        field: u32,
    },

    /// Field 0 (MTI) is part of the match fields but the request MTI has no
    /// known response mapping.
    #[error("unknown response MTI for request MTI {0:?}")]
    UnknownMti(String),
}

impl From<posframe_proto::UnknownMti> for CorrelationError {
    fn from(err: posframe_proto::UnknownMti) -> Self {
        Self::UnknownMti(err.0)
    }
}
