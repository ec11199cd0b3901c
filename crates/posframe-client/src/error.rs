//! Client-facing error type.

use posframe_core::CorrelationError;
use posframe_proto::ProtocolError;
use thiserror::Error;

/// Errors surfaced to application code by [`crate::ClientSession`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// Resolving or dialing the configured endpoint failed.
    #[error("connect failed: {0}")]
    Connect(#[source] std::io::Error),

    /// A send or receive on the socket failed.
    #[error("transport error: {0}")]
    Transport(#[source] std::io::Error),

    /// Framing or payload codec failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Correlation key construction failed.
    #[error(transparent)]
    Correlation(#[from] CorrelationError),

    /// `Wait` exceeded the configured per-request timeout before a matching
    /// response arrived.
    #[error("transaction timeout waiting for key {key:?}")]
    Timeout {
        /// The correlation key `Wait` was listening for.
        key: String,
    },

    /// Not connected to a server.
    #[error("not connected")]
    NotConnected,
}
