//! Server-facing error type.

use posframe_proto::ProtocolError;
use thiserror::Error;

/// Errors surfaced to application code by [`crate::ServerSession`].
#[derive(Error, Debug)]
pub enum ServerError {
    /// Binding the configured listen address failed.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Accepting an inbound connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// A write on a connection's socket failed.
    #[error("transport error: {0}")]
    Transport(#[source] std::io::Error),

    /// Framing or payload codec failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A handler called `send_response` more than once for the same
    /// request.
    #[error("a response was already sent for this request")]
    AlreadyResponded,
}
