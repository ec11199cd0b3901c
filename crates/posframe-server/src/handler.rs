//! Request handler contract and the per-request response sender handed to
//! it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use posframe_core::{ConnectionContext, assemble_frame};
use posframe_proto::{HeaderValue, IsoMessage, Packager, TrailerValue};
use tokio::net::tcp::OwnedWriteHalf;
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Application-supplied request handler.
///
/// Dispatched once per inbound frame, on its own task, so a slow or
/// misbehaving handler never blocks the connection's read loop from
/// accepting the next frame.
#[async_trait]
pub trait Handler<M>: Send + Sync
where
    M: Send + 'static,
{
    /// Handle one inbound request, optionally replying via `responder`.
    ///
    /// A handler that never wants to reply to a given request (e.g. a
    /// network-management keepalive it chooses to ignore) simply returns
    /// without calling [`ResponseSender::send_response`].
    async fn handle(&self, request: M, responder: ResponseSender<M>);
}

/// Writes at most one response back on the connection a request arrived on.
pub struct ResponseSender<M> {
    connection: Arc<ConnectionContext<OwnedWriteHalf>>,
    packager: Arc<dyn Packager<Message = M>>,
    config: Arc<ServerConfig>,
    sent: AtomicBool,
}

impl<M> ResponseSender<M> {
    pub(crate) fn new(connection: Arc<ConnectionContext<OwnedWriteHalf>>, packager: Arc<dyn Packager<Message = M>>, config: Arc<ServerConfig>) -> Self {
        Self { connection, packager, config, sent: AtomicBool::new(false) }
    }
}

impl<M: IsoMessage> ResponseSender<M> {
    /// Pack and write `response` back on this request's connection.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AlreadyResponded`] if called more than once
    /// for the same request, [`ServerError::Protocol`] if packing fails, and
    /// [`ServerError::Transport`] if the write fails.
    pub async fn send_response(&self, response: &M) -> Result<(), ServerError> {
        if self.sent.swap(true, Ordering::SeqCst) {
            return Err(ServerError::AlreadyResponded);
        }

        let packed = self.packager.pack(response)?;
        debug!(conn_id = %self.connection.id, iso_message = %response.log(), "packed response");
        let frame = assemble_frame(
            self.config.length_codec.as_ref(),
            self.config.header_codec.as_ref(),
            self.config.trailer_codec.as_ref(),
            &HeaderValue::Empty,
            &packed,
            &TrailerValue::Empty,
        );

        self.connection.writer.write(&frame).await.map_err(ServerError::Transport)
    }
}
