//! The accepting peer: bounded accept loop, one read loop per connection,
//! and per-request handler dispatch.

use std::sync::Arc;

use posframe_core::{ConnectionContext, FrameOutcome, describe_panic_payload, read_frame};
use posframe_proto::{IsoMessage, Packager, ProtocolError};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handler::{Handler, ResponseSender};

/// A bound server accepting connections and dispatching inbound requests to
/// a [`Handler`].
///
/// `max_clients` bounds how many connections are served concurrently: the
/// accept loop accepts every incoming connection, then tries to acquire a
/// semaphore permit. If the limit is already reached, the socket is closed
/// immediately instead of being served, so the `max_clients + 1`-th
/// concurrent client is accepted and dropped rather than left sitting in the
/// OS backlog.
pub struct ServerSession<P: Packager, H: Handler<P::Message>>
where
    P::Message: 'static,
{
    config: Arc<ServerConfig>,
    packager: Arc<P>,
    handler: Arc<H>,
    permits: Arc<Semaphore>,
}

impl<P, H> ServerSession<P, H>
where
    P: Packager + 'static,
    H: Handler<P::Message> + 'static,
{
    /// Build a session. Call [`ServerSession::listen`] to bind and start
    /// accepting.
    #[must_use]
    pub fn new(config: ServerConfig, packager: P, handler: H) -> Arc<Self> {
        let permits = Arc::new(Semaphore::new(config.max_clients));
        Arc::new(Self { config: Arc::new(config), packager: Arc::new(packager), handler: Arc::new(handler), permits })
    }

    /// Bind the configured address and accept connections until an accept
    /// call returns a fatal error.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the listen address cannot be bound.
    pub async fn listen(self: &Arc<Self>) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await.map_err(ServerError::Bind)?;
        info!(name = %self.config.name, addr = %self.config.bind_addr, max_clients = self.config.max_clients, "listening");

        loop {
            let (stream, remote_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    warn!(error = %err, "accept failed");
                    continue;
                }
            };

            let permit = match Arc::clone(&self.permits).try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => {
                    warn!(%remote_addr, "connection limit reached, closing");
                    drop(stream);
                    continue;
                }
            };

            let session = Arc::clone(self);
            tokio::spawn(async move {
                debug!(%remote_addr, "accepted connection");
                session.run_guarded_connection(stream).await;
                drop(permit);
            });
        }
    }

    async fn run_guarded_connection(self: Arc<Self>, stream: TcpStream) {
        let remote_addr = stream.peer_addr().unwrap_or_else(|_| ([0, 0, 0, 0], 0).into());
        let (read_half, write_half) = stream.into_split();
        let ctx = Arc::new(ConnectionContext::new(write_half, remote_addr));
        let conn_id = ctx.id;

        let session = Arc::clone(&self);
        let ctx_for_task = Arc::clone(&ctx);
        let handle = tokio::spawn(async move { session.connection_loop(read_half, ctx_for_task).await });

        let outcome = match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                let message = describe_panic_payload(&*join_err.into_panic());
                error!(%conn_id, panic = %message, "connection loop task panicked");
                Err(ServerError::Transport(std::io::Error::other(format!("connection loop task panicked: {message}"))))
            }
            Err(join_err) => Err(ServerError::Transport(std::io::Error::other(join_err.to_string()))),
        };

        if let Err(err) = outcome {
            debug!(%conn_id, error = %err, "connection closed");
        }
        ctx.mark_ended();
    }

    async fn connection_loop(self: Arc<Self>, mut read_half: OwnedReadHalf, ctx: Arc<ConnectionContext<tokio::net::tcp::OwnedWriteHalf>>) -> Result<(), ServerError> {
        loop {
            let outcome = read_frame(
                &mut read_half,
                self.config.length_codec.as_ref(),
                self.config.header_codec.as_ref(),
                self.config.trailer_codec.as_ref(),
                self.config.read_client_timeout,
                self.config.read_message_timeout,
                self.config.max_message_size,
            )
            .await;

            let payload = match outcome {
                Ok(FrameOutcome::Keepalive) => continue,
                Ok(FrameOutcome::Frame { payload, .. }) => payload,
                Err(ProtocolError::Eof) => {
                    debug!(conn_id = %ctx.id, "client closed connection");
                    return Ok(());
                }
                Err(err @ ProtocolError::MessageTooLarge { .. }) => {
                    warn!(conn_id = %ctx.id, error = %err, "oversize frame, closing connection");
                    return Err(ServerError::Protocol(err));
                }
                Err(err) => return Err(ServerError::Protocol(err)),
            };

            let message = match self.packager.unpack(&payload) {
                Ok(message) => message,
                Err(err) => {
                    warn!(conn_id = %ctx.id, error = %err, "dropping frame: payload unpack failed");
                    continue;
                }
            };
            debug!(conn_id = %ctx.id, iso_message = %message.log(), "unpacked request");

            let handler = Arc::clone(&self.handler);
            let packager: Arc<P> = Arc::clone(&self.packager);
            let config = Arc::clone(&self.config);
            let connection = Arc::clone(&ctx);
            tokio::spawn(async move {
                let responder = ResponseSender::new(connection, packager, config);
                handler.handle(message, responder).await;
            });
        }
    }
}
