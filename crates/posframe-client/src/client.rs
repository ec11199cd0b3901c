//! The initiating peer: dial, send, wait for a correlated response, and
//! (optionally) transparently redial after the connection drops.

use std::sync::Arc;

use posframe_core::{ConnectionContext, FrameOutcome, InFlightTable, RequestContext, StanCounter, assemble_frame, describe_panic_payload, read_frame, request_key, response_key};
use posframe_proto::{IsoMessage, Packager, ProtocolError};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{RwLock, oneshot};
use tracing::{debug, error, info, warn};

use crate::config::{ClientConfig, RECONNECT_BACKOFF, SEND_RETRY_GAP};
use crate::error::ClientError;

/// A request registered with the in-flight table, ready to be awaited with
/// [`ClientSession::wait`].
#[derive(Debug)]
pub struct PendingTransaction<M> {
    ctx: RequestContext<M>,
    key: String,
    rx: oneshot::Receiver<M>,
}

impl<M> PendingTransaction<M> {
    /// The request context this transaction was registered under.
    #[must_use]
    pub fn context(&self) -> &RequestContext<M> {
        &self.ctx
    }
}

/// A connected (or disconnecting) client session bound to one ISO 8583
/// packager implementation.
///
/// Cloned cheaply via `Arc`; `send`/`wait` are safe to call concurrently from
/// many tasks sharing the same session.
pub struct ClientSession<P: Packager> {
    config: ClientConfig,
    packager: Arc<P>,
    stan: StanCounter,
    in_flight: Arc<InFlightTable<P::Message>>,
    connection: RwLock<Option<Arc<ConnectionContext<OwnedWriteHalf>>>>,
    listen_task: RwLock<Option<tokio::task::AbortHandle>>,
}

impl<P> ClientSession<P>
where
    P: Packager + 'static,
{
    /// Build a session. Call [`ClientSession::connect`] to dial and start
    /// the background listen loop.
    #[must_use]
    pub fn new(config: ClientConfig, packager: P) -> Arc<Self> {
        Arc::new(Self {
            config,
            packager: Arc::new(packager),
            stan: StanCounter::default(),
            in_flight: Arc::new(InFlightTable::new()),
            connection: RwLock::new(None),
            listen_task: RwLock::new(None),
        })
    }

    async fn dial(&self) -> Result<TcpStream, ClientError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        TcpStream::connect(&addr).await.map_err(ClientError::Connect)
    }

    /// Dial the configured server and start the background listen loop.
    ///
    /// Returns once the first connection is established; subsequent
    /// reconnects (when `auto_reconnect` is set) happen in the background
    /// and are not reported back to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`] if the initial dial fails.
    pub async fn connect(self: &Arc<Self>) -> Result<(), ClientError> {
        let stream = self.dial().await?;
        let (read_half, ctx) = self.install_connection(stream).await;

        let session = Arc::clone(self);
        tokio::spawn(async move { session.supervise(read_half, ctx).await });
        Ok(())
    }

    async fn install_connection(&self, stream: TcpStream) -> (OwnedReadHalf, Arc<ConnectionContext<OwnedWriteHalf>>) {
        let remote_addr = stream.peer_addr().unwrap_or_else(|_| ([0, 0, 0, 0], 0).into());
        let (read_half, write_half) = stream.into_split();
        let ctx = Arc::new(ConnectionContext::new(write_half, remote_addr));
        *self.connection.write().await = Some(Arc::clone(&ctx));
        info!(conn_id = %ctx.id, %remote_addr, "connected");
        (read_half, ctx)
    }

    /// Drive one connection's listen loop to completion, then — if
    /// `auto_reconnect` is set — redial with a fixed backoff and do it
    /// again. Returns only when the session gives up (no auto-reconnect, or
    /// the session is dropped).
    async fn supervise(self: Arc<Self>, mut read_half: OwnedReadHalf, mut ctx: Arc<ConnectionContext<OwnedWriteHalf>>) {
        loop {
            let outcome = self.run_guarded_listen_loop(read_half, Arc::clone(&ctx)).await;
            if let Err(err) = outcome {
                warn!(conn_id = %ctx.id, error = %err, "listen loop ended");
            }
            ctx.mark_ended();
            {
                let mut current = self.connection.write().await;
                if current.as_ref().is_some_and(|c| Arc::ptr_eq(c, &ctx)) {
                    *current = None;
                }
            }

            if !self.config.auto_reconnect {
                return;
            }

            loop {
                tokio::time::sleep(RECONNECT_BACKOFF).await;
                match self.dial().await {
                    Ok(stream) => {
                        let (new_read_half, new_ctx) = self.install_connection(stream).await;
                        read_half = new_read_half;
                        ctx = new_ctx;
                        break;
                    }
                    Err(err) => warn!(error = %err, "reconnect attempt failed, retrying"),
                }
            }
        }
    }

    /// Run the listen loop in its own task and await it, so a panic inside
    /// frame handling is caught by the runtime and reported instead of
    /// silently taking the process down.
    async fn run_guarded_listen_loop(self: &Arc<Self>, read_half: OwnedReadHalf, ctx: Arc<ConnectionContext<OwnedWriteHalf>>) -> Result<(), ClientError> {
        let session = Arc::clone(self);
        let handle = tokio::spawn(async move { session.listen_loop(read_half, ctx).await });
        *self.listen_task.write().await = Some(handle.abort_handle());
        let result = match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                let message = describe_panic_payload(&*join_err.into_panic());
                error!(panic = %message, "listen loop task panicked");
                Err(ClientError::Transport(std::io::Error::other(format!("listen loop task panicked: {message}"))))
            }
            Err(join_err) if join_err.is_cancelled() => {
                debug!("listen loop task cancelled by disconnect");
                Ok(())
            }
            Err(join_err) => Err(ClientError::Transport(std::io::Error::other(join_err.to_string()))),
        };
        self.listen_task.write().await.take();
        result
    }

    async fn listen_loop(self: Arc<Self>, mut read_half: OwnedReadHalf, ctx: Arc<ConnectionContext<OwnedWriteHalf>>) -> Result<(), ClientError> {
        loop {
            let outcome = read_frame(
                &mut read_half,
                self.config.length_codec.as_ref(),
                self.config.header_codec.as_ref(),
                self.config.trailer_codec.as_ref(),
                self.config.read_server_timeout,
                self.config.read_message_timeout,
                self.config.max_message_size,
            )
            .await;

            let payload = match outcome {
                Ok(FrameOutcome::Keepalive) => continue,
                Ok(FrameOutcome::Frame { payload, .. }) => payload,
                Err(ProtocolError::Eof) => {
                    debug!(conn_id = %ctx.id, "server closed connection");
                    return Ok(());
                }
                Err(err) => return Err(ClientError::Protocol(err)),
            };

            let message = match self.packager.unpack(&payload) {
                Ok(message) => message,
                Err(err) => {
                    warn!(conn_id = %ctx.id, error = %err, "dropping frame: payload unpack failed");
                    continue;
                }
            };
            debug!(conn_id = %ctx.id, iso_message = %message.log(), "unpacked response");

            match response_key(&self.config.match_fields, &message) {
                Ok(key) => self.in_flight.deliver(&key, message).await,
                Err(err) => warn!(conn_id = %ctx.id, error = %err, "dropping frame: could not build correlation key"),
            }
        }
    }

    /// Stamp `request`'s STAN field, register it in the in-flight table, and
    /// write it to the wire.
    ///
    /// On a write failure, retries with a 1-second gap between attempts
    /// until the write succeeds or `ctx.elapsed() >= timeout`, whichever
    /// comes first, then surfaces the last error.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConnected`] if no connection is currently
    /// established, [`ClientError::Correlation`] if the configured match
    /// fields cannot be read from `request`, and [`ClientError::Protocol`] or
    /// [`ClientError::Transport`] on pack/write failure.
    pub async fn send(&self, mut request: P::Message) -> Result<PendingTransaction<P::Message>, ClientError> {
        request.set_field(11, format!("{:06}", self.stan.next()));

        let key = request_key(&self.config.match_fields, &request)?;

        let conn = self.connection.read().await.clone().ok_or(ClientError::NotConnected)?;
        let ctx = RequestContext::new(conn.id, request.clone());
        let rx = self.in_flight.add(&ctx, key.clone()).await;

        let packed = self.packager.pack(&request)?;
        debug!(conn_id = %conn.id, iso_message = %request.log(), "packed request");
        let frame = assemble_frame(
            self.config.length_codec.as_ref(),
            self.config.header_codec.as_ref(),
            self.config.trailer_codec.as_ref(),
            &posframe_proto::HeaderValue::Empty,
            &packed,
            &posframe_proto::TrailerValue::Empty,
        );

        loop {
            match conn.writer.write(&frame).await {
                Ok(()) => return Ok(PendingTransaction { ctx, key, rx }),
                Err(err) => {
                    if ctx.elapsed() >= self.config.timeout {
                        self.in_flight.remove(&key).await;
                        return Err(ClientError::Transport(err));
                    }
                    warn!(conn_id = %conn.id, error = %err, "send failed, retrying in 1s");
                    tokio::time::sleep(SEND_RETRY_GAP).await;
                }
            }
        }
    }

    /// Block until `pending`'s correlated response arrives or the
    /// configured per-request timeout elapses.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] if the deadline elapses first, or
    /// [`ClientError::Transport`] if the connection dropped before a
    /// response arrived.
    pub async fn wait(&self, pending: PendingTransaction<P::Message>) -> Result<P::Message, ClientError> {
        let remaining = self.config.timeout.saturating_sub(pending.ctx.elapsed());
        let result = tokio::time::timeout(remaining, pending.rx).await;

        match result {
            Ok(Ok(message)) => Ok(message),
            Ok(Err(_recv_error)) => {
                self.in_flight.remove(&pending.key).await;
                Err(ClientError::Transport(std::io::Error::other("connection lost while awaiting response")))
            }
            Err(_elapsed) => {
                self.in_flight.remove(&pending.key).await;
                Err(ClientError::Timeout { key: pending.key })
            }
        }
    }

    /// Send `request` and wait for its correlated response within the
    /// configured timeout.
    ///
    /// # Errors
    ///
    /// See [`ClientSession::send`] and [`ClientSession::wait`].
    pub async fn request(&self, request: P::Message) -> Result<P::Message, ClientError> {
        let pending = self.send(request).await?;
        self.wait(pending).await
    }

    /// Number of transactions currently awaiting a response.
    pub async fn pending_count(&self) -> usize {
        self.in_flight.len().await
    }

    /// Close the current connection, if one is open.
    ///
    /// Idempotent: calling this with no connection open (or calling it
    /// twice) is a no-op and never returns an error. If `auto_reconnect` is
    /// enabled, the background supervisor will redial after its usual
    /// backoff, same as if the peer had closed the connection.
    pub async fn disconnect(&self) -> Result<(), ClientError> {
        if let Some(handle) = self.listen_task.write().await.take() {
            handle.abort();
        }

        let ctx = self.connection.write().await.take();
        if let Some(ctx) = ctx {
            ctx.mark_ended();
            if let Err(err) = ctx.writer.shutdown().await {
                debug!(conn_id = %ctx.id, error = %err, "shutdown error during disconnect");
            }
            info!(conn_id = %ctx.id, "disconnected");
        }

        Ok(())
    }
}
