//! Per-connection and per-request identity, timing, and attributes.
//!
//! The original source keeps separate `ClientContext`/`ServerContext`
//! structs even though their shape is identical (id, socket, buffered
//! reader/writer, remote address, start/end time). Both peers use the same
//! [`ConnectionContext`] here; callers that need to distinguish the two
//! roles do so by which session type owns the context, not by its type.

use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Instant;

use tokio::io::AsyncWrite;
use uuid::Uuid;

use crate::attributes::Attributes;
use crate::safe_writer::SafeWriter;

/// Shared state for one accepted or dialed TCP connection.
pub struct ConnectionContext<W> {
    /// Unique id assigned at connect/accept time.
    pub id: Uuid,
    /// Serialized writer over the connection's socket half.
    pub writer: SafeWriter<W>,
    /// Remote peer address.
    pub remote_addr: SocketAddr,
    /// Wall-clock time the connection was established.
    pub start_time: Instant,
    end_time: Mutex<Option<Instant>>,
}

impl<W> ConnectionContext<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Create a context for a freshly connected or accepted socket half.
    pub fn new(writer: W, remote_addr: SocketAddr) -> Self {
        Self {
            id: Uuid::new_v4(),
            writer: SafeWriter::new(writer),
            remote_addr,
            start_time: Instant::now(),
            end_time: Mutex::new(None),
        }
    }

    /// Mark the connection as ended now, if not already marked.
    pub fn mark_ended(&self) {
        #[allow(clippy::expect_used)]
        let mut guard = self.end_time.lock().expect("end_time mutex poisoned");
        if guard.is_none() {
            *guard = Some(Instant::now());
        }
    }

    /// Attributes for log correlation: `{connId}`.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        Attributes::for_connection(self.id).with_remote_addr(self.remote_addr)
    }
}

/// State for a single in-flight request, on either peer.
///
/// On the client, created by the application before `Send`. On the server,
/// created once per inbound message before the handler task is spawned.
#[derive(Debug)]
pub struct RequestContext<M> {
    /// Unique id for this request/response transaction.
    pub id: Uuid,
    /// Id of the enclosing connection.
    pub connection_id: Uuid,
    /// Time the request was created — the deadline origin for timeouts.
    pub start_time: Instant,
    /// The request message.
    pub request: M,
    /// The response message, once available.
    pub response: Option<M>,
}

impl<M> RequestContext<M> {
    /// Create a request context bound to `connection_id`.
    pub fn new(connection_id: Uuid, request: M) -> Self {
        Self { id: Uuid::new_v4(), connection_id, start_time: Instant::now(), request, response: None }
    }

    /// Time elapsed since the request began.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}
