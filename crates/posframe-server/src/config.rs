//! Server session configuration.

use std::sync::Arc;
use std::time::Duration;

use posframe_proto::{AsciiLengthCodec, HeaderCodec, LengthCodec, NoOpHeaderCodec, NoOpTrailerCodec, TrailerCodec};

/// Default maximum number of simultaneously accepted connections.
pub const DEFAULT_MAX_CLIENTS: usize = 10;
/// Default idle deadline between frames on an accepted connection.
pub const DEFAULT_READ_CLIENT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// Default deadline for reading a payload once its length is known.
pub const DEFAULT_READ_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);
/// Default maximum announced frame length.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 4096;

/// Configuration for a [`crate::ServerSession`].
pub struct ServerConfig {
    /// Logger tag / session name.
    pub name: String,
    /// Address to bind and listen on, e.g. `"0.0.0.0:8583"`.
    pub bind_addr: String,
    /// Maximum number of connections accepted concurrently; further
    /// connections block in the accept loop until a slot frees up.
    pub max_clients: usize,
    /// Length-prefix codec.
    pub length_codec: Arc<dyn LengthCodec>,
    /// Header codec.
    pub header_codec: Arc<dyn HeaderCodec>,
    /// Trailer codec.
    pub trailer_codec: Arc<dyn TrailerCodec>,
    /// Idle deadline between frames on an accepted connection.
    pub read_client_timeout: Duration,
    /// Deadline for reading a payload once its length prefix has arrived.
    pub read_message_timeout: Duration,
    /// Reject any announced length larger than this.
    pub max_message_size: usize,
}

impl ServerConfig {
    /// Start a config bound to `bind_addr` with framework defaults for
    /// everything else.
    #[must_use]
    pub fn new(name: impl Into<String>, bind_addr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bind_addr: bind_addr.into(),
            max_clients: DEFAULT_MAX_CLIENTS,
            length_codec: Arc::new(AsciiLengthCodec::default()),
            header_codec: Arc::new(NoOpHeaderCodec),
            trailer_codec: Arc::new(NoOpTrailerCodec),
            read_client_timeout: DEFAULT_READ_CLIENT_TIMEOUT,
            read_message_timeout: DEFAULT_READ_MESSAGE_TIMEOUT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Override the maximum number of concurrently accepted connections.
    #[must_use]
    pub fn with_max_clients(mut self, max_clients: usize) -> Self {
        self.max_clients = max_clients;
        self
    }
}
