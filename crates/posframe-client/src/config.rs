//! Client session configuration.

use std::sync::Arc;
use std::time::Duration;

use posframe_proto::{AsciiLengthCodec, HeaderCodec, LengthCodec, NoOpHeaderCodec, NoOpTrailerCodec, TrailerCodec};

/// Default per-request budget (`timeout`).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default idle deadline between frames (`readServerTimeout`).
pub const DEFAULT_READ_SERVER_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// Default deadline for reading a payload once its length is known
/// (`readMessageTimeout`).
pub const DEFAULT_READ_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);
/// Default maximum announced frame length.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 4096;
/// Default correlation match fields: MTI, transmission date/time, STAN.
pub const DEFAULT_MATCH_FIELDS: [u32; 3] = [0, 7, 11];
/// Backoff between reconnect attempts.
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(1);
/// Gap between retries of a failed `Send` write, while the per-request
/// timeout budget remains.
pub const SEND_RETRY_GAP: Duration = Duration::from_secs(1);

/// Configuration for a [`crate::ClientSession`].
pub struct ClientConfig {
    /// Logger tag / session name.
    pub name: String,
    /// Server host to dial.
    pub host: String,
    /// Server port to dial.
    pub port: u16,
    /// Total per-request budget, from `Send` registration to `Wait` return.
    pub timeout: Duration,
    /// Redial with a fixed backoff whenever the listener loop exits.
    pub auto_reconnect: bool,
    /// Ordered field ids used to build correlation keys.
    pub match_fields: Vec<u32>,
    /// Length-prefix codec.
    pub length_codec: Arc<dyn LengthCodec>,
    /// Header codec.
    pub header_codec: Arc<dyn HeaderCodec>,
    /// Trailer codec.
    pub trailer_codec: Arc<dyn TrailerCodec>,
    /// Idle deadline between frames.
    pub read_server_timeout: Duration,
    /// Deadline for reading a payload once its length prefix has arrived.
    pub read_message_timeout: Duration,
    /// Reject any announced length larger than this.
    pub max_message_size: usize,
}

impl ClientConfig {
    /// Start a config with the given name/host/port and framework defaults
    /// for everything else.
    #[must_use]
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
            auto_reconnect: false,
            match_fields: DEFAULT_MATCH_FIELDS.to_vec(),
            length_codec: Arc::new(AsciiLengthCodec::default()),
            header_codec: Arc::new(NoOpHeaderCodec),
            trailer_codec: Arc::new(NoOpTrailerCodec),
            read_server_timeout: DEFAULT_READ_SERVER_TIMEOUT,
            read_message_timeout: DEFAULT_READ_MESSAGE_TIMEOUT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Enable indefinite auto-reconnect with a 1 second backoff.
    #[must_use]
    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    /// Override the correlation match fields.
    #[must_use]
    pub fn with_match_fields(mut self, fields: Vec<u32>) -> Self {
        self.match_fields = fields;
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
