//! Pluggable length-prefix codec.
//!
//! The length prefix is the one framing part that cannot be a no-op: every
//! peer needs it to know how many bytes make up the rest of the frame
//! (`len(header) + len(payload) + len(trailer)`). The packager's prefix
//! descriptor determines its wire representation; this module provides the
//! trait plus the ASCII-digit encoding used by the reference packager and
//! common in real ISO 8583 deployments (e.g. a 4-digit decimal length).

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{ProtocolError, Result};

/// Pack and unpack the length-prefix portion of a frame.
#[async_trait]
pub trait LengthCodec: Send + Sync {
    /// Encode `total_len` (the combined length of header + payload +
    /// trailer) into its wire representation.
    fn pack(&self, total_len: usize) -> Vec<u8>;

    /// Read and decode a length prefix from `reader`.
    ///
    /// Returns `Ok(0)` for a keepalive frame (the caller should loop back to
    /// read the next prefix) and [`ProtocolError::Eof`] on an orderly
    /// shutdown.
    async fn unpack(&self, reader: &mut (dyn AsyncRead + Unpin + Send)) -> Result<usize>;
}

/// Fixed-width ASCII-decimal length prefix, e.g. `"0042"` for a 42-byte
/// frame body.
///
/// This is the default concrete codec shipped with the framework — the
/// original source's `length.Pack`/`length.Unpack` encode the length as a
/// hex string sized from the packager's `Prefix` descriptor; fixed-width
/// ASCII decimal is the idiomatic equivalent used by the reference packager
/// and by most ISO 8583 deployments over TCP.
#[derive(Debug, Clone, Copy)]
pub struct AsciiLengthCodec {
    digits: usize,
}

impl AsciiLengthCodec {
    /// Create a codec using `digits` ASCII characters for the length prefix.
    #[must_use]
    pub fn new(digits: usize) -> Self {
        Self { digits }
    }

    /// Maximum length this codec can represent.
    #[must_use]
    pub fn max_representable(&self) -> usize {
        10usize.saturating_pow(u32::try_from(self.digits).unwrap_or(u32::MAX)) - 1
    }
}

impl Default for AsciiLengthCodec {
    fn default() -> Self {
        Self::new(4)
    }
}

#[async_trait]
impl LengthCodec for AsciiLengthCodec {
    fn pack(&self, total_len: usize) -> Vec<u8> {
        format!("{total_len:0width$}", width = self.digits).into_bytes()
    }

    async fn unpack(&self, reader: &mut (dyn AsyncRead + Unpin + Send)) -> Result<usize> {
        let mut buf = vec![0u8; self.digits];
        match reader.read_exact(&mut buf).await {
            Ok(_) => {},
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ProtocolError::Eof);
            },
            Err(err) => return Err(ProtocolError::Io(err)),
        }

        let text = std::str::from_utf8(&buf).map_err(|err| ProtocolError::CodecDecode {
            part: "length",
            reason: format!("non-UTF8 length prefix: {err}"),
        })?;

        text.trim().parse::<usize>().map_err(|err| ProtocolError::CodecDecode {
            part: "length",
            reason: format!("invalid length prefix {text:?}: {err}"),
        })
    }
}
