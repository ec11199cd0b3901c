//! Single-socket write serialization.
//!
//! Wraps a buffered writer behind a mutex so concurrent callers (multiple
//! application tasks calling `Send`, or a handler task calling
//! `SendResponse`) never interleave the bytes of two frames on the wire.

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

/// Serializes writes to a single async socket half.
///
/// Every successful [`SafeWriter::write`] call has flushed to the
/// underlying writer before returning, so a caller observing `Ok(())` knows
/// the bytes have left the process's userspace buffer.
pub struct SafeWriter<W> {
    inner: Mutex<BufWriter<W>>,
}

impl<W> SafeWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Wrap `writer` for serialized, flushed writes.
    pub fn new(writer: W) -> Self {
        Self { inner: Mutex::new(BufWriter::new(writer)) }
    }

    /// Write `bytes` atomically with respect to other callers, flushing
    /// before returning.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error unchanged on write or flush
    /// failure.
    pub async fn write(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut guard = self.inner.lock().await;
        guard.write_all(bytes).await?;
        guard.flush().await
    }

    /// Shut down the underlying writer's send side.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error unchanged.
    pub async fn shutdown(&self) -> std::io::Result<()> {
        let mut guard = self.inner.lock().await;
        guard.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::io::DuplexStream;

    use super::*;

    #[tokio::test]
    async fn concurrent_writes_are_not_interleaved() {
        let (client, mut server) = tokio::io::duplex(1 << 20);
        let writer: Arc<SafeWriter<DuplexStream>> = Arc::new(SafeWriter::new(client));

        let mut tasks = Vec::new();
        for i in 0u8..20 {
            let writer = Arc::clone(&writer);
            tasks.push(tokio::spawn(async move {
                let frame = vec![i; 100];
                writer.write(&frame).await.expect("write");
            }));
        }
        for task in tasks {
            task.await.expect("join");
        }
        drop(writer);

        let mut received = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut server, &mut received).await.expect("read");

        assert_eq!(received.len(), 20 * 100);
        for chunk in received.chunks(100) {
            assert!(chunk.iter().all(|b| *b == chunk[0]), "frame bytes interleaved");
        }
    }
}
