//! Shared framed-message I/O: the part of the read loop and `Send`/
//! `SendResponse` path that is identical on both peers.
//!
//! Wire layout: `[length_prefix] [header] [payload] [trailer]`. Reading
//! enforces two deadlines — an idle deadline covering "wait for the next
//! frame to start" (length prefix and header), and a payload deadline
//! covering "finish a frame once it has started" (the announced-length
//! body, payload plus trailer). This resolves the spec's open question
//! about trailer placement: the trailer is read as the tail of the same
//! frame body as the payload, never interleaved with the next frame's
//! length prefix.

use std::time::Duration;

use posframe_proto::{HeaderCodec, HeaderValue, LengthCodec, ProtocolError, TrailerCodec, TrailerValue};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Outcome of reading one frame slot from the wire.
#[derive(Debug)]
pub enum FrameOutcome {
    /// A zero-length frame arrived — a keepalive. The caller should loop
    /// back and read the next frame.
    Keepalive,
    /// A complete frame was read.
    Frame {
        /// Decoded header value.
        header: HeaderValue,
        /// Raw ISO payload bytes (header and trailer already stripped).
        payload: Vec<u8>,
        /// Decoded trailer value.
        trailer: TrailerValue,
    },
}

fn timed_out() -> ProtocolError {
    ProtocolError::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "read deadline exceeded"))
}

/// Read one frame from `reader`, applying `idle_timeout` to "wait for a new
/// frame to start" and `payload_timeout` to "finish a frame once started".
///
/// # Errors
///
/// - [`ProtocolError::Eof`] on an orderly shutdown between frames.
/// - [`ProtocolError::MessageTooLarge`] if the announced length exceeds
///   `max_message_size`; the caller must close the connection on this
///   error rather than continue reading.
/// - A [`ProtocolError::Io`] with `ErrorKind::TimedOut` if either deadline
///   elapses.
pub async fn read_frame<R>(
    reader: &mut R,
    length_codec: &dyn LengthCodec,
    header_codec: &dyn HeaderCodec,
    trailer_codec: &dyn TrailerCodec,
    idle_timeout: Duration,
    payload_timeout: Duration,
    max_message_size: usize,
) -> Result<FrameOutcome, ProtocolError>
where
    R: AsyncRead + Unpin + Send,
{
    let (length, header, header_len) = tokio::time::timeout(idle_timeout, async {
        let length = length_codec.unpack(reader).await?;
        if length == 0 {
            return Ok((0, HeaderValue::Empty, 0));
        }
        let (header, header_len) = header_codec.unpack(reader).await?;
        Ok::<_, ProtocolError>((length, header, header_len))
    })
    .await
    .map_err(|_elapsed| timed_out())??;

    if length == 0 {
        return Ok(FrameOutcome::Keepalive);
    }

    if length > max_message_size {
        return Err(ProtocolError::MessageTooLarge { size: length, max: max_message_size });
    }

    let body_len = length.saturating_sub(header_len);
    let mut body = vec![0u8; body_len];
    tokio::time::timeout(payload_timeout, reader.read_exact(&mut body))
        .await
        .map_err(|_elapsed| timed_out())?
        .map_err(ProtocolError::Io)?;

    let trailer_len = trailer_codec.trailer_length().min(body.len());
    let payload_len = body.len() - trailer_len;
    let (trailer, _consumed) = trailer_codec.unpack(&body[payload_len..])?;
    body.truncate(payload_len);

    Ok(FrameOutcome::Frame { header, payload: body, trailer })
}

/// Assemble a complete frame: `length_prefix || header || payload ||
/// trailer`.
#[must_use]
pub fn assemble_frame(
    length_codec: &dyn LengthCodec,
    header_codec: &dyn HeaderCodec,
    trailer_codec: &dyn TrailerCodec,
    header_value: &HeaderValue,
    payload: &[u8],
    trailer_value: &TrailerValue,
) -> Vec<u8> {
    let header_bytes = header_codec.pack(header_value);
    let trailer_bytes = trailer_codec.pack(trailer_value);
    let total_len = header_bytes.len() + payload.len() + trailer_bytes.len();
    let length_bytes = length_codec.pack(total_len);

    let mut frame = Vec::with_capacity(length_bytes.len() + total_len);
    frame.extend_from_slice(&length_bytes);
    frame.extend_from_slice(&header_bytes);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&trailer_bytes);
    frame
}

#[cfg(test)]
mod tests {
    use posframe_proto::{AsciiLengthCodec, NoOpHeaderCodec, NoOpTrailerCodec};

    use super::*;

    #[tokio::test]
    async fn round_trips_a_frame_with_default_codecs() {
        let length_codec = AsciiLengthCodec::new(4);
        let header_codec = NoOpHeaderCodec;
        let trailer_codec = NoOpTrailerCodec;

        let wire = assemble_frame(
            &length_codec,
            &header_codec,
            &trailer_codec,
            &HeaderValue::Empty,
            b"hello",
            &TrailerValue::Empty,
        );
        assert_eq!(wire, b"0005hello");

        let mut cursor: &[u8] = &wire;
        let outcome = read_frame(
            &mut cursor,
            &length_codec,
            &header_codec,
            &trailer_codec,
            Duration::from_secs(1),
            Duration::from_secs(1),
            4096,
        )
        .await
        .expect("read");

        let FrameOutcome::Frame { payload, .. } = outcome else { panic!("expected frame") };
        assert_eq!(payload, b"hello");
    }

    #[tokio::test]
    async fn keepalive_frame_is_reported() {
        let length_codec = AsciiLengthCodec::new(4);
        let header_codec = NoOpHeaderCodec;
        let trailer_codec = NoOpTrailerCodec;

        let mut cursor: &[u8] = b"0000";
        let outcome = read_frame(
            &mut cursor,
            &length_codec,
            &header_codec,
            &trailer_codec,
            Duration::from_secs(1),
            Duration::from_secs(1),
            4096,
        )
        .await
        .expect("read");

        assert!(matches!(outcome, FrameOutcome::Keepalive));
    }

    #[tokio::test]
    async fn oversize_length_is_rejected() {
        let length_codec = AsciiLengthCodec::new(4);
        let header_codec = NoOpHeaderCodec;
        let trailer_codec = NoOpTrailerCodec;

        let mut cursor: &[u8] = b"8192";
        let err = read_frame(
            &mut cursor,
            &length_codec,
            &header_codec,
            &trailer_codec,
            Duration::from_secs(1),
            Duration::from_secs(1),
            4096,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ProtocolError::MessageTooLarge { size: 8192, max: 4096 }));
    }
}
