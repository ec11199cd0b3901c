//! Reference payload codec: each present field is encoded as a 3-digit
//! decimal tag, a 3-digit decimal length, and the value's ASCII bytes, with
//! fields emitted in ascending field-id order. No bitmap is written — the
//! tag stream itself declares which fields are present.
//!
//! This exists only to give posframe's own tests and demo binaries a
//! concrete, dependency-free [`Packager`] to drive; it makes no claim to
//! match any real ISO 8583 field dictionary.

use posframe_proto::{IsoMessage, Packager, ProtocolError, Result};

use crate::message::PosMessage;

const TAG_WIDTH: usize = 3;
const LEN_WIDTH: usize = 3;

/// Packs/unpacks [`PosMessage`]s using the tag-length-value scheme
/// documented on the module.
#[derive(Debug, Default, Clone, Copy)]
pub struct TlvPackager;

impl Packager for TlvPackager {
    type Message = PosMessage;

    fn pack(&self, msg: &Self::Message) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for field in msg.bitmap() {
            let value = msg.get_field(field).expect("bitmap field is present");
            if value.len() > 10usize.pow(LEN_WIDTH as u32) - 1 {
                return Err(ProtocolError::PayloadPack(format!("field {field} value too long to encode in {LEN_WIDTH} digits")));
            }
            out.extend_from_slice(format!("{field:0width$}", width = TAG_WIDTH).as_bytes());
            out.extend_from_slice(format!("{:0width$}", value.len(), width = LEN_WIDTH).as_bytes());
            out.extend_from_slice(value.as_bytes());
        }
        Ok(out)
    }

    fn unpack(&self, bytes: &[u8]) -> Result<Self::Message> {
        let text = std::str::from_utf8(bytes).map_err(|err| ProtocolError::PayloadUnpack(format!("non-UTF8 payload: {err}")))?;

        let mut message = PosMessage::default();
        let mut rest = text;
        while !rest.is_empty() {
            if rest.len() < TAG_WIDTH + LEN_WIDTH {
                return Err(ProtocolError::PayloadUnpack("truncated tag/length header".to_string()));
            }
            let (tag_str, after_tag) = rest.split_at(TAG_WIDTH);
            let (len_str, after_len) = after_tag.split_at(LEN_WIDTH);

            let tag: u32 = tag_str.parse().map_err(|_| ProtocolError::PayloadUnpack(format!("invalid field tag {tag_str:?}")))?;
            let len: usize = len_str.parse().map_err(|_| ProtocolError::PayloadUnpack(format!("invalid field length {len_str:?}")))?;

            if after_len.len() < len {
                return Err(ProtocolError::PayloadUnpack(format!("field {tag} declares length {len} but only {} bytes remain", after_len.len())));
            }
            let (value, remainder) = after_len.split_at(len);
            message.set_field(tag, value);
            rest = remainder;
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_message() {
        let packager = TlvPackager;
        let msg = PosMessage::new([(0, "0200"), (7, "0227152417"), (11, "000001")]);

        let wire = packager.pack(&msg).expect("pack");
        let decoded = packager.unpack(&wire).expect("unpack");

        assert_eq!(decoded, msg);
    }

    #[test]
    fn rejects_truncated_payload() {
        let packager = TlvPackager;
        let err = packager.unpack(b"000004020").unwrap_err();
        assert!(matches!(err, ProtocolError::PayloadUnpack(_)));
    }
}
