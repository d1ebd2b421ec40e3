//! Stream handling: split a buffer holding back-to-back KNXnet/IP messages.
//!
//! Message boundaries come from the header `totalLength`, so a message whose
//! body fails to decode is still skipped cleanly and reported; decoding
//! continues with the next one.

use crate::codec::{Codec, CodecError};
use crate::diag::Diagnostics;
use crate::model::knxnetip::{KnxNetIpMessage, HEADER_LENGTH};
use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

/// Result of decoding a stream: valid messages and the ones that were dropped.
#[derive(Debug)]
pub struct FrameDecodeResult {
    pub messages: Vec<DecodedMessage>,
    /// Messages whose header was sound but whose body failed to decode.
    pub removed: Vec<RemovedMessage>,
    /// Leftover bytes that do not form a complete message, with the reason.
    pub trailing: Option<RemovedMessage>,
}

#[derive(Debug)]
pub struct DecodedMessage {
    pub message: KnxNetIpMessage,
    pub diagnostics: Diagnostics,
    pub byte_range: (usize, usize),
}

#[derive(Debug)]
pub struct RemovedMessage {
    pub byte_range: (usize, usize),
    pub reason: String,
}

/// Byte length of the message at the start of `bytes`, read from its header
/// without decoding the body.
pub fn message_extent(bytes: &[u8]) -> Result<usize, CodecError> {
    let header = HEADER_LENGTH as usize;
    if bytes.len() < header {
        return Err(CodecError::OutOfData {
            position: 0,
            needed_bits: header * 8,
            available_bits: bytes.len() * 8,
        });
    }
    let total_length = BigEndian::read_u16(&bytes[4..6]) as usize;
    if total_length < header {
        return Err(CodecError::LengthMismatch(format!(
            "totalLength {} is shorter than the {}-byte header",
            total_length, header
        )));
    }
    if total_length > bytes.len() {
        return Err(CodecError::OutOfData {
            position: 0,
            needed_bits: total_length * 8,
            available_bits: bytes.len() * 8,
        });
    }
    Ok(total_length)
}

/// Decode every message in `bytes`. Undecodable messages are reported in
/// `removed` and skipped; bytes that cannot be framed end up in `trailing`.
pub fn decode_frame(codec: &Codec, bytes: &[u8]) -> FrameDecodeResult {
    let mut messages = Vec::new();
    let mut removed = Vec::new();
    let mut trailing = None;
    let mut offset = 0;

    while offset < bytes.len() {
        let (consumed, result) = codec.decode_message_with_extent(&bytes[offset..]);
        if consumed == 0 {
            let reason = match result {
                Err(e) => e.to_string(),
                Ok(_) => "empty message".to_string(),
            };
            debug!(offset, reason = reason.as_str(), "stopping at unframeable bytes");
            trailing = Some(RemovedMessage {
                byte_range: (offset, bytes.len()),
                reason,
            });
            break;
        }
        let byte_range = (offset, offset + consumed);
        match result {
            Ok(decoded) => messages.push(DecodedMessage {
                message: decoded.message,
                diagnostics: decoded.diagnostics,
                byte_range,
            }),
            Err(e) => {
                debug!(start = byte_range.0, end = byte_range.1, error = %e, "dropping undecodable message");
                removed.push(RemovedMessage {
                    byte_range,
                    reason: e.to_string(),
                });
            }
        }
        offset += consumed;
    }

    FrameDecodeResult {
        messages,
        removed,
        trailing,
    }
}

/// Re-encode only the messages that decoded, back to back.
pub fn encode_compliant(codec: &Codec, result: &FrameDecodeResult) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    for msg in &result.messages {
        out.extend(codec.encode_message(&msg.message)?);
    }
    Ok(out)
}
