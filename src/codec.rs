//! Encode/decode entry points shared by every message family.
//!
//! Every catalog type implements [`Message`]: a parse routine driven by a
//! [`BitReader`], a serialize routine driven by a [`BitWriter`], and a
//! structural bit length. [`encode`] sizes a message first, emits it, and
//! checks that exactly the announced number of bits was written.

use crate::bits::{BitReader, BitWriter};
use crate::diag::Diagnostics;
use crate::frame::{self, FrameDecodeResult};
use crate::model::address::KnxGroupAddress;
use crate::model::knxnetip::KnxNetIpMessage;
use crate::model::ldata::LDataExtended;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("out of data at bit {position}: needed {needed_bits} bits, {available_bits} available")]
    OutOfData {
        position: usize,
        needed_bits: usize,
        available_bits: usize,
    },
    #[error("invalid bit width {0} (supported: 1..=64)")]
    InvalidWidth(u8),
    #[error("unknown {family} variant for discriminator {discriminator}")]
    UnknownVariant {
        family: &'static str,
        discriminator: String,
    },
    #[error("const mismatch: expected {expected:#x}, got {actual:#x}")]
    ConstMismatch { expected: u64, actual: u64 },
    #[error("Length/count mismatch: {0}")]
    LengthMismatch(String),
    #[error("Validation: {0}")]
    Validation(String),
    #[error("parsing field '{field}': {source}")]
    FieldParse {
        field: &'static str,
        #[source]
        source: Box<CodecError>,
    },
    #[error("serializing field '{field}': {source}")]
    FieldSerialize {
        field: &'static str,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    pub fn unknown_variant(family: &'static str, discriminator: impl fmt::Display) -> Self {
        CodecError::UnknownVariant {
            family,
            discriminator: discriminator.to_string(),
        }
    }

    pub fn in_parse_field(self, field: &'static str) -> Self {
        CodecError::FieldParse {
            field,
            source: Box::new(self),
        }
    }

    pub fn in_serialize_field(self, field: &'static str) -> Self {
        CodecError::FieldSerialize {
            field,
            source: Box::new(self),
        }
    }

    /// Field names from the outermost wrapper down to the failing field.
    pub fn field_path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        let mut cur = self;
        loop {
            match cur {
                CodecError::FieldParse { field, source } | CodecError::FieldSerialize { field, source } => {
                    path.push(*field);
                    cur = source;
                }
                _ => return path,
            }
        }
    }

    /// The innermost error, with all field wrappers stripped.
    pub fn root_cause(&self) -> &CodecError {
        match self {
            CodecError::FieldParse { source, .. } | CodecError::FieldSerialize { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A wire structure with symmetric parse and serialize routines.
///
/// `Args` carries values the enclosing structure supplies to the parser
/// (a byte size, a length field, an address level count). Types that need
/// nothing use `()`.
pub trait Message: Sized {
    type Args: Copy;

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, args: Self::Args) -> Result<Self, CodecError>;

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError>;

    fn length_in_bits(&self) -> usize;

    fn length_in_bytes(&self) -> usize {
        self.length_in_bits().div_ceil(8)
    }
}

/// A parsed value together with the reserved-field diagnostics collected while parsing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<M> {
    pub message: M,
    pub diagnostics: Diagnostics,
    /// Bytes consumed from the input (rounded up when the message ends mid-byte).
    pub consumed: usize,
}

/// Parse one `M` from the start of `bytes`.
pub fn decode<M: Message>(bytes: &[u8], args: M::Args) -> Result<Decoded<M>, CodecError> {
    let mut r = BitReader::new(bytes);
    let mut diagnostics = Diagnostics::new();
    let message = M::parse(&mut r, &mut diagnostics, args)?;
    Ok(Decoded {
        message,
        diagnostics,
        consumed: r.position().div_ceil(8),
    })
}

/// Serialize `message` into a fresh buffer sized from `length_in_bits`.
pub fn encode<M: Message>(message: &M) -> Result<Vec<u8>, CodecError> {
    let expected = message.length_in_bits();
    let mut w = BitWriter::with_capacity(expected.div_ceil(8));
    message.serialize(&mut w)?;
    if w.position() != expected {
        return Err(CodecError::LengthMismatch(format!(
            "announced {} bits, wrote {}",
            expected,
            w.position()
        )));
    }
    Ok(w.into_bytes())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Address level count used to render LData destinations as group addresses (1, 2 or 3).
    pub group_address_levels: u8,
    /// Upper bound on a single KNXnet/IP message, header included.
    pub max_message_len: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            group_address_levels: 3,
            max_message_len: u16::MAX as usize,
        }
    }
}

/// KNXnet/IP façade: decodes and encodes whole messages under one set of options.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    options: CodecOptions,
}

impl Codec {
    pub fn new(options: CodecOptions) -> Self {
        Codec { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Decode a single KNXnet/IP message from the given bytes.
    pub fn decode_message(&self, bytes: &[u8]) -> Result<Decoded<KnxNetIpMessage>, CodecError> {
        self.decode_message_with_extent(bytes).1
    }

    /// Decode a single message and return (bytes_consumed, result). The extent comes
    /// from the header `totalLength`, so it is known even when the body fails to parse.
    pub fn decode_message_with_extent(
        &self,
        bytes: &[u8],
    ) -> (usize, Result<Decoded<KnxNetIpMessage>, CodecError>) {
        let extent = match frame::message_extent(bytes) {
            Ok(n) => n,
            Err(e) => return (0, Err(e)),
        };
        if extent > self.options.max_message_len {
            return (
                extent,
                Err(CodecError::LengthMismatch(format!(
                    "message of {} bytes exceeds limit of {}",
                    extent, self.options.max_message_len
                ))),
            );
        }
        let result = decode::<KnxNetIpMessage>(&bytes[..extent], ()).and_then(|d| {
            if d.consumed != extent {
                return Err(CodecError::LengthMismatch(format!(
                    "totalLength is {} but the body ends after {} bytes",
                    extent, d.consumed
                )));
            }
            Ok(d)
        });
        (extent, result)
    }

    pub fn encode_message(&self, message: &KnxNetIpMessage) -> Result<Vec<u8>, CodecError> {
        let bytes = encode(message)?;
        if bytes.len() > self.options.max_message_len {
            return Err(CodecError::Validation(format!(
                "message of {} bytes exceeds limit of {}",
                bytes.len(),
                self.options.max_message_len
            )));
        }
        Ok(bytes)
    }

    /// Decode back-to-back messages; undecodable ones are reported and skipped.
    pub fn decode_frame(&self, bytes: &[u8]) -> FrameDecodeResult {
        frame::decode_frame(self, bytes)
    }

    /// The destination of `frame` as a group address, or `None` for individually addressed frames.
    pub fn group_destination(&self, frame: &LDataExtended) -> Result<Option<KnxGroupAddress>, CodecError> {
        if !frame.group_address {
            return Ok(None);
        }
        frame
            .destination_group_address(self.options.group_address_levels)
            .map(Some)
    }
}
