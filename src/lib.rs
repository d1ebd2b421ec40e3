//! # knxcodec: bit-exact KNXnet/IP codec
//!
//! Parses and serializes KNXnet/IP messages, the cEMI frames they carry,
//! the link-layer frames inside those and the application layer (APDU)
//! down to datapoint values. Every structure round-trips bit for bit.
//!
//! ## Layers
//!
//! - **Bit cursor** ([`bits`]): MSB-first reads and writes of 1..=64-bit fields.
//! - **Field kinds** ([`field`]): reserved (lenient), const (strict), implicit
//!   length prefixes, counted / length-governed / rest-of-container arrays
//!   and optionals.
//! - **Enumerations** ([`enumeration`]): closed tables with an `Unknown(raw)` fallback.
//! - **Catalog** ([`model`]): one type per wire structure, each implementing
//!   [`Message`]; tagged unions dispatch on their discriminator fields.
//! - **Façade** ([`Codec`]): whole-message decode/encode and stream framing.
//!
//! Reserved fields that do not hold their expected value are not errors;
//! they are reported through [`Diagnostics`] alongside the decoded message.
//!
//! ## Example
//!
//! ```no_run
//! use knxcodec::{Codec, CodecOptions};
//!
//! let codec = Codec::new(CodecOptions::default());
//! let bytes = [0x06, 0x10, 0x02, 0x08, 0x00, 0x08, 0x07, 0x00];
//! let decoded = codec.decode_message(&bytes).expect("valid message");
//! assert_eq!(codec.encode_message(&decoded.message).expect("encodable"), bytes);
//! ```
//!
//! See `tests/integration.rs` for complete telegrams.

pub mod bits;
pub mod capture;
pub mod codec;
pub mod datapoint;
pub mod diag;
pub mod enumeration;
pub mod field;
pub mod frame;
pub mod model;
pub mod parser;
pub mod value;

pub use bits::{BitReader, BitWriter};
pub use codec::{decode, encode, Codec, CodecError, CodecOptions, Decoded, Message};
pub use datapoint::{decode_datapoint, encode_datapoint};
pub use diag::{Diagnostic, Diagnostics};
pub use enumeration::WireEnum;
pub use frame::{decode_frame, message_extent, FrameDecodeResult};
pub use model::KnxNetIpMessage;
pub use parser::AddressParseError;
pub use value::Value;
