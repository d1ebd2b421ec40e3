//! Application protocol data units.
//!
//! The first six bits are the transport control field: a control/data
//! discriminator bit, the `numbered` flag and a 4-bit sequence counter.
//! Data APDUs continue with a 4-bit APCI selecting the service.
//!
//! The enclosing frame supplies `dataLength` (the APDU byte length minus
//! one); services with trailing data size their arrays from it.

use crate::bits::{BitReader, BitWriter};
use crate::codec::{CodecError, Message};
use crate::diag::Diagnostics;
use crate::field::{read_count_array, read_reserved, remaining_length, write_length_prefixed, write_reserved, FieldResultExt};
use crate::model::address::KnxAddress;
use crate::model::apdu_ext::ApduDataExt;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apdu {
    pub numbered: bool,
    /// 4 bits.
    pub counter: u8,
    pub kind: ApduKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApduKind {
    Control(ApduControl),
    Data(ApduData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApduControl {
    Connect,
    Disconnect,
    Ack,
    Nack,
}

/// Payload of a group value read response or write.
///
/// `data_first_byte` holds the 6 bits sharing a byte with the APCI; values of
/// six bits or less live there and `data` stays empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupValue {
    /// Signed 6 bits.
    pub data_first_byte: i8,
    pub data: Vec<u8>,
}

impl GroupValue {
    pub fn new(data_first_byte: i8, data: Vec<u8>) -> Self {
        GroupValue { data_first_byte, data }
    }

    /// Payload as it appears on the wire: the low 6 bits of the first byte, then `data`.
    pub fn payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.data.len());
        out.push((self.data_first_byte as u8) & 0x3F);
        out.extend_from_slice(&self.data);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApduData {
    GroupValueRead,
    GroupValueResponse(GroupValue),
    GroupValueWrite(GroupValue),
    IndividualAddressWrite { new_address: KnxAddress },
    IndividualAddressRead,
    IndividualAddressResponse,
    AdcRead { channel_nr: u8, read_count: u8 },
    AdcResponse { channel_nr: u8, read_count: u8, sum: u16 },
    MemoryRead { num_bytes: u8, address: u16 },
    MemoryResponse { address: u16, data: Vec<u8> },
    MemoryWrite { address: u16, data: Vec<u8> },
    UserMessage { user_message_type: u8, data: Vec<u8> },
    DeviceDescriptorRead { descriptor_type: u8 },
    DeviceDescriptorResponse { descriptor_type: u8, data: Vec<u8> },
    Restart,
    Other(ApduDataExt),
}

impl Apdu {
    pub fn data(data: ApduData) -> Self {
        Apdu {
            numbered: false,
            counter: 0,
            kind: ApduKind::Data(data),
        }
    }

    pub fn control(control: ApduControl) -> Self {
        Apdu {
            numbered: false,
            counter: 0,
            kind: ApduKind::Control(control),
        }
    }

    /// Value carried in an LData frame's `dataLength` field.
    pub fn data_length(&self) -> usize {
        self.length_in_bytes().saturating_sub(1)
    }

    pub fn group_value(&self) -> Option<&GroupValue> {
        match &self.kind {
            ApduKind::Data(ApduData::GroupValueResponse(v)) | ApduKind::Data(ApduData::GroupValueWrite(v)) => Some(v),
            _ => None,
        }
    }
}

impl Message for Apdu {
    /// `dataLength` of the enclosing frame.
    type Args = u8;

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, data_length: u8) -> Result<Self, CodecError> {
        let control = r.read_bit().parsing("control")?;
        let numbered = r.read_bit().parsing("numbered")?;
        let counter = r.read_u8(4).parsing("counter")?;
        let kind = if control {
            ApduKind::Control(ApduControl::parse(r, diag, ()).parsing("controlApdu")?)
        } else {
            ApduKind::Data(ApduData::parse(r, diag, data_length).parsing("dataApdu")?)
        };
        Ok(Apdu { numbered, counter, kind })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_bit(matches!(self.kind, ApduKind::Control(_))).serializing("control")?;
        w.write_bit(self.numbered).serializing("numbered")?;
        w.write_uint(4, self.counter as u64).serializing("counter")?;
        match &self.kind {
            ApduKind::Control(c) => c.serialize(w).serializing("controlApdu"),
            ApduKind::Data(d) => d.serialize(w).serializing("dataApdu"),
        }
    }

    fn length_in_bits(&self) -> usize {
        6 + match &self.kind {
            ApduKind::Control(c) => c.length_in_bits(),
            ApduKind::Data(d) => d.length_in_bits(),
        }
    }
}

impl Message for ApduControl {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        // Two bits cover all four members.
        Ok(match r.read_u8(2).parsing("controlType")? {
            0 => ApduControl::Connect,
            1 => ApduControl::Disconnect,
            2 => ApduControl::Ack,
            _ => ApduControl::Nack,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        let code = match self {
            ApduControl::Connect => 0,
            ApduControl::Disconnect => 1,
            ApduControl::Ack => 2,
            ApduControl::Nack => 3,
        };
        w.write_uint(2, code).serializing("controlType")
    }

    fn length_in_bits(&self) -> usize {
        2
    }
}

impl ApduData {
    pub fn apci_type(&self) -> u8 {
        match self {
            ApduData::GroupValueRead => 0x0,
            ApduData::GroupValueResponse(_) => 0x1,
            ApduData::GroupValueWrite(_) => 0x2,
            ApduData::IndividualAddressWrite { .. } => 0x3,
            ApduData::IndividualAddressRead => 0x4,
            ApduData::IndividualAddressResponse => 0x5,
            ApduData::AdcRead { .. } => 0x6,
            ApduData::AdcResponse { .. } => 0x7,
            ApduData::MemoryRead { .. } => 0x8,
            ApduData::MemoryResponse { .. } => 0x9,
            ApduData::MemoryWrite { .. } => 0xA,
            ApduData::UserMessage { .. } => 0xB,
            ApduData::DeviceDescriptorRead { .. } => 0xC,
            ApduData::DeviceDescriptorResponse { .. } => 0xD,
            ApduData::Restart => 0xE,
            ApduData::Other(_) => 0xF,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ApduData::GroupValueRead => "GroupValueRead",
            ApduData::GroupValueResponse(_) => "GroupValueResponse",
            ApduData::GroupValueWrite(_) => "GroupValueWrite",
            ApduData::IndividualAddressWrite { .. } => "IndividualAddressWrite",
            ApduData::IndividualAddressRead => "IndividualAddressRead",
            ApduData::IndividualAddressResponse => "IndividualAddressResponse",
            ApduData::AdcRead { .. } => "AdcRead",
            ApduData::AdcResponse { .. } => "AdcResponse",
            ApduData::MemoryRead { .. } => "MemoryRead",
            ApduData::MemoryResponse { .. } => "MemoryResponse",
            ApduData::MemoryWrite { .. } => "MemoryWrite",
            ApduData::UserMessage { .. } => "UserMessage",
            ApduData::DeviceDescriptorRead { .. } => "DeviceDescriptorRead",
            ApduData::DeviceDescriptorResponse { .. } => "DeviceDescriptorResponse",
            ApduData::Restart => "Restart",
            ApduData::Other(_) => "Other",
        }
    }
}

fn read_group_value(r: &mut BitReader<'_>, data_length: u8) -> Result<GroupValue, CodecError> {
    let data_first_byte = r.read_i8(6).parsing("dataFirstByte")?;
    let n = (data_length as usize).saturating_sub(1);
    let data = r.read_bytes(n).parsing("data")?;
    Ok(GroupValue { data_first_byte, data })
}

fn write_group_value(w: &mut BitWriter, value: &GroupValue) -> Result<(), CodecError> {
    w.write_int(6, value.data_first_byte as i64).serializing("dataFirstByte")?;
    w.write_bytes(&value.data).serializing("data")
}

/// numBytes (6 bits, implicit), address, data.
fn read_memory(r: &mut BitReader<'_>) -> Result<(u16, Vec<u8>), CodecError> {
    let num_bytes = r.read_u8(6).parsing("numBytes")?;
    let address = r.read_u16(16).parsing("address")?;
    let data = read_count_array(r, "data", num_bytes as usize, |r| r.read_u8(8))?;
    Ok((address, data))
}

fn write_memory(w: &mut BitWriter, address: u16, data: &[u8]) -> Result<(), CodecError> {
    w.write_uint(6, data.len() as u64).serializing("numBytes")?;
    w.write_uint(16, address as u64).serializing("address")?;
    w.write_bytes(data).serializing("data")
}

impl Message for ApduData {
    /// `dataLength` of the enclosing frame.
    type Args = u8;

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, data_length: u8) -> Result<Self, CodecError> {
        let apci_type = r.read_u8(4).parsing("apciType")?;
        let data = match apci_type {
            0x0 => {
                read_reserved(r, diag, "reserved", 6, 0)?;
                ApduData::GroupValueRead
            }
            0x1 => ApduData::GroupValueResponse(read_group_value(r, data_length)?),
            0x2 => ApduData::GroupValueWrite(read_group_value(r, data_length)?),
            0x3 => {
                read_reserved(r, diag, "reserved", 6, 0)?;
                let new_address = KnxAddress::parse(r, diag, ()).parsing("newAddress")?;
                ApduData::IndividualAddressWrite { new_address }
            }
            0x4 => {
                read_reserved(r, diag, "reserved", 6, 0)?;
                ApduData::IndividualAddressRead
            }
            0x5 => {
                read_reserved(r, diag, "reserved", 6, 0)?;
                ApduData::IndividualAddressResponse
            }
            0x6 => ApduData::AdcRead {
                channel_nr: r.read_u8(6).parsing("channelNr")?,
                read_count: r.read_u8(8).parsing("readCount")?,
            },
            0x7 => ApduData::AdcResponse {
                channel_nr: r.read_u8(6).parsing("channelNr")?,
                read_count: r.read_u8(8).parsing("readCount")?,
                sum: r.read_u16(16).parsing("sum")?,
            },
            0x8 => ApduData::MemoryRead {
                num_bytes: r.read_u8(6).parsing("numBytes")?,
                address: r.read_u16(16).parsing("address")?,
            },
            0x9 => {
                let (address, data) = read_memory(r)?;
                ApduData::MemoryResponse { address, data }
            }
            0xA => {
                let (address, data) = read_memory(r)?;
                ApduData::MemoryWrite { address, data }
            }
            0xB => {
                let user_message_type = r.read_u8(6).parsing("userMessageType")?;
                let n = remaining_length("data", data_length as u64, 1)?;
                let data = r.read_bytes(n).parsing("data")?;
                ApduData::UserMessage { user_message_type, data }
            }
            0xC => ApduData::DeviceDescriptorRead {
                descriptor_type: r.read_u8(6).parsing("descriptorType")?,
            },
            0xD => {
                let descriptor_type = r.read_u8(6).parsing("descriptorType")?;
                let n = remaining_length("data", data_length as u64, 1)?;
                let data = r.read_bytes(n).parsing("data")?;
                ApduData::DeviceDescriptorResponse { descriptor_type, data }
            }
            0xE => {
                read_reserved(r, diag, "reserved", 6, 0)?;
                ApduData::Restart
            }
            // The 4-bit read leaves 0xF as the only remaining code.
            _ => ApduData::Other(ApduDataExt::parse(r, diag, data_length).parsing("extendedApdu")?),
        };
        trace!(apci_type, variant = data.type_name(), "dispatched APDU");
        Ok(data)
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(4, self.apci_type() as u64).serializing("apciType")?;
        match self {
            ApduData::GroupValueRead
            | ApduData::IndividualAddressRead
            | ApduData::IndividualAddressResponse
            | ApduData::Restart => write_reserved(w, "reserved", 6, 0),
            ApduData::GroupValueResponse(v) | ApduData::GroupValueWrite(v) => write_group_value(w, v),
            ApduData::IndividualAddressWrite { new_address } => {
                write_reserved(w, "reserved", 6, 0)?;
                new_address.serialize(w).serializing("newAddress")
            }
            ApduData::AdcRead { channel_nr, read_count } => {
                w.write_uint(6, *channel_nr as u64).serializing("channelNr")?;
                w.write_uint(8, *read_count as u64).serializing("readCount")
            }
            ApduData::AdcResponse {
                channel_nr,
                read_count,
                sum,
            } => {
                w.write_uint(6, *channel_nr as u64).serializing("channelNr")?;
                w.write_uint(8, *read_count as u64).serializing("readCount")?;
                w.write_uint(16, *sum as u64).serializing("sum")
            }
            ApduData::MemoryRead { num_bytes, address } => {
                w.write_uint(6, *num_bytes as u64).serializing("numBytes")?;
                w.write_uint(16, *address as u64).serializing("address")
            }
            ApduData::MemoryResponse { address, data } | ApduData::MemoryWrite { address, data } => write_memory(w, *address, data),
            ApduData::UserMessage { user_message_type, data } => {
                w.write_uint(6, *user_message_type as u64).serializing("userMessageType")?;
                w.write_bytes(data).serializing("data")
            }
            ApduData::DeviceDescriptorRead { descriptor_type } => {
                w.write_uint(6, *descriptor_type as u64).serializing("descriptorType")
            }
            ApduData::DeviceDescriptorResponse { descriptor_type, data } => {
                w.write_uint(6, *descriptor_type as u64).serializing("descriptorType")?;
                w.write_bytes(data).serializing("data")
            }
            ApduData::Other(ext) => ext.serialize(w).serializing("extendedApdu"),
        }
    }

    fn length_in_bits(&self) -> usize {
        let body = match self {
            ApduData::GroupValueRead
            | ApduData::IndividualAddressRead
            | ApduData::IndividualAddressResponse
            | ApduData::Restart
            | ApduData::DeviceDescriptorRead { .. } => 6,
            ApduData::GroupValueResponse(v) | ApduData::GroupValueWrite(v) => 6 + v.data.len() * 8,
            ApduData::IndividualAddressWrite { .. } => 6 + 16,
            ApduData::AdcRead { .. } => 6 + 8,
            ApduData::AdcResponse { .. } => 6 + 8 + 16,
            ApduData::MemoryRead { .. } => 6 + 16,
            ApduData::MemoryResponse { data, .. } | ApduData::MemoryWrite { data, .. } => 6 + 16 + data.len() * 8,
            ApduData::UserMessage { data, .. } | ApduData::DeviceDescriptorResponse { data, .. } => 6 + data.len() * 8,
            ApduData::Other(ext) => ext.length_in_bits(),
        };
        4 + body
    }
}

/// Writes `dataLength` followed by the APDU, deriving the length from what was emitted.
pub(crate) fn write_with_data_length(w: &mut BitWriter, apdu: &Apdu) -> Result<(), CodecError> {
    write_length_prefixed(w, "dataLength", 8, -1, |w| apdu.serialize(w).serializing("apdu"))
}
