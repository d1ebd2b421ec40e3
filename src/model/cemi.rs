//! Common External Message Interface frames.
//!
//! A cEMI frame starts with a message code. Its byte size is not on the
//! wire; the enclosing KNXnet/IP message passes it in so trailing data
//! can run to the end of the container. Frames whose bit length is not a
//! whole number of bytes (poll data) end in zero padding.

use crate::bits::{BitReader, BitWriter};
use crate::codec::{CodecError, Message};
use crate::diag::Diagnostics;
use crate::field::{
    read_const, read_implicit, read_length_array, read_optional, read_reserved, read_rest_bytes, write_array, write_const,
    write_length_prefixed, write_optional, write_reserved, FieldResultExt,
};
use crate::model::ldata::LDataFrame;
use tracing::trace;

/// Entry of the additional information block preceding most cEMI services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionalInformation {
    PlMediumInfo {
        domain_address: u16,
    },
    BusmonitorInfo {
        frame_error_flag: bool,
        bit_error_flag: bool,
        parity_error_flag: bool,
        unknown_flag: bool,
        lost_flag: bool,
        /// 3 bits.
        sequence_number: u8,
    },
    RelativeTimestamp {
        relative_timestamp: u16,
    },
    TimeDelayUntilSending {
        delay: u32,
    },
    ExtendedRelativeTimestamp {
        relative_timestamp: u32,
    },
}

impl AdditionalInformation {
    pub fn additional_information_type(&self) -> u8 {
        match self {
            AdditionalInformation::PlMediumInfo { .. } => 0x01,
            AdditionalInformation::BusmonitorInfo { .. } => 0x03,
            AdditionalInformation::RelativeTimestamp { .. } => 0x04,
            AdditionalInformation::TimeDelayUntilSending { .. } => 0x05,
            AdditionalInformation::ExtendedRelativeTimestamp { .. } => 0x06,
        }
    }

    /// Fixed value of the entry's length byte.
    fn body_len(&self) -> u8 {
        match self {
            AdditionalInformation::PlMediumInfo { .. } | AdditionalInformation::RelativeTimestamp { .. } => 2,
            AdditionalInformation::BusmonitorInfo { .. } => 1,
            AdditionalInformation::TimeDelayUntilSending { .. } | AdditionalInformation::ExtendedRelativeTimestamp { .. } => 4,
        }
    }
}

impl Message for AdditionalInformation {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let info_type = r.read_u8(8).parsing("additionalInformationType")?;
        let info = match info_type {
            0x01 => {
                read_const(r, "len", 8, 2)?;
                AdditionalInformation::PlMediumInfo {
                    domain_address: r.read_u16(16).parsing("domainAddress")?,
                }
            }
            0x03 => {
                read_const(r, "len", 8, 1)?;
                AdditionalInformation::BusmonitorInfo {
                    frame_error_flag: r.read_bit().parsing("frameErrorFlag")?,
                    bit_error_flag: r.read_bit().parsing("bitErrorFlag")?,
                    parity_error_flag: r.read_bit().parsing("parityErrorFlag")?,
                    unknown_flag: r.read_bit().parsing("unknownFlag")?,
                    lost_flag: r.read_bit().parsing("lostFlag")?,
                    sequence_number: r.read_u8(3).parsing("sequenceNumber")?,
                }
            }
            0x04 => {
                read_const(r, "len", 8, 2)?;
                AdditionalInformation::RelativeTimestamp {
                    relative_timestamp: r.read_u16(16).parsing("relativeTimestamp")?,
                }
            }
            0x05 => {
                read_const(r, "len", 8, 4)?;
                AdditionalInformation::TimeDelayUntilSending {
                    delay: r.read_u32(32).parsing("delay")?,
                }
            }
            0x06 => {
                read_const(r, "len", 8, 4)?;
                AdditionalInformation::ExtendedRelativeTimestamp {
                    relative_timestamp: r.read_u32(32).parsing("relativeTimestamp")?,
                }
            }
            other => return Err(CodecError::unknown_variant("AdditionalInformation", format!("{:#04x}", other))),
        };
        Ok(info)
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(8, self.additional_information_type() as u64)
            .serializing("additionalInformationType")?;
        write_const(w, "len", 8, self.body_len() as u64)?;
        match *self {
            AdditionalInformation::PlMediumInfo { domain_address } => w.write_uint(16, domain_address as u64).serializing("domainAddress"),
            AdditionalInformation::BusmonitorInfo {
                frame_error_flag,
                bit_error_flag,
                parity_error_flag,
                unknown_flag,
                lost_flag,
                sequence_number,
            } => {
                w.write_bit(frame_error_flag).serializing("frameErrorFlag")?;
                w.write_bit(bit_error_flag).serializing("bitErrorFlag")?;
                w.write_bit(parity_error_flag).serializing("parityErrorFlag")?;
                w.write_bit(unknown_flag).serializing("unknownFlag")?;
                w.write_bit(lost_flag).serializing("lostFlag")?;
                w.write_uint(3, sequence_number as u64).serializing("sequenceNumber")
            }
            AdditionalInformation::RelativeTimestamp { relative_timestamp } => {
                w.write_uint(16, relative_timestamp as u64).serializing("relativeTimestamp")
            }
            AdditionalInformation::TimeDelayUntilSending { delay } => w.write_uint(32, delay as u64).serializing("delay"),
            AdditionalInformation::ExtendedRelativeTimestamp { relative_timestamp } => {
                w.write_uint(32, relative_timestamp as u64).serializing("relativeTimestamp")
            }
        }
    }

    fn length_in_bits(&self) -> usize {
        (2 + self.body_len() as usize) * 8
    }
}

fn read_additional_information(r: &mut BitReader<'_>, diag: &mut Diagnostics) -> Result<Vec<AdditionalInformation>, CodecError> {
    let len = read_implicit(r, "additionalInformationLength", 8)?;
    read_length_array(r, "additionalInformation", len as usize, |r| AdditionalInformation::parse(r, diag, ()))
}

fn write_additional_information(w: &mut BitWriter, items: &[AdditionalInformation]) -> Result<(), CodecError> {
    write_length_prefixed(w, "additionalInformationLength", 8, 0, |w| {
        write_array(w, "additionalInformation", items, |w, item| item.serialize(w))
    })
}

fn additional_information_bits(items: &[AdditionalInformation]) -> usize {
    8 + items.iter().map(AdditionalInformation::length_in_bits).sum::<usize>()
}

/// Bus monitor indication: a raw link-layer frame plus its checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LBusmonInd {
    pub additional_information: Vec<AdditionalInformation>,
    pub data_frame: LDataFrame,
    /// Present unless the frame is an acknowledgement.
    pub crc: Option<u8>,
}

impl Message for LBusmonInd {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let additional_information = read_additional_information(r, diag)?;
        let data_frame = LDataFrame::parse(r, diag, ()).parsing("dataFrame")?;
        let crc = read_optional(r, "crc", data_frame.not_ack_frame(), |r| r.read_u8(8))?;
        Ok(LBusmonInd {
            additional_information,
            data_frame,
            crc,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        write_additional_information(w, &self.additional_information)?;
        self.data_frame.serialize(w).serializing("dataFrame")?;
        write_optional(w, "crc", self.data_frame.not_ack_frame(), self.crc.as_ref(), |w, crc| {
            w.write_uint(8, *crc as u64)
        })
    }

    fn length_in_bits(&self) -> usize {
        additional_information_bits(&self.additional_information) + self.data_frame.length_in_bits() + self.crc.map_or(0, |_| 8)
    }
}

/// Body of `L_Data.req`, `L_Data.ind` and `L_Data.con`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LData {
    pub additional_information: Vec<AdditionalInformation>,
    pub data_frame: LDataFrame,
}

impl LData {
    pub fn new(data_frame: LDataFrame) -> Self {
        LData {
            additional_information: Vec::new(),
            data_frame,
        }
    }
}

impl Message for LData {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let additional_information = read_additional_information(r, diag)?;
        let data_frame = LDataFrame::parse(r, diag, ()).parsing("dataFrame")?;
        Ok(LData {
            additional_information,
            data_frame,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        write_additional_information(w, &self.additional_information)?;
        self.data_frame.serialize(w).serializing("dataFrame")
    }

    fn length_in_bits(&self) -> usize {
        additional_information_bits(&self.additional_information) + self.data_frame.length_in_bits()
    }
}

/// Services whose body is kept opaque: raw frames, poll data and transport-layer data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CemiRaw {
    pub additional_information: Vec<AdditionalInformation>,
    pub payload: Vec<u8>,
}

impl Message for CemiRaw {
    /// End of the cEMI frame, in bits from the start of the input.
    type Args = usize;

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, end: usize) -> Result<Self, CodecError> {
        let additional_information = read_additional_information(r, diag)?;
        let payload = read_rest_bytes(r, "payload", end)?;
        Ok(CemiRaw {
            additional_information,
            payload,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        write_additional_information(w, &self.additional_information)?;
        w.write_bytes(&self.payload).serializing("payload")
    }

    fn length_in_bits(&self) -> usize {
        additional_information_bits(&self.additional_information) + self.payload.len() * 8
    }
}

/// Interface object property reference shared by the `M_Prop*` services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyHeader {
    pub interface_object_type: u16,
    pub object_instance: u8,
    pub property_id: u8,
    /// 4 bits.
    pub number_of_elements: u8,
    /// 12 bits.
    pub start_index: u16,
}

impl Message for PropertyHeader {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        Ok(PropertyHeader {
            interface_object_type: r.read_u16(16).parsing("interfaceObjectType")?,
            object_instance: r.read_u8(8).parsing("objectInstance")?,
            property_id: r.read_u8(8).parsing("propertyId")?,
            number_of_elements: r.read_u8(4).parsing("numberOfElements")?,
            start_index: r.read_u16(12).parsing("startIndex")?,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(16, self.interface_object_type as u64).serializing("interfaceObjectType")?;
        w.write_uint(8, self.object_instance as u64).serializing("objectInstance")?;
        w.write_uint(8, self.property_id as u64).serializing("propertyId")?;
        w.write_uint(4, self.number_of_elements as u64).serializing("numberOfElements")?;
        w.write_uint(12, self.start_index as u64).serializing("startIndex")
    }

    fn length_in_bits(&self) -> usize {
        48
    }
}

/// Property header followed by element data running to the end of the frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MPropData {
    pub header: PropertyHeader,
    pub data: Vec<u8>,
}

impl Message for MPropData {
    /// End of the cEMI frame, in bits.
    type Args = usize;

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, end: usize) -> Result<Self, CodecError> {
        let header = PropertyHeader::parse(r, diag, ())?;
        let data = read_rest_bytes(r, "data", end)?;
        Ok(MPropData { header, data })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.header.serialize(w)?;
        w.write_bytes(&self.data).serializing("data")
    }

    fn length_in_bits(&self) -> usize {
        self.header.length_in_bits() + self.data.len() * 8
    }
}

/// Property write confirmation. A zero element count signals failure and
/// is followed by an error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MPropWriteCon {
    pub header: PropertyHeader,
    pub error_code: Option<u8>,
}

impl MPropWriteCon {
    fn has_error_code(header: &PropertyHeader) -> bool {
        header.number_of_elements == 0
    }
}

impl Message for MPropWriteCon {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let header = PropertyHeader::parse(r, diag, ())?;
        let error_code = read_optional(r, "errorCode", MPropWriteCon::has_error_code(&header), |r| r.read_u8(8))?;
        Ok(MPropWriteCon { header, error_code })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.header.serialize(w)?;
        write_optional(
            w,
            "errorCode",
            MPropWriteCon::has_error_code(&self.header),
            self.error_code.as_ref(),
            |w, code| w.write_uint(8, *code as u64),
        )
    }

    fn length_in_bits(&self) -> usize {
        self.header.length_in_bits() + self.error_code.map_or(0, |_| 8)
    }
}

/// Function property command, state read and confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MFuncProp {
    pub interface_object_type: u16,
    pub object_instance: u8,
    pub property_id: u8,
    pub data: Vec<u8>,
}

impl Message for MFuncProp {
    /// End of the cEMI frame, in bits.
    type Args = usize;

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, end: usize) -> Result<Self, CodecError> {
        let interface_object_type = r.read_u16(16).parsing("interfaceObjectType")?;
        let object_instance = r.read_u8(8).parsing("objectInstance")?;
        let property_id = r.read_u8(8).parsing("propertyId")?;
        let data = read_rest_bytes(r, "data", end)?;
        Ok(MFuncProp {
            interface_object_type,
            object_instance,
            property_id,
            data,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(16, self.interface_object_type as u64).serializing("interfaceObjectType")?;
        w.write_uint(8, self.object_instance as u64).serializing("objectInstance")?;
        w.write_uint(8, self.property_id as u64).serializing("propertyId")?;
        w.write_bytes(&self.data).serializing("data")
    }

    fn length_in_bits(&self) -> usize {
        32 + self.data.len() * 8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cemi {
    LBusmonInd(LBusmonInd),
    LDataReq(LData),
    LDataInd(LData),
    LDataCon(LData),
    LRawReq(CemiRaw),
    LRawInd(CemiRaw),
    LRawCon(CemiRaw),
    LPollDataReq(CemiRaw),
    LPollDataCon(CemiRaw),
    TDataConnectedReq(CemiRaw),
    TDataConnectedInd(CemiRaw),
    TDataIndividualReq(CemiRaw),
    TDataIndividualInd(CemiRaw),
    MPropReadReq(PropertyHeader),
    MPropReadCon(MPropData),
    MPropWriteReq(MPropData),
    MPropWriteCon(MPropWriteCon),
    MPropInfoInd(MPropData),
    MFuncPropCommandReq(MFuncProp),
    MFuncPropStateReadReq(MFuncProp),
    MFuncPropCon(MFuncProp),
    MResetReq,
    MResetInd,
}

impl Cemi {
    pub fn message_code(&self) -> u8 {
        match self {
            Cemi::LBusmonInd(_) => 0x2B,
            Cemi::LDataReq(_) => 0x11,
            Cemi::LDataInd(_) => 0x29,
            Cemi::LDataCon(_) => 0x2E,
            Cemi::LRawReq(_) => 0x10,
            Cemi::LRawInd(_) => 0x2D,
            Cemi::LRawCon(_) => 0x2F,
            Cemi::LPollDataReq(_) => 0x13,
            Cemi::LPollDataCon(_) => 0x25,
            Cemi::TDataConnectedReq(_) => 0x41,
            Cemi::TDataConnectedInd(_) => 0x89,
            Cemi::TDataIndividualReq(_) => 0x4A,
            Cemi::TDataIndividualInd(_) => 0x94,
            Cemi::MPropReadReq(_) => 0xFC,
            Cemi::MPropReadCon(_) => 0xFB,
            Cemi::MPropWriteReq(_) => 0xF6,
            Cemi::MPropWriteCon(_) => 0xF5,
            Cemi::MPropInfoInd(_) => 0xF7,
            Cemi::MFuncPropCommandReq(_) => 0xF8,
            Cemi::MFuncPropStateReadReq(_) => 0xF9,
            Cemi::MFuncPropCon(_) => 0xFA,
            Cemi::MResetReq => 0xF1,
            Cemi::MResetInd => 0xF0,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Cemi::LBusmonInd(_) => "LBusmonInd",
            Cemi::LDataReq(_) => "LDataReq",
            Cemi::LDataInd(_) => "LDataInd",
            Cemi::LDataCon(_) => "LDataCon",
            Cemi::LRawReq(_) => "LRawReq",
            Cemi::LRawInd(_) => "LRawInd",
            Cemi::LRawCon(_) => "LRawCon",
            Cemi::LPollDataReq(_) => "LPollDataReq",
            Cemi::LPollDataCon(_) => "LPollDataCon",
            Cemi::TDataConnectedReq(_) => "TDataConnectedReq",
            Cemi::TDataConnectedInd(_) => "TDataConnectedInd",
            Cemi::TDataIndividualReq(_) => "TDataIndividualReq",
            Cemi::TDataIndividualInd(_) => "TDataIndividualInd",
            Cemi::MPropReadReq(_) => "MPropReadReq",
            Cemi::MPropReadCon(_) => "MPropReadCon",
            Cemi::MPropWriteReq(_) => "MPropWriteReq",
            Cemi::MPropWriteCon(_) => "MPropWriteCon",
            Cemi::MPropInfoInd(_) => "MPropInfoInd",
            Cemi::MFuncPropCommandReq(_) => "MFuncPropCommandReq",
            Cemi::MFuncPropStateReadReq(_) => "MFuncPropStateReadReq",
            Cemi::MFuncPropCon(_) => "MFuncPropCon",
            Cemi::MResetReq => "MResetReq",
            Cemi::MResetInd => "MResetInd",
        }
    }

    /// The link-layer frame of the `L_Data` and bus monitor services.
    pub fn data_frame(&self) -> Option<&LDataFrame> {
        match self {
            Cemi::LDataReq(l) | Cemi::LDataInd(l) | Cemi::LDataCon(l) => Some(&l.data_frame),
            Cemi::LBusmonInd(b) => Some(&b.data_frame),
            _ => None,
        }
    }

    /// Message code and service body, before padding.
    fn body_length_in_bits(&self) -> usize {
        8 + match self {
            Cemi::LBusmonInd(m) => m.length_in_bits(),
            Cemi::LDataReq(m) | Cemi::LDataInd(m) | Cemi::LDataCon(m) => m.length_in_bits(),
            Cemi::LRawReq(m)
            | Cemi::LRawInd(m)
            | Cemi::LRawCon(m)
            | Cemi::LPollDataReq(m)
            | Cemi::LPollDataCon(m)
            | Cemi::TDataConnectedReq(m)
            | Cemi::TDataConnectedInd(m)
            | Cemi::TDataIndividualReq(m)
            | Cemi::TDataIndividualInd(m) => m.length_in_bits(),
            Cemi::MPropReadReq(m) => m.length_in_bits(),
            Cemi::MPropReadCon(m) | Cemi::MPropWriteReq(m) | Cemi::MPropInfoInd(m) => m.length_in_bits(),
            Cemi::MPropWriteCon(m) => m.length_in_bits(),
            Cemi::MFuncPropCommandReq(m) | Cemi::MFuncPropStateReadReq(m) | Cemi::MFuncPropCon(m) => m.length_in_bits(),
            Cemi::MResetReq | Cemi::MResetInd => 0,
        }
    }
}

impl Message for Cemi {
    /// Byte size of the whole cEMI frame, message code included.
    type Args = u16;

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, size: u16) -> Result<Self, CodecError> {
        let start = r.position();
        let end = start + size as usize * 8;
        let message_code = r.read_u8(8).parsing("messageCode")?;
        let cemi = match message_code {
            0x2B => Cemi::LBusmonInd(LBusmonInd::parse(r, diag, ()).parsing("LBusmonInd")?),
            0x11 => Cemi::LDataReq(LData::parse(r, diag, ()).parsing("LDataReq")?),
            0x29 => Cemi::LDataInd(LData::parse(r, diag, ()).parsing("LDataInd")?),
            0x2E => Cemi::LDataCon(LData::parse(r, diag, ()).parsing("LDataCon")?),
            0x10 => Cemi::LRawReq(CemiRaw::parse(r, diag, end).parsing("LRawReq")?),
            0x2D => Cemi::LRawInd(CemiRaw::parse(r, diag, end).parsing("LRawInd")?),
            0x2F => Cemi::LRawCon(CemiRaw::parse(r, diag, end).parsing("LRawCon")?),
            0x13 => Cemi::LPollDataReq(CemiRaw::parse(r, diag, end).parsing("LPollDataReq")?),
            0x25 => Cemi::LPollDataCon(CemiRaw::parse(r, diag, end).parsing("LPollDataCon")?),
            0x41 => Cemi::TDataConnectedReq(CemiRaw::parse(r, diag, end).parsing("TDataConnectedReq")?),
            0x89 => Cemi::TDataConnectedInd(CemiRaw::parse(r, diag, end).parsing("TDataConnectedInd")?),
            0x4A => Cemi::TDataIndividualReq(CemiRaw::parse(r, diag, end).parsing("TDataIndividualReq")?),
            0x94 => Cemi::TDataIndividualInd(CemiRaw::parse(r, diag, end).parsing("TDataIndividualInd")?),
            0xFC => Cemi::MPropReadReq(PropertyHeader::parse(r, diag, ()).parsing("MPropReadReq")?),
            0xFB => Cemi::MPropReadCon(MPropData::parse(r, diag, end).parsing("MPropReadCon")?),
            0xF6 => Cemi::MPropWriteReq(MPropData::parse(r, diag, end).parsing("MPropWriteReq")?),
            0xF5 => Cemi::MPropWriteCon(MPropWriteCon::parse(r, diag, ()).parsing("MPropWriteCon")?),
            0xF7 => Cemi::MPropInfoInd(MPropData::parse(r, diag, end).parsing("MPropInfoInd")?),
            0xF8 => Cemi::MFuncPropCommandReq(MFuncProp::parse(r, diag, end).parsing("MFuncPropCommandReq")?),
            0xF9 => Cemi::MFuncPropStateReadReq(MFuncProp::parse(r, diag, end).parsing("MFuncPropStateReadReq")?),
            0xFA => Cemi::MFuncPropCon(MFuncProp::parse(r, diag, end).parsing("MFuncPropCon")?),
            0xF1 => Cemi::MResetReq,
            0xF0 => Cemi::MResetInd,
            other => return Err(CodecError::unknown_variant("Cemi", format!("{:#04x}", other))),
        };
        let padding = padding_bits(r.position() - start);
        if padding > 0 {
            read_reserved(r, diag, "padding", padding, 0)?;
        }
        if r.position() != end {
            return Err(CodecError::LengthMismatch(format!(
                "cEMI frame of {} bytes ended after {} bytes",
                size,
                (r.position() - start) / 8
            )));
        }
        trace!(message_code, size, variant = cemi.type_name(), "dispatched cEMI frame");
        Ok(cemi)
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        let start = w.position();
        w.write_uint(8, self.message_code() as u64).serializing("messageCode")?;
        match self {
            Cemi::LBusmonInd(m) => m.serialize(w),
            Cemi::LDataReq(m) | Cemi::LDataInd(m) | Cemi::LDataCon(m) => m.serialize(w),
            Cemi::LRawReq(m)
            | Cemi::LRawInd(m)
            | Cemi::LRawCon(m)
            | Cemi::LPollDataReq(m)
            | Cemi::LPollDataCon(m)
            | Cemi::TDataConnectedReq(m)
            | Cemi::TDataConnectedInd(m)
            | Cemi::TDataIndividualReq(m)
            | Cemi::TDataIndividualInd(m) => m.serialize(w),
            Cemi::MPropReadReq(m) => m.serialize(w),
            Cemi::MPropReadCon(m) | Cemi::MPropWriteReq(m) | Cemi::MPropInfoInd(m) => m.serialize(w),
            Cemi::MPropWriteCon(m) => m.serialize(w),
            Cemi::MFuncPropCommandReq(m) | Cemi::MFuncPropStateReadReq(m) | Cemi::MFuncPropCon(m) => m.serialize(w),
            Cemi::MResetReq | Cemi::MResetInd => Ok(()),
        }
        .serializing(self.type_name())?;
        let padding = padding_bits(w.position() - start);
        if padding > 0 {
            write_reserved(w, "padding", padding, 0)?;
        }
        Ok(())
    }

    fn length_in_bits(&self) -> usize {
        let bits = self.body_length_in_bits();
        bits + padding_bits(bits) as usize
    }
}

/// Zero bits that round a frame of `bits` up to whole bytes.
fn padding_bits(bits: usize) -> u8 {
    ((8 - bits % 8) % 8) as u8
}
