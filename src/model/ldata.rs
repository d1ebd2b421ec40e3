//! Link-layer data frames carried inside cEMI `L_Data` services.
//!
//! The control byte holds two discriminator bits, `notAckFrame` and
//! `polling`, interleaved with the other flags. Both are matched together;
//! every combination maps to a frame kind.

use crate::bits::{BitReader, BitWriter};
use crate::codec::{CodecError, Message};
use crate::diag::Diagnostics;
use crate::enumeration::WireEnum;
use crate::field::{read_implicit, read_reserved, write_reserved, FieldResultExt};
use crate::model::address::{KnxAddress, KnxGroupAddress};
use crate::model::apdu::{self, Apdu};
use crate::model::enums::CemiPriority;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LDataFrame {
    /// Set for standard frames, clear for extended ones.
    pub frame_type: bool,
    pub not_repeated: bool,
    pub priority: CemiPriority,
    pub acknowledge_requested: bool,
    pub error_flag: bool,
    pub kind: LDataFrameKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LDataFrameKind {
    /// Acknowledgement frame. The polling bit carries no meaning here but is kept.
    Ack { polling: bool },
    Extended(LDataExtended),
    PollData(LPollData),
}

impl LDataFrame {
    pub fn not_ack_frame(&self) -> bool {
        !matches!(self.kind, LDataFrameKind::Ack { .. })
    }

    pub fn polling(&self) -> bool {
        match self.kind {
            LDataFrameKind::Ack { polling } => polling,
            LDataFrameKind::Extended(_) => false,
            LDataFrameKind::PollData(_) => true,
        }
    }

    /// A standard, non-repeated, low-priority frame around `data`.
    pub fn extended(data: LDataExtended) -> Self {
        LDataFrame {
            frame_type: true,
            not_repeated: true,
            priority: CemiPriority::Low,
            acknowledge_requested: false,
            error_flag: false,
            kind: LDataFrameKind::Extended(data),
        }
    }

    pub fn as_extended(&self) -> Option<&LDataExtended> {
        match &self.kind {
            LDataFrameKind::Extended(data) => Some(data),
            _ => None,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            LDataFrameKind::Ack { .. } => "LDataFrameAck",
            LDataFrameKind::Extended(_) => "LDataExtended",
            LDataFrameKind::PollData(_) => "LPollData",
        }
    }
}

impl Message for LDataFrame {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let frame_type = r.read_bit().parsing("frameType")?;
        let polling = r.read_bit().parsing("polling")?;
        let not_repeated = r.read_bit().parsing("notRepeated")?;
        let not_ack_frame = r.read_bit().parsing("notAckFrame")?;
        let priority = CemiPriority::read(r).parsing("priority")?;
        let acknowledge_requested = r.read_bit().parsing("acknowledgeRequested")?;
        let error_flag = r.read_bit().parsing("errorFlag")?;
        let kind = match (not_ack_frame, polling) {
            (false, polling) => LDataFrameKind::Ack { polling },
            (true, false) => LDataFrameKind::Extended(LDataExtended::parse(r, diag, ()).parsing("LDataExtended")?),
            (true, true) => LDataFrameKind::PollData(LPollData::parse(r, diag, ()).parsing("LPollData")?),
        };
        let frame = LDataFrame {
            frame_type,
            not_repeated,
            priority,
            acknowledge_requested,
            error_flag,
            kind,
        };
        trace!(not_ack_frame, polling, variant = frame.kind_name(), "dispatched link-layer frame");
        Ok(frame)
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_bit(self.frame_type).serializing("frameType")?;
        w.write_bit(self.polling()).serializing("polling")?;
        w.write_bit(self.not_repeated).serializing("notRepeated")?;
        w.write_bit(self.not_ack_frame()).serializing("notAckFrame")?;
        self.priority.write(w).serializing("priority")?;
        w.write_bit(self.acknowledge_requested).serializing("acknowledgeRequested")?;
        w.write_bit(self.error_flag).serializing("errorFlag")?;
        match &self.kind {
            LDataFrameKind::Ack { .. } => Ok(()),
            LDataFrameKind::Extended(data) => data.serialize(w).serializing("LDataExtended"),
            LDataFrameKind::PollData(poll) => poll.serialize(w).serializing("LPollData"),
        }
    }

    fn length_in_bits(&self) -> usize {
        8 + match &self.kind {
            LDataFrameKind::Ack { .. } => 0,
            LDataFrameKind::Extended(data) => data.length_in_bits(),
            LDataFrameKind::PollData(poll) => poll.length_in_bits(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LDataExtended {
    /// Destination is a group address rather than an individual one.
    pub group_address: bool,
    /// 3 bits.
    pub hop_count: u8,
    /// 4 bits.
    pub extended_frame_format: u8,
    pub source_address: KnxAddress,
    pub destination_address: [u8; 2],
    pub apdu: Apdu,
}

impl LDataExtended {
    pub fn destination_group_address(&self, num_levels: u8) -> Result<KnxGroupAddress, CodecError> {
        KnxGroupAddress::from_bytes(self.destination_address, num_levels)
    }

    pub fn destination_individual_address(&self) -> KnxAddress {
        KnxAddress::from_raw(u16::from_be_bytes(self.destination_address))
    }
}

impl Message for LDataExtended {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let group_address = r.read_bit().parsing("groupAddress")?;
        let hop_count = r.read_u8(3).parsing("hopCount")?;
        let extended_frame_format = r.read_u8(4).parsing("extendedFrameFormat")?;
        let source_address = KnxAddress::parse(r, diag, ()).parsing("sourceAddress")?;
        let destination_address = r.read_array::<2>().parsing("destinationAddress")?;
        let data_length = read_implicit(r, "dataLength", 8)? as u8;
        let apdu_start = r.position();
        let apdu = Apdu::parse(r, diag, data_length).parsing("apdu")?;
        let apdu_bytes = (r.position() - apdu_start).div_ceil(8);
        if apdu_bytes != data_length as usize + 1 {
            return Err(CodecError::LengthMismatch(format!(
                "dataLength {} announces a {}-byte APDU, parsed {} bytes",
                data_length,
                data_length as usize + 1,
                apdu_bytes
            ))
            .in_parse_field("dataLength"));
        }
        Ok(LDataExtended {
            group_address,
            hop_count,
            extended_frame_format,
            source_address,
            destination_address,
            apdu,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_bit(self.group_address).serializing("groupAddress")?;
        w.write_uint(3, self.hop_count as u64).serializing("hopCount")?;
        w.write_uint(4, self.extended_frame_format as u64).serializing("extendedFrameFormat")?;
        self.source_address.serialize(w).serializing("sourceAddress")?;
        w.write_bytes(&self.destination_address).serializing("destinationAddress")?;
        apdu::write_with_data_length(w, &self.apdu)
    }

    fn length_in_bits(&self) -> usize {
        8 + 16 + 16 + 8 + self.apdu.length_in_bits()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LPollData {
    pub source_address: KnxAddress,
    pub target_address: [u8; 2],
    /// 6 bits.
    pub number_expected_poll_data: u8,
}

impl Message for LPollData {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let source_address = KnxAddress::parse(r, diag, ()).parsing("sourceAddress")?;
        let target_address = r.read_array::<2>().parsing("targetAddress")?;
        read_reserved(r, diag, "reserved", 4, 0)?;
        let number_expected_poll_data = r.read_u8(6).parsing("numberExpectedPollData")?;
        Ok(LPollData {
            source_address,
            target_address,
            number_expected_poll_data,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.source_address.serialize(w).serializing("sourceAddress")?;
        w.write_bytes(&self.target_address).serializing("targetAddress")?;
        write_reserved(w, "reserved", 4, 0)?;
        w.write_uint(6, self.number_expected_poll_data as u64).serializing("numberExpectedPollData")
    }

    fn length_in_bits(&self) -> usize {
        16 + 16 + 4 + 6
    }
}
