//! KNXnet/IP messages.
//!
//! Every message starts with the same six-byte header: header length,
//! protocol version, service type (`msgType`) and the total length in bytes.
//! The service type selects the body. Unlisted service types are rejected.

use crate::bits::{BitReader, BitWriter};
use crate::codec::{CodecError, Message};
use crate::diag::Diagnostics;
use crate::enumeration::WireEnum;
use crate::field::{
    read_const, read_implicit, read_optional, read_reserved, remaining_length, write_const, write_length_prefixed, write_optional,
    write_reserved, FieldResultExt,
};
use crate::model::blocks::{
    ConnectionRequestInformation, ConnectionResponseDataBlock, DeviceConfigurationAckDataBlock, DeviceConfigurationRequestDataBlock,
    DibDeviceInfo, DibSuppSvcFamilies, Hpai, TunnelingRequestDataBlock, TunnelingResponseDataBlock,
};
use crate::model::cemi::Cemi;
use crate::model::enums::Status;
use tracing::trace;

pub const HEADER_LENGTH: u8 = 6;
pub const PROTOCOL_VERSION: u8 = 0x10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub hpai_ip_discovery_endpoint: Hpai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub hpai_control_endpoint: Hpai,
    pub dib_device_info: DibDeviceInfo,
    pub dib_supp_svc_families: DibSuppSvcFamilies,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRequest {
    pub hpai_control_endpoint: Hpai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionResponse {
    pub dib_device_info: DibDeviceInfo,
    pub dib_supp_svc_families: DibSuppSvcFamilies,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub hpai_discovery_endpoint: Hpai,
    pub hpai_data_endpoint: Hpai,
    pub connection_request_information: ConnectionRequestInformation,
}

/// Connect response. The data endpoint and the data block are present only
/// when `status` is `NO_ERROR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionResponse {
    pub communication_channel_id: u8,
    pub status: Status,
    pub hpai_data_endpoint: Option<Hpai>,
    pub connection_response_data_block: Option<ConnectionResponseDataBlock>,
}

impl ConnectionResponse {
    pub fn accepted(communication_channel_id: u8, data_endpoint: Hpai, data_block: ConnectionResponseDataBlock) -> Self {
        ConnectionResponse {
            communication_channel_id,
            status: Status::NoError,
            hpai_data_endpoint: Some(data_endpoint),
            connection_response_data_block: Some(data_block),
        }
    }

    pub fn rejected(communication_channel_id: u8, status: Status) -> Self {
        ConnectionResponse {
            communication_channel_id,
            status,
            hpai_data_endpoint: None,
            connection_response_data_block: None,
        }
    }

    fn has_connection_data(status: Status) -> bool {
        status.to_wire() == Status::NoError.to_wire()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStateRequest {
    pub communication_channel_id: u8,
    pub hpai_control_endpoint: Hpai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStateResponse {
    pub communication_channel_id: u8,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectRequest {
    pub communication_channel_id: u8,
    pub hpai_control_endpoint: Hpai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectResponse {
    pub communication_channel_id: u8,
    pub status: Status,
}

/// Service type 0x020B: the body is kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub unknown_data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfigurationRequest {
    pub device_configuration_request_data_block: DeviceConfigurationRequestDataBlock,
    pub cemi: Cemi,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfigurationAck {
    pub device_configuration_ack_data_block: DeviceConfigurationAckDataBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelingRequest {
    pub tunneling_request_data_block: TunnelingRequestDataBlock,
    pub cemi: Cemi,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelingResponse {
    pub tunneling_response_data_block: TunnelingResponseDataBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnxNetIpMessage {
    SearchRequest(SearchRequest),
    SearchResponse(SearchResponse),
    DescriptionRequest(DescriptionRequest),
    DescriptionResponse(DescriptionResponse),
    ConnectionRequest(ConnectionRequest),
    ConnectionResponse(ConnectionResponse),
    ConnectionStateRequest(ConnectionStateRequest),
    ConnectionStateResponse(ConnectionStateResponse),
    DisconnectRequest(DisconnectRequest),
    DisconnectResponse(DisconnectResponse),
    UnknownMessage(UnknownMessage),
    DeviceConfigurationRequest(DeviceConfigurationRequest),
    DeviceConfigurationAck(DeviceConfigurationAck),
    TunnelingRequest(TunnelingRequest),
    TunnelingResponse(TunnelingResponse),
    RoutingIndication,
}

impl KnxNetIpMessage {
    /// Service type code written to the header.
    pub fn msg_type(&self) -> u16 {
        match self {
            KnxNetIpMessage::SearchRequest(_) => 0x0201,
            KnxNetIpMessage::SearchResponse(_) => 0x0202,
            KnxNetIpMessage::DescriptionRequest(_) => 0x0203,
            KnxNetIpMessage::DescriptionResponse(_) => 0x0204,
            KnxNetIpMessage::ConnectionRequest(_) => 0x0205,
            KnxNetIpMessage::ConnectionResponse(_) => 0x0206,
            KnxNetIpMessage::ConnectionStateRequest(_) => 0x0207,
            KnxNetIpMessage::ConnectionStateResponse(_) => 0x0208,
            KnxNetIpMessage::DisconnectRequest(_) => 0x0209,
            KnxNetIpMessage::DisconnectResponse(_) => 0x020A,
            KnxNetIpMessage::UnknownMessage(_) => 0x020B,
            KnxNetIpMessage::DeviceConfigurationRequest(_) => 0x0310,
            KnxNetIpMessage::DeviceConfigurationAck(_) => 0x0311,
            KnxNetIpMessage::TunnelingRequest(_) => 0x0420,
            KnxNetIpMessage::TunnelingResponse(_) => 0x0421,
            KnxNetIpMessage::RoutingIndication => 0x0530,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            KnxNetIpMessage::SearchRequest(_) => "SearchRequest",
            KnxNetIpMessage::SearchResponse(_) => "SearchResponse",
            KnxNetIpMessage::DescriptionRequest(_) => "DescriptionRequest",
            KnxNetIpMessage::DescriptionResponse(_) => "DescriptionResponse",
            KnxNetIpMessage::ConnectionRequest(_) => "ConnectionRequest",
            KnxNetIpMessage::ConnectionResponse(_) => "ConnectionResponse",
            KnxNetIpMessage::ConnectionStateRequest(_) => "ConnectionStateRequest",
            KnxNetIpMessage::ConnectionStateResponse(_) => "ConnectionStateResponse",
            KnxNetIpMessage::DisconnectRequest(_) => "DisconnectRequest",
            KnxNetIpMessage::DisconnectResponse(_) => "DisconnectResponse",
            KnxNetIpMessage::UnknownMessage(_) => "UnknownMessage",
            KnxNetIpMessage::DeviceConfigurationRequest(_) => "DeviceConfigurationRequest",
            KnxNetIpMessage::DeviceConfigurationAck(_) => "DeviceConfigurationAck",
            KnxNetIpMessage::TunnelingRequest(_) => "TunnelingRequest",
            KnxNetIpMessage::TunnelingResponse(_) => "TunnelingResponse",
            KnxNetIpMessage::RoutingIndication => "RoutingIndication",
        }
    }

    /// The embedded cEMI frame, for the services that carry one.
    pub fn cemi(&self) -> Option<&Cemi> {
        match self {
            KnxNetIpMessage::TunnelingRequest(m) => Some(&m.cemi),
            KnxNetIpMessage::DeviceConfigurationRequest(m) => Some(&m.cemi),
            _ => None,
        }
    }

    fn parse_body(r: &mut BitReader<'_>, diag: &mut Diagnostics, msg_type: u16, total_length: u16) -> Result<Self, CodecError> {
        let msg = match msg_type {
            0x0201 => KnxNetIpMessage::SearchRequest(SearchRequest::parse(r, diag, ()).parsing("SearchRequest")?),
            0x0202 => KnxNetIpMessage::SearchResponse(SearchResponse::parse(r, diag, ()).parsing("SearchResponse")?),
            0x0203 => KnxNetIpMessage::DescriptionRequest(DescriptionRequest::parse(r, diag, ()).parsing("DescriptionRequest")?),
            0x0204 => KnxNetIpMessage::DescriptionResponse(DescriptionResponse::parse(r, diag, ()).parsing("DescriptionResponse")?),
            0x0205 => KnxNetIpMessage::ConnectionRequest(ConnectionRequest::parse(r, diag, ()).parsing("ConnectionRequest")?),
            0x0206 => KnxNetIpMessage::ConnectionResponse(ConnectionResponse::parse(r, diag, ()).parsing("ConnectionResponse")?),
            0x0207 => {
                KnxNetIpMessage::ConnectionStateRequest(ConnectionStateRequest::parse(r, diag, ()).parsing("ConnectionStateRequest")?)
            }
            0x0208 => {
                KnxNetIpMessage::ConnectionStateResponse(ConnectionStateResponse::parse(r, diag, ()).parsing("ConnectionStateResponse")?)
            }
            0x0209 => KnxNetIpMessage::DisconnectRequest(DisconnectRequest::parse(r, diag, ()).parsing("DisconnectRequest")?),
            0x020A => KnxNetIpMessage::DisconnectResponse(DisconnectResponse::parse(r, diag, ()).parsing("DisconnectResponse")?),
            0x020B => KnxNetIpMessage::UnknownMessage(UnknownMessage::parse(r, diag, total_length).parsing("UnknownMessage")?),
            0x0310 => KnxNetIpMessage::DeviceConfigurationRequest(
                DeviceConfigurationRequest::parse(r, diag, total_length).parsing("DeviceConfigurationRequest")?,
            ),
            0x0311 => {
                KnxNetIpMessage::DeviceConfigurationAck(DeviceConfigurationAck::parse(r, diag, ()).parsing("DeviceConfigurationAck")?)
            }
            0x0420 => KnxNetIpMessage::TunnelingRequest(TunnelingRequest::parse(r, diag, total_length).parsing("TunnelingRequest")?),
            0x0421 => KnxNetIpMessage::TunnelingResponse(TunnelingResponse::parse(r, diag, ()).parsing("TunnelingResponse")?),
            0x0530 => KnxNetIpMessage::RoutingIndication,
            other => return Err(CodecError::unknown_variant("KnxNetIpMessage", format!("{:#06x}", other))),
        };
        Ok(msg)
    }

    fn serialize_body(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        match self {
            KnxNetIpMessage::SearchRequest(m) => m.serialize(w),
            KnxNetIpMessage::SearchResponse(m) => m.serialize(w),
            KnxNetIpMessage::DescriptionRequest(m) => m.serialize(w),
            KnxNetIpMessage::DescriptionResponse(m) => m.serialize(w),
            KnxNetIpMessage::ConnectionRequest(m) => m.serialize(w),
            KnxNetIpMessage::ConnectionResponse(m) => m.serialize(w),
            KnxNetIpMessage::ConnectionStateRequest(m) => m.serialize(w),
            KnxNetIpMessage::ConnectionStateResponse(m) => m.serialize(w),
            KnxNetIpMessage::DisconnectRequest(m) => m.serialize(w),
            KnxNetIpMessage::DisconnectResponse(m) => m.serialize(w),
            KnxNetIpMessage::UnknownMessage(m) => m.serialize(w),
            KnxNetIpMessage::DeviceConfigurationRequest(m) => m.serialize(w),
            KnxNetIpMessage::DeviceConfigurationAck(m) => m.serialize(w),
            KnxNetIpMessage::TunnelingRequest(m) => m.serialize(w),
            KnxNetIpMessage::TunnelingResponse(m) => m.serialize(w),
            KnxNetIpMessage::RoutingIndication => Ok(()),
        }
        .serializing(self.type_name())
    }

    fn body_length_in_bits(&self) -> usize {
        match self {
            KnxNetIpMessage::SearchRequest(m) => m.length_in_bits(),
            KnxNetIpMessage::SearchResponse(m) => m.length_in_bits(),
            KnxNetIpMessage::DescriptionRequest(m) => m.length_in_bits(),
            KnxNetIpMessage::DescriptionResponse(m) => m.length_in_bits(),
            KnxNetIpMessage::ConnectionRequest(m) => m.length_in_bits(),
            KnxNetIpMessage::ConnectionResponse(m) => m.length_in_bits(),
            KnxNetIpMessage::ConnectionStateRequest(m) => m.length_in_bits(),
            KnxNetIpMessage::ConnectionStateResponse(m) => m.length_in_bits(),
            KnxNetIpMessage::DisconnectRequest(m) => m.length_in_bits(),
            KnxNetIpMessage::DisconnectResponse(m) => m.length_in_bits(),
            KnxNetIpMessage::UnknownMessage(m) => m.length_in_bits(),
            KnxNetIpMessage::DeviceConfigurationRequest(m) => m.length_in_bits(),
            KnxNetIpMessage::DeviceConfigurationAck(m) => m.length_in_bits(),
            KnxNetIpMessage::TunnelingRequest(m) => m.length_in_bits(),
            KnxNetIpMessage::TunnelingResponse(m) => m.length_in_bits(),
            KnxNetIpMessage::RoutingIndication => 0,
        }
    }
}

impl Message for KnxNetIpMessage {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let header_length = read_implicit(r, "headerLength", 8)?;
        if header_length != HEADER_LENGTH as u64 {
            return Err(CodecError::LengthMismatch(format!(
                "header of {} bytes, only {}-byte headers are defined",
                header_length, HEADER_LENGTH
            ))
            .in_parse_field("headerLength"));
        }
        read_const(r, "protocolVersion", 8, PROTOCOL_VERSION as u64)?;
        let msg_type = r.read_u16(16).parsing("msgType")?;
        let total_length = r.read_u16(16).parsing("totalLength")?;
        let msg = KnxNetIpMessage::parse_body(r, diag, msg_type, total_length)?;
        trace!(msg_type, total_length, variant = msg.type_name(), "dispatched KNXnet/IP message");
        Ok(msg)
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(8, HEADER_LENGTH as u64).serializing("headerLength")?;
        write_const(w, "protocolVersion", 8, PROTOCOL_VERSION as u64)?;
        w.write_uint(16, self.msg_type() as u64).serializing("msgType")?;
        write_length_prefixed(w, "totalLength", 16, HEADER_LENGTH as i64, |w| self.serialize_body(w))
    }

    fn length_in_bits(&self) -> usize {
        HEADER_LENGTH as usize * 8 + self.body_length_in_bits()
    }
}

impl Message for SearchRequest {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let hpai_ip_discovery_endpoint = Hpai::parse(r, diag, ()).parsing("hpaiIpDiscoveryEndpoint")?;
        Ok(SearchRequest {
            hpai_ip_discovery_endpoint,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.hpai_ip_discovery_endpoint.serialize(w).serializing("hpaiIpDiscoveryEndpoint")
    }

    fn length_in_bits(&self) -> usize {
        self.hpai_ip_discovery_endpoint.length_in_bits()
    }
}

impl Message for SearchResponse {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let hpai_control_endpoint = Hpai::parse(r, diag, ()).parsing("hpaiControlEndpoint")?;
        let dib_device_info = DibDeviceInfo::parse(r, diag, ()).parsing("dibDeviceInfo")?;
        let dib_supp_svc_families = DibSuppSvcFamilies::parse(r, diag, ()).parsing("dibSuppSvcFamilies")?;
        Ok(SearchResponse {
            hpai_control_endpoint,
            dib_device_info,
            dib_supp_svc_families,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.hpai_control_endpoint.serialize(w).serializing("hpaiControlEndpoint")?;
        self.dib_device_info.serialize(w).serializing("dibDeviceInfo")?;
        self.dib_supp_svc_families.serialize(w).serializing("dibSuppSvcFamilies")
    }

    fn length_in_bits(&self) -> usize {
        self.hpai_control_endpoint.length_in_bits()
            + self.dib_device_info.length_in_bits()
            + self.dib_supp_svc_families.length_in_bits()
    }
}

impl Message for DescriptionRequest {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let hpai_control_endpoint = Hpai::parse(r, diag, ()).parsing("hpaiControlEndpoint")?;
        Ok(DescriptionRequest { hpai_control_endpoint })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.hpai_control_endpoint.serialize(w).serializing("hpaiControlEndpoint")
    }

    fn length_in_bits(&self) -> usize {
        self.hpai_control_endpoint.length_in_bits()
    }
}

impl Message for DescriptionResponse {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let dib_device_info = DibDeviceInfo::parse(r, diag, ()).parsing("dibDeviceInfo")?;
        let dib_supp_svc_families = DibSuppSvcFamilies::parse(r, diag, ()).parsing("dibSuppSvcFamilies")?;
        Ok(DescriptionResponse {
            dib_device_info,
            dib_supp_svc_families,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.dib_device_info.serialize(w).serializing("dibDeviceInfo")?;
        self.dib_supp_svc_families.serialize(w).serializing("dibSuppSvcFamilies")
    }

    fn length_in_bits(&self) -> usize {
        self.dib_device_info.length_in_bits() + self.dib_supp_svc_families.length_in_bits()
    }
}

impl Message for ConnectionRequest {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let hpai_discovery_endpoint = Hpai::parse(r, diag, ()).parsing("hpaiDiscoveryEndpoint")?;
        let hpai_data_endpoint = Hpai::parse(r, diag, ()).parsing("hpaiDataEndpoint")?;
        let connection_request_information =
            ConnectionRequestInformation::parse(r, diag, ()).parsing("connectionRequestInformation")?;
        Ok(ConnectionRequest {
            hpai_discovery_endpoint,
            hpai_data_endpoint,
            connection_request_information,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.hpai_discovery_endpoint.serialize(w).serializing("hpaiDiscoveryEndpoint")?;
        self.hpai_data_endpoint.serialize(w).serializing("hpaiDataEndpoint")?;
        self.connection_request_information
            .serialize(w)
            .serializing("connectionRequestInformation")
    }

    fn length_in_bits(&self) -> usize {
        self.hpai_discovery_endpoint.length_in_bits()
            + self.hpai_data_endpoint.length_in_bits()
            + self.connection_request_information.length_in_bits()
    }
}

impl Message for ConnectionResponse {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let communication_channel_id = r.read_u8(8).parsing("communicationChannelId")?;
        let status = Status::read(r).parsing("status")?;
        let present = ConnectionResponse::has_connection_data(status);
        let hpai_data_endpoint = read_optional(r, "hpaiDataEndpoint", present, |r| Hpai::parse(r, diag, ()))?;
        let connection_response_data_block = read_optional(r, "connectionResponseDataBlock", present, |r| {
            ConnectionResponseDataBlock::parse(r, diag, ())
        })?;
        Ok(ConnectionResponse {
            communication_channel_id,
            status,
            hpai_data_endpoint,
            connection_response_data_block,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(8, self.communication_channel_id as u64).serializing("communicationChannelId")?;
        self.status.write(w).serializing("status")?;
        let present = ConnectionResponse::has_connection_data(self.status);
        write_optional(w, "hpaiDataEndpoint", present, self.hpai_data_endpoint.as_ref(), |w, v| v.serialize(w))?;
        write_optional(
            w,
            "connectionResponseDataBlock",
            present,
            self.connection_response_data_block.as_ref(),
            |w, v| v.serialize(w),
        )
    }

    fn length_in_bits(&self) -> usize {
        16 + self.hpai_data_endpoint.as_ref().map_or(0, Hpai::length_in_bits)
            + self
                .connection_response_data_block
                .as_ref()
                .map_or(0, ConnectionResponseDataBlock::length_in_bits)
    }
}

impl Message for ConnectionStateRequest {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let communication_channel_id = r.read_u8(8).parsing("communicationChannelId")?;
        read_reserved(r, diag, "reserved", 8, 0)?;
        let hpai_control_endpoint = Hpai::parse(r, diag, ()).parsing("hpaiControlEndpoint")?;
        Ok(ConnectionStateRequest {
            communication_channel_id,
            hpai_control_endpoint,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(8, self.communication_channel_id as u64).serializing("communicationChannelId")?;
        write_reserved(w, "reserved", 8, 0)?;
        self.hpai_control_endpoint.serialize(w).serializing("hpaiControlEndpoint")
    }

    fn length_in_bits(&self) -> usize {
        16 + self.hpai_control_endpoint.length_in_bits()
    }
}

impl Message for ConnectionStateResponse {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let communication_channel_id = r.read_u8(8).parsing("communicationChannelId")?;
        let status = Status::read(r).parsing("status")?;
        Ok(ConnectionStateResponse {
            communication_channel_id,
            status,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(8, self.communication_channel_id as u64).serializing("communicationChannelId")?;
        self.status.write(w).serializing("status")
    }

    fn length_in_bits(&self) -> usize {
        16
    }
}

impl Message for DisconnectRequest {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let communication_channel_id = r.read_u8(8).parsing("communicationChannelId")?;
        read_reserved(r, diag, "reserved", 8, 0)?;
        let hpai_control_endpoint = Hpai::parse(r, diag, ()).parsing("hpaiControlEndpoint")?;
        Ok(DisconnectRequest {
            communication_channel_id,
            hpai_control_endpoint,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(8, self.communication_channel_id as u64).serializing("communicationChannelId")?;
        write_reserved(w, "reserved", 8, 0)?;
        self.hpai_control_endpoint.serialize(w).serializing("hpaiControlEndpoint")
    }

    fn length_in_bits(&self) -> usize {
        16 + self.hpai_control_endpoint.length_in_bits()
    }
}

impl Message for DisconnectResponse {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let communication_channel_id = r.read_u8(8).parsing("communicationChannelId")?;
        let status = Status::read(r).parsing("status")?;
        Ok(DisconnectResponse {
            communication_channel_id,
            status,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(8, self.communication_channel_id as u64).serializing("communicationChannelId")?;
        self.status.write(w).serializing("status")
    }

    fn length_in_bits(&self) -> usize {
        16
    }
}

impl Message for UnknownMessage {
    /// Header `totalLength`.
    type Args = u16;

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, total_length: u16) -> Result<Self, CodecError> {
        let count = remaining_length("unknownData", total_length as u64, HEADER_LENGTH as u64)?;
        let unknown_data = r.read_bytes(count).parsing("unknownData")?;
        Ok(UnknownMessage { unknown_data })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_bytes(&self.unknown_data).serializing("unknownData")
    }

    fn length_in_bits(&self) -> usize {
        self.unknown_data.len() * 8
    }
}

/// Byte size of the cEMI frame that fills the rest of a message after `block_len` bytes.
fn cemi_size(total_length: u16, block_len: usize) -> Result<u16, CodecError> {
    remaining_length("cemi", total_length as u64, HEADER_LENGTH as u64 + block_len as u64).map(|n| n as u16)
}

impl Message for DeviceConfigurationRequest {
    /// Header `totalLength`.
    type Args = u16;

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, total_length: u16) -> Result<Self, CodecError> {
        let block = DeviceConfigurationRequestDataBlock::parse(r, diag, ()).parsing("deviceConfigurationRequestDataBlock")?;
        let size = cemi_size(total_length, block.length_in_bytes())?;
        let cemi = Cemi::parse(r, diag, size).parsing("cemi")?;
        Ok(DeviceConfigurationRequest {
            device_configuration_request_data_block: block,
            cemi,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.device_configuration_request_data_block
            .serialize(w)
            .serializing("deviceConfigurationRequestDataBlock")?;
        self.cemi.serialize(w).serializing("cemi")
    }

    fn length_in_bits(&self) -> usize {
        self.device_configuration_request_data_block.length_in_bits() + self.cemi.length_in_bits()
    }
}

impl Message for DeviceConfigurationAck {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let block = DeviceConfigurationAckDataBlock::parse(r, diag, ()).parsing("deviceConfigurationAckDataBlock")?;
        Ok(DeviceConfigurationAck {
            device_configuration_ack_data_block: block,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.device_configuration_ack_data_block
            .serialize(w)
            .serializing("deviceConfigurationAckDataBlock")
    }

    fn length_in_bits(&self) -> usize {
        self.device_configuration_ack_data_block.length_in_bits()
    }
}

impl Message for TunnelingRequest {
    /// Header `totalLength`.
    type Args = u16;

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, total_length: u16) -> Result<Self, CodecError> {
        let block = TunnelingRequestDataBlock::parse(r, diag, ()).parsing("tunnelingRequestDataBlock")?;
        let size = cemi_size(total_length, block.length_in_bytes())?;
        let cemi = Cemi::parse(r, diag, size).parsing("cemi")?;
        Ok(TunnelingRequest {
            tunneling_request_data_block: block,
            cemi,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.tunneling_request_data_block
            .serialize(w)
            .serializing("tunnelingRequestDataBlock")?;
        self.cemi.serialize(w).serializing("cemi")
    }

    fn length_in_bits(&self) -> usize {
        self.tunneling_request_data_block.length_in_bits() + self.cemi.length_in_bits()
    }
}

impl Message for TunnelingResponse {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let block = TunnelingResponseDataBlock::parse(r, diag, ()).parsing("tunnelingResponseDataBlock")?;
        Ok(TunnelingResponse {
            tunneling_response_data_block: block,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        self.tunneling_response_data_block
            .serialize(w)
            .serializing("tunnelingResponseDataBlock")
    }

    fn length_in_bits(&self) -> usize {
        self.tunneling_response_data_block.length_in_bits()
    }
}
