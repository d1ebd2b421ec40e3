//! Structures shared by the KNXnet/IP services: endpoints, device
//! information blocks and connection headers.
//!
//! Most blocks open with a one-byte `structureLength` that counts itself.
//! It is implicit: consumed on parse and recomputed on serialize.

use crate::bits::{BitReader, BitWriter};
use crate::codec::{CodecError, Message};
use crate::diag::Diagnostics;
use crate::enumeration::WireEnum;
use crate::field::{read_implicit, read_length_array, read_reserved, remaining_length, write_length_prefixed, write_reserved, FieldResultExt};
use crate::model::address::KnxAddress;
use crate::model::enums::{HostProtocolCode, KnxLayer, KnxMedium, Status};
use std::fmt;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IpAddress(pub [u8; 4]);

impl From<Ipv4Addr> for IpAddress {
    fn from(addr: Ipv4Addr) -> Self {
        IpAddress(addr.octets())
    }
}

impl From<IpAddress> for Ipv4Addr {
    fn from(addr: IpAddress) -> Self {
        Ipv4Addr::from(addr.0)
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Ipv4Addr::from(self.0), f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", a, b, c, d, e, g)
    }
}

/// Host protocol address information: where to reach an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hpai {
    pub host_protocol_code: HostProtocolCode,
    pub ip_address: IpAddress,
    pub ip_port: u16,
}

impl Hpai {
    pub fn udp(ip_address: impl Into<IpAddress>, ip_port: u16) -> Self {
        Hpai {
            host_protocol_code: HostProtocolCode::Ipv4Udp,
            ip_address: ip_address.into(),
            ip_port,
        }
    }
}

impl Message for Hpai {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        read_implicit(r, "structureLength", 8)?;
        let host_protocol_code = HostProtocolCode::read(r).parsing("hostProtocolCode")?;
        let ip_address = IpAddress(r.read_array::<4>().parsing("ipAddress")?);
        let ip_port = r.read_u16(16).parsing("ipPort")?;
        Ok(Hpai {
            host_protocol_code,
            ip_address,
            ip_port,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        write_length_prefixed(w, "structureLength", 8, 1, |w| {
            self.host_protocol_code.write(w).serializing("hostProtocolCode")?;
            w.write_bytes(&self.ip_address.0).serializing("ipAddress")?;
            w.write_uint(16, self.ip_port as u64).serializing("ipPort")
        })
    }

    fn length_in_bits(&self) -> usize {
        8 + 8 + 32 + 16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceStatus {
    pub program_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectInstallationIdentifier {
    pub project_number: u8,
    pub installation_number: u8,
}

/// Device information DIB, returned by search and description responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DibDeviceInfo {
    pub description_type: u8,
    pub knx_medium: KnxMedium,
    pub device_status: DeviceStatus,
    pub knx_address: KnxAddress,
    pub project_installation_identifier: ProjectInstallationIdentifier,
    pub knx_net_ip_device_serial_number: [u8; 6],
    pub knx_net_ip_device_multicast_address: IpAddress,
    pub knx_net_ip_device_mac_address: MacAddress,
    pub device_friendly_name: [u8; 30],
}

impl DibDeviceInfo {
    /// Friendly name up to the first NUL, decoded as Latin-1.
    pub fn friendly_name(&self) -> String {
        self.device_friendly_name
            .iter()
            .take_while(|b| **b != 0)
            .map(|b| *b as char)
            .collect()
    }

    /// Stores `name` NUL-padded; longer names are truncated to 30 bytes.
    pub fn set_friendly_name(&mut self, name: &str) {
        self.device_friendly_name = [0; 30];
        for (slot, ch) in self.device_friendly_name.iter_mut().zip(name.chars()) {
            *slot = u8::try_from(u32::from(ch)).unwrap_or(b'?');
        }
    }
}

impl Message for DibDeviceInfo {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        read_implicit(r, "structureLength", 8)?;
        let description_type = r.read_u8(8).parsing("descriptionType")?;
        let knx_medium = KnxMedium::read(r).parsing("knxMedium")?;
        read_reserved(r, diag, "deviceStatus.reserved", 7, 0)?;
        let program_mode = r.read_bit().parsing("deviceStatus.programMode")?;
        let knx_address = KnxAddress::parse(r, diag, ()).parsing("knxAddress")?;
        let project_number = r.read_u8(8).parsing("projectNumber")?;
        let installation_number = r.read_u8(8).parsing("installationNumber")?;
        let knx_net_ip_device_serial_number = r.read_array::<6>().parsing("knxNetIpDeviceSerialNumber")?;
        let knx_net_ip_device_multicast_address = IpAddress(r.read_array::<4>().parsing("knxNetIpDeviceMulticastAddress")?);
        let knx_net_ip_device_mac_address = MacAddress(r.read_array::<6>().parsing("knxNetIpDeviceMacAddress")?);
        let device_friendly_name = r.read_array::<30>().parsing("deviceFriendlyName")?;
        Ok(DibDeviceInfo {
            description_type,
            knx_medium,
            device_status: DeviceStatus { program_mode },
            knx_address,
            project_installation_identifier: ProjectInstallationIdentifier {
                project_number,
                installation_number,
            },
            knx_net_ip_device_serial_number,
            knx_net_ip_device_multicast_address,
            knx_net_ip_device_mac_address,
            device_friendly_name,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        write_length_prefixed(w, "structureLength", 8, 1, |w| {
            w.write_uint(8, self.description_type as u64).serializing("descriptionType")?;
            self.knx_medium.write(w).serializing("knxMedium")?;
            write_reserved(w, "deviceStatus.reserved", 7, 0)?;
            w.write_bit(self.device_status.program_mode).serializing("deviceStatus.programMode")?;
            self.knx_address.serialize(w).serializing("knxAddress")?;
            let pii = &self.project_installation_identifier;
            w.write_uint(8, pii.project_number as u64).serializing("projectNumber")?;
            w.write_uint(8, pii.installation_number as u64).serializing("installationNumber")?;
            w.write_bytes(&self.knx_net_ip_device_serial_number).serializing("knxNetIpDeviceSerialNumber")?;
            w.write_bytes(&self.knx_net_ip_device_multicast_address.0).serializing("knxNetIpDeviceMulticastAddress")?;
            w.write_bytes(&self.knx_net_ip_device_mac_address.0).serializing("knxNetIpDeviceMacAddress")?;
            w.write_bytes(&self.device_friendly_name).serializing("deviceFriendlyName")
        })
    }

    fn length_in_bits(&self) -> usize {
        // structureLength, descriptionType, medium, status, address, project id,
        // serial, multicast, mac, friendly name
        (1 + 1 + 1 + 1 + 2 + 2 + 6 + 4 + 6 + 30) * 8
    }
}

/// A service family and the version the device supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceId {
    KnxNetIpCore { version: u8 },
    KnxNetIpDeviceManagement { version: u8 },
    KnxNetIpTunneling { version: u8 },
    KnxNetIpRouting { version: u8 },
    KnxNetRemoteLogging { version: u8 },
    KnxNetRemoteConfigurationAndDiagnosis { version: u8 },
    KnxNetObjectServer { version: u8 },
}

impl ServiceId {
    pub fn service_type(&self) -> u8 {
        match self {
            ServiceId::KnxNetIpCore { .. } => 0x02,
            ServiceId::KnxNetIpDeviceManagement { .. } => 0x03,
            ServiceId::KnxNetIpTunneling { .. } => 0x04,
            ServiceId::KnxNetIpRouting { .. } => 0x05,
            ServiceId::KnxNetRemoteLogging { .. } => 0x06,
            ServiceId::KnxNetRemoteConfigurationAndDiagnosis { .. } => 0x07,
            ServiceId::KnxNetObjectServer { .. } => 0x08,
        }
    }

    pub fn version(&self) -> u8 {
        match *self {
            ServiceId::KnxNetIpCore { version }
            | ServiceId::KnxNetIpDeviceManagement { version }
            | ServiceId::KnxNetIpTunneling { version }
            | ServiceId::KnxNetIpRouting { version }
            | ServiceId::KnxNetRemoteLogging { version }
            | ServiceId::KnxNetRemoteConfigurationAndDiagnosis { version }
            | ServiceId::KnxNetObjectServer { version } => version,
        }
    }
}

impl Message for ServiceId {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let service_type = r.read_u8(8).parsing("serviceType")?;
        let version = r.read_u8(8).parsing("version")?;
        Ok(match service_type {
            0x02 => ServiceId::KnxNetIpCore { version },
            0x03 => ServiceId::KnxNetIpDeviceManagement { version },
            0x04 => ServiceId::KnxNetIpTunneling { version },
            0x05 => ServiceId::KnxNetIpRouting { version },
            0x06 => ServiceId::KnxNetRemoteLogging { version },
            0x07 => ServiceId::KnxNetRemoteConfigurationAndDiagnosis { version },
            0x08 => ServiceId::KnxNetObjectServer { version },
            other => return Err(CodecError::unknown_variant("ServiceId", format!("{:#04x}", other))),
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(8, self.service_type() as u64).serializing("serviceType")?;
        w.write_uint(8, self.version() as u64).serializing("version")
    }

    fn length_in_bits(&self) -> usize {
        16
    }
}

/// Supported service families DIB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DibSuppSvcFamilies {
    pub description_type: u8,
    pub service_ids: Vec<ServiceId>,
}

impl Message for DibSuppSvcFamilies {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let structure_length = read_implicit(r, "structureLength", 8)?;
        let description_type = r.read_u8(8).parsing("descriptionType")?;
        let ids_len = remaining_length("serviceIds", structure_length, 2)?;
        let service_ids = read_length_array(r, "serviceIds", ids_len, |r| ServiceId::parse(r, diag, ()))?;
        Ok(DibSuppSvcFamilies {
            description_type,
            service_ids,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        write_length_prefixed(w, "structureLength", 8, 1, |w| {
            w.write_uint(8, self.description_type as u64).serializing("descriptionType")?;
            for id in &self.service_ids {
                id.serialize(w).serializing("serviceIds")?;
            }
            Ok(())
        })
    }

    fn length_in_bits(&self) -> usize {
        16 + self.service_ids.iter().map(ServiceId::length_in_bits).sum::<usize>()
    }
}

/// Connection type requested by a connect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRequestInformation {
    DeviceManagement,
    TunnelConnection { knx_layer: KnxLayer },
}

impl ConnectionRequestInformation {
    pub fn connection_type(&self) -> u8 {
        match self {
            ConnectionRequestInformation::DeviceManagement => 0x03,
            ConnectionRequestInformation::TunnelConnection { .. } => 0x04,
        }
    }
}

impl Message for ConnectionRequestInformation {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        read_implicit(r, "structureLength", 8)?;
        let connection_type = r.read_u8(8).parsing("connectionType")?;
        match connection_type {
            0x03 => Ok(ConnectionRequestInformation::DeviceManagement),
            0x04 => {
                let knx_layer = KnxLayer::read(r).parsing("knxLayer")?;
                read_reserved(r, diag, "reserved", 8, 0)?;
                Ok(ConnectionRequestInformation::TunnelConnection { knx_layer })
            }
            other => Err(CodecError::unknown_variant("ConnectionRequestInformation", format!("{:#04x}", other))),
        }
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        write_length_prefixed(w, "structureLength", 8, 1, |w| {
            w.write_uint(8, self.connection_type() as u64).serializing("connectionType")?;
            if let ConnectionRequestInformation::TunnelConnection { knx_layer } = self {
                knx_layer.write(w).serializing("knxLayer")?;
                write_reserved(w, "reserved", 8, 0)?;
            }
            Ok(())
        })
    }

    fn length_in_bits(&self) -> usize {
        match self {
            ConnectionRequestInformation::DeviceManagement => 16,
            ConnectionRequestInformation::TunnelConnection { .. } => 32,
        }
    }
}

/// Connection-type specific part of a connect response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionResponseDataBlock {
    DeviceManagement,
    TunnelConnection { knx_address: KnxAddress },
}

impl ConnectionResponseDataBlock {
    pub fn connection_type(&self) -> u8 {
        match self {
            ConnectionResponseDataBlock::DeviceManagement => 0x03,
            ConnectionResponseDataBlock::TunnelConnection { .. } => 0x04,
        }
    }
}

impl Message for ConnectionResponseDataBlock {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        read_implicit(r, "structureLength", 8)?;
        let connection_type = r.read_u8(8).parsing("connectionType")?;
        match connection_type {
            0x03 => Ok(ConnectionResponseDataBlock::DeviceManagement),
            0x04 => {
                let knx_address = KnxAddress::parse(r, diag, ()).parsing("knxAddress")?;
                Ok(ConnectionResponseDataBlock::TunnelConnection { knx_address })
            }
            other => Err(CodecError::unknown_variant("ConnectionResponseDataBlock", format!("{:#04x}", other))),
        }
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        write_length_prefixed(w, "structureLength", 8, 1, |w| {
            w.write_uint(8, self.connection_type() as u64).serializing("connectionType")?;
            if let ConnectionResponseDataBlock::TunnelConnection { knx_address } = self {
                knx_address.serialize(w).serializing("knxAddress")?;
            }
            Ok(())
        })
    }

    fn length_in_bits(&self) -> usize {
        match self {
            ConnectionResponseDataBlock::DeviceManagement => 16,
            ConnectionResponseDataBlock::TunnelConnection { .. } => 32,
        }
    }
}

/// Connection header opening tunnelling and device configuration requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionHeader {
    pub communication_channel_id: u8,
    pub sequence_counter: u8,
}

pub type TunnelingRequestDataBlock = ConnectionHeader;
pub type DeviceConfigurationRequestDataBlock = ConnectionHeader;

impl Message for ConnectionHeader {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        read_implicit(r, "structureLength", 8)?;
        let communication_channel_id = r.read_u8(8).parsing("communicationChannelId")?;
        let sequence_counter = r.read_u8(8).parsing("sequenceCounter")?;
        read_reserved(r, diag, "reserved", 8, 0)?;
        Ok(ConnectionHeader {
            communication_channel_id,
            sequence_counter,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        write_length_prefixed(w, "structureLength", 8, 1, |w| {
            w.write_uint(8, self.communication_channel_id as u64).serializing("communicationChannelId")?;
            w.write_uint(8, self.sequence_counter as u64).serializing("sequenceCounter")?;
            write_reserved(w, "reserved", 8, 0)
        })
    }

    fn length_in_bits(&self) -> usize {
        32
    }
}

/// Connection header of tunnelling and device configuration acknowledgements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionAckHeader {
    pub communication_channel_id: u8,
    pub sequence_counter: u8,
    pub status: Status,
}

pub type TunnelingResponseDataBlock = ConnectionAckHeader;
pub type DeviceConfigurationAckDataBlock = ConnectionAckHeader;

impl Message for ConnectionAckHeader {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        read_implicit(r, "structureLength", 8)?;
        let communication_channel_id = r.read_u8(8).parsing("communicationChannelId")?;
        let sequence_counter = r.read_u8(8).parsing("sequenceCounter")?;
        let status = Status::read(r).parsing("status")?;
        Ok(ConnectionAckHeader {
            communication_channel_id,
            sequence_counter,
            status,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        write_length_prefixed(w, "structureLength", 8, 1, |w| {
            w.write_uint(8, self.communication_channel_id as u64).serializing("communicationChannelId")?;
            w.write_uint(8, self.sequence_counter as u64).serializing("sequenceCounter")?;
            self.status.write(w).serializing("status")
        })
    }

    fn length_in_bits(&self) -> usize {
        32
    }
}
