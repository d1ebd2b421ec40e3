//! The KNX message catalog: every wire structure, from the KNXnet/IP
//! envelope down to the application layer, plus the closed enumerations
//! they reference.

pub mod address;
pub mod apdu;
pub mod apdu_ext;
pub mod blocks;
pub mod cemi;
pub mod datapoint_type;
pub mod enums;
pub mod knxnetip;
pub mod ldata;

pub use address::{KnxAddress, KnxGroupAddress};
pub use apdu::{Apdu, ApduControl, ApduData, ApduKind, GroupValue};
pub use apdu_ext::ApduDataExt;
pub use blocks::{
    ConnectionAckHeader, ConnectionHeader, ConnectionRequestInformation, ConnectionResponseDataBlock, DeviceStatus, DibDeviceInfo,
    DibSuppSvcFamilies, Hpai, IpAddress, MacAddress, ProjectInstallationIdentifier, ServiceId,
};
pub use cemi::{AdditionalInformation, Cemi, CemiRaw, LBusmonInd, LData, MFuncProp, MPropData, MPropWriteCon, PropertyHeader};
pub use datapoint_type::{KnxDatapointMainType, KnxDatapointType};
pub use enums::{
    AccessLevel, CemiPriority, DeviceDescriptorMediumType, DeviceDescriptorType0, FirmwareType, HostProtocolCode, KnxLayer, KnxMedium,
    KnxPropertyDataType, Status,
};
pub use knxnetip::KnxNetIpMessage;
pub use ldata::{LDataExtended, LDataFrame, LDataFrameKind, LPollData};
