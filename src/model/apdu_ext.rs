//! Extended application services (APCI `0xF` followed by a 6-bit extended code).

use crate::bits::{BitReader, BitWriter};
use crate::codec::{CodecError, Message};
use crate::diag::Diagnostics;
use crate::enumeration::WireEnum;
use crate::field::{read_reserved, remaining_length, write_reserved, FieldResultExt};
use crate::model::enums::{AccessLevel, KnxPropertyDataType};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApduDataExt {
    AuthorizeRequest {
        level: u8,
        key: [u8; 4],
    },
    AuthorizeResponse {
        level: u8,
    },
    KeyWrite {
        level: u8,
        key: [u8; 4],
    },
    KeyResponse {
        level: u8,
    },
    PropertyValueRead {
        object_index: u8,
        property_id: u8,
        count: u8,
        index: u16,
    },
    PropertyValueResponse {
        object_index: u8,
        property_id: u8,
        count: u8,
        index: u16,
        data: Vec<u8>,
    },
    PropertyValueWrite {
        object_index: u8,
        property_id: u8,
        count: u8,
        index: u16,
        data: Vec<u8>,
    },
    PropertyDescriptionRead {
        object_index: u8,
        property_id: u8,
        index: u8,
    },
    PropertyDescriptionResponse {
        object_index: u8,
        property_id: u8,
        index: u8,
        write_enabled: bool,
        property_data_type: KnxPropertyDataType,
        max_nr_of_elements: u16,
        read_level: AccessLevel,
        write_level: AccessLevel,
    },
    IndividualAddressSerialNumberRead {
        serial_number: [u8; 6],
    },
}

impl ApduDataExt {
    pub fn ext_apci_type(&self) -> u8 {
        match self {
            ApduDataExt::AuthorizeRequest { .. } => 0x11,
            ApduDataExt::AuthorizeResponse { .. } => 0x12,
            ApduDataExt::KeyWrite { .. } => 0x13,
            ApduDataExt::KeyResponse { .. } => 0x14,
            ApduDataExt::PropertyValueRead { .. } => 0x15,
            ApduDataExt::PropertyValueResponse { .. } => 0x16,
            ApduDataExt::PropertyValueWrite { .. } => 0x17,
            ApduDataExt::PropertyDescriptionRead { .. } => 0x18,
            ApduDataExt::PropertyDescriptionResponse { .. } => 0x19,
            ApduDataExt::IndividualAddressSerialNumberRead { .. } => 0x1D,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ApduDataExt::AuthorizeRequest { .. } => "AuthorizeRequest",
            ApduDataExt::AuthorizeResponse { .. } => "AuthorizeResponse",
            ApduDataExt::KeyWrite { .. } => "KeyWrite",
            ApduDataExt::KeyResponse { .. } => "KeyResponse",
            ApduDataExt::PropertyValueRead { .. } => "PropertyValueRead",
            ApduDataExt::PropertyValueResponse { .. } => "PropertyValueResponse",
            ApduDataExt::PropertyValueWrite { .. } => "PropertyValueWrite",
            ApduDataExt::PropertyDescriptionRead { .. } => "PropertyDescriptionRead",
            ApduDataExt::PropertyDescriptionResponse { .. } => "PropertyDescriptionResponse",
            ApduDataExt::IndividualAddressSerialNumberRead { .. } => "IndividualAddressSerialNumberRead",
        }
    }
}

/// objectIndex, propertyId, u4 count, u12 index.
fn read_property_ref(r: &mut BitReader<'_>) -> Result<(u8, u8, u8, u16), CodecError> {
    let object_index = r.read_u8(8).parsing("objectIndex")?;
    let property_id = r.read_u8(8).parsing("propertyId")?;
    let count = r.read_u8(4).parsing("count")?;
    let index = r.read_u16(12).parsing("index")?;
    Ok((object_index, property_id, count, index))
}

fn write_property_ref(w: &mut BitWriter, object_index: u8, property_id: u8, count: u8, index: u16) -> Result<(), CodecError> {
    w.write_uint(8, object_index as u64).serializing("objectIndex")?;
    w.write_uint(8, property_id as u64).serializing("propertyId")?;
    w.write_uint(4, count as u64).serializing("count")?;
    w.write_uint(12, index as u64).serializing("index")
}

impl Message for ApduDataExt {
    /// APDU `dataLength` (APDU byte length minus one).
    type Args = u8;

    fn parse(r: &mut BitReader<'_>, diag: &mut Diagnostics, data_length: u8) -> Result<Self, CodecError> {
        let ext_apci_type = r.read_u8(6).parsing("extApciType")?;
        let ext = match ext_apci_type {
            0x11 => ApduDataExt::AuthorizeRequest {
                level: r.read_u8(8).parsing("level")?,
                key: r.read_array::<4>().parsing("key")?,
            },
            0x12 => ApduDataExt::AuthorizeResponse {
                level: r.read_u8(8).parsing("level")?,
            },
            0x13 => ApduDataExt::KeyWrite {
                level: r.read_u8(8).parsing("level")?,
                key: r.read_array::<4>().parsing("key")?,
            },
            0x14 => ApduDataExt::KeyResponse {
                level: r.read_u8(8).parsing("level")?,
            },
            0x15 => {
                let (object_index, property_id, count, index) = read_property_ref(r)?;
                ApduDataExt::PropertyValueRead {
                    object_index,
                    property_id,
                    count,
                    index,
                }
            }
            0x16 | 0x17 => {
                let (object_index, property_id, count, index) = read_property_ref(r)?;
                let n = remaining_length("data", data_length as u64, 5)?;
                let data = r.read_bytes(n).parsing("data")?;
                if ext_apci_type == 0x16 {
                    ApduDataExt::PropertyValueResponse {
                        object_index,
                        property_id,
                        count,
                        index,
                        data,
                    }
                } else {
                    ApduDataExt::PropertyValueWrite {
                        object_index,
                        property_id,
                        count,
                        index,
                        data,
                    }
                }
            }
            0x18 => ApduDataExt::PropertyDescriptionRead {
                object_index: r.read_u8(8).parsing("objectIndex")?,
                property_id: r.read_u8(8).parsing("propertyId")?,
                index: r.read_u8(8).parsing("index")?,
            },
            0x19 => {
                let object_index = r.read_u8(8).parsing("objectIndex")?;
                let property_id = r.read_u8(8).parsing("propertyId")?;
                let index = r.read_u8(8).parsing("index")?;
                let write_enabled = r.read_bit().parsing("writeEnabled")?;
                read_reserved(r, diag, "reserved", 1, 0)?;
                let property_data_type = KnxPropertyDataType::read(r).parsing("propertyDataType")?;
                read_reserved(r, diag, "reserved", 4, 0)?;
                let max_nr_of_elements = r.read_u16(12).parsing("maxNrOfElements")?;
                let read_level = AccessLevel::read(r).parsing("readLevel")?;
                let write_level = AccessLevel::read(r).parsing("writeLevel")?;
                ApduDataExt::PropertyDescriptionResponse {
                    object_index,
                    property_id,
                    index,
                    write_enabled,
                    property_data_type,
                    max_nr_of_elements,
                    read_level,
                    write_level,
                }
            }
            0x1D => ApduDataExt::IndividualAddressSerialNumberRead {
                serial_number: r.read_array::<6>().parsing("serialNumber")?,
            },
            other => return Err(CodecError::unknown_variant("ApduDataExt", format!("{:#04x}", other))),
        };
        trace!(ext_apci_type, variant = ext.type_name(), "dispatched extended APDU");
        Ok(ext)
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(6, self.ext_apci_type() as u64).serializing("extApciType")?;
        match self {
            ApduDataExt::AuthorizeRequest { level, key } | ApduDataExt::KeyWrite { level, key } => {
                w.write_uint(8, *level as u64).serializing("level")?;
                w.write_bytes(key).serializing("key")
            }
            ApduDataExt::AuthorizeResponse { level } | ApduDataExt::KeyResponse { level } => {
                w.write_uint(8, *level as u64).serializing("level")
            }
            ApduDataExt::PropertyValueRead {
                object_index,
                property_id,
                count,
                index,
            } => write_property_ref(w, *object_index, *property_id, *count, *index),
            ApduDataExt::PropertyValueResponse {
                object_index,
                property_id,
                count,
                index,
                data,
            }
            | ApduDataExt::PropertyValueWrite {
                object_index,
                property_id,
                count,
                index,
                data,
            } => {
                write_property_ref(w, *object_index, *property_id, *count, *index)?;
                w.write_bytes(data).serializing("data")
            }
            ApduDataExt::PropertyDescriptionRead {
                object_index,
                property_id,
                index,
            } => {
                w.write_uint(8, *object_index as u64).serializing("objectIndex")?;
                w.write_uint(8, *property_id as u64).serializing("propertyId")?;
                w.write_uint(8, *index as u64).serializing("index")
            }
            ApduDataExt::PropertyDescriptionResponse {
                object_index,
                property_id,
                index,
                write_enabled,
                property_data_type,
                max_nr_of_elements,
                read_level,
                write_level,
            } => {
                w.write_uint(8, *object_index as u64).serializing("objectIndex")?;
                w.write_uint(8, *property_id as u64).serializing("propertyId")?;
                w.write_uint(8, *index as u64).serializing("index")?;
                w.write_bit(*write_enabled).serializing("writeEnabled")?;
                write_reserved(w, "reserved", 1, 0)?;
                property_data_type.write(w).serializing("propertyDataType")?;
                write_reserved(w, "reserved", 4, 0)?;
                w.write_uint(12, *max_nr_of_elements as u64).serializing("maxNrOfElements")?;
                read_level.write(w).serializing("readLevel")?;
                write_level.write(w).serializing("writeLevel")
            }
            ApduDataExt::IndividualAddressSerialNumberRead { serial_number } => {
                w.write_bytes(serial_number).serializing("serialNumber")
            }
        }
    }

    fn length_in_bits(&self) -> usize {
        let body = match self {
            ApduDataExt::AuthorizeRequest { .. } | ApduDataExt::KeyWrite { .. } => 40,
            ApduDataExt::AuthorizeResponse { .. } | ApduDataExt::KeyResponse { .. } => 8,
            ApduDataExt::PropertyValueRead { .. } => 32,
            ApduDataExt::PropertyValueResponse { data, .. } | ApduDataExt::PropertyValueWrite { data, .. } => 32 + data.len() * 8,
            ApduDataExt::PropertyDescriptionRead { .. } => 24,
            ApduDataExt::PropertyDescriptionResponse { .. } => 56,
            ApduDataExt::IndividualAddressSerialNumberRead { .. } => 48,
        };
        6 + body
    }
}
