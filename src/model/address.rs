//! Individual and group addresses.

use crate::bits::{BitReader, BitWriter};
use crate::codec::{CodecError, Message};
use crate::diag::Diagnostics;
use crate::field::FieldResultExt;
use crate::parser::{self, AddressParseError};
use std::fmt;
use std::str::FromStr;

/// Individual (physical) address `area.line.device`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KnxAddress {
    /// 4 bits.
    pub main_group: u8,
    /// 4 bits.
    pub middle_group: u8,
    pub sub_group: u8,
}

impl KnxAddress {
    pub fn new(main_group: u8, middle_group: u8, sub_group: u8) -> Self {
        KnxAddress {
            main_group,
            middle_group,
            sub_group,
        }
    }

    pub fn from_raw(raw: u16) -> Self {
        KnxAddress {
            main_group: (raw >> 12) as u8,
            middle_group: ((raw >> 8) & 0x0F) as u8,
            sub_group: raw as u8,
        }
    }

    pub fn to_raw(&self) -> u16 {
        ((self.main_group as u16 & 0x0F) << 12) | ((self.middle_group as u16 & 0x0F) << 8) | self.sub_group as u16
    }
}

impl Message for KnxAddress {
    type Args = ();

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, _args: ()) -> Result<Self, CodecError> {
        let main_group = r.read_u8(4).parsing("mainGroup")?;
        let middle_group = r.read_u8(4).parsing("middleGroup")?;
        let sub_group = r.read_u8(8).parsing("subGroup")?;
        Ok(KnxAddress {
            main_group,
            middle_group,
            sub_group,
        })
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        w.write_uint(4, self.main_group as u64).serializing("mainGroup")?;
        w.write_uint(4, self.middle_group as u64).serializing("middleGroup")?;
        w.write_uint(8, self.sub_group as u64).serializing("subGroup")
    }

    fn length_in_bits(&self) -> usize {
        16
    }
}

impl fmt::Display for KnxAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.main_group, self.middle_group, self.sub_group)
    }
}

impl FromStr for KnxAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_individual_address(s)
    }
}

/// Group address in one of the three level notations.
///
/// The level count is not on the wire: the same two bytes read as
/// `1/2/3`, `1/515` or `2563` depending on what the caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnxGroupAddress {
    /// 16-bit sub group.
    FreeLevel { sub_group: u16 },
    /// 5-bit main, 11-bit sub.
    TwoLevel { main_group: u8, sub_group: u16 },
    /// 5-bit main, 3-bit middle, 8-bit sub.
    ThreeLevel {
        main_group: u8,
        middle_group: u8,
        sub_group: u8,
    },
}

impl KnxGroupAddress {
    pub fn num_levels(&self) -> u8 {
        match self {
            KnxGroupAddress::FreeLevel { .. } => 1,
            KnxGroupAddress::TwoLevel { .. } => 2,
            KnxGroupAddress::ThreeLevel { .. } => 3,
        }
    }

    /// Interprets two destination bytes with `num_levels` levels.
    pub fn from_bytes(bytes: [u8; 2], num_levels: u8) -> Result<Self, CodecError> {
        let mut r = BitReader::new(&bytes);
        let mut diag = Diagnostics::new();
        KnxGroupAddress::parse(&mut r, &mut diag, num_levels)
    }

    pub fn to_bytes(&self) -> Result<[u8; 2], CodecError> {
        let mut w = BitWriter::with_capacity(2);
        self.serialize(&mut w)?;
        let out = w.into_bytes();
        Ok([out[0], out[1]])
    }
}

impl Message for KnxGroupAddress {
    /// Number of address levels.
    type Args = u8;

    fn parse(r: &mut BitReader<'_>, _diag: &mut Diagnostics, num_levels: u8) -> Result<Self, CodecError> {
        match num_levels {
            1 => {
                let sub_group = r.read_u16(16).parsing("subGroup")?;
                Ok(KnxGroupAddress::FreeLevel { sub_group })
            }
            2 => {
                let main_group = r.read_u8(5).parsing("mainGroup")?;
                let sub_group = r.read_u16(11).parsing("subGroup")?;
                Ok(KnxGroupAddress::TwoLevel { main_group, sub_group })
            }
            3 => {
                let main_group = r.read_u8(5).parsing("mainGroup")?;
                let middle_group = r.read_u8(3).parsing("middleGroup")?;
                let sub_group = r.read_u8(8).parsing("subGroup")?;
                Ok(KnxGroupAddress::ThreeLevel {
                    main_group,
                    middle_group,
                    sub_group,
                })
            }
            other => Err(CodecError::unknown_variant("KnxGroupAddress", other)),
        }
    }

    fn serialize(&self, w: &mut BitWriter) -> Result<(), CodecError> {
        match *self {
            KnxGroupAddress::FreeLevel { sub_group } => w.write_uint(16, sub_group as u64).serializing("subGroup"),
            KnxGroupAddress::TwoLevel { main_group, sub_group } => {
                w.write_uint(5, main_group as u64).serializing("mainGroup")?;
                w.write_uint(11, sub_group as u64).serializing("subGroup")
            }
            KnxGroupAddress::ThreeLevel {
                main_group,
                middle_group,
                sub_group,
            } => {
                w.write_uint(5, main_group as u64).serializing("mainGroup")?;
                w.write_uint(3, middle_group as u64).serializing("middleGroup")?;
                w.write_uint(8, sub_group as u64).serializing("subGroup")
            }
        }
    }

    fn length_in_bits(&self) -> usize {
        16
    }
}

impl fmt::Display for KnxGroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnxGroupAddress::FreeLevel { sub_group } => write!(f, "{}", sub_group),
            KnxGroupAddress::TwoLevel { main_group, sub_group } => write!(f, "{}/{}", main_group, sub_group),
            KnxGroupAddress::ThreeLevel {
                main_group,
                middle_group,
                sub_group,
            } => write!(f, "{}/{}/{}", main_group, middle_group, sub_group),
        }
    }
}

impl FromStr for KnxGroupAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_group_address(s)
    }
}
