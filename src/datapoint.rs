//! Datapoint values carried by group value reads and writes.
//!
//! Values of six bits or less travel in the APDU's `dataFirstByte`; larger
//! values leave it zero and occupy the trailing data bytes. Layout names in
//! the comments use the usual KNX format letters (`B` bit, `U` unsigned,
//! `V` signed, `N` enumerated, `r` reserved, `A` character, `F` float).

use crate::bits::{BitReader, BitWriter};
use crate::codec::CodecError;
use crate::diag::Diagnostics;
use crate::field::{read_reserved, write_reserved, FieldResultExt};
use crate::model::apdu::GroupValue;
use crate::model::datapoint_type::KnxDatapointMainType;
use crate::value::Value;
use tracing::debug;

const STRING_LEN: usize = 14;

/// Whether values of `main_type` fit in the 6 bits of `dataFirstByte`.
fn is_short(main_type: KnxDatapointMainType) -> bool {
    (1..=6).contains(&main_type.size_in_bits())
}

/// Decode the payload of a group value telegram as `main_type`.
///
/// Types without a dedicated layout come back as [`Value::Bytes`] holding
/// the full payload, first byte included.
pub fn decode_datapoint(main_type: KnxDatapointMainType, value: &GroupValue, diag: &mut Diagnostics) -> Result<Value, CodecError> {
    use KnxDatapointMainType as T;

    if is_short(main_type) {
        let first = [(value.data_first_byte as u8) & 0x3F];
        let mut r = BitReader::new(&first);
        read_reserved(&mut r, diag, "reserved", 8 - main_type.size_in_bits(), 0)?;
        return match main_type {
            // B1
            T::Dpt1Bit => Ok(Value::Bool(r.read_bit().parsing("value")?)),
            // B2
            T::Dpt1BitControlled => Ok(Value::record([
                ("control", Value::Bool(r.read_bit().parsing("control")?)),
                ("value", Value::Bool(r.read_bit().parsing("value")?)),
            ])),
            // B1U3
            T::Dpt3BitControlled => Ok(Value::record([
                ("control", Value::Bool(r.read_bit().parsing("control")?)),
                ("stepCode", Value::U8(r.read_u8(3).parsing("stepCode")?)),
            ])),
            _ => Ok(Value::Bytes(value.payload())),
        };
    }

    let known = matches!(
        main_type,
        T::DptCharacter
            | T::Dpt8BitUnsignedValue
            | T::Dpt8BitSignedValue
            | T::Dpt2ByteUnsignedValue
            | T::Dpt2ByteSignedValue
            | T::Dpt2ByteFloatValue
            | T::DptTime
            | T::DptDate
            | T::Dpt4ByteUnsignedValue
            | T::Dpt4ByteSignedValue
            | T::Dpt4ByteFloatValue
            | T::DptCharacterString
            | T::DptSceneNumber
            | T::DptSceneControl
    );
    if !known {
        debug!(main_type = main_type.text(), "no layout for datapoint type, keeping raw payload");
        return Ok(Value::Bytes(value.payload()));
    }

    if value.data_first_byte != 0 {
        diag.reserved_mismatch("dataFirstByte", 0, 0, ((value.data_first_byte as u8) & 0x3F) as u64);
    }
    let mut r = BitReader::new(&value.data);
    let decoded = match main_type {
        // A8
        T::DptCharacter => Value::String(char::from(r.read_u8(8).parsing("value")?).to_string()),
        T::Dpt8BitUnsignedValue => Value::U8(r.read_u8(8).parsing("value")?),
        T::Dpt8BitSignedValue => Value::I8(r.read_i8(8).parsing("value")?),
        T::Dpt2ByteUnsignedValue => Value::U16(r.read_u16(16).parsing("value")?),
        T::Dpt2ByteSignedValue => Value::I16(r.read_i16(16).parsing("value")?),
        T::Dpt2ByteFloatValue => Value::Float(decode_f16(r.read_u16(16).parsing("value")?)),
        // N3N5r2N6r2N6
        T::DptTime => {
            let day = r.read_u8(3).parsing("day")?;
            let hour = r.read_u8(5).parsing("hour")?;
            read_reserved(&mut r, diag, "reserved", 2, 0)?;
            let minutes = r.read_u8(6).parsing("minutes")?;
            read_reserved(&mut r, diag, "reserved", 2, 0)?;
            let seconds = r.read_u8(6).parsing("seconds")?;
            Value::record([
                ("day", Value::U8(day)),
                ("hour", Value::U8(hour)),
                ("minutes", Value::U8(minutes)),
                ("seconds", Value::U8(seconds)),
            ])
        }
        // r3N5r4N4r1U7
        T::DptDate => {
            read_reserved(&mut r, diag, "reserved", 3, 0)?;
            let day = r.read_u8(5).parsing("day")?;
            read_reserved(&mut r, diag, "reserved", 4, 0)?;
            let month = r.read_u8(4).parsing("month")?;
            read_reserved(&mut r, diag, "reserved", 1, 0)?;
            let year = r.read_u8(7).parsing("year")?;
            Value::record([("day", Value::U8(day)), ("month", Value::U8(month)), ("year", Value::U8(year))])
        }
        T::Dpt4ByteUnsignedValue => Value::U32(r.read_u32(32).parsing("value")?),
        T::Dpt4ByteSignedValue => Value::I32(r.read_i32(32).parsing("value")?),
        T::Dpt4ByteFloatValue => Value::Float(f32::from_bits(r.read_u32(32).parsing("value")?)),
        // A112
        T::DptCharacterString => {
            let bytes = r.read_array::<STRING_LEN>().parsing("value")?;
            Value::String(bytes.iter().take_while(|b| **b != 0).map(|b| char::from(*b)).collect())
        }
        // r2U6
        T::DptSceneNumber => {
            read_reserved(&mut r, diag, "reserved", 2, 0)?;
            Value::U8(r.read_u8(6).parsing("sceneNumber")?)
        }
        // B1r1U6
        T::DptSceneControl => {
            let learn = r.read_bit().parsing("learn")?;
            read_reserved(&mut r, diag, "reserved", 1, 0)?;
            let scene_number = r.read_u8(6).parsing("sceneNumber")?;
            Value::record([("learn", Value::Bool(learn)), ("sceneNumber", Value::U8(scene_number))])
        }
        _ => Value::Bytes(value.payload()),
    };
    Ok(decoded)
}

/// Encode `value` as the payload of a group value telegram of `main_type`.
pub fn encode_datapoint(main_type: KnxDatapointMainType, value: &Value) -> Result<GroupValue, CodecError> {
    use KnxDatapointMainType as T;

    if let Value::Bytes(raw) = value {
        return Ok(group_value_from_payload(raw));
    }

    let mismatch = || CodecError::Validation(format!("{:?} cannot be encoded as {}", value, main_type.text()));
    let bool_field = |name: &str| value.field(name).and_then(Value::as_bool).ok_or_else(mismatch);
    let uint_field = |name: &str| value.field(name).and_then(Value::as_u64).ok_or_else(mismatch);

    let mut w = BitWriter::new();
    if is_short(main_type) {
        write_reserved(&mut w, "reserved", 8 - main_type.size_in_bits(), 0)?;
        match main_type {
            T::Dpt1Bit => w.write_bit(value.as_bool().ok_or_else(mismatch)?).serializing("value")?,
            T::Dpt1BitControlled => {
                w.write_bit(bool_field("control")?).serializing("control")?;
                w.write_bit(bool_field("value")?).serializing("value")?;
            }
            T::Dpt3BitControlled => {
                w.write_bit(bool_field("control")?).serializing("control")?;
                w.write_uint(3, uint_field("stepCode")?).serializing("stepCode")?;
            }
            _ => return Err(mismatch()),
        }
        let packed = w.as_bytes().first().copied().unwrap_or_default();
        return Ok(GroupValue::new(sign_extend_6(packed), Vec::new()));
    }

    match main_type {
        T::DptCharacter => {
            let c = value.as_str().and_then(|s| s.chars().next()).ok_or_else(mismatch)?;
            let byte = u8::try_from(u32::from(c))
                .map_err(|_| CodecError::Validation(format!("character {:?} is outside Latin-1", c)))?;
            w.write_uint(8, byte as u64).serializing("value")?;
        }
        T::Dpt8BitUnsignedValue => w.write_uint(8, value.as_u64().ok_or_else(mismatch)?).serializing("value")?,
        T::Dpt8BitSignedValue => w.write_int(8, value.as_i64().ok_or_else(mismatch)?).serializing("value")?,
        T::Dpt2ByteUnsignedValue => w.write_uint(16, value.as_u64().ok_or_else(mismatch)?).serializing("value")?,
        T::Dpt2ByteSignedValue => w.write_int(16, value.as_i64().ok_or_else(mismatch)?).serializing("value")?,
        T::Dpt2ByteFloatValue => w
            .write_uint(16, encode_f16(value.as_f32().ok_or_else(mismatch)?)? as u64)
            .serializing("value")?,
        T::DptTime => {
            w.write_uint(3, uint_field("day")?).serializing("day")?;
            w.write_uint(5, uint_field("hour")?).serializing("hour")?;
            write_reserved(&mut w, "reserved", 2, 0)?;
            w.write_uint(6, uint_field("minutes")?).serializing("minutes")?;
            write_reserved(&mut w, "reserved", 2, 0)?;
            w.write_uint(6, uint_field("seconds")?).serializing("seconds")?;
        }
        T::DptDate => {
            write_reserved(&mut w, "reserved", 3, 0)?;
            w.write_uint(5, uint_field("day")?).serializing("day")?;
            write_reserved(&mut w, "reserved", 4, 0)?;
            w.write_uint(4, uint_field("month")?).serializing("month")?;
            write_reserved(&mut w, "reserved", 1, 0)?;
            w.write_uint(7, uint_field("year")?).serializing("year")?;
        }
        T::Dpt4ByteUnsignedValue => w.write_uint(32, value.as_u64().ok_or_else(mismatch)?).serializing("value")?,
        T::Dpt4ByteSignedValue => w.write_int(32, value.as_i64().ok_or_else(mismatch)?).serializing("value")?,
        T::Dpt4ByteFloatValue => w
            .write_uint(32, value.as_f32().ok_or_else(mismatch)?.to_bits() as u64)
            .serializing("value")?,
        T::DptCharacterString => {
            let text = value.as_str().ok_or_else(mismatch)?;
            let mut bytes = [0u8; STRING_LEN];
            if text.chars().count() > STRING_LEN {
                return Err(CodecError::Validation(format!("string longer than {} characters", STRING_LEN)).in_serialize_field("value"));
            }
            for (slot, c) in bytes.iter_mut().zip(text.chars()) {
                *slot = u8::try_from(u32::from(c))
                    .map_err(|_| CodecError::Validation(format!("character {:?} is outside Latin-1", c)))?;
            }
            w.write_bytes(&bytes).serializing("value")?;
        }
        T::DptSceneNumber => {
            write_reserved(&mut w, "reserved", 2, 0)?;
            w.write_uint(6, value.as_u64().ok_or_else(mismatch)?).serializing("sceneNumber")?;
        }
        T::DptSceneControl => {
            w.write_bit(bool_field("learn")?).serializing("learn")?;
            write_reserved(&mut w, "reserved", 1, 0)?;
            w.write_uint(6, uint_field("sceneNumber")?).serializing("sceneNumber")?;
        }
        _ => return Err(mismatch()),
    }
    Ok(GroupValue::new(0, w.into_bytes()))
}

/// Splits a raw payload back into `dataFirstByte` and data.
fn group_value_from_payload(raw: &[u8]) -> GroupValue {
    match raw.split_first() {
        Some((first, rest)) => GroupValue::new(sign_extend_6(*first), rest.to_vec()),
        None => GroupValue::default(),
    }
}

/// Interprets the low 6 bits of `byte` as a two's-complement value.
fn sign_extend_6(byte: u8) -> i8 {
    ((byte << 2) as i8) >> 2
}

/// KNX 2-byte float: `0.01 * M * 2^E`, with M a 12-bit two's-complement
/// mantissa split into a sign bit and 11 low bits around the 4-bit exponent.
pub fn decode_f16(raw: u16) -> f32 {
    let exponent = (raw >> 11) & 0x0F;
    let mut mantissa = (raw & 0x07FF) as i32;
    if raw & 0x8000 != 0 {
        mantissa -= 0x0800;
    }
    0.01 * mantissa as f32 * (1u32 << exponent) as f32
}

pub fn encode_f16(value: f32) -> Result<u16, CodecError> {
    if !value.is_finite() {
        return Err(CodecError::Validation(format!("{} is not a finite 2-byte float", value)));
    }
    let mut mantissa = (value * 100.0).round() as i64;
    let mut exponent = 0u16;
    while !(-2048..=2047).contains(&mantissa) {
        mantissa = (mantissa as f64 / 2.0).round() as i64;
        exponent += 1;
        if exponent > 15 {
            return Err(CodecError::Validation(format!("{} is out of range for a 2-byte float", value)));
        }
    }
    let sign = if mantissa < 0 { 0x8000 } else { 0 };
    Ok(sign | (exponent << 11) | (mantissa as u16 & 0x07FF))
}
