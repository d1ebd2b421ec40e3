//! Field-level building blocks used by every catalog entry.
//!
//! Simple fields are plain cursor calls tagged with their name through
//! [`FieldResultExt`]. The helpers below cover the field kinds that carry
//! extra rules: reserved (lenient), const (strict), implicit length prefixes
//! and the array shapes (trailing bytes cover rest-of-container).

use crate::bits::{BitReader, BitWriter};
use crate::codec::CodecError;
use crate::diag::Diagnostics;

/// Attaches a field name to a failing cursor call.
pub trait FieldResultExt<T> {
    fn parsing(self, field: &'static str) -> Result<T, CodecError>;
    fn serializing(self, field: &'static str) -> Result<T, CodecError>;
}

impl<T> FieldResultExt<T> for Result<T, CodecError> {
    fn parsing(self, field: &'static str) -> Result<T, CodecError> {
        self.map_err(|e| e.in_parse_field(field))
    }

    fn serializing(self, field: &'static str) -> Result<T, CodecError> {
        self.map_err(|e| e.in_serialize_field(field))
    }
}

/// Reads a reserved field. A value other than `expected` is recorded, not rejected.
pub fn read_reserved(
    r: &mut BitReader<'_>,
    diag: &mut Diagnostics,
    field: &'static str,
    width: u8,
    expected: u64,
) -> Result<(), CodecError> {
    let position = r.position();
    let actual = r.read_uint(width).parsing(field)?;
    if actual != expected {
        diag.reserved_mismatch(field, position, expected, actual);
    }
    Ok(())
}

/// Writes a reserved field. The constant is always emitted.
pub fn write_reserved(w: &mut BitWriter, field: &'static str, width: u8, value: u64) -> Result<(), CodecError> {
    w.write_uint(width, value).serializing(field)
}

/// Reads a const field. Unlike reserved fields a mismatch is a hard error.
pub fn read_const(r: &mut BitReader<'_>, field: &'static str, width: u8, expected: u64) -> Result<(), CodecError> {
    let actual = r.read_uint(width).parsing(field)?;
    if actual != expected {
        return Err(CodecError::ConstMismatch { expected, actual }.in_parse_field(field));
    }
    Ok(())
}

pub fn write_const(w: &mut BitWriter, field: &'static str, width: u8, value: u64) -> Result<(), CodecError> {
    w.write_uint(width, value).serializing(field)
}

/// Reads an implicit field. The value is handed back only so later fields can size themselves.
pub fn read_implicit(r: &mut BitReader<'_>, field: &'static str, width: u8) -> Result<u64, CodecError> {
    r.read_uint(width).parsing(field)
}

/// Emits `body` into a scratch writer, then writes `field` as the body's byte
/// length plus `bias`, followed by the body itself.
///
/// `bias` accounts for lengths that include (or exclude) bytes outside the body,
/// e.g. a structure length that counts its own length byte.
pub fn write_length_prefixed<F>(
    w: &mut BitWriter,
    field: &'static str,
    width: u8,
    bias: i64,
    body: F,
) -> Result<(), CodecError>
where
    F: FnOnce(&mut BitWriter) -> Result<(), CodecError>,
{
    let mut scratch = BitWriter::new();
    body(&mut scratch)?;
    let length = scratch.current_byte_position() as i64 + bias;
    if length < 0 {
        return Err(CodecError::LengthMismatch(format!("derived length {} is negative", length)).in_serialize_field(field));
    }
    w.write_uint(width, length as u64).serializing(field)?;
    w.append(scratch)
}

/// Subtracts `minus` from a wire length, failing instead of wrapping.
pub fn remaining_length(field: &'static str, length: u64, minus: u64) -> Result<usize, CodecError> {
    length
        .checked_sub(minus)
        .map(|n| n as usize)
        .ok_or_else(|| {
            CodecError::LengthMismatch(format!("length {} is shorter than the {} bytes it must cover", length, minus))
                .in_parse_field(field)
        })
}

/// Fixed-count array: exactly `count` elements.
pub fn read_count_array<T, F>(r: &mut BitReader<'_>, field: &'static str, count: usize, mut element: F) -> Result<Vec<T>, CodecError>
where
    F: FnMut(&mut BitReader<'_>) -> Result<T, CodecError>,
{
    let mut items = Vec::with_capacity(count.min(r.remaining_bits() / 8 + 1));
    for _ in 0..count {
        items.push(element(r).parsing(field)?);
    }
    Ok(items)
}

/// Length-governed array: elements are read until exactly `byte_len` bytes are consumed.
pub fn read_length_array<T, F>(r: &mut BitReader<'_>, field: &'static str, byte_len: usize, element: F) -> Result<Vec<T>, CodecError>
where
    F: FnMut(&mut BitReader<'_>) -> Result<T, CodecError>,
{
    let end = r.position() + byte_len * 8;
    if end > r.total_bits() {
        return Err(CodecError::OutOfData {
            position: r.position(),
            needed_bits: byte_len * 8,
            available_bits: r.remaining_bits(),
        }
        .in_parse_field(field));
    }
    read_until(r, field, end, element)
}

fn read_until<T, F>(r: &mut BitReader<'_>, field: &'static str, end: usize, mut element: F) -> Result<Vec<T>, CodecError>
where
    F: FnMut(&mut BitReader<'_>) -> Result<T, CodecError>,
{
    let mut items = Vec::new();
    while r.position() < end {
        items.push(element(r).parsing(field)?);
    }
    if r.position() != end {
        return Err(CodecError::LengthMismatch(format!(
            "last element overran the region by {} bits",
            r.position() - end
        ))
        .in_parse_field(field));
    }
    Ok(items)
}

/// Trailing bytes up to bit `end` of the enclosing container.
pub fn read_rest_bytes(r: &mut BitReader<'_>, field: &'static str, end: usize) -> Result<Vec<u8>, CodecError> {
    if end < r.position() {
        return Err(CodecError::LengthMismatch(format!(
            "container ended {} bits before this field",
            r.position() - end
        ))
        .in_parse_field(field));
    }
    if end > r.total_bits() {
        return Err(CodecError::OutOfData {
            position: r.position(),
            needed_bits: end - r.position(),
            available_bits: r.remaining_bits(),
        }
        .in_parse_field(field));
    }
    r.read_bytes((end - r.position()) / 8).parsing(field)
}

pub fn write_array<T, F>(w: &mut BitWriter, field: &'static str, items: &[T], mut element: F) -> Result<(), CodecError>
where
    F: FnMut(&mut BitWriter, &T) -> Result<(), CodecError>,
{
    for item in items {
        element(w, item).serializing(field)?;
    }
    Ok(())
}

/// Optional field: parsed only when `present` holds.
pub fn read_optional<T, F>(r: &mut BitReader<'_>, field: &'static str, present: bool, read: F) -> Result<Option<T>, CodecError>
where
    F: FnOnce(&mut BitReader<'_>) -> Result<T, CodecError>,
{
    if !present {
        return Ok(None);
    }
    read(r).parsing(field).map(Some)
}

/// Optional field: emitted only when `present` holds, and must then carry a value.
/// A value supplied while the predicate is false is rejected so parse and
/// serialize stay symmetric.
pub fn write_optional<T, F>(
    w: &mut BitWriter,
    field: &'static str,
    present: bool,
    value: Option<&T>,
    write: F,
) -> Result<(), CodecError>
where
    F: FnOnce(&mut BitWriter, &T) -> Result<(), CodecError>,
{
    match (present, value) {
        (true, Some(v)) => write(w, v).serializing(field),
        (false, None) => Ok(()),
        (true, None) => Err(CodecError::Validation("value required by the presence condition is missing".into()).in_serialize_field(field)),
        (false, Some(_)) => Err(CodecError::Validation("value given although the presence condition is false".into()).in_serialize_field(field)),
    }
}
