//! Bit-addressable cursors over byte buffers.
//!
//! Both cursors are most-significant-bit first within a byte and big-endian
//! across bytes, for every width. Byte-aligned 8/16/32/64-bit accesses take a
//! `byteorder` fast path; everything else is assembled chunk by chunk.

use crate::codec::CodecError;
use byteorder::{BigEndian, ByteOrder};

fn check_width(width: u8) -> Result<(), CodecError> {
    if width == 0 || width > 64 {
        return Err(CodecError::InvalidWidth(width));
    }
    Ok(())
}

/// Read cursor. Position is an absolute bit offset into `data`.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BitReader { data, pos: 0 }
    }

    /// Current bit position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Index of the byte holding the next bit.
    pub fn byte_position(&self) -> usize {
        self.pos / 8
    }

    pub fn total_bits(&self) -> usize {
        self.data.len() * 8
    }

    pub fn remaining_bits(&self) -> usize {
        self.total_bits() - self.pos
    }

    pub fn is_aligned(&self) -> bool {
        self.pos % 8 == 0
    }

    pub fn has_more(&self) -> bool {
        self.pos < self.total_bits()
    }

    fn ensure(&self, bits: usize) -> Result<(), CodecError> {
        if bits > self.remaining_bits() {
            return Err(CodecError::OutOfData {
                position: self.pos,
                needed_bits: bits,
                available_bits: self.remaining_bits(),
            });
        }
        Ok(())
    }

    pub fn read_bit(&mut self) -> Result<bool, CodecError> {
        self.ensure(1)?;
        let byte = self.data[self.pos / 8];
        let bit = (byte >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        Ok(bit == 1)
    }

    /// Reads `width` bits (1..=64) as an unsigned value.
    pub fn read_uint(&mut self, width: u8) -> Result<u64, CodecError> {
        check_width(width)?;
        self.ensure(width as usize)?;
        if self.is_aligned() {
            let start = self.pos / 8;
            let fast = match width {
                8 => Some(self.data[start] as u64),
                16 => Some(BigEndian::read_u16(&self.data[start..start + 2]) as u64),
                32 => Some(BigEndian::read_u32(&self.data[start..start + 4]) as u64),
                64 => Some(BigEndian::read_u64(&self.data[start..start + 8])),
                _ => None,
            };
            if let Some(v) = fast {
                self.pos += width as usize;
                return Ok(v);
            }
        }
        let mut remaining = width as usize;
        let mut out = 0u64;
        while remaining > 0 {
            let byte = self.data[self.pos / 8];
            let available = 8 - self.pos % 8;
            let take = available.min(remaining);
            let chunk = (byte >> (available - take)) & (((1u16 << take) - 1) as u8);
            out = (out << take) | chunk as u64;
            self.pos += take;
            remaining -= take;
        }
        Ok(out)
    }

    /// Reads `width` bits as two's complement, sign-extended from the top bit read.
    pub fn read_int(&mut self, width: u8) -> Result<i64, CodecError> {
        let raw = self.read_uint(width)?;
        if width == 64 {
            return Ok(raw as i64);
        }
        let shift = 64 - width as u32;
        Ok(((raw << shift) as i64) >> shift)
    }

    pub fn read_u8(&mut self, width: u8) -> Result<u8, CodecError> {
        debug_assert!(width <= 8);
        Ok(self.read_uint(width)? as u8)
    }

    pub fn read_u16(&mut self, width: u8) -> Result<u16, CodecError> {
        debug_assert!(width <= 16);
        Ok(self.read_uint(width)? as u16)
    }

    pub fn read_u32(&mut self, width: u8) -> Result<u32, CodecError> {
        debug_assert!(width <= 32);
        Ok(self.read_uint(width)? as u32)
    }

    pub fn read_i8(&mut self, width: u8) -> Result<i8, CodecError> {
        debug_assert!(width <= 8);
        Ok(self.read_int(width)? as i8)
    }

    pub fn read_i16(&mut self, width: u8) -> Result<i16, CodecError> {
        debug_assert!(width <= 16);
        Ok(self.read_int(width)? as i16)
    }

    pub fn read_i32(&mut self, width: u8) -> Result<i32, CodecError> {
        debug_assert!(width <= 32);
        Ok(self.read_int(width)? as i32)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, CodecError> {
        self.ensure(n * 8)?;
        if self.is_aligned() {
            let start = self.pos / 8;
            self.pos += n * 8;
            return Ok(self.data[start..start + n].to_vec());
        }
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_uint(8)? as u8);
        }
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        self.ensure(N * 8)?;
        let mut out = [0u8; N];
        for b in out.iter_mut() {
            *b = self.read_uint(8)? as u8;
        }
        Ok(out)
    }
}

/// Write cursor backed by a growable buffer.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    pos: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        BitWriter {
            buf: Vec::with_capacity(bytes),
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes touched so far, including a partially written last byte.
    pub fn current_byte_position(&self) -> usize {
        self.buf.len()
    }

    pub fn is_aligned(&self) -> bool {
        self.pos % 8 == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<(), CodecError> {
        self.put_bits(1, bit as u64);
        Ok(())
    }

    /// Writes the low `width` bits of `value`; values that do not fit are rejected.
    pub fn write_uint(&mut self, width: u8, value: u64) -> Result<(), CodecError> {
        check_width(width)?;
        if width < 64 && value >> width != 0 {
            return Err(CodecError::Validation(format!(
                "value {} does not fit in {} bits",
                value, width
            )));
        }
        if self.is_aligned() && matches!(width, 8 | 16 | 32 | 64) {
            let mut tmp = [0u8; 8];
            BigEndian::write_u64(&mut tmp, value);
            self.push_aligned(&tmp[8 - width as usize / 8..]);
            return Ok(());
        }
        self.put_bits(width, value);
        Ok(())
    }

    /// Writes `value` as `width`-bit two's complement.
    pub fn write_int(&mut self, width: u8, value: i64) -> Result<(), CodecError> {
        check_width(width)?;
        if width < 64 {
            let min = -(1i64 << (width - 1));
            let max = (1i64 << (width - 1)) - 1;
            if value < min || value > max {
                return Err(CodecError::Validation(format!(
                    "value {} does not fit in {} signed bits",
                    value, width
                )));
            }
            let mask = (1u64 << width) - 1;
            self.put_bits(width, value as u64 & mask);
        } else {
            self.put_bits(64, value as u64);
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        if self.is_aligned() {
            self.push_aligned(bytes);
        } else {
            for b in bytes {
                self.put_bits(8, *b as u64);
            }
        }
        Ok(())
    }

    /// Appends everything written to `other`, bit for bit.
    pub fn append(&mut self, other: BitWriter) -> Result<(), CodecError> {
        let full = other.pos / 8;
        self.write_bytes(&other.buf[..full])?;
        let tail = (other.pos % 8) as u8;
        if tail > 0 {
            self.put_bits(tail, (other.buf[full] >> (8 - tail)) as u64);
        }
        Ok(())
    }

    fn push_aligned(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.pos += bytes.len() * 8;
    }

    fn put_bits(&mut self, width: u8, value: u64) {
        let mut remaining = width as usize;
        while remaining > 0 {
            let offset = self.pos % 8;
            if offset == 0 {
                self.buf.push(0);
            }
            let available = 8 - offset;
            let take = available.min(remaining);
            let chunk = ((value >> (remaining - take)) & ((1u64 << take) - 1)) as u8;
            if let Some(last) = self.buf.last_mut() {
                *last |= chunk << (available - take);
            }
            self.pos += take;
            remaining -= take;
        }
    }
}
