//! Little-endian field access over byte buffers.
//!
//! Every multi-byte integer in a save image is little-endian, and the packed
//! fields inside records are addressed low bit first.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::SaveError;

/// Borrow `len` bytes starting at `start`, failing if the range leaves `buffer`.
pub fn read_bytes(buffer: &[u8], start: usize, len: usize) -> Result<&[u8], SaveError> {
    start
        .checked_add(len)
        .and_then(|end| buffer.get(start..end))
        .ok_or(SaveError::OutOfRange {
            start,
            len,
            size: buffer.len(),
        })
}

/// Read an unsigned little-endian integer of 1 to 8 bytes.
pub fn read_uint_le(buffer: &[u8], start: usize, len: usize) -> Result<u64, SaveError> {
    if !(1..=8).contains(&len) {
        return Err(SaveError::OutOfRange {
            start,
            len,
            size: buffer.len(),
        });
    }
    let bytes = read_bytes(buffer, start, len)?;
    Ok(LittleEndian::read_uint(bytes, len))
}

pub fn read_u8(buffer: &[u8], start: usize) -> Result<u8, SaveError> {
    Ok(read_bytes(buffer, start, 1)?[0])
}

pub fn read_u16(buffer: &[u8], start: usize) -> Result<u16, SaveError> {
    Ok(LittleEndian::read_u16(read_bytes(buffer, start, 2)?))
}

pub fn read_u32(buffer: &[u8], start: usize) -> Result<u32, SaveError> {
    Ok(LittleEndian::read_u32(read_bytes(buffer, start, 4)?))
}

/// Extract `bit_width` bits starting `bit_offset` bits above the least
/// significant bit of `packed`.
pub fn read_bits(packed: u64, bit_offset: u32, bit_width: u32) -> u64 {
    let shifted = packed.checked_shr(bit_offset).unwrap_or(0);
    match bit_width {
        0 => 0,
        64.. => shifted,
        width => shifted & ((1u64 << width) - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_integers() {
        let data = [0x78, 0x56, 0x34, 0x12, 0xff];
        assert_eq!(read_uint_le(&data, 0, 4).unwrap(), 0x1234_5678);
        assert_eq!(read_uint_le(&data, 3, 2).unwrap(), 0xff12);
        assert_eq!(read_uint_le(&data, 0, 5).unwrap(), 0xff_1234_5678);
        assert_eq!(read_u16(&data, 1).unwrap(), 0x3456);
        assert_eq!(read_u8(&data, 4).unwrap(), 0xff);
    }

    #[test]
    fn out_of_range_reads_fail() {
        let data = [0u8; 4];
        assert_eq!(
            read_u32(&data, 1),
            Err(SaveError::OutOfRange {
                start: 1,
                len: 4,
                size: 4
            })
        );
        assert!(read_bytes(&data, usize::MAX, 2).is_err());
        assert!(read_uint_le(&data, 0, 0).is_err());
        assert!(read_uint_le(&[0u8; 16], 0, 9).is_err());
        assert_eq!(read_bytes(&data, 4, 0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn bit_fields_are_low_bit_first() {
        let packed = 0b1011_0110u64;
        assert_eq!(read_bits(packed, 0, 1), 0);
        assert_eq!(read_bits(packed, 1, 2), 0b11);
        assert_eq!(read_bits(packed, 4, 4), 0b1011);
        assert_eq!(read_bits(u32::MAX.into(), 30, 1), 1);
        assert_eq!(read_bits(u64::MAX, 0, 64), u64::MAX);
        assert_eq!(read_bits(1, 64, 1), 0);
    }
}
