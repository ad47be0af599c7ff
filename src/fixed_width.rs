//! Fixed-width unsigned integers (JVMS 4.1 `u1`, `u2`, `u4`).
//!
//! Represents an unsigned integer using exactly `width` bytes, big-endian and
//! zero-padded. Overflow is rejected at construction time; encoding never
//! truncates.

use crate::encode::Encodable;
use crate::sink::ByteWriter;
use crate::{Error, Result};

/// An unsigned integer encoded in exactly `width` bytes, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedWidthInteger {
    width: u8,
    value: u64,
}

impl FixedWidthInteger {
    /// Largest supported width in bytes.
    pub const MAX_WIDTH: u8 = 8;

    /// Creates an integer of `width` bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidWidth`] if `width` is not in `1..=8`
    /// - [`Error::ValueOutOfRange`] if `value` does not fit in `width` bytes
    pub fn new(width: u8, value: u64) -> Result<Self> {
        if width == 0 || width > Self::MAX_WIDTH {
            return Err(Error::InvalidWidth(width));
        }
        if value > max_for_width(width) {
            return Err(Error::ValueOutOfRange { value, width });
        }
        Ok(Self { width, value })
    }

    /// Creates an integer from a length or count, checking it against `width`.
    pub fn from_usize(width: u8, value: usize) -> Result<Self> {
        let value = u64::try_from(value).map_err(|_| Error::out_of_range(value, width))?;
        Self::new(width, value)
    }

    /// `u1`
    pub fn u1(value: u8) -> Self {
        Self { width: 1, value: u64::from(value) }
    }

    /// `u2`
    pub fn u2(value: u16) -> Self {
        Self { width: 2, value: u64::from(value) }
    }

    /// `u4`
    pub fn u4(value: u32) -> Self {
        Self { width: 4, value: u64::from(value) }
    }

    /// Eight-byte integer; the raw form of `long` and `double` pool payloads.
    pub fn u8(value: u64) -> Self {
        Self { width: 8, value }
    }

    /// Field width in bytes.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// The numeric value.
    pub fn value(&self) -> u64 {
        self.value
    }
}

/// Largest value representable in `width` bytes (`width` in `1..=8`).
#[inline]
pub fn max_for_width(width: u8) -> u64 {
    debug_assert!((1..=8).contains(&width), "width must be 1..=8, got {width}");
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (u32::from(width) * 8)) - 1
    }
}

impl Encodable for FixedWidthInteger {
    #[inline]
    fn encoded_length(&self) -> usize {
        usize::from(self.width)
    }

    #[inline]
    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        let bytes = self.value.to_be_bytes();
        writer.write_bytes(&bytes[8 - usize::from(self.width)..]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: FixedWidthInteger) -> Vec<u8> {
        value.to_bytes().unwrap()
    }

    #[test]
    fn u1_single_byte() {
        assert_eq!(encode(FixedWidthInteger::u1(0x7F)), vec![0x7F]);
    }

    #[test]
    fn u2_big_endian() {
        assert_eq!(encode(FixedWidthInteger::u2(0xCAFE)), vec![0xCA, 0xFE]);
        assert_eq!(encode(FixedWidthInteger::u2(1)), vec![0x00, 0x01]);
    }

    #[test]
    fn u4_zero_padded() {
        assert_eq!(encode(FixedWidthInteger::u4(5)), vec![0, 0, 0, 5]);
        assert_eq!(
            encode(FixedWidthInteger::u4(0xCAFE_BABE)),
            vec![0xCA, 0xFE, 0xBA, 0xBE]
        );
    }

    #[test]
    fn u8_full_width() {
        assert_eq!(
            encode(FixedWidthInteger::u8(u64::MAX)),
            vec![0xFF; 8]
        );
    }

    // Ungerade Breite (3 Bytes) funktioniert ebenfalls
    #[test]
    fn three_byte_width() {
        let v = FixedWidthInteger::new(3, 0x01_02_03).unwrap();
        assert_eq!(v.encoded_length(), 3);
        assert_eq!(encode(v), vec![1, 2, 3]);
    }

    #[test]
    fn max_value_fits() {
        assert!(FixedWidthInteger::new(2, 65535).is_ok());
        assert!(FixedWidthInteger::new(4, u64::from(u32::MAX)).is_ok());
        assert!(FixedWidthInteger::new(8, u64::MAX).is_ok());
    }

    #[test]
    fn overflow_is_construction_error() {
        assert_eq!(
            FixedWidthInteger::new(2, 65536).unwrap_err(),
            Error::ValueOutOfRange { value: 65536, width: 2 }
        );
        assert_eq!(
            FixedWidthInteger::new(1, 256).unwrap_err(),
            Error::ValueOutOfRange { value: 256, width: 1 }
        );
        assert_eq!(
            FixedWidthInteger::new(4, 1 << 32).unwrap_err(),
            Error::ValueOutOfRange { value: 1 << 32, width: 4 }
        );
    }

    #[test]
    fn invalid_width_rejected() {
        assert_eq!(FixedWidthInteger::new(0, 0).unwrap_err(), Error::InvalidWidth(0));
        assert_eq!(FixedWidthInteger::new(9, 0).unwrap_err(), Error::InvalidWidth(9));
    }

    #[test]
    fn from_usize_checks_width() {
        let v = FixedWidthInteger::from_usize(4, 5).unwrap();
        assert_eq!(v.value(), 5);
        assert_eq!(
            FixedWidthInteger::from_usize(2, 70_000).unwrap_err(),
            Error::ValueOutOfRange { value: 70_000, width: 2 }
        );
    }

    #[test]
    fn max_for_width_values() {
        assert_eq!(max_for_width(1), 0xFF);
        assert_eq!(max_for_width(2), 0xFFFF);
        assert_eq!(max_for_width(4), 0xFFFF_FFFF);
        assert_eq!(max_for_width(8), u64::MAX);
    }

    #[test]
    fn length_matches_written_bytes() {
        for width in 1..=8u8 {
            let v = FixedWidthInteger::new(width, max_for_width(width)).unwrap();
            assert_eq!(encode(v).len(), v.encoded_length(), "width {width}");
        }
    }
}
