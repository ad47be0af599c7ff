//! Index-like unsigned integers whose width follows the field they occupy.
//!
//! Constant pool indices are two bytes wide almost everywhere (JVMS 4.4), but
//! a few fields use a single byte (`ldc`-style narrow indices). Lengths and
//! counts use [`FixedWidthInteger`](crate::fixed_width::FixedWidthInteger)
//! instead; the two are kept apart so an index can never silently be written
//! with a length's width.

use crate::encode::Encodable;
use crate::sink::ByteWriter;
use crate::{Error, Result};

/// Width convention of an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexWidth {
    /// One byte (narrow index fields).
    Narrow,
    /// Two bytes (the common `u2` index).
    #[default]
    Wide,
}

impl IndexWidth {
    /// Width in bytes.
    pub const fn bytes(self) -> u8 {
        match self {
            Self::Narrow => 1,
            Self::Wide => 2,
        }
    }

    /// Largest index representable with this width.
    pub const fn max_value(self) -> u16 {
        match self {
            Self::Narrow => u8::MAX as u16,
            Self::Wide => u16::MAX,
        }
    }
}

/// An unsigned index encoded in the width its field requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarUnsigned {
    value: u16,
    width: IndexWidth,
}

impl VarUnsigned {
    /// Creates a two-byte index.
    ///
    /// # Errors
    ///
    /// [`Error::ValueOutOfRange`] if `value > 65535`.
    pub fn new(value: u32) -> Result<Self> {
        Self::with_width(value, IndexWidth::Wide)
    }

    /// Creates a one-byte index.
    ///
    /// # Errors
    ///
    /// [`Error::ValueOutOfRange`] if `value > 255`.
    pub fn narrow(value: u32) -> Result<Self> {
        Self::with_width(value, IndexWidth::Narrow)
    }

    /// Creates an index for a field of the given width.
    pub fn with_width(value: u32, width: IndexWidth) -> Result<Self> {
        if value > u32::from(width.max_value()) {
            return Err(Error::ValueOutOfRange {
                value: u64::from(value),
                width: width.bytes(),
            });
        }
        Ok(Self { value: value as u16, width })
    }

    /// The numeric value.
    pub fn value(&self) -> u16 {
        self.value
    }

    /// The field width convention.
    pub fn width(&self) -> IndexWidth {
        self.width
    }
}

impl From<u16> for VarUnsigned {
    fn from(value: u16) -> Self {
        Self { value, width: IndexWidth::Wide }
    }
}

impl Encodable for VarUnsigned {
    #[inline]
    fn encoded_length(&self) -> usize {
        usize::from(self.width.bytes())
    }

    #[inline]
    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        match self.width {
            // Fast-Path: Konstruktor garantiert value <= 255
            IndexWidth::Narrow => writer.write_u8(self.value as u8),
            IndexWidth::Wide => writer.write_bytes(&self.value.to_be_bytes()),
        }
        Ok(())
    }
}
