//! The `Encodable` capability.
//!
//! Anything that knows its own serialized length and can write itself into a
//! [`ByteWriter`]. Composite structures are flat concatenations of their
//! fields in declared order (JVMS 4.1), so the trait composes: a tuple, slice
//! or `Vec` of encodables is itself encodable with
//! `encoded_length() = Σ field.encoded_length()`.
//!
//! # Invariant
//!
//! `write_to` must write exactly `encoded_length()` bytes. The format has no
//! resynchronization points; a single miscounted structure corrupts everything
//! written after it.

use crate::Result;
use crate::sink::ByteWriter;

/// A value that can describe its encoded length and serialize itself.
pub trait Encodable {
    /// Number of bytes [`write_to`](Self::write_to) emits. Must be pure.
    fn encoded_length(&self) -> usize;

    /// Writes the big-endian encoding of `self` into `writer`.
    fn write_to(&self, writer: &mut ByteWriter) -> Result<()>;

    /// Encodes `self` into a fresh buffer.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::with_capacity(self.encoded_length());
        self.write_to(&mut writer)?;
        Ok(writer.into_vec())
    }
}

/// Writes `value` and checks the length invariant.
///
/// # Errors
///
/// [`Error::LengthMismatch`](crate::Error::LengthMismatch) when the number of
/// bytes written differs from `encoded_length()`.
pub fn write_checked<E: Encodable + ?Sized>(value: &E, writer: &mut ByteWriter) -> Result<()> {
    let declared = value.encoded_length();
    let start = writer.position();
    value.write_to(writer)?;
    let written = writer.position() - start;
    if written != declared {
        return Err(crate::Error::LengthMismatch { declared, written });
    }
    Ok(())
}

impl Encodable for u8 {
    #[inline]
    fn encoded_length(&self) -> usize {
        1
    }

    #[inline]
    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u8(*self);
        Ok(())
    }
}

impl<T: Encodable> Encodable for [T] {
    fn encoded_length(&self) -> usize {
        self.iter().map(Encodable::encoded_length).sum()
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        for item in self {
            item.write_to(writer)?;
        }
        Ok(())
    }
}

impl<T: Encodable, const N: usize> Encodable for [T; N] {
    fn encoded_length(&self) -> usize {
        self.as_slice().encoded_length()
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        self.as_slice().write_to(writer)
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encoded_length(&self) -> usize {
        self.as_slice().encoded_length()
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        self.as_slice().write_to(writer)
    }
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn encoded_length(&self) -> usize {
        (**self).encoded_length()
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        (**self).write_to(writer)
    }
}

impl<T: Encodable + ?Sized> Encodable for Box<T> {
    fn encoded_length(&self) -> usize {
        (**self).encoded_length()
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        (**self).write_to(writer)
    }
}

macro_rules! impl_encodable_tuple {
    ($($name:ident),+) => {
        impl<$($name: Encodable),+> Encodable for ($($name,)+) {
            #[allow(non_snake_case)]
            fn encoded_length(&self) -> usize {
                let ($($name,)+) = self;
                0 $(+ $name.encoded_length())+
            }

            #[allow(non_snake_case)]
            fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
                let ($($name,)+) = self;
                $($name.write_to(writer)?;)+
                Ok(())
            }
        }
    };
}

impl_encodable_tuple!(A);
impl_encodable_tuple!(A, B);
impl_encodable_tuple!(A, B, C);
impl_encodable_tuple!(A, B, C, D);
impl_encodable_tuple!(A, B, C, D, E);
