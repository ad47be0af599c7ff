//! Attribute blocks (JVMS 4.7).
//!
//! ```text
//! attribute_info {
//!     u2 attribute_name_index;
//!     u4 attribute_length;
//!     u1 info[attribute_length];
//! }
//! ```
//!
//! The payload is opaque to this module. `attribute_length` is never stored:
//! it is recomputed from the payload on every write, so the length field and
//! the bytes that follow it cannot diverge.

use log::trace;

use crate::encode::Encodable;
use crate::fixed_width::FixedWidthInteger;
use crate::pool::{ConstantPool, PoolReference};
use crate::sink::ByteWriter;
use crate::{Error, Result};

/// Size of `attribute_name_index` plus `attribute_length`.
pub const HEADER_LEN: usize = 2 + 4;

/// A generic `(name, length, payload)` record.
#[derive(Debug, Clone)]
pub struct AttributeBlock {
    name: PoolReference,
    payload: Box<[u8]>,
}

impl AttributeBlock {
    /// Creates a block from a name reference and pre-encoded payload bytes.
    ///
    /// # Errors
    ///
    /// [`Error::ValueOutOfRange`] if the payload does not fit the `u4` length field.
    pub fn new(name: PoolReference, payload: impl Into<Box<[u8]>>) -> Result<Self> {
        let payload = payload.into();
        // Payload ist ab hier unveränderlich: Längenprüfung schon bei Konstruktion
        length_field(payload.len())?;
        Ok(Self { name, payload })
    }

    /// Creates a block whose payload is the encoding of `body`.
    pub fn from_encodable<E: Encodable + ?Sized>(name: PoolReference, body: &E) -> Result<Self> {
        Self::new(name, body.to_bytes()?)
    }

    /// Interns `name` as `CONSTANT_Utf8` in `pool` and creates the block.
    pub fn named(pool: &mut ConstantPool, name: &str, payload: impl Into<Box<[u8]>>) -> Result<Self> {
        let name = pool.utf8(name)?;
        Self::new(name, payload)
    }

    /// The name reference.
    pub fn name(&self) -> &PoolReference {
        &self.name
    }

    /// The payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// `attribute_length`, computed from the payload.
    pub fn attribute_length(&self) -> Result<FixedWidthInteger> {
        length_field(self.payload.len())
    }
}

fn length_field(len: usize) -> Result<FixedWidthInteger> {
    FixedWidthInteger::from_usize(4, len)
}

impl Encodable for AttributeBlock {
    #[inline]
    fn encoded_length(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        // Auflösung erst hier: der Pool darf bis zum Schreiben wachsen
        let name_index = self.name.to_var_unsigned()?;
        let length = self.attribute_length()?;
        trace!(
            "attribute: name #{} length {}",
            name_index.value(),
            length.value()
        );
        name_index.write_to(writer)?;
        length.write_to(writer)?;
        writer.write_bytes(&self.payload);
        Ok(())
    }
}

/// A concrete attribute kind: an encodable body with a well-known name.
///
/// Implementors only describe their body; [`to_block`](Self::to_block)
/// interns the name and wraps the encoded body in an [`AttributeBlock`].
/// A body that embeds pool indices lists them in
/// [`references`](Self::references).
pub trait Attribute: Encodable {
    /// The attribute name as it appears in the constant pool.
    fn attribute_name(&self) -> &str;

    /// Pool references written by the body.
    fn references(&self) -> Vec<&PoolReference> {
        Vec::new()
    }

    /// Encodes `self` into a block named by a `CONSTANT_Utf8` in `pool`.
    ///
    /// # Errors
    ///
    /// [`Error::DanglingReference`] if a reference of the body does not belong
    /// to `pool`. The pool is left untouched in that case.
    fn to_block(&self, pool: &mut ConstantPool) -> Result<AttributeBlock> {
        for reference in self.references() {
            ensure_owned(pool, reference)?;
        }
        let name = pool.utf8(self.attribute_name())?;
        AttributeBlock::from_encodable(name, self)
    }
}

/// Checks that `reference` belongs to `pool`.
pub(crate) fn ensure_owned(pool: &ConstantPool, reference: &PoolReference) -> Result<()> {
    if pool.owns(reference) {
        Ok(())
    } else {
        Err(Error::DanglingReference)
    }
}
