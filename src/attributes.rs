//! Predefined attribute kinds (JVMS 4.7).
//!
//! Each kind only knows its body layout; the `attribute_name_index` /
//! `attribute_length` framing is added by
//! [`Attribute::to_block`](crate::attribute::Attribute::to_block).
//!
//! # Beispiel
//!
//! ```
//! use classwrite::attribute::Attribute;
//! use classwrite::attributes::SourceFile;
//! use classwrite::encode::Encodable;
//! use classwrite::pool::ConstantPool;
//!
//! let mut pool = ConstantPool::new();
//! let source = SourceFile::new(&mut pool, "Main.java")?;
//! let block = source.to_block(&mut pool)?;
//! assert_eq!(block.encoded_length(), 8);
//! # Ok::<(), classwrite::Error>(())
//! ```

use crate::attribute::Attribute;
use crate::encode::Encodable;
use crate::fixed_width::FixedWidthInteger;
use crate::pool::{ConstantPool, PoolReference};
use crate::sink::ByteWriter;
use crate::Result;

/// Writes a `u2` element count.
fn write_count(len: usize, writer: &mut ByteWriter) -> Result<()> {
    FixedWidthInteger::from_usize(2, len)?.write_to(writer)
}

/// `SourceFile` (JVMS 4.7.10): index of the source file name.
#[derive(Debug, Clone)]
pub struct SourceFile {
    sourcefile: PoolReference,
}

impl SourceFile {
    /// Interns `file_name` and creates the attribute.
    pub fn new(pool: &mut ConstantPool, file_name: &str) -> Result<Self> {
        Ok(Self { sourcefile: pool.utf8(file_name)? })
    }
}

impl Encodable for SourceFile {
    fn encoded_length(&self) -> usize {
        2
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        self.sourcefile.write_to(writer)
    }
}

impl Attribute for SourceFile {
    fn attribute_name(&self) -> &str {
        "SourceFile"
    }

    fn references(&self) -> Vec<&PoolReference> {
        vec![&self.sourcefile]
    }
}

/// `ConstantValue` (JVMS 4.7.2): index of a field's constant initializer.
#[derive(Debug, Clone)]
pub struct ConstantValue {
    value: PoolReference,
}

impl ConstantValue {
    /// Wraps a reference to an `Integer`, `Float`, `Long`, `Double` or `String` entry.
    pub fn new(value: PoolReference) -> Self {
        Self { value }
    }
}

impl Encodable for ConstantValue {
    fn encoded_length(&self) -> usize {
        2
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        self.value.write_to(writer)
    }
}

impl Attribute for ConstantValue {
    fn attribute_name(&self) -> &str {
        "ConstantValue"
    }

    fn references(&self) -> Vec<&PoolReference> {
        vec![&self.value]
    }
}

/// `Signature` (JVMS 4.7.9): generic signature string.
#[derive(Debug, Clone)]
pub struct Signature {
    signature: PoolReference,
}

impl Signature {
    /// Interns `signature` and creates the attribute.
    pub fn new(pool: &mut ConstantPool, signature: &str) -> Result<Self> {
        Ok(Self { signature: pool.utf8(signature)? })
    }
}

impl Encodable for Signature {
    fn encoded_length(&self) -> usize {
        2
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        self.signature.write_to(writer)
    }
}

impl Attribute for Signature {
    fn attribute_name(&self) -> &str {
        "Signature"
    }

    fn references(&self) -> Vec<&PoolReference> {
        vec![&self.signature]
    }
}

/// `Exceptions` (JVMS 4.7.5): checked exceptions a method may throw.
#[derive(Debug, Clone, Default)]
pub struct Exceptions {
    classes: Vec<PoolReference>,
}

impl Exceptions {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `internal_name` as a `CONSTANT_Class` and appends it.
    pub fn push(&mut self, pool: &mut ConstantPool, internal_name: &str) -> Result<()> {
        self.classes.push(pool.class(internal_name)?);
        Ok(())
    }

    /// Number of exception classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Encodable for Exceptions {
    fn encoded_length(&self) -> usize {
        2 + self.classes.encoded_length()
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        write_count(self.classes.len(), writer)?;
        self.classes.write_to(writer)
    }
}

impl Attribute for Exceptions {
    fn attribute_name(&self) -> &str {
        "Exceptions"
    }

    fn references(&self) -> Vec<&PoolReference> {
        self.classes.iter().collect()
    }
}

/// One row of a [`LineNumberTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumber {
    pub start_pc: u16,
    pub line_number: u16,
}

impl Encodable for LineNumber {
    fn encoded_length(&self) -> usize {
        4
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_bytes(&self.start_pc.to_be_bytes());
        writer.write_bytes(&self.line_number.to_be_bytes());
        Ok(())
    }
}

/// `LineNumberTable` (JVMS 4.7.12): maps bytecode offsets to source lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineNumberTable {
    entries: Vec<LineNumber>,
}

impl LineNumberTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn push(&mut self, start_pc: u16, line_number: u16) {
        self.entries.push(LineNumber { start_pc, line_number });
    }

    /// The rows in insertion order.
    pub fn entries(&self) -> &[LineNumber] {
        &self.entries
    }
}

impl Encodable for LineNumberTable {
    fn encoded_length(&self) -> usize {
        2 + self.entries.encoded_length()
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        write_count(self.entries.len(), writer)?;
        self.entries.write_to(writer)
    }
}

impl Attribute for LineNumberTable {
    fn attribute_name(&self) -> &str {
        "LineNumberTable"
    }
}

/// Attribute with an empty body, such as `Deprecated` or `Synthetic`.
macro_rules! marker_attribute {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Encodable for $name {
            fn encoded_length(&self) -> usize {
                0
            }

            fn write_to(&self, _writer: &mut ByteWriter) -> Result<()> {
                Ok(())
            }
        }

        impl Attribute for $name {
            fn attribute_name(&self) -> &str {
                stringify!($name)
            }
        }
    };
}

marker_attribute!(
    /// `Deprecated` (JVMS 4.7.15).
    Deprecated
);
marker_attribute!(
    /// `Synthetic` (JVMS 4.7.8).
    Synthetic
);

/// Attribute with an arbitrary name and opaque body.
///
/// JVMS 4.7.1: unknown attributes are skipped by readers, so any name is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Custom {
    name: String,
    body: Vec<u8>,
}

impl Custom {
    /// Creates an attribute named `name` with the given body bytes.
    pub fn new(name: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), body: body.into() }
    }
}

impl Encodable for Custom {
    fn encoded_length(&self) -> usize {
        self.body.len()
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_bytes(&self.body);
        Ok(())
    }
}

impl Attribute for Custom {
    fn attribute_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::write_checked;
    use crate::pool::PoolEntry;

    fn block_bytes(attr: &impl Attribute, pool: &mut ConstantPool) -> Vec<u8> {
        attr.to_block(pool).unwrap().to_bytes().unwrap()
    }

    #[test]
    fn source_file_layout() {
        let mut pool = ConstantPool::new();
        let attr = SourceFile::new(&mut pool, "Main.java").unwrap();
        // #1 Main.java, #2 SourceFile
        assert_eq!(
            block_bytes(&attr, &mut pool),
            vec![0, 2, 0, 0, 0, 2, 0, 1]
        );
    }

    #[test]
    fn constant_value_points_at_constant() {
        let mut pool = ConstantPool::new();
        let value = pool.integer(42).unwrap();
        let attr = ConstantValue::new(value);
        assert_eq!(attr.to_bytes().unwrap(), vec![0, 1]);
        assert_eq!(attr.attribute_name(), "ConstantValue");
    }

    #[test]
    fn foreign_body_references_rejected() {
        let mut pool = ConstantPool::new();
        let mut other = ConstantPool::new();
        let source = SourceFile::new(&mut other, "A.java").unwrap();
        let signature = Signature::new(&mut other, "TT;").unwrap();
        let mut exceptions = Exceptions::new();
        exceptions.push(&mut pool, "java/io/IOException").unwrap();
        exceptions.push(&mut other, "java/lang/Error").unwrap();

        let kinds: Vec<Box<dyn Attribute>> =
            vec![Box::new(source), Box::new(signature), Box::new(exceptions)];
        for kind in &kinds {
            assert_eq!(
                kind.to_block(&mut pool).unwrap_err(),
                crate::Error::DanglingReference,
                "{}",
                kind.attribute_name()
            );
        }
    }

    #[test]
    fn references_list_body_indices() {
        let mut pool = ConstantPool::new();
        let mut exceptions = Exceptions::new();
        exceptions.push(&mut pool, "A").unwrap();
        exceptions.push(&mut pool, "B").unwrap();
        assert_eq!(exceptions.references().len(), 2);
        assert!(LineNumberTable::new().references().is_empty());
        assert!(Deprecated.references().is_empty());
    }

    #[test]
    fn signature_interns_string() {
        let mut pool = ConstantPool::new();
        let attr = Signature::new(&mut pool, "Ljava/util/List<Ljava/lang/String;>;").unwrap();
        assert_eq!(attr.to_bytes().unwrap(), vec![0, 1]);
        assert_eq!(pool.index_of(&PoolEntry::utf8("Signature").unwrap()), None);
        attr.to_block(&mut pool).unwrap();
        assert_eq!(pool.index_of(&PoolEntry::utf8("Signature").unwrap()), Some(2));
    }

    #[test]
    fn exceptions_layout() {
        let mut pool = ConstantPool::new();
        let mut attr = Exceptions::new();
        assert!(attr.is_empty());
        attr.push(&mut pool, "java/io/IOException").unwrap();
        attr.push(&mut pool, "java/lang/Exception").unwrap();
        assert_eq!(attr.len(), 2);
        // Utf8 #1, Class #2, Utf8 #3, Class #4
        assert_eq!(attr.to_bytes().unwrap(), vec![0, 2, 0, 2, 0, 4]);
        assert_eq!(attr.encoded_length(), 6);
    }

    #[test]
    fn line_number_table_layout() {
        let mut table = LineNumberTable::new();
        table.push(0, 10);
        table.push(4, 11);
        assert_eq!(table.entries().len(), 2);
        assert_eq!(
            table.to_bytes().unwrap(),
            vec![0, 2, 0, 0, 0, 10, 0, 4, 0, 11]
        );
    }

    #[test]
    fn empty_line_number_table() {
        let table = LineNumberTable::new();
        assert_eq!(table.to_bytes().unwrap(), vec![0, 0]);
    }

    #[test]
    fn line_number_table_too_many_rows() {
        let mut table = LineNumberTable::new();
        for pc in 0..=u16::MAX {
            table.push(pc, 1);
        }
        table.push(0, 2);
        assert!(matches!(
            table.to_bytes().unwrap_err(),
            crate::Error::ValueOutOfRange { value: 65537, width: 2 }
        ));
    }

    #[test]
    fn markers_are_empty() {
        let mut pool = ConstantPool::new();
        assert_eq!(Deprecated.attribute_name(), "Deprecated");
        assert_eq!(Synthetic.attribute_name(), "Synthetic");
        let bytes = block_bytes(&Synthetic, &mut pool);
        assert_eq!(bytes, vec![0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn custom_attribute() {
        let mut pool = ConstantPool::new();
        let attr = Custom::new("org.example.Tag", vec![1, 2, 3]);
        assert_eq!(attr.attribute_name(), "org.example.Tag");
        assert_eq!(
            block_bytes(&attr, &mut pool),
            vec![0, 1, 0, 0, 0, 3, 1, 2, 3]
        );
    }

    #[test]
    fn all_kinds_honour_length_invariant() {
        let mut pool = ConstantPool::new();
        let mut exceptions = Exceptions::new();
        exceptions.push(&mut pool, "E").unwrap();
        let mut lines = LineNumberTable::new();
        lines.push(1, 2);
        let value = pool.long(7).unwrap();
        let kinds: Vec<Box<dyn Attribute>> = vec![
            Box::new(SourceFile::new(&mut pool, "A.java").unwrap()),
            Box::new(ConstantValue::new(value)),
            Box::new(Signature::new(&mut pool, "TT;").unwrap()),
            Box::new(exceptions),
            Box::new(lines),
            Box::new(Deprecated),
            Box::new(Synthetic),
            Box::new(Custom::new("X", vec![9; 17])),
        ];
        for kind in &kinds {
            let mut w = ByteWriter::new();
            write_checked(&**kind, &mut w).unwrap();
            let block = kind.to_block(&mut pool).unwrap();
            let mut w = ByteWriter::new();
            write_checked(&block, &mut w).unwrap();
        }
    }
}
