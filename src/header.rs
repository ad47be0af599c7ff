//! Class-file header (JVMS 4.1).
//!
//! Der Header hat folgende Struktur:
//! - `magic` (u4): immer `0xCAFEBABE`
//! - `minor_version` (u2)
//! - `major_version` (u2)
//!
//! Der Header ist optional: ohne ihn beginnt der Container direkt mit dem
//! Constant Pool.
//!
//! # Beispiel
//!
//! ```
//! use classwrite::header::{ClassHeader, ClassVersion};
//!
//! let header = ClassHeader::new(ClassVersion::JAVA_17);
//! assert_eq!(header.version().major(), 61);
//! assert_eq!(header.version().minor(), 0);
//! ```

use crate::encode::Encodable;
use crate::fixed_width::FixedWidthInteger;
use crate::sink::ByteWriter;
use crate::Result;

/// Magic number at the start of every class file.
pub const MAGIC: u32 = 0xCAFE_BABE;

/// `major_version` / `minor_version` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassVersion {
    major: u16,
    minor: u16,
}

impl ClassVersion {
    pub const JAVA_8: Self = Self::new(52, 0);
    pub const JAVA_11: Self = Self::new(55, 0);
    pub const JAVA_17: Self = Self::new(61, 0);
    pub const JAVA_21: Self = Self::new(65, 0);

    /// Creates a version from its raw fields.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// `major_version`.
    pub const fn major(&self) -> u16 {
        self.major
    }

    /// `minor_version`.
    pub const fn minor(&self) -> u16 {
        self.minor
    }

    /// Preview features enabled (JVMS 4.1: `minor_version == 0xFFFF`).
    pub const fn with_preview(self) -> Self {
        Self { major: self.major, minor: u16::MAX }
    }

    /// Whether the minor version marks a preview class file.
    pub const fn is_preview(&self) -> bool {
        self.minor == u16::MAX
    }
}

impl Default for ClassVersion {
    fn default() -> Self {
        Self::JAVA_8
    }
}

/// Class-file header: magic plus version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassHeader {
    version: ClassVersion,
}

impl ClassHeader {
    /// Encoded size: magic (4) + minor (2) + major (2).
    pub const LEN: usize = 8;

    /// Creates a header for the given version.
    pub fn new(version: ClassVersion) -> Self {
        Self { version }
    }

    /// The version written by this header.
    pub fn version(&self) -> ClassVersion {
        self.version
    }
}

impl Encodable for ClassHeader {
    fn encoded_length(&self) -> usize {
        Self::LEN
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        FixedWidthInteger::u4(MAGIC).write_to(writer)?;
        // JVMS 4.1: minor vor major
        FixedWidthInteger::u2(self.version.minor).write_to(writer)?;
        FixedWidthInteger::u2(self.version.major).write_to(writer)
    }
}
