//! Central error types for the class-file container encoder.
//!
//! Alle Fehler sind lokal und synchron. Ein Fehler während `write_to` lässt den
//! Sink in einem nicht fortsetzbaren Zustand zurück: der Container muss verworfen
//! und neu erzeugt werden.

use core::fmt;

/// All errors raised while building or writing a container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A value does not fit in the byte width of its field (JVMS 4.1).
    ValueOutOfRange {
        /// Der abgewiesene Wert.
        value: u64,
        /// Feldbreite in Bytes.
        width: u8,
    },
    /// A fixed-width integer was requested with an unsupported byte width.
    InvalidWidth(u8),
    /// The constant pool index space is exhausted (JVMS 4.1, `constant_pool_count`).
    PoolOverflow {
        /// Höchster erlaubter Index des Pools.
        max_index: u16,
    },
    /// An entry was interned after the pool was frozen for writing.
    PoolFrozen,
    /// A pool reference was resolved against a discarded pool or a pool
    /// other than the one it was created by.
    DanglingReference,
    /// A structure wrote a different number of bytes than it declared.
    ///
    /// Internal invariant violation: every later structure would be misread,
    /// so the writer aborts instead of continuing.
    LengthMismatch {
        /// Von `encoded_length` angekündigte Bytes.
        declared: usize,
        /// Tatsächlich geschriebene Bytes.
        written: usize,
    },
    /// Writing the finished bytes to the output sink failed.
    IoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueOutOfRange { value, width } => {
                write!(f, "value {value} does not fit in a {width}-byte field (JVMS 4.1)")
            }
            Self::InvalidWidth(width) => write!(f, "invalid integer width {width}, expected 1..=8 bytes"),
            Self::PoolOverflow { max_index } => {
                write!(f, "constant pool overflow: index would exceed {max_index} (JVMS 4.1)")
            }
            Self::PoolFrozen => write!(f, "constant pool is frozen, no further entries can be interned"),
            Self::DanglingReference => {
                write!(f, "dangling pool reference: pool was discarded or does not own the entry")
            }
            Self::LengthMismatch { declared, written } => {
                write!(f, "length mismatch: declared {declared} bytes, wrote {written}")
            }
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl Error {
    /// Erstellt einen `ValueOutOfRange` Fehler für ein Feld mit `width` Bytes.
    pub fn out_of_range(value: impl TryInto<u64>, width: u8) -> Self {
        Self::ValueOutOfRange {
            value: value.try_into().unwrap_or(u64::MAX),
            width,
        }
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_out_of_range_display() {
        let e = Error::ValueOutOfRange { value: 65536, width: 2 };
        let msg = e.to_string();
        assert!(msg.contains("65536"), "{msg}");
        assert!(msg.contains("2-byte"), "{msg}");
        assert!(msg.contains("4.1"), "{msg}");
    }

    #[test]
    fn invalid_width_display() {
        let msg = Error::InvalidWidth(9).to_string();
        assert!(msg.contains('9'), "{msg}");
        assert!(msg.contains("1..=8"), "{msg}");
    }

    #[test]
    fn pool_overflow_display() {
        let msg = Error::PoolOverflow { max_index: 65534 }.to_string();
        assert!(msg.contains("overflow"), "{msg}");
        assert!(msg.contains("65534"), "{msg}");
    }

    #[test]
    fn pool_frozen_display() {
        let msg = Error::PoolFrozen.to_string();
        assert!(msg.contains("frozen"), "{msg}");
    }

    #[test]
    fn dangling_reference_display() {
        let msg = Error::DanglingReference.to_string();
        assert!(msg.contains("dangling"), "{msg}");
    }

    #[test]
    fn length_mismatch_display() {
        let msg = Error::LengthMismatch { declared: 11, written: 10 }.to_string();
        assert!(msg.contains("11"), "{msg}");
        assert!(msg.contains("10"), "{msg}");
    }

    #[test]
    fn io_error_from_std() {
        let io = std::io::Error::new(std::io::ErrorKind::WriteZero, "disk full");
        let e: Error = io.into();
        assert!(matches!(e, Error::IoError(_)));
        assert!(e.to_string().contains("disk full"));
    }

    #[test]
    fn out_of_range_saturates_unrepresentable_values() {
        assert_eq!(
            Error::out_of_range(u128::MAX, 4),
            Error::ValueOutOfRange { value: u64::MAX, width: 4 }
        );
        assert_eq!(
            Error::out_of_range(70_000usize, 2),
            Error::ValueOutOfRange { value: 70_000, width: 2 }
        );
    }

    #[test]
    fn error_implements_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(Error::PoolFrozen);
        assert!(!e.to_string().is_empty());
    }

    #[test]
    fn error_is_clone_and_eq() {
        let e1 = Error::DanglingReference;
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }
}
