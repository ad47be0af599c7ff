//! classwrite – Encoder für das Class-File-Containerformat (JVMS 4)
//!
//! Schreibt einen deduplizierenden Constant Pool gefolgt von
//! Attribut-Blöcken `(name_index, length, payload)`. Namensreferenzen werden
//! erst beim Schreiben in Indizes aufgelöst.
//!
//! # Beispiel
//!
//! ```
//! use classwrite::{AttributeBlock, ByteWriter, ConstantPool, write_all};
//!
//! let mut pool = ConstantPool::new();
//! let code = pool.utf8("Code")?;
//! pool.utf8("LineNumberTable")?;
//! assert_eq!(pool.utf8("Code")?.resolve()?, 1);
//!
//! let block = AttributeBlock::new(code, vec![0xDE, 0xAD, 0xBE, 0xEF, 0x42])?;
//! let mut writer = ByteWriter::new();
//! write_all(&mut pool, &[block], &mut writer)?;
//!
//! let bytes = writer.into_vec();
//! assert_eq!(&bytes[..5], &[0x00, 0x03, 0x01, 0x00, 0x04]);
//! assert_eq!(&bytes[bytes.len() - 11..], &[0, 1, 0, 0, 0, 5, 0xDE, 0xAD, 0xBE, 0xEF, 0x42]);
//! # Ok::<(), classwrite::Error>(())
//! ```

pub mod attribute;
pub mod attributes;
pub mod config;
pub mod container;
pub mod encode;
pub mod error;
pub mod fixed_width;
pub mod header;
pub mod mutf8;
pub mod pool;
pub mod sink;
pub mod var_unsigned;

pub use error::{Error, Result};

/// IndexMap mit ahash (deterministische Iteration + schnelles Hashing).
pub(crate) type FastIndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;

// Public API: Encoding
pub use encode::{Encodable, write_checked};
pub use fixed_width::FixedWidthInteger;
pub use sink::ByteWriter;
pub use var_unsigned::{IndexWidth, VarUnsigned};

// Public API: Constant Pool
pub use pool::{ConstantPool, PoolEntry, PoolLimits, PoolReference, Tag};

// Public API: Attributes
pub use attribute::{Attribute, AttributeBlock};

// Public API: Container
pub use config::ContainerConfig;
pub use container::{Container, write_all};
pub use header::{ClassHeader, ClassVersion};
