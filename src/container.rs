//! Top-level container writer.
//!
//! Layout (Default-Konfiguration):
//!
//! ```text
//! u2              constant_pool_count
//! cp_info         constant_pool[constant_pool_count - 1]
//! attribute_info  attributes[]
//! ```
//!
//! With [`ContainerConfig::include_header`] the pool is preceded by the
//! class-file header; with [`ContainerConfig::include_attribute_count`] the
//! blocks are preceded by a `u2` count.
//!
//! # Beispiel
//!
//! ```
//! use classwrite::attribute::AttributeBlock;
//! use classwrite::container::Container;
//!
//! let mut container = Container::new();
//! let code = container.pool_mut().utf8("Code")?;
//! container.pool_mut().utf8("LineNumberTable")?;
//! container.add_block(AttributeBlock::new(code, vec![0xDE, 0xAD, 0xBE, 0xEF, 0x42])?)?;
//!
//! let bytes = container.to_vec()?;
//! assert_eq!(&bytes[..2], &[0x00, 0x03]);
//! assert_eq!(&bytes[bytes.len() - 11..bytes.len() - 5], &[0, 1, 0, 0, 0, 5]);
//! # Ok::<(), classwrite::Error>(())
//! ```

use std::io::Write;

use log::{debug, trace};

use crate::attribute::{Attribute, AttributeBlock, ensure_owned};
use crate::config::ContainerConfig;
use crate::encode::{Encodable, write_checked};
use crate::fixed_width::FixedWidthInteger;
use crate::header::ClassHeader;
use crate::pool::ConstantPool;
use crate::sink::ByteWriter;
use crate::Result;

/// Writes `pool` followed by `blocks` into `writer`.
///
/// The pool is frozen before the first block is written. Every block name must
/// belong to `pool`, and each block must emit exactly its declared length.
/// Block names are checked before the first byte is written.
///
/// # Errors
///
/// - [`Error::DanglingReference`](crate::Error::DanglingReference) for a block
///   named from another (or a dropped) pool
/// - [`Error::PoolFrozen`](crate::Error::PoolFrozen) if `pool` was already written
/// - [`Error::LengthMismatch`](crate::Error::LengthMismatch) if a block writes
///   a different number of bytes than it reports
pub fn write_all(pool: &mut ConstantPool, blocks: &[AttributeBlock], writer: &mut ByteWriter) -> Result<()> {
    for block in blocks {
        ensure_owned(pool, block.name())?;
    }
    pool.write_all(writer)?;
    for block in blocks {
        write_checked(block, writer)?;
    }
    debug!("container: {} attribute blocks, {} bytes", blocks.len(), writer.position());
    Ok(())
}

/// A constant pool plus the attribute blocks that reference it.
#[derive(Debug, Default)]
pub struct Container {
    config: ContainerConfig,
    pool: ConstantPool,
    blocks: Vec<AttributeBlock>,
}

impl Container {
    /// Creates an empty container with the default (bare) layout.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Creates an empty container; the pool uses `config.limits`.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            pool: ConstantPool::with_limits(config.limits),
            blocks: Vec::new(),
        }
    }

    /// The layout options this container was created with.
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// The container's constant pool.
    pub fn pool(&self) -> &ConstantPool {
        &self.pool
    }

    /// Mutable access to the pool, for interning before blocks are built.
    pub fn pool_mut(&mut self) -> &mut ConstantPool {
        &mut self.pool
    }

    /// Appends a block. Blocks are written in insertion order.
    ///
    /// # Errors
    ///
    /// [`Error::DanglingReference`](crate::Error::DanglingReference) if the
    /// block name does not belong to this container's pool.
    pub fn add_block(&mut self, block: AttributeBlock) -> Result<()> {
        ensure_owned(&self.pool, block.name())?;
        self.blocks.push(block);
        Ok(())
    }

    /// Encodes `attribute` against this container's pool and appends it.
    ///
    /// # Errors
    ///
    /// [`Error::DanglingReference`](crate::Error::DanglingReference) if the
    /// attribute body refers to another pool.
    pub fn add_attribute<A: Attribute + ?Sized>(&mut self, attribute: &A) -> Result<()> {
        let block = attribute.to_block(&mut self.pool)?;
        trace!("container: attribute {}", attribute.attribute_name());
        self.blocks.push(block);
        Ok(())
    }

    /// The attribute blocks in write order.
    pub fn blocks(&self) -> &[AttributeBlock] {
        &self.blocks
    }

    /// Number of attribute blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no attribute block has been added.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Exact number of bytes [`write`](Self::write) will emit.
    pub fn encoded_length(&self) -> usize {
        let header = if self.config.include_header { ClassHeader::LEN } else { 0 };
        let count = if self.config.include_attribute_count { 2 } else { 0 };
        header
            + self.pool.encoded_length()
            + count
            + self.blocks.iter().map(Encodable::encoded_length).sum::<usize>()
    }

    /// Writes the container and consumes it.
    ///
    /// # Errors
    ///
    /// [`Error::ValueOutOfRange`](crate::Error::ValueOutOfRange) if
    /// `include_attribute_count` is set and there are more than 65535 blocks,
    /// plus everything [`write_all`] reports.
    pub fn write(mut self, writer: &mut ByteWriter) -> Result<()> {
        // Zählerbreite vor dem ersten Byte prüfen: keine halbgeschriebene Ausgabe
        let count = if self.config.include_attribute_count {
            Some(FixedWidthInteger::from_usize(2, self.blocks.len())?)
        } else {
            None
        };

        if self.config.include_header {
            ClassHeader::new(self.config.version).write_to(writer)?;
        }
        self.pool.write_all(writer)?;
        if let Some(count) = count {
            count.write_to(writer)?;
        }
        for block in &self.blocks {
            write_checked(block, writer)?;
        }
        debug!(
            "container: {} attribute blocks, {} bytes",
            self.blocks.len(),
            writer.position()
        );
        Ok(())
    }

    /// Writes the container into a fresh buffer.
    pub fn to_vec(self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::with_capacity(self.encoded_length());
        self.write(&mut writer)?;
        Ok(writer.into_vec())
    }

    /// Writes the container to an [`std::io::Write`] sink.
    pub fn write_to_io<W: Write>(self, out: &mut W) -> Result<()> {
        let mut writer = ByteWriter::with_capacity(self.encoded_length());
        self.write(&mut writer)?;
        writer.drain_to(out)?;
        out.flush()?;
        Ok(())
    }
}
