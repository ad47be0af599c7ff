//! Container-Konfiguration (optionale Header-Felder und Pool-Limits).
//!
//! # Beispiel
//!
//! ```
//! use classwrite::config::ContainerConfig;
//! use classwrite::header::ClassVersion;
//!
//! let config = ContainerConfig::class_file(ClassVersion::JAVA_17);
//! assert!(config.include_header);
//! assert!(config.include_attribute_count);
//! ```

use crate::header::ClassVersion;
use crate::pool::PoolLimits;

/// Layout options of a [`Container`](crate::container::Container).
///
/// The default writes the bare layout: constant pool followed directly by the
/// attribute blocks, without magic, version or attribute count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerConfig {
    /// Write `magic`, `minor_version` and `major_version` before the pool.
    pub include_header: bool,
    /// Version written when `include_header` is set.
    pub version: ClassVersion,
    /// Write a `u2 attributes_count` before the attribute blocks.
    pub include_attribute_count: bool,
    /// Index space of the container's constant pool.
    pub limits: PoolLimits,
}

impl ContainerConfig {
    /// Konfiguration mit Header und Attribut-Zähler, wie in einer Class-Datei.
    pub fn class_file(version: ClassVersion) -> Self {
        Self {
            include_header: true,
            version,
            include_attribute_count: true,
            limits: PoolLimits::default(),
        }
    }

    /// Replaces the pool limits.
    pub fn with_limits(mut self, limits: PoolLimits) -> Self {
        self.limits = limits;
        self
    }
}
