//! Constant Pool (JVMS 4.4).
//!
//! A deduplicating table of tagged constants. Each distinct `(tag, payload)`
//! gets a stable 1-based index on first insertion; inserting an equal entry
//! again returns the original index without mutating the pool. Index 0 is
//! reserved and never assigned.
//!
//! Lifecycle: one pool per container, not reusable across containers.
//!
//! ```text
//! construct -> intern* -> freeze -> write_all
//! ```
//!
//! # References and resolution
//!
//! [`ConstantPool::reference`] returns a [`PoolReference`]: a weak handle of
//! `(pool identity, entry identity)` that is turned into a concrete index only
//! when it is encoded. Indices are never reassigned (entries are never removed),
//! so a reference may be resolved any number of times and always yields the
//! same index. A reference whose pool has been dropped fails with
//! [`Error::DanglingReference`].
//!
//! # Beispiel
//!
//! ```
//! use classwrite::pool::{ConstantPool, PoolEntry};
//!
//! let mut pool = ConstantPool::new();
//! assert_eq!(pool.intern(PoolEntry::utf8("Code")?)?, 1);
//! assert_eq!(pool.intern(PoolEntry::utf8("LineNumberTable")?)?, 2);
//! assert_eq!(pool.intern(PoolEntry::utf8("Code")?)?, 1);
//! # Ok::<(), classwrite::Error>(())
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, trace, warn};

use crate::FastIndexMap;
use crate::encode::Encodable;
use crate::fixed_width::FixedWidthInteger;
use crate::mutf8;
use crate::sink::ByteWriter;
use crate::var_unsigned::VarUnsigned;
use crate::{Error, Result};

/// Constant pool tags (JVMS 4.4, Table 4.4-B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    Fieldref = 9,
    Methodref = 10,
    InterfaceMethodref = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    Dynamic = 17,
    InvokeDynamic = 18,
    Module = 19,
    Package = 20,
}

impl Tag {
    /// The tag byte.
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Number of index slots an entry with this tag occupies.
    ///
    /// JVMS 4.4.5: `long` and `double` take two slots; the index after them
    /// is unusable.
    pub const fn slots(self) -> u16 {
        match self {
            Self::Long | Self::Double => 2,
            _ => 1,
        }
    }

    /// Looks up a tag by its byte value.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            1 => Self::Utf8,
            3 => Self::Integer,
            4 => Self::Float,
            5 => Self::Long,
            6 => Self::Double,
            7 => Self::Class,
            8 => Self::String,
            9 => Self::Fieldref,
            10 => Self::Methodref,
            11 => Self::InterfaceMethodref,
            12 => Self::NameAndType,
            15 => Self::MethodHandle,
            16 => Self::MethodType,
            17 => Self::Dynamic,
            18 => Self::InvokeDynamic,
            19 => Self::Module,
            20 => Self::Package,
            _ => return None,
        })
    }
}

/// A pool constant: tag plus its already-encoded payload.
///
/// Equality and hashing are structural over `(tag, payload)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolEntry {
    tag: Tag,
    payload: Box<[u8]>,
}

impl PoolEntry {
    /// Creates an entry from a tag and a raw payload.
    pub fn new(tag: Tag, payload: impl Into<Box<[u8]>>) -> Self {
        Self { tag, payload: payload.into() }
    }

    /// `CONSTANT_Utf8`: `u2 length` followed by modified UTF-8 bytes (JVMS 4.4.7).
    ///
    /// # Errors
    ///
    /// [`Error::ValueOutOfRange`] if the encoded string exceeds 65535 bytes.
    pub fn utf8(value: &str) -> Result<Self> {
        let len = mutf8::encoded_len(value);
        let len = u16::try_from(len).map_err(|_| Error::out_of_range(len, 2))?;
        let mut payload = Vec::with_capacity(2 + usize::from(len));
        payload.extend_from_slice(&len.to_be_bytes());
        mutf8::encode_into(value, &mut payload);
        Ok(Self::new(Tag::Utf8, payload))
    }

    /// `CONSTANT_Integer` (JVMS 4.4.4).
    pub fn integer(value: i32) -> Self {
        Self::new(Tag::Integer, value.to_be_bytes())
    }

    /// `CONSTANT_Float`, stored as its IEEE 754 bit pattern (JVMS 4.4.4).
    pub fn float(value: f32) -> Self {
        Self::new(Tag::Float, value.to_bits().to_be_bytes())
    }

    /// `CONSTANT_Long` (JVMS 4.4.5). Occupies two index slots.
    pub fn long(value: i64) -> Self {
        Self::new(Tag::Long, value.to_be_bytes())
    }

    /// `CONSTANT_Double`, stored as its IEEE 754 bit pattern (JVMS 4.4.5).
    /// Occupies two index slots.
    pub fn double(value: f64) -> Self {
        Self::new(Tag::Double, value.to_bits().to_be_bytes())
    }

    /// Entry whose payload is a single `u2` index (`Class`, `String`,
    /// `MethodType`, `Module`, `Package`).
    fn with_index(tag: Tag, index: u16) -> Self {
        Self::new(tag, index.to_be_bytes())
    }

    /// Entry whose payload is two `u2` indices (`Fieldref`, `Methodref`,
    /// `InterfaceMethodref`, `NameAndType`).
    fn with_index_pair(tag: Tag, first: u16, second: u16) -> Self {
        let [a, b] = first.to_be_bytes();
        let [c, d] = second.to_be_bytes();
        Self::new(tag, [a, b, c, d])
    }

    /// The entry's tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The encoded payload (without the tag byte).
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl Encodable for PoolEntry {
    #[inline]
    fn encoded_length(&self) -> usize {
        1 + self.payload.len()
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u8(self.tag.byte());
        writer.write_bytes(&self.payload);
        Ok(())
    }
}

/// Limits of the pool's index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    max_index: u16,
}

impl PoolLimits {
    /// Largest index whose `constant_pool_count` (= index + 1) still fits the
    /// two-byte count field.
    pub const MAX_INDEX: u16 = u16::MAX - 1;

    /// Limits with a lower ceiling, e.g. to reserve room for later entries.
    ///
    /// # Errors
    ///
    /// [`Error::ValueOutOfRange`] if `max_index` is 0 or above [`Self::MAX_INDEX`].
    pub fn with_max_index(max_index: u16) -> Result<Self> {
        if max_index == 0 || max_index > Self::MAX_INDEX {
            return Err(Error::out_of_range(max_index, 2));
        }
        Ok(Self { max_index })
    }

    /// Highest assignable index.
    pub fn max_index(&self) -> u16 {
        self.max_index
    }
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self { max_index: Self::MAX_INDEX }
    }
}

/// Anteil des Index-Raums ab dem einmalig gewarnt wird (90%).
const WARN_PERCENT: u32 = 90;

struct PoolState {
    /// Entry -> zugewiesener Index, in Einfügereihenfolge.
    entries: FastIndexMap<PoolEntry, u16>,
    /// Nächster freier Index (startet bei 1, Index 0 ist reserviert).
    next_index: u32,
    limits: PoolLimits,
    frozen: bool,
    /// `write_all` lief bereits: ein Pool wird genau einmal geschrieben.
    written: bool,
    warned: bool,
}

/// Deduplicating, insertion-ordered constant pool.
pub struct ConstantPool {
    state: Rc<RefCell<PoolState>>,
}

impl ConstantPool {
    /// Creates an empty pool with the default limits.
    pub fn new() -> Self {
        Self::with_limits(PoolLimits::default())
    }

    /// Creates an empty pool with custom limits.
    pub fn with_limits(limits: PoolLimits) -> Self {
        Self {
            state: Rc::new(RefCell::new(PoolState {
                entries: FastIndexMap::default(),
                next_index: 1,
                limits,
                frozen: false,
                written: false,
                warned: false,
            })),
        }
    }

    /// Interns `entry` and returns its index.
    ///
    /// An entry equal to an existing one returns the existing index and leaves
    /// the pool untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolFrozen`] if the pool was frozen, even for an existing entry
    /// - [`Error::PoolOverflow`] if the entry would exceed the index space
    pub fn intern(&mut self, entry: PoolEntry) -> Result<u16> {
        self.intern_ordinal(entry).map(|(_, index)| index)
    }

    /// Interns `entry` and returns a lazily-resolved handle to it.
    pub fn reference(&mut self, entry: PoolEntry) -> Result<PoolReference> {
        let (ordinal, _) = self.intern_ordinal(entry)?;
        Ok(PoolReference {
            pool: Rc::downgrade(&self.state),
            ordinal,
        })
    }

    fn intern_ordinal(&mut self, entry: PoolEntry) -> Result<(usize, u16)> {
        let mut state = self.state.borrow_mut();
        if state.frozen {
            return Err(Error::PoolFrozen);
        }
        if let Some((ordinal, _, &index)) = state.entries.get_full(&entry) {
            return Ok((ordinal, index));
        }

        let max_index = state.limits.max_index;
        let index = state.next_index;
        let last_slot = index + u32::from(entry.tag.slots()) - 1;
        if last_slot > u32::from(max_index) {
            return Err(Error::PoolOverflow { max_index });
        }
        let index = index as u16;

        trace!("pool: #{index} {:?} ({} bytes)", entry.tag, entry.payload.len());
        let (ordinal, _) = state.entries.insert_full(entry, index);
        state.next_index = last_slot + 1;

        if !state.warned && last_slot * 100 >= u32::from(max_index) * WARN_PERCENT {
            state.warned = true;
            warn!(
                "constant pool at {last_slot}/{max_index} indices (>= {WARN_PERCENT}%)"
            );
        }
        Ok((ordinal, index))
    }

    // --- Convenience-Interner ---

    /// Interns a `CONSTANT_Utf8`.
    pub fn utf8(&mut self, value: &str) -> Result<PoolReference> {
        self.reference(PoolEntry::utf8(value)?)
    }

    /// Interns a `CONSTANT_Class` for an internal name such as `java/lang/Object`.
    pub fn class(&mut self, internal_name: &str) -> Result<PoolReference> {
        self.indexed(Tag::Class, internal_name)
    }

    /// Interns a `CONSTANT_String`.
    pub fn string(&mut self, value: &str) -> Result<PoolReference> {
        self.indexed(Tag::String, value)
    }

    /// Interns a `CONSTANT_MethodType` for a method descriptor.
    pub fn method_type(&mut self, descriptor: &str) -> Result<PoolReference> {
        self.indexed(Tag::MethodType, descriptor)
    }

    /// Interns a `CONSTANT_Module`.
    pub fn module(&mut self, name: &str) -> Result<PoolReference> {
        self.indexed(Tag::Module, name)
    }

    /// Interns a `CONSTANT_Package`.
    pub fn package(&mut self, name: &str) -> Result<PoolReference> {
        self.indexed(Tag::Package, name)
    }

    /// Interns a `CONSTANT_NameAndType`.
    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> Result<PoolReference> {
        let name = self.intern(PoolEntry::utf8(name)?)?;
        let descriptor = self.intern(PoolEntry::utf8(descriptor)?)?;
        self.reference(PoolEntry::with_index_pair(Tag::NameAndType, name, descriptor))
    }

    /// Interns a `CONSTANT_Fieldref`.
    pub fn field_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> Result<PoolReference> {
        self.member_ref(Tag::Fieldref, owner, name, descriptor)
    }

    /// Interns a `CONSTANT_Methodref`.
    pub fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> Result<PoolReference> {
        self.member_ref(Tag::Methodref, owner, name, descriptor)
    }

    /// Interns a `CONSTANT_InterfaceMethodref`.
    pub fn interface_method_ref(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<PoolReference> {
        self.member_ref(Tag::InterfaceMethodref, owner, name, descriptor)
    }

    /// Interns a `CONSTANT_Integer`.
    pub fn integer(&mut self, value: i32) -> Result<PoolReference> {
        self.reference(PoolEntry::integer(value))
    }

    /// Interns a `CONSTANT_Float`.
    pub fn float(&mut self, value: f32) -> Result<PoolReference> {
        self.reference(PoolEntry::float(value))
    }

    /// Interns a `CONSTANT_Long`.
    pub fn long(&mut self, value: i64) -> Result<PoolReference> {
        self.reference(PoolEntry::long(value))
    }

    /// Interns a `CONSTANT_Double`.
    pub fn double(&mut self, value: f64) -> Result<PoolReference> {
        self.reference(PoolEntry::double(value))
    }

    /// Interns a `CONSTANT_MethodHandle` (JVMS 4.4.8) for a field or method
    /// reference of this pool.
    ///
    /// # Errors
    ///
    /// - [`Error::ValueOutOfRange`] if `kind` is not a reference kind (`1..=9`)
    /// - [`Error::DanglingReference`] if `target` belongs to another pool
    pub fn method_handle(&mut self, kind: u8, target: &PoolReference) -> Result<PoolReference> {
        if !(1..=9).contains(&kind) {
            return Err(Error::out_of_range(kind, 1));
        }
        if !self.owns(target) {
            return Err(Error::DanglingReference);
        }
        let [hi, lo] = target.resolve()?.to_be_bytes();
        self.reference(PoolEntry::new(Tag::MethodHandle, [kind, hi, lo]))
    }

    /// Abhängigkeit (Utf8) zuerst, dann der Eintrag der auf sie zeigt.
    fn indexed(&mut self, tag: Tag, value: &str) -> Result<PoolReference> {
        let utf8 = self.intern(PoolEntry::utf8(value)?)?;
        self.reference(PoolEntry::with_index(tag, utf8))
    }

    fn member_ref(&mut self, tag: Tag, owner: &str, name: &str, descriptor: &str) -> Result<PoolReference> {
        let owner = self.class(owner)?.resolve()?;
        let name_and_type = self.name_and_type(name, descriptor)?.resolve()?;
        self.reference(PoolEntry::with_index_pair(tag, owner, name_and_type))
    }

    // --- Abfragen ---

    /// Index of an entry equal to `entry`, if interned.
    pub fn index_of(&self, entry: &PoolEntry) -> Option<u16> {
        self.state.borrow().entries.get(entry).copied()
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Whether no entry has been interned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of the `constant_pool_count` field: the next free index.
    ///
    /// Equals `len() + 1` unless `long`/`double` entries occupy extra slots.
    pub fn count_field(&self) -> u16 {
        // next_index <= max_index + 1 <= u16::MAX, siehe PoolLimits::MAX_INDEX
        self.state.borrow().next_index as u16
    }

    /// The configured limits.
    pub fn limits(&self) -> PoolLimits {
        self.state.borrow().limits
    }

    /// Whether the pool has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.state.borrow().frozen
    }

    /// Freezes the pool: existing entries still resolve, new ones are rejected.
    pub fn freeze(&mut self) {
        self.state.borrow_mut().frozen = true;
    }

    /// All entries with their indices, in insertion order.
    pub fn entries(&self) -> Vec<(u16, PoolEntry)> {
        self.state
            .borrow()
            .entries
            .iter()
            .map(|(entry, &index)| (index, entry.clone()))
            .collect()
    }

    /// Whether `reference` was created by this pool.
    pub fn owns(&self, reference: &PoolReference) -> bool {
        std::ptr::eq(reference.pool.as_ptr(), Rc::as_ptr(&self.state))
    }

    /// Total encoded size: count field plus every entry.
    pub fn encoded_length(&self) -> usize {
        let state = self.state.borrow();
        2 + state.entries.keys().map(Encodable::encoded_length).sum::<usize>()
    }

    /// Freezes the pool and writes `constant_pool_count` followed by every
    /// entry in insertion order.
    ///
    /// Called once per container, before any attribute block is written.
    ///
    /// # Errors
    ///
    /// [`Error::PoolFrozen`] if the pool has already been written.
    pub fn write_all(&mut self, writer: &mut ByteWriter) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.written {
            return Err(Error::PoolFrozen);
        }
        state.frozen = true;
        state.written = true;
        let count = state.next_index as u16;
        FixedWidthInteger::u2(count).write_to(writer)?;
        for entry in state.entries.keys() {
            entry.write_to(writer)?;
        }
        debug!(
            "pool: wrote {} entries, constant_pool_count={count}",
            state.entries.len()
        );
        Ok(())
    }
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConstantPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ConstantPool")
            .field("entries", &state.entries.len())
            .field("next_index", &state.next_index)
            .field("frozen", &state.frozen)
            .finish()
    }
}

/// Weak handle to an entry of a [`ConstantPool`].
///
/// Does not keep the pool alive. Resolves to the entry's index each time it
/// is encoded; the result is stable for the lifetime of the pool.
#[derive(Clone)]
pub struct PoolReference {
    pool: Weak<RefCell<PoolState>>,
    /// Position in der Einfügereihenfolge (nicht der Index).
    ordinal: usize,
}

impl PoolReference {
    /// Resolves the reference to its pool index.
    ///
    /// # Errors
    ///
    /// [`Error::DanglingReference`] if the pool has been dropped.
    pub fn resolve(&self) -> Result<u16> {
        let state = self.pool.upgrade().ok_or(Error::DanglingReference)?;
        let state = state.borrow();
        state
            .entries
            .get_index(self.ordinal)
            .map(|(_, &index)| index)
            .ok_or(Error::DanglingReference)
    }

    /// Resolves the reference into a two-byte index field.
    pub fn to_var_unsigned(&self) -> Result<VarUnsigned> {
        self.resolve().map(VarUnsigned::from)
    }

    /// Resolves the reference into a one-byte index field.
    ///
    /// # Errors
    ///
    /// [`Error::ValueOutOfRange`] if the index is above 255.
    pub fn to_narrow(&self) -> Result<VarUnsigned> {
        VarUnsigned::narrow(u32::from(self.resolve()?))
    }

    /// Whether the originating pool has been dropped.
    pub fn is_dangling(&self) -> bool {
        self.pool.strong_count() == 0
    }
}

impl fmt::Debug for PoolReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolve() {
            Ok(index) => write!(f, "PoolReference(#{index})"),
            Err(_) => write!(f, "PoolReference(dangling)"),
        }
    }
}

impl Encodable for PoolReference {
    #[inline]
    fn encoded_length(&self) -> usize {
        2
    }

    fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        self.to_var_unsigned()?.write_to(writer)
    }
}
