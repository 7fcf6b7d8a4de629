//! Section-table operations (C5).
//!
//! Grounded on `backend_section`/`backend_add_section`/
//! `backend_get_section_by_*`/`backend_get_first_section[_by_type]` in
//! `backend.c`, and on faerie's `SectionKind` enum (see `mach.rs`'s match on
//! `s.kind()` against `SectionKind::{Data, Debug, Text}`) generalized to the
//! closed set this spec names.

use crate::sequence::{Id, OrderedTable};
use bitflags::bitflags;
use log::debug;

/// Weak reference to a [`Section`] inside the owning [`crate::object::Object`].
pub type SectionId = Id<Section>;

/// The kind of a [`Section`] (closed set).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SectionKind {
    /// Not yet classified.
    #[default]
    None,
    /// Executable code.
    Code,
    /// Initialized data.
    Data,
    /// Uninitialized data (no on-disk bytes; `Section::data` is `None`).
    Bss,
    /// A string table.
    StrTab,
    /// A symbol table.
    SymTab,
    /// A relocation table.
    Relocation,
}

bitflags! {
    /// Section flag bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct SectionFlags: u32 {
        /// Section occupies memory during execution.
        const ALLOC = 1 << 0;
        /// Section is writable at runtime.
        const WRITE = 1 << 1;
        /// Section holds executable instructions.
        const EXEC = 1 << 2;
        /// Section holds null-terminated strings.
        const STRINGS = 1 << 3;
    }
}

/// A named, addressable region of an object (code, data, bss, strings, ...).
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    kind: SectionKind,
    /// Assigned by the backend; not meaningful until a backend populates
    /// it (kept as a plain field rather than an `Option` because the
    /// original always initializes it to zero and callers read it as a
    /// raw ordinal, not a presence flag).
    index: u32,
    size: u64,
    address: u64,
    flags: SectionFlags,
    entry_size: u32,
    alignment: u32,
    data: Option<Vec<u8>>,
    strtab: Option<SectionId>,
}

impl Section {
    fn new(name: impl Into<String>, size: u64, address: u64, data: Option<Vec<u8>>) -> Self {
        Section {
            name: name.into(),
            kind: SectionKind::default(),
            index: 0,
            size,
            address,
            flags: SectionFlags::empty(),
            entry_size: 0,
            alignment: 1,
            data,
            strtab: None,
        }
    }

    /// Section name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Section kind.
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// Backend-assigned ordinal.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Virtual address.
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Flag bits.
    pub fn flags(&self) -> SectionFlags {
        self.flags
    }

    /// Per-entry size, for table-shaped sections (symtab, relocation, ...).
    pub fn entry_size(&self) -> u32 {
        self.entry_size
    }

    /// Required alignment.
    pub fn alignment(&self) -> u32 {
        self.alignment
    }

    /// Owned byte contents; `None` for bss.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Weak reference to the section providing this section's strings, if
    /// any.
    pub fn strtab(&self) -> Option<SectionId> {
        self.strtab
    }

    /// Does `val` fall within `[address, address + size)`?
    fn contains(&self, val: u64) -> bool {
        self.address <= val && val < self.address + self.size
    }

    /// Sets the section kind.
    pub fn set_kind(&mut self, kind: SectionKind) {
        self.kind = kind;
    }

    /// Sets the backend-assigned ordinal.
    pub fn set_index(&mut self, index: u32) {
        self.index = index;
    }

    /// Sets the flag bits.
    pub fn set_flags(&mut self, flags: SectionFlags) {
        self.flags = flags;
    }

    /// Sets the per-entry size.
    pub fn set_entry_size(&mut self, entry_size: u32) {
        self.entry_size = entry_size;
    }

    /// Sets the alignment.
    pub fn set_alignment(&mut self, alignment: u32) {
        self.alignment = alignment;
    }

    /// Sets the weak reference to this section's string table.
    pub fn set_strtab(&mut self, strtab: SectionId) {
        self.strtab = Some(strtab);
    }
}

/// The section table owned by an [`crate::object::Object`].
#[derive(Debug, Default)]
pub struct SectionTable {
    sections: OrderedTable<Section>,
}

impl SectionTable {
    /// Creates an empty section table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Adds a new section, taking ownership of `data`.
    pub fn add_section(
        &mut self,
        name: impl Into<String>,
        size: u64,
        address: u64,
        data: Option<Vec<u8>>,
        entry_size: u32,
        alignment: u32,
        flags: SectionFlags,
    ) -> SectionId {
        let name = name.into();
        debug!(
            "adding section {} size:{} address:0x{:x} entry size:{} flags:{:?} alignment:{}",
            name, size, address, entry_size, flags, alignment
        );
        let mut section = Section::new(name, size, address, data);
        section.entry_size = entry_size;
        section.alignment = alignment;
        section.flags = flags;
        self.sections.append(section)
    }

    /// Looks up a section by the original's 1-based positional index
    /// (index 1 is the first section).
    pub fn by_index(&self, index: u32) -> Option<&Section> {
        if index == 0 {
            return None;
        }
        self.sections.get_at((index - 1) as usize).map(|(_, s)| s)
    }

    /// Looks up a section by name (first match).
    pub fn by_name(&self, name: &str) -> Option<&Section> {
        self.sections.values().find(|s| s.name == name)
    }

    /// Looks up a section by id (for resolving weak references).
    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id)
    }

    /// Mutably looks up a section by id.
    pub fn get_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.get_mut(id)
    }

    /// Looks up a section by kind (first match).
    pub fn by_kind(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.values().find(|s| s.kind == kind)
    }

    /// Looks up a section whose address exactly equals `address`.
    pub fn by_address(&self, address: u64) -> Option<&Section> {
        self.sections.values().find(|s| s.address == address)
    }

    /// Looks up a section whose `[address, address + size)` range contains
    /// `val` (half-open).
    pub fn by_val(&self, val: u64) -> Option<&Section> {
        self.sections.values().find(|s| s.contains(val))
    }

    /// The 1-based index of the first section named `name`, or `None`.
    pub fn index_by_name(&self, name: &str) -> Option<u32> {
        self.sections
            .values()
            .position(|s| s.name == name)
            .map(|pos| pos as u32 + 1)
    }

    /// Iterates all sections in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Iterates sections of a given kind, in insertion order.
    pub fn iter_by_kind(&self, kind: SectionKind) -> impl Iterator<Item = &Section> + '_ {
        self.sections.values().filter(move |s| s.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_one_section() -> (SectionTable, SectionId) {
        let mut t = SectionTable::new();
        let id = t.add_section(".text", 0x100, 0x1000, Some(vec![0u8; 0x100]), 0, 4, SectionFlags::ALLOC | SectionFlags::EXEC);
        (t, id)
    }

    #[test]
    fn lookup_by_index_is_one_based() {
        let (t, _) = table_with_one_section();
        assert!(t.by_index(0).is_none());
        assert_eq!(t.by_index(1).unwrap().name(), ".text");
        assert!(t.by_index(2).is_none());
    }

    #[test]
    fn lookup_by_name_and_kind() {
        let (mut t, id) = table_with_one_section();
        t.get_mut(id).unwrap().set_kind(SectionKind::Code);
        assert_eq!(t.by_name(".text").unwrap().kind(), SectionKind::Code);
        assert_eq!(t.by_kind(SectionKind::Code).unwrap().name(), ".text");
        assert!(t.by_kind(SectionKind::Data).is_none());
    }

    #[test]
    fn containment_is_half_open() {
        let (t, _) = table_with_one_section();
        assert!(t.by_val(0x1000).is_some());
        assert!(t.by_val(0x1080).is_some());
        assert!(t.by_val(0x1100).is_none());
    }

    #[test]
    fn exact_address_lookup() {
        let (t, _) = table_with_one_section();
        assert!(t.by_address(0x1000).is_some());
        assert!(t.by_address(0x1001).is_none());
    }

    #[test]
    fn bss_section_has_no_data() {
        let mut t = SectionTable::new();
        t.add_section(".bss", 0x40, 0x2000, None, 0, 8, SectionFlags::ALLOC | SectionFlags::WRITE);
        assert!(t.by_name(".bss").unwrap().data().is_none());
    }
}
