//! The root aggregate (C2), its scalar getters/setters, and lifecycle (C8).
//!
//! Grounded on `backend_object`, `backend_create`, the
//! `backend_set_filename`/`backend_set_type`/`backend_set_arch`/
//! `backend_set_entry_point` family of setters, and `backend_destructor`
//! in `backend.c`; the struct shape otherwise follows faerie's `Artifact`.

use crate::import::ImportTable;
use crate::relocation::RelocationTable;
use crate::section::{SectionId, SectionTable};
use crate::symbol::{Symbol, SymbolId, SymbolKind, SymbolTable};
use crate::target::{Arch, ObjectType};
use log::trace;

/// The root in-memory representation of one executable/object file.
///
/// `Object` exclusively owns its four child tables (symbols, sections,
/// relocations, imports) and every heap-allocated string or byte buffer
/// they contain; dropping an `Object` frees the transitive closure. Each
/// table starts empty and grows lazily as entries are added — there is no
/// separate "absent vs empty" state to track the way the original's null
/// `backend_object::symbol_table` pointer did.
#[derive(Debug)]
pub struct Object {
    name: String,
    object_type: ObjectType,
    arch: Arch,
    entry: u64,
    symbols: SymbolTable,
    sections: SectionTable,
    relocations: RelocationTable,
    imports: ImportTable,
}

impl Default for Object {
    fn default() -> Self {
        Object {
            name: String::new(),
            object_type: ObjectType::default(),
            arch: Arch::Unknown,
            entry: 0,
            symbols: SymbolTable::default(),
            sections: SectionTable::default(),
            relocations: RelocationTable::default(),
            imports: ImportTable::default(),
        }
    }
}

impl Object {
    /// A blank object, equivalent to `backend_create`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source/output filename.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the source/output filename.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The object's container-format tag.
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Sets the object's container-format tag; this is what
    /// [`crate::registry::Registry::write`] matches a backend against.
    pub fn set_object_type(&mut self, object_type: ObjectType) {
        trace!("setting object type to {}", object_type);
        self.object_type = object_type;
    }

    /// Target architecture.
    pub fn arch(&self) -> Arch {
        self.arch.clone()
    }

    /// Sets the target architecture.
    pub fn set_arch(&mut self, arch: Arch) {
        self.arch = arch;
    }

    /// Entry-point address.
    pub fn entry(&self) -> u64 {
        self.entry
    }

    /// Sets the entry-point address.
    pub fn set_entry(&mut self, entry: u64) {
        trace!("setting entry point to 0x{:x}", entry);
        self.entry = entry;
    }

    /// Borrows the symbol table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Mutably borrows the symbol table.
    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// Borrows the section table.
    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    /// Mutably borrows the section table.
    pub fn sections_mut(&mut self) -> &mut SectionTable {
        &mut self.sections
    }

    /// Borrows the relocation table.
    pub fn relocations(&self) -> &RelocationTable {
        &self.relocations
    }

    /// Mutably borrows the relocation table.
    pub fn relocations_mut(&mut self) -> &mut RelocationTable {
        &mut self.relocations
    }

    /// Borrows the import table.
    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    /// Mutably borrows the import table.
    pub fn imports_mut(&mut self) -> &mut ImportTable {
        &mut self.imports
    }

    /// Finds the `SECTION`-kind symbol whose weak `section` reference
    /// equals `section`, i.e. the symbol a backend emitted to name that
    /// section in the symbol table. Grounded on `backend_get_section_symbol`.
    pub fn section_symbol(&self, section: SectionId) -> Option<&Symbol> {
        self.symbols
            .iter_by_kind(SymbolKind::Section)
            .find(|s| s.section() == Some(section))
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        trace!(
            "dropping object {:?}: {} symbols, {} sections, {} relocations, {} import modules",
            self.name,
            self.symbols.len(),
            self.sections.len(),
            self.relocations.len(),
            self.imports.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionFlags;
    use crate::symbol::SymbolFlags;

    #[test]
    fn blank_object_has_empty_tables() {
        let obj = Object::new();
        assert_eq!(obj.object_type(), ObjectType::None);
        assert!(obj.symbols().is_empty());
        assert!(obj.sections().is_empty());
        assert!(obj.relocations().is_empty());
        assert!(obj.imports().is_empty());
    }

    #[test]
    fn scalar_setters_round_trip() {
        let mut obj = Object::new();
        obj.set_name("a.out");
        obj.set_object_type(ObjectType::Elf64);
        obj.set_entry(0x401000);
        assert_eq!(obj.name(), "a.out");
        assert_eq!(obj.object_type(), ObjectType::Elf64);
        assert_eq!(obj.entry(), 0x401000);
    }

    #[test]
    fn section_symbol_matches_by_weak_reference() {
        let mut obj = Object::new();
        let text = obj
            .sections_mut()
            .add_section(".text", 0x10, 0, Some(vec![0u8; 0x10]), 0, 4, SectionFlags::ALLOC);
        obj.symbols_mut().add_symbol(
            Some(".text"),
            0,
            SymbolKind::Section,
            0,
            SymbolFlags::LOCAL,
            Some(text),
        );
        let found = obj.section_symbol(text).unwrap();
        assert_eq!(found.name(), ".text");

        let data = obj
            .sections_mut()
            .add_section(".data", 0, 0x10, None, 0, 4, SectionFlags::ALLOC | SectionFlags::WRITE);
        assert!(obj.section_symbol(data).is_none());
    }
}
