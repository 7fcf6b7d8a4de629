//! Import-table operations (C7).
//!
//! Grounded on `backend_import`/`backend_add_import_module`/
//! `backend_add_import_function`/`backend_find_import_module_by_name`/
//! `backend_find_import_by_address`/`backend_get_first_import`/
//! `backend_get_next_import` in `backend.c`, and on faerie's `ImportKind`
//! enum and its `SymbolType::Undefined` case in `mach.rs` (an imported
//! symbol is exactly an undefined, global+external symbol that lives
//! outside the main symbol table).

use crate::sequence::{Id, OrderedTable};
use crate::symbol::{Symbol, SymbolFlags, SymbolId, SymbolKind};

/// Weak reference to an [`ImportModule`] inside the owning
/// [`crate::object::Object`].
pub type ImportModuleId = Id<ImportModule>;

/// An external library and the symbols imported from it.
#[derive(Debug)]
pub struct ImportModule {
    name: String,
    symbols: OrderedTable<Symbol>,
}

impl ImportModule {
    fn new(name: impl Into<String>) -> Self {
        ImportModule {
            name: name.into(),
            symbols: OrderedTable::new(),
        }
    }

    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of symbols imported from this module.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True if nothing has been imported from this module yet.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Declares a new imported function at `addr`.
    ///
    /// Imported symbols always carry kind [`SymbolKind::Function`] and
    /// flags `GLOBAL | EXTERNAL`; they are distinct `Symbol` values that
    /// never appear in the object's main symbol table.
    pub fn add_import_function(&mut self, name: impl Into<String>, addr: u64) -> SymbolId {
        let name = name.into();
        self.symbols.append(Symbol::imported(&name, addr))
    }

    /// Iterates the symbols imported from this module, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }
}

/// The import table owned by an [`crate::object::Object`].
#[derive(Debug, Default)]
pub struct ImportTable {
    modules: OrderedTable<ImportModule>,
}

impl ImportTable {
    /// Creates an empty import table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of modules (not symbols — see [`Self::symbol_count`]).
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True if no modules have been added.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Adds a new, initially empty, import module.
    pub fn add_module(&mut self, name: impl Into<String>) -> ImportModuleId {
        self.modules.append(ImportModule::new(name))
    }

    /// Resolves a module id to a borrowed [`ImportModule`].
    pub fn get(&self, id: ImportModuleId) -> Option<&ImportModule> {
        self.modules.get(id)
    }

    /// Mutably resolves a module id.
    pub fn get_mut(&mut self, id: ImportModuleId) -> Option<&mut ImportModule> {
        self.modules.get_mut(id)
    }

    /// Finds a module by name (first match).
    pub fn find_module_by_name(&self, name: &str) -> Option<&ImportModule> {
        self.modules.values().find(|m| m.name == name)
    }

    /// Finds the first imported symbol whose value equals `addr`, searching
    /// modules in order and symbols within each module in order.
    pub fn find_by_address(&self, addr: u64) -> Option<&Symbol> {
        self.modules
            .values()
            .flat_map(|m| m.symbols.values())
            .find(|s| s.val() == addr)
    }

    /// Flat iteration across every module's symbols: module order is
    /// preserved, within-module insertion order is preserved, and modules
    /// with no symbols are skipped entirely — matching
    /// `backend_get_first_import`/`backend_get_next_import`'s behavior,
    /// but expressed as a plain iterator instead of a two-level cursor
    /// pair stored on the object.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.modules.values().flat_map(|m| m.symbols.values())
    }

    /// The total number of imported symbols across every module, computed
    /// on demand (no cached total), matching `backend_import_symbol_count`.
    pub fn symbol_count(&self) -> usize {
        self.iter().count()
    }

    /// Iterates modules in insertion order.
    pub fn modules(&self) -> impl Iterator<Item = &ImportModule> {
        self.modules.values()
    }
}

impl Symbol {
    /// Constructs the distinct kind of [`Symbol`] an import module holds:
    /// `Function` kind, `GLOBAL | EXTERNAL` flags, unsized, unattributed
    /// to any section.
    pub(crate) fn imported(name: &str, addr: u64) -> Self {
        Symbol::new_for_import(name, addr, SymbolKind::Function, SymbolFlags::GLOBAL | SymbolFlags::EXTERNAL)
    }
}
