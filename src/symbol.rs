//! Symbol-table operations (C4).
//!
//! Grounded on `backend_symbol` and the `backend_add_symbol`/
//! `backend_find_symbol_by_*`/`backend_merge_symbol`/`backend_split_symbol`/
//! `backend_sort_symbols`/`backend_remove_symbol_by_name`/
//! `backend_get_symbol_index` family in `backend.c`, with the cursor-based
//! `backend_get_first_symbol`/`backend_get_next_symbol` pair replaced by a
//! borrowing iterator per the §9 redesign.

use crate::section::SectionId;
use crate::sequence::{Id, OrderedTable};
use bitflags::bitflags;
use log::debug;
use std::cmp::Ordering;

/// Weak reference to a [`Symbol`] inside the owning [`crate::object::Object`].
pub type SymbolId = Id<Symbol>;

/// The kind of a [`Symbol`] (closed set).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SymbolKind {
    /// Unclassified.
    #[default]
    None,
    /// Names the source file the symbol was attributed to.
    File,
    /// Names a section itself (used by [`crate::section::SectionTable::iter_by_kind`]
    /// consumers to find a section's own symbol via
    /// [`crate::object::Object::section_symbol`]).
    Section,
    /// A function/code symbol.
    Function,
    /// A data symbol.
    Object,
}

impl SymbolKind {
    /// Lowercase display name, matching `backend_symbol_type_to_str`.
    ///
    /// The original's `default:` case in that switch returns `"Unknown"`
    /// for integer values outside the enum's range; that path is
    /// unreachable here because `SymbolKind` is a closed, exhaustively
    /// matched Rust enum — there is no numeric value a live `SymbolKind`
    /// can hold that isn't one of these five.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::None => "none",
            SymbolKind::File => "file",
            SymbolKind::Section => "section",
            SymbolKind::Function => "function",
            SymbolKind::Object => "object",
        }
    }
}

bitflags! {
    /// Symbol flag bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct SymbolFlags: u32 {
        /// Globally visible (external linkage).
        const GLOBAL = 1 << 0;
        /// File-local visibility.
        const LOCAL = 1 << 1;
        /// Defined outside this object (an import).
        const EXTERNAL = 1 << 2;
    }
}

/// A named value/address within an object.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    val: u64,
    kind: SymbolKind,
    size: u64,
    flags: SymbolFlags,
    section: Option<SectionId>,
    src: Option<String>,
}

impl Symbol {
    fn new(
        name: Option<&str>,
        val: u64,
        kind: SymbolKind,
        size: u64,
        flags: SymbolFlags,
        section: Option<SectionId>,
    ) -> Self {
        // The original defaults a null name to the single character "!"
        // (`if (!name) name = "!";` in `backend_add_symbol`).
        let name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => "!".to_string(),
        };
        Symbol {
            name,
            val,
            kind,
            size,
            flags,
            section,
            src: None,
        }
    }

    /// Symbol name (never empty — defaults to `"!"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address/value.
    pub fn val(&self) -> u64 {
        self.val
    }

    /// Symbol kind.
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Size in bytes (zero for unsized symbols).
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Flag bits.
    pub fn flags(&self) -> SymbolFlags {
        self.flags
    }

    /// Weak reference to the owning section, if attributed to one.
    pub fn section(&self) -> Option<SectionId> {
        self.section
    }

    /// Optional source-file attribution.
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    fn contains(&self, val: u64) -> bool {
        (self.size == 0 && self.val == val) || (val >= self.val && val < self.val + self.size)
    }

    /// Constructs an imported symbol: unsized, unattributed to any section.
    /// Used by [`crate::import::ImportModule::add_import_function`]; kept
    /// crate-private because imported symbols follow a fixed shape the
    /// import table owns, not something a general caller should assemble
    /// by hand.
    pub(crate) fn new_for_import(name: &str, val: u64, kind: SymbolKind, flags: SymbolFlags) -> Self {
        Symbol::new(Some(name), val, kind, 0, flags, None)
    }
}

/// The symbol table owned by an [`crate::object::Object`].
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: OrderedTable<Symbol>,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True if the table holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Appends a new symbol to the table.
    pub fn add_symbol(
        &mut self,
        name: Option<&str>,
        val: u64,
        kind: SymbolKind,
        size: u64,
        flags: SymbolFlags,
        section: Option<SectionId>,
    ) -> SymbolId {
        let symbol = Symbol::new(name, val, kind, size, flags, section);
        debug!("adding symbol {} = 0x{:x} ({:?})", symbol.name, val, kind);
        self.symbols.append(symbol)
    }

    /// Finds the first symbol with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&Symbol> {
        self.symbols.values().find(|s| s.name == name)
    }

    /// Finds a symbol whose value/size interval contains `val`.
    pub fn find_by_val(&self, val: u64) -> Option<&Symbol> {
        self.symbols.values().find(|s| s.contains(val))
    }

    /// Finds the symbol at a zero-based position.
    pub fn find_by_index(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get_at(index).map(|(_, s)| s)
    }

    /// Finds a symbol whose value/size interval contains `val` and whose
    /// kind matches `kind`.
    pub fn find_by_val_and_kind(&self, val: u64, kind: SymbolKind) -> Option<&Symbol> {
        self.symbols
            .values()
            .find(|s| s.contains(val) && s.kind == kind)
    }

    /// Returns the symbol with the greatest `val <= target`, assuming the
    /// table is sorted in value-ascending order (see [`Self::sort_symbols`]).
    ///
    /// This precondition is documented, not enforced — matching
    /// `backend_find_nearest_symbol`'s contract in the original, which also
    /// never validated it. Re-sorting defensively on every lookup would
    /// hide an O(n log n) cost behind what looks like a cheap linear scan.
    pub fn find_nearest(&self, target: u64) -> Option<&Symbol> {
        let mut prev = None;
        for s in self.symbols.values() {
            if s.val > target {
                return prev;
            }
            prev = Some(s);
        }
        prev
    }

    /// The ordinal position of the symbol named by `id`, by identity, or
    /// `None` if `id` does not name a live entry (replaces the original's
    /// `(unsigned int)-1` sentinel).
    pub fn symbol_index(&self, id: SymbolId) -> Option<usize> {
        self.symbols.index_of(id)
    }

    /// Merges the symbol named by `id` into its predecessor in insertion
    /// order.
    ///
    /// The predecessor's size grows to `(sym.val + sym.size) - pred.val`,
    /// folding in any gap between the two. `id`'s entry is then removed.
    /// Returns the predecessor's id, or `id` unchanged if it names the
    /// first entry (nothing precedes it to merge into), or `None` if `id`
    /// does not name a live entry.
    pub fn merge_symbol(&mut self, id: SymbolId) -> Option<SymbolId> {
        let pred_id = match self.symbols.predecessor(id) {
            Some(p) => p,
            None => {
                // Either `id` is the first entry, or it doesn't exist.
                self.symbols.get(id)?;
                return Some(id);
            }
        };
        let sym = self.symbols.get(id)?.clone();
        let pred = self.symbols.get_mut(pred_id)?;
        let new_size = (sym.val + sym.size).saturating_sub(pred.val);
        debug!(
            "merging into {}: oldsize={} newsize={}",
            pred.name, pred.size, new_size
        );
        pred.size = new_size;
        debug!("removing {}", sym.name);
        self.symbols.remove(id);
        Some(pred_id)
    }

    /// Splits the symbol named by `id` at `val`.
    ///
    /// Inserts a new symbol immediately after `id`, named `name`, with
    /// `kind`/`flags` as given, inheriting `id`'s section and cloning its
    /// `src`. `val` must satisfy `sym.val < val < sym.val + sym.size`; as
    /// in the original, this precondition is not validated at runtime.
    /// Returns the new symbol's id, or `None` if `id` does not name a live
    /// entry.
    pub fn split_symbol(
        &mut self,
        id: SymbolId,
        name: &str,
        val: u64,
        kind: SymbolKind,
        flags: SymbolFlags,
    ) -> Option<SymbolId> {
        let sym = self.symbols.get(id)?.clone();
        let new_size = sym.size - (val - sym.val);
        let new_symbol = Symbol {
            name: name.to_string(),
            val,
            kind,
            size: new_size,
            flags,
            section: sym.section,
            src: sym.src.clone(),
        };
        let new_id = self.symbols.insert_after(id, new_symbol)?;
        let original = self.symbols.get_mut(id)?;
        original.size = val - original.val;
        Some(new_id)
    }

    /// Stable in-place sort using `cmp` (see
    /// [`crate::sequence::OrderedTable::sort_by`] for the efficiency note).
    pub fn sort_symbols<F>(&mut self, cmp: F)
    where
        F: FnMut(&Symbol, &Symbol) -> Ordering,
    {
        self.symbols.sort_by(cmp);
    }

    /// Removes the first symbol named `name`.
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        self.symbols
            .remove_first_matching(|s| s.name == name)
            .is_some()
    }

    /// Replaces the `src` attribution of the symbol named by `id`.
    pub fn set_source_file(&mut self, id: SymbolId, filename: impl Into<String>) {
        if let Some(sym) = self.symbols.get_mut(id) {
            sym.src = Some(filename.into());
        }
    }

    /// Resolves `id` to a borrowed [`Symbol`].
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Iterates all symbols in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Iterates symbols of a given kind, in insertion order.
    pub fn iter_by_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.values().filter(move |s| s.kind == kind)
    }
}
