//! Relocation-table operations (C6).
//!
//! Grounded on `backend_reloc`/`backend_add_relocation`/
//! `backend_find_reloc_by_offset`/`backend_lookup_reloc_type` in
//! `backend.c`, and on faerie's `Reloc` enum (see `mach.rs`'s
//! `RelocationBuilder`, which carries a `goblin::mach::relocation::RelocType`
//! alongside an offset and a symbol reference — the same three-part shape
//! this table generalizes across formats).

use crate::sequence::{Id, OrderedTable};
use crate::symbol::SymbolId;

/// Weak reference to a [`Relocation`] inside the owning
/// [`crate::object::Object`].
pub type RelocationId = Id<Relocation>;

/// The kind of a [`Relocation`] (closed set).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RelocationType {
    /// Unclassified.
    #[default]
    None,
    /// An absolute address patch.
    Offset,
    /// A PC-relative patch.
    PcRelative,
    /// A PLT-relative patch.
    Plt,
}

impl RelocationType {
    /// Human-readable tag, matching `backend_lookup_reloc_type`.
    ///
    /// The original falls through to `"unknown"` for relocation-type
    /// values outside its enum; as with [`crate::symbol::SymbolKind`], that
    /// path is unreachable here since `RelocationType` is exhaustively
    /// matched.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelocationType::None => "none",
            RelocationType::Offset => "offset",
            RelocationType::PcRelative => "pc relative",
            RelocationType::Plt => "PLT relative",
        }
    }
}

/// A pending patch at `offset`, referencing a symbol by weak id.
#[derive(Debug, Clone)]
pub struct Relocation {
    offset: u64,
    kind: RelocationType,
    addend: i64,
    symbol: Option<SymbolId>,
}

impl Relocation {
    /// Address where the patch is applied.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Relocation kind.
    pub fn kind(&self) -> RelocationType {
        self.kind
    }

    /// Signed addend.
    pub fn addend(&self) -> i64 {
        self.addend
    }

    /// Weak reference into the symbol table, or `None` if the relocation's
    /// target symbol has not (or no longer) resolves to a live entry. The
    /// relocation table does not own the symbol, and cannot outlive the
    /// symbol table since both belong to the same [`crate::object::Object`].
    pub fn symbol(&self) -> Option<SymbolId> {
        self.symbol
    }
}

/// The relocation table owned by an [`crate::object::Object`].
#[derive(Debug, Default)]
pub struct RelocationTable {
    relocations: OrderedTable<Relocation>,
}

impl RelocationTable {
    /// Creates an empty relocation table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of relocations.
    pub fn len(&self) -> usize {
        self.relocations.len()
    }

    /// True if there are no relocations.
    pub fn is_empty(&self) -> bool {
        self.relocations.is_empty()
    }

    /// Appends a new relocation. `symbol` is `None` when the relocation's
    /// target symbol is not yet resolved.
    pub fn add_relocation(
        &mut self,
        offset: u64,
        kind: RelocationType,
        addend: i64,
        symbol: Option<SymbolId>,
    ) -> RelocationId {
        self.relocations.append(Relocation {
            offset,
            kind,
            addend,
            symbol,
        })
    }

    /// First relocation exactly at `offset`.
    pub fn find_by_offset(&self, offset: u64) -> Option<&Relocation> {
        self.relocations.values().find(|r| r.offset == offset)
    }

    /// Iterates all relocations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Relocation> {
        self.relocations.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;

    #[test]
    fn find_by_offset_first_match() {
        let mut symbols = SymbolTable::new();
        let sym = symbols.add_symbol(
            Some("target"),
            0,
            crate::symbol::SymbolKind::Function,
            0,
            crate::symbol::SymbolFlags::empty(),
            None,
        );
        let mut t = RelocationTable::new();
        t.add_relocation(0x10, RelocationType::Offset, 0, Some(sym));
        t.add_relocation(0x20, RelocationType::PcRelative, -4, Some(sym));
        assert_eq!(t.find_by_offset(0x20).unwrap().kind(), RelocationType::PcRelative);
        assert_eq!(t.find_by_offset(0x10).unwrap().symbol(), Some(sym));
        assert!(t.find_by_offset(0x30).is_none());
    }

    #[test]
    fn relocation_symbol_may_be_unresolved() {
        let mut t = RelocationTable::new();
        t.add_relocation(0x10, RelocationType::Offset, 0, None);
        assert_eq!(t.find_by_offset(0x10).unwrap().symbol(), None);
    }

    #[test]
    fn type_strings_match_original_mapping() {
        assert_eq!(RelocationType::None.as_str(), "none");
        assert_eq!(RelocationType::Offset.as_str(), "offset");
        assert_eq!(RelocationType::PcRelative.as_str(), "pc relative");
        assert_eq!(RelocationType::Plt.as_str(), "PLT relative");
    }
}
