//! The container-format type tag (closed set), and the architecture tag.
//!
//! `backend.c` never spells out `backend_type` directly in the file kept in
//! the examples pack, but its shape is forced by
//! `DECLARE_BACKEND_INIT_FUNC(mz|pe|elf32|elf64)` and `backend_table[]`: a
//! closed enum with one variant per compiled-in backend, plus a "none"
//! sentinel for a blank object.

use std::fmt;

/// The container format of an [`crate::object::Object`].
///
/// Extending this set requires adding both a variant here and a backend
/// that reports it from [`crate::registry::Backend::format`]; `MAX_BACKENDS`
/// in `src/registry.rs` must be able to accommodate the addition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ObjectType {
    /// No format has been assigned yet (a freshly created, blank object).
    #[default]
    None,
    /// DOS MZ executable.
    Mz,
    /// Windows Portable Executable.
    Pe,
    /// 32-bit ELF.
    Elf32,
    /// 64-bit ELF.
    Elf64,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectType::None => "none",
            ObjectType::Mz => "mz",
            ObjectType::Pe => "pe",
            ObjectType::Elf32 => "elf32",
            ObjectType::Elf64 => "elf64",
        };
        f.write_str(s)
    }
}

/// The target architecture of an [`crate::object::Object`].
///
/// Re-exported from `target-lexicon` rather than re-invented: faerie
/// already depends on this crate for the same purpose (mapping a single
/// architecture tag across multiple backend encodings), so this core keeps
/// using it for the `arch` field instead of defining a bespoke enum that
/// would need its own extension story.
pub use target_lexicon::Architecture as Arch;
