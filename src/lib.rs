//! A uniform in-memory model for executable and object files, together with
//! a pluggable backend registry.
//!
//! This crate normalizes DOS MZ, Windows PE, and 32/64-bit ELF files into a
//! single [`Object`] graph — sections, symbols, relocations, and imports,
//! with typed cross-references between them — and exposes the read/modify/
//! write operations that graph needs to support downstream transformations
//! (symbol splitting, merging, sorting, re-sectioning).
//!
//! Concrete format codecs (the actual MZ/PE/ELF32/ELF64 byte encoders and
//! decoders) are not part of this crate: it defines the [`Backend`] trait
//! and [`Registry`] they plug into, not the plug-ins themselves.
//!
//! ```
//! use objcore::{Object, ObjectType};
//! use objcore::symbol::{SymbolKind, SymbolFlags};
//!
//! let mut obj = Object::new();
//! obj.set_name("a.out");
//! obj.set_object_type(ObjectType::Elf64);
//! obj.symbols_mut().add_symbol(
//!     Some("main"),
//!     0x401000,
//!     SymbolKind::Function,
//!     0x20,
//!     SymbolFlags::GLOBAL,
//!     None,
//! );
//! assert_eq!(obj.symbols().find_by_name("main").unwrap().val(), 0x401000);
//! ```

pub mod error;
pub mod import;
pub mod object;
pub mod registry;
pub mod relocation;
pub mod section;
pub mod sequence;
pub mod symbol;
pub mod target;

pub use error::Error;
pub use object::Object;
pub use registry::{Backend, Registry, MAX_BACKENDS};
pub use target::{Arch, ObjectType};
