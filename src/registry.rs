//! Backend registry (C3).
//!
//! Grounded on `backend_init`/`backend_register`/`backend_lookup_target`/
//! `backend_get_first_target`/`backend_get_next_target`/`backend_read`/
//! `backend_write` in `backend.c`. The original's array-of-function-pointers
//! `backend_ops` struct becomes a `Box<dyn Backend>` trait object per the
//! §9 redesign; the `backend_get_first_target`/`backend_get_next_target`
//! cursor pair becomes [`Registry::targets`], a plain iterator.

use crate::error::Error;
use crate::object::Object;
use crate::target::ObjectType;
use log::{debug, warn};

/// The compile-time maximum number of backends a [`Registry`] will accept,
/// matching `BACKEND_COUNT` in the original (there, sized to the number of
/// compiled-in backends: mz, pe, elf32, elf64).
pub const MAX_BACKENDS: usize = 4;

/// What a format plug-in exposes to the registry.
///
/// `read` and `write` are optional capabilities: a backend that only
/// supports one direction simply leaves the other at its default "not
/// supported" implementation, matching invariant 4 in the spec ("a backend
/// without `write` may still be registered; writes return a distinct
/// error").
pub trait Backend {
    /// Display name used by [`Registry::lookup_target`] and
    /// [`Registry::targets`].
    fn name(&self) -> &str;

    /// The format tag this backend reads/writes.
    fn format(&self) -> ObjectType;

    /// Attempts to recognize and parse `filename`. Returns `None` if this
    /// backend does not recognize the file (not an error — just a miss).
    fn read(&self, _filename: &str) -> Option<Object> {
        None
    }

    /// Attempts to serialize `object` to `filename`. The default
    /// implementation reports that this backend does not support writing.
    fn write(&self, _object: &Object, _filename: &str) -> Result<(), Error> {
        Err(Error::NoWriter)
    }
}

/// Holds the installed backend descriptors and dispatches detection,
/// reading, and writing across them.
#[derive(Default)]
pub struct Registry {
    backends: Vec<Box<dyn Backend>>,
}

impl Registry {
    /// An empty registry with no backends installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor matching `backend_init`: self-registers every
    /// compile-time-known backend exactly once, in a fixed order, then
    /// returns the resulting registry. Individual registration failures are
    /// non-fatal and only logged, matching the original's "never fails"
    /// contract.
    ///
    /// This core crate ships no concrete MZ/PE/ELF backends itself (see the
    /// crate root docs), so today `init()` has nothing to self-register and
    /// is equivalent to [`Registry::new`]. It exists so that a binary
    /// linking this crate together with format-specific backend crates can
    /// call `Registry::init()` once at startup the way the original calls
    /// `backend_init()`, without needing to know this crate currently has no
    /// built-in backends of its own.
    pub fn init() -> Self {
        Self::new()
    }

    /// Registers `backend`, matching `backend_register`.
    ///
    /// Rejects the backend (logging a diagnostic, not panicking) if the
    /// registry is already at [`MAX_BACKENDS`] or the backend's name is
    /// empty.
    pub fn register(&mut self, backend: Box<dyn Backend>) -> Result<(), Error> {
        if self.backends.len() >= MAX_BACKENDS {
            warn!(
                "can't accept any more backends - sorry, we're full! (MAX_BACKENDS={})",
                MAX_BACKENDS
            );
            return Err(Error::RegistryFull { max: MAX_BACKENDS });
        }
        if backend.name().is_empty() {
            warn!("you must implement the name() function");
            return Err(Error::InvalidBackend(String::new()));
        }
        debug!("registering backend {}", backend.name());
        self.backends.push(backend);
        Ok(())
    }

    /// Number of currently registered backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// True if no backends are registered.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Maps a backend's declared display name to its format tag, matching
    /// `backend_lookup_target`. Returns [`ObjectType::None`] on no match or
    /// empty input.
    pub fn lookup_target(&self, name: &str) -> ObjectType {
        if name.is_empty() {
            return ObjectType::None;
        }
        self.backends
            .iter()
            .find(|b| b.name() == name)
            .map(|b| b.format())
            .unwrap_or(ObjectType::None)
    }

    /// Iterates the display names of every registered backend, in
    /// registration order. Replaces the original's shared
    /// `backend_get_first_target`/`backend_get_next_target` cursor pair
    /// with a plain iterator (§9 redesign).
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.backends.iter().map(|b| b.name())
    }

    /// A blank object, matching `backend_create`.
    pub fn create(&self) -> Object {
        Object::new()
    }

    /// Offers `filename` to each backend in registration order; returns
    /// the first one that recognizes it.
    pub fn read(&self, filename: &str) -> Result<Object, Error> {
        self.backends
            .iter()
            .find_map(|b| b.read(filename))
            .ok_or(Error::NoBackend)
    }

    /// Finds the backend whose format matches `object.object_type()` and
    /// delegates to its writer.
    pub fn write(&self, object: &Object) -> Result<(), Error> {
        let backend = self
            .backends
            .iter()
            .find(|b| b.format() == object.object_type())
            .ok_or(Error::NoBackend)?;
        backend.write(object, object.name())
    }
}
