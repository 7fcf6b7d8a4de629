//! Error taxonomy for the object-file core.
//!
//! The original C backend reported failures as integer return codes
//! (`-1`, `-2`) or null pointers, decided ad hoc per function. This rewrite
//! collects the same taxonomy into a single enum so callers can match on it
//! with `?` instead of re-deriving "what does `-2` mean here" at each site.

use thiserror::Error;

/// Errors produced by the registry and object-model operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No registered backend recognized the input file.
    #[error("no backend recognizes this file")]
    NoBackend,

    /// A backend matched the object's format tag but does not implement a
    /// writer.
    #[error("backend for this format does not support writing")]
    NoWriter,

    /// `Registry::register` was called after `MAX_BACKENDS` backends were
    /// already registered.
    #[error("registry is full (max {max} backends)")]
    RegistryFull {
        /// The configured maximum (see [`crate::registry::MAX_BACKENDS`]).
        max: usize,
    },

    /// A backend descriptor failed the minimal validity check (empty name).
    #[error("backend `{0}` did not provide a name")]
    InvalidBackend(String),

    /// The underlying backend reported a failure while reading or writing.
    #[error("backend I/O failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}
