//! Error taxonomy for the conversion engine.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by registry lookups, format parsing, and fish construction.
///
/// `process` itself is infallible per the executor contract: once a fish
/// exists it always returns `n`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Lookup of an unregistered type/component/model/format/space.
    #[error("unknown name: {0}")]
    UnknownName(String),

    /// The encoding string does not resolve to a valid pixel format.
    #[error("invalid format encoding: {0}")]
    InvalidFormat(String),

    /// The planner could not assemble a chain from source to destination.
    #[error("no conversion path from {from} to {to}")]
    NoPath { from: String, to: String },

    /// An out-of-range numeric parameter was supplied (e.g. palette count > 256).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Scratch or LUT allocation failed.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// The registry's mutation lock was poisoned by a panicking holder.
    #[error("registry lock poisoned")]
    RegistryPoisoned,

    /// Propagated from the external fish-cache loader.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
