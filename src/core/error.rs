//! Error types and handling for the remote memory manager
//!
//! This module defines every error the allocator, configuration loader, and
//! RPC transport can produce, following the layered error-enum style used
//! throughout this codebase: one top-level `Error` that wraps a focused
//! per-subsystem error via `#[from]`, so call sites can use `?` all the way
//! from a handler down into the allocator.

use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the remote memory manager
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Allocator errors (the only errors a client can ever observe)
    #[error("Allocator error: {0}")]
    Allocator(#[from] AllocatorError),

    /// I/O errors, e.g. failing to create the dump folder or write a dump file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Allocator error taxonomy (§7 of the spec). These are the only errors the
/// RPC transport ever needs to translate into a response; everything else
/// (`Error::Config`, `Error::Io`) can only happen at startup or during an
/// internal dump write, never as a consequence of a client request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocatorError {
    /// `allocate` cannot satisfy the request from either the free list or the
    /// bump region.
    #[error("out of memory")]
    OutOfMemory,

    /// The id does not refer to a live descriptor.
    #[error("region not found")]
    NotFound,

    /// The requested type tag is outside the recognized set.
    #[error("unknown type tag")]
    UnknownType,

    /// The provided string does not parse under the region's declared type.
    #[error("value does not match the region's type")]
    BadEncoding,

    /// A `string` payload would exceed the region's byte size, or the
    /// requested region is smaller than its declared type's fixed encoded
    /// width (a numeric region can never hold a value if it is, e.g., too
    /// small to ever hold a value of its declared type).
    #[error("value too large for region")]
    TooLarge,

    /// A request for a zero-byte region.
    #[error("requested size must be greater than zero")]
    ZeroSize,
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
