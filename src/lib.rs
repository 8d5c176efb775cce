//! Remote memory manager: a server that owns a fixed arena and rents typed
//! regions to clients over RPC.
//!
//! The server reserves a single contiguous arena at startup and hands out
//! fixed-size, typed regions within it on request. Clients reference
//! regions by id and manage their lifetime with explicit reference
//! counting; a background sweeper reclaims any region whose refcount has
//! reached zero, coalescing its bytes back into the free list.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Main functional modules
pub mod allocator;
pub mod arena;
pub mod diagnostics;
pub mod rpc;
pub mod sweeper;
pub mod types;

// Re-export commonly used items for convenience
pub use core::{Config, Error, Result};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initializes tracing from the configured log level and format.
pub fn init_tracing(config: &core::config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    if config.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
