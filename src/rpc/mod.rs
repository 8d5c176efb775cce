//! Component 8 — the RPC transport (§6): an HTTP+JSON realization of the
//! five wire methods, sitting directly on top of the allocator facade.
//!
//! Split the way this codebase splits its API layer: `dto` for wire
//! shapes, `handlers` for per-method translation, `routes` for the route
//! table, `server` for router assembly and the listener loop.

mod dto;
mod handlers;
mod routes;
mod server;

pub use server::start_server;

use std::path::PathBuf;
use std::sync::Arc;

use crate::allocator::Allocator;

/// Shared state every handler needs: the allocator and where to write
/// write-triggered dumps.
#[derive(Clone)]
pub struct AppState {
    /// The allocator backing every RPC method.
    pub allocator: Arc<Allocator>,
    /// Directory write-triggered dumps are written into (§6).
    pub dump_folder: PathBuf,
}
