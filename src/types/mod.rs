//! Wire-level types shared between the allocator and the RPC transport:
//! the region type tag enumeration and the string <-> bytes codec it selects.

mod codec;
mod tag;

pub use codec::{decode, encode};
pub use tag::TypeTag;

/// Identifier of a live region, issued by the allocator and never reused
/// within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[repr(transparent)]
pub struct RegionId(pub u32);

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
