//! Component 2 — the block metadata store (§4.2): the mapping from region id
//! to its descriptor.

use std::collections::HashMap;
use std::time::Instant;

use crate::types::{RegionId, TypeTag};

/// The server-side metadata record for one live region (§3).
#[derive(Debug, Clone)]
pub struct RegionDescriptor {
    /// Monotonically increasing non-zero id, never reused within a process
    /// lifetime.
    pub id: RegionId,
    /// Selects the encoding used by typed read/write and diagnostic
    /// rendering.
    pub type_tag: TypeTag,
    /// Byte offset into the arena.
    pub offset: u32,
    /// Byte length of the region (its capacity, not its logical content
    /// length).
    pub size: u32,
    /// Outstanding client-side handle count. Zero means eligible for
    /// reclamation but not yet reclaimed.
    pub refcount: u32,
    /// Informational only; never consulted for correctness.
    pub created_at: Instant,
    /// For `TypeTag::String` regions, the number of bytes of `size` that
    /// currently hold a meaningful value (resolves the `string` size open
    /// question, §9). Unused for numeric tags, whose length is always
    /// `type_tag.fixed_size()`.
    pub written_len: u32,
}

impl RegionDescriptor {
    /// The number of meaningful bytes to read back for this region.
    pub fn logical_len(&self) -> u32 {
        self.type_tag.fixed_size().map(|n| n as u32).unwrap_or(self.written_len)
    }
}

/// Mapping from region id to descriptor. Only the allocator ever mutates it;
/// it has no synchronization of its own (the allocator's single lock covers
/// it, per §5).
#[derive(Debug, Default)]
pub struct DescriptorStore {
    descriptors: HashMap<RegionId, RegionDescriptor>,
}

impl DescriptorStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a freshly allocated descriptor.
    pub fn insert(&mut self, descriptor: RegionDescriptor) {
        self.descriptors.insert(descriptor.id, descriptor);
    }

    /// Looks up a descriptor by id.
    pub fn get(&self, id: RegionId) -> Option<&RegionDescriptor> {
        self.descriptors.get(&id)
    }

    /// Looks up a descriptor by id, mutably.
    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut RegionDescriptor> {
        self.descriptors.get_mut(&id)
    }

    /// Removes a descriptor, returning it if it existed.
    pub fn remove(&mut self, id: RegionId) -> Option<RegionDescriptor> {
        self.descriptors.remove(&id)
    }

    /// Ids of every descriptor whose refcount has reached zero.
    pub fn zero_refcount_ids(&self) -> Vec<RegionId> {
        self.descriptors
            .values()
            .filter(|d| d.refcount == 0)
            .map(|d| d.id)
            .collect()
    }

    /// A consistent shallow copy of every live descriptor, for diagnostics
    /// (§4.4's `snapshot`).
    pub fn snapshot(&self) -> Vec<RegionDescriptor> {
        self.descriptors.values().cloned().collect()
    }
}
