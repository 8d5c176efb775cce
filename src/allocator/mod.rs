//! Component 4 — the allocator / table (§4.4): the single synchronized
//! facade combining the arena, the block metadata store, and the free list.
//!
//! Every public method here acquires one `parking_lot::Mutex` before
//! touching any of the three internal components and releases it before
//! returning (§5) — there are no nested lock acquisitions and no I/O while
//! the lock is held.

mod descriptor;
mod free_list;

pub use descriptor::RegionDescriptor;
pub use free_list::FreeSpan;

use parking_lot::Mutex;
use std::time::Instant;

use crate::arena::Arena;
use crate::core::error::AllocatorError;
use crate::types::{codec, RegionId, TypeTag};
use descriptor::DescriptorStore;
use free_list::FreeList;

struct Inner {
    arena: Arena,
    descriptors: DescriptorStore,
    free_list: FreeList,
    bump_offset: u32,
    next_id: u32,
}

/// One live region as rendered for diagnostics: its descriptor plus its
/// current value, decoded the same way `read` would.
pub struct DumpEntry {
    /// The region's metadata.
    pub descriptor: RegionDescriptor,
    /// The region's current value in external string form.
    pub value: String,
}

/// A consistent point-in-time view of the allocator, used by the diagnostic
/// dump writer (§4.4's `snapshot`).
pub struct AllocatorSnapshot {
    /// Every currently live region, with its decoded value.
    pub descriptors: Vec<DumpEntry>,
    /// Every currently free span, in offset order.
    pub free_list: Vec<FreeSpan>,
    /// The current high-water mark of the arena.
    pub bump_offset: u32,
    /// Total arena size in bytes.
    pub arena_size: u32,
}

/// The allocator: owns the arena and is the sole synchronization boundary
/// for it. Clonable cheaply via `Arc` at the call site — the allocator
/// itself is `Send + Sync` and meant to be shared, not cloned.
pub struct Allocator {
    inner: Mutex<Inner>,
}

impl Allocator {
    /// Creates a new allocator over a freshly reserved arena of `arena_size`
    /// bytes.
    pub fn new(arena_size: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                arena: Arena::new(arena_size),
                descriptors: DescriptorStore::new(),
                free_list: FreeList::new(),
                bump_offset: 0,
                next_id: 1,
            }),
        }
    }

    /// `allocate(type_tag, size) -> id` (§4.4).
    ///
    /// Tries the free list first (first-fit), then the unallocated suffix of
    /// the arena. Fails with `OutOfMemory` without consuming free-list space
    /// or advancing `bump_offset` if neither can satisfy the request. Fails
    /// with `TooLarge` if `size` is smaller than `type_tag`'s fixed encoded
    /// width — such a region could never hold a value of its declared type,
    /// and would otherwise make every later `read`/`write` on it panic.
    pub fn allocate(&self, type_tag: TypeTag, size: u32) -> Result<RegionId, AllocatorError> {
        if size == 0 {
            return Err(AllocatorError::ZeroSize);
        }
        if let Some(fixed) = type_tag.fixed_size() {
            if size < fixed as u32 {
                return Err(AllocatorError::TooLarge);
            }
        }

        let mut inner = self.inner.lock();
        let arena_size = inner.arena.len() as u32;

        let offset = if let Some(offset) = inner.free_list.take_first_fit(size) {
            offset
        } else if inner.bump_offset.checked_add(size).is_some_and(|end| end <= arena_size) {
            let offset = inner.bump_offset;
            inner.bump_offset += size;
            offset
        } else {
            return Err(AllocatorError::OutOfMemory);
        };

        let id = RegionId(inner.next_id);
        inner.next_id += 1;

        inner.descriptors.insert(RegionDescriptor {
            id,
            type_tag,
            offset,
            size,
            refcount: 1,
            created_at: Instant::now(),
            written_len: 0,
        });

        Ok(id)
    }

    /// `read(id) -> (type_tag, encoded_value)` (§4.4).
    pub fn read(&self, id: RegionId) -> Result<(TypeTag, String), AllocatorError> {
        let inner = self.inner.lock();
        let descriptor = inner.descriptors.get(id).ok_or(AllocatorError::NotFound)?;
        let region = inner
            .arena
            .as_bytes(descriptor.offset as usize, descriptor.size as usize);
        let value = codec::decode(descriptor.type_tag, region, descriptor.logical_len() as usize);
        Ok((descriptor.type_tag, value))
    }

    /// `write(id, encoded_value)` (§4.4).
    pub fn write(&self, id: RegionId, value: &str) -> Result<(), AllocatorError> {
        let mut inner = self.inner.lock();
        let descriptor = inner.descriptors.get(id).ok_or(AllocatorError::NotFound)?;
        let (type_tag, offset, size) = (descriptor.type_tag, descriptor.offset, descriptor.size);

        let region = inner.arena.as_bytes_mut(offset as usize, size as usize);
        let written_len = codec::encode(type_tag, value, region)? as u32;

        // Re-borrow: `arena.as_bytes_mut` above held `inner` mutably borrowed
        // through a disjoint field, so the descriptor lookup must be redone
        // after the encode to record the string's logical length.
        if let Some(descriptor) = inner.descriptors.get_mut(id) {
            descriptor.written_len = written_len;
        }
        Ok(())
    }

    /// `inc_ref(id)` (§4.4). A no-op if the id is absent.
    pub fn inc_ref(&self, id: RegionId) {
        let mut inner = self.inner.lock();
        if let Some(descriptor) = inner.descriptors.get_mut(id) {
            descriptor.refcount += 1;
        }
    }

    /// `dec_ref(id)` (§4.4). A no-op if the id is absent; saturates at zero,
    /// never underflows.
    pub fn dec_ref(&self, id: RegionId) {
        let mut inner = self.inner.lock();
        if let Some(descriptor) = inner.descriptors.get_mut(id) {
            descriptor.refcount = descriptor.refcount.saturating_sub(1);
        }
    }

    /// `remove(id)` (§4.4) — sweeper-only, not exposed over RPC. Deletes the
    /// descriptor and releases its byte range to the free list. Callers must
    /// already hold `inner`'s lock (see `sweep`, the sweeper's only entry
    /// point into removal).
    fn remove_locked(inner: &mut Inner, id: RegionId) {
        if let Some(descriptor) = inner.descriptors.remove(id) {
            inner.free_list.release(descriptor.offset, descriptor.size);
        }
    }

    /// Collects every region with `refcount == 0` and removes it, in one
    /// continuous lock hold (§4.5 steps 2-3, sweeper-only, not exposed over
    /// RPC). Returns the removed ids.
    ///
    /// The single lock acquisition is load-bearing: it is what makes
    /// resurrection (`inc_ref` on a reclaimable region racing the sweeper,
    /// §4.5/§9/S5) safe. Collecting the zero-refcount ids and removing them
    /// as two separately-locked calls would let an RPC thread's `inc_ref`
    /// land in the gap between them, and the sweeper would still delete the
    /// now-live region regardless — breaking the resurrection guarantee and
    /// invariant 6 of §3.
    pub(crate) fn sweep(&self) -> Vec<RegionId> {
        let mut inner = self.inner.lock();
        let ids = inner.descriptors.zero_refcount_ids();
        for id in &ids {
            Self::remove_locked(&mut inner, *id);
        }
        ids
    }

    /// `snapshot()` (§4.4): an atomic view for the diagnostic dump writer.
    pub fn snapshot(&self) -> AllocatorSnapshot {
        let inner = self.inner.lock();
        let descriptors = inner
            .descriptors
            .snapshot()
            .into_iter()
            .map(|descriptor| {
                let region = inner
                    .arena
                    .as_bytes(descriptor.offset as usize, descriptor.size as usize);
                let value = codec::decode(descriptor.type_tag, region, descriptor.logical_len() as usize);
                DumpEntry { descriptor, value }
            })
            .collect();
        AllocatorSnapshot {
            descriptors,
            free_list: inner.free_list.snapshot(),
            bump_offset: inner.bump_offset,
            arena_size: inner.arena.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_basic_create_set_get() {
        let allocator = Allocator::new(1024 * 1024);
        let id = allocator.allocate(TypeTag::Int32, 32).unwrap();
        assert_eq!(id, RegionId(1));
        allocator.write(id, "42").unwrap();
        let (tag, value) = allocator.read(id).unwrap();
        assert_eq!(tag, TypeTag::Int32);
        assert_eq!(value, "42");
    }

    #[test]
    fn s3_sequential_dec_ref_and_sweep_coalesces() {
        let allocator = Allocator::new(96);
        let a = allocator.allocate(TypeTag::Int32, 32).unwrap();
        let b = allocator.allocate(TypeTag::Int32, 32).unwrap();
        let c = allocator.allocate(TypeTag::Int32, 32).unwrap();

        allocator.dec_ref(b);
        allocator.sweep();
        assert_eq!(
            allocator.snapshot().free_list,
            vec![FreeSpan { offset: 32, size: 32 }]
        );

        allocator.dec_ref(a);
        allocator.sweep();
        assert_eq!(allocator.snapshot().free_list, vec![FreeSpan { offset: 0, size: 64 }]);

        allocator.dec_ref(c);
        allocator.sweep();
        assert_eq!(allocator.snapshot().free_list, vec![FreeSpan { offset: 0, size: 96 }]);
    }

    #[test]
    fn s4_first_fit_reuse_after_coalescing() {
        let allocator = Allocator::new(96);
        let a = allocator.allocate(TypeTag::Int32, 32).unwrap();
        let b = allocator.allocate(TypeTag::Int32, 32).unwrap();
        let c = allocator.allocate(TypeTag::Int32, 32).unwrap();
        for id in [a, b, c] {
            allocator.dec_ref(id);
        }
        allocator.sweep();

        let d = allocator.allocate(TypeTag::Int32, 64).unwrap();
        assert_eq!(d, RegionId(4));
        assert_eq!(allocator.snapshot().free_list, vec![FreeSpan { offset: 64, size: 32 }]);
    }

    #[test]
    fn s5_resurrection_before_sweep() {
        let allocator = Allocator::new(1024);
        let id = allocator.allocate(TypeTag::Int32, 32).unwrap();
        allocator.dec_ref(id);
        allocator.inc_ref(id);

        allocator.sweep();
        assert!(allocator.read(id).is_ok());
    }

    #[test]
    fn s6_exhaustion_then_partial_then_full_coalesce() {
        let allocator = Allocator::new(128);
        let ids: Vec<_> = (0..4)
            .map(|_| allocator.allocate(TypeTag::Int32, 32).unwrap())
            .collect();
        assert_eq!(
            allocator.allocate(TypeTag::Int32, 32).unwrap_err(),
            AllocatorError::OutOfMemory
        );

        // Non-adjacent pair: ids[0] (offset 0) and ids[2] (offset 64).
        allocator.dec_ref(ids[0]);
        allocator.dec_ref(ids[2]);
        allocator.sweep();
        assert_eq!(
            allocator.allocate(TypeTag::Int32, 64).unwrap_err(),
            AllocatorError::OutOfMemory
        );

        // Adjacent pair: ids[1] (offset 32) and ids[3] (offset 96), neither
        // of which neighbors an existing hole except through each other's
        // already-freed neighbors above — free after this step is fully
        // coalesced to one 128-byte span.
        allocator.dec_ref(ids[1]);
        allocator.dec_ref(ids[3]);
        allocator.sweep();
        assert!(allocator.allocate(TypeTag::Int32, 64).is_ok());
    }

    #[test]
    fn dec_ref_on_unknown_id_is_silent_noop() {
        let allocator = Allocator::new(1024);
        allocator.dec_ref(RegionId(999));
        allocator.inc_ref(RegionId(999));
    }

    #[test]
    fn allocate_zero_size_rejected_without_side_effects() {
        let allocator = Allocator::new(1024);
        assert_eq!(
            allocator.allocate(TypeTag::Int32, 0).unwrap_err(),
            AllocatorError::ZeroSize
        );
        let snapshot = allocator.snapshot();
        assert_eq!(snapshot.bump_offset, 0);
        assert!(snapshot.descriptors.is_empty());
    }

    #[test]
    fn write_rejects_bad_encoding_and_too_large_string() {
        let allocator = Allocator::new(1024);
        let int_id = allocator.allocate(TypeTag::Int32, 4).unwrap();
        assert_eq!(
            allocator.write(int_id, "not-a-number").unwrap_err(),
            AllocatorError::BadEncoding
        );

        let str_id = allocator.allocate(TypeTag::String, 3).unwrap();
        assert_eq!(
            allocator.write(str_id, "abcd").unwrap_err(),
            AllocatorError::TooLarge
        );
    }

    #[test]
    fn string_round_trip_tracks_written_len() {
        let allocator = Allocator::new(1024);
        let id = allocator.allocate(TypeTag::String, 16).unwrap();
        allocator.write(id, "hello").unwrap();
        let (_, value) = allocator.read(id).unwrap();
        assert_eq!(value, "hello");
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let allocator = Allocator::new(1024);
        let a = allocator.allocate(TypeTag::Int32, 4).unwrap();
        let b = allocator.allocate(TypeTag::Int32, 4).unwrap();
        assert!(b.0 > a.0);
    }

    #[test]
    fn allocate_rejects_region_smaller_than_numeric_type_width() {
        let allocator = Allocator::new(1024);
        assert_eq!(
            allocator.allocate(TypeTag::Int32, 1).unwrap_err(),
            AllocatorError::TooLarge
        );
        assert_eq!(
            allocator.allocate(TypeTag::Float64, 4).unwrap_err(),
            AllocatorError::TooLarge
        );
        // Strings have no fixed width: any positive size is accepted.
        assert!(allocator.allocate(TypeTag::String, 1).is_ok());

        let snapshot = allocator.snapshot();
        assert_eq!(snapshot.bump_offset, 1);
        assert_eq!(snapshot.descriptors.len(), 1);
    }

    #[test]
    fn sweep_does_not_delete_a_region_resurrected_mid_scan() {
        // `sweep` must hold one continuous lock across collecting
        // zero-refcount ids and removing them: `dec_ref` followed by
        // `inc_ref` before `sweep` runs must leave the region alive.
        let allocator = Allocator::new(1024);
        let id = allocator.allocate(TypeTag::Int32, 32).unwrap();
        allocator.dec_ref(id);
        allocator.inc_ref(id);

        let removed = allocator.sweep();
        assert!(removed.is_empty());
        assert!(allocator.read(id).is_ok());
    }
}
