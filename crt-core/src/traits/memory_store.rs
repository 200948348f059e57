use std::sync::Arc;

use crate::errors::CrtResult;
use crate::ids::{MemoryId, ThreadId};
use crate::models::Memory;

/// The durable memory store (C3) — spec §4.3.
pub trait MemoryStore: Send + Sync {
    /// Persist a new memory, assigning its id. Durable before return.
    fn put(&self, memory: crate::models::NewMemory) -> CrtResult<Memory>;

    /// Persist an already-constructed `Memory` (id included). Used by the
    /// session coordinator when a memory's id must be known before it is
    /// durable — e.g. to build a `LedgerEntry` referencing it within the
    /// same atomic turn commit (spec §9 "steps 2-5 must be atomic").
    fn insert(&self, memory: Memory) -> CrtResult<()>;

    fn get(&self, id: &MemoryId) -> CrtResult<Option<Memory>>;

    /// Newest-to-oldest memories for `(thread, slot)`.
    fn by_slot(
        &self,
        thread_id: &ThreadId,
        slot: &str,
        include_deprecated: bool,
    ) -> CrtResult<Vec<Memory>>;

    /// Top-k belief-lane candidates by cosine similarity to `vector`.
    fn candidates(
        &self,
        thread_id: &ThreadId,
        vector: &[f32],
        k: usize,
        include_deprecated: bool,
    ) -> CrtResult<Vec<Memory>>;

    /// Idempotent; fails with `StoreError::ConflictingDeprecation` if the
    /// memory is already deprecated for a different reason.
    fn deprecate(&self, id: &MemoryId, reason_ledger_id: &str, turn: i64) -> CrtResult<()>;

    /// Bump `trust` for a memory; durable before return.
    fn set_trust(&self, id: &MemoryId, trust: f64, turn: i64) -> CrtResult<()>;

    /// All memories for a thread, including deprecated — used by audit and
    /// `list_memories`.
    fn all_for_thread(&self, thread_id: &ThreadId) -> CrtResult<Vec<Memory>>;
}

impl<T: MemoryStore + ?Sized> MemoryStore for Arc<T> {
    fn put(&self, memory: crate::models::NewMemory) -> CrtResult<Memory> {
        (**self).put(memory)
    }
    fn insert(&self, memory: Memory) -> CrtResult<()> {
        (**self).insert(memory)
    }
    fn get(&self, id: &MemoryId) -> CrtResult<Option<Memory>> {
        (**self).get(id)
    }
    fn by_slot(
        &self,
        thread_id: &ThreadId,
        slot: &str,
        include_deprecated: bool,
    ) -> CrtResult<Vec<Memory>> {
        (**self).by_slot(thread_id, slot, include_deprecated)
    }
    fn candidates(
        &self,
        thread_id: &ThreadId,
        vector: &[f32],
        k: usize,
        include_deprecated: bool,
    ) -> CrtResult<Vec<Memory>> {
        (**self).candidates(thread_id, vector, k, include_deprecated)
    }
    fn deprecate(&self, id: &MemoryId, reason_ledger_id: &str, turn: i64) -> CrtResult<()> {
        (**self).deprecate(id, reason_ledger_id, turn)
    }
    fn set_trust(&self, id: &MemoryId, trust: f64, turn: i64) -> CrtResult<()> {
        (**self).set_trust(id, trust, turn)
    }
    fn all_for_thread(&self, thread_id: &ThreadId) -> CrtResult<Vec<Memory>> {
        (**self).all_for_thread(thread_id)
    }
}
