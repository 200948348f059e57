//! Per-thread turn serialization — spec §5 "per-thread serial" scheduling:
//! within one `thread_id`, turns are linearized; across threads, turns run
//! concurrently.
//!
//! Grounded on `cortex-session::manager::SessionManager`'s
//! `Arc<DashMap<String, SessionContext>>` shape, adapted from a
//! session-content cache (get/insert a cloned value per key) to a lock
//! table: each thread gets its own `Mutex<()>`, created lazily on first
//! use and shared via the map's entry API.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use crt_core::ids::ThreadId;

/// Holds one `Mutex<()>` per thread seen so far. Threads not yet present
/// are created on demand; the map itself only ever grows, which is
/// acceptable for a conversational-agent process lifetime (spec does not
/// call for session eviction here — contrast `cortex-session::cleanup`,
/// whose TTL sweep has no CRT counterpart since nothing here is cached).
pub struct ThreadLockTable {
    locks: DashMap<ThreadId, Arc<Mutex<()>>>,
}

impl ThreadLockTable {
    pub fn new() -> Self {
        Self { locks: DashMap::new() }
    }

    /// Run `f` while holding the exclusive lock for `thread_id`. Turns for
    /// different threads never block each other; turns for the same
    /// thread always run one at a time, in whatever order they acquire
    /// the lock.
    pub fn with_lock<T>(&self, thread_id: &ThreadId, f: impl FnOnce() -> T) -> T {
        let mutex = self
            .locks
            .entry(thread_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f()
    }

    pub fn thread_count(&self) -> usize {
        self.locks.len()
    }
}

impl Default for ThreadLockTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn serializes_turns_for_the_same_thread() {
        let table = Arc::new(ThreadLockTable::new());
        let thread_id = ThreadId::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let max_concurrent = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = table.clone();
                let thread_id = thread_id.clone();
                let counter = counter.clone();
                let max_concurrent = max_concurrent.clone();
                thread::spawn(move || {
                    table.with_lock(&thread_id, || {
                        let current = counter.fetch_add(1, Ordering::SeqCst) + 1;
                        max_concurrent.fetch_max(current, Ordering::SeqCst);
                        thread::yield_now();
                        counter.fetch_sub(1, Ordering::SeqCst);
                    });
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(max_concurrent.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distinct_threads_get_distinct_locks() {
        let table = ThreadLockTable::new();
        table.with_lock(&ThreadId::new(), || {});
        table.with_lock(&ThreadId::new(), || {});
        assert_eq!(table.thread_count(), 2);
    }
}
