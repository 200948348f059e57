use crate::ids::ThreadId;

/// Monotone per-thread logical turn counter (spec §6).
pub trait Clock: Send + Sync {
    /// Assign and return the next turn number for `thread_id`. Strictly
    /// increasing per thread (spec §5 ordering guarantees).
    fn turn(&self, thread_id: &ThreadId) -> i64;
}
