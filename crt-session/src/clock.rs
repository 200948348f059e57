//! Monotone per-thread turn counter — the default `Clock` (spec §6).

use dashmap::DashMap;

use crt_core::ids::ThreadId;
use crt_core::traits::Clock;

/// In-process `Clock`: each thread's counter starts at 1 and increments by
/// one per call. Not durable — a process restart resets it, which is safe
/// because `created_at` only needs to be strictly monotone *within* a
/// thread's lifetime (spec §5), and turn numbers are never compared across
/// a restart boundary by anything in this crate.
#[derive(Default)]
pub struct TurnClock {
    counters: DashMap<ThreadId, i64>,
}

impl TurnClock {
    pub fn new() -> Self {
        Self { counters: DashMap::new() }
    }
}

impl Clock for TurnClock {
    fn turn(&self, thread_id: &ThreadId) -> i64 {
        let mut counter = self.counters.entry(thread_id.clone()).or_insert(0);
        *counter += 1;
        *counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_strictly_monotone_per_thread() {
        let clock = TurnClock::new();
        let thread_id = ThreadId::new();
        let turns: Vec<i64> = (0..5).map(|_| clock.turn(&thread_id)).collect();
        assert_eq!(turns, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn distinct_threads_have_independent_counters() {
        let clock = TurnClock::new();
        let a = ThreadId::new();
        let b = ThreadId::new();
        assert_eq!(clock.turn(&a), 1);
        assert_eq!(clock.turn(&b), 1);
        assert_eq!(clock.turn(&a), 2);
    }
}
