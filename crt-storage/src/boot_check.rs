//! Boot-time consistency check (spec §4.3 durability note): the store must
//! be reconstructible into a consistent view after any partial failure.
//! Two invariants are checked directly against the data, independent of
//! whatever code path produced it:
//!
//! 1. Belief-lane uniqueness — at most one non-deprecated memory per
//!    `(thread_id, slot)` in the belief lane (spec §3).
//! 2. Every deprecated memory references a ledger entry that actually
//!    supersedes it.

use rusqlite::params;

use crt_core::errors::CrtResult;
use crt_core::ids::MemoryId;

use crate::{to_store_err, StorageEngine};

#[derive(Debug, Clone, PartialEq)]
pub enum ConsistencyViolation {
    DuplicateBeliefSlot { thread_id: String, slot: String, count: usize },
    DanglingDeprecation { memory_id: MemoryId, deprecation_reason: Option<String> },
}

pub fn check_consistency(engine: &StorageEngine) -> CrtResult<Vec<ConsistencyViolation>> {
    let mut violations = Vec::new();

    let duplicates: Vec<(String, String, usize)> = engine.with_reader(|conn| {
        let mut stmt = conn
            .prepare(
                "SELECT thread_id, slot, COUNT(*) as c FROM memories
                 WHERE lane = 'belief' AND slot IS NOT NULL AND deprecated = 0
                 GROUP BY thread_id, slot HAVING c > 1",
            )
            .map_err(to_store_err)?;
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get::<_, i64>(2)? as usize)))
            .map_err(to_store_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(to_store_err)
    })?;

    for (thread_id, slot, count) in duplicates {
        violations.push(ConsistencyViolation::DuplicateBeliefSlot { thread_id, slot, count });
    }

    let deprecated: Vec<(String, Option<String>)> = engine.with_reader(|conn| {
        let mut stmt = conn
            .prepare("SELECT memory_id, deprecation_reason FROM memories WHERE deprecated = 1")
            .map_err(to_store_err)?;
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .map_err(to_store_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(to_store_err)
    })?;

    for (memory_id, reason) in deprecated {
        let resolves = match &reason {
            None => false,
            Some(ledger_id) => engine.with_reader(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM ledger_revisions
                     WHERE ledger_id = ?1 AND status = 'resolved'
                       AND (old_memory_id = ?2 OR new_memory_id = ?2)",
                    params![ledger_id, memory_id],
                    |r| r.get::<_, i64>(0),
                )
                .map(|c| c > 0)
                .map_err(to_store_err)
            })?,
        };
        if !resolves {
            violations.push(ConsistencyViolation::DanglingDeprecation {
                memory_id: MemoryId::from(memory_id),
                deprecation_reason: reason,
            });
        }
    }

    Ok(violations)
}
