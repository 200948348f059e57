//! `MemoryStore` (C3) over `StorageEngine` — spec §4.3.

use rusqlite::params;
use tracing::warn;

use crt_core::config::defaults::DEFAULT_EXACT_SCAN_CEILING;
use crt_core::errors::{CrtError, CrtResult, StoreError};
use crt_core::ids::{MemoryId, ThreadId};
use crt_core::models::{Memory, NewMemory};
use crt_core::traits::MemoryStore;

use crate::memory_row::{insert_memory, row_to_memory};
use crate::{to_store_err, StorageEngine};

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

impl MemoryStore for StorageEngine {
    fn put(&self, memory: NewMemory) -> CrtResult<Memory> {
        let memory = memory.into_memory(MemoryId::new());
        self.with_writer(|conn| insert_memory(conn, &memory))?;
        Ok(memory)
    }

    fn insert(&self, memory: Memory) -> CrtResult<()> {
        self.with_writer(|conn| insert_memory(conn, &memory))
    }

    fn get(&self, id: &MemoryId) -> CrtResult<Option<Memory>> {
        self.with_reader(|conn| {
            conn.query_row(
                "SELECT * FROM memories WHERE memory_id = ?1",
                params![id.as_str()],
                row_to_memory,
            )
            .map(Some)
            .or_else(|e| if matches!(e, rusqlite::Error::QueryReturnedNoRows) { Ok(None) } else { Err(to_store_err(e)) })
        })
    }

    fn by_slot(
        &self,
        thread_id: &ThreadId,
        slot: &str,
        include_deprecated: bool,
    ) -> CrtResult<Vec<Memory>> {
        self.with_reader(|conn| {
            let sql = if include_deprecated {
                "SELECT * FROM memories WHERE thread_id = ?1 AND slot = ?2 ORDER BY created_at DESC"
            } else {
                "SELECT * FROM memories WHERE thread_id = ?1 AND slot = ?2 AND deprecated = 0 ORDER BY created_at DESC"
            };
            let mut stmt = conn.prepare(sql).map_err(to_store_err)?;
            let rows = stmt
                .query_map(params![thread_id.as_str(), slot], row_to_memory)
                .map_err(to_store_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(to_store_err)
        })
    }

    fn candidates(
        &self,
        thread_id: &ThreadId,
        vector: &[f32],
        k: usize,
        include_deprecated: bool,
    ) -> CrtResult<Vec<Memory>> {
        let pool = self.all_for_thread(thread_id)?;
        let mut pool: Vec<Memory> = pool
            .into_iter()
            .filter(|m| include_deprecated || !m.deprecated)
            .collect();

        if pool.len() > DEFAULT_EXACT_SCAN_CEILING {
            warn!(
                thread_id = thread_id.as_str(),
                count = pool.len(),
                "thread exceeds exact-scan ceiling; candidates() is falling back to an \
                 exact O(n^2) scan anyway — an ANN index should back this path per spec"
            );
        }

        pool.sort_by(|a, b| {
            let sa = cosine(&a.vector, vector);
            let sb = cosine(&b.vector, vector);
            sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
        });
        pool.truncate(k);
        Ok(pool)
    }

    fn deprecate(&self, id: &MemoryId, reason_ledger_id: &str, turn: i64) -> CrtResult<()> {
        self.with_writer(|conn| {
            let existing: Option<(i64, Option<String>)> = conn
                .query_row(
                    "SELECT deprecated, deprecation_reason FROM memories WHERE memory_id = ?1",
                    params![id.as_str()],
                    |r| Ok((r.get(0)?, r.get(1)?)),
                )
                .map_err(to_store_err)?;

            match existing {
                None => Err(CrtError::Store(StoreError::NotFound(id.clone()))),
                Some((1, Some(reason))) if reason != reason_ledger_id => {
                    Err(CrtError::Store(StoreError::ConflictingDeprecation(id.clone())))
                }
                Some((1, _)) => Ok(()), // already deprecated for the same reason: idempotent no-op
                Some(_) => {
                    conn.execute(
                        "UPDATE memories SET deprecated = 1, deprecation_reason = ?2, updated_at = ?3 WHERE memory_id = ?1",
                        params![id.as_str(), reason_ledger_id, turn],
                    )
                    .map_err(to_store_err)?;
                    Ok(())
                }
            }
        })
    }

    fn set_trust(&self, id: &MemoryId, trust: f64, turn: i64) -> CrtResult<()> {
        self.with_writer(|conn| {
            let updated = conn
                .execute(
                    "UPDATE memories SET trust = ?2, updated_at = ?3 WHERE memory_id = ?1",
                    params![id.as_str(), trust, turn],
                )
                .map_err(to_store_err)?;
            if updated == 0 {
                return Err(CrtError::Store(StoreError::NotFound(id.clone())));
            }
            Ok(())
        })
    }

    fn all_for_thread(&self, thread_id: &ThreadId) -> CrtResult<Vec<Memory>> {
        self.with_reader(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM memories WHERE thread_id = ?1 ORDER BY created_at ASC")
                .map_err(to_store_err)?;
            let rows = stmt
                .query_map(params![thread_id.as_str()], row_to_memory)
                .map_err(to_store_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(to_store_err)
        })
    }
}
