//! Atomic multi-row turn commit (spec §9 "steps 2-5 must be atomic"):
//! every memory and every ledger revision produced by a single turn is
//! durable, or none are. Implemented as one SQLite transaction over the
//! writer connection rather than a new abstraction, since both row kinds
//! already go through `insert_memory`/`insert_ledger_revision` — the only
//! thing missing was wrapping more than one call in `BEGIN`/`COMMIT`.

use crt_core::errors::CrtResult;
use crt_core::models::{LedgerEntry, Memory};

use crate::ledger_row::insert_ledger_revision;
use crate::memory_row::insert_memory;
use crate::{to_store_err, StorageEngine};

impl StorageEngine {
    /// Insert every memory then every ledger revision inside one
    /// transaction. On any failure the whole batch rolls back and no row
    /// is left durable.
    pub fn commit_turn(&self, memories: &[Memory], ledger_entries: &[LedgerEntry]) -> CrtResult<()> {
        self.with_writer(|conn| {
            conn.execute_batch("BEGIN IMMEDIATE").map_err(to_store_err)?;
            let result = (|| -> CrtResult<()> {
                for memory in memories {
                    insert_memory(conn, memory)?;
                }
                for entry in ledger_entries {
                    insert_ledger_revision(conn, entry)?;
                }
                Ok(())
            })();
            match result {
                Ok(()) => {
                    conn.execute_batch("COMMIT").map_err(to_store_err)?;
                    Ok(())
                }
                Err(e) => {
                    let _ = conn.execute_batch("ROLLBACK");
                    Err(e)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crt_core::ids::{LedgerId, MemoryId, ThreadId};
    use crt_core::models::{
        ContradictionType, ExpectedAnswerShape, Lane, Provenance, SemanticAnchor, Source,
    };

    use super::*;

    fn memory(thread: &ThreadId, id: MemoryId, turn: i64) -> Memory {
        Memory {
            memory_id: id,
            thread_id: thread.clone(),
            text: "I work at Amazon".to_string(),
            slot: Some("employer".to_string()),
            value: Some("amazon".to_string()),
            vector: vec![1.0, 0.0],
            vector_version: "hashing-v1".to_string(),
            source: Source::User,
            lane: Lane::Belief,
            confidence: 1.0,
            trust: 0.8,
            created_at: turn,
            updated_at: turn,
            deprecated: false,
            deprecation_reason: None,
            provenance: Provenance::UserTurn { turn },
        }
    }

    fn anchor(thread: &ThreadId, ledger_id: &LedgerId, old: &MemoryId, new: &MemoryId) -> SemanticAnchor {
        SemanticAnchor {
            ledger_id: ledger_id.clone(),
            thread_id: thread.clone(),
            created_turn: 2,
            contradiction_type: ContradictionType::Revision,
            old_memory_id: old.clone(),
            new_memory_id: new.clone(),
            slot: Some("employer".to_string()),
            old_value: "amazon".to_string(),
            new_value: "google".to_string(),
            drift: 1.0,
            direction: vec![0.0, 1.0],
            expected_answer_shape: ExpectedAnswerShape::FreeCorrection,
            rendered_prompt: "Just to confirm: you're correcting employer from amazon to google, right?".to_string(),
        }
    }

    #[test]
    fn commit_turn_persists_memories_and_ledger_together() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let thread = ThreadId::new();
        let old_id = MemoryId::new();
        let new_id = MemoryId::new();
        let ledger_id = LedgerId::new();

        let old = memory(&thread, old_id.clone(), 1);
        let new = memory(&thread, new_id.clone(), 2);
        let entry = LedgerEntry::opened(
            ledger_id.clone(),
            thread.clone(),
            2,
            old_id.clone(),
            new_id.clone(),
            ContradictionType::Revision,
            1.0,
            Some("employer".to_string()),
            anchor(&thread, &ledger_id, &old_id, &new_id),
        );

        engine.commit_turn(&[old, new], std::slice::from_ref(&entry)).unwrap();

        use crt_core::traits::{LedgerStore, MemoryStore};
        assert!(engine.get(&old_id).unwrap().is_some());
        assert!(engine.get(&new_id).unwrap().is_some());
        assert!(engine.current(&ledger_id).unwrap().is_some());
    }
}
