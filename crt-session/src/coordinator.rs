//! The turn lifecycle coordinator (C9) and Core API — spec §4.9, §6.
//!
//! Grounded on `cortex-session`'s top-level role (`lib.rs`: "per-session
//! memory tracking... concurrent access via DashMap") generalized from
//! session-scoped token bookkeeping to the spec's nine-step turn pipeline,
//! and on `cortex-session::manager::SessionManager`'s method-per-operation
//! surface for the Core API shape below.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::info;

use crt_core::config::CrtConfig;
use crt_core::errors::{CrtError, CrtResult, LedgerError, StoreError};
use crt_core::ids::{LedgerId, MemoryId, ThreadId};
use crt_core::models::{
    Lane, LedgerEntry, LedgerStatus, Memory, NewMemory, OpenContradiction, Provenance,
    ResolutionRequest, ResolutionResult, Source, TurnAudit, TurnResult,
};
use crt_core::traits::{ClaimExtractor, Clock, Embedder, LedgerStore, LlmClient, MemoryStore};

use crt_contradiction::{Detector, LedgerEngine};
use crt_gates::{speech_writeback, GatePipeline};
use crt_retrieval::RetrievalEngine;
use crt_storage::StorageEngine;
use crt_trust::{TrustEngine, TrustMutation};

use crate::dedup::{dedup_hard_slots, dedup_open_tuples};
use crate::lock_table::ThreadLockTable;

const FALLBACK_REPLY: &str = "I couldn't complete that turn — please try again.";
const RETRIEVAL_K: usize = 8;

/// Filter accepted by `list_memories` (spec §6).
#[derive(Debug, Clone, Default)]
pub struct MemoryFilter {
    pub slot: Option<String>,
    pub lane: Option<Lane>,
    pub include_deprecated: bool,
}

/// Wires every CRT subsystem together behind the Core API (spec §6). One
/// `Coordinator` serves every thread; per-thread serialization is handled
/// internally by `ThreadLockTable`.
pub struct Coordinator {
    storage: Arc<StorageEngine>,
    embedder: Arc<dyn Embedder>,
    extractor: Arc<dyn ClaimExtractor>,
    llm: Arc<dyn LlmClient>,
    clock: Arc<dyn Clock>,
    detector: Detector,
    ledger_engine: LedgerEngine,
    trust_engine: TrustEngine,
    retrieval_engine: RetrievalEngine,
    config: CrtConfig,
    locks: ThreadLockTable,
    audit_log: DashMap<(ThreadId, i64), TurnAudit>,
}

impl Coordinator {
    pub fn new(
        storage: Arc<StorageEngine>,
        embedder: Arc<dyn Embedder>,
        extractor: Arc<dyn ClaimExtractor>,
        llm: Arc<dyn LlmClient>,
        clock: Arc<dyn Clock>,
        config: CrtConfig,
    ) -> Self {
        let memory_store: Arc<dyn MemoryStore> = storage.clone();
        let ledger_store: Arc<dyn LedgerStore> = storage.clone();

        let detector = Detector::new(embedder.clone(), memory_store.clone(), config.contradiction.clone());
        let ledger_engine = LedgerEngine::new(ledger_store, memory_store.clone());
        let trust_engine = TrustEngine::new(config.trust.clone());
        let retrieval_engine = RetrievalEngine::new(
            embedder.clone(),
            memory_store,
            config.retrieval.clone(),
            config.embedding.recency_lambda,
            config.embedding.belief_alpha,
        );

        Self {
            storage,
            embedder,
            extractor,
            llm,
            clock,
            detector,
            ledger_engine,
            trust_engine,
            retrieval_engine,
            config,
            locks: ThreadLockTable::new(),
            audit_log: DashMap::new(),
        }
    }

    /// spec §4.9 / §6 `send_turn(thread_id, utterance, deadline) → TurnResult`.
    pub fn send_turn(&self, thread_id: &ThreadId, utterance: &str, deadline: Duration) -> CrtResult<TurnResult> {
        self.locks.with_lock(thread_id, || self.send_turn_locked(thread_id, utterance, deadline))
    }

    fn send_turn_locked(&self, thread_id: &ThreadId, utterance: &str, deadline: Duration) -> CrtResult<TurnResult> {
        // Step 1: assign the logical turn number.
        let turn = self.clock.turn(thread_id);

        // Step 2: run C2. An extractor is never allowed to error — only
        // to degrade — so there is no `?` here (spec §4.2, §7 "extraction
        // degraded").
        let extraction = self.extractor.extract(utterance).sanitize();
        let hard_slots = dedup_hard_slots(extraction.hard_slots);
        let open_tuples = dedup_open_tuples(extraction.open_tuples);

        // Build the candidate memories for this turn's claims up front so
        // their ids exist before C5 runs and before C6 needs them to build
        // an anchor (spec §9: ledger entries reference their new memory).
        let mut new_memories: Vec<Memory> = Vec::new();
        let mut by_slot: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
        for claim in &hard_slots {
            let memory = self.build_belief_memory(thread_id, &claim.slot, &claim.value, utterance, claim.confidence, turn);
            by_slot.insert(claim.slot.clone(), new_memories.len());
            new_memories.push(memory);
        }
        let open_tuple_start = new_memories.len();
        for tuple in &open_tuples {
            let memory = self.build_belief_memory(thread_id, &tuple.slot, &tuple.value, &tuple.text, tuple.confidence, turn);
            new_memories.push(memory);
        }

        // Step 3: run C5 against C3's current state.
        let detection = self.detector.detect(thread_id, utterance, &hard_slots, &open_tuples)?;
        let drafts = detection.drafts;

        // Step 4: turn each draft into an opened (and, where applicable,
        // auto-resolved) ledger entry, correlating it back to the memory
        // built above for the claim that produced it.
        let mut ledger_entries: Vec<LedgerEntry> = Vec::new();
        let mut deprecations: Vec<(MemoryId, LedgerId)> = Vec::new();
        let mut contradictions_created: Vec<LedgerId> = Vec::new();
        let mut next_open_tuple_slot = open_tuple_start;

        for draft in &drafts {
            let old_memory = self
                .storage
                .get(&draft.old_memory_id)?
                .ok_or_else(|| CrtError::Store(StoreError::NotFound(draft.old_memory_id.clone())))?;

            let new_memory_index = match &draft.slot {
                Some(slot) if by_slot.contains_key(slot) => by_slot.get(slot).copied(),
                None if next_open_tuple_slot < new_memories.len() => {
                    let idx = next_open_tuple_slot;
                    next_open_tuple_slot += 1;
                    Some(idx)
                }
                _ => None,
            };

            // Retraction drafts have no freshly extracted claim behind
            // them: the denial alone carries no replacement value, so the
            // opening entry's `new_memory_id` is self-referential until a
            // concrete correction arrives via `resolve_contradiction`'s
            // `answer_text` (spec §6, §8 scenario 5).
            let new_memory_ref = match new_memory_index {
                Some(idx) => new_memories[idx].clone(),
                None => old_memory.clone(),
            };

            let opened = self.ledger_engine.open(thread_id, turn, draft, &old_memory, &new_memory_ref);
            contradictions_created.push(opened.ledger_id.clone());

            match self.ledger_engine.auto_resolve(&opened, turn) {
                Some(effect) => {
                    for id in effect.deprecate {
                        deprecations.push((id, opened.ledger_id.clone()));
                    }
                    ledger_entries.push(opened);
                    ledger_entries.push(effect.entry);
                }
                None => {
                    ledger_entries.push(opened);
                }
            }
        }

        // Step 4 (cont'd): commit every new memory and every ledger
        // revision produced so far as one atomic unit (spec §9).
        self.storage.commit_turn(&new_memories, &ledger_entries)?;

        // Auto-resolution deprecations reference rows that are now durable;
        // apply them right after the commit (spec §4.3 `deprecate` is its
        // own idempotent single-row write, not part of the insert batch).
        for (memory_id, ledger_id) in &deprecations {
            self.storage.deprecate(memory_id, ledger_id.as_str(), turn)?;
        }

        // Step 5: trust updates derived from step 4's events. Only
        // `conflict`/`revision` auto-resolutions ever reach here (temporal
        // and refinement never mutate trust — spec §4.7); in practice
        // auto-resolved entries are temporal/refinement, so this loop is a
        // defensive no-op today and a correct hook if that ever changes.
        for entry in &ledger_entries {
            if entry.resolution_method.is_some() {
                self.apply_resolution_trust(entry)?;
            }
        }

        // A restated, unchanged hard-slot value is a confirmation, not a
        // contradiction: boost the existing memory's trust (spec §4.7).
        for memory_id in &detection.confirmations {
            if let Some(memory) = self.storage.get(memory_id)? {
                let next_trust = self.trust_engine.confirm(memory.trust);
                self.storage.set_trust(memory_id, next_trust, turn)?;
            }
        }

        // Step 6: retrieve grounding for the reply.
        let retrieved = self.retrieval_engine.retrieve(
            thread_id,
            utterance,
            RETRIEVAL_K,
            self.config.retrieval.default_min_trust,
            false,
            turn,
        )?;
        let retrieved_memory_ids: Vec<MemoryId> = retrieved.iter().map(|s| s.memory.memory_id.clone()).collect();

        // Step 7: deliver context to the LLM (best-effort, never trusted
        // for facts — spec §6).
        let prompt = render_prompt(utterance, &retrieved.iter().map(|s| &s.memory).collect::<Vec<_>>());
        let candidate = self.llm.generate(&prompt, deadline).unwrap_or_else(|| FALLBACK_REPLY.to_string());

        // Step 8: run C8 over the candidate; gate 5 always writes back.
        let open_entries = self.storage.open_and_asked_for_thread(thread_id)?;
        let gate_pipeline = GatePipeline::new(&self.config.gate, &*self.embedder);
        let pipeline_result = gate_pipeline.run(&candidate, &retrieved.iter().map(|s| s.memory.clone()).collect::<Vec<_>>(), &open_entries);

        let open_ledger_surfaced = self.mark_asked_if_surfaced(thread_id, turn, &pipeline_result.decisions)?;

        let speech_memory = speech_writeback(thread_id, &pipeline_result.final_response, turn, &*self.embedder);
        self.storage.put(speech_memory)?;

        let audit = TurnAudit {
            thread_id: thread_id.clone(),
            turn_id: turn,
            extracted_hard_slots: hard_slots.len(),
            extracted_open_tuples: open_tuples.len(),
            extraction_degraded: extraction.degraded,
            ledger_events: contradictions_created.clone(),
            retrieved_memory_ids: retrieved_memory_ids.clone(),
            gate_decisions: pipeline_result.decisions.clone(),
        };
        self.audit_log.insert((thread_id.clone(), turn), audit);

        info!(thread_id = thread_id.as_str(), turn, "turn committed");

        Ok(TurnResult {
            final_response: pipeline_result.final_response,
            response_lane: Lane::Speech,
            retrieved_memory_ids,
            gate_decisions: pipeline_result.decisions,
            contradictions_created,
            open_ledger_surfaced,
        })
    }

    fn build_belief_memory(&self, thread_id: &ThreadId, slot: &str, value: &str, text: &str, confidence: f64, turn: i64) -> Memory {
        let normalized = crt_core::normalize::normalize_value(slot, value);
        let new = NewMemory {
            thread_id: thread_id.clone(),
            text: text.to_string(),
            slot: Some(slot.to_string()),
            value: Some(normalized),
            vector: self.embedder.embed(text),
            vector_version: self.embedder.vector_version().to_string(),
            source: Source::User,
            lane: Lane::Belief,
            confidence,
            trust: confidence,
            created_at: turn,
            provenance: Provenance::UserTurn { turn },
        };
        new.into_memory(MemoryId::new())
    }

    /// If the contradiction-status gate (gate 4) just replaced the
    /// response, the thread's highest-priority open entry is being
    /// effectively asked right now: transition it to `asked` and, for
    /// `conflict` entries, apply the anticipatory trust degrade (spec
    /// §4.7 "status=asked, before resolution").
    fn mark_asked_if_surfaced(
        &self,
        thread_id: &ThreadId,
        turn: i64,
        decisions: &[crt_core::models::GateDecision],
    ) -> CrtResult<Option<LedgerId>> {
        let surfaced = decisions
            .iter()
            .any(|d| d.gate_name == "contradiction-status" && !d.outcome.is_pass());
        if !surfaced {
            return Ok(None);
        }

        let Some(before) = self.storage.next_open(thread_id)? else { return Ok(None) };
        let was_open = before.status == LedgerStatus::Open;
        let Some(updated) = self.ledger_engine.mark_next_asked(thread_id, turn)? else { return Ok(None) };

        if was_open && updated.contradiction_type == crt_core::models::ContradictionType::Conflict {
            let mutation = self.trust_engine.on_asked(updated.contradiction_type);
            if mutation != TrustMutation::None {
                if let Some(old) = self.storage.get(&updated.old_memory_id)? {
                    let next_trust = self.trust_engine.apply(old.trust, mutation);
                    self.storage.set_trust(&old.memory_id, next_trust, turn)?;
                }
            }
        }

        Ok(Some(updated.ledger_id))
    }

    fn apply_resolution_trust(&self, entry: &LedgerEntry) -> CrtResult<()> {
        let Some(method) = entry.resolution_method else { return Ok(()) };
        let plan = self.trust_engine.on_resolved(entry.contradiction_type, method);

        if plan.old != TrustMutation::None {
            if let Some(old) = self.storage.get(&entry.old_memory_id)? {
                let next = self.trust_engine.apply(old.trust, plan.old);
                self.storage.set_trust(&old.memory_id, next, entry.resolved_at.unwrap_or(entry.created_at))?;
            }
        }
        if plan.new != TrustMutation::None {
            if let Some(new) = self.storage.get(&entry.new_memory_id)? {
                let next = self.trust_engine.apply(new.trust, plan.new);
                self.storage.set_trust(&new.memory_id, next, entry.resolved_at.unwrap_or(entry.created_at))?;
            }
        }
        Ok(())
    }

    /// spec §6 `next_contradiction(thread_id) → {ledger_entry, anchor} | None`.
    pub fn next_contradiction(&self, thread_id: &ThreadId) -> CrtResult<Option<OpenContradiction>> {
        let entry = self.storage.next_open(thread_id)?;
        Ok(entry.map(|e| {
            let anchor = e.anchor.clone();
            OpenContradiction { ledger_entry: e, anchor }
        }))
    }

    /// spec §6 `mark_contradiction_asked(thread_id, ledger_id)`. Idempotent
    /// on `asked`; the turn number used for the revision row is the
    /// thread's current clock tick so ordering stays monotone even for
    /// out-of-band calls (spec §5).
    pub fn mark_contradiction_asked(&self, thread_id: &ThreadId, ledger_id: &LedgerId) -> CrtResult<()> {
        self.locks.with_lock(thread_id, || {
            let turn = self.clock.turn(thread_id);
            let current = self
                .storage
                .current(ledger_id)?
                .ok_or_else(|| CrtError::Ledger(LedgerError::NotFound(ledger_id.clone())))?;
            if current.status == LedgerStatus::Asked {
                return Ok(());
            }
            let was_open = current.status == LedgerStatus::Open;
            self.storage.append_revision(ledger_id, LedgerStatus::Asked, None, None, turn)?;

            if was_open && current.contradiction_type == crt_core::models::ContradictionType::Conflict {
                let mutation = self.trust_engine.on_asked(current.contradiction_type);
                if mutation != TrustMutation::None {
                    if let Some(old) = self.storage.get(&current.old_memory_id)? {
                        let next_trust = self.trust_engine.apply(old.trust, mutation);
                        self.storage.set_trust(&old.memory_id, next_trust, turn)?;
                    }
                }
            }
            Ok(())
        })
    }

    /// spec §6 `resolve_contradiction(thread_id, ledger_id, method, answer_text?)`.
    pub fn resolve_contradiction(
        &self,
        thread_id: &ThreadId,
        ledger_id: &LedgerId,
        request: ResolutionRequest,
        answer_text: Option<&str>,
    ) -> CrtResult<ResolutionResult> {
        self.locks.with_lock(thread_id, || {
            let turn = self.clock.turn(thread_id);
            let current = self
                .storage
                .current(ledger_id)?
                .ok_or_else(|| CrtError::Ledger(LedgerError::NotFound(ledger_id.clone())))?;

            let effect = self.ledger_engine.resolve(ledger_id, request, turn)?;

            // A free-text correction supersedes the ledger's placeholder
            // new-memory reference (spec §8 scenario 5: "a new memory is
            // persisted" only once the user actually supplies one).
            let new_memory_id = if let Some(text) = answer_text {
                let slot = current.slot.clone();
                let memory = NewMemory {
                    thread_id: thread_id.clone(),
                    text: text.to_string(),
                    slot: slot.clone(),
                    value: slot.as_deref().map(|s| crt_core::normalize::normalize_value(s, text)),
                    vector: self.embedder.embed(text),
                    vector_version: self.embedder.vector_version().to_string(),
                    source: Source::User,
                    lane: Lane::Belief,
                    confidence: 1.0,
                    trust: 1.0,
                    created_at: turn,
                    provenance: Provenance::UserTurn { turn },
                };
                let persisted = self.storage.put(memory)?;
                Some(persisted.memory_id)
            } else {
                None
            };

            for memory_id in &effect.deprecate {
                self.storage.deprecate(memory_id, ledger_id.as_str(), turn)?;
            }
            if let Some(id) = &new_memory_id {
                if *id != effect.entry.new_memory_id && effect.entry.old_memory_id != *id {
                    // the freshly typed-in correction also retires the
                    // entry's original (placeholder or stale) new memory
                    // reference if it was a distinct, real row.
                    if self.storage.get(&effect.entry.new_memory_id)?.is_some() && effect.entry.new_memory_id != effect.entry.old_memory_id {
                        self.storage.deprecate(&effect.entry.new_memory_id, ledger_id.as_str(), turn).ok();
                    }
                }
            }

            self.apply_resolution_trust(&effect.entry)?;

            Ok(ResolutionResult {
                ledger_entry: effect.entry,
                new_memory_id,
                deprecated_memory_ids: effect.deprecate,
            })
        })
    }

    /// spec §6 `list_memories(thread_id, filter)`.
    pub fn list_memories(&self, thread_id: &ThreadId, filter: &MemoryFilter) -> CrtResult<Vec<Memory>> {
        let all = self.storage.all_for_thread(thread_id)?;
        Ok(all
            .into_iter()
            .filter(|m| filter.include_deprecated || !m.deprecated)
            .filter(|m| filter.slot.as_deref().map_or(true, |s| m.slot.as_deref() == Some(s)))
            .filter(|m| filter.lane.map_or(true, |l| m.lane == l))
            .collect())
    }

    /// spec §6 `audit_turn(thread_id, turn_id)`.
    pub fn audit_turn(&self, thread_id: &ThreadId, turn_id: i64) -> Option<TurnAudit> {
        self.audit_log.get(&(thread_id.clone(), turn_id)).map(|r| r.clone())
    }
}

fn render_prompt(utterance: &str, retrieved: &[&Memory]) -> String {
    if retrieved.is_empty() {
        return format!("User: {utterance}\nAssistant:");
    }
    let mut context = String::from("Known about the user:\n");
    for memory in retrieved {
        context.push_str("- ");
        context.push_str(&memory.text);
        context.push('\n');
    }
    context.push_str(&format!("User: {utterance}\nAssistant:"));
    context
}
