//! Contradiction detection (C5) — spec §4.5. Three independent paths feed
//! the same `ContradictionDraft` output:
//!
//! 1. **fast path** — a new hard-slot claim lands on a slot that already
//!    has a current belief-lane value.
//! 2. **semantic path** — an open tuple or slot-less claim clears
//!    θ_contra similarity against an existing belief memory.
//! 3. **retraction path** — the utterance denies having said something it
//!    demonstrably did say (spec §8 scenario 5), caught separately because
//!    `crt-extract`'s Tier A rules have no negation guard by design (they
//!    stay simple positive-claim matchers; teaching them every possible
//!    negation would duplicate work this module already has to do).
//!
//! Grounded on `cortex-retrieval`'s candidate-then-score shape (reused here
//! to gate the semantic path) and `cortex-validation::contradiction`'s
//! separate-pass-per-signal structure.

use std::sync::Arc;

use crt_core::config::ContradictionConfig;
use crt_core::ids::{MemoryId, ThreadId};
use crt_core::models::{
    ContradictionDraft, ContradictionType, DetectionOutput, HardSlotClaim, Memory, OpenTuple,
};
use crt_core::normalize::normalize_value;
use crt_core::traits::{Embedder, MemoryStore};

use crate::classify::{classify_same_slot, classify_semantic, semantic_drift, value_drift};

/// Phrases that mark the speaker denying a prior claim — spec §8
/// scenario 5 ("I never said I work at Google").
const RETRACTION_MARKERS: &[&str] = &["never said", "didn't say", "did not say", "never told you", "i didn't"];

pub struct Detector {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn MemoryStore>,
    config: ContradictionConfig,
}

/// Outcome of the fast path for a single hard-slot claim.
enum FastPathOutcome {
    Contradiction(ContradictionDraft),
    Confirmed(MemoryId),
    NoPriorClaim,
}

impl Detector {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn MemoryStore>, config: ContradictionConfig) -> Self {
        Self { embedder, store, config }
    }

    /// Run every detection path over one utterance's extraction output.
    /// Returns at most one draft per (slot, retraction) — spec §4.5 treats
    /// contradiction detection as per-claim, not accumulate-everything —
    /// plus the memories a restated, unchanged value confirms (spec §4.7).
    pub fn detect(
        &self,
        thread_id: &ThreadId,
        utterance: &str,
        hard_slots: &[HardSlotClaim],
        open_tuples: &[OpenTuple],
    ) -> crt_core::errors::CrtResult<DetectionOutput> {
        let mut drafts = Vec::new();
        let mut confirmations = Vec::new();

        for claim in hard_slots {
            match self.fast_path(thread_id, utterance, claim)? {
                FastPathOutcome::Contradiction(draft) => drafts.push(draft),
                FastPathOutcome::Confirmed(id) => confirmations.push(id),
                FastPathOutcome::NoPriorClaim => {}
            }
        }

        for tuple in open_tuples {
            if let Some(draft) = self.semantic_path(thread_id, tuple)? {
                drafts.push(draft);
            }
        }

        drafts.extend(self.retraction_path(thread_id, utterance)?);

        Ok(DetectionOutput { drafts, confirmations })
    }

    fn fast_path(
        &self,
        thread_id: &ThreadId,
        utterance: &str,
        claim: &HardSlotClaim,
    ) -> crt_core::errors::CrtResult<FastPathOutcome> {
        let current = self
            .store
            .by_slot(thread_id, &claim.slot, false)?
            .into_iter()
            .find(|m| m.lane == crt_core::models::Lane::Belief);

        let Some(current) = current else { return Ok(FastPathOutcome::NoPriorClaim) };
        let Some(old_value) = current.value.as_deref() else { return Ok(FastPathOutcome::NoPriorClaim) };

        let new_value = normalize_value(&claim.slot, &claim.value);
        if old_value == new_value {
            return Ok(FastPathOutcome::Confirmed(current.memory_id));
        }

        // Markers ("actually", "specifically") are sentence-level cues, so
        // classification reads the whole utterance, not the bare captured value.
        let contradiction_type = classify_same_slot(&claim.slot, utterance);
        let drift = value_drift(old_value, &new_value);

        Ok(FastPathOutcome::Contradiction(ContradictionDraft {
            old_memory_id: current.memory_id,
            new_memory_id: MemoryId::new(),
            contradiction_type,
            drift,
            slot: Some(claim.slot.clone()),
        }))
    }

    fn semantic_path(&self, thread_id: &ThreadId, tuple: &OpenTuple) -> crt_core::errors::CrtResult<Option<ContradictionDraft>> {
        let vector = self.embedder.embed(&tuple.text);
        let candidates = self.store.candidates(thread_id, &vector, 8, false)?;

        let best = candidates
            .into_iter()
            .filter(|m| m.lane == crt_core::models::Lane::Belief)
            .map(|m| {
                let sim = crt_embed::cosine_similarity(&m.vector, &vector);
                (m, sim)
            })
            .filter(|(_, sim)| *sim >= self.config.theta_contra)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let Some((old, similarity)) = best else { return Ok(None) };

        let contradiction_type = classify_semantic(&tuple.text);
        let drift = semantic_drift(similarity);

        Ok(Some(ContradictionDraft {
            old_memory_id: old.memory_id,
            new_memory_id: MemoryId::new(),
            contradiction_type,
            drift,
            slot: None,
        }))
    }

    fn retraction_path(&self, thread_id: &ThreadId, utterance: &str) -> crt_core::errors::CrtResult<Vec<ContradictionDraft>> {
        let lower = utterance.to_lowercase();
        if !RETRACTION_MARKERS.iter().any(|m| lower.contains(m)) {
            return Ok(Vec::new());
        }

        let memories: Vec<Memory> = self
            .store
            .all_for_thread(thread_id)?
            .into_iter()
            .filter(|m| m.lane == crt_core::models::Lane::Belief && !m.deprecated)
            .collect();

        let mut drafts = Vec::new();
        for memory in memories {
            let Some(value) = memory.value.as_deref() else { continue };
            if !value.is_empty() && lower.contains(value) {
                drafts.push(ContradictionDraft {
                    old_memory_id: memory.memory_id,
                    new_memory_id: MemoryId::new(),
                    contradiction_type: ContradictionType::Conflict,
                    drift: 1.0,
                    slot: memory.slot.clone(),
                });
            }
        }
        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crt_core::models::{Lane, NewMemory, Provenance, Source};
    use crt_embed::hashing::HashingEmbedder;
    use crt_storage::StorageEngine;

    fn setup() -> (Detector, Arc<StorageEngine>, ThreadId) {
        let store = Arc::new(StorageEngine::open_in_memory().unwrap());
        let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::default());
        let detector = Detector::new(embedder, store.clone() as Arc<dyn MemoryStore>, ContradictionConfig::default());
        (detector, store, ThreadId::new())
    }

    fn belief(thread: &ThreadId, slot: &str, value: &str, text: &str) -> NewMemory {
        NewMemory {
            thread_id: thread.clone(),
            text: text.to_string(),
            slot: Some(slot.to_string()),
            value: Some(value.to_string()),
            vector: vec![1.0, 0.0, 0.0],
            vector_version: "hashing-v1".to_string(),
            source: Source::User,
            lane: Lane::Belief,
            confidence: 1.0,
            trust: 0.8,
            created_at: 1,
            provenance: Provenance::UserTurn { turn: 1 },
        }
    }

    #[test]
    fn fast_path_flags_conflicting_hard_slot() {
        let (detector, store, thread) = setup();
        store.put(belief(&thread, "employer", "amazon", "I work at Amazon")).unwrap();

        let claim = HardSlotClaim { slot: "employer".to_string(), value: "Google".to_string(), confidence: 1.0 };
        let out = detector.detect(&thread, "I work at Google", &[claim], &[]).unwrap();

        assert_eq!(out.drafts.len(), 1);
        assert_eq!(out.drafts[0].contradiction_type, ContradictionType::Conflict);
        assert!(out.confirmations.is_empty());
    }

    #[test]
    fn fast_path_confirms_when_value_unchanged() {
        let (detector, store, thread) = setup();
        let existing = store.put(belief(&thread, "employer", "amazon", "I work at Amazon")).unwrap();

        let claim = HardSlotClaim { slot: "employer".to_string(), value: "Amazon".to_string(), confidence: 1.0 };
        let out = detector.detect(&thread, "I work at Amazon", &[claim], &[]).unwrap();
        assert!(out.drafts.is_empty());
        assert_eq!(out.confirmations, vec![existing.memory_id]);
    }

    #[test]
    fn retraction_path_flags_denial_of_stored_value() {
        let (detector, store, thread) = setup();
        store.put(belief(&thread, "employer", "google", "I work at Google")).unwrap();

        let out = detector.detect(&thread, "I never said I work at google", &[], &[]).unwrap();
        assert_eq!(out.drafts.len(), 1);
        assert_eq!(out.drafts[0].contradiction_type, ContradictionType::Conflict);
        assert_eq!(out.drafts[0].drift, 1.0);
    }

    #[test]
    fn no_markers_means_no_retraction_draft() {
        let (detector, store, thread) = setup();
        store.put(belief(&thread, "employer", "google", "I work at Google")).unwrap();

        let out = detector.detect(&thread, "I still work at Google", &[], &[]).unwrap();
        assert!(out.drafts.is_empty());
    }
}
