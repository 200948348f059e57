//! Gate 3: memory-citation — spec §4.8.
//!
//! Every non-trivial factual assertion about the user must be backed by a
//! retrieved belief-lane memory: an exact slot/value match for hard slots,
//! or a semantic match at or above θ_cite for open claims.

use crt_core::models::{GateOutcome, Lane, Memory};
use crt_core::traits::Embedder;

use crate::assertions::{extract_assertions, extract_open_claim};

pub fn memory_citation_gate(response: &str, retrieved: &[Memory], embedder: &dyn Embedder, theta_cite: f64) -> GateOutcome {
    let hard_slot_claims = extract_assertions(response);
    for claim in &hard_slot_claims {
        let supported = retrieved
            .iter()
            .any(|m| m.lane == Lane::Belief && m.slot.as_deref() == Some(claim.slot) && m.value.as_deref() == Some(claim.value.as_str()));
        if !supported {
            return GateOutcome::Rewrite {
                text: format!("I don't have your {} stored — can you tell me?", claim.slot.replace('_', " ")),
                tag: "memory-citation",
            };
        }
    }
    if !hard_slot_claims.is_empty() {
        return GateOutcome::Pass;
    }

    if let Some(claim_text) = extract_open_claim(response) {
        let claim_vector = embedder.embed(&claim_text);
        let supported = retrieved
            .iter()
            .filter(|m| m.lane == Lane::Belief)
            .any(|m| crt_embed::cosine_similarity(&m.vector, &claim_vector) >= theta_cite);
        if !supported {
            return GateOutcome::Rewrite {
                text: "I don't have that stored — can you tell me?".to_string(),
                tag: "memory-citation",
            };
        }
    }

    GateOutcome::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crt_core::ids::{MemoryId, ThreadId};
    use crt_core::models::{Provenance, Source};
    use crt_embed::hashing::HashingEmbedder;

    fn belief(slot: &str, value: &str, vector: Vec<f32>) -> Memory {
        Memory {
            memory_id: MemoryId::new(),
            thread_id: ThreadId::new(),
            text: format!("I work at {value}"),
            slot: Some(slot.to_string()),
            value: Some(value.to_string()),
            vector,
            vector_version: "hashing-v1".to_string(),
            source: Source::User,
            lane: Lane::Belief,
            confidence: 1.0,
            trust: 0.8,
            created_at: 1,
            updated_at: 1,
            deprecated: false,
            deprecation_reason: None,
            provenance: Provenance::UserTurn { turn: 1 },
        }
    }

    #[test]
    fn passes_when_hard_slot_claim_is_grounded() {
        let embedder = HashingEmbedder::default();
        let retrieved = vec![belief("employer", "google", vec![1.0, 0.0])];
        let outcome = memory_citation_gate("You work at Google.", &retrieved, &embedder, 0.6);
        assert!(outcome.is_pass());
    }

    #[test]
    fn rewrites_ungrounded_hard_slot_claim() {
        let embedder = HashingEmbedder::default();
        let outcome = memory_citation_gate("You work at Google.", &[], &embedder, 0.6);
        assert!(matches!(outcome, GateOutcome::Rewrite { tag: "memory-citation", .. }));
    }

    #[test]
    fn rewrites_ungrounded_open_claim() {
        let embedder = HashingEmbedder::default();
        let outcome = memory_citation_gate("You enjoy competitive chess.", &[], &embedder, 0.6);
        assert!(matches!(outcome, GateOutcome::Rewrite { tag: "memory-citation", .. }));
    }

    #[test]
    fn passes_response_with_no_factual_assertion() {
        let embedder = HashingEmbedder::default();
        let outcome = memory_citation_gate("How can I help you today?", &[], &embedder, 0.6);
        assert!(outcome.is_pass());
    }
}
