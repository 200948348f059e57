//! Contradiction classification — spec §4.5. Every detected pair gets
//! exactly one of `refinement | revision | temporal | conflict`; treating
//! everything as `conflict` is the bug class this module exists to
//! prevent (GLOSSARY).
//!
//! Grounded on `cortex-validation::contradiction::detection::semantic`'s
//! `const NEGATION_PAIRS` fixed-table idiom, generalized from "match an
//! antonym pair" to "match a correction/refinement marker phrase", plus
//! a per-slot category table standing in for the teacher's per-type
//! `half_life_days` lookup in `cortex-decay`.

use crt_core::models::ContradictionType;

/// Phrases that mark an explicit self-correction ("Actually I work at
/// Amazon", "I meant Bellevue, not Seattle").
const REVISION_MARKERS: &[&str] = &["actually", "i meant", "i mean", "correction:", "to correct myself"];

/// Phrases that mark the new claim as a narrower restatement of the old
/// one, not a replacement ("Specifically, Bellevue").
const REFINEMENT_MARKERS: &[&str] = &["specifically,", "specifically ", "more precisely", "to be exact"];

/// Slots whose values naturally progress over time without either side
/// being wrong (a promotion, a birthday) — spec §4.5 `temporal` type.
const PROGRESSIVE_SLOTS: &[&str] = &["title", "occupation", "age"];

/// Classify a same-slot contradiction between an old and a newly observed
/// claim. `new_text` is the verbatim utterance the new value was drawn
/// from (markers are phrased in the new claim, not the old one).
pub fn classify_same_slot(slot: &str, new_text: &str) -> ContradictionType {
    let lower = new_text.to_lowercase();
    if REVISION_MARKERS.iter().any(|m| lower.contains(m)) {
        return ContradictionType::Revision;
    }
    if REFINEMENT_MARKERS.iter().any(|m| lower.contains(m)) {
        return ContradictionType::Refinement;
    }
    if PROGRESSIVE_SLOTS.contains(&slot) {
        return ContradictionType::Temporal;
    }
    ContradictionType::Conflict
}

/// Classify a semantic-path pair (open tuples / slot-less claims) that
/// cleared the θ_contra similarity gate. Without a shared canonical slot
/// to anchor a progression/refinement judgment, the only positive signals
/// left are the same marker phrases; absent those, a strong semantic match
/// on opposing free text defaults to `conflict` (spec §4.5's classifier is
/// rule-based "is acceptable", not semantic-path-specific).
pub fn classify_semantic(new_text: &str) -> ContradictionType {
    let lower = new_text.to_lowercase();
    if REVISION_MARKERS.iter().any(|m| lower.contains(m)) {
        return ContradictionType::Revision;
    }
    if REFINEMENT_MARKERS.iter().any(|m| lower.contains(m)) {
        return ContradictionType::Refinement;
    }
    ContradictionType::Conflict
}

/// Token-overlap drift between two normalized values: 0 if identical,
/// 1 if disjoint (spec §3 "Drift ... 0 if identical, 1 if disjoint").
pub fn value_drift(old_value: &str, new_value: &str) -> f64 {
    if old_value == new_value {
        return 0.0;
    }
    let old_tokens: std::collections::HashSet<&str> = old_value.split_whitespace().collect();
    let new_tokens: std::collections::HashSet<&str> = new_value.split_whitespace().collect();
    if old_tokens.is_empty() && new_tokens.is_empty() {
        return 0.0;
    }
    let intersection = old_tokens.intersection(&new_tokens).count();
    let union = old_tokens.union(&new_tokens).count().max(1);
    1.0 - (intersection as f64 / union as f64)
}

/// Semantic-path drift: 1 minus embedding cosine similarity, clamped to
/// `[0, 1]` (cosine can be negative, but drift is a one-sided distance).
pub fn semantic_drift(similarity: f64) -> f64 {
    (1.0 - similarity).clamp(0.0, 1.0)
}
