//! Claim extractor output types — see spec §4.2.

use serde::{Deserialize, Serialize};

/// A hard-slot fact extracted by the deterministic Tier A rule path.
/// Confidence is fixed per rule match (spec default 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardSlotClaim {
    pub slot: String,
    pub value: String,
    pub confidence: f64,
}

/// A free-form (slot, value, confidence) tuple extracted by the Tier B path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTuple {
    pub slot: String,
    pub value: String,
    pub text: String,
    pub confidence: f64,
}

/// Output of running the extractor over one utterance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub hard_slots: Vec<HardSlotClaim>,
    pub open_tuples: Vec<OpenTuple>,
    /// Set when no Tier B extractor was available and the utterance might
    /// have carried open-tuple content that was dropped.
    pub degraded: bool,
}

/// The set of hard slots reserved for rule-only extraction (spec §4.2): a
/// Tier-B tuple matching one of these slot names must be discarded to
/// prevent probabilistic contamination of hard slots.
pub const RULE_ONLY_SLOTS: &[&str] = &["name", "age", "graduation_year"];

impl ExtractionResult {
    /// Drop any open tuple whose slot already has a hard-slot claim, or
    /// whose slot is rule-only reserved — spec §4.2 and the boundary test
    /// "a hard-slot value and a contradicting open tuple for the same slot
    /// must discard the open tuple".
    pub fn sanitize(mut self) -> Self {
        let hard_slot_names: std::collections::HashSet<&str> =
            self.hard_slots.iter().map(|h| h.slot.as_str()).collect();
        self.open_tuples.retain(|t| {
            !hard_slot_names.contains(t.slot.as_str()) && !RULE_ONLY_SLOTS.contains(&t.slot.as_str())
        });
        self
    }
}
