//! Same-turn claim collapsing — spec §8 boundary behavior "an attempt to
//! persist two identical value/slot claims in one turn collapses to one
//! memory".
//!
//! Grounded on `cortex-session::deduplication`'s key-based collapse shape
//! (`dedup_key` + retain-first-occurrence), narrowed from its cross-turn
//! already-sent-token bookkeeping to a single turn's extracted claims.

use std::collections::HashSet;

use crt_core::models::{HardSlotClaim, OpenTuple};
use crt_core::normalize::normalize_value;

/// Keep the first claim per normalized `(slot, value)` pair.
pub fn dedup_hard_slots(claims: Vec<HardSlotClaim>) -> Vec<HardSlotClaim> {
    let mut seen = HashSet::new();
    claims
        .into_iter()
        .filter(|c| seen.insert((c.slot.clone(), normalize_value(&c.slot, &c.value))))
        .collect()
}

/// Keep the first tuple per normalized `(slot, value)` pair.
pub fn dedup_open_tuples(tuples: Vec<OpenTuple>) -> Vec<OpenTuple> {
    let mut seen = HashSet::new();
    tuples
        .into_iter()
        .filter(|t| seen.insert((t.slot.clone(), normalize_value(&t.slot, &t.value))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_identical_hard_slot_restatement() {
        let claims = vec![
            HardSlotClaim { slot: "employer".to_string(), value: "Google".to_string(), confidence: 1.0 },
            HardSlotClaim { slot: "employer".to_string(), value: "google".to_string(), confidence: 1.0 },
        ];
        assert_eq!(dedup_hard_slots(claims).len(), 1);
    }

    #[test]
    fn keeps_distinct_slots() {
        let claims = vec![
            HardSlotClaim { slot: "employer".to_string(), value: "Google".to_string(), confidence: 1.0 },
            HardSlotClaim { slot: "location".to_string(), value: "Seattle".to_string(), confidence: 1.0 },
        ];
        assert_eq!(dedup_hard_slots(claims).len(), 2);
    }
}
