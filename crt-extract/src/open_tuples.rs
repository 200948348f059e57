//! Tier B: reference rule-based open-tuple extractor (spec §4.2).
//!
//! The spec permits "regex/rule extractors as a complete implementation"
//! for Tier B; this mirrors `cortex-learning::extraction::rule_based`'s
//! keyword/pattern-template approach, generalized from "one correction →
//! one principle" to "one clause → zero or more (slot, value) tuples".
//! Confidence is a fixed per-pattern estimate, never below τ_open once a
//! pattern fires (patterns below the floor simply aren't encoded).

use crt_core::models::OpenTuple;
use crt_core::normalize::normalize_value;

struct Pattern {
    slot: &'static str,
    keyword: &'static str,
    confidence: f64,
}

/// Keyword-anchored open-tuple patterns. Each keyword, if present, yields a
/// tuple whose value is the remainder of the clause after the keyword —
/// deliberately coarser than Tier A's precise captures, consistent with
/// Tier B being the "open", lower-precision tier.
const PATTERNS: &[Pattern] = &[
    Pattern { slot: "hobby", keyword: "i enjoy ", confidence: 0.75 },
    Pattern { slot: "hobby", keyword: "i like ", confidence: 0.65 },
    Pattern { slot: "pet", keyword: "my dog is ", confidence: 0.8 },
    Pattern { slot: "pet", keyword: "my cat is ", confidence: 0.8 },
    Pattern { slot: "goal", keyword: "i'm trying to ", confidence: 0.7 },
    Pattern { slot: "goal", keyword: "i want to ", confidence: 0.65 },
    Pattern { slot: "preference", keyword: "i prefer ", confidence: 0.7 },
];

/// Extract Tier B open tuples from `utterance`. Slot contamination (a
/// tuple whose slot matches a Tier A hard slot) is handled by the caller
/// via `ExtractionResult::sanitize`, not here.
pub fn extract_open_tuples(utterance: &str) -> Vec<OpenTuple> {
    let lower = utterance.to_lowercase();
    let mut tuples = Vec::new();
    for pattern in PATTERNS {
        if let Some(idx) = lower.find(pattern.keyword) {
            let start = idx + pattern.keyword.len();
            let rest = utterance[start..].trim_end_matches(['.', '!', '?']).trim();
            if rest.is_empty() {
                continue;
            }
            tuples.push(OpenTuple {
                slot: pattern.slot.to_string(),
                value: normalize_value(pattern.slot, rest),
                text: rest.to_string(),
                confidence: pattern.confidence,
            });
        }
    }
    tuples
}
