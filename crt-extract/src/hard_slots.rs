//! Tier A: deterministic hard-slot extraction (spec §4.2).
//!
//! Grounded on `cortex-validation::contradiction::detection::semantic`'s
//! `const NEGATION_PAIRS` table (a fixed rule table compiled once, matched
//! case-insensitively) and `cortex-learning::extraction::rule_based`'s
//! prefix/keyword matching shape — here generalized from pattern-matching
//! a correction into pattern-matching an (utterance → slot, value) fact.
//! Confidence is fixed per rule match (spec default 1.0); hard slots are
//! never produced by a probabilistic path.

use std::sync::LazyLock;

use regex::Regex;

use crt_core::models::HardSlotClaim;
use crt_core::normalize::normalize_value;

/// One Tier A rule: a compiled pattern whose first capture group is the
/// raw slot value, paired with the canonical slot name it fills.
struct SlotRule {
    slot: &'static str,
    pattern: &'static LazyLock<Regex>,
}

macro_rules! slot_regex {
    ($name:ident, $pat:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pat).unwrap());
    };
}

slot_regex!(NAME_RE, r"(?i)\bmy name is ([a-z][a-z '.-]*)");
slot_regex!(AGE_RE, r"(?i)\bi(?:'m| am) (\d{1,3}) years old\b");
slot_regex!(EMPLOYER_RE, r"(?i)\bi work (?:at|for) ([a-z0-9][a-z0-9 &'.,-]*)");
slot_regex!(TITLE_RE, r"(?i)\bi(?:'m| am) (?:a|an) ([a-z][a-z -]*?) at\b");
slot_regex!(OCCUPATION_RE, r"(?i)\bi(?:'m| am) (?:a|an) ([a-z][a-z -]*)");
slot_regex!(LOCATION_RE, r"(?i)\bi live in ([a-z][a-z ,'.-]*)");
slot_regex!(UNDERGRAD_RE, r"(?i)\bi (?:studied|went) (?:at|to) ([a-z][a-z0-9 &'.,-]*?)(?: for my undergrad| for undergrad)\b");
slot_regex!(MASTERS_RE, r"(?i)\bi (?:studied|went) (?:at|to) ([a-z][a-z0-9 &'.,-]*?)(?: for my master'?s| for grad school)\b");
slot_regex!(GRAD_YEAR_RE, r"(?i)\bi graduated in (\d{4})\b");
slot_regex!(MEDICAL_RE, r"(?i)\bi(?:'ve| have) been diagnosed with ([a-z][a-z '-]*)");
slot_regex!(LEGAL_RE, r"(?i)\bmy legal status is ([a-z][a-z '-]*)");
slot_regex!(RELATIONSHIP_RE, r"(?i)\bi(?:'m| am) (single|married|divorced|widowed|engaged|separated)\b");

const RULES: &[SlotRule] = &[
    SlotRule { slot: "name", pattern: &NAME_RE },
    SlotRule { slot: "age", pattern: &AGE_RE },
    SlotRule { slot: "employer", pattern: &EMPLOYER_RE },
    SlotRule { slot: "title", pattern: &TITLE_RE },
    SlotRule { slot: "occupation", pattern: &OCCUPATION_RE },
    SlotRule { slot: "location", pattern: &LOCATION_RE },
    SlotRule { slot: "undergrad_school", pattern: &UNDERGRAD_RE },
    SlotRule { slot: "masters_school", pattern: &MASTERS_RE },
    SlotRule { slot: "graduation_year", pattern: &GRAD_YEAR_RE },
    SlotRule { slot: "medical_diagnosis", pattern: &MEDICAL_RE },
    SlotRule { slot: "legal_status", pattern: &LEGAL_RE },
    SlotRule { slot: "relationship_status", pattern: &RELATIONSHIP_RE },
];

/// Run every Tier A rule against `utterance`, in table order. More than one
/// rule may fire (e.g. "I'm a teacher at Acme" fills both `title` and
/// `employer`); `title`/`occupation` are mutually exclusive per utterance
/// since `title` requires the trailing "at" clause `occupation` lacks.
pub fn extract_hard_slots(utterance: &str) -> Vec<HardSlotClaim> {
    let mut claims = Vec::new();
    let title_matched = TITLE_RE.is_match(utterance);
    for rule in RULES {
        if rule.slot == "occupation" && title_matched {
            continue;
        }
        if let Some(caps) = rule.pattern.captures(utterance) {
            let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let value = normalize_value(rule.slot, raw);
            if value.is_empty() {
                continue;
            }
            claims.push(HardSlotClaim {
                slot: rule.slot.to_string(),
                value,
                confidence: crt_core::config::defaults::DEFAULT_HARD_SLOT_CONFIDENCE,
            });
        }
    }
    claims
}
