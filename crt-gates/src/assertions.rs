//! Extracts candidate factual assertions about the user from an assistant's
//! *candidate response* — the gate-pipeline mirror of `crt-extract`'s
//! first-person rule table (spec §4.8 gates 2 and 3 both need to find "the
//! response claims slot=value about the user" before checking it against
//! retrieved memories).
//!
//! Grounded on `crt-extract::hard_slots`'s `slot_regex!` table idiom,
//! re-anchored from first-person ("I work at") to second-person framing
//! ("you work at", "your employer is").

use std::sync::LazyLock;

use regex::Regex;

use crt_core::normalize::normalize_value;

pub struct Assertion {
    pub slot: &'static str,
    pub value: String,
}

macro_rules! assertion_regex {
    ($name:ident, $pat:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pat).unwrap());
    };
}

assertion_regex!(NAME_RE, r"(?i)\byour name is ([a-z][a-z '.-]*)");
assertion_regex!(EMPLOYER_RE, r"(?i)\byou work (?:at|for) ([a-z0-9][a-z0-9 &'.,-]*)");
assertion_regex!(TITLE_RE, r"(?i)\byou(?:'re| are) (?:a|an) ([a-z][a-z -]*?) at\b");
assertion_regex!(OCCUPATION_RE, r"(?i)\byou(?:'re| are) (?:a|an) ([a-z][a-z -]*)");
assertion_regex!(LOCATION_RE, r"(?i)\byou live in ([a-z][a-z ,'.-]*)");
assertion_regex!(AGE_RE, r"(?i)\byou(?:'re| are) (\d{1,3}) years old\b");

struct AssertionRule {
    slot: &'static str,
    pattern: &'static LazyLock<Regex>,
}

const RULES: &[AssertionRule] = &[
    AssertionRule { slot: "name", pattern: &NAME_RE },
    AssertionRule { slot: "employer", pattern: &EMPLOYER_RE },
    AssertionRule { slot: "title", pattern: &TITLE_RE },
    AssertionRule { slot: "occupation", pattern: &OCCUPATION_RE },
    AssertionRule { slot: "location", pattern: &LOCATION_RE },
    AssertionRule { slot: "age", pattern: &AGE_RE },
];

/// Every second-person hard-slot assertion the candidate response makes.
/// `title` suppresses `occupation`, mirroring `crt-extract`.
pub fn extract_assertions(response: &str) -> Vec<Assertion> {
    let mut out = Vec::new();
    let title_matched = TITLE_RE.is_match(response);
    for rule in RULES {
        if rule.slot == "occupation" && title_matched {
            continue;
        }
        if let Some(caps) = rule.pattern.captures(response) {
            let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let value = normalize_value(rule.slot, raw);
            if !value.is_empty() {
                out.push(Assertion { slot: rule.slot, value });
            }
        }
    }
    out
}

/// Phrases marking a named-reference claim ("you told me", "you said",
/// "you mentioned") — spec §4.8 gate 2.
const NAMED_REFERENCE_MARKERS: &[&str] = &["you told me", "you said", "you mentioned"];

pub fn has_named_reference_claim(response: &str) -> bool {
    let lower = response.to_lowercase();
    NAMED_REFERENCE_MARKERS.iter().any(|m| lower.contains(m))
}

/// Second-person mirror of `crt-extract::open_tuples`'s keyword table — an
/// open (not hard-slot) factual assertion about the user, for gate 3's
/// semantic-match branch.
const OPEN_CLAIM_KEYWORDS: &[&str] =
    &["you enjoy ", "you like ", "your dog is ", "your cat is ", "you're trying to ", "you want to ", "you prefer "];

/// The free-text remainder after the first open-claim keyword found, if any.
pub fn extract_open_claim(response: &str) -> Option<String> {
    let lower = response.to_lowercase();
    for keyword in OPEN_CLAIM_KEYWORDS {
        if let Some(idx) = lower.find(keyword) {
            let start = idx + keyword.len();
            let rest = response[start..].trim_end_matches(['.', '!', '?']).trim();
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    None
}
