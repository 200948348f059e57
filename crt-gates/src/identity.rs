//! Gate 1: assistant-identity — spec §4.8.
//!
//! If the candidate response claims a personal attribute of the assistant
//! (sentience, a creator it can speak for, lived experience) inconsistent
//! with the fixed identity record, replace the whole response with the
//! canned identity statement.

use crt_core::config::GateConfig;
use crt_core::models::GateOutcome;

const IDENTITY_VIOLATION_MARKERS: &[&str] = &[
    "i am conscious",
    "i'm conscious",
    "i have feelings",
    "i have emotions",
    "my creator is",
    "i was created by",
    "i am human",
    "i'm human",
    "i have a family",
    "when i was a child",
    "i remember my childhood",
];

pub fn assistant_identity_gate(response: &str, config: &GateConfig) -> GateOutcome {
    let lower = response.to_lowercase();
    if IDENTITY_VIOLATION_MARKERS.iter().any(|m| lower.contains(m)) {
        return GateOutcome::Replace {
            text: config.assistant_identity_statement.clone(),
            tag: "assistant-identity",
        };
    }
    GateOutcome::Pass
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_sentience_claim() {
        let outcome = assistant_identity_gate("I am conscious and I enjoy our talks.", &GateConfig::default());
        assert!(matches!(outcome, GateOutcome::Replace { tag: "assistant-identity", .. }));
    }

    #[test]
    fn passes_ordinary_response() {
        let outcome = assistant_identity_gate("You work at Amazon.", &GateConfig::default());
        assert!(outcome.is_pass());
    }
}
