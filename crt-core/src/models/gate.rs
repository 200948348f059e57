//! Gate pipeline shared types — see spec §4.8.

use serde::{Deserialize, Serialize};

/// The decision a single gate makes about a candidate response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateOutcome {
    /// The candidate response is unchanged.
    Pass,
    /// The response text is modified but the underlying claim is preserved
    /// in a hedged form.
    Rewrite { text: String, tag: &'static str },
    /// The response text is wholly replaced (e.g. with an anchored
    /// clarification prompt or a canned identity statement).
    Replace { text: String, tag: &'static str },
}

impl GateOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, GateOutcome::Pass)
    }

    /// The triggering gate tag, if this outcome is not a `Pass`.
    pub fn triggering_gate(&self) -> Option<&'static str> {
        match self {
            GateOutcome::Pass => None,
            GateOutcome::Rewrite { tag, .. } | GateOutcome::Replace { tag, .. } => Some(tag),
        }
    }
}

/// One audited gate decision, recorded regardless of outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDecision {
    pub gate_name: &'static str,
    pub outcome: GateOutcome,
}
