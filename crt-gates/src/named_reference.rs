//! Gate 2: named-reference — spec §4.8.
//!
//! If the response asserts "you told me X" (or equivalent) and no
//! belief-lane memory with a matching slot/value is among the retrieved
//! set, rewrite to express uncertainty rather than let an unsupported
//! attribution stand.

use crt_core::models::{GateOutcome, Lane, Memory};

use crate::assertions::{extract_assertions, has_named_reference_claim};

pub fn named_reference_gate(response: &str, retrieved: &[Memory]) -> GateOutcome {
    if !has_named_reference_claim(response) {
        return GateOutcome::Pass;
    }

    let assertions = extract_assertions(response);
    let supported = !assertions.is_empty()
        && assertions.iter().all(|a| {
            retrieved
                .iter()
                .any(|m| m.lane == Lane::Belief && m.slot.as_deref() == Some(a.slot) && m.value.as_deref() == Some(a.value.as_str()))
        });

    if supported {
        GateOutcome::Pass
    } else {
        GateOutcome::Rewrite {
            text: "I'm not fully sure you told me that — could you confirm?".to_string(),
            tag: "named-reference",
        }
    }
}
