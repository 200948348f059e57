//! Gate 4: contradiction-status — spec §4.8.
//!
//! If any `open` or `asked` ledger entry in this thread touches a value
//! mentioned in the candidate response, replace the response outright with
//! that entry's anchored clarification prompt (spec §4.6) — the assistant
//! must ask before answering with disputed information.

use crt_core::models::{GateOutcome, LedgerEntry, LedgerStatus};

pub fn contradiction_status_gate(response: &str, open_entries: &[LedgerEntry]) -> GateOutcome {
    let lower = response.to_lowercase();
    for entry in open_entries {
        if !matches!(entry.status, LedgerStatus::Open | LedgerStatus::Asked) {
            continue;
        }
        let old_value = entry.anchor.old_value.to_lowercase();
        let new_value = entry.anchor.new_value.to_lowercase();
        let mentions = (!old_value.is_empty() && lower.contains(&old_value)) || (!new_value.is_empty() && lower.contains(&new_value));
        if mentions {
            return GateOutcome::Replace {
                text: entry.anchor.rendered_prompt.clone(),
                tag: "contradiction-status",
            };
        }
    }
    GateOutcome::Pass
}
