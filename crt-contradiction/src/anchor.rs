//! Semantic Anchor construction — spec §3, §4.6, and SPEC_FULL §4.6.1's
//! one-template-per-type prompts. Built atomically alongside a ledger
//! entry and never mutated afterward.

use crt_core::ids::{LedgerId, MemoryId, ThreadId};
use crt_core::models::{ContradictionType, ExpectedAnswerShape, SemanticAnchor};

/// Unit vector from `old` to `new`; zero vector if the two coincide or
/// either is zero-length (mirrors `crt_embed::cosine_similarity`'s
/// "undefined compares to 0" convention rather than panicking).
pub fn direction_vector(old: &[f32], new: &[f32]) -> Vec<f32> {
    if old.len() != new.len() || old.is_empty() {
        return Vec::new();
    }
    let diff: Vec<f32> = new.iter().zip(old).map(|(n, o)| n - o).collect();
    let norm = diff.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        diff
    } else {
        diff.into_iter().map(|v| v / norm).collect()
    }
}

/// One deterministic clarification template per contradiction type —
/// SPEC_FULL §4.6.1.
fn render_prompt(contradiction_type: ContradictionType, slot: &str, old_value: &str, new_value: &str) -> String {
    match contradiction_type {
        ContradictionType::Conflict => format!(
            "You previously told me your {slot} was {old_value}. Now you're saying {new_value}. Which one is correct?"
        ),
        ContradictionType::Temporal => format!(
            "Earlier you said your {slot} was {old_value}; now {new_value}. Should I treat {new_value} as the current value going forward?"
        ),
        ContradictionType::Refinement => format!(
            "Got it — {new_value} narrows down {old_value}. I'll keep both unless you say otherwise."
        ),
        ContradictionType::Revision => format!(
            "Just to confirm: you're correcting {slot} from {old_value} to {new_value}, right?"
        ),
    }
}

/// Build the anchor for a freshly detected contradiction. `slot` falls
/// back to `"this"` for slot-less semantic-path pairs so the templates
/// still read naturally.
#[allow(clippy::too_many_arguments)]
pub fn build_anchor(
    ledger_id: LedgerId,
    thread_id: ThreadId,
    created_turn: i64,
    contradiction_type: ContradictionType,
    old_memory_id: MemoryId,
    new_memory_id: MemoryId,
    slot: Option<String>,
    old_value: &str,
    new_value: &str,
    drift: f64,
    old_vector: &[f32],
    new_vector: &[f32],
) -> SemanticAnchor {
    let slot_for_prompt = slot.clone().unwrap_or_else(|| "this".to_string());
    let rendered_prompt = render_prompt(contradiction_type, &slot_for_prompt, old_value, new_value);
    SemanticAnchor {
        ledger_id,
        thread_id,
        created_turn,
        contradiction_type,
        old_memory_id,
        new_memory_id,
        slot,
        old_value: old_value.to_string(),
        new_value: new_value.to_string(),
        drift,
        direction: direction_vector(old_vector, new_vector),
        expected_answer_shape: ExpectedAnswerShape::from(contradiction_type),
        rendered_prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_prompt_asks_to_choose() {
        let p = render_prompt(ContradictionType::Conflict, "employer", "amazon", "google");
        assert!(p.contains("Which one is correct?"));
    }

    #[test]
    fn revision_prompt_confirms_correction() {
        let p = render_prompt(ContradictionType::Revision, "employer", "amazon", "google");
        assert!(p.contains("correcting employer"));
    }

    #[test]
    fn direction_vector_is_unit_length() {
        let d = direction_vector(&[1.0, 0.0], &[0.0, 1.0]);
        let norm = (d[0] * d[0] + d[1] * d[1]).sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn direction_vector_of_identical_inputs_is_zero() {
        let d = direction_vector(&[1.0, 0.0], &[1.0, 0.0]);
        assert_eq!(d, vec![0.0, 0.0]);
    }
}
