//! Semantic Anchor — see spec §3 and §4.6. Created atomically with a
//! ledger entry, immutable thereafter, and the sole binding between a
//! stored conflict and any follow-up generated for it.

use serde::{Deserialize, Serialize};

use crate::ids::{LedgerId, MemoryId, ThreadId};
use crate::models::contradiction::ContradictionType;

/// The shape of answer a clarification question expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedAnswerShape {
    ChooseOne,
    TemporalOrder,
    BothTrue,
    FreeCorrection,
}

impl From<ContradictionType> for ExpectedAnswerShape {
    fn from(t: ContradictionType) -> Self {
        match t {
            ContradictionType::Conflict => ExpectedAnswerShape::ChooseOne,
            ContradictionType::Temporal => ExpectedAnswerShape::TemporalOrder,
            ContradictionType::Refinement => ExpectedAnswerShape::BothTrue,
            ContradictionType::Revision => ExpectedAnswerShape::FreeCorrection,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticAnchor {
    pub ledger_id: LedgerId,
    pub thread_id: ThreadId,
    pub created_turn: i64,

    pub contradiction_type: ContradictionType,
    pub old_memory_id: MemoryId,
    pub new_memory_id: MemoryId,
    pub slot: Option<String>,
    pub old_value: String,
    pub new_value: String,
    pub drift: f64,

    /// Unit vector from the old embedding to the new embedding, for later
    /// similarity checks against follow-up answers.
    pub direction: Vec<f32>,

    pub expected_answer_shape: ExpectedAnswerShape,
    pub rendered_prompt: String,
}
