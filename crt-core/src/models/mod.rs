pub mod anchor;
pub mod contradiction;
pub mod extraction;
pub mod gate;
pub mod memory;
pub mod turn;

pub use anchor::{ExpectedAnswerShape, SemanticAnchor};
pub use contradiction::{ContradictionType, LedgerEntry, LedgerStatus, ResolutionMethod};
pub use extraction::{ExtractionResult, HardSlotClaim, OpenTuple, RULE_ONLY_SLOTS};
pub use gate::{GateDecision, GateOutcome};
pub use memory::{Lane, Memory, NewMemory, Provenance, Source};
pub use turn::{
    ContradictionDraft, DetectionOutput, OpenContradiction, ResolutionRequest, ResolutionResult,
    TurnAudit, TurnResult,
};
