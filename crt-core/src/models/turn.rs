//! Turn-level API records — see spec §6 "Core API".

use serde::{Deserialize, Serialize};

use crate::ids::{LedgerId, MemoryId, ThreadId};
use crate::models::anchor::SemanticAnchor;
use crate::models::contradiction::{ContradictionType, LedgerEntry, ResolutionMethod};
use crate::models::gate::GateDecision;
use crate::models::memory::Lane;

/// Returned by `send_turn`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResult {
    pub final_response: String,
    pub response_lane: Lane,
    pub retrieved_memory_ids: Vec<MemoryId>,
    pub gate_decisions: Vec<GateDecision>,
    pub contradictions_created: Vec<LedgerId>,
    pub open_ledger_surfaced: Option<LedgerId>,
}

/// Returned by `next_contradiction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenContradiction {
    pub ledger_entry: LedgerEntry,
    pub anchor: SemanticAnchor,
}

/// Returned by `resolve_contradiction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub ledger_entry: LedgerEntry,
    pub new_memory_id: Option<MemoryId>,
    pub deprecated_memory_ids: Vec<MemoryId>,
}

/// Caller-facing resolution request — a superset of `ResolutionMethod` that
/// also allows `dismiss` (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionRequest {
    UserOverride,
    UserPreserve,
    UserMerge,
    UserBothTrue,
    Dismiss,
}

impl ResolutionRequest {
    pub fn as_method(self) -> Option<ResolutionMethod> {
        match self {
            ResolutionRequest::UserOverride => Some(ResolutionMethod::UserOverride),
            ResolutionRequest::UserPreserve => Some(ResolutionMethod::UserPreserve),
            ResolutionRequest::UserMerge => Some(ResolutionMethod::UserMerge),
            ResolutionRequest::UserBothTrue => Some(ResolutionMethod::UserBothTrue),
            ResolutionRequest::Dismiss => None,
        }
    }
}

/// The committed turn record returned by `audit_turn`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnAudit {
    pub thread_id: ThreadId,
    pub turn_id: i64,
    pub extracted_hard_slots: usize,
    pub extracted_open_tuples: usize,
    pub extraction_degraded: bool,
    pub ledger_events: Vec<LedgerId>,
    pub retrieved_memory_ids: Vec<MemoryId>,
    pub gate_decisions: Vec<GateDecision>,
}

/// A freshly detected contradiction, prior to being persisted as a ledger
/// entry — the output of C5 (spec §4.5).
#[derive(Debug, Clone)]
pub struct ContradictionDraft {
    pub old_memory_id: MemoryId,
    pub new_memory_id: MemoryId,
    pub contradiction_type: ContradictionType,
    pub drift: f64,
    pub slot: Option<String>,
}

/// Full output of one C5 pass over a turn's extracted claims: contradiction
/// drafts alongside the memories a restated, unchanged value confirms
/// (spec §4.7 "user restates consistent value").
#[derive(Debug, Clone, Default)]
pub struct DetectionOutput {
    pub drafts: Vec<ContradictionDraft>,
    pub confirmations: Vec<MemoryId>,
}
