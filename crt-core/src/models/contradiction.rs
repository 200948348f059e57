//! The contradiction ledger entry and its resolution state machine —
//! see spec §3 "Contradiction (ledger entry)" and §4.6.

use serde::{Deserialize, Serialize};

use crate::ids::{LedgerId, MemoryId, ThreadId};
use crate::models::anchor::SemanticAnchor;

/// Classification of a detected contradiction. Drives downstream behavior —
/// treating every contradiction as `Conflict` is the bug class this type
/// exists to prevent (see GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionType {
    Refinement,
    Revision,
    Temporal,
    Conflict,
}

impl ContradictionType {
    /// Priority used by `next_open`: `conflict` > `revision` > `temporal` > `refinement`.
    pub fn priority(self) -> u8 {
        match self {
            ContradictionType::Conflict => 3,
            ContradictionType::Revision => 2,
            ContradictionType::Temporal => 1,
            ContradictionType::Refinement => 0,
        }
    }
}

/// Ledger entry lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    Open,
    Asked,
    Resolved,
    Dismissed,
    Superseded,
}

impl LedgerStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LedgerStatus::Resolved | LedgerStatus::Dismissed | LedgerStatus::Superseded
        )
    }
}

/// How a ledger entry reached a terminal (or auto-applied) resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    UserOverride,
    UserPreserve,
    UserMerge,
    UserBothTrue,
    AutoTemporal,
    AutoRefinement,
}

/// A single revision row in the append-only ledger. `(ledger_id, revision_no)`
/// is the storage key; only the latest revision per `ledger_id` is "current".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub ledger_id: LedgerId,
    pub revision_no: u32,
    pub thread_id: ThreadId,
    pub created_at: i64,
    pub old_memory_id: MemoryId,
    pub new_memory_id: MemoryId,
    pub contradiction_type: ContradictionType,
    pub drift: f64,
    pub slot: Option<String>,
    pub status: LedgerStatus,
    pub resolution_method: Option<ResolutionMethod>,
    pub resolved_at: Option<i64>,
    /// Populated only when `status == Superseded`.
    pub superseded_by: Option<LedgerId>,
    pub anchor: SemanticAnchor,
}

impl LedgerEntry {
    /// Build the first (`open`, revision 0) row for a freshly detected
    /// contradiction. Auto-resolvable types (`temporal`, `refinement`) are
    /// expected to be immediately followed by an `auto_*` revision — see
    /// `crt-contradiction::ledger`.
    pub fn opened(
        ledger_id: LedgerId,
        thread_id: ThreadId,
        created_at: i64,
        old_memory_id: MemoryId,
        new_memory_id: MemoryId,
        contradiction_type: ContradictionType,
        drift: f64,
        slot: Option<String>,
        anchor: SemanticAnchor,
    ) -> Self {
        Self {
            ledger_id,
            revision_no: 0,
            thread_id,
            created_at,
            old_memory_id,
            new_memory_id,
            contradiction_type,
            drift,
            slot,
            status: LedgerStatus::Open,
            resolution_method: None,
            resolved_at: None,
            superseded_by: None,
            anchor,
        }
    }

    /// Derive the next revision row from this one, bumping `revision_no`.
    pub fn next_revision(&self, status: LedgerStatus, at: i64) -> Self {
        let mut next = self.clone();
        next.revision_no += 1;
        next.status = status;
        if status.is_terminal() {
            next.resolved_at = Some(at);
        }
        next
    }
}
