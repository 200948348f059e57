//! The contradiction ledger engine (C6) — spec §4.6: turns a detected
//! `ContradictionDraft` into an opened ledger entry + anchor, and applies
//! the resolution-effect state machine spec §4.6 and §6 describe.
//!
//! Grounded on `cortex-session`'s lifecycle-effect dispatch (a match over
//! a small closed set of transition kinds, each producing a list of store
//! writes) generalized from session bookkeeping to ledger resolution.

use std::sync::Arc;

use crt_core::errors::{CrtError, CrtResult, LedgerError};
use crt_core::ids::{LedgerId, MemoryId, ThreadId};
use crt_core::models::{
    ContradictionDraft, ContradictionType, LedgerEntry, LedgerStatus, Memory, ResolutionMethod,
    ResolutionRequest, SemanticAnchor,
};
use crt_core::traits::{LedgerStore, MemoryStore};

use crate::anchor::build_anchor;

pub struct LedgerEngine {
    store: Arc<dyn LedgerStore>,
    memories: Arc<dyn MemoryStore>,
}

/// Effect of resolving or auto-resolving a ledger entry: which memory (if
/// any) becomes current, and which memories get deprecated. The caller
/// (crt-session) applies these alongside the returned `LedgerEntry` inside
/// one atomic `commit_turn`.
pub struct ResolutionEffect {
    pub entry: LedgerEntry,
    pub deprecate: Vec<MemoryId>,
}

impl LedgerEngine {
    pub fn new(store: Arc<dyn LedgerStore>, memories: Arc<dyn MemoryStore>) -> Self {
        Self { store, memories }
    }

    /// Build (but do not persist) the opening ledger entry + anchor for a
    /// freshly detected contradiction. The caller commits it as part of the
    /// same atomic turn write as the new memory (spec §9).
    pub fn open(
        &self,
        thread_id: &ThreadId,
        turn: i64,
        draft: &ContradictionDraft,
        old_memory: &Memory,
        new_memory: &Memory,
    ) -> LedgerEntry {
        let ledger_id = LedgerId::new();

        let anchor = build_anchor(
            ledger_id.clone(),
            thread_id.clone(),
            turn,
            draft.contradiction_type,
            draft.old_memory_id.clone(),
            draft.new_memory_id.clone(),
            draft.slot.clone(),
            old_memory.value.as_deref().unwrap_or(&old_memory.text),
            new_memory.value.as_deref().unwrap_or(&new_memory.text),
            draft.drift,
            &old_memory.vector,
            &new_memory.vector,
        );

        LedgerEntry::opened(
            ledger_id,
            thread_id.clone(),
            turn,
            draft.old_memory_id.clone(),
            draft.new_memory_id.clone(),
            draft.contradiction_type,
            draft.drift,
            draft.slot.clone(),
            anchor,
        )
    }

    /// Auto-resolve `temporal`/`refinement` entries immediately after
    /// opening (spec §4.6: these never block on a user answer). Neither
    /// type deprecates anything — spec §8 scenarios 2 and 3 both end with
    /// "both non-deprecated"; temporal coexistence relies on recency
    /// (`rho`) to prefer the newer memory at retrieval time rather than on
    /// removing the older one. Returns `None` for `conflict`/`revision`,
    /// which stay `open` until asked.
    pub fn auto_resolve(&self, opened: &LedgerEntry, at: i64) -> Option<ResolutionEffect> {
        match opened.contradiction_type {
            ContradictionType::Temporal => Some(ResolutionEffect {
                entry: opened.next_revision(LedgerStatus::Resolved, at).with_method(ResolutionMethod::AutoTemporal, at),
                deprecate: Vec::new(),
            }),
            ContradictionType::Refinement => Some(ResolutionEffect {
                entry: opened.next_revision(LedgerStatus::Resolved, at).with_method(ResolutionMethod::AutoRefinement, at),
                deprecate: Vec::new(),
            }),
            ContradictionType::Conflict | ContradictionType::Revision => None,
        }
    }

    /// Mark the highest-priority open entry for a thread as `asked`,
    /// idempotent if it is already `asked`.
    pub fn mark_next_asked(&self, thread_id: &ThreadId, at: i64) -> CrtResult<Option<LedgerEntry>> {
        let Some(entry) = self.store.next_open(thread_id)? else { return Ok(None) };
        if entry.status == LedgerStatus::Asked {
            return Ok(Some(entry));
        }
        let updated = self.store.append_revision(&entry.ledger_id, LedgerStatus::Asked, None, None, at)?;
        Ok(Some(updated))
    }

    /// Apply a user's resolution decision. `Dismiss` always succeeds;
    /// every other method is only legal for the contradiction type it was
    /// designed for (spec §4.6's resolution-effect table).
    pub fn resolve(
        &self,
        ledger_id: &LedgerId,
        request: ResolutionRequest,
        at: i64,
    ) -> CrtResult<ResolutionEffect> {
        let current = self
            .store
            .current(ledger_id)?
            .ok_or_else(|| CrtError::Ledger(LedgerError::NotFound(ledger_id.clone())))?;

        if current.status.is_terminal() {
            return Err(CrtError::Ledger(LedgerError::AlreadyTerminal(ledger_id.clone())));
        }

        if request == ResolutionRequest::Dismiss {
            let entry = self.store.append_revision(ledger_id, LedgerStatus::Dismissed, None, None, at)?;
            return Ok(ResolutionEffect { entry, deprecate: Vec::new() });
        }

        let method = request.as_method().expect("non-Dismiss request always has a method");

        let legal = match (current.contradiction_type, method) {
            (ContradictionType::Conflict, ResolutionMethod::UserOverride) => true,
            (ContradictionType::Conflict, ResolutionMethod::UserPreserve) => true,
            (ContradictionType::Revision, ResolutionMethod::UserOverride) => true,
            (ContradictionType::Revision, ResolutionMethod::UserMerge) => true,
            (_, ResolutionMethod::UserBothTrue) => {
                matches!(current.contradiction_type, ContradictionType::Refinement | ContradictionType::Temporal)
            }
            _ => false,
        };

        if !legal {
            return Err(CrtError::Ledger(LedgerError::IllegalResolution {
                ledger_id: ledger_id.clone(),
                method: method_name(method),
                contradiction_type: type_name(current.contradiction_type),
            }));
        }

        let deprecate = match method {
            ResolutionMethod::UserOverride => vec![current.old_memory_id.clone()],
            ResolutionMethod::UserPreserve => vec![current.new_memory_id.clone()],
            ResolutionMethod::UserMerge => vec![current.old_memory_id.clone(), current.new_memory_id.clone()],
            ResolutionMethod::UserBothTrue => Vec::new(),
            ResolutionMethod::AutoTemporal | ResolutionMethod::AutoRefinement => Vec::new(),
        };

        let entry = self
            .store
            .append_revision(ledger_id, LedgerStatus::Resolved, Some(method), None, at)?;

        Ok(ResolutionEffect { entry, deprecate })
    }

    pub fn memories(&self) -> &Arc<dyn MemoryStore> {
        &self.memories
    }
}

fn method_name(m: ResolutionMethod) -> &'static str {
    match m {
        ResolutionMethod::UserOverride => "user_override",
        ResolutionMethod::UserPreserve => "user_preserve",
        ResolutionMethod::UserMerge => "user_merge",
        ResolutionMethod::UserBothTrue => "user_both_true",
        ResolutionMethod::AutoTemporal => "auto_temporal",
        ResolutionMethod::AutoRefinement => "auto_refinement",
    }
}

fn type_name(t: ContradictionType) -> &'static str {
    match t {
        ContradictionType::Refinement => "refinement",
        ContradictionType::Revision => "revision",
        ContradictionType::Temporal => "temporal",
        ContradictionType::Conflict => "conflict",
    }
}

trait WithMethod {
    fn with_method(self, method: ResolutionMethod, at: i64) -> Self;
}

impl WithMethod for LedgerEntry {
    fn with_method(mut self, method: ResolutionMethod, at: i64) -> Self {
        self.resolution_method = Some(method);
        self.resolved_at = Some(at);
        self
    }
}
