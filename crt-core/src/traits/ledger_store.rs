use std::sync::Arc;

use crate::errors::CrtResult;
use crate::ids::{LedgerId, ThreadId};
use crate::models::{LedgerEntry, LedgerStatus, ResolutionMethod};

/// The append-only contradiction ledger (C6) — spec §4.6.
pub trait LedgerStore: Send + Sync {
    /// Append the opening (`open`, revision 0) row.
    fn append(&self, entry: LedgerEntry) -> CrtResult<()>;

    /// Current (latest revision) row for a ledger id.
    fn current(&self, ledger_id: &LedgerId) -> CrtResult<Option<LedgerEntry>>;

    /// Every revision row for a ledger id, oldest first.
    fn history(&self, ledger_id: &LedgerId) -> CrtResult<Vec<LedgerEntry>>;

    /// The highest-priority open/asked entry for a thread, per spec's
    /// `conflict > revision > temporal > refinement`, then oldest-first.
    fn next_open(&self, thread_id: &ThreadId) -> CrtResult<Option<LedgerEntry>>;

    /// Append a new revision row transitioning `status`.
    fn append_revision(
        &self,
        ledger_id: &LedgerId,
        status: LedgerStatus,
        resolution_method: Option<ResolutionMethod>,
        superseded_by: Option<LedgerId>,
        at: i64,
    ) -> CrtResult<LedgerEntry>;

    /// All current-revision entries for a thread (used by the
    /// contradiction-status gate and audit).
    fn open_and_asked_for_thread(&self, thread_id: &ThreadId) -> CrtResult<Vec<LedgerEntry>>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn append(&self, entry: LedgerEntry) -> CrtResult<()> {
        (**self).append(entry)
    }
    fn current(&self, ledger_id: &LedgerId) -> CrtResult<Option<LedgerEntry>> {
        (**self).current(ledger_id)
    }
    fn history(&self, ledger_id: &LedgerId) -> CrtResult<Vec<LedgerEntry>> {
        (**self).history(ledger_id)
    }
    fn next_open(&self, thread_id: &ThreadId) -> CrtResult<Option<LedgerEntry>> {
        (**self).next_open(thread_id)
    }
    fn append_revision(
        &self,
        ledger_id: &LedgerId,
        status: LedgerStatus,
        resolution_method: Option<ResolutionMethod>,
        superseded_by: Option<LedgerId>,
        at: i64,
    ) -> CrtResult<LedgerEntry> {
        (**self).append_revision(ledger_id, status, resolution_method, superseded_by, at)
    }
    fn open_and_asked_for_thread(&self, thread_id: &ThreadId) -> CrtResult<Vec<LedgerEntry>> {
        (**self).open_and_asked_for_thread(thread_id)
    }
}
