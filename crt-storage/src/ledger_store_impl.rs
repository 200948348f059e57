//! `LedgerStore` (C6 durability) over `StorageEngine` — spec §4.6.

use rusqlite::params;

use crt_core::errors::{CrtError, CrtResult, LedgerError};
use crt_core::ids::{LedgerId, ThreadId};
use crt_core::models::{LedgerEntry, LedgerStatus, ResolutionMethod};
use crt_core::traits::LedgerStore;

use crate::ledger_row::{insert_ledger_revision, row_to_ledger_entry};
use crate::{to_store_err, StorageEngine};

fn fetch_current(conn: &rusqlite::Connection, ledger_id: &LedgerId) -> rusqlite::Result<Option<LedgerEntry>> {
    conn.query_row(
        "SELECT * FROM ledger_revisions WHERE ledger_id = ?1 ORDER BY revision_no DESC LIMIT 1",
        params![ledger_id.as_str()],
        row_to_ledger_entry,
    )
    .map(Some)
    .or_else(|e| if matches!(e, rusqlite::Error::QueryReturnedNoRows) { Ok(None) } else { Err(e) })
}

impl LedgerStore for StorageEngine {
    fn append(&self, entry: LedgerEntry) -> CrtResult<()> {
        self.with_writer(|conn| insert_ledger_revision(conn, &entry))
    }

    fn current(&self, ledger_id: &LedgerId) -> CrtResult<Option<LedgerEntry>> {
        self.with_reader(|conn| fetch_current(conn, ledger_id).map_err(to_store_err))
    }

    fn history(&self, ledger_id: &LedgerId) -> CrtResult<Vec<LedgerEntry>> {
        self.with_reader(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM ledger_revisions WHERE ledger_id = ?1 ORDER BY revision_no ASC")
                .map_err(to_store_err)?;
            let rows = stmt
                .query_map(params![ledger_id.as_str()], row_to_ledger_entry)
                .map_err(to_store_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(to_store_err)
        })
    }

    fn next_open(&self, thread_id: &ThreadId) -> CrtResult<Option<LedgerEntry>> {
        let ledger_id: Option<String> = self.with_reader(|conn| {
            conn.query_row(
                "SELECT ledger_id FROM ledger_entries
                 WHERE thread_id = ?1 AND status IN ('open', 'asked')
                 ORDER BY priority DESC, created_at ASC
                 LIMIT 1",
                params![thread_id.as_str()],
                |r| r.get(0),
            )
            .map(Some)
            .or_else(|e| if matches!(e, rusqlite::Error::QueryReturnedNoRows) { Ok(None) } else { Err(to_store_err(e)) })
        })?;

        match ledger_id {
            None => Ok(None),
            Some(id) => self.current(&LedgerId::from(id)),
        }
    }

    fn append_revision(
        &self,
        ledger_id: &LedgerId,
        status: LedgerStatus,
        resolution_method: Option<ResolutionMethod>,
        superseded_by: Option<LedgerId>,
        at: i64,
    ) -> CrtResult<LedgerEntry> {
        self.with_writer(|conn| {
            let current = fetch_current(conn, ledger_id)
                .map_err(to_store_err)?
                .ok_or_else(|| CrtError::Ledger(LedgerError::NotFound(ledger_id.clone())))?;

            if current.status.is_terminal() {
                return Err(CrtError::Ledger(LedgerError::AlreadyTerminal(ledger_id.clone())));
            }

            let mut next = current.next_revision(status, at);
            next.resolution_method = resolution_method;
            next.superseded_by = superseded_by;

            insert_ledger_revision(conn, &next)?;
            Ok(next)
        })
    }

    fn open_and_asked_for_thread(&self, thread_id: &ThreadId) -> CrtResult<Vec<LedgerEntry>> {
        let ids: Vec<String> = self.with_reader(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT ledger_id FROM ledger_entries
                     WHERE thread_id = ?1 AND status IN ('open', 'asked')
                     ORDER BY priority DESC, created_at ASC",
                )
                .map_err(to_store_err)?;
            let rows = stmt
                .query_map(params![thread_id.as_str()], |r| r.get(0))
                .map_err(to_store_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(to_store_err)
        })?;

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entry) = self.current(&LedgerId::from(id))? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

