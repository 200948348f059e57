//! v001: memories, ledger_entries, ledger_revisions, schema_version.

use rusqlite::Connection;

use crt_core::errors::CrtError;

use crate::to_store_err;

pub fn migrate(conn: &Connection) -> Result<(), CrtError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS memories (
            memory_id           TEXT PRIMARY KEY,
            thread_id           TEXT NOT NULL,
            text                TEXT NOT NULL,
            slot                TEXT,
            value               TEXT,
            vector              BLOB NOT NULL,
            vector_version      TEXT NOT NULL,
            source              TEXT NOT NULL,
            lane                TEXT NOT NULL,
            confidence          REAL NOT NULL,
            trust               REAL NOT NULL,
            created_at          INTEGER NOT NULL,
            updated_at          INTEGER NOT NULL,
            deprecated          INTEGER NOT NULL DEFAULT 0,
            deprecation_reason  TEXT,
            provenance          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memories_thread_slot_deprecated
            ON memories(thread_id, slot, deprecated);
        CREATE INDEX IF NOT EXISTS idx_memories_thread_created
            ON memories(thread_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_memories_thread_lane
            ON memories(thread_id, lane);

        CREATE TABLE IF NOT EXISTS ledger_revisions (
            ledger_id           TEXT NOT NULL,
            revision_no         INTEGER NOT NULL,
            thread_id           TEXT NOT NULL,
            created_at          INTEGER NOT NULL,
            old_memory_id       TEXT NOT NULL,
            new_memory_id       TEXT NOT NULL,
            contradiction_type  TEXT NOT NULL,
            drift               REAL NOT NULL,
            slot                TEXT,
            status              TEXT NOT NULL,
            resolution_method   TEXT,
            resolved_at         INTEGER,
            superseded_by       TEXT,
            anchor              TEXT NOT NULL,
            PRIMARY KEY (ledger_id, revision_no)
        );

        CREATE INDEX IF NOT EXISTS idx_ledger_revisions_thread
            ON ledger_revisions(thread_id, created_at);

        -- One row per ledger_id pointing at its current (latest) revision,
        -- maintained alongside ledger_revisions so `current`/`next_open`
        -- don't need a MAX(revision_no) subquery per lookup.
        CREATE TABLE IF NOT EXISTS ledger_entries (
            ledger_id    TEXT PRIMARY KEY,
            thread_id    TEXT NOT NULL,
            status       TEXT NOT NULL,
            priority     INTEGER NOT NULL,
            created_at   INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_ledger_entries_thread_status
            ON ledger_entries(thread_id, status, priority, created_at);
        ",
    )
    .map_err(to_store_err)?;
    Ok(())
}
