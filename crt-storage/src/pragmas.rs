//! PRAGMA configuration applied to every SQLite connection, matching
//! `cortex-storage::pool::pragmas`: WAL mode, NORMAL sync, a generous mmap
//! and page cache, a busy timeout so concurrent readers don't spuriously
//! fail, and foreign keys on.

use rusqlite::Connection;

use crt_core::errors::CrtError;

use crate::to_store_err;

pub fn apply_write_pragmas(conn: &Connection) -> Result<(), CrtError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA mmap_size = 268435456;
        PRAGMA cache_size = -64000;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(to_store_err)?;
    Ok(())
}

pub fn apply_read_pragmas(conn: &Connection) -> Result<(), CrtError> {
    conn.execute_batch(
        "
        PRAGMA query_only = ON;
        PRAGMA mmap_size = 268435456;
        PRAGMA cache_size = -64000;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(to_store_err)?;
    Ok(())
}

