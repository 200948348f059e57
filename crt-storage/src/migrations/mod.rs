//! Versioned schema migrations, one module per version — matches
//! `cortex-storage::migrations`'s `v00N_description` convention.

mod v001_initial_schema;

use rusqlite::Connection;

use crt_core::errors::CrtError;

use crate::to_store_err;

const CURRENT_VERSION: i64 = 1;

/// Apply every migration newer than the database's recorded
/// `schema_version`, in order. Idempotent: safe to call on every boot.
pub fn run_all(conn: &Connection) -> Result<(), CrtError> {
    v001_initial_schema::migrate(conn)?;

    let applied: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
        .map_err(to_store_err)?;
    if applied < CURRENT_VERSION {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_VERSION],
        )
        .map_err(to_store_err)?;
    }
    Ok(())
}
