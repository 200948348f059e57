//! Connection ownership: a single writer connection behind a `Mutex`, plus
//! a small round-robin read pool — matches `cortex-storage::pool`'s
//! writer/read-pool split, adapted to CRT's synchronous trait surface
//! (`MemoryStore`/`LedgerStore` are plain `fn`s, not `async fn`, so a
//! `std::sync::Mutex` suffices in place of the teacher's `tokio::sync::Mutex`).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::Connection;

use crt_core::errors::CrtError;

use crate::boot_check::check_consistency;
use crate::migrations;
use crate::pragmas::{apply_read_pragmas, apply_write_pragmas};
use crate::to_store_err;

const DEFAULT_READ_POOL_SIZE: usize = 4;

pub struct StorageEngine {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    next_reader: AtomicUsize,
    #[allow(dead_code)]
    db_path: Option<PathBuf>,
}

impl StorageEngine {
    pub fn open(path: &Path) -> Result<Self, CrtError> {
        Self::open_with_read_pool_size(path, DEFAULT_READ_POOL_SIZE)
    }

    pub fn open_with_read_pool_size(path: &Path, read_pool_size: usize) -> Result<Self, CrtError> {
        let writer = Connection::open(path).map_err(to_store_err)?;
        apply_write_pragmas(&writer)?;
        migrations::run_all(&writer)?;

        let mut readers = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size.max(1) {
            let conn = Connection::open(path).map_err(to_store_err)?;
            apply_read_pragmas(&conn)?;
            readers.push(Mutex::new(conn));
        }

        let engine = Self {
            writer: Mutex::new(writer),
            readers,
            next_reader: AtomicUsize::new(0),
            db_path: Some(path.to_path_buf()),
        };
        halt_on_boot_violation(&engine)?;
        Ok(engine)
    }

    /// An in-memory engine for tests. Writer and readers share one
    /// connection since SQLite's `:memory:` databases are private per
    /// connection — unlike a real pool, this loses read/write
    /// concurrency, which is acceptable for unit tests.
    pub fn open_in_memory() -> Result<Self, CrtError> {
        let writer = Connection::open_in_memory().map_err(to_store_err)?;
        apply_write_pragmas(&writer).ok();
        migrations::run_all(&writer)?;
        let engine = Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            next_reader: AtomicUsize::new(0),
            db_path: None,
        };
        halt_on_boot_violation(&engine)?;
        Ok(engine)
    }

    pub fn with_writer<F, T>(&self, f: F) -> Result<T, CrtError>
    where
        F: FnOnce(&Connection) -> Result<T, CrtError>,
    {
        let conn = self.writer.lock().map_err(|_| to_store_err("writer connection poisoned"))?;
        f(&conn)
    }

    /// Run `f` against a read connection, round-robin across the pool. For
    /// the in-memory test engine (empty pool) this falls back to the
    /// writer connection.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, CrtError>
    where
        F: FnOnce(&Connection) -> Result<T, CrtError>,
    {
        if self.readers.is_empty() {
            return self.with_writer(f);
        }
        let idx = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|_| to_store_err("read connection poisoned"))?;
        f(&conn)
    }
}

/// Boot-time consistency check (spec §6 "A boot-time consistency check must
/// verify the belief-lane uniqueness invariant and the... resolving ledger
/// entry invariant; a violation halts startup", spec §7 "Invariant violation
/// on boot — fatal; halt and require operator intervention"). Never repairs
/// by deleting rows — just refuses to open.
fn halt_on_boot_violation(engine: &StorageEngine) -> Result<(), CrtError> {
    let violations = check_consistency(engine)?;
    if violations.is_empty() {
        return Ok(());
    }
    Err(CrtError::BootInvariantViolation(format!("{violations:?}")))
}
