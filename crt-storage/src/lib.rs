//! # crt-storage
//!
//! Durable SQLite-backed implementations of `MemoryStore` and
//! `LedgerStore` (C3 + the ledger half of C6), following
//! `cortex-storage`'s migration-module and writer/read-pool conventions.

mod boot_check;
mod connection;
mod ledger_row;
mod ledger_store_impl;
mod memory_row;
mod memory_store_impl;
mod migrations;
mod pragmas;
mod turn_commit;

pub use boot_check::{check_consistency, ConsistencyViolation};
pub use connection::StorageEngine;

use crt_core::errors::{CrtError, StoreError};

pub(crate) fn to_store_err(e: impl std::fmt::Display) -> CrtError {
    CrtError::Store(StoreError::Backend(e.to_string()))
}
