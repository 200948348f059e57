//! Per-subsystem leaf errors, aggregated into `CrtError` at the API boundary
//! — see spec §7 "Error Handling Design".

mod extract_error;
mod gate_error;
mod ledger_error;
mod store_error;

pub use extract_error::ExtractError;
pub use gate_error::GateError;
pub use ledger_error::LedgerError;
pub use store_error::StoreError;

pub type CrtResult<T> = Result<T, CrtError>;

/// Top-level error type returned across the Core API (spec §6).
#[derive(Debug, thiserror::Error)]
pub enum CrtError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("invariant violation on boot: {0}")]
    BootInvariantViolation(String),
}
