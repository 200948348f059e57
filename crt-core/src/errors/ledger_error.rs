use crate::ids::LedgerId;

/// Errors raised by the contradiction ledger (C6) — spec §4.6 and §7.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger entry {0} not found")]
    NotFound(LedgerId),

    #[error("resolution {method:?} is illegal for ledger entry {ledger_id} (type={contradiction_type:?})")]
    IllegalResolution {
        ledger_id: LedgerId,
        method: &'static str,
        contradiction_type: &'static str,
    },

    #[error("ledger entry {0} is already in a terminal state")]
    AlreadyTerminal(LedgerId),
}
