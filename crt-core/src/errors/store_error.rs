use crate::ids::MemoryId;

/// Errors raised by the memory store (C3) — spec §4.3 and §7.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("memory {0} is already deprecated for a different reason")]
    ConflictingDeprecation(MemoryId),

    #[error("memory {0} not found")]
    NotFound(MemoryId),

    #[error(
        "invariant violated: {invariant} (thread={thread_id}, detail={detail})"
    )]
    InvariantViolation {
        invariant: &'static str,
        thread_id: String,
        detail: String,
    },

    #[error("backing engine error: {0}")]
    Backend(String),
}
