//! # crt-retrieval
//!
//! Ranks memories for a query by `R = sim * rho * w` (C4, spec §4.4):
//! fetch a similarity-ranked candidate pool from `MemoryStore::candidates`,
//! drop deprecated/speech/low-trust memories, score, and return the top-k
//! with a deterministic tie-break.

pub mod engine;

pub use engine::{RetrievalEngine, ScoredMemory};
