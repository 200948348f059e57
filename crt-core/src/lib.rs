//! # crt-core
//!
//! Core types, traits, errors, and config shared by every CRT crate: the
//! `Memory` / `LedgerEntry` / `SemanticAnchor` data model (spec §3), the
//! small capability traits collaborators implement (`Embedder`,
//! `ClaimExtractor`, `Clock`, `LlmClient`, `MemoryStore`, `LedgerStore` —
//! spec §6), and the per-subsystem `Config` structs (spec §4 "Ambient
//! stack").

pub mod config;
pub mod errors;
pub mod ids;
pub mod models;
pub mod normalize;
pub mod traits;

pub use config::CrtConfig;
pub use errors::{CrtError, CrtResult};
pub use ids::{LedgerId, MemoryId, ThreadId};
