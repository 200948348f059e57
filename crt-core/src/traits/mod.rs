pub mod claim_extractor;
pub mod clock;
pub mod embedder;
pub mod ledger_store;
pub mod llm;
pub mod memory_store;

pub use claim_extractor::ClaimExtractor;
pub use clock::Clock;
pub use embedder::Embedder;
pub use ledger_store::LedgerStore;
pub use llm::{LlmClient, NullLlm};
pub use memory_store::MemoryStore;
