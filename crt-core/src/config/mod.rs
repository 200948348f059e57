pub mod contradiction_config;
pub mod defaults;
pub mod embedding_config;
pub mod extraction_config;
pub mod gate_config;
pub mod retrieval_config;
pub mod trust_config;

pub use contradiction_config::ContradictionConfig;
pub use embedding_config::EmbeddingConfig;
pub use extraction_config::ExtractionConfig;
pub use gate_config::GateConfig;
pub use retrieval_config::RetrievalConfig;
pub use trust_config::TrustConfig;

use serde::{Deserialize, Serialize};

/// Top-level config aggregating every subsystem's tunables, loadable from a
/// single TOML file (mirrors `cortex-core::config`'s per-subsystem split).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrtConfig {
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub contradiction: ContradictionConfig,
    pub trust: TrustConfig,
    pub gate: GateConfig,
    pub extraction: ExtractionConfig,
}

impl CrtConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
