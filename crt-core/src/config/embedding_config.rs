use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding + scoring subsystem configuration (spec §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub dimensions: usize,
    pub vector_version: String,
    /// λ in ρ(Δt) = exp(−λ·Δt).
    pub recency_lambda: f64,
    /// α in w = α·trust + (1−α)·confidence.
    pub belief_alpha: f64,
    /// Max entries held by the in-process embedding cache.
    pub cache_capacity: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            vector_version: defaults::DEFAULT_VECTOR_VERSION.to_string(),
            recency_lambda: defaults::DEFAULT_RECENCY_LAMBDA,
            belief_alpha: defaults::DEFAULT_BELIEF_ALPHA,
            cache_capacity: defaults::DEFAULT_EMBEDDING_CACHE_CAPACITY,
        }
    }
}
