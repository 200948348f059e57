//! Deterministic, dependency-free embedding provider.
//!
//! Always-available fallback in the teacher's provider hierarchy
//! (`cortex-embeddings::providers::TfIdfFallback` is the last link in its
//! `DegradationChain`) — here it is the *only* provider shipped, since
//! model-backed extraction/embedding is explicitly out of scope (spec §1).
//! A real model plugs in later behind the same `Embedder` trait without
//! touching any invariant (spec §9 "Polymorphism as capability set").

use crt_core::traits::Embedder;

/// Bag-of-hashed-terms embedding: every whitespace token is hashed into one
/// of `dimensions` buckets and accumulated with a sign derived from a
/// second hash, then L2-normalized. Deterministic for identical input.
pub struct HashingEmbedder {
    dimensions: usize,
    vector_version: String,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vector_version: crt_core::config::defaults::DEFAULT_VECTOR_VERSION.to_string(),
        }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(crt_core::config::defaults::DEFAULT_EMBEDDING_DIMENSIONS)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut acc = vec![0f32; self.dimensions];
        let normalized = text.trim().to_lowercase();
        for token in normalized.split_whitespace() {
            let hash = blake3::hash(token.as_bytes());
            let bytes = hash.as_bytes();
            let bucket = (u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
                % self.dimensions;
            let sign = if bytes[4] & 1 == 0 { 1.0 } else { -1.0 };
            acc[bucket] += sign;
        }
        let norm = acc.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in acc.iter_mut() {
                *v /= norm;
            }
        }
        acc
    }

    fn vector_version(&self) -> &str {
        &self.vector_version
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
