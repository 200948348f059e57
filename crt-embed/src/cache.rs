//! In-process embedding cache, keyed by content hash.
//!
//! Grounded on `cortex-embeddings::cache::l1_memory` (the in-memory tier of
//! the teacher's 3-tier cache coordinator): a moka-backed LRU in front of
//! the embedder. CRT has no L2/L3 equivalent — durable vectors already live
//! in `crt-storage`'s `memories` table, so this crate only needs the fast
//! in-process tier that saves a re-embed when the same content is seen
//! twice within a session (e.g. re-scoring a candidate across retrieval
//! passes).

use moka::sync::Cache;

/// LRU cache from content hash (blake3 hex, see `crt_core::ids`) to its
/// embedding vector.
pub struct EmbeddingCache {
    inner: Cache<String, Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub fn get(&self, content_hash: &str) -> Option<Vec<f32>> {
        self.inner.get(content_hash)
    }

    pub fn insert(&self, content_hash: String, embedding: Vec<f32>) {
        self.inner.insert(content_hash, embedding);
    }

    pub fn len(&self) -> u64 {
        self.inner.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new(crt_core::config::defaults::DEFAULT_EMBEDDING_CACHE_CAPACITY)
    }
}
