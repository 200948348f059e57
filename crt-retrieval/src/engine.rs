//! The retrieval algorithm itself — spec §4.4 steps 1-7.
//!
//! Grounded on `cortex-retrieval::ranking::scorer::score_with_temporal`'s
//! shape (fetch candidates, compute a per-candidate factor score, sort
//! descending, return) generalized from the teacher's 10-factor weighted
//! sum down to the spec's fixed 3-factor product `sim * rho * w`, and on
//! `cortex-retrieval::search::vector_search`'s "embed query, ask the store
//! for the nearest pool" two-step shape.

use std::sync::Arc;

use tracing::debug;

use crt_core::config::RetrievalConfig;
use crt_core::errors::CrtResult;
use crt_core::ids::ThreadId;
use crt_core::models::{Lane, Memory};
use crt_core::traits::{Embedder, MemoryStore};

use crt_embed::{belief_weight, cosine_similarity, recency, retrieval_score};

/// A memory paired with its composite retrieval score `R`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMemory {
    pub memory: Memory,
    pub score: f64,
}

/// Ranks memories for a query against a `MemoryStore` + `Embedder` pair.
pub struct RetrievalEngine {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn MemoryStore>,
    config: RetrievalConfig,
    recency_lambda: f64,
    belief_alpha: f64,
}

impl RetrievalEngine {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn MemoryStore>,
        config: RetrievalConfig,
        recency_lambda: f64,
        belief_alpha: f64,
    ) -> Self {
        Self { embedder, store, config, recency_lambda, belief_alpha }
    }

    /// spec §4.4 `retrieve(thread, query_text, k, min_trust=0, include_speech=false)`.
    ///
    /// `now_turn` is the logical turn the caller is retrieving at — needed
    /// to compute recency (`Δt = now_turn - memory.created_at`); the spec's
    /// signature sketch omits it as an implementation detail of the
    /// session coordinator, which always knows the current turn.
    pub fn retrieve(
        &self,
        thread_id: &ThreadId,
        query_text: &str,
        k: usize,
        min_trust: f64,
        include_speech: bool,
        now_turn: i64,
    ) -> CrtResult<Vec<ScoredMemory>> {
        let qvec = self.embedder.embed(query_text);
        let fanout = k.saturating_mul(self.config.candidate_fanout_multiplier.max(1));
        let pool = self.store.candidates(thread_id, &qvec, fanout, false)?;

        let mut scored: Vec<ScoredMemory> = pool
            .into_iter()
            .filter(|m| m.lane == Lane::Belief || include_speech)
            .filter(|m| m.trust >= min_trust)
            .map(|m| {
                let vector = self.comparison_vector(&m, query_text);
                let sim = cosine_similarity(&vector, &qvec);
                let rho = recency(now_turn - m.created_at, self.recency_lambda);
                let w = belief_weight(m.trust, m.confidence, self.belief_alpha);
                let score = retrieval_score(sim, rho, w);
                ScoredMemory { memory: m, score }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.memory.created_at.cmp(&a.memory.created_at))
                .then_with(|| a.memory.memory_id.as_str().cmp(b.memory.memory_id.as_str()))
        });
        scored.truncate(k);
        Ok(scored)
    }

    /// Re-embed transiently when a memory's `vector_version` predates the
    /// current embedder, per spec §4.1 ("re-embedding preferred, logged").
    /// The durable row is left untouched — a migration pass (out of this
    /// crate's scope) is responsible for persisting re-embedded vectors.
    fn comparison_vector(&self, memory: &Memory, _query_text: &str) -> Vec<f32> {
        if memory.vector_version == self.embedder.vector_version() {
            memory.vector.clone()
        } else {
            debug!(
                memory_id = memory.memory_id.as_str(),
                stored_version = memory.vector_version.as_str(),
                current_version = self.embedder.vector_version(),
                "re-embedding memory with stale vector_version for scoring"
            );
            self.embedder.embed(&memory.text)
        }
    }
}
