use std::sync::Arc;

use crt_core::ids::ThreadId;
use crt_core::models::{Lane, NewMemory, Provenance, Source};
use crt_core::traits::{Embedder, MemoryStore};
use crt_embed::HashingEmbedder;
use crt_retrieval::RetrievalEngine;
use crt_storage::StorageEngine;

fn new_memory(thread: &ThreadId, text: &str, lane: Lane, trust: f64, turn: i64, embedder: &dyn Embedder) -> NewMemory {
    NewMemory {
        thread_id: thread.clone(),
        text: text.to_string(),
        slot: None,
        value: None,
        vector: embedder.embed(text),
        vector_version: embedder.vector_version().to_string(),
        source: Source::User,
        lane,
        confidence: 0.9,
        trust,
        created_at: turn,
        provenance: Provenance::UserTurn { turn },
    }
}

fn engine() -> (Arc<StorageEngine>, Arc<HashingEmbedder>) {
    (Arc::new(StorageEngine::open_in_memory().unwrap()), Arc::new(HashingEmbedder::default()))
}

#[test]
fn retrieve_is_deterministic_given_identical_state() {
    let (store, embedder) = engine();
    let thread = ThreadId::new();
    store.put(new_memory(&thread, "I work at Amazon", Lane::Belief, 0.8, 1, embedder.as_ref())).unwrap();
    store.put(new_memory(&thread, "I live in Seattle", Lane::Belief, 0.8, 2, embedder.as_ref())).unwrap();

    let retrieval = RetrievalEngine::new(
        embedder.clone(),
        store.clone(),
        crt_core::config::RetrievalConfig::default(),
        crt_core::config::defaults::DEFAULT_RECENCY_LAMBDA,
        crt_core::config::defaults::DEFAULT_BELIEF_ALPHA,
    );

    let first = retrieval.retrieve(&thread, "where do I work", 5, 0.0, false, 3).unwrap();
    let second = retrieval.retrieve(&thread, "where do I work", 5, 0.0, false, 3).unwrap();
    assert_eq!(
        first.iter().map(|s| s.memory.memory_id.clone()).collect::<Vec<_>>(),
        second.iter().map(|s| s.memory.memory_id.clone()).collect::<Vec<_>>()
    );
}

#[test]
fn speech_lane_excluded_unless_requested() {
    let (store, embedder) = engine();
    let thread = ThreadId::new();
    store.put(new_memory(&thread, "I don't have that stored", Lane::Speech, 0.9, 1, embedder.as_ref())).unwrap();

    let retrieval = RetrievalEngine::new(
        embedder.clone(),
        store.clone(),
        crt_core::config::RetrievalConfig::default(),
        crt_core::config::defaults::DEFAULT_RECENCY_LAMBDA,
        crt_core::config::defaults::DEFAULT_BELIEF_ALPHA,
    );

    let without = retrieval.retrieve(&thread, "anything", 5, 0.0, false, 2).unwrap();
    assert!(without.is_empty());

    let with = retrieval.retrieve(&thread, "anything", 5, 0.0, true, 2).unwrap();
    assert_eq!(with.len(), 1);
}

#[test]
fn deprecated_memories_are_never_returned() {
    let (store, embedder) = engine();
    let thread = ThreadId::new();
    let mem = store
        .put(new_memory(&thread, "I work at Amazon", Lane::Belief, 0.8, 1, embedder.as_ref()))
        .unwrap();
    store.deprecate(&mem.memory_id, "ledger-1", 2).unwrap();

    let retrieval = RetrievalEngine::new(
        embedder.clone(),
        store.clone(),
        crt_core::config::RetrievalConfig::default(),
        crt_core::config::defaults::DEFAULT_RECENCY_LAMBDA,
        crt_core::config::defaults::DEFAULT_BELIEF_ALPHA,
    );
    let results = retrieval.retrieve(&thread, "where do I work", 5, 0.0, false, 3).unwrap();
    assert!(results.is_empty());
}

#[test]
fn min_trust_filters_low_trust_memories() {
    let (store, embedder) = engine();
    let thread = ThreadId::new();
    store.put(new_memory(&thread, "I work at Amazon", Lane::Belief, 0.05, 1, embedder.as_ref())).unwrap();

    let retrieval = RetrievalEngine::new(
        embedder.clone(),
        store.clone(),
        crt_core::config::RetrievalConfig::default(),
        crt_core::config::defaults::DEFAULT_RECENCY_LAMBDA,
        crt_core::config::defaults::DEFAULT_BELIEF_ALPHA,
    );
    let results = retrieval.retrieve(&thread, "where do I work", 5, 0.5, false, 3).unwrap();
    assert!(results.is_empty());
}

#[test]
fn newer_memory_breaks_similarity_ties_first() {
    let (store, embedder) = engine();
    let thread = ThreadId::new();
    // Identical text -> identical similarity and weight; recency alone
    // should favor the newer memory when scores would otherwise tie apart
    // from Δt.
    let older = store
        .put(new_memory(&thread, "I'm a Senior Engineer", Lane::Belief, 0.8, 1, embedder.as_ref()))
        .unwrap();
    let newer = store
        .put(new_memory(&thread, "I'm a Senior Engineer", Lane::Belief, 0.8, 5, embedder.as_ref()))
        .unwrap();

    let retrieval = RetrievalEngine::new(
        embedder.clone(),
        store.clone(),
        crt_core::config::RetrievalConfig::default(),
        crt_core::config::defaults::DEFAULT_RECENCY_LAMBDA,
        crt_core::config::defaults::DEFAULT_BELIEF_ALPHA,
    );
    let results = retrieval.retrieve(&thread, "what's my title", 2, 0.0, false, 6).unwrap();
    assert_eq!(results[0].memory.memory_id, newer.memory_id);
    assert_eq!(results[1].memory.memory_id, older.memory_id);
}
