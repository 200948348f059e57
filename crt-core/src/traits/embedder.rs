/// A fixed-dimension text embedder (spec §6 "Interfaces the core consumes").
///
/// `embed` must be deterministic on identical input within a process
/// version; `vector_version` is bumped whenever the embedding scheme
/// changes so retrieval can detect and re-embed stale vectors (spec §4.1).
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;
    fn vector_version(&self) -> &str;
    fn dimensions(&self) -> usize;
}
