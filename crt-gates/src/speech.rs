//! Gate 5: speech-lane write-back — spec §4.8. Not a pass/rewrite/replace
//! validator; it always runs after the pipeline and persists whatever the
//! final response is as a `speech`-lane memory, which is never eligible as
//! grounding for a future belief-mode answer (spec §3 `is_groundable`).

use crt_core::ids::ThreadId;
use crt_core::models::{Lane, NewMemory, Provenance, Source};
use crt_core::traits::Embedder;

/// Build the speech-lane memory for a committed turn's final response.
/// `trust`/`confidence` are fixed at 1.0 — the assistant's own output is
/// recorded verbatim, never scored for truthfulness (it isn't belief-lane).
pub fn speech_writeback(thread_id: &ThreadId, final_response: &str, turn: i64, embedder: &dyn Embedder) -> NewMemory {
    NewMemory {
        thread_id: thread_id.clone(),
        text: final_response.to_string(),
        slot: None,
        value: None,
        vector: embedder.embed(final_response),
        vector_version: embedder.vector_version().to_string(),
        source: Source::Assistant,
        lane: Lane::Speech,
        confidence: 1.0,
        trust: 1.0,
        created_at: turn,
        provenance: Provenance::AssistantTurn { turn },
    }
}
