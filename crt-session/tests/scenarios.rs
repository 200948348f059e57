//! End-to-end turn-lifecycle scenarios exercising the full C1-C9 pipeline
//! through `Coordinator`. Each test stands up an in-memory store and a
//! deterministic embedder/extractor pair and drives `send_turn` the way a
//! real caller would, asserting on `TurnResult`/`list_memories` rather than
//! on any single subsystem in isolation.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crt_core::config::CrtConfig;
use crt_core::ids::ThreadId;
use crt_core::models::{ContradictionType, Lane, ResolutionRequest};
use crt_core::traits::LlmClient;
use crt_embed::hashing::HashingEmbedder;
use crt_extract::RuleBasedExtractor;
use crt_session::{Coordinator, MemoryFilter, TurnClock};
use crt_storage::StorageEngine;

const DEADLINE: Duration = Duration::from_secs(1);

/// Replies a fixed queue of canned completions, one per `generate` call.
/// Falls back to `None` (simulating a timeout) once exhausted.
struct StubLlm {
    replies: Mutex<VecDeque<String>>,
}

impl StubLlm {
    fn new(replies: &[&str]) -> Self {
        Self { replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()) }
    }
}

impl LlmClient for StubLlm {
    fn generate(&self, _prompt: &str, _deadline: Duration) -> Option<String> {
        self.replies.lock().unwrap().pop_front()
    }
}

fn coordinator(replies: &[&str]) -> Coordinator {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let embedder: Arc<dyn crt_core::traits::Embedder> = Arc::new(HashingEmbedder::default());
    let extractor: Arc<dyn crt_core::traits::ClaimExtractor> = Arc::new(RuleBasedExtractor::new());
    let llm: Arc<dyn LlmClient> = Arc::new(StubLlm::new(replies));
    let clock: Arc<dyn crt_core::traits::Clock> = Arc::new(TurnClock::new());
    Coordinator::new(storage, embedder, extractor, llm, clock, CrtConfig::default())
}

// ── Scenario 1: basic revision ───────────────────────────────────────────

#[test]
fn basic_revision_asks_then_grounds_on_the_winner() {
    let coordinator = coordinator(&[
        "You work at Amazon.",
        "You work at Google.",
        "You work at Google.",
    ]);
    let thread = ThreadId::new();

    let turn1 = coordinator.send_turn(&thread, "I work at Amazon.", DEADLINE).unwrap();
    assert!(turn1.contradictions_created.is_empty());
    assert_eq!(turn1.final_response, "You work at Amazon.");

    let turn2 = coordinator.send_turn(&thread, "Actually I work at Google.", DEADLINE).unwrap();
    assert_eq!(turn2.contradictions_created.len(), 1);
    let ledger_id = turn2.contradictions_created[0].clone();
    // Gate 4 replaces the candidate with the anchored clarification prompt
    // and the entry transitions open -> asked in the same turn.
    assert_eq!(turn2.open_ledger_surfaced, Some(ledger_id.clone()));
    assert_ne!(turn2.final_response, "You work at Google.");

    let pending = coordinator.next_contradiction(&thread).unwrap().expect("one open contradiction");
    assert_eq!(pending.ledger_entry.ledger_id, ledger_id);
    assert_eq!(pending.ledger_entry.contradiction_type, ContradictionType::Revision);

    let resolution = coordinator
        .resolve_contradiction(&thread, &ledger_id, ResolutionRequest::UserOverride, None)
        .unwrap();
    assert_eq!(resolution.deprecated_memory_ids.len(), 1);
    assert!(coordinator.next_contradiction(&thread).unwrap().is_none());

    let turn3 = coordinator.send_turn(&thread, "Where do I work?", DEADLINE).unwrap();
    assert!(turn3.open_ledger_surfaced.is_none());
    assert_eq!(turn3.final_response, "You work at Google.");

    let memories = coordinator.list_memories(&thread, &MemoryFilter { slot: Some("employer".to_string()), ..Default::default() }).unwrap();
    assert_eq!(memories.len(), 1, "amazon should be deprecated and filtered out by default");
    assert_eq!(memories[0].value.as_deref(), Some("google"));
}

#[test]
fn user_merge_deprecates_both_sides_and_leaves_the_merged_answer_as_sole_survivor() {
    let coordinator = coordinator(&["You work at Amazon.", "You work at Google."]);
    let thread = ThreadId::new();

    coordinator.send_turn(&thread, "I work at Amazon.", DEADLINE).unwrap();
    let turn2 = coordinator.send_turn(&thread, "Actually I work at Google.", DEADLINE).unwrap();
    assert_eq!(turn2.contradictions_created.len(), 1);
    let ledger_id = turn2.contradictions_created[0].clone();

    let pending = coordinator.next_contradiction(&thread).unwrap().expect("revision stays open");
    assert_eq!(pending.ledger_entry.contradiction_type, ContradictionType::Revision);

    let resolution = coordinator
        .resolve_contradiction(&thread, &ledger_id, ResolutionRequest::UserMerge, Some("a startup"))
        .unwrap();
    assert!(resolution.new_memory_id.is_some(), "a merge answer persists a fresh memory");
    assert_eq!(resolution.deprecated_memory_ids.len(), 2, "user_merge deprecates both old and new sides");

    let visible = coordinator.list_memories(&thread, &MemoryFilter { slot: Some("employer".to_string()), ..Default::default() }).unwrap();
    assert_eq!(visible.len(), 1, "the merged answer is the sole non-deprecated memory for the slot");
    assert_eq!(visible[0].value.as_deref(), Some("startup"), "employer normalization strips the leading article");

    let all = coordinator
        .list_memories(&thread, &MemoryFilter { slot: Some("employer".to_string()), include_deprecated: true, ..Default::default() })
        .unwrap();
    assert!(all.iter().any(|m| m.value.as_deref() == Some("amazon") && m.deprecated));
    assert!(all.iter().any(|m| m.value.as_deref() == Some("google") && m.deprecated));
}

// ── Scenario 2: refinement coexists ──────────────────────────────────────

#[test]
fn refinement_keeps_both_memories_and_never_surfaces() {
    let coordinator = coordinator(&["Got it, Seattle.", "Got it, noted."]);
    let thread = ThreadId::new();

    coordinator.send_turn(&thread, "I live in Seattle.", DEADLINE).unwrap();
    let turn2 = coordinator
        .send_turn(&thread, "Specifically, I live in Seattle downtown.", DEADLINE)
        .unwrap();

    assert_eq!(turn2.contradictions_created.len(), 1);
    assert!(turn2.open_ledger_surfaced.is_none(), "refinement auto-resolves within the same turn");
    assert!(coordinator.next_contradiction(&thread).unwrap().is_none());

    let memories = coordinator.list_memories(&thread, &MemoryFilter { slot: Some("location".to_string()), ..Default::default() }).unwrap();
    assert_eq!(memories.len(), 2);
    assert!(memories.iter().all(|m| !m.deprecated));
}

// ── Scenario 3: temporal coexistence ──────────────────────────────────────

#[test]
fn temporal_progression_keeps_both_memories_non_deprecated() {
    let coordinator = coordinator(&["Congrats on the new title.", "Noted."]);
    let thread = ThreadId::new();

    coordinator.send_turn(&thread, "I'm a senior engineer at Acme.", DEADLINE).unwrap();
    let turn2 = coordinator
        .send_turn(&thread, "I'm a principal engineer at Acme now.", DEADLINE)
        .unwrap();

    assert_eq!(turn2.contradictions_created.len(), 1);
    assert!(turn2.open_ledger_surfaced.is_none());

    let memories = coordinator.list_memories(&thread, &MemoryFilter { slot: Some("title".to_string()), ..Default::default() }).unwrap();
    assert_eq!(memories.len(), 2, "both the old and new title persist");
    assert!(memories.iter().all(|m| !m.deprecated));
}

// ── Scenario 4: ungrounded claim ──────────────────────────────────────────

#[test]
fn ungrounded_claim_is_hedged_and_mutates_nothing() {
    let coordinator = coordinator(&["You work at Google."]);
    let thread = ThreadId::new();

    let turn = coordinator.send_turn(&thread, "How's it going?", DEADLINE).unwrap();

    assert_eq!(turn.final_response, "I don't have your employer stored — can you tell me?");
    assert!(turn.contradictions_created.is_empty());

    let beliefs = coordinator.list_memories(&thread, &MemoryFilter { lane: Some(Lane::Belief), ..Default::default() }).unwrap();
    assert!(beliefs.is_empty(), "a hallucinated assistant claim never creates a belief memory");
}

// ── Scenario 5: gaslighting / retraction ─────────────────────────────────

#[test]
fn retraction_is_disputed_then_resolved_with_a_fresh_answer() {
    let coordinator = coordinator(&[
        "You work at Google.",
        "You work at Google.",
    ]);
    let thread = ThreadId::new();

    coordinator.send_turn(&thread, "I work at Google.", DEADLINE).unwrap();
    let turn2 = coordinator
        .send_turn(&thread, "I never said google was where I work.", DEADLINE)
        .unwrap();

    assert_eq!(turn2.contradictions_created.len(), 1);
    let ledger_id = turn2.contradictions_created[0].clone();
    assert_eq!(turn2.open_ledger_surfaced, Some(ledger_id.clone()));

    let pending = coordinator.next_contradiction(&thread).unwrap().expect("retraction stays open");
    assert_eq!(pending.ledger_entry.contradiction_type, ContradictionType::Conflict);

    let resolution = coordinator
        .resolve_contradiction(&thread, &ledger_id, ResolutionRequest::UserOverride, Some("unemployed"))
        .unwrap();
    assert!(resolution.new_memory_id.is_some(), "a free-text answer persists a fresh memory");
    assert_eq!(resolution.deprecated_memory_ids.len(), 1);

    let visible = coordinator.list_memories(&thread, &MemoryFilter { slot: Some("employer".to_string()), ..Default::default() }).unwrap();
    assert!(visible.iter().any(|m| m.value.as_deref() == Some("unemployed")));

    let all = coordinator
        .list_memories(&thread, &MemoryFilter { slot: Some("employer".to_string()), include_deprecated: true, ..Default::default() })
        .unwrap();
    assert!(all.iter().any(|m| m.value.as_deref() == Some("google") && m.deprecated), "the old claim stays visible once deprecated is included");
}

// ── Confirmation boosts trust without opening a contradiction ────────────

#[test]
fn restating_the_same_value_confirms_rather_than_contradicts() {
    let coordinator = coordinator(&["Got it.", "Noted."]);
    let thread = ThreadId::new();

    coordinator.send_turn(&thread, "I work at Amazon.", DEADLINE).unwrap();
    let before = coordinator
        .list_memories(&thread, &MemoryFilter { slot: Some("employer".to_string()), ..Default::default() })
        .unwrap();
    let trust_before = before[0].trust;

    let turn2 = coordinator.send_turn(&thread, "I work at Amazon.", DEADLINE).unwrap();
    assert!(turn2.contradictions_created.is_empty(), "restating the same value is a confirmation, not a contradiction");

    let after = coordinator
        .list_memories(&thread, &MemoryFilter { slot: Some("employer".to_string()), ..Default::default() })
        .unwrap();
    assert_eq!(after.len(), 1, "no new memory is created for a confirming restatement");
    assert!(after[0].trust >= trust_before, "confirmation never lowers trust");
    assert!(after[0].trust <= 1.0);
}

// ── Scenario 6: speech-lane isolation ─────────────────────────────────────

#[test]
fn speech_lane_never_grounds_a_later_claim() {
    let coordinator = coordinator(&["You enjoy chess.", "You enjoy chess."]);
    let thread = ThreadId::new();

    let turn1 = coordinator.send_turn(&thread, "I enjoy chess.", DEADLINE).unwrap();
    assert_eq!(turn1.final_response, "You enjoy chess.", "grounded by the just-stored hobby memory");

    let speech = coordinator.list_memories(&thread, &MemoryFilter { lane: Some(Lane::Speech), ..Default::default() }).unwrap();
    assert_eq!(speech.len(), 1);
    assert_eq!(speech[0].text, "You enjoy chess.");
    assert!(!speech[0].is_groundable());

    let belief = coordinator.list_memories(&thread, &MemoryFilter { lane: Some(Lane::Belief), slot: None, ..Default::default() }).unwrap();
    let hobby_id = belief.iter().find(|m| m.slot.as_deref() == Some("hobby")).unwrap().memory_id.clone();

    let turn2 = coordinator.send_turn(&thread, "Tell me about my hobbies.", DEADLINE).unwrap();
    assert_eq!(turn2.final_response, "You enjoy chess.");
    assert!(
        turn2.retrieved_memory_ids.contains(&hobby_id),
        "the real belief memory grounds the claim"
    );
    assert!(
        !turn2.retrieved_memory_ids.iter().any(|id| speech.iter().any(|s| &s.memory_id == id)),
        "the speech-lane copy of the same text is never part of the retrieved grounding set"
    );
}
