//! The `Memory` record — see spec §3 "Memory".

use serde::{Deserialize, Serialize};

use crate::ids::{MemoryId, ThreadId};

/// Where a memory's text originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    User,
    Assistant,
    Tool,
    System,
    Reflection,
}

/// `belief` memories ground future answers. `speech` memories are quarantined
/// recordings of the assistant's own output and never ground an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Belief,
    Speech,
}

/// Structured origin of a memory's content, per slot/value kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// A user utterance at a given logical turn.
    UserTurn { turn: i64 },
    /// The assistant's own output at a given logical turn.
    AssistantTurn { turn: i64 },
    /// A tool/document excerpt: doc id, char range, and a content hash for
    /// tamper evidence.
    Tool {
        doc_id: String,
        char_start: usize,
        char_end: usize,
        content_hash: String,
    },
    /// System-injected fact (e.g. the assistant identity record).
    System,
    /// Produced by a reflection/consolidation pass over existing memories.
    Reflection { derived_from: Vec<MemoryId> },
}

/// A single versioned memory. Immutable except for `trust`, `updated_at`,
/// `deprecated`, and `deprecation_reason` (spec §3 invariant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub memory_id: MemoryId,
    pub thread_id: ThreadId,
    pub text: String,
    pub slot: Option<String>,
    pub value: Option<String>,
    pub vector: Vec<f32>,
    pub vector_version: String,
    pub source: Source,
    pub lane: Lane,
    pub confidence: f64,
    pub trust: f64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deprecated: bool,
    pub deprecation_reason: Option<String>,
    pub provenance: Provenance,
}

impl Memory {
    /// True when this memory is eligible as grounding for a belief-mode answer.
    pub fn is_groundable(&self) -> bool {
        matches!(self.lane, Lane::Belief) && !self.deprecated
    }
}

/// Fields needed to construct a new memory; `put` assigns the id.
#[derive(Debug, Clone)]
pub struct NewMemory {
    pub thread_id: ThreadId,
    pub text: String,
    pub slot: Option<String>,
    pub value: Option<String>,
    pub vector: Vec<f32>,
    pub vector_version: String,
    pub source: Source,
    pub lane: Lane,
    pub confidence: f64,
    pub trust: f64,
    pub created_at: i64,
    pub provenance: Provenance,
}

impl NewMemory {
    pub fn into_memory(self, memory_id: MemoryId) -> Memory {
        Memory {
            memory_id,
            thread_id: self.thread_id,
            text: self.text,
            slot: self.slot,
            value: self.value,
            vector: self.vector,
            vector_version: self.vector_version,
            source: self.source,
            lane: self.lane,
            confidence: self.confidence,
            trust: self.trust,
            created_at: self.created_at,
            updated_at: self.created_at,
            deprecated: false,
            deprecation_reason: None,
            provenance: self.provenance,
        }
    }
}
