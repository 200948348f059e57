//! `Memory` ⇄ SQLite row conversion.

use rusqlite::{params, Connection, Row};

use crt_core::errors::CrtError;
use crt_core::ids::{MemoryId, ThreadId};
use crt_core::models::{Memory, Provenance, Source, Lane};

use crate::to_store_err;

pub fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for v in vector {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

pub fn blob_to_vector(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn source_to_str(s: Source) -> &'static str {
    match s {
        Source::User => "user",
        Source::Assistant => "assistant",
        Source::Tool => "tool",
        Source::System => "system",
        Source::Reflection => "reflection",
    }
}

fn str_to_source(s: &str) -> Source {
    match s {
        "assistant" => Source::Assistant,
        "tool" => Source::Tool,
        "system" => Source::System,
        "reflection" => Source::Reflection,
        _ => Source::User,
    }
}

fn lane_to_str(l: Lane) -> &'static str {
    match l {
        Lane::Belief => "belief",
        Lane::Speech => "speech",
    }
}

fn str_to_lane(s: &str) -> Lane {
    match s {
        "speech" => Lane::Speech,
        _ => Lane::Belief,
    }
}

pub fn row_to_memory(row: &Row) -> rusqlite::Result<Memory> {
    let vector_blob: Vec<u8> = row.get("vector")?;
    let provenance_json: String = row.get("provenance")?;
    let provenance: Provenance = serde_json::from_str(&provenance_json)
        .unwrap_or(Provenance::System);
    let source_str: String = row.get("source")?;
    let lane_str: String = row.get("lane")?;

    Ok(Memory {
        memory_id: MemoryId::from(row.get::<_, String>("memory_id")?),
        thread_id: ThreadId::from(row.get::<_, String>("thread_id")?),
        text: row.get("text")?,
        slot: row.get("slot")?,
        value: row.get("value")?,
        vector: blob_to_vector(&vector_blob),
        vector_version: row.get("vector_version")?,
        source: str_to_source(&source_str),
        lane: str_to_lane(&lane_str),
        confidence: row.get("confidence")?,
        trust: row.get("trust")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        deprecated: row.get::<_, i64>("deprecated")? != 0,
        deprecation_reason: row.get("deprecation_reason")?,
        provenance,
    })
}

pub fn insert_memory(conn: &Connection, memory: &Memory) -> Result<(), CrtError> {
    let provenance_json = serde_json::to_string(&memory.provenance).map_err(|e| to_store_err(e))?;
    conn.execute(
        "INSERT INTO memories (
            memory_id, thread_id, text, slot, value, vector, vector_version,
            source, lane, confidence, trust, created_at, updated_at,
            deprecated, deprecation_reason, provenance
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            memory.memory_id.as_str(),
            memory.thread_id.as_str(),
            memory.text,
            memory.slot,
            memory.value,
            vector_to_blob(&memory.vector),
            memory.vector_version,
            source_to_str(memory.source),
            lane_to_str(memory.lane),
            memory.confidence,
            memory.trust,
            memory.created_at,
            memory.updated_at,
            memory.deprecated as i64,
            memory.deprecation_reason,
            provenance_json,
        ],
    )
    .map_err(to_store_err)?;
    Ok(())
}
