//! `LedgerEntry` ⇄ SQLite row conversion.

use rusqlite::{params, Connection, Row};

use crt_core::errors::CrtError;
use crt_core::ids::{LedgerId, MemoryId, ThreadId};
use crt_core::models::{ContradictionType, LedgerEntry, LedgerStatus, ResolutionMethod};

use crate::to_store_err;

fn contradiction_type_to_str(t: ContradictionType) -> &'static str {
    match t {
        ContradictionType::Refinement => "refinement",
        ContradictionType::Revision => "revision",
        ContradictionType::Temporal => "temporal",
        ContradictionType::Conflict => "conflict",
    }
}

fn str_to_contradiction_type(s: &str) -> ContradictionType {
    match s {
        "revision" => ContradictionType::Revision,
        "temporal" => ContradictionType::Temporal,
        "conflict" => ContradictionType::Conflict,
        _ => ContradictionType::Refinement,
    }
}

pub fn status_to_str(s: LedgerStatus) -> &'static str {
    match s {
        LedgerStatus::Open => "open",
        LedgerStatus::Asked => "asked",
        LedgerStatus::Resolved => "resolved",
        LedgerStatus::Dismissed => "dismissed",
        LedgerStatus::Superseded => "superseded",
    }
}

fn str_to_status(s: &str) -> LedgerStatus {
    match s {
        "asked" => LedgerStatus::Asked,
        "resolved" => LedgerStatus::Resolved,
        "dismissed" => LedgerStatus::Dismissed,
        "superseded" => LedgerStatus::Superseded,
        _ => LedgerStatus::Open,
    }
}

fn resolution_method_to_str(m: ResolutionMethod) -> &'static str {
    match m {
        ResolutionMethod::UserOverride => "user_override",
        ResolutionMethod::UserPreserve => "user_preserve",
        ResolutionMethod::UserMerge => "user_merge",
        ResolutionMethod::UserBothTrue => "user_both_true",
        ResolutionMethod::AutoTemporal => "auto_temporal",
        ResolutionMethod::AutoRefinement => "auto_refinement",
    }
}

fn str_to_resolution_method(s: &str) -> Option<ResolutionMethod> {
    Some(match s {
        "user_override" => ResolutionMethod::UserOverride,
        "user_preserve" => ResolutionMethod::UserPreserve,
        "user_merge" => ResolutionMethod::UserMerge,
        "user_both_true" => ResolutionMethod::UserBothTrue,
        "auto_temporal" => ResolutionMethod::AutoTemporal,
        "auto_refinement" => ResolutionMethod::AutoRefinement,
        _ => return None,
    })
}

pub fn row_to_ledger_entry(row: &Row) -> rusqlite::Result<LedgerEntry> {
    let anchor_json: String = row.get("anchor")?;
    let anchor = serde_json::from_str(&anchor_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let contradiction_type_str: String = row.get("contradiction_type")?;
    let status_str: String = row.get("status")?;
    let resolution_method_str: Option<String> = row.get("resolution_method")?;
    let superseded_by: Option<String> = row.get("superseded_by")?;

    Ok(LedgerEntry {
        ledger_id: LedgerId::from(row.get::<_, String>("ledger_id")?),
        revision_no: row.get::<_, i64>("revision_no")? as u32,
        thread_id: ThreadId::from(row.get::<_, String>("thread_id")?),
        created_at: row.get("created_at")?,
        old_memory_id: MemoryId::from(row.get::<_, String>("old_memory_id")?),
        new_memory_id: MemoryId::from(row.get::<_, String>("new_memory_id")?),
        contradiction_type: str_to_contradiction_type(&contradiction_type_str),
        drift: row.get("drift")?,
        slot: row.get("slot")?,
        status: str_to_status(&status_str),
        resolution_method: resolution_method_str.as_deref().and_then(str_to_resolution_method),
        resolved_at: row.get("resolved_at")?,
        superseded_by: superseded_by.map(LedgerId::from),
        anchor,
    })
}

/// Insert one `ledger_revisions` row and upsert the `ledger_entries`
/// "current pointer" row to match.
pub fn insert_ledger_revision(conn: &Connection, entry: &LedgerEntry) -> Result<(), CrtError> {
    let anchor_json = serde_json::to_string(&entry.anchor).map_err(to_store_err)?;
    conn.execute(
        "INSERT INTO ledger_revisions (
            ledger_id, revision_no, thread_id, created_at, old_memory_id,
            new_memory_id, contradiction_type, drift, slot, status,
            resolution_method, resolved_at, superseded_by, anchor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            entry.ledger_id.as_str(),
            entry.revision_no,
            entry.thread_id.as_str(),
            entry.created_at,
            entry.old_memory_id.as_str(),
            entry.new_memory_id.as_str(),
            contradiction_type_to_str(entry.contradiction_type),
            entry.drift,
            entry.slot,
            status_to_str(entry.status),
            entry.resolution_method.map(resolution_method_to_str),
            entry.resolved_at,
            entry.superseded_by.as_ref().map(|l| l.as_str().to_string()),
            anchor_json,
        ],
    )
    .map_err(to_store_err)?;

    conn.execute(
        "INSERT INTO ledger_entries (ledger_id, thread_id, status, priority, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(ledger_id) DO UPDATE SET status = excluded.status, priority = excluded.priority",
        params![
            entry.ledger_id.as_str(),
            entry.thread_id.as_str(),
            status_to_str(entry.status),
            entry.contradiction_type.priority(),
            entry.created_at,
        ],
    )
    .map_err(to_store_err)?;
    Ok(())
}
