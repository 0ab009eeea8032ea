// src/db/leads.rs
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{IntakeStage, Lead, MonthlyVolume, NewLead, PipelineStage};
use crate::errors::ServerError;

const LEAD_COLUMNS: &str = "id, name, business, location, monthly_volume, intake_stage, stage, \
     whatsapp, email, comments, note, value, archived, created_at, updated_at";

/// Requested change to a lead's pipeline position.
#[derive(Debug, Clone, PartialEq)]
pub struct StageUpdate {
    pub stage: PipelineStage,
    pub note: Option<String>,
    pub value: Option<f64>,
}

fn lead_from_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let stage_raw: String = row.get(6)?;
    let stage = stage_raw.parse::<PipelineStage>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, Type::Text, e.into())
    })?;
    let volume_raw: Option<String> = row.get(4)?;
    let intake_raw: String = row.get(5)?;

    Ok(Lead {
        id: row.get(0)?,
        name: row.get(1)?,
        business: row.get(2)?,
        location: row.get(3)?,
        monthly_volume: volume_raw.as_deref().and_then(MonthlyVolume::parse),
        intake_stage: IntakeStage::parse(&intake_raw),
        stage,
        whatsapp: row.get(7)?,
        email: row.get(8)?,
        comments: row.get(9)?,
        note: row.get(10)?,
        value: row.get(11)?,
        archived: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

fn query_leads(conn: &Connection, sql: &str) -> Result<Vec<Lead>, ServerError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| ServerError::DbError(format!("prepare lead query failed: {e}")))?;

    let rows = stmt
        .query_map([], lead_from_row)
        .map_err(|e| ServerError::DbError(format!("lead query failed: {e}")))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(format!("read lead row failed: {e}")))?);
    }
    Ok(out)
}

/// Store a new lead. Every lead enters the pipeline as `entrante`.
pub fn insert_lead(
    conn: &Connection,
    id: &str,
    new: &NewLead,
    now: DateTime<Utc>,
) -> Result<Lead, ServerError> {
    conn.execute(
        r#"
        insert into leads (
            id, name, business, location, monthly_volume, intake_stage, stage,
            whatsapp, email, comments, archived, created_at, updated_at
        ) values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11, ?11)
        "#,
        params![
            id,
            new.name,
            new.business,
            new.location,
            new.monthly_volume.map(MonthlyVolume::as_str),
            new.intake_stage.as_str(),
            PipelineStage::Incoming.id(),
            new.whatsapp,
            new.email,
            new.comments,
            now,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert lead failed: {e}")))?;

    get_lead(conn, id)?.ok_or(ServerError::InternalError)
}

/// Leads shown on the board: archived ones excluded, most recently
/// updated first.
pub fn list_pipeline_leads(conn: &Connection) -> Result<Vec<Lead>, ServerError> {
    query_leads(
        conn,
        &format!(
            "select {LEAD_COLUMNS} from leads where archived = 0 order by updated_at desc, id"
        ),
    )
}

/// Every submission, newest first.
pub fn list_all_leads(conn: &Connection) -> Result<Vec<Lead>, ServerError> {
    query_leads(
        conn,
        &format!("select {LEAD_COLUMNS} from leads order by created_at desc, id"),
    )
}

pub fn get_lead(conn: &Connection, id: &str) -> Result<Option<Lead>, ServerError> {
    conn.query_row(
        &format!("select {LEAD_COLUMNS} from leads where id = ?"),
        params![id],
        lead_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select lead failed: {e}")))
}

/// Move a lead to another stage, optionally setting note and value.
/// Returns `Ok(None)` when no lead has this id.
///
/// Repeating the same update leaves the same stage, note and value.
pub fn update_stage(
    conn: &Connection,
    id: &str,
    update: &StageUpdate,
    now: DateTime<Utc>,
) -> Result<Option<Lead>, ServerError> {
    let note = update
        .note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let changed = conn
        .execute(
            r#"
            update leads
               set stage = ?2,
                   note = coalesce(?3, note),
                   value = coalesce(?4, value),
                   updated_at = ?5
             where id = ?1
            "#,
            params![id, update.stage.id(), note, update.value, now],
        )
        .map_err(|e| ServerError::DbError(format!("update lead stage failed: {e}")))?;

    if changed == 0 {
        return Ok(None);
    }
    get_lead(conn, id)
}

/// Flag a lead as out of pipeline scope (or bring it back).
/// Returns false when no lead has this id.
pub fn set_archived(
    conn: &Connection,
    id: &str,
    archived: bool,
    now: DateTime<Utc>,
) -> Result<bool, ServerError> {
    let changed = conn
        .execute(
            "update leads set archived = ?2, updated_at = ?3 where id = ?1",
            params![id, archived, now],
        )
        .map_err(|e| ServerError::DbError(format!("archive lead failed: {e}")))?;
    Ok(changed > 0)
}

/// Returns false when no lead has this id.
pub fn delete_lead(conn: &Connection, id: &str) -> Result<bool, ServerError> {
    let deleted = conn
        .execute("delete from leads where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete lead failed: {e}")))?;
    Ok(deleted > 0)
}
