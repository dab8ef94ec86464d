// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use evently_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    audit_event_id: i64,
    subject_event_id: Option<i64>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
}

fn reconstruct_audit_event(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
    let action_data: ActionData = serde_json::from_str(&row.action_json)?;
    let before_data: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after_data: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    let actor: Actor = match actor_data.user_id {
        Some(user_id) => Actor::with_user(actor_data.id, actor_data.actor_type, user_id),
        None => Actor::new(actor_data.id, actor_data.actor_type),
    };

    Ok(AuditEvent::new(
        actor,
        Cause::new(cause_data.id, cause_data.description),
        Action::new(action_data.name, action_data.details),
        StateSnapshot::new(before_data.data),
        StateSnapshot::new(after_data.data),
        row.subject_event_id,
    )
    .with_event_id(row.audit_event_id))
}

/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no audit event has this id, or an
/// error if the stored payload cannot be deserialized.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    audit_event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let row: AuditEventRow = audit_events::table
        .filter(audit_events::audit_event_id.eq(audit_event_id))
        .select(AuditEventRow::as_select())
        .first(conn)?;
    reconstruct_audit_event(row)
}

/// Lists the audit trail of one event, oldest first.
///
/// Entries survive the event's deletion.
///
/// # Errors
///
/// Returns an error if the query fails or a payload cannot be deserialized.
pub fn list_audit_events_for_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::subject_event_id.eq(event_id))
        .order(audit_events::audit_event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;
    rows.into_iter().map(reconstruct_audit_event).collect()
}
