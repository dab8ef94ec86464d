// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Orchestration: applying a `TransitionResult` to the store.
//!
//! Each transition is written in one `IMMEDIATE` transaction so the event
//! row, its registrations, the user index, and the audit record change
//! together or not at all.

use diesel::SqliteConnection;
use evently::{TransitionOutcome, TransitionResult};
use tracing::{debug, info};

use crate::data_models::PersistTransitionResult;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::events::{delete_event, insert_event, update_event};
use crate::mutations::index::{add_index_entry, purge_event_from_index, remove_index_entry};
use crate::mutations::registrations::{
    check_capacity_holds, delete_registration, insert_registration,
};

/// Persists a transition result.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `result` - The transition result to persist
///
/// # Returns
///
/// The audit event id and the id of the event concerned.
///
/// # Errors
///
/// Returns an error if persistence fails or a write-time recheck rejects
/// the transition. On error nothing is written.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let event_id: i64 = apply_outcome(conn, result)?;
        let audit_event_id: i64 = persist_audit_event(conn, &result.audit_event, Some(event_id))?;

        info!(
            audit_event_id,
            event_id,
            action = %result.audit_event.action.name,
            "Persisted transition"
        );

        Ok(PersistTransitionResult {
            audit_event_id,
            event_id,
        })
    })
}

/// Performs the writes named by the outcome, returning the event id.
fn apply_outcome(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<i64, PersistenceError> {
    let event = &result.new_event;
    let persisted_id = || {
        event.event_id().ok_or_else(|| {
            PersistenceError::Other(String::from("transition on an unpersisted event"))
        })
    };

    match &result.outcome {
        TransitionOutcome::EventCreated => insert_event(conn, &event.details, event.creator_id),
        TransitionOutcome::EventUpdated { changed_fields } => {
            let event_id: i64 = persisted_id()?;
            check_capacity_holds(conn, event_id, event.details.capacity)?;
            update_event(conn, event_id, &event.details)?;
            debug!(event_id, ?changed_fields, "Applied event update");
            Ok(event_id)
        }
        TransitionOutcome::EventDeleted { affected_user_ids } => {
            let event_id: i64 = persisted_id()?;
            purge_event_from_index(conn, event_id)?;
            delete_event(conn, event_id)?;
            debug!(
                event_id,
                affected = affected_user_ids.len(),
                "Applied event deletion"
            );
            Ok(event_id)
        }
        TransitionOutcome::Registered {
            user_id,
            registered_at,
        } => {
            let event_id: i64 = persisted_id()?;
            insert_registration(conn, event_id, *user_id, *registered_at)?;
            add_index_entry(conn, *user_id, event_id)?;
            Ok(event_id)
        }
        TransitionOutcome::Cancelled { user_id } => {
            let event_id: i64 = persisted_id()?;
            delete_registration(conn, event_id, *user_id)?;
            remove_index_entry(conn, *user_id, event_id)?;
            Ok(event_id)
        }
    }
}
