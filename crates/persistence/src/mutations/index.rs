// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User event index maintenance.
//!
//! The index mirrors `registrations`; every write here happens in the same
//! transaction as the registration change it mirrors.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::data_models::ReconcileReport;
use crate::diesel_schema::{registrations, user_event_index};
use crate::error::PersistenceError;

/// Appends `event_id` to the index of `user_id`.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn add_index_entry(
    conn: &mut SqliteConnection,
    user_id: i64,
    event_id: i64,
) -> Result<(), PersistenceError> {
    diesel::insert_or_ignore_into(user_event_index::table)
        .values((
            user_event_index::user_id.eq(user_id),
            user_event_index::event_id.eq(event_id),
        ))
        .execute(conn)?;
    Ok(())
}

/// Removes `event_id` from the index of `user_id`.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn remove_index_entry(
    conn: &mut SqliteConnection,
    user_id: i64,
    event_id: i64,
) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(user_event_index::table)
        .filter(user_event_index::user_id.eq(user_id))
        .filter(user_event_index::event_id.eq(event_id))
        .execute(conn)?;
    if removed == 0 {
        warn!(user_id, event_id, "Index entry was already missing");
    }
    Ok(())
}

/// Removes `event_id` from every user's index.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn purge_event_from_index(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<usize, PersistenceError> {
    let removed: usize = diesel::delete(user_event_index::table)
        .filter(user_event_index::event_id.eq(event_id))
        .execute(conn)?;
    debug!(event_id, removed, "Purged event from user indexes");
    Ok(removed)
}

/// Rebuilds the user event index from the registrations table.
///
/// Missing entries are appended in registration order; entries with no
/// backing registration are removed.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn reconcile_user_index(
    conn: &mut SqliteConnection,
) -> Result<ReconcileReport, PersistenceError> {
    let authoritative: Vec<(i64, i64)> = registrations::table
        .order((
            registrations::registered_at.asc(),
            registrations::registration_id.asc(),
        ))
        .select((registrations::user_id, registrations::event_id))
        .load(conn)?;
    let indexed: BTreeSet<(i64, i64)> = user_event_index::table
        .select((user_event_index::user_id, user_event_index::event_id))
        .load::<(i64, i64)>(conn)?
        .into_iter()
        .collect();
    let backed: BTreeSet<(i64, i64)> = authoritative.iter().copied().collect();

    let mut report: ReconcileReport = ReconcileReport::default();

    for &(user_id, event_id) in indexed.difference(&backed) {
        report.entries_removed += diesel::delete(user_event_index::table)
            .filter(user_event_index::user_id.eq(user_id))
            .filter(user_event_index::event_id.eq(event_id))
            .execute(conn)?;
    }

    for &(user_id, event_id) in &authoritative {
        if !indexed.contains(&(user_id, event_id)) {
            add_index_entry(conn, user_id, event_id)?;
            report.entries_added += 1;
        }
    }

    info!(
        entries_added = report.entries_added,
        entries_removed = report.entries_removed,
        "Reconciled user event index"
    );
    Ok(report)
}
