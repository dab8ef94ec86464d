// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event row mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use evently_domain::{EventDetails, event_instant, format_event_date, format_instant};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::events;
use crate::error::PersistenceError;

/// Column values derived from event details.
struct EventColumns {
    event_date: String,
    event_time: String,
    capacity: i32,
    starts_at: String,
}

impl EventColumns {
    fn from_details(details: &EventDetails) -> Result<Self, PersistenceError> {
        let to_serialization_error = |e: evently_domain::DomainError| {
            PersistenceError::SerializationError(e.to_string())
        };
        Ok(Self {
            event_date: format_event_date(details.event_date).map_err(to_serialization_error)?,
            event_time: details.event_time.to_string(),
            capacity: details.capacity.to_i32().ok_or_else(|| {
                PersistenceError::SerializationError(format!(
                    "capacity {} does not fit the store",
                    details.capacity
                ))
            })?,
            starts_at: format_instant(event_instant(details.event_date, details.event_time))
                .map_err(to_serialization_error)?,
        })
    }
}

/// Inserts an event row.
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if a field cannot be stored or the insert fails.
pub fn insert_event(
    conn: &mut SqliteConnection,
    details: &EventDetails,
    creator_id: i64,
) -> Result<i64, PersistenceError> {
    let columns: EventColumns = EventColumns::from_details(details)?;

    diesel::insert_into(events::table)
        .values((
            events::title.eq(&details.title),
            events::description.eq(&details.description),
            events::location.eq(&details.location),
            events::event_date.eq(&columns.event_date),
            events::event_time.eq(&columns.event_time),
            events::event_type.eq(details.event_type.as_str()),
            events::capacity.eq(columns.capacity),
            events::starts_at.eq(&columns.starts_at),
            events::creator_id.eq(creator_id),
        ))
        .execute(conn)?;

    let event_id: i64 = get_last_insert_rowid(conn)?;
    debug!(event_id, starts_at = %columns.starts_at, "Inserted event");
    Ok(event_id)
}

/// Rewrites an event's details and recomputes its start instant.
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` if no row was updated.
pub fn update_event(
    conn: &mut SqliteConnection,
    event_id: i64,
    details: &EventDetails,
) -> Result<(), PersistenceError> {
    let columns: EventColumns = EventColumns::from_details(details)?;

    let rows_affected: usize = diesel::update(events::table)
        .filter(events::event_id.eq(event_id))
        .set((
            events::title.eq(&details.title),
            events::description.eq(&details.description),
            events::location.eq(&details.location),
            events::event_date.eq(&columns.event_date),
            events::event_time.eq(&columns.event_time),
            events::event_type.eq(details.event_type.as_str()),
            events::capacity.eq(columns.capacity),
            events::starts_at.eq(&columns.starts_at),
            events::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::EventNotFound(event_id));
    }

    debug!(event_id, starts_at = %columns.starts_at, "Updated event");
    Ok(())
}

/// Deletes an event row. Registrations cascade.
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` if no row was deleted.
pub fn delete_event(conn: &mut SqliteConnection, event_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(events::table)
        .filter(events::event_id.eq(event_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::EventNotFound(event_id));
    }

    debug!(event_id, "Deleted event");
    Ok(())
}
