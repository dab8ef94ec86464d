// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event and registration queries.
//!
//! Events are always returned with their full registration list so that
//! capacity figures are derived from the same read.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use evently_domain::{
    Event, EventDetails, EventTime, EventType, Registration, parse_capacity, parse_event_date,
    parse_instant,
};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use tracing::debug;

use crate::data_models::{EventPage, RegisteredEvent};
use crate::diesel_schema::{events, registrations};
use crate::error::PersistenceError;

/// Diesel Queryable struct for event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = events)]
pub(crate) struct EventRow {
    pub(crate) event_id: i64,
    title: String,
    description: String,
    location: String,
    event_date: String,
    event_time: String,
    event_type: String,
    pub(crate) capacity: i32,
    creator_id: i64,
}

/// Diesel Queryable struct for registration rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = registrations)]
struct RegistrationRow {
    event_id: i64,
    user_id: i64,
    registered_at: String,
}

fn reconstruction_error(event_id: i64, err: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::ReconstructionError(format!("event {event_id}: {err}"))
}

/// Rebuilds a domain event from its row and registrations.
fn reconstruct_event(
    row: EventRow,
    registrations: Vec<Registration>,
) -> Result<Event, PersistenceError> {
    let event_id: i64 = row.event_id;
    let details: EventDetails = EventDetails {
        title: row.title,
        description: row.description,
        location: row.location,
        event_date: parse_event_date(&row.event_date)
            .map_err(|e| reconstruction_error(event_id, e))?,
        event_time: EventTime::from_str(&row.event_time)
            .map_err(|e| reconstruction_error(event_id, e))?,
        event_type: EventType::from_str(&row.event_type)
            .map_err(|e| reconstruction_error(event_id, e))?,
        capacity: parse_capacity(i64::from(row.capacity))
            .map_err(|e| reconstruction_error(event_id, e))?,
    };
    Ok(Event::with_id(event_id, details, row.creator_id, registrations))
}

/// Loads the registrations of each given event, in registration order.
fn load_registrations(
    conn: &mut SqliteConnection,
    event_ids: &[i64],
) -> Result<HashMap<i64, Vec<Registration>>, PersistenceError> {
    let rows: Vec<RegistrationRow> = registrations::table
        .filter(registrations::event_id.eq_any(event_ids.to_vec()))
        .order((
            registrations::registered_at.asc(),
            registrations::registration_id.asc(),
        ))
        .select(RegistrationRow::as_select())
        .load(conn)?;

    let mut by_event: HashMap<i64, Vec<Registration>> = HashMap::new();
    for row in rows {
        let registered_at = parse_instant(&row.registered_at)
            .map_err(|e| reconstruction_error(row.event_id, e))?;
        by_event
            .entry(row.event_id)
            .or_default()
            .push(Registration::new(row.user_id, registered_at));
    }
    Ok(by_event)
}

/// Attaches registrations to a batch of event rows, preserving row order.
fn assemble_events(
    conn: &mut SqliteConnection,
    rows: Vec<EventRow>,
) -> Result<Vec<Event>, PersistenceError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.event_id).collect();
    let mut by_event: HashMap<i64, Vec<Registration>> = load_registrations(conn, &ids)?;
    rows.into_iter()
        .map(|row| {
            let registrations: Vec<Registration> =
                by_event.remove(&row.event_id).unwrap_or_default();
            reconstruct_event(row, registrations)
        })
        .collect()
}

fn type_names(event_types: &BTreeSet<EventType>) -> Vec<&'static str> {
    event_types.iter().map(EventType::as_str).collect()
}

/// Retrieves an event with its registrations.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the event is not found.
pub fn get_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Option<Event>, PersistenceError> {
    debug!(event_id, "Loading event");

    let row: Option<EventRow> = events::table
        .filter(events::event_id.eq(event_id))
        .select(EventRow::as_select())
        .first(conn)
        .optional()?;

    match row {
        Some(row) => Ok(assemble_events(conn, vec![row])?.into_iter().next()),
        None => Ok(None),
    }
}

/// Returns the stored capacity and live registration count of an event.
///
/// Used as the in-transaction recheck before a registration is inserted.
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` if the event does not exist.
pub fn capacity_and_count(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<(i32, i64), PersistenceError> {
    let capacity: i32 = events::table
        .filter(events::event_id.eq(event_id))
        .select(events::capacity)
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::EventNotFound(event_id))?;

    let registered: i64 = registrations::table
        .filter(registrations::event_id.eq(event_id))
        .count()
        .get_result(conn)?;

    Ok((capacity, registered))
}

/// Returns whether `user_id` holds a registration row for `event_id`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_registered(
    conn: &mut SqliteConnection,
    event_id: i64,
    user_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = registrations::table
        .filter(registrations::event_id.eq(event_id))
        .filter(registrations::user_id.eq(user_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Filter shared by the page query and its count.
fn upcoming_filter<'a>(
    now: &'a str,
    names: &'a [&'static str],
) -> events::BoxedQuery<'a, Sqlite> {
    let mut query = events::table
        .filter(events::starts_at.gt(now))
        .into_boxed();
    if !names.is_empty() {
        query = query.filter(events::event_type.eq_any(names.to_vec()));
    }
    query
}

/// Lists events starting strictly after `now`, ordered by start instant.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `now` - The current instant, rendered with `format_instant`
/// * `event_types` - Types to include; empty means all
/// * `page` - 1-based page number
/// * `page_size` - Events per page
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_upcoming_events(
    conn: &mut SqliteConnection,
    now: &str,
    event_types: &BTreeSet<EventType>,
    page: u32,
    page_size: u32,
) -> Result<EventPage, PersistenceError> {
    let names: Vec<&'static str> = type_names(event_types);

    let total: i64 = upcoming_filter(now, &names).count().get_result(conn)?;

    let offset: i64 = i64::from(page.saturating_sub(1)) * i64::from(page_size);
    let rows: Vec<EventRow> = upcoming_filter(now, &names)
        .order((events::starts_at.asc(), events::event_id.asc()))
        .limit(i64::from(page_size))
        .offset(offset)
        .select(EventRow::as_select())
        .load(conn)?;

    debug!(now, total, returned = rows.len(), page, "Listed upcoming events");

    Ok(EventPage {
        events: assemble_events(conn, rows)?,
        total: u64::try_from(total).unwrap_or_default(),
    })
}

/// Lists every event `user_id` is registered for, ordered by start instant.
///
/// Past events are included.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_registered_events(
    conn: &mut SqliteConnection,
    user_id: i64,
    event_types: &BTreeSet<EventType>,
) -> Result<Vec<RegisteredEvent>, PersistenceError> {
    let names: Vec<&'static str> = type_names(event_types);
    let filtered: bool = !names.is_empty();

    let mut query = registrations::table
        .inner_join(events::table)
        .filter(registrations::user_id.eq(user_id))
        .into_boxed();
    if filtered {
        query = query.filter(events::event_type.eq_any(names));
    }

    let rows: Vec<(EventRow, String)> = query
        .order((events::starts_at.asc(), events::event_id.asc()))
        .select((EventRow::as_select(), registrations::registered_at))
        .load(conn)?;

    let (event_rows, stamps): (Vec<EventRow>, Vec<String>) = rows.into_iter().unzip();
    let events: Vec<Event> = assemble_events(conn, event_rows)?;

    events
        .into_iter()
        .zip(stamps)
        .map(|(event, stamp)| {
            let registered_at = parse_instant(&stamp)
                .map_err(|e| reconstruction_error(event.id_or_default(), e))?;
            Ok(RegisteredEvent {
                event,
                registered_at,
            })
        })
        .collect()
}
