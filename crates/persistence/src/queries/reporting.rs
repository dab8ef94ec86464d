// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregation queries for the admin dashboard.
//!
//! Every function here returns zero or an empty list on an empty store.

use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use evently_domain::{EventType, parse_instant};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::data_models::RecentRegistration;
use crate::diesel_schema::{events, registrations, users};
use crate::error::PersistenceError;

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Counts all events, past and upcoming.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_events(conn: &mut SqliteConnection) -> Result<u64, PersistenceError> {
    let count: i64 = events::table.count().get_result(conn)?;
    Ok(to_count(count))
}

/// Counts all users.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_users(conn: &mut SqliteConnection) -> Result<u64, PersistenceError> {
    let count: i64 = users::table.count().get_result(conn)?;
    Ok(to_count(count))
}

/// Counts events whose start instant is strictly after `now`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_upcoming_events(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<u64, PersistenceError> {
    let count: i64 = events::table
        .filter(events::starts_at.gt(now))
        .count()
        .get_result(conn)?;
    Ok(to_count(count))
}

/// Counts events per type, in type order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored type is unknown.
pub fn count_events_by_type(
    conn: &mut SqliteConnection,
) -> Result<Vec<(EventType, u64)>, PersistenceError> {
    let rows: Vec<(String, i64)> = events::table
        .group_by(events::event_type)
        .select((events::event_type, count_star()))
        .load(conn)?;

    let mut counts: Vec<(EventType, u64)> = rows
        .into_iter()
        .map(|(name, count)| {
            EventType::from_str(&name)
                .map(|event_type| (event_type, to_count(count)))
                .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
        })
        .collect::<Result<_, _>>()?;
    counts.sort_by_key(|(event_type, _)| *event_type);
    Ok(counts)
}

/// Counts registrations per UTC calendar day of `registered_at`.
///
/// Stored timestamps are fixed-width UTC, so the day is their first ten
/// characters.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_registrations_by_day(
    conn: &mut SqliteConnection,
) -> Result<Vec<(String, u64)>, PersistenceError> {
    let stamps: Vec<String> = registrations::table
        .select(registrations::registered_at)
        .load(conn)?;

    let mut by_day: BTreeMap<String, u64> = BTreeMap::new();
    for stamp in stamps {
        let day: String = stamp.chars().take(10).collect();
        *by_day.entry(day).or_insert(0) += 1;
    }
    Ok(by_day.into_iter().collect())
}

/// Returns the `limit` most recent registrations across all events.
///
/// Ties on `registered_at` are broken by newest registration row first.
///
/// # Errors
///
/// Returns an error if the query fails or a timestamp is corrupt.
pub fn list_recent_registrations(
    conn: &mut SqliteConnection,
    limit: u32,
) -> Result<Vec<RecentRegistration>, PersistenceError> {
    let rows: Vec<(i64, String, i64, String, String)> = registrations::table
        .inner_join(events::table)
        .inner_join(users::table.on(users::user_id.eq(registrations::user_id)))
        .order((
            registrations::registered_at.desc(),
            registrations::registration_id.desc(),
        ))
        .limit(i64::from(limit))
        .select((
            registrations::event_id,
            events::title,
            registrations::user_id,
            users::display_name,
            registrations::registered_at,
        ))
        .load(conn)?;

    rows.into_iter()
        .map(
            |(event_id, event_title, user_id, user_display_name, registered_at)| {
                Ok(RecentRegistration {
                    event_id,
                    event_title,
                    user_id,
                    user_display_name,
                    registered_at: parse_instant(&registered_at)
                        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?,
                })
            },
        )
        .collect()
}
