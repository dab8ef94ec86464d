// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registration mutations.
//!
//! Callers run these inside a write transaction together with the matching
//! user-index update.

use diesel::SqliteConnection;
use diesel::prelude::*;
use evently_domain::{DomainError, format_instant};
use num_traits::ToPrimitive;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::diesel_schema::registrations;
use crate::error::PersistenceError;
use crate::queries::events::{capacity_and_count, is_registered};

/// Inserts a registration after re-checking the stored event.
///
/// The snapshot the caller validated may be stale; this re-reads the
/// event's capacity and live count under the write lock.
///
/// # Errors
///
/// Returns:
/// - `PersistenceError::EventNotFound` if the event was deleted meanwhile
/// - `PersistenceError::RuleViolation(AlreadyRegistered)` if a row exists
/// - `PersistenceError::RuleViolation(EventFull)` if no seat remains
pub fn insert_registration(
    conn: &mut SqliteConnection,
    event_id: i64,
    user_id: i64,
    registered_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let (capacity, registered): (i32, i64) = capacity_and_count(conn, event_id)?;

    if is_registered(conn, event_id, user_id)? {
        warn!(event_id, user_id, "Concurrent duplicate registration rejected");
        return Err(PersistenceError::RuleViolation(
            DomainError::AlreadyRegistered { event_id, user_id },
        ));
    }

    if registered >= i64::from(capacity) {
        warn!(event_id, capacity, registered, "Capacity recheck rejected registration");
        return Err(PersistenceError::RuleViolation(DomainError::EventFull {
            event_id,
            capacity: capacity.to_u32().unwrap_or_default(),
        }));
    }

    let stamp: String = format_instant(registered_at)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

    diesel::insert_into(registrations::table)
        .values((
            registrations::event_id.eq(event_id),
            registrations::user_id.eq(user_id),
            registrations::registered_at.eq(&stamp),
        ))
        .execute(conn)?;

    debug!(event_id, user_id, registered_at = %stamp, "Inserted registration");
    Ok(())
}

/// Deletes the registration of `user_id` for `event_id`.
///
/// # Errors
///
/// Returns `PersistenceError::RuleViolation(NotRegistered)` if no row existed.
pub fn delete_registration(
    conn: &mut SqliteConnection,
    event_id: i64,
    user_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(registrations::table)
        .filter(registrations::event_id.eq(event_id))
        .filter(registrations::user_id.eq(user_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::RuleViolation(DomainError::NotRegistered {
            event_id,
            user_id,
        }));
    }

    debug!(event_id, user_id, "Deleted registration");
    Ok(())
}

/// Re-checks that a capacity edit still holds every stored registration.
///
/// # Errors
///
/// Returns `PersistenceError::RuleViolation(CapacityInvariantViolated)` if
/// registrations were added since the caller's snapshot.
pub fn check_capacity_holds(
    conn: &mut SqliteConnection,
    event_id: i64,
    requested: u32,
) -> Result<(), PersistenceError> {
    let (_, registered): (i32, i64) = capacity_and_count(conn, event_id)?;
    if registered > i64::from(requested) {
        return Err(PersistenceError::RuleViolation(
            DomainError::CapacityInvariantViolated {
                event_id,
                requested,
                registered: registered.to_usize().unwrap_or_default(),
            },
        ));
    }
    Ok(())
}
