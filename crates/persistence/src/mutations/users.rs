// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use evently_audit::AuditEvent;
use evently_domain::{EventType, Role};
use std::collections::BTreeSet;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::PersistUserResult;
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::queries::users::login_name_exists;

fn preferences_json(preferences: &BTreeSet<EventType>) -> Result<String, PersistenceError> {
    let names: Vec<&'static str> = preferences.iter().map(EventType::as_str).collect();
    Ok(serde_json::to_string(&names)?)
}

/// Creates a new user.
///
/// The `login_name` is normalized to uppercase for case-insensitive uniqueness.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `login_name` - The login name (will be normalized)
/// * `display_name` - The display name
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The role
/// * `preferences` - Event types the user accepts
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateLoginName` if the login is taken, or
/// an error if hashing or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    login_name: &str,
    display_name: &str,
    password: &str,
    role: Role,
    preferences: &BTreeSet<EventType>,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = login_name.to_uppercase();

    if login_name_exists(conn, &normalized_login)? {
        return Err(PersistenceError::DuplicateLoginName(normalized_login));
    }

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(users::table)
        .values((
            users::login_name.eq(&normalized_login),
            users::display_name.eq(display_name),
            users::password_hash.eq(&password_hash),
            users::role.eq(role.as_str()),
            users::preferences_json.eq(preferences_json(preferences)?),
        ))
        .execute(conn)?;

    let user_id: i64 = get_last_insert_rowid(conn)?;

    info!(user_id, login_name = %normalized_login, role = %role, "Created user");
    Ok(user_id)
}

/// Replaces a user's event-type preferences.
///
/// Existing registrations are unaffected.
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if the user does not exist.
pub fn update_preferences(
    conn: &mut SqliteConnection,
    user_id: i64,
    preferences: &BTreeSet<EventType>,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::preferences_json.eq(preferences_json(preferences)?))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::UserNotFound(user_id));
    }

    info!(user_id, count = preferences.len(), "Updated preferences");
    Ok(())
}

/// Creates a user and records its audit event in one transaction.
///
/// `audit` receives the new user id and builds the record to store.
///
/// # Errors
///
/// Returns an error if the user or the audit record cannot be written.
/// On error nothing is written.
pub fn create_user_with_audit<F>(
    conn: &mut SqliteConnection,
    login_name: &str,
    display_name: &str,
    password: &str,
    role: Role,
    preferences: &BTreeSet<EventType>,
    audit: F,
) -> Result<PersistUserResult, PersistenceError>
where
    F: FnOnce(i64) -> AuditEvent,
{
    conn.immediate_transaction(|conn| {
        let user_id: i64 =
            create_user(conn, login_name, display_name, password, role, preferences)?;
        let audit_event_id: i64 = persist_audit_event(conn, &audit(user_id), None)?;
        Ok(PersistUserResult {
            user_id,
            audit_event_id,
        })
    })
}

/// Replaces a user's preferences and records the audit event in one
/// transaction.
///
/// # Returns
///
/// The audit event ID.
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if the user does not exist, or
/// an error if either write fails. On error nothing is written.
pub fn update_preferences_with_audit(
    conn: &mut SqliteConnection,
    user_id: i64,
    preferences: &BTreeSet<EventType>,
    audit_event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        update_preferences(conn, user_id, preferences)?;
        persist_audit_event(conn, audit_event, None)
    })
}
