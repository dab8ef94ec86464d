// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and user-index queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use evently_domain::{Role, User, parse_preferences};
use std::str::FromStr;
use tracing::debug;

use crate::diesel_schema::{user_event_index, users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct UserRow {
    user_id: i64,
    login_name: String,
    display_name: String,
    password_hash: String,
    role: String,
    preferences_json: String,
}

/// Loads the ordered event index of a user.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_user_index(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(user_event_index::table
        .filter(user_event_index::user_id.eq(user_id))
        .order(user_event_index::index_id.asc())
        .select(user_event_index::event_id)
        .load(conn)?)
}

/// Rebuilds a domain user from its row, loading the event index.
fn reconstruct_user(conn: &mut SqliteConnection, row: UserRow) -> Result<User, PersistenceError> {
    let user_id: i64 = row.user_id;
    let role: Role = Role::from_str(&row.role)
        .map_err(|e| PersistenceError::ReconstructionError(format!("user {user_id}: {e}")))?;
    let names: Vec<String> = serde_json::from_str(&row.preferences_json)?;
    let preferences = parse_preferences(&names)
        .map_err(|e| PersistenceError::ReconstructionError(format!("user {user_id}: {e}")))?;
    let registered_events: Vec<i64> = get_user_index(conn, user_id)?;

    Ok(User::with_id(
        user_id,
        &row.login_name,
        row.display_name,
        role,
        preferences,
        registered_events,
    ))
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<User>, PersistenceError> {
    debug!(user_id, "Looking up user by ID");

    let row: Option<UserRow> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| reconstruct_user(conn, row)).transpose()
}

/// Retrieves a user by login name.
///
/// The `login_name` is normalized to uppercase for case-insensitive lookup.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_login(
    conn: &mut SqliteConnection,
    login_name: &str,
) -> Result<Option<User>, PersistenceError> {
    let normalized_login: String = login_name.to_uppercase();
    debug!(login_name = %normalized_login, "Looking up user by login name");

    let row: Option<UserRow> = users::table
        .filter(users::login_name.eq(&normalized_login))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| reconstruct_user(conn, row)).transpose()
}

/// Checks a password against the stored bcrypt hash.
///
/// # Returns
///
/// * `Ok(Some(user))` if the login exists and the password matches
/// * `Ok(None)` if the login is unknown or the password is wrong
///
/// # Errors
///
/// Returns an error if the database query fails or the stored hash is malformed.
pub fn verify_credentials(
    conn: &mut SqliteConnection,
    login_name: &str,
    password: &str,
) -> Result<Option<User>, PersistenceError> {
    let normalized_login: String = login_name.to_uppercase();

    let row: Option<UserRow> = users::table
        .filter(users::login_name.eq(&normalized_login))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    let matches: bool = bcrypt::verify(password, &row.password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))?;
    if !matches {
        debug!(login_name = %normalized_login, "Password mismatch");
        return Ok(None);
    }

    reconstruct_user(conn, row).map(Some)
}

/// Returns whether a login name is already taken (case-insensitive).
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn login_name_exists(
    conn: &mut SqliteConnection,
    login_name: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = users::table
        .filter(users::login_name.eq(login_name.to_uppercase()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Counts users holding the admin role.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_admins(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(users::table
        .filter(users::role.eq(Role::Admin.as_str()))
        .count()
        .get_result(conn)?)
}
