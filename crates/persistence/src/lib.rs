// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Evently.
//!
//! A Diesel-backed `SQLite` store for users, events, registrations, the
//! per-user event index, sessions, and audit events.
//!
//! ## Consistency
//!
//! - `registrations` is authoritative; `user_event_index` mirrors it and is
//!   written in the same transaction as every registration change
//! - Every transition is persisted inside one `IMMEDIATE` transaction that
//!   re-reads the stored capacity and registration count before writing
//! - Foreign key enforcement is verified at startup
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives every caller its own shared-cache
//! in-memory database, so tests are isolated without temp files.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::{Connection, SqliteConnection};
use evently::TransitionResult;
use evently_audit::AuditEvent;
use evently_domain::{Event, EventType, Role, User};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    DashboardCounts, EventPage, PersistTransitionResult, PersistUserResult, RecentRegistration,
    ReconcileReport, RegisteredEvent, SessionData,
};
pub use error::PersistenceError;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_evently_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Persists a transition result atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails or a write-time recheck
    /// (capacity, duplicate registration, missing row) rejects it.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::transition::persist_transition(&mut self.conn, result)
    }

    /// Persists a standalone audit event (e.g. account or maintenance actions).
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::audit::persist_audit_event(&mut self.conn, event, None)
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the audit event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, audit_event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, audit_event_id)
    }

    /// Lists the audit trail of one event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_audit_events_for_event(
        &mut self,
        event_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::list_audit_events_for_event(&mut self.conn, event_id)
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Retrieves an event with its registrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if not found.
    pub fn get_event(&mut self, event_id: i64) -> Result<Option<Event>, PersistenceError> {
        queries::events::get_event(&mut self.conn, event_id)
    }

    /// Lists events starting strictly after `now`.
    ///
    /// # Arguments
    ///
    /// * `now` - The current instant, rendered with `format_instant`
    /// * `event_types` - Types to include; empty means all
    /// * `page` - 1-based page number
    /// * `page_size` - Events per page
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_upcoming_events(
        &mut self,
        now: &str,
        event_types: &BTreeSet<EventType>,
        page: u32,
        page_size: u32,
    ) -> Result<EventPage, PersistenceError> {
        queries::events::list_upcoming_events(&mut self.conn, now, event_types, page, page_size)
    }

    /// Lists every event a user is registered for.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_registered_events(
        &mut self,
        user_id: i64,
        event_types: &BTreeSet<EventType>,
    ) -> Result<Vec<RegisteredEvent>, PersistenceError> {
        queries::events::list_registered_events(&mut self.conn, user_id, event_types)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a user with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error if the login name is taken or the insert fails.
    pub fn create_user(
        &mut self,
        login_name: &str,
        display_name: &str,
        password: &str,
        role: Role,
        preferences: &BTreeSet<EventType>,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_user(
            &mut self.conn,
            login_name,
            display_name,
            password,
            role,
            preferences,
        )
    }

    /// Creates a user and its audit record atomically.
    ///
    /// `audit` receives the assigned user id and builds the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the login name is taken or either write fails.
    /// On error nothing is written.
    pub fn create_user_with_audit<F>(
        &mut self,
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
        mutations::users::create_user_with_audit(
            &mut self.conn,
            login_name,
            display_name,
            password,
            role,
            preferences,
            audit,
        )
    }

    /// Retrieves a user by ID, including the event index.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if not found.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<User>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Retrieves a user by login name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if not found.
    pub fn get_user_by_login(&mut self, login_name: &str) -> Result<Option<User>, PersistenceError> {
        queries::users::get_user_by_login(&mut self.conn, login_name)
    }

    /// Returns the user if `password` matches the stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored hash is malformed.
    pub fn verify_credentials(
        &mut self,
        login_name: &str,
        password: &str,
    ) -> Result<Option<User>, PersistenceError> {
        queries::users::verify_credentials(&mut self.conn, login_name, password)
    }

    /// Replaces a user's preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub fn update_preferences(
        &mut self,
        user_id: i64,
        preferences: &BTreeSet<EventType>,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_preferences(&mut self.conn, user_id, preferences)
    }

    /// Replaces a user's preferences and records the audit event atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or either write fails.
    /// On error nothing is written.
    pub fn update_preferences_with_audit(
        &mut self,
        user_id: i64,
        preferences: &BTreeSet<EventType>,
        audit_event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        mutations::users::update_preferences_with_audit(
            &mut self.conn,
            user_id,
            preferences,
            audit_event,
        )
    }

    /// Counts users holding the admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_admins(&mut self) -> Result<i64, PersistenceError> {
        queries::users::count_admins(&mut self.conn)
    }

    /// Rebuilds the user event index from registrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn reconcile_user_index(&mut self) -> Result<ReconcileReport, PersistenceError> {
        self.conn
            .immediate_transaction(mutations::index::reconcile_user_index)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if not found.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Touches a session's last activity timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::sessions::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes sessions that expired at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Collects the dashboard aggregates in one read transaction.
    ///
    /// # Arguments
    ///
    /// * `now` - The current instant, rendered with `format_instant`
    /// * `recent_limit` - How many recent registrations to include
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub fn dashboard_counts(
        &mut self,
        now: &str,
        recent_limit: u32,
    ) -> Result<DashboardCounts, PersistenceError> {
        self.conn.transaction(|conn| {
            Ok(DashboardCounts {
                total_events: queries::reporting::count_events(conn)?,
                total_users: queries::reporting::count_users(conn)?,
                upcoming_events: queries::reporting::count_upcoming_events(conn, now)?,
                events_by_type: queries::reporting::count_events_by_type(conn)?,
                registrations_by_day: queries::reporting::count_registrations_by_day(conn)?,
                recent_registrations: queries::reporting::list_recent_registrations(
                    conn,
                    recent_limit,
                )?,
            })
        })
    }
}
