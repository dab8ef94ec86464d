// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evently_domain::{Event, EventType};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
    pub user_id: Option<i64>,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    /// Fixed-width UTC timestamp.
    pub expires_at: String,
}

/// One page of the upcoming-events listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPage {
    /// The events on this page, ordered by resolved instant.
    pub events: Vec<Event>,
    /// The number of matching events across all pages.
    pub total: u64,
}

/// An event a user is registered for, with the time of registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredEvent {
    pub event: Event,
    pub registered_at: OffsetDateTime,
}

/// One row of the recent-registrations feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentRegistration {
    pub event_id: i64,
    pub event_title: String,
    pub user_id: i64,
    pub user_display_name: String,
    pub registered_at: OffsetDateTime,
}

/// Raw aggregate figures behind the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub total_events: u64,
    pub total_users: u64,
    pub upcoming_events: u64,
    /// Event counts per type; types without events are absent.
    pub events_by_type: Vec<(EventType, u64)>,
    /// Registration counts per UTC calendar day (`YYYY-MM-DD`), ascending.
    pub registrations_by_day: Vec<(String, u64)>,
    /// Most recent registrations first.
    pub recent_registrations: Vec<RecentRegistration>,
}

/// What a user-index reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Index entries added for registrations the index was missing.
    pub entries_added: usize,
    /// Index entries removed because no registration backs them.
    pub entries_removed: usize,
}

/// Identifiers assigned when an account change is persisted with its audit
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistUserResult {
    /// The user's id.
    pub user_id: i64,
    /// The audit event's id.
    pub audit_event_id: i64,
}

/// Identifiers assigned when a transition is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// The audit event's id.
    pub audit_event_id: i64,
    /// The event the transition concerned (newly assigned for creations).
    pub event_id: i64,
}
