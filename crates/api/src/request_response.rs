// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD`, times of day as `HH:MM`, and instants as
//! fixed-width UTC timestamps (`YYYY-MM-DDTHH:MM:SSZ`).

use serde::{Deserialize, Serialize};

/// Default page size for the upcoming event listing.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size the upcoming event listing accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Authentication
// ============================================================================

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The login name (case-insensitive).
    pub login_name: String,
    /// The plaintext password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token for subsequent requests.
    pub session_token: String,
    /// The user id.
    pub user_id: i64,
    /// The normalized login name.
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// The user's role.
    pub role: String,
    /// When the session expires.
    pub expires_at: String,
}

/// API response describing the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// The user id.
    pub user_id: i64,
    /// The normalized login name.
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// The user's role.
    pub role: String,
    /// Accepted event types.
    pub preferences: Vec<String>,
    /// Events the user is registered for.
    pub registered_events: Vec<i64>,
}

// ============================================================================
// Users
// ============================================================================

/// API request to create a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// The login name (stored uppercase).
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// The plaintext password.
    pub password: String,
    /// `user` or `admin`. Open sign-up may only create `user`.
    #[serde(default)]
    pub role: Option<String>,
    /// Accepted event types.
    #[serde(default)]
    pub preferences: Vec<String>,
}

/// API response for a successful user creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    /// The new user's id.
    pub user_id: i64,
    /// The normalized login name.
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// The assigned role.
    pub role: String,
    /// A success message.
    pub message: String,
}

/// API request to replace the current user's preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    /// Accepted event types.
    pub preferences: Vec<String>,
}

/// API response for a preference update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePreferencesResponse {
    /// The user id.
    pub user_id: i64,
    /// The stored preferences, in canonical order.
    pub preferences: Vec<String>,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Events
// ============================================================================

/// API request to create an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Free-text location.
    pub location: String,
    /// Calendar date (`YYYY-MM-DD`).
    pub event_date: String,
    /// Start time of day (`HH:MM`).
    pub event_time: String,
    /// Event type name.
    pub event_type: String,
    /// Maximum registrations.
    pub capacity: i64,
}

/// API request to edit an event. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New location.
    #[serde(default)]
    pub location: Option<String>,
    /// New date (`YYYY-MM-DD`).
    #[serde(default)]
    pub event_date: Option<String>,
    /// New time of day (`HH:MM`).
    #[serde(default)]
    pub event_time: Option<String>,
    /// New type name.
    #[serde(default)]
    pub event_type: Option<String>,
    /// New capacity.
    #[serde(default)]
    pub capacity: Option<i64>,
}

/// An event as presented by the API, with its derived capacity figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    /// The event id.
    pub event_id: i64,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Free-text location.
    pub location: String,
    /// Calendar date (`YYYY-MM-DD`).
    pub event_date: String,
    /// Start time of day (`HH:MM`).
    pub event_time: String,
    /// Event type name.
    pub event_type: String,
    /// Maximum registrations.
    pub capacity: u32,
    /// The creating administrator.
    pub creator_id: i64,
    /// Active registrations.
    pub registered_count: usize,
    /// Seats left.
    pub available_spots: u32,
    /// Whether no seats are left.
    pub is_full: bool,
    /// The resolved start instant.
    pub starts_at: String,
}

/// API request for the upcoming event listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEventsRequest {
    /// Restrict to these event types; empty means all.
    #[serde(default)]
    pub event_types: Vec<String>,
    /// 1-based page number (default 1).
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size, 1 to `MAX_PAGE_SIZE` (default `DEFAULT_PAGE_SIZE`).
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// API response for the upcoming event listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEventsResponse {
    /// The events on this page, soonest first.
    pub events: Vec<EventInfo>,
    /// The page returned.
    pub page: u32,
    /// The page size used.
    pub page_size: u32,
    /// Matching upcoming events across all pages.
    pub total: u64,
    /// Number of pages.
    pub total_pages: u64,
}

/// API response for event creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventResponse {
    /// The created event.
    pub event: EventInfo,
    /// The audit record of the creation.
    pub audit_event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for an event edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEventResponse {
    /// The edited event.
    pub event: EventInfo,
    /// The fields the request touched.
    pub changed_fields: Vec<String>,
    /// The audit record of the edit.
    pub audit_event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for an event deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEventResponse {
    /// The deleted event id.
    pub event_id: i64,
    /// Users whose registrations were removed.
    pub affected_user_ids: Vec<i64>,
    /// The audit record of the deletion.
    pub audit_event_id: i64,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Registrations
// ============================================================================

/// API response for a registration or cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    /// The event.
    pub event_id: i64,
    /// The user whose registration changed.
    pub user_id: i64,
    /// When the registration was created; absent after a cancellation.
    pub registered_at: Option<String>,
    /// Seats left after the change.
    pub available_spots: u32,
    /// Whether the event is now full.
    pub is_full: bool,
    /// The audit record of the change.
    pub audit_event_id: i64,
    /// A success message.
    pub message: String,
}

/// API request for the current user's registered events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRegisteredEventsRequest {
    /// Restrict to these event types; empty means all.
    #[serde(default)]
    pub event_types: Vec<String>,
}

/// One registered event with its registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredEventInfo {
    /// The event.
    pub event: EventInfo,
    /// When the user registered.
    pub registered_at: String,
}

/// API response for the current user's registered events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRegisteredEventsResponse {
    /// Registered events, soonest first.
    pub events: Vec<RegisteredEventInfo>,
}

// ============================================================================
// Reporting and maintenance
// ============================================================================

/// Number of events of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeCount {
    /// Event type name.
    pub event_type: String,
    /// Events of that type.
    pub count: u64,
}

/// Number of registrations created on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRegistrationCount {
    /// The day (`YYYY-MM-DD`).
    pub day: String,
    /// Registrations created that day.
    pub count: u64,
}

/// One entry of the recent registration feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentRegistrationInfo {
    /// The event.
    pub event_id: i64,
    /// The event title.
    pub event_title: String,
    /// The registered user.
    pub user_id: i64,
    /// The registered user's display name.
    pub user_display_name: String,
    /// When the registration was created.
    pub registered_at: String,
}

/// API response for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// All events.
    pub total_events: u64,
    /// All users.
    pub total_users: u64,
    /// Events whose resolved instant is still ahead.
    pub upcoming_events: u64,
    /// Events per type.
    pub events_by_type: Vec<EventTypeCount>,
    /// Registrations per day, oldest first.
    pub registrations_by_day: Vec<DailyRegistrationCount>,
    /// Newest registrations first.
    pub recent_registrations: Vec<RecentRegistrationInfo>,
}

/// API response for a user index rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileResponse {
    /// Index entries added.
    pub entries_added: usize,
    /// Index entries removed.
    pub entries_removed: usize,
    /// A success message.
    pub message: String,
}
