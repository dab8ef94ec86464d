// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::capacity::CapacitySummary;
use crate::error::DomainError;
use crate::schedule::event_instant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::{Date, OffsetDateTime, Time};

/// The fixed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Lectures, seminars, study groups.
    Academic,
    /// Parties, mixers, social gatherings.
    Social,
    /// Matches, tournaments, training.
    Sports,
    /// Concerts, exhibitions, festivals.
    Cultural,
    /// Hands-on sessions.
    Workshop,
    /// Multi-talk conferences.
    Conference,
}

impl EventType {
    /// Every event type, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Academic,
        Self::Social,
        Self::Sports,
        Self::Cultural,
        Self::Workshop,
        Self::Conference,
    ];

    /// Converts this event type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Academic => "Academic",
            Self::Social => "Social",
            Self::Sports => "Sports",
            Self::Cultural => "Cultural",
            Self::Workshop => "Workshop",
            Self::Conference => "Conference",
        }
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Academic" => Ok(Self::Academic),
            "Social" => Ok(Self::Social),
            "Sports" => Ok(Self::Sports),
            "Cultural" => Ok(Self::Cultural),
            "Workshop" => Ok(Self::Workshop),
            "Conference" => Ok(Self::Conference),
            _ => Err(DomainError::InvalidEventType(s.to_string())),
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Regular user; may register for events.
    #[default]
    User,
    /// Administrator; manages events and sees statistics.
    Admin,
}

impl Role {
    /// Converts this role to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A 24-hour time of day with minute precision (`HH:MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventTime {
    hour: u8,
    minute: u8,
}

impl EventTime {
    /// Creates a new `EventTime`.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour is above 23 or the minute above 59.
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 {
            return Err(DomainError::InvalidEventTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    /// Returns the hour (0-23).
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns this time of day with seconds and sub-seconds zeroed.
    #[must_use]
    pub fn to_time(&self) -> Time {
        // Components are range-checked at construction.
        Time::from_hms(self.hour, self.minute, 0).unwrap_or(Time::MIDNIGHT)
    }
}

impl FromStr for EventTime {
    type Err = DomainError;

    /// Parses `HH:MM`, matching `^([01]\d|2[0-3]):[0-5]\d$`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidEventTime(s.to_string());

        let bytes: &[u8] = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }
        let digits: [u8; 4] = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }

        let hour: u8 = (digits[0] - b'0') * 10 + (digits[1] - b'0');
        let minute: u8 = (digits[2] - b'0') * 10 + (digits[3] - b'0');
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// The editable descriptive fields of an event.
///
/// Values of this type are always validated; construct them through
/// `validate_event_details`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Free-text location.
    pub location: String,
    /// Calendar date of the event.
    pub event_date: Date,
    /// Time of day the event starts, in UTC.
    pub event_time: EventTime,
    /// Event category.
    pub event_type: EventType,
    /// Maximum number of registrations.
    pub capacity: u32,
}

/// A partial update to an event's details.
///
/// `None` fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New date.
    pub event_date: Option<Date>,
    /// New time of day.
    pub event_time: Option<EventTime>,
    /// New category.
    pub event_type: Option<EventType>,
    /// New capacity.
    pub capacity: Option<u32>,
}

impl EventPatch {
    /// Merges this patch over `current`, returning the merged (unvalidated) details.
    #[must_use]
    pub fn merge(&self, current: &EventDetails) -> EventDetails {
        EventDetails {
            title: self.title.clone().unwrap_or_else(|| current.title.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            location: self
                .location
                .clone()
                .unwrap_or_else(|| current.location.clone()),
            event_date: self.event_date.unwrap_or(current.event_date),
            event_time: self.event_time.unwrap_or(current.event_time),
            event_type: self.event_type.unwrap_or(current.event_type),
            capacity: self.capacity.unwrap_or(current.capacity),
        }
    }

    /// Returns the names of the fields this patch touches.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.location.is_some() {
            fields.push("location");
        }
        if self.event_date.is_some() {
            fields.push("event_date");
        }
        if self.event_time.is_some() {
            fields.push("event_time");
        }
        if self.event_type.is_some() {
            fields.push("event_type");
        }
        if self.capacity.is_some() {
            fields.push("capacity");
        }
        fields
    }
}

/// A claim by one user on one seat of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The registered user.
    pub user_id: i64,
    /// When the registration was created.
    pub registered_at: OffsetDateTime,
}

impl Registration {
    /// Creates a new registration.
    #[must_use]
    pub const fn new(user_id: i64, registered_at: OffsetDateTime) -> Self {
        Self {
            user_id,
            registered_at,
        }
    }
}

/// An event and its registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The canonical identifier assigned by the store.
    /// `None` indicates the event has not been persisted yet.
    event_id: Option<i64>,
    /// Descriptive fields.
    pub details: EventDetails,
    /// The user who created the event.
    pub creator_id: i64,
    /// Active registrations, in creation order.
    pub registrations: Vec<Registration>,
}

impl Event {
    /// Creates a new, unpersisted event with no registrations.
    #[must_use]
    pub const fn new(details: EventDetails, creator_id: i64) -> Self {
        Self {
            event_id: None,
            details,
            creator_id,
            registrations: Vec::new(),
        }
    }

    /// Creates an event with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        event_id: i64,
        details: EventDetails,
        creator_id: i64,
        registrations: Vec<Registration>,
    ) -> Self {
        Self {
            event_id: Some(event_id),
            details,
            creator_id,
            registrations,
        }
    }

    /// Returns the canonical identifier if persisted.
    #[must_use]
    pub const fn event_id(&self) -> Option<i64> {
        self.event_id
    }

    /// Returns the identifier, or `0` for an unpersisted event.
    ///
    /// Only used to label errors and audit records.
    #[must_use]
    pub fn id_or_default(&self) -> i64 {
        self.event_id.unwrap_or_default()
    }

    /// Returns the resolved instant of this event.
    #[must_use]
    pub fn starts_at(&self) -> OffsetDateTime {
        event_instant(self.details.event_date, self.details.event_time)
    }

    /// Returns whether the event starts strictly after `now`.
    #[must_use]
    pub fn is_upcoming(&self, now: OffsetDateTime) -> bool {
        crate::schedule::is_upcoming(self.starts_at(), now)
    }

    /// Returns the capacity ledger view of this event.
    #[must_use]
    pub fn capacity_summary(&self) -> CapacitySummary {
        CapacitySummary::new(self.details.capacity, self.registrations.len())
    }

    /// Returns whether `user_id` holds a registration for this event.
    #[must_use]
    pub fn is_registered(&self, user_id: i64) -> bool {
        self.registrations.iter().any(|r| r.user_id == user_id)
    }

    /// Returns the registration held by `user_id`, if any.
    #[must_use]
    pub fn registration_for(&self, user_id: i64) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.user_id == user_id)
    }

    /// Returns the ids of every registered user, in registration order.
    #[must_use]
    pub fn registrant_ids(&self) -> Vec<i64> {
        self.registrations.iter().map(|r| r.user_id).collect()
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// The canonical identifier assigned by the store.
    user_id: Option<i64>,
    /// Unique login name (stored uppercase).
    pub login_name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Authorization role.
    pub role: Role,
    /// Event types this user is willing to register for.
    pub preferences: BTreeSet<EventType>,
    /// Events this user holds registrations for.
    ///
    /// Mirror of the authoritative event registrations; kept in sync by
    /// every register/cancel transition.
    pub registered_events: Vec<i64>,
}

impl User {
    /// Creates a new, unpersisted user with no registrations.
    ///
    /// The login name is normalized to uppercase for case-insensitive uniqueness.
    #[must_use]
    pub fn new(
        login_name: &str,
        display_name: String,
        role: Role,
        preferences: BTreeSet<EventType>,
    ) -> Self {
        Self {
            user_id: None,
            login_name: login_name.to_uppercase(),
            display_name,
            role,
            preferences,
            registered_events: Vec::new(),
        }
    }

    /// Creates a user with an existing persisted ID.
    #[must_use]
    pub fn with_id(
        user_id: i64,
        login_name: &str,
        display_name: String,
        role: Role,
        preferences: BTreeSet<EventType>,
        registered_events: Vec<i64>,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            login_name: login_name.to_uppercase(),
            display_name,
            role,
            preferences,
            registered_events,
        }
    }

    /// Returns the canonical identifier if persisted.
    #[must_use]
    pub const fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    /// Returns the identifier, or `0` for an unpersisted user.
    #[must_use]
    pub fn id_or_default(&self) -> i64 {
        self.user_id.unwrap_or_default()
    }

    /// Returns whether this user accepts events of `event_type`.
    #[must_use]
    pub fn prefers(&self, event_type: EventType) -> bool {
        self.preferences.contains(&event_type)
    }

    /// Returns whether this user is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
