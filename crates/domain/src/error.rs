// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::EventType;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Event title is empty or invalid.
    InvalidTitle(String),
    /// Event description is empty or invalid.
    InvalidDescription(String),
    /// Event location is empty or invalid.
    InvalidLocation(String),
    /// Event date could not be parsed as an ISO calendar date.
    InvalidEventDate {
        /// The rejected input.
        value: String,
        /// The parser's reason.
        reason: String,
    },
    /// Event time is not a 24-hour `HH:MM` value.
    InvalidEventTime(String),
    /// Event type is not one of the fixed set.
    InvalidEventType(String),
    /// Capacity must be between one and `MAX_CAPACITY`.
    InvalidCapacity {
        /// The rejected capacity.
        capacity: i64,
    },
    /// Role is neither `user` nor `admin`.
    InvalidRole(String),
    /// Login name is empty or invalid.
    InvalidLoginName(String),
    /// Display name is empty or invalid.
    InvalidDisplayName(String),
    /// Password does not meet the minimum requirements.
    InvalidPassword(String),
    /// Timestamp could not be parsed or rendered.
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// The parser's reason.
        reason: String,
    },
    /// Event does not exist.
    EventNotFound(i64),
    /// User does not exist.
    UserNotFound(i64),
    /// The event's type is not among the user's preferences.
    PreferenceMismatch {
        /// The event.
        event_id: i64,
        /// The event's type.
        event_type: EventType,
    },
    /// The user already holds a registration for the event.
    AlreadyRegistered {
        /// The event.
        event_id: i64,
        /// The user.
        user_id: i64,
    },
    /// The user holds no registration for the event.
    NotRegistered {
        /// The event.
        event_id: i64,
        /// The user.
        user_id: i64,
    },
    /// Every seat of the event is taken.
    EventFull {
        /// The event.
        event_id: i64,
        /// The event's capacity.
        capacity: u32,
    },
    /// A capacity edit would drop below the existing registrations.
    CapacityInvariantViolated {
        /// The event.
        event_id: i64,
        /// The requested capacity.
        requested: u32,
        /// The number of existing registrations.
        registered: usize,
    },
    /// The event's resolved instant is not in the future.
    EventAlreadyStarted {
        /// The event.
        event_id: i64,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidDescription(msg) => write!(f, "Invalid description: {msg}"),
            Self::InvalidLocation(msg) => write!(f, "Invalid location: {msg}"),
            Self::InvalidEventDate { value, reason } => {
                write!(f, "Invalid event date '{value}': {reason}")
            }
            Self::InvalidEventTime(value) => {
                write!(f, "Invalid event time '{value}': expected HH:MM (24-hour)")
            }
            Self::InvalidEventType(value) => write!(f, "Invalid event type: {value}"),
            Self::InvalidCapacity { capacity } => {
                write!(
                    f,
                    "Invalid capacity: {capacity}. Must be between 1 and {}",
                    crate::validation::MAX_CAPACITY
                )
            }
            Self::InvalidRole(value) => write!(f, "Invalid role: {value}"),
            Self::InvalidLoginName(msg) => write!(f, "Invalid login name: {msg}"),
            Self::InvalidDisplayName(msg) => write!(f, "Invalid display name: {msg}"),
            Self::InvalidPassword(msg) => write!(f, "Invalid password: {msg}"),
            Self::InvalidTimestamp { value, reason } => {
                write!(f, "Invalid timestamp '{value}': {reason}")
            }
            Self::EventNotFound(event_id) => write!(f, "Event {event_id} not found"),
            Self::UserNotFound(user_id) => write!(f, "User {user_id} not found"),
            Self::PreferenceMismatch {
                event_id,
                event_type,
            } => {
                write!(
                    f,
                    "Event {event_id} is of type {event_type}, which is not among the user's preferences"
                )
            }
            Self::AlreadyRegistered { event_id, user_id } => {
                write!(f, "User {user_id} is already registered for event {event_id}")
            }
            Self::NotRegistered { event_id, user_id } => {
                write!(f, "User {user_id} is not registered for event {event_id}")
            }
            Self::EventFull { event_id, capacity } => {
                write!(f, "Event {event_id} is full ({capacity} of {capacity} seats taken)")
            }
            Self::CapacityInvariantViolated {
                event_id,
                requested,
                registered,
            } => {
                write!(
                    f,
                    "Cannot set capacity of event {event_id} to {requested}: {registered} users are already registered"
                )
            }
            Self::EventAlreadyStarted { event_id } => {
                write!(f, "Event {event_id} has already started")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
