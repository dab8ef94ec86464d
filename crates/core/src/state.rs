// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evently_audit::{AuditEvent, StateSnapshot};
use evently_domain::Event;
use time::OffsetDateTime;

/// Whether registration is allowed once an event has started.
///
/// Cancellation and deletion of started events are always refused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationPolicy {
    /// Accept registrations for events whose instant is not in the future.
    pub allow_after_start: bool,
}

impl RegistrationPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(allow_after_start: bool) -> Self {
        Self { allow_after_start }
    }
}

/// The ambient inputs of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionContext {
    /// The instant the transition is evaluated at.
    pub now: OffsetDateTime,
    /// The registration policy in force.
    pub policy: RegistrationPolicy,
}

impl TransitionContext {
    /// Creates a context.
    #[must_use]
    pub const fn new(now: OffsetDateTime, policy: RegistrationPolicy) -> Self {
        Self { now, policy }
    }
}

/// What a successful transition changed.
///
/// Each variant names every write the store must make in one unit:
/// the event row, its registrations, and the affected user indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// A new event exists.
    EventCreated,
    /// The event's details changed.
    EventUpdated {
        /// The fields the edit touched.
        changed_fields: Vec<&'static str>,
    },
    /// The event and all its registrations are gone.
    EventDeleted {
        /// Users whose index must drop the event.
        affected_user_ids: Vec<i64>,
    },
    /// A registration was added; the user's index gains the event.
    Registered {
        /// The registered user.
        user_id: i64,
        /// When the seat was claimed.
        registered_at: OffsetDateTime,
    },
    /// A registration was removed; the user's index loses the event.
    Cancelled {
        /// The user whose seat was released.
        user_id: i64,
    },
}

/// The result of a successful state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The event after the transition.
    ///
    /// For a deletion this is the last snapshot before removal.
    pub new_event: Event,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// The writes this transition requires.
    pub outcome: TransitionOutcome,
}

/// Renders the audit snapshot of an event.
#[must_use]
pub fn event_snapshot(event: &Event) -> StateSnapshot {
    let registrants: Vec<String> = event
        .registrant_ids()
        .iter()
        .map(ToString::to_string)
        .collect();
    StateSnapshot::new(format!(
        "event_id={},title={},type={},date={},time={},capacity={},registrations=[{}]",
        event.id_or_default(),
        event.details.title,
        event.details.event_type,
        event.details.event_date,
        event.details.event_time,
        event.details.capacity,
        registrants.join(",")
    ))
}

/// Snapshot recorded as `before` for a creation and `after` for a deletion.
#[must_use]
pub fn absent_snapshot() -> StateSnapshot {
    StateSnapshot::new(String::from("absent"))
}
