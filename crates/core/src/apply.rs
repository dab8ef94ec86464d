// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{
    TransitionContext, TransitionOutcome, TransitionResult, absent_snapshot, event_snapshot,
};
use evently_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use evently_domain::{
    DomainError, Event, EventDetails, EventPatch, Registration, User, validate_capacity_change,
    validate_event_details, whole_second,
};
use time::OffsetDateTime;

/// Creates a new event owned by `creator_id`.
///
/// # Arguments
///
/// * `details` - The event's fields
/// * `creator_id` - The administrator creating the event
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(TransitionResult)` holding the unpersisted event and its audit event
/// * `Err(CoreError)` if the details are invalid
///
/// # Errors
///
/// Returns an error if any field violates its constraint.
pub fn apply_create_event(
    details: EventDetails,
    creator_id: i64,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    validate_event_details(&details)?;

    let new_event: Event = Event::new(details, creator_id);

    let action: Action = Action::new(
        String::from("CreateEvent"),
        Some(format!(
            "Created {} event '{}' with capacity {}",
            new_event.details.event_type, new_event.details.title, new_event.details.capacity
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        absent_snapshot(),
        event_snapshot(&new_event),
        None,
    );

    Ok(TransitionResult {
        new_event,
        audit_event,
        outcome: TransitionOutcome::EventCreated,
    })
}

/// Applies a command to an event snapshot, producing the new snapshot and
/// an audit event.
///
/// This function is pure: the snapshot is not modified and nothing is
/// written. On error no state change has occurred.
///
/// # Arguments
///
/// * `event` - The event as currently stored (must be persisted)
/// * `command` - The command to apply
/// * `context` - The evaluation instant and registration policy
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The event has no persisted id
/// - The command violates a registration, capacity, or timing rule
pub fn apply(
    event: &Event,
    command: Command,
    context: &TransitionContext,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let Some(event_id) = event.event_id() else {
        return Err(CoreError::Internal(String::from(
            "cannot apply a command to an unpersisted event",
        )));
    };

    let action_name: &'static str = command.action_name();
    let before: StateSnapshot = event_snapshot(event);

    let (new_event, outcome, details): (Event, TransitionOutcome, String) = match command {
        Command::Register { user } => register(event, event_id, &user, context)?,
        Command::Cancel { user_id } => cancel(event, event_id, user_id, context)?,
        Command::UpdateEvent { patch } => update(event, &patch)?,
        Command::DeleteEvent => delete(event, event_id, context)?,
    };

    let after: StateSnapshot = if matches!(outcome, TransitionOutcome::EventDeleted { .. }) {
        absent_snapshot()
    } else {
        event_snapshot(&new_event)
    };

    let action: Action = Action::new(String::from(action_name), Some(details));
    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, before, after, Some(event_id));

    Ok(TransitionResult {
        new_event,
        audit_event,
        outcome,
    })
}

type Applied = (Event, TransitionOutcome, String);

fn register(
    event: &Event,
    event_id: i64,
    user: &User,
    context: &TransitionContext,
) -> Result<Applied, DomainError> {
    let user_id: i64 = user.id_or_default();

    // Checked in a fixed order so the reported reason is deterministic.
    if event.is_registered(user_id) {
        return Err(DomainError::AlreadyRegistered { event_id, user_id });
    }

    if !user.prefers(event.details.event_type) {
        return Err(DomainError::PreferenceMismatch {
            event_id,
            event_type: event.details.event_type,
        });
    }

    if !context.policy.allow_after_start && !event.is_upcoming(context.now) {
        return Err(DomainError::EventAlreadyStarted { event_id });
    }

    if event.capacity_summary().is_full {
        return Err(DomainError::EventFull {
            event_id,
            capacity: event.details.capacity,
        });
    }

    // Stored timestamps carry whole seconds only.
    let registered_at: OffsetDateTime = whole_second(context.now)?;
    let mut new_event: Event = event.clone();
    new_event
        .registrations
        .push(Registration::new(user_id, registered_at));

    let summary = new_event.capacity_summary();
    let details: String = format!(
        "User {user_id} registered for event {event_id} ({} of {} seats taken)",
        summary.registered, summary.capacity
    );

    Ok((
        new_event,
        TransitionOutcome::Registered {
            user_id,
            registered_at,
        },
        details,
    ))
}

fn cancel(
    event: &Event,
    event_id: i64,
    user_id: i64,
    context: &TransitionContext,
) -> Result<Applied, DomainError> {
    if !event.is_registered(user_id) {
        return Err(DomainError::NotRegistered { event_id, user_id });
    }

    if !event.is_upcoming(context.now) {
        return Err(DomainError::EventAlreadyStarted { event_id });
    }

    let mut new_event: Event = event.clone();
    new_event.registrations.retain(|r| r.user_id != user_id);

    let details: String = format!(
        "Registration of user {user_id} for event {event_id} cancelled ({} seats available)",
        new_event.capacity_summary().available_spots
    );

    Ok((new_event, TransitionOutcome::Cancelled { user_id }, details))
}

fn update(event: &Event, patch: &EventPatch) -> Result<Applied, DomainError> {
    let merged: EventDetails = patch.merge(&event.details);
    validate_event_details(&merged)?;
    validate_capacity_change(event, merged.capacity)?;

    let changed_fields: Vec<&'static str> = patch.changed_fields();
    let details: String = if changed_fields.is_empty() {
        String::from("No fields changed")
    } else {
        format!("Updated {}", changed_fields.join(", "))
    };

    let mut new_event: Event = event.clone();
    new_event.details = merged;

    Ok((
        new_event,
        TransitionOutcome::EventUpdated { changed_fields },
        details,
    ))
}

fn delete(event: &Event, event_id: i64, context: &TransitionContext) -> Result<Applied, DomainError> {
    if !event.is_upcoming(context.now) {
        return Err(DomainError::EventAlreadyStarted { event_id });
    }

    let affected_user_ids: Vec<i64> = event.registrant_ids();
    let details: String = format!(
        "Deleted event {event_id} and {} registration(s)",
        affected_user_ids.len()
    );

    Ok((
        event.clone(),
        TransitionOutcome::EventDeleted { affected_user_ids },
        details,
    ))
}
