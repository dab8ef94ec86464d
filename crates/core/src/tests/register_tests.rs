// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    EVENT_ID, after_start, before_start, context_at, create_test_actor, create_test_cause,
    create_test_event, create_test_user,
};
use crate::{
    Command, CoreError, RegistrationPolicy, TransitionContext, TransitionOutcome,
    TransitionResult, apply,
};
use evently_domain::{DomainError, Event, EventType};
use time::macros::datetime;

fn register(
    event: &Event,
    user_id: i64,
    prefs: &[EventType],
    ctx: &TransitionContext,
) -> Result<TransitionResult, CoreError> {
    apply(
        event,
        Command::Register {
            user: create_test_user(user_id, prefs),
        },
        ctx,
        create_test_actor(),
        create_test_cause(),
    )
}

#[test]
fn test_register_adds_registration_and_reports_index_write() {
    let event: Event = create_test_event(3, &[]);

    let result: TransitionResult =
        register(&event, 42, &[EventType::Workshop], &context_at(before_start())).unwrap();

    assert!(result.new_event.is_registered(42));
    assert_eq!(result.new_event.registrations.len(), 1);
    assert_eq!(
        result.outcome,
        TransitionOutcome::Registered {
            user_id: 42,
            registered_at: before_start(),
        }
    );
    // Input snapshot is untouched.
    assert!(event.registrations.is_empty());
}

#[test]
fn test_registration_time_is_kept_to_the_second() {
    let event: Event = create_test_event(3, &[]);
    let now = datetime!(2024-06-01 23:00:00.734 UTC);

    let result: TransitionResult =
        register(&event, 42, &[EventType::Workshop], &context_at(now)).unwrap();

    assert_eq!(
        result.new_event.registrations[0].registered_at,
        before_start()
    );
    assert_eq!(
        result.outcome,
        TransitionOutcome::Registered {
            user_id: 42,
            registered_at: before_start(),
        }
    );
}

#[test]
fn test_register_emits_audit_event() {
    let event: Event = create_test_event(3, &[]);

    let result: TransitionResult =
        register(&event, 42, &[EventType::Workshop], &context_at(before_start())).unwrap();

    assert_eq!(result.audit_event.action.name, "Register");
    assert_eq!(result.audit_event.subject_event_id, Some(EVENT_ID));
    assert!(result.audit_event.before.data.contains("registrations=[]"));
    assert!(result.audit_event.after.data.contains("registrations=[42]"));
}

#[test]
fn test_register_last_seat_fills_event() {
    let event: Event = create_test_event(3, &[1, 2]);

    let result: TransitionResult =
        register(&event, 3, &[EventType::Workshop], &context_at(before_start())).unwrap();

    let summary = result.new_event.capacity_summary();
    assert!(summary.is_full);
    assert_eq!(summary.available_spots, 0);
}

#[test]
fn test_register_full_event_is_rejected() {
    let event: Event = create_test_event(3, &[1, 2, 3]);

    let err: CoreError =
        register(&event, 4, &[EventType::Workshop], &context_at(before_start())).unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::EventFull {
            event_id: EVENT_ID,
            capacity: 3,
        })
    );
}

#[test]
fn test_register_twice_is_rejected() {
    let event: Event = create_test_event(3, &[42]);

    let err: CoreError =
        register(&event, 42, &[EventType::Workshop], &context_at(before_start())).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::AlreadyRegistered { user_id: 42, .. })
    ));
}

#[test]
fn test_register_outside_preferences_is_rejected() {
    let event: Event = create_test_event(3, &[]);

    let err: CoreError = register(
        &event,
        42,
        &[EventType::Sports, EventType::Social],
        &context_at(before_start()),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::PreferenceMismatch {
            event_id: EVENT_ID,
            event_type: EventType::Workshop,
        })
    );
}

#[test]
fn test_register_with_no_preferences_is_rejected() {
    let event: Event = create_test_event(3, &[]);

    let err: CoreError = register(&event, 42, &[], &context_at(before_start())).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::PreferenceMismatch { .. })
    ));
}

#[test]
fn test_register_after_start_is_rejected_by_default() {
    let event: Event = create_test_event(3, &[]);

    let err: CoreError =
        register(&event, 42, &[EventType::Workshop], &context_at(after_start())).unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::EventAlreadyStarted { event_id: EVENT_ID })
    );
}

#[test]
fn test_register_after_start_allowed_by_policy() {
    let event: Event = create_test_event(3, &[]);
    let ctx = TransitionContext::new(after_start(), RegistrationPolicy::new(true));

    let result: TransitionResult = register(&event, 42, &[EventType::Workshop], &ctx).unwrap();

    assert!(result.new_event.is_registered(42));
}

#[test]
fn test_already_registered_reported_before_full() {
    let event: Event = create_test_event(2, &[1, 42]);

    let err: CoreError =
        register(&event, 42, &[EventType::Workshop], &context_at(before_start())).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::AlreadyRegistered { .. })
    ));
}

#[test]
fn test_preference_mismatch_reported_before_started_and_full() {
    let event: Event = create_test_event(1, &[1]);

    let err: CoreError =
        register(&event, 42, &[EventType::Sports], &context_at(after_start())).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::PreferenceMismatch { .. })
    ));
}

#[test]
fn test_started_reported_before_full() {
    let event: Event = create_test_event(1, &[1]);

    let err: CoreError =
        register(&event, 42, &[EventType::Workshop], &context_at(after_start())).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::EventAlreadyStarted { .. })
    ));
}

#[test]
fn test_unpersisted_event_is_an_internal_error() {
    let persisted: Event = create_test_event(3, &[]);
    let event: Event = Event::new(persisted.details, 1);

    let err: CoreError =
        register(&event, 42, &[EventType::Workshop], &context_at(before_start())).unwrap_err();

    assert!(matches!(err, CoreError::Internal(_)));
}
