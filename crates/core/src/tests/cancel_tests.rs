// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    EVENT_ID, after_start, before_start, context_at, create_test_actor, create_test_cause,
    create_test_event,
};
use crate::{Command, CoreError, TransitionOutcome, TransitionResult, apply};
use evently_domain::{DomainError, Event};

fn cancel(
    event: &Event,
    user_id: i64,
    now: time::OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    apply(
        event,
        Command::Cancel { user_id },
        &context_at(now),
        create_test_actor(),
        create_test_cause(),
    )
}

#[test]
fn test_cancel_releases_seat() {
    let event: Event = create_test_event(3, &[1, 2, 3]);
    assert!(event.capacity_summary().is_full);

    let result: TransitionResult = cancel(&event, 2, before_start()).unwrap();

    assert!(!result.new_event.is_registered(2));
    assert_eq!(result.new_event.registrant_ids(), vec![1, 3]);
    let summary = result.new_event.capacity_summary();
    assert!(!summary.is_full);
    assert_eq!(summary.available_spots, 1);
    assert_eq!(result.outcome, TransitionOutcome::Cancelled { user_id: 2 });
    assert_eq!(result.audit_event.action.name, "CancelRegistration");
}

#[test]
fn test_cancel_without_registration_is_rejected() {
    let event: Event = create_test_event(3, &[1]);

    let err: CoreError = cancel(&event, 2, before_start()).unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::NotRegistered {
            event_id: EVENT_ID,
            user_id: 2,
        })
    );
}

#[test]
fn test_cancel_after_start_is_rejected() {
    let event: Event = create_test_event(3, &[1]);

    let err: CoreError = cancel(&event, 1, after_start()).unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::EventAlreadyStarted { event_id: EVENT_ID })
    );
}

#[test]
fn test_not_registered_reported_before_started() {
    let event: Event = create_test_event(3, &[1]);

    let err: CoreError = cancel(&event, 2, after_start()).unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::NotRegistered { .. })
    ));
}
