// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod reporting_tests;
mod user_tests;

use crate::{PersistTransitionResult, Persistence};
use evently::{
    Command, RegistrationPolicy, TransitionContext, TransitionResult, apply, apply_create_event,
};
use evently_audit::{Actor, Cause};
use evently_domain::{EventDetails, EventTime, EventType, Role, User, parse_event_date};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_actor() -> Actor {
    Actor::with_user(String::from("ADMIN"), String::from("admin"), 1)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// Half an hour before `create_test_details` events start.
pub fn before_start() -> OffsetDateTime {
    datetime!(2024-06-01 23:00:00 UTC)
}

pub fn create_test_details(
    event_type: EventType,
    date: &str,
    time: &str,
    capacity: u32,
) -> EventDetails {
    EventDetails {
        title: format!("{event_type} on {date}"),
        description: String::from("Test event"),
        location: String::from("Main Hall"),
        event_date: parse_event_date(date).unwrap(),
        event_time: EventTime::from_str(time).unwrap(),
        event_type,
        capacity,
    }
}

/// Creates an admin (id 1) so events have a valid creator.
pub fn create_persistence_with_admin() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = persistence
        .create_user(
            "admin",
            "Administrator",
            "admin-password",
            Role::Admin,
            &BTreeSet::new(),
        )
        .unwrap();
    assert_eq!(admin_id, 1);
    persistence
}

pub fn create_user_with_prefs(
    persistence: &mut Persistence,
    login: &str,
    prefs: &[EventType],
) -> User {
    let preferences: BTreeSet<EventType> = prefs.iter().copied().collect();
    let user_id = persistence
        .create_user(login, login, "password123", Role::User, &preferences)
        .unwrap();
    persistence.get_user_by_id(user_id).unwrap().unwrap()
}

pub fn create_event(persistence: &mut Persistence, details: EventDetails) -> i64 {
    let result = apply_create_event(details, 1, create_test_actor(), create_test_cause()).unwrap();
    persistence.persist_transition(&result).unwrap().event_id
}

pub fn apply_at(
    persistence: &mut Persistence,
    event_id: i64,
    command: Command,
    now: OffsetDateTime,
) -> TransitionResult {
    let event = persistence.get_event(event_id).unwrap().unwrap();
    apply(
        &event,
        command,
        &TransitionContext::new(now, RegistrationPolicy::default()),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap()
}

pub fn register(
    persistence: &mut Persistence,
    event_id: i64,
    user: &User,
) -> PersistTransitionResult {
    let result = apply_at(
        persistence,
        event_id,
        Command::Register { user: user.clone() },
        before_start(),
    );
    persistence.persist_transition(&result).unwrap()
}
