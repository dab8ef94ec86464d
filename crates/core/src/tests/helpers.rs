// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{RegistrationPolicy, TransitionContext};
use evently_audit::{Actor, Cause};
use evently_domain::{
    Event, EventDetails, EventTime, EventType, Registration, Role, User, parse_event_date,
};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::OffsetDateTime;
use time::macros::datetime;

pub const EVENT_ID: i64 = 7;

pub fn create_test_actor() -> Actor {
    Actor::with_user(String::from("ADMIN"), String::from("admin"), 1)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

/// 2024-06-01 23:00 UTC, half an hour before the test event starts.
pub fn before_start() -> OffsetDateTime {
    datetime!(2024-06-01 23:00:00 UTC)
}

/// 2024-06-02 00:00 UTC, after the test event started.
pub fn after_start() -> OffsetDateTime {
    datetime!(2024-06-02 00:00:00 UTC)
}

pub fn context_at(now: OffsetDateTime) -> TransitionContext {
    TransitionContext::new(now, RegistrationPolicy::default())
}

pub fn create_test_details(event_type: EventType, capacity: u32) -> EventDetails {
    EventDetails {
        title: String::from("Late Night Hackathon"),
        description: String::from("Bring a laptop"),
        location: String::from("Lab 3"),
        event_date: parse_event_date("2024-06-01").unwrap(),
        event_time: EventTime::from_str("23:30").unwrap(),
        event_type,
        capacity,
    }
}

/// A persisted Workshop event on 2024-06-01 at 23:30 with the given registrants.
pub fn create_test_event(capacity: u32, registrants: &[i64]) -> Event {
    let registrations: Vec<Registration> = registrants
        .iter()
        .map(|&user_id| Registration::new(user_id, datetime!(2024-05-01 09:00:00 UTC)))
        .collect();
    Event::with_id(
        EVENT_ID,
        create_test_details(EventType::Workshop, capacity),
        1,
        registrations,
    )
}

pub fn create_test_user(user_id: i64, preferences: &[EventType]) -> User {
    User::with_id(
        user_id,
        &format!("user{user_id}"),
        format!("User {user_id}"),
        Role::User,
        preferences.iter().copied().collect::<BTreeSet<EventType>>(),
        Vec::new(),
    )
}
