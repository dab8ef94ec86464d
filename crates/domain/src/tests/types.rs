// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, Event, EventDetails, EventPatch, EventTime, EventType, Registration, Role, User,
    parse_event_date,
};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::macros::datetime;

fn create_test_details(capacity: u32) -> EventDetails {
    EventDetails {
        title: String::from("Rust Meetup"),
        description: String::from("Monthly meetup"),
        location: String::from("Room 101"),
        event_date: parse_event_date("2024-06-01").unwrap(),
        event_time: EventTime::from_str("23:30").unwrap(),
        event_type: EventType::Workshop,
        capacity,
    }
}

#[test]
fn test_event_type_round_trips_through_its_name() {
    for event_type in EventType::ALL {
        assert_eq!(EventType::from_str(event_type.as_str()).unwrap(), event_type);
    }
}

#[test]
fn test_event_type_is_case_sensitive() {
    assert!(matches!(
        EventType::from_str("sports"),
        Err(DomainError::InvalidEventType(_))
    ));
}

#[test]
fn test_role_parsing() {
    assert_eq!(Role::from_str("user").unwrap(), Role::User);
    assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    assert!(Role::from_str("Admin").is_err());
    assert_eq!(Role::default(), Role::User);
}

#[test]
fn test_event_time_accepts_24_hour_values() {
    assert_eq!(EventTime::from_str("00:00").unwrap().to_string(), "00:00");
    assert_eq!(EventTime::from_str("09:05").unwrap().to_string(), "09:05");
    assert_eq!(EventTime::from_str("23:59").unwrap().to_string(), "23:59");
}

#[test]
fn test_event_time_rejects_malformed_values() {
    for value in ["24:00", "12:60", "9:30", "09:5", "0930", "09:30:00", "ab:cd", ""] {
        assert!(
            matches!(
                EventTime::from_str(value),
                Err(DomainError::InvalidEventTime(_))
            ),
            "{value} should be rejected"
        );
    }
}

#[test]
fn test_event_starts_at_resolved_instant() {
    let event: Event = Event::new(create_test_details(3), 1);
    assert_eq!(event.starts_at(), datetime!(2024-06-01 23:30:00 UTC));
    assert!(event.is_upcoming(datetime!(2024-06-01 23:00:00 UTC)));
    assert!(!event.is_upcoming(datetime!(2024-06-02 00:00:00 UTC)));
}

#[test]
fn test_event_capacity_summary_tracks_registrations() {
    let mut event: Event = Event::with_id(5, create_test_details(3), 1, Vec::new());
    for user_id in 10..13 {
        event
            .registrations
            .push(Registration::new(user_id, datetime!(2024-05-01 10:00:00 UTC)));
    }

    let summary = event.capacity_summary();
    assert!(summary.is_full);
    assert_eq!(summary.available_spots, 0);

    event.registrations.retain(|r| r.user_id != 11);
    let summary = event.capacity_summary();
    assert!(!summary.is_full);
    assert_eq!(summary.available_spots, 1);
}

#[test]
fn test_event_registration_lookup() {
    let registered_at = datetime!(2024-05-01 10:00:00 UTC);
    let event: Event = Event::with_id(
        5,
        create_test_details(3),
        1,
        vec![Registration::new(42, registered_at)],
    );

    assert!(event.is_registered(42));
    assert!(!event.is_registered(43));
    assert_eq!(
        event.registration_for(42).map(|r| r.registered_at),
        Some(registered_at)
    );
    assert_eq!(event.registrant_ids(), vec![42]);
}

#[test]
fn test_patch_merges_only_supplied_fields() {
    let current: EventDetails = create_test_details(3);
    let patch: EventPatch = EventPatch {
        title: Some(String::from("Renamed")),
        capacity: Some(10),
        ..EventPatch::default()
    };

    let merged: EventDetails = patch.merge(&current);
    assert_eq!(merged.title, "Renamed");
    assert_eq!(merged.capacity, 10);
    assert_eq!(merged.description, current.description);
    assert_eq!(merged.event_time, current.event_time);
    assert_eq!(patch.changed_fields(), vec!["title", "capacity"]);
}

#[test]
fn test_user_login_name_normalized_to_uppercase() {
    let user: User = User::new("alice", String::from("Alice"), Role::User, BTreeSet::new());
    assert_eq!(user.login_name, "ALICE");
    assert!(user.user_id().is_none());
}

#[test]
fn test_user_preferences() {
    let preferences: BTreeSet<EventType> = [EventType::Academic, EventType::Sports]
        .into_iter()
        .collect();
    let user: User = User::with_id(
        1,
        "bob",
        String::from("Bob"),
        Role::Admin,
        preferences,
        Vec::new(),
    );

    assert!(user.prefers(EventType::Sports));
    assert!(!user.prefers(EventType::Social));
    assert!(user.is_admin());
}
