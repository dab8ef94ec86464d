// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, Event, EventDetails, EventTime, EventType, MAX_CAPACITY, Registration,
    parse_capacity, parse_event_date, parse_preferences, validate_capacity_change, validate_event_details,
    validate_user_fields,
};
use std::str::FromStr;
use time::macros::datetime;

fn create_test_details() -> EventDetails {
    EventDetails {
        title: String::from("Chess Club"),
        description: String::from("Weekly games"),
        location: String::from("Library"),
        event_date: parse_event_date("2030-01-15").unwrap(),
        event_time: EventTime::from_str("18:00").unwrap(),
        event_type: EventType::Social,
        capacity: 3,
    }
}

#[test]
fn test_valid_event_details_pass() {
    assert!(validate_event_details(&create_test_details()).is_ok());
}

#[test]
fn test_blank_title_rejected() {
    let mut details: EventDetails = create_test_details();
    details.title = String::from("   ");
    assert!(matches!(
        validate_event_details(&details),
        Err(DomainError::InvalidTitle(_))
    ));
}

#[test]
fn test_empty_description_rejected() {
    let mut details: EventDetails = create_test_details();
    details.description = String::new();
    assert!(matches!(
        validate_event_details(&details),
        Err(DomainError::InvalidDescription(_))
    ));
}

#[test]
fn test_empty_location_rejected() {
    let mut details: EventDetails = create_test_details();
    details.location = String::new();
    assert!(matches!(
        validate_event_details(&details),
        Err(DomainError::InvalidLocation(_))
    ));
}

#[test]
fn test_zero_capacity_rejected() {
    let mut details: EventDetails = create_test_details();
    details.capacity = 0;
    assert_eq!(
        validate_event_details(&details),
        Err(DomainError::InvalidCapacity { capacity: 0 })
    );
}

#[test]
fn test_parse_capacity_bounds() {
    assert_eq!(parse_capacity(1).unwrap(), 1);
    assert!(parse_capacity(0).is_err());
    assert!(parse_capacity(-4).is_err());
    assert!(parse_capacity(i64::from(u32::MAX) + 1).is_err());
}

#[test]
fn test_capacity_is_bounded_by_the_store_column() {
    assert_eq!(parse_capacity(i64::from(i32::MAX)).unwrap(), MAX_CAPACITY);
    assert_eq!(
        parse_capacity(3_000_000_000),
        Err(DomainError::InvalidCapacity {
            capacity: 3_000_000_000
        })
    );

    let mut details: EventDetails = create_test_details();
    details.capacity = MAX_CAPACITY + 1;
    assert!(matches!(
        validate_event_details(&details),
        Err(DomainError::InvalidCapacity { .. })
    ));
}

#[test]
fn test_capacity_change_below_registrations_rejected() {
    let registered_at = datetime!(2029-12-01 09:00:00 UTC);
    let event: Event = Event::with_id(
        9,
        create_test_details(),
        1,
        vec![
            Registration::new(1, registered_at),
            Registration::new(2, registered_at),
        ],
    );

    assert_eq!(
        validate_capacity_change(&event, 1),
        Err(DomainError::CapacityInvariantViolated {
            event_id: 9,
            requested: 1,
            registered: 2,
        })
    );
    assert!(validate_capacity_change(&event, 2).is_ok());
    assert!(validate_capacity_change(&event, 50).is_ok());
}

#[test]
fn test_parse_preferences_collapses_duplicates() {
    let preferences = parse_preferences(&["Sports", "Academic", "Sports"]).unwrap();
    assert_eq!(preferences.len(), 2);
    assert!(preferences.contains(&EventType::Sports));
}

#[test]
fn test_parse_preferences_rejects_unknown_type() {
    assert_eq!(
        parse_preferences(&["Sports", "Knitting"]),
        Err(DomainError::InvalidEventType(String::from("Knitting")))
    );
}

#[test]
fn test_parse_preferences_accepts_empty_list() {
    let empty: [&str; 0] = [];
    assert!(parse_preferences(&empty).unwrap().is_empty());
}

#[test]
fn test_user_fields_validation() {
    assert!(validate_user_fields("alice", "Alice", "correct-horse").is_ok());
    assert!(matches!(
        validate_user_fields("", "Alice", "correct-horse"),
        Err(DomainError::InvalidLoginName(_))
    ));
    assert!(matches!(
        validate_user_fields("al ice", "Alice", "correct-horse"),
        Err(DomainError::InvalidLoginName(_))
    ));
    assert!(matches!(
        validate_user_fields("alice", " ", "correct-horse"),
        Err(DomainError::InvalidDisplayName(_))
    ));
    assert!(matches!(
        validate_user_fields("alice", "Alice", "short"),
        Err(DomainError::InvalidPassword(_))
    ));
}
