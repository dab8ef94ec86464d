// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard statistics and index maintenance.

use time::macros::datetime;

use crate::{ApiError, dashboard, reconcile_user_index, register_for_event};

use super::helpers::{
    before_start, context_at, create_test_cause, create_test_event, event_request,
    event_request_at, setup_test_persistence, sign_up,
};

#[test]
fn test_dashboard_on_empty_store() {
    let (mut persistence, admin) = setup_test_persistence();

    let response = dashboard(&mut persistence, &admin, before_start(), None).unwrap();

    assert_eq!(response.total_events, 0);
    // The bootstrapped administrator.
    assert_eq!(response.total_users, 1);
    assert_eq!(response.upcoming_events, 0);
    assert!(response.events_by_type.is_empty());
    assert!(response.registrations_by_day.is_empty());
    assert!(response.recent_registrations.is_empty());
}

#[test]
fn test_dashboard_requires_admin() {
    let (mut persistence, _admin) = setup_test_persistence();
    let user = sign_up(&mut persistence, "alice", &[]);

    let result = dashboard(&mut persistence, &user, before_start(), None);
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_dashboard_counts_and_groupings() {
    let (mut persistence, admin) = setup_test_persistence();
    let workshop = create_test_event(&mut persistence, &admin, &event_request("Workshop", 10));
    create_test_event(
        &mut persistence,
        &admin,
        &event_request_at("Sports", "2024-05-01", "10:00", 10),
    );

    let logins = ["u1", "u2", "u3", "u4", "u5", "u6"];
    for (i, login) in logins.iter().enumerate() {
        let user = sign_up(&mut persistence, login, &["Workshop"]);
        let now = if i < 2 {
            datetime!(2024-05-30 09:00:00 UTC)
        } else {
            datetime!(2024-05-31 09:00:00 UTC)
        };
        register_for_event(
            &mut persistence,
            workshop.event_id,
            &user,
            &context_at(now),
            create_test_cause(),
        )
        .unwrap();
    }

    let response = dashboard(&mut persistence, &admin, before_start(), None).unwrap();

    assert_eq!(response.total_events, 2);
    assert_eq!(response.total_users, 7);
    assert_eq!(response.upcoming_events, 1);

    let by_type: Vec<(&str, u64)> = response
        .events_by_type
        .iter()
        .map(|entry| (entry.event_type.as_str(), entry.count))
        .collect();
    assert_eq!(by_type, vec![("Sports", 1), ("Workshop", 1)]);

    let by_day: Vec<(&str, u64)> = response
        .registrations_by_day
        .iter()
        .map(|entry| (entry.day.as_str(), entry.count))
        .collect();
    assert_eq!(by_day, vec![("2024-05-30", 2), ("2024-05-31", 4)]);

    // Default limit.
    assert_eq!(response.recent_registrations.len(), 5);
    assert!(
        response
            .recent_registrations
            .iter()
            .all(|entry| entry.event_id == workshop.event_id)
    );
    assert_eq!(
        response.recent_registrations[0].registered_at,
        "2024-05-31T09:00:00Z"
    );

    let limited = dashboard(&mut persistence, &admin, before_start(), Some(2)).unwrap();
    assert_eq!(limited.recent_registrations.len(), 2);
}

#[test]
fn test_reconcile_on_consistent_store_changes_nothing() {
    let (mut persistence, admin) = setup_test_persistence();
    let event = create_test_event(&mut persistence, &admin, &event_request("Workshop", 3));
    let alice = sign_up(&mut persistence, "alice", &["Workshop"]);
    register_for_event(
        &mut persistence,
        event.event_id,
        &alice,
        &context_at(before_start()),
        create_test_cause(),
    )
    .unwrap();

    let response = reconcile_user_index(&mut persistence, &admin, create_test_cause()).unwrap();
    assert_eq!(response.entries_added, 0);
    assert_eq!(response.entries_removed, 0);
}

#[test]
fn test_reconcile_requires_admin() {
    let (mut persistence, _admin) = setup_test_persistence();
    let user = sign_up(&mut persistence, "alice", &[]);

    let result = reconcile_user_index(&mut persistence, &user, create_test_cause());
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}
