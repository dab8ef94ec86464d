// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{
    create_event, create_persistence_with_admin, create_test_actor, create_test_cause,
    create_test_details, create_user_with_prefs,
};
use crate::Persistence;
use evently::{Command, RegistrationPolicy, TransitionContext, apply};
use evently_domain::{EventType, User};
use time::OffsetDateTime;
use time::macros::datetime;

fn register_at(persistence: &mut Persistence, event_id: i64, user: &User, now: OffsetDateTime) {
    let event = persistence.get_event(event_id).unwrap().unwrap();
    let result = apply(
        &event,
        Command::Register { user: user.clone() },
        &TransitionContext::new(now, RegistrationPolicy::default()),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_transition(&result).unwrap();
}

#[test]
fn test_empty_store_has_zero_counts() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let counts = persistence
        .dashboard_counts("2024-06-01T00:00:00Z", 5)
        .unwrap();

    assert_eq!(counts, crate::DashboardCounts::default());
}

#[test]
fn test_dashboard_counts() {
    let mut persistence = create_persistence_with_admin();
    let past = create_event(
        &mut persistence,
        create_test_details(EventType::Sports, "2024-05-01", "10:00", 5),
    );
    let workshop = create_event(
        &mut persistence,
        create_test_details(EventType::Workshop, "2024-08-01", "10:00", 5),
    );
    create_event(
        &mut persistence,
        create_test_details(EventType::Workshop, "2024-09-01", "10:00", 5),
    );
    let alice = create_user_with_prefs(
        &mut persistence,
        "alice",
        &[EventType::Sports, EventType::Workshop],
    );
    let bob = create_user_with_prefs(&mut persistence, "bob", &[EventType::Workshop]);

    register_at(&mut persistence, past, &alice, datetime!(2024-04-20 09:00:00 UTC));
    register_at(&mut persistence, workshop, &alice, datetime!(2024-06-01 08:00:00 UTC));
    register_at(&mut persistence, workshop, &bob, datetime!(2024-06-01 23:59:00 UTC));

    let counts = persistence
        .dashboard_counts("2024-06-02T00:00:00Z", 2)
        .unwrap();

    assert_eq!(counts.total_events, 3);
    assert_eq!(counts.total_users, 3);
    assert_eq!(counts.upcoming_events, 2);
    assert_eq!(
        counts.events_by_type,
        vec![(EventType::Sports, 1), (EventType::Workshop, 2)]
    );
    assert_eq!(
        counts.registrations_by_day,
        vec![
            (String::from("2024-04-20"), 1),
            (String::from("2024-06-01"), 2),
        ]
    );
    assert_eq!(counts.recent_registrations.len(), 2);
    assert_eq!(counts.recent_registrations[0].user_id, bob.id_or_default());
    assert_eq!(counts.recent_registrations[0].user_display_name, "bob");
    assert_eq!(counts.recent_registrations[1].user_id, alice.id_or_default());
    assert_eq!(counts.recent_registrations[1].event_id, workshop);
}
