// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_persistence_with_admin, create_test_cause};
use crate::PersistenceError;
use evently_audit::{Action, Actor, AuditEvent, StateSnapshot};
use evently_domain::{EventType, Role};
use std::collections::BTreeSet;

#[test]
fn test_login_names_are_case_insensitive() {
    let mut persistence = create_persistence_with_admin();
    persistence
        .create_user("Alice", "Alice", "password123", Role::User, &BTreeSet::new())
        .unwrap();

    let user = persistence.get_user_by_login("aLiCe").unwrap().unwrap();
    assert_eq!(user.login_name, "ALICE");

    let err = persistence
        .create_user("ALICE", "Other", "password123", Role::User, &BTreeSet::new())
        .unwrap_err();
    assert_eq!(err, PersistenceError::DuplicateLoginName(String::from("ALICE")));
}

#[test]
fn test_password_is_hashed_and_verified() {
    let mut persistence = create_persistence_with_admin();
    persistence
        .create_user("bob", "Bob", "correct-horse", Role::User, &BTreeSet::new())
        .unwrap();

    assert!(
        persistence
            .verify_credentials("bob", "correct-horse")
            .unwrap()
            .is_some()
    );
    assert!(
        persistence
            .verify_credentials("bob", "wrong-horse")
            .unwrap()
            .is_none()
    );
    assert!(
        persistence
            .verify_credentials("nobody", "correct-horse")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_preferences_round_trip_and_update() {
    let mut persistence = create_persistence_with_admin();
    let prefs: BTreeSet<EventType> = [EventType::Sports, EventType::Academic]
        .into_iter()
        .collect();
    let user_id = persistence
        .create_user("carol", "Carol", "password123", Role::User, &prefs)
        .unwrap();

    let carol = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert_eq!(carol.preferences, prefs);
    assert_eq!(carol.role, Role::User);

    let updated: BTreeSet<EventType> = [EventType::Conference].into_iter().collect();
    persistence.update_preferences(user_id, &updated).unwrap();

    let carol = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert_eq!(carol.preferences, updated);
}

#[test]
fn test_update_preferences_for_missing_user() {
    let mut persistence = create_persistence_with_admin();
    assert_eq!(
        persistence
            .update_preferences(99, &BTreeSet::new())
            .unwrap_err(),
        PersistenceError::UserNotFound(99)
    );
}

#[test]
fn test_count_admins() {
    let mut persistence = create_persistence_with_admin();
    persistence
        .create_user("dave", "Dave", "password123", Role::User, &BTreeSet::new())
        .unwrap();
    assert_eq!(persistence.count_admins().unwrap(), 1);
}

#[test]
fn test_session_lifecycle() {
    let mut persistence = create_persistence_with_admin();

    let session_id = persistence
        .create_session("token-abc", 1, "2024-07-01T00:00:00Z")
        .unwrap();
    let session = persistence
        .get_session_by_token("token-abc")
        .unwrap()
        .unwrap();
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.user_id, 1);
    assert_eq!(session.expires_at, "2024-07-01T00:00:00Z");

    persistence.update_session_activity(session_id).unwrap();
    persistence.delete_session("token-abc").unwrap();
    assert!(
        persistence
            .get_session_by_token("token-abc")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_delete_expired_sessions() {
    let mut persistence = create_persistence_with_admin();
    persistence
        .create_session("old", 1, "2024-05-31T23:59:59Z")
        .unwrap();
    persistence
        .create_session("new", 1, "2024-06-30T00:00:00Z")
        .unwrap();

    let removed = persistence
        .delete_expired_sessions("2024-06-01T00:00:00Z")
        .unwrap();

    assert_eq!(removed, 1);
    assert!(persistence.get_session_by_token("new").unwrap().is_some());
}

fn account_audit(user_id: i64, action: &str) -> AuditEvent {
    AuditEvent::new(
        Actor::with_user(String::from("ADMIN"), String::from("admin"), 1),
        create_test_cause(),
        Action::new(action.to_string(), None),
        StateSnapshot::new(String::from("before")),
        StateSnapshot::new(format!("user_id={user_id}")),
        None,
    )
}

#[test]
fn test_user_and_audit_record_are_written_together() {
    let mut persistence = create_persistence_with_admin();

    let persisted = persistence
        .create_user_with_audit(
            "erin",
            "Erin",
            "password123",
            Role::User,
            &BTreeSet::new(),
            |user_id| account_audit(user_id, "CreateUser"),
        )
        .unwrap();

    assert!(persistence.get_user_by_id(persisted.user_id).unwrap().is_some());
    let audit = persistence.get_audit_event(persisted.audit_event_id).unwrap();
    assert_eq!(audit.action.name, "CreateUser");
    assert_eq!(audit.after.data, format!("user_id={}", persisted.user_id));

    let prefs: BTreeSet<EventType> = [EventType::Social].into_iter().collect();
    let audit_event_id = persistence
        .update_preferences_with_audit(
            persisted.user_id,
            &prefs,
            &account_audit(persisted.user_id, "UpdatePreferences"),
        )
        .unwrap();
    assert_eq!(audit_event_id, persisted.audit_event_id + 1);
    let erin = persistence.get_user_by_id(persisted.user_id).unwrap().unwrap();
    assert_eq!(erin.preferences, prefs);
}

#[test]
fn test_rejected_account_writes_leave_no_audit_record() {
    let mut persistence = create_persistence_with_admin();
    let first = persistence
        .create_user_with_audit(
            "erin",
            "Erin",
            "password123",
            Role::User,
            &BTreeSet::new(),
            |user_id| account_audit(user_id, "CreateUser"),
        )
        .unwrap();

    let duplicate = persistence.create_user_with_audit(
        "ERIN",
        "Other Erin",
        "password123",
        Role::User,
        &BTreeSet::new(),
        |user_id| account_audit(user_id, "CreateUser"),
    );
    assert_eq!(
        duplicate.unwrap_err(),
        PersistenceError::DuplicateLoginName(String::from("ERIN"))
    );

    let missing = persistence.update_preferences_with_audit(
        99,
        &BTreeSet::new(),
        &account_audit(99, "UpdatePreferences"),
    );
    assert_eq!(missing.unwrap_err(), PersistenceError::UserNotFound(99));
    assert!(
        persistence
            .get_audit_event(first.audit_event_id + 1)
            .is_err()
    );

    let next = persistence
        .update_preferences_with_audit(
            first.user_id,
            &BTreeSet::new(),
            &account_audit(first.user_id, "UpdatePreferences"),
        )
        .unwrap();
    assert_eq!(next, first.audit_event_id + 1);
}
