// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use evently::{RegistrationPolicy, TransitionContext};
use evently_audit::Cause;
use evently_domain::Role;
use evently_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    AuthenticatedActor, CreateEventRequest, CreateUserRequest, EventInfo, bootstrap_admin,
    create_event, create_user,
};

pub const ADMIN_LOGIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse";

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// Half an hour before the standard test event starts.
pub fn before_start() -> OffsetDateTime {
    datetime!(2024-06-01 23:00:00 UTC)
}

/// Just after midnight, once the standard test event has started.
pub fn after_start() -> OffsetDateTime {
    datetime!(2024-06-02 00:00:00 UTC)
}

pub fn context_at(now: OffsetDateTime) -> TransitionContext {
    TransitionContext::new(now, RegistrationPolicy::default())
}

/// Creates a store with one bootstrapped administrator and returns its actor.
pub fn setup_test_persistence() -> (Persistence, AuthenticatedActor) {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let admin_id: i64 = bootstrap_admin(&mut persistence, ADMIN_LOGIN, ADMIN_PASSWORD)
        .expect("Failed to bootstrap admin")
        .expect("Admin should be created on an empty store");
    let admin: AuthenticatedActor =
        AuthenticatedActor::new(ADMIN_LOGIN.to_uppercase(), admin_id, Role::Admin);
    (persistence, admin)
}

/// Signs up a regular user with the given preferences.
pub fn sign_up(
    persistence: &mut Persistence,
    login_name: &str,
    preferences: &[&str],
) -> AuthenticatedActor {
    let request = CreateUserRequest {
        login_name: login_name.to_string(),
        display_name: format!("{login_name} display"),
        password: String::from("password123"),
        role: None,
        preferences: preferences.iter().map(ToString::to_string).collect(),
    };
    let response = create_user(persistence, &request, None, create_test_cause())
        .expect("Failed to sign up user");
    AuthenticatedActor::new(response.login_name, response.user_id, Role::User)
}

/// A request for a late-evening event on 2024-06-01.
pub fn event_request(event_type: &str, capacity: i64) -> CreateEventRequest {
    event_request_at(event_type, "2024-06-01", "23:30", capacity)
}

pub fn event_request_at(
    event_type: &str,
    event_date: &str,
    event_time: &str,
    capacity: i64,
) -> CreateEventRequest {
    CreateEventRequest {
        title: format!("{event_type} on {event_date}"),
        description: String::from("Bring a laptop"),
        location: String::from("Room 101"),
        event_date: event_date.to_string(),
        event_time: event_time.to_string(),
        event_type: event_type.to_string(),
        capacity,
    }
}

pub fn create_test_event(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    request: &CreateEventRequest,
) -> EventInfo {
    create_event(persistence, request, admin, create_test_cause())
        .expect("Failed to create event")
        .event
}
