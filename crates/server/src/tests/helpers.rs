// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router fixtures.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use evently::{Clock, FixedClock, RegistrationPolicy};
use evently_api::DEFAULT_RECENT_REGISTRATIONS;
use evently_persistence::Persistence;
use serde_json::{Value, json};
use std::sync::Arc;
use time::macros::datetime;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::live::LiveEventBroadcaster;
use crate::{AppState, build_router, prepare_store};

pub const ADMIN_LOGIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse";

/// A router over a fresh in-memory store with one administrator.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<FixedClock>,
}

/// Builds the app with the clock half an hour before the standard event.
pub fn create_test_app() -> TestApp {
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(datetime!(2024-06-01 23:00:00 UTC)));
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    prepare_store(
        &mut persistence,
        clock.as_ref(),
        Some(ADMIN_LOGIN),
        Some(ADMIN_PASSWORD),
    )
    .expect("Failed to prepare store");

    let shared_clock: Arc<dyn Clock> = clock.clone();
    let state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock: shared_clock,
        policy: RegistrationPolicy::default(),
        recent_limit: DEFAULT_RECENT_REGISTRATIONS,
        live_events: Arc::new(LiveEventBroadcaster::new()),
    };

    TestApp {
        router: build_router(state.clone()),
        state,
        clock,
    }
}

/// Sends one request and returns the status with the decoded JSON body.
///
/// Empty bodies decode as `Value::Null`.
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Logs in and returns the session token.
pub async fn login(app: &TestApp, login_name: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "login_name": login_name, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["session_token"].as_str().unwrap().to_string()
}

pub async fn admin_token(app: &TestApp) -> String {
    login(app, ADMIN_LOGIN, ADMIN_PASSWORD).await
}

/// Signs up through the public endpoint and logs in.
pub async fn sign_up(app: &TestApp, login_name: &str, preferences: &[&str]) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        None,
        Some(json!({
            "login_name": login_name,
            "display_name": format!("{login_name} display"),
            "password": "password123",
            "preferences": preferences,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "sign-up failed: {body}");
    login(app, login_name, "password123").await
}

pub fn event_body(event_type: &str, capacity: i64) -> Value {
    json!({
        "title": format!("{event_type} night"),
        "description": "Bring a friend",
        "location": "Hall B",
        "event_date": "2024-06-01",
        "event_time": "23:30",
        "event_type": event_type,
        "capacity": capacity,
    })
}

/// Creates an event as the administrator and returns its id.
pub async fn create_event(app: &TestApp, token: &str, event_type: &str, capacity: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/events",
        Some(token),
        Some(event_body(event_type, capacity)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["event"]["event_id"].as_i64().unwrap()
}
