// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for Evently.
//!
//! Handlers here are synchronous and transport-agnostic: they take the
//! persistence layer, the authenticated actor, and plain request values,
//! and return response DTOs or an `ApiError`. The HTTP server wraps them.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod reporting;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    admin_cancel_registration, bootstrap_admin, cancel_registration, create_event, create_user,
    delete_event, event_to_info, get_event, list_registered_events, list_upcoming_events, login,
    logout, reconcile_user_index, register_for_event, update_event, update_preferences, whoami,
};
pub use reporting::{DEFAULT_RECENT_REGISTRATIONS, dashboard};
pub use request_response::{
    CreateEventRequest, CreateEventResponse, CreateUserRequest, CreateUserResponse,
    DEFAULT_PAGE_SIZE, DailyRegistrationCount, DashboardResponse, DeleteEventResponse,
    EventInfo, EventTypeCount, ListEventsRequest, ListEventsResponse,
    ListRegisteredEventsRequest, ListRegisteredEventsResponse, LoginRequest, LoginResponse,
    MAX_PAGE_SIZE, RecentRegistrationInfo, ReconcileResponse, RegisteredEventInfo,
    RegistrationResponse, UpdateEventRequest, UpdateEventResponse, UpdatePreferencesRequest,
    UpdatePreferencesResponse, WhoAmIResponse,
};
