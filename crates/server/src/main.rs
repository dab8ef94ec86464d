// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod live;
mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use evently::{Clock, RegistrationPolicy, SystemClock, TransitionContext};
use evently_api::{
    ApiError, AuthenticatedActor, CreateEventRequest, CreateEventResponse, CreateUserRequest,
    CreateUserResponse, DEFAULT_RECENT_REGISTRATIONS, DashboardResponse, DeleteEventResponse,
    EventInfo, ListEventsRequest, ListEventsResponse, ListRegisteredEventsRequest,
    ListRegisteredEventsResponse, LoginRequest, LoginResponse, ReconcileResponse,
    RegistrationResponse, UpdateEventRequest, UpdateEventResponse, UpdatePreferencesRequest,
    UpdatePreferencesResponse, WhoAmIResponse,
};
use evently_audit::Cause;
use evently_persistence::{Persistence, PersistenceError, ReconcileReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use crate::session::{BearerToken, SessionUser};

/// Evently Server - HTTP server for the Evently registration backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "EVENTLY_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "EVENTLY_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "EVENTLY_PORT", default_value_t = 3000)]
    port: u16,

    /// Number of recent registrations shown on the dashboard
    #[arg(long, env = "EVENTLY_RECENT_LIMIT", default_value_t = DEFAULT_RECENT_REGISTRATIONS)]
    recent_limit: u32,

    /// Accept registrations for events that have already started
    #[arg(long, env = "EVENTLY_ALLOW_REGISTRATION_AFTER_START")]
    allow_registration_after_start: bool,

    /// Login name of the administrator created on an empty database
    #[arg(long, env = "EVENTLY_ADMIN_LOGIN")]
    admin_login: Option<String>,

    /// Password of the administrator created on an empty database
    #[arg(long, env = "EVENTLY_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The single store connection; requests are serialized through it.
    persistence: Arc<Mutex<Persistence>>,
    /// Source of "now" for every temporal decision.
    clock: Arc<dyn Clock>,
    /// Registration policy in force.
    policy: RegistrationPolicy,
    /// Default dashboard recent-registration count.
    recent_limit: u32,
    /// Live notification fan-out.
    live_events: Arc<LiveEventBroadcaster>,
}

impl AppState {
    fn context(&self) -> TransitionContext {
        TransitionContext::new(self.clock.now(), self.policy)
    }
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live_events)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } if err.is_conflict() => StatusCode::CONFLICT,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { message } => {
                error!(error = %message, "Internal error");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("Internal server error"),
                };
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::from("Internal server error"),
        }
    }
}

// ============================================================================
// Query parameters
// ============================================================================

/// Query parameters for `GET /events`.
#[derive(Debug, Clone, Default, Deserialize)]
struct ListEventsQuery {
    /// Comma-separated event type names.
    types: Option<String>,
    /// 1-based page number.
    page: Option<u32>,
    /// Page size.
    page_size: Option<u32>,
}

/// Query parameters for `GET /users/me/events`.
#[derive(Debug, Clone, Default, Deserialize)]
struct RegisteredEventsQuery {
    /// Comma-separated event type names.
    types: Option<String>,
}

/// Query parameters for `GET /admin/dashboard`.
#[derive(Debug, Clone, Default, Deserialize)]
struct DashboardQuery {
    /// Number of recent registrations to include.
    recent: Option<u32>,
}

fn split_types(types: Option<&str>) -> Vec<String> {
    types
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn request_cause(action: &str, actor: &AuthenticatedActor) -> Cause {
    Cause::new(
        format!("http-{action}"),
        format!("{action} requested by {}", actor.id),
    )
}

// ============================================================================
// Authentication and users
// ============================================================================

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse =
        evently_api::login(&mut persistence, app_state.clock.as_ref(), &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    evently_api::logout(&mut persistence, &token)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/auth/me`.
async fn handle_whoami(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<WhoAmIResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: WhoAmIResponse = evently_api::whoami(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/users`.
///
/// Open sign-up without a session; an admin session may also set a role.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    session: Option<SessionUser>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), HttpError> {
    info!(login_name = %req.login_name, "Handling create_user request");

    let actor: Option<AuthenticatedActor> = session.map(|SessionUser(actor, _)| actor);
    let cause: Cause = actor.as_ref().map_or_else(
        || {
            Cause::new(
                String::from("http-signup"),
                format!("Sign-up by {}", req.login_name),
            )
        },
        |actor| request_cause("create_user", actor),
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateUserResponse =
        evently_api::create_user(&mut persistence, &req, actor.as_ref(), cause)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for PUT `/users/me/preferences`.
async fn handle_update_preferences(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<UpdatePreferencesRequest>,
) -> Result<Json<UpdatePreferencesResponse>, HttpError> {
    let cause: Cause = request_cause("update_preferences", &actor);

    let mut persistence = app_state.persistence.lock().await;
    let response: UpdatePreferencesResponse =
        evently_api::update_preferences(&mut persistence, &actor, &req, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/users/me/events`.
async fn handle_list_registered_events(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Query(query): Query<RegisteredEventsQuery>,
) -> Result<Json<ListRegisteredEventsResponse>, HttpError> {
    let request: ListRegisteredEventsRequest = ListRegisteredEventsRequest {
        event_types: split_types(query.types.as_deref()),
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ListRegisteredEventsResponse =
        evently_api::list_registered_events(&mut persistence, &actor, &request)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Events
// ============================================================================

/// Handler for GET `/events`.
async fn handle_list_events(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListEventsResponse>, HttpError> {
    let request: ListEventsRequest = ListEventsRequest {
        event_types: split_types(query.types.as_deref()),
        page: query.page,
        page_size: query.page_size,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ListEventsResponse =
        evently_api::list_upcoming_events(&mut persistence, app_state.clock.now(), &request)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/events/{event_id}`.
async fn handle_get_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: EventInfo = evently_api::get_event(&mut persistence, event_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/events`.
async fn handle_create_event(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreateEventResponse>), HttpError> {
    info!(actor = %actor.id, title = %req.title, "Handling create_event request");
    let cause: Cause = request_cause("create_event", &actor);

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateEventResponse =
        evently_api::create_event(&mut persistence, &req, &actor, cause)?;
    drop(persistence);

    app_state.live_events.broadcast(&LiveEvent::EventCreated {
        event_id: response.event.event_id,
        title: response.event.title.clone(),
    });

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for PUT `/events/{event_id}`.
async fn handle_update_event(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(event_id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<UpdateEventResponse>, HttpError> {
    info!(actor = %actor.id, event_id, "Handling update_event request");
    let cause: Cause = request_cause("update_event", &actor);

    let mut persistence = app_state.persistence.lock().await;
    let response: UpdateEventResponse = evently_api::update_event(
        &mut persistence,
        event_id,
        &req,
        &actor,
        &app_state.context(),
        cause,
    )?;
    drop(persistence);

    app_state.live_events.broadcast(&LiveEvent::EventUpdated {
        event_id,
        changed_fields: response.changed_fields.clone(),
    });

    Ok(Json(response))
}

/// Handler for DELETE `/events/{event_id}`.
async fn handle_delete_event(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(event_id): Path<i64>,
) -> Result<Json<DeleteEventResponse>, HttpError> {
    info!(actor = %actor.id, event_id, "Handling delete_event request");
    let cause: Cause = request_cause("delete_event", &actor);

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteEventResponse = evently_api::delete_event(
        &mut persistence,
        event_id,
        &actor,
        &app_state.context(),
        cause,
    )?;
    drop(persistence);

    app_state.live_events.broadcast(&LiveEvent::EventDeleted {
        event_id,
        affected_user_ids: response.affected_user_ids.clone(),
    });

    Ok(Json(response))
}

// ============================================================================
// Registrations
// ============================================================================

/// Handler for POST `/events/{event_id}/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(event_id): Path<i64>,
) -> Result<Json<RegistrationResponse>, HttpError> {
    let cause: Cause = request_cause("register", &actor);

    let mut persistence = app_state.persistence.lock().await;
    let result = evently_api::register_for_event(
        &mut persistence,
        event_id,
        &actor,
        &app_state.context(),
        cause,
    );
    drop(persistence);

    let response: RegistrationResponse = result.inspect_err(|e| {
        warn!(event_id, user_id = actor.user_id, error = %e, "Registration rejected");
    })?;

    app_state
        .live_events
        .broadcast(&LiveEvent::RegistrationCreated {
            event_id,
            user_id: response.user_id,
            available_spots: response.available_spots,
        });

    Ok(Json(response))
}

/// Handler for DELETE `/events/{event_id}/register`.
async fn handle_cancel(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(event_id): Path<i64>,
) -> Result<Json<RegistrationResponse>, HttpError> {
    let cause: Cause = request_cause("cancel_registration", &actor);

    let mut persistence = app_state.persistence.lock().await;
    let response: RegistrationResponse = evently_api::cancel_registration(
        &mut persistence,
        event_id,
        &actor,
        &app_state.context(),
        cause,
    )?;
    drop(persistence);

    app_state
        .live_events
        .broadcast(&LiveEvent::RegistrationCancelled {
            event_id,
            user_id: response.user_id,
            available_spots: response.available_spots,
        });

    Ok(Json(response))
}

/// Handler for DELETE `/admin/events/{event_id}/registrations/{user_id}`.
async fn handle_admin_cancel(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path((event_id, user_id)): Path<(i64, i64)>,
) -> Result<Json<RegistrationResponse>, HttpError> {
    info!(actor = %actor.id, event_id, user_id, "Handling admin cancel request");
    let cause: Cause = request_cause("admin_cancel_registration", &actor);

    let mut persistence = app_state.persistence.lock().await;
    let response: RegistrationResponse = evently_api::admin_cancel_registration(
        &mut persistence,
        event_id,
        user_id,
        &actor,
        &app_state.context(),
        cause,
    )?;
    drop(persistence);

    app_state
        .live_events
        .broadcast(&LiveEvent::RegistrationCancelled {
            event_id,
            user_id,
            available_spots: response.available_spots,
        });

    Ok(Json(response))
}

// ============================================================================
// Administration
// ============================================================================

/// Handler for GET `/admin/dashboard`.
async fn handle_dashboard(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DashboardResponse = evently_api::dashboard(
        &mut persistence,
        &actor,
        app_state.clock.now(),
        Some(query.recent.unwrap_or(app_state.recent_limit)),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/admin/reconcile`.
async fn handle_reconcile(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<ReconcileResponse>, HttpError> {
    let cause: Cause = request_cause("reconcile", &actor);

    let mut persistence = app_state.persistence.lock().await;
    let response: ReconcileResponse =
        evently_api::reconcile_user_index(&mut persistence, &actor, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_whoami))
        .route("/users", post(handle_create_user))
        .route("/users/me/preferences", put(handle_update_preferences))
        .route("/users/me/events", get(handle_list_registered_events))
        .route("/events", get(handle_list_events).post(handle_create_event))
        .route(
            "/events/{event_id}",
            get(handle_get_event)
                .put(handle_update_event)
                .delete(handle_delete_event),
        )
        .route(
            "/events/{event_id}/register",
            post(handle_register).delete(handle_cancel),
        )
        .route(
            "/admin/events/{event_id}/registrations/{user_id}",
            delete(handle_admin_cancel),
        )
        .route("/admin/dashboard", get(handle_dashboard))
        .route("/admin/reconcile", post(handle_reconcile))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

/// Brings the store to a consistent state before serving.
///
/// Creates the first administrator when credentials are configured,
/// rebuilds the user event index, and drops expired sessions.
fn prepare_store(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    admin_login: Option<&str>,
    admin_password: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    match (admin_login, admin_password) {
        (Some(login_name), Some(password)) => {
            if let Some(user_id) = evently_api::bootstrap_admin(persistence, login_name, password)?
            {
                info!(user_id, "Created initial administrator");
            }
        }
        (None, None) => {}
        _ => warn!("Both admin login and password are required to bootstrap an administrator"),
    }

    let report: ReconcileReport = persistence.reconcile_user_index()?;
    info!(
        added = report.entries_added,
        removed = report.entries_removed,
        "Reconciled user event index"
    );

    let now: String = evently_domain::format_instant(clock.now())?;
    let expired: usize = persistence.delete_expired_sessions(&now)?;
    info!(expired, "Removed expired sessions");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Evently Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    prepare_store(
        &mut persistence,
        clock.as_ref(),
        args.admin_login.as_deref(),
        args.admin_password.as_deref(),
    )?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock,
        policy: RegistrationPolicy::new(args.allow_registration_after_start),
        recent_limit: args.recent_limit,
        live_events: Arc::new(LiveEventBroadcaster::new()),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
