// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler authorizes the actor, translates the request into domain
//! values, loads the current snapshot, applies the core transition, and
//! persists it. Handlers never write on failure.

use std::collections::BTreeSet;

use evently::{
    Clock, Command, TransitionContext, TransitionOutcome, TransitionResult, absent_snapshot,
    apply, apply_create_event, require_event, require_user,
};
use evently_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use evently_domain::{
    Event, EventDetails, EventPatch, EventTime, EventType, Role, User, format_event_date,
    format_instant, parse_capacity, parse_event_date, parse_preferences, validate_user_fields,
};
use evently_persistence::{
    EventPage, PersistTransitionResult, PersistUserResult, Persistence, ReconcileReport,
    RegisteredEvent, SessionData,
};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    CreateEventRequest, CreateEventResponse, CreateUserRequest, CreateUserResponse,
    DEFAULT_PAGE_SIZE, DeleteEventResponse, EventInfo, ListEventsRequest, ListEventsResponse,
    ListRegisteredEventsRequest, ListRegisteredEventsResponse, LoginRequest, LoginResponse,
    MAX_PAGE_SIZE, ReconcileResponse, RegisteredEventInfo, RegistrationResponse,
    UpdateEventRequest, UpdateEventResponse, UpdatePreferencesRequest,
    UpdatePreferencesResponse, WhoAmIResponse,
};

// ============================================================================
// Conversions
// ============================================================================

/// Converts a persisted event into its API representation.
///
/// # Errors
///
/// Returns an error if the event has no id or its date cannot be rendered.
pub fn event_to_info(event: &Event) -> Result<EventInfo, ApiError> {
    let event_id: i64 = event.event_id().ok_or_else(|| ApiError::Internal {
        message: String::from("Event has no persisted id"),
    })?;
    let summary = event.capacity_summary();

    Ok(EventInfo {
        event_id,
        title: event.details.title.clone(),
        description: event.details.description.clone(),
        location: event.details.location.clone(),
        event_date: format_event_date(event.details.event_date).map_err(translate_domain_error)?,
        event_time: event.details.event_time.to_string(),
        event_type: event.details.event_type.to_string(),
        capacity: summary.capacity,
        creator_id: event.creator_id,
        registered_count: summary.registered,
        available_spots: summary.available_spots,
        is_full: summary.is_full,
        starts_at: format_instant(event.starts_at()).map_err(translate_domain_error)?,
    })
}

fn preference_names(preferences: &BTreeSet<EventType>) -> Vec<String> {
    preferences.iter().map(ToString::to_string).collect()
}

fn parse_event_types(values: &[String]) -> Result<BTreeSet<EventType>, ApiError> {
    parse_preferences(values).map_err(translate_domain_error)
}

fn parse_details(request: &CreateEventRequest) -> Result<EventDetails, ApiError> {
    Ok(EventDetails {
        title: request.title.clone(),
        description: request.description.clone(),
        location: request.location.clone(),
        event_date: parse_event_date(&request.event_date).map_err(translate_domain_error)?,
        event_time: request
            .event_time
            .parse::<EventTime>()
            .map_err(translate_domain_error)?,
        event_type: request
            .event_type
            .parse::<EventType>()
            .map_err(translate_domain_error)?,
        capacity: parse_capacity(request.capacity).map_err(translate_domain_error)?,
    })
}

fn parse_patch(request: &UpdateEventRequest) -> Result<EventPatch, ApiError> {
    Ok(EventPatch {
        title: request.title.clone(),
        description: request.description.clone(),
        location: request.location.clone(),
        event_date: request
            .event_date
            .as_deref()
            .map(parse_event_date)
            .transpose()
            .map_err(translate_domain_error)?,
        event_time: request
            .event_time
            .as_deref()
            .map(str::parse::<EventTime>)
            .transpose()
            .map_err(translate_domain_error)?,
        event_type: request
            .event_type
            .as_deref()
            .map(str::parse::<EventType>)
            .transpose()
            .map_err(translate_domain_error)?,
        capacity: request
            .capacity
            .map(parse_capacity)
            .transpose()
            .map_err(translate_domain_error)?,
    })
}

fn load_event(persistence: &mut Persistence, event_id: i64) -> Result<Event, ApiError> {
    let found: Option<Event> = persistence
        .get_event(event_id)
        .map_err(translate_persistence_error)?;
    require_event(found, event_id).map_err(translate_domain_error)
}

fn load_user(persistence: &mut Persistence, user_id: i64) -> Result<User, ApiError> {
    let found: Option<User> = persistence
        .get_user_by_id(user_id)
        .map_err(translate_persistence_error)?;
    require_user(found, user_id).map_err(translate_domain_error)
}

fn persist(
    persistence: &mut Persistence,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, ApiError> {
    persistence.persist_transition(result).map_err(|e| {
        warn!(
            action = %result.audit_event.action.name,
            error = %e,
            "Transition rejected by store"
        );
        translate_persistence_error(e)
    })
}

fn persist_global_audit(
    persistence: &mut Persistence,
    audit_event: &AuditEvent,
) -> Result<i64, ApiError> {
    persistence
        .persist_audit_event(audit_event)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to persist audit event: {e}"),
        })
}

// ============================================================================
// Event directory
// ============================================================================

/// Lists upcoming events, soonest first, one page at a time.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `now` - The instant separating upcoming from past events
/// * `request` - Type filter and paging
///
/// # Errors
///
/// Returns an error if the paging parameters are out of range or a type
/// name is unknown.
pub fn list_upcoming_events(
    persistence: &mut Persistence,
    now: OffsetDateTime,
    request: &ListEventsRequest,
) -> Result<ListEventsResponse, ApiError> {
    let page: u32 = request.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::InvalidInput {
            field: String::from("page"),
            message: String::from("Pages are numbered from 1"),
        });
    }

    let page_size: u32 = request.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ApiError::InvalidInput {
            field: String::from("page_size"),
            message: format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
        });
    }

    let event_types: BTreeSet<EventType> = parse_event_types(&request.event_types)?;
    let now_str: String = format_instant(now).map_err(translate_domain_error)?;

    let result: EventPage = persistence
        .list_upcoming_events(&now_str, &event_types, page, page_size)
        .map_err(translate_persistence_error)?;

    let events: Vec<EventInfo> = result
        .events
        .iter()
        .map(event_to_info)
        .collect::<Result<_, _>>()?;

    Ok(ListEventsResponse {
        events,
        page,
        page_size,
        total: result.total,
        total_pages: result.total.div_ceil(u64::from(page_size)),
    })
}

/// Returns one event with its capacity figures.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the event does not exist.
pub fn get_event(persistence: &mut Persistence, event_id: i64) -> Result<EventInfo, ApiError> {
    let event: Event = load_event(persistence, event_id)?;
    event_to_info(&event)
}

/// Creates an event.
///
/// Only Admin actors may create events. The actor becomes the creator.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The event fields
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - Any field is missing or invalid
/// - The event cannot be persisted
pub fn create_event(
    persistence: &mut Persistence,
    request: &CreateEventRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<CreateEventResponse, ApiError> {
    AuthorizationService::authorize_create_event(authenticated_actor)?;

    let details: EventDetails = parse_details(request)?;
    let transition_result: TransitionResult = apply_create_event(
        details,
        authenticated_actor.user_id,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let persisted: PersistTransitionResult = persist(persistence, &transition_result)?;
    let event: Event = load_event(persistence, persisted.event_id)?;

    info!(
        event_id = persisted.event_id,
        title = %event.details.title,
        "Created event"
    );

    Ok(CreateEventResponse {
        message: format!("Created event '{}'", event.details.title),
        event: event_to_info(&event)?,
        audit_event_id: persisted.audit_event_id,
    })
}

/// Edits an event.
///
/// Only Admin actors may edit events. Events that already started may
/// still be edited; the capacity can never drop below the current
/// registrations.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The event does not exist
/// - A supplied field is invalid
/// - The capacity would fall below the current registrations
pub fn update_event(
    persistence: &mut Persistence,
    event_id: i64,
    request: &UpdateEventRequest,
    authenticated_actor: &AuthenticatedActor,
    context: &TransitionContext,
    cause: Cause,
) -> Result<UpdateEventResponse, ApiError> {
    AuthorizationService::authorize_update_event(authenticated_actor)?;

    let patch: EventPatch = parse_patch(request)?;
    let event: Event = load_event(persistence, event_id)?;

    let transition_result: TransitionResult = apply(
        &event,
        Command::UpdateEvent { patch },
        context,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let persisted: PersistTransitionResult = persist(persistence, &transition_result)?;
    let updated: Event = load_event(persistence, event_id)?;

    let changed_fields: Vec<String> = match &transition_result.outcome {
        TransitionOutcome::EventUpdated { changed_fields } => {
            changed_fields.iter().map(ToString::to_string).collect()
        }
        _ => Vec::new(),
    };

    info!(event_id, ?changed_fields, "Updated event");

    Ok(UpdateEventResponse {
        event: event_to_info(&updated)?,
        changed_fields,
        audit_event_id: persisted.audit_event_id,
        message: format!("Updated event '{}'", updated.details.title),
    })
}

/// Deletes an upcoming event together with its registrations.
///
/// Only Admin actors may delete events.
///
/// # Returns
///
/// The ids of the users whose registrations were removed, so they can be
/// notified.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The event does not exist
/// - The event has already started
pub fn delete_event(
    persistence: &mut Persistence,
    event_id: i64,
    authenticated_actor: &AuthenticatedActor,
    context: &TransitionContext,
    cause: Cause,
) -> Result<DeleteEventResponse, ApiError> {
    AuthorizationService::authorize_delete_event(authenticated_actor)?;

    let event: Event = load_event(persistence, event_id)?;
    let transition_result: TransitionResult = apply(
        &event,
        Command::DeleteEvent,
        context,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let persisted: PersistTransitionResult = persist(persistence, &transition_result)?;

    let affected_user_ids: Vec<i64> = match transition_result.outcome {
        TransitionOutcome::EventDeleted { affected_user_ids } => affected_user_ids,
        _ => Vec::new(),
    };

    info!(
        event_id,
        affected = affected_user_ids.len(),
        "Deleted event"
    );

    Ok(DeleteEventResponse {
        event_id,
        message: format!(
            "Deleted event '{}' and {} registration(s)",
            event.details.title,
            affected_user_ids.len()
        ),
        affected_user_ids,
        audit_event_id: persisted.audit_event_id,
    })
}

// ============================================================================
// Registrations
// ============================================================================

/// Registers the authenticated user for an event.
///
/// # Errors
///
/// Returns an error if:
/// - The event or user does not exist
/// - The user is already registered
/// - The event type is not among the user's preferences
/// - The event has already started (unless the policy allows it)
/// - The event is full, including when a concurrent registration took
///   the last seat
pub fn register_for_event(
    persistence: &mut Persistence,
    event_id: i64,
    authenticated_actor: &AuthenticatedActor,
    context: &TransitionContext,
    cause: Cause,
) -> Result<RegistrationResponse, ApiError> {
    let event: Event = load_event(persistence, event_id)?;
    let user: User = load_user(persistence, authenticated_actor.user_id)?;

    let transition_result: TransitionResult = apply(
        &event,
        Command::Register { user },
        context,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let persisted: PersistTransitionResult = persist(persistence, &transition_result)?;
    let updated: Event = load_event(persistence, event_id)?;

    let registered_at: Option<String> = match &transition_result.outcome {
        TransitionOutcome::Registered { registered_at, .. } => {
            Some(format_instant(*registered_at).map_err(translate_domain_error)?)
        }
        _ => None,
    };

    info!(
        event_id,
        user_id = authenticated_actor.user_id,
        "Registered for event"
    );

    let summary = updated.capacity_summary();
    Ok(RegistrationResponse {
        event_id,
        user_id: authenticated_actor.user_id,
        registered_at,
        available_spots: summary.available_spots,
        is_full: summary.is_full,
        audit_event_id: persisted.audit_event_id,
        message: format!("Registered for '{}'", updated.details.title),
    })
}

fn cancel_for(
    persistence: &mut Persistence,
    event_id: i64,
    target_user_id: i64,
    authenticated_actor: &AuthenticatedActor,
    context: &TransitionContext,
    cause: Cause,
) -> Result<RegistrationResponse, ApiError> {
    let event: Event = load_event(persistence, event_id)?;

    let transition_result: TransitionResult = apply(
        &event,
        Command::Cancel {
            user_id: target_user_id,
        },
        context,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let persisted: PersistTransitionResult = persist(persistence, &transition_result)?;
    let updated: Event = load_event(persistence, event_id)?;

    info!(
        event_id,
        user_id = target_user_id,
        actor = %authenticated_actor.id,
        "Cancelled registration"
    );

    let summary = updated.capacity_summary();
    Ok(RegistrationResponse {
        event_id,
        user_id: target_user_id,
        registered_at: None,
        available_spots: summary.available_spots,
        is_full: summary.is_full,
        audit_event_id: persisted.audit_event_id,
        message: format!("Cancelled registration for '{}'", updated.details.title),
    })
}

/// Cancels the authenticated user's registration for an event.
///
/// # Errors
///
/// Returns an error if:
/// - The event does not exist
/// - The user is not registered
/// - The event has already started
pub fn cancel_registration(
    persistence: &mut Persistence,
    event_id: i64,
    authenticated_actor: &AuthenticatedActor,
    context: &TransitionContext,
    cause: Cause,
) -> Result<RegistrationResponse, ApiError> {
    cancel_for(
        persistence,
        event_id,
        authenticated_actor.user_id,
        authenticated_actor,
        context,
        cause,
    )
}

/// Cancels an arbitrary user's registration for an event.
///
/// Only Admin actors may cancel on behalf of another user. The same
/// registration and timing rules apply as for a self-cancellation.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The event or the target user does not exist
/// - The target user is not registered
/// - The event has already started
pub fn admin_cancel_registration(
    persistence: &mut Persistence,
    event_id: i64,
    target_user_id: i64,
    authenticated_actor: &AuthenticatedActor,
    context: &TransitionContext,
    cause: Cause,
) -> Result<RegistrationResponse, ApiError> {
    AuthorizationService::authorize_admin_cancel(authenticated_actor)?;
    load_user(persistence, target_user_id)?;
    cancel_for(
        persistence,
        event_id,
        target_user_id,
        authenticated_actor,
        context,
        cause,
    )
}

/// Lists the events the authenticated user is registered for, past ones
/// included, each tagged with its registration time.
///
/// # Errors
///
/// Returns an error if a type name is unknown.
pub fn list_registered_events(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
    request: &ListRegisteredEventsRequest,
) -> Result<ListRegisteredEventsResponse, ApiError> {
    let event_types: BTreeSet<EventType> = parse_event_types(&request.event_types)?;

    let registered: Vec<RegisteredEvent> = persistence
        .list_registered_events(authenticated_actor.user_id, &event_types)
        .map_err(translate_persistence_error)?;

    let events: Vec<RegisteredEventInfo> = registered
        .iter()
        .map(|entry| {
            Ok(RegisteredEventInfo {
                event: event_to_info(&entry.event)?,
                registered_at: format_instant(entry.registered_at)
                    .map_err(translate_domain_error)?,
            })
        })
        .collect::<Result<_, ApiError>>()?;

    Ok(ListRegisteredEventsResponse { events })
}

// ============================================================================
// Users and sessions
// ============================================================================

fn user_snapshot(
    user_id: i64,
    login_name: &str,
    role: Role,
    preferences: &[String],
) -> StateSnapshot {
    StateSnapshot::new(format!(
        "user_id={user_id},login_name={login_name},role={role},preferences=[{}]",
        preferences.join(",")
    ))
}

/// Creates a user account.
///
/// Without an actor this is open sign-up and always creates a regular
/// user. Requesting an explicit role requires an authenticated admin.
///
/// # Errors
///
/// Returns an error if:
/// - A role is requested by anyone but an admin
/// - A field or preference is invalid
/// - The login name is taken
pub fn create_user(
    persistence: &mut Persistence,
    request: &CreateUserRequest,
    authenticated_actor: Option<&AuthenticatedActor>,
    cause: Cause,
) -> Result<CreateUserResponse, ApiError> {
    let role: Role = match (&request.role, authenticated_actor) {
        (None, _) => Role::User,
        (Some(role), Some(actor)) => {
            AuthorizationService::authorize_create_user(actor)?;
            role.parse::<Role>().map_err(translate_domain_error)?
        }
        (Some(_), None) => {
            return Err(ApiError::Unauthorized {
                action: String::from("create_user"),
                required_role: String::from("Admin"),
            });
        }
    };

    validate_user_fields(&request.login_name, &request.display_name, &request.password)
        .map_err(translate_domain_error)?;
    let preferences: BTreeSet<EventType> = parse_event_types(&request.preferences)?;

    let login_name: String = request.login_name.to_uppercase();
    let persisted: PersistUserResult = persistence
        .create_user_with_audit(
            &request.login_name,
            &request.display_name,
            &request.password,
            role,
            &preferences,
            |user_id| {
                let actor: Actor = authenticated_actor.map_or_else(
                    || Actor::with_user(login_name.clone(), String::from("signup"), user_id),
                    AuthenticatedActor::to_audit_actor,
                );
                AuditEvent::new(
                    actor,
                    cause,
                    Action::new(
                        String::from("CreateUser"),
                        Some(format!("Created user {login_name} with role {role}")),
                    ),
                    absent_snapshot(),
                    user_snapshot(user_id, &login_name, role, &preference_names(&preferences)),
                    None,
                )
            },
        )
        .map_err(translate_persistence_error)?;
    let user_id: i64 = persisted.user_id;

    info!(
        user_id,
        audit_event_id = persisted.audit_event_id,
        login_name = %login_name,
        role = %role,
        "Created user"
    );

    Ok(CreateUserResponse {
        user_id,
        message: format!("Created user '{login_name}'"),
        login_name,
        display_name: request.display_name.clone(),
        role: role.to_string(),
    })
}

/// Replaces the authenticated user's event type preferences.
///
/// Existing registrations are kept even if their type is no longer
/// preferred.
///
/// # Errors
///
/// Returns an error if a type name is unknown or the user no longer exists.
pub fn update_preferences(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
    request: &UpdatePreferencesRequest,
    cause: Cause,
) -> Result<UpdatePreferencesResponse, ApiError> {
    let preferences: BTreeSet<EventType> = parse_event_types(&request.preferences)?;
    let user: User = load_user(persistence, authenticated_actor.user_id)?;

    let names: Vec<String> = preference_names(&preferences);
    let audit_event: AuditEvent = AuditEvent::new(
        authenticated_actor.to_audit_actor(),
        cause,
        Action::new(String::from("UpdatePreferences"), None),
        user_snapshot(
            authenticated_actor.user_id,
            &user.login_name,
            user.role,
            &preference_names(&user.preferences),
        ),
        user_snapshot(
            authenticated_actor.user_id,
            &user.login_name,
            user.role,
            &names,
        ),
        None,
    );
    persistence
        .update_preferences_with_audit(authenticated_actor.user_id, &preferences, &audit_event)
        .map_err(translate_persistence_error)?;

    Ok(UpdatePreferencesResponse {
        user_id: authenticated_actor.user_id,
        preferences: names,
        message: String::from("Preferences updated"),
    })
}

/// Returns the authenticated user's profile.
///
/// # Errors
///
/// Returns an error if the user no longer exists.
pub fn whoami(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<WhoAmIResponse, ApiError> {
    let user: User = load_user(persistence, authenticated_actor.user_id)?;

    Ok(WhoAmIResponse {
        user_id: authenticated_actor.user_id,
        login_name: user.login_name.clone(),
        display_name: user.display_name.clone(),
        role: user.role.to_string(),
        preferences: preference_names(&user.preferences),
        registered_events: user.registered_events,
    })
}

/// Authenticates by password and opens a session.
///
/// # Errors
///
/// Returns `AuthenticationFailed` if the credentials do not match.
pub fn login(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, authenticated_actor, user): (String, AuthenticatedActor, User) =
        AuthenticationService::login(persistence, clock, &request.login_name, &request.password)?;

    let session: Option<SessionData> = persistence
        .get_session_by_token(&session_token)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to retrieve session: {e}"),
        })?;

    let expires_at: String = session
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?
        .expires_at;

    Ok(LoginResponse {
        session_token,
        user_id: authenticated_actor.user_id,
        login_name: user.login_name,
        display_name: user.display_name,
        role: user.role.to_string(),
        expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Creates the first administrator if none exists.
///
/// # Returns
///
/// * `Ok(Some(user_id))` if an administrator was created
/// * `Ok(None)` if one already existed
///
/// # Errors
///
/// Returns an error if the credentials are invalid or the account cannot
/// be stored.
pub fn bootstrap_admin(
    persistence: &mut Persistence,
    login_name: &str,
    password: &str,
) -> Result<Option<i64>, ApiError> {
    let admins: i64 = persistence
        .count_admins()
        .map_err(translate_persistence_error)?;
    if admins > 0 {
        return Ok(None);
    }

    validate_user_fields(login_name, login_name, password).map_err(translate_domain_error)?;

    let normalized: String = login_name.to_uppercase();
    let persisted: PersistUserResult = persistence
        .create_user_with_audit(
            login_name,
            login_name,
            password,
            Role::Admin,
            &BTreeSet::new(),
            |user_id| {
                AuditEvent::new(
                    Actor::new(String::from("system"), String::from("system")),
                    Cause::new(
                        String::from("bootstrap"),
                        String::from("First administrator created at startup"),
                    ),
                    Action::new(String::from("CreateUser"), None),
                    absent_snapshot(),
                    user_snapshot(user_id, &normalized, Role::Admin, &[]),
                    None,
                )
            },
        )
        .map_err(translate_persistence_error)?;
    let user_id: i64 = persisted.user_id;

    info!(user_id, login_name = %normalized, "Bootstrapped administrator");
    Ok(Some(user_id))
}

/// Rebuilds every user's event index from the authoritative registrations.
///
/// Only Admin actors may trigger a rebuild.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the rebuild fails.
pub fn reconcile_user_index(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ReconcileResponse, ApiError> {
    AuthorizationService::authorize_reconcile(authenticated_actor)?;

    let report: ReconcileReport = persistence
        .reconcile_user_index()
        .map_err(translate_persistence_error)?;

    let audit_event: AuditEvent = AuditEvent::new(
        authenticated_actor.to_audit_actor(),
        cause,
        Action::new(
            String::from("ReconcileUserIndex"),
            Some(format!(
                "added={},removed={}",
                report.entries_added, report.entries_removed
            )),
        ),
        absent_snapshot(),
        absent_snapshot(),
        None,
    );
    persist_global_audit(persistence, &audit_event)?;

    Ok(ReconcileResponse {
        entries_added: report.entries_added,
        entries_removed: report.entries_removed,
        message: format!(
            "Index rebuilt: {} added, {} removed",
            report.entries_added, report.entries_removed
        ),
    })
}
