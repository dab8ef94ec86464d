// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use evently::Clock;
use evently_audit::Actor;
use evently_domain::{Role, User, format_instant, parse_instant};
use evently_persistence::{Persistence, PersistenceError, SessionData};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::error::AuthError;

/// An authenticated user with an associated role.
///
/// Produced by session validation; every handler that acts on behalf of
/// a user receives one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The login name of this actor.
    pub id: String,
    /// The canonical user id.
    pub user_id: i64,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The login name of this actor
    /// * `user_id` - The canonical user id
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, user_id: i64, role: Role) -> Self {
        Self { id, user_id, role }
    }

    /// Builds the actor for a persisted user.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self::new(user.login_name.clone(), user.id_or_default(), user.role)
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::with_user(
            self.id.clone(),
            String::from(self.role.as_str()),
            self.user_id,
        )
    }

    /// Returns whether this actor holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Event management, administrative cancellation, reporting, and
/// maintenance are admin-only. Everything else is open to any
/// authenticated user.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::User => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor is authorized to create an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_create_event(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "create_event")
    }

    /// Checks if an actor is authorized to update an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_update_event(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "update_event")
    }

    /// Checks if an actor is authorized to delete an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_delete_event(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "delete_event")
    }

    /// Checks if an actor is authorized to cancel another user's registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_admin_cancel(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "admin_cancel_registration")
    }

    /// Checks if an actor is authorized to view the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_view_dashboard(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "view_dashboard")
    }

    /// Checks if an actor is authorized to create a user with an explicit role.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_create_user(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "create_user")
    }

    /// Checks if an actor is authorized to rebuild the user event index.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_reconcile(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "reconcile")
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    pub const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates a user by password and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `clock` - Source of the current instant
    /// * `login_name` - The login name (case-insensitive)
    /// * `password` - The plaintext password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `user`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials do not match or the session
    /// cannot be created.
    pub fn login(
        persistence: &mut Persistence,
        clock: &dyn Clock,
        login_name: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, User), AuthError> {
        let user: User = persistence
            .verify_credentials(login_name, password)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                warn!(login_name = %login_name, "Login rejected");
                AuthError::AuthenticationFailed {
                    reason: String::from("Invalid login name or password"),
                }
            })?;

        let session_token: String = Self::generate_session_token();

        let expires_at: OffsetDateTime = clock.now() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String =
            format_instant(expires_at).map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, user.id_or_default(), &expires_at_str)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        debug!(user_id = user.id_or_default(), "Session created");

        let authenticated_actor: AuthenticatedActor = AuthenticatedActor::from_user(&user);
        Ok((session_token, authenticated_actor, user))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// An expired session is deleted and rejected.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `clock` - Source of the current instant
    /// * `session_token` - The session token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `user`)
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or if its
    /// user no longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        clock: &dyn Clock,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, User), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            parse_instant(&session.expires_at).map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        if clock.now() >= expires_at {
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: User = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok((AuthenticatedActor::from_user(&user), user))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Generates an opaque 128-bit session token.
    fn generate_session_token() -> String {
        format!(
            "session_{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
