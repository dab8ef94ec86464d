// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! Handlers that act on behalf of a user take a `SessionUser`; the
//! extractor resolves the `Authorization: Bearer <token>` header through
//! `AuthenticationService::validate_session` before the handler runs.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use evently_api::{AuthenticatedActor, AuthenticationService};
use evently_domain::User;
use tracing::{debug, warn};

use crate::AppState;

/// Extractor for the authenticated user.
///
/// # Errors
///
/// Rejects with HTTP 401 Unauthorized if:
/// - The Authorization header is missing or not a Bearer token
/// - The session token is unknown or expired
/// - The session's user no longer exists
pub struct SessionUser(pub AuthenticatedActor, pub User);

/// Extractor for the raw bearer token, without validating it.
pub struct BearerToken(pub String);

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingAuthorizationHeader => String::from("Missing Authorization header"),
            Self::InvalidAuthorizationHeader => String::from(
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(reason) => format!("Session validation failed: {reason}"),
        };

        crate::HttpError {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
        .into_response()
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, SessionError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value: &str = header.to_str().map_err(|_| {
        warn!("Invalid Authorization header encoding");
        SessionError::InvalidAuthorizationHeader
    })?;

    value.strip_prefix("Bearer ").map(Some).ok_or_else(|| {
        warn!("Authorization header does not start with 'Bearer '");
        SessionError::InvalidAuthorizationHeader
    })
}

async fn validate(state: &AppState, token: &str) -> Result<SessionUser, SessionError> {
    let mut persistence = state.persistence.lock().await;
    let (actor, user) =
        AuthenticationService::validate_session(&mut persistence, state.clock.as_ref(), token)
            .map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidSession(e.to_string())
            })?;
    drop(persistence);

    debug!(
        login_name = %actor.id,
        role = %actor.role,
        "Session validated successfully"
    );

    Ok(SessionUser(actor, user))
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: &str = bearer_token(parts)?.ok_or_else(|| {
            debug!("Missing Authorization header");
            SessionError::MissingAuthorizationHeader
        })?;
        validate(state, token).await
    }
}

/// Requests without an Authorization header extract as `None`; a header
/// that is present must still carry a valid session.
impl OptionalFromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => validate(state, token).await.map(Some),
            None => Ok(None),
        }
    }
}

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_token(parts)?
            .map(|token| Self(token.to_string()))
            .ok_or(SessionError::MissingAuthorizationHeader)
    }
}
