// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use evently::CoreError;
use evently_domain::DomainError;
use evently_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns whether this error reports a conflict with existing
    /// registration state (as opposed to a rule about the request itself).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DomainRuleViolation { rule, .. }
                if rule == "already_registered"
                    || rule == "not_registered"
                    || rule == "event_full"
                    || rule == "unique_login_name"
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn rule(name: &str, err: &DomainError) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: name.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// Field validation failures become `InvalidInput` naming the field;
/// registration and capacity rules become `DomainRuleViolation` naming
/// the rule.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidTitle(_) => invalid("title", &err),
        DomainError::InvalidDescription(_) => invalid("description", &err),
        DomainError::InvalidLocation(_) => invalid("location", &err),
        DomainError::InvalidEventDate { .. } => invalid("event_date", &err),
        DomainError::InvalidEventTime(_) => invalid("event_time", &err),
        DomainError::InvalidEventType(_) => invalid("event_type", &err),
        DomainError::InvalidCapacity { .. } => invalid("capacity", &err),
        DomainError::InvalidRole(_) => invalid("role", &err),
        DomainError::InvalidLoginName(_) => invalid("login_name", &err),
        DomainError::InvalidDisplayName(_) => invalid("display_name", &err),
        DomainError::InvalidPassword(_) => invalid("password", &err),
        DomainError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Event"),
            message: format!("Event {event_id} does not exist"),
        },
        DomainError::UserNotFound(user_id) => ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        },
        DomainError::PreferenceMismatch { .. } => rule("preference_mismatch", &err),
        DomainError::AlreadyRegistered { .. } => rule("already_registered", &err),
        DomainError::NotRegistered { .. } => rule("not_registered", &err),
        DomainError::EventFull { .. } => rule("event_full", &err),
        DomainError::CapacityInvariantViolated { .. } => rule("capacity_invariant", &err),
        DomainError::EventAlreadyStarted { .. } => rule("event_already_started", &err),
        DomainError::InvalidTimestamp { .. } | DomainError::DateArithmeticOverflow { .. } => {
            ApiError::Internal {
                message: err.to_string(),
            }
        }
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Rule violations detected by write-time rechecks are reported exactly
/// like the same violation detected before the write.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::RuleViolation(domain_err) => translate_domain_error(domain_err),
        PersistenceError::EventNotFound(event_id) => {
            translate_domain_error(DomainError::EventNotFound(event_id))
        }
        PersistenceError::UserNotFound(user_id) => {
            translate_domain_error(DomainError::UserNotFound(user_id))
        }
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message,
        },
        PersistenceError::DuplicateLoginName(login_name) => ApiError::DomainRuleViolation {
            rule: String::from("unique_login_name"),
            message: format!("Login name '{login_name}' is already taken"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
