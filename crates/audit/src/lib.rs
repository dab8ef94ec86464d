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
    clippy::all
)]

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change:
/// a signed-in user, an administrator, or the server itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The login name (or a system identifier) of this actor.
    pub id: String,
    /// The type of actor (e.g., "user", "admin", "system").
    pub actor_type: String,
    /// The canonical user ID, when the actor is a stored user.
    pub user_id: Option<i64>,
}

impl Actor {
    /// Creates a new Actor that is not backed by a stored user.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self {
            id,
            actor_type,
            user_id: None,
        }
    }

    /// Creates an Actor for a stored user.
    #[must_use]
    pub const fn with_user(id: String, actor_type: String, user_id: i64) -> Self {
        Self {
            id,
            actor_type,
            user_id: Some(user_id),
        }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`RegisterForEvent`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact textual rendering of the state before or after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// The snapshot payload (`key=value` pairs).
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new snapshot.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable record of one state transition.
///
/// Every successful transition produces exactly one audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The identifier assigned when persisted.
    pub event_id: Option<i64>,
    /// Who performed the action.
    pub actor: Actor,
    /// Why the action was performed.
    pub cause: Cause,
    /// What was done.
    pub action: Action,
    /// State before the action.
    pub before: StateSnapshot,
    /// State after the action.
    pub after: StateSnapshot,
    /// The event record the action concerns, if any.
    pub subject_event_id: Option<i64>,
}

impl AuditEvent {
    /// Creates a new, unpersisted audit event.
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        subject_event_id: Option<i64>,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            subject_event_id,
        }
    }

    /// Returns a copy of this audit event carrying its persisted ID.
    #[must_use]
    pub fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}

#[cfg(test)]
mod tests;
