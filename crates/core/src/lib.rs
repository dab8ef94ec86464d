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

//! Registration consistency engine.
//!
//! State transitions over a single event snapshot. Everything here is pure;
//! the persistence layer applies the resulting writes atomically.

mod apply;
mod clock;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use evently_domain::{DomainError, Event, User};

pub use apply::{apply, apply_create_event};
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::Command;
pub use error::CoreError;
pub use state::{
    RegistrationPolicy, TransitionContext, TransitionOutcome, TransitionResult, absent_snapshot,
    event_snapshot,
};

/// Resolves a lookup result into an event.
///
/// This is a read-only validation that does not create audit events.
///
/// # Errors
///
/// Returns `DomainError::EventNotFound` if the event does not exist.
pub fn require_event(found: Option<Event>, event_id: i64) -> Result<Event, DomainError> {
    found.ok_or(DomainError::EventNotFound(event_id))
}

/// Resolves a lookup result into a user.
///
/// # Errors
///
/// Returns `DomainError::UserNotFound` if the user does not exist.
pub fn require_user(found: Option<User>, user_id: i64) -> Result<User, DomainError> {
    found.ok_or(DomainError::UserNotFound(user_id))
}
