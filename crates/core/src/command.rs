// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use evently_domain::{EventPatch, User};

/// A command represents user or system intent against one event.
///
/// Commands are the only way to request state changes. Event creation has
/// no prior snapshot to act on and goes through `apply_create_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Edit some of the event's descriptive fields.
    UpdateEvent {
        /// The fields to change.
        patch: EventPatch,
    },
    /// Delete the event together with all its registrations.
    DeleteEvent,
    /// Claim one seat for `user`.
    Register {
        /// The registering user, with preferences and index as stored.
        user: User,
    },
    /// Release the seat held by `user_id`.
    ///
    /// Issued by the user themselves or by an administrator on their behalf.
    Cancel {
        /// The user whose registration is removed.
        user_id: i64,
    },
}

impl Command {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::UpdateEvent { .. } => "UpdateEvent",
            Self::DeleteEvent => "DeleteEvent",
            Self::Register { .. } => "Register",
            Self::Cancel { .. } => "CancelRegistration",
        }
    }
}
