// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::capacity::admits;
use crate::error::DomainError;
use crate::types::{Event, EventDetails, EventType};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Minimum password length accepted at account creation.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Largest seat count an event may carry; the store keeps capacity as a
/// 32-bit signed integer.
pub const MAX_CAPACITY: u32 = i32::MAX.unsigned_abs();

/// Validates that an event's descriptive fields meet their constraints.
///
/// Date, time, and type are already well-formed by construction; this checks
/// the free-text fields and the capacity.
///
/// # Arguments
///
/// * `details` - The event fields to validate
///
/// # Errors
///
/// Returns an error if:
/// - The title, description, or location is empty or whitespace
/// - The capacity is zero or above `MAX_CAPACITY`
pub fn validate_event_details(details: &EventDetails) -> Result<(), DomainError> {
    // Rule: title must not be empty
    if details.title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }

    // Rule: description must not be empty
    if details.description.trim().is_empty() {
        return Err(DomainError::InvalidDescription(String::from(
            "Description cannot be empty",
        )));
    }

    // Rule: location must not be empty
    if details.location.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Location cannot be empty",
        )));
    }

    // Rule: at least one seat, at most MAX_CAPACITY
    if details.capacity < 1 || details.capacity > MAX_CAPACITY {
        return Err(DomainError::InvalidCapacity {
            capacity: i64::from(details.capacity),
        });
    }

    Ok(())
}

/// Converts a raw capacity value into a seat count.
///
/// # Errors
///
/// Returns an error if the value is below 1 or above `MAX_CAPACITY`.
pub fn parse_capacity(capacity: i64) -> Result<u32, DomainError> {
    u32::try_from(capacity)
        .ok()
        .filter(|seats| (1..=MAX_CAPACITY).contains(seats))
        .ok_or(DomainError::InvalidCapacity { capacity })
}

/// Validates that a capacity edit keeps every existing registration.
///
/// # Arguments
///
/// * `event` - The event as currently stored
/// * `requested` - The capacity the edit would set
///
/// # Errors
///
/// Returns `DomainError::CapacityInvariantViolated` if fewer seats than
/// current registrations are requested.
pub fn validate_capacity_change(event: &Event, requested: u32) -> Result<(), DomainError> {
    let registered: usize = event.registrations.len();
    if !admits(requested, registered) {
        return Err(DomainError::CapacityInvariantViolated {
            event_id: event.id_or_default(),
            requested,
            registered,
        });
    }
    Ok(())
}

/// Parses a list of event type names into a preference set.
///
/// Duplicates collapse; order is not significant.
///
/// # Errors
///
/// Returns an error naming the first unknown type.
pub fn parse_preferences<S: AsRef<str>>(values: &[S]) -> Result<BTreeSet<EventType>, DomainError> {
    values
        .iter()
        .map(|value| EventType::from_str(value.as_ref()))
        .collect()
}

/// Validates account fields for a new user.
///
/// # Errors
///
/// Returns an error if:
/// - The login name is empty or contains whitespace
/// - The display name is empty
/// - The password is shorter than `MIN_PASSWORD_LENGTH`
pub fn validate_user_fields(
    login_name: &str,
    display_name: &str,
    password: &str,
) -> Result<(), DomainError> {
    if login_name.trim().is_empty() {
        return Err(DomainError::InvalidLoginName(String::from(
            "Login name cannot be empty",
        )));
    }
    if login_name.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidLoginName(String::from(
            "Login name cannot contain whitespace",
        )));
    }

    if display_name.trim().is_empty() {
        return Err(DomainError::InvalidDisplayName(String::from(
            "Display name cannot be empty",
        )));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::InvalidPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}
