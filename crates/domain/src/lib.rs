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

mod capacity;
mod error;
mod schedule;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use capacity::{CapacitySummary, admits, available_spots, is_full};
pub use error::DomainError;
pub use schedule::{
    event_instant, format_event_date, format_instant, is_past, is_upcoming, parse_event_date,
    parse_instant, whole_second,
};
pub use types::{Event, EventDetails, EventPatch, EventTime, EventType, Registration, Role, User};
pub use validation::{
    MAX_CAPACITY, MIN_PASSWORD_LENGTH, parse_capacity, parse_preferences,
    validate_capacity_change, validate_event_details, validate_user_fields,
};
