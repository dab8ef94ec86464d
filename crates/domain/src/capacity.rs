// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity ledger.
//!
//! Seat accounting is a pure function of an event's capacity and its
//! current registration count; there is no separate seat counter. Releasing
//! a seat is the registration list shrinking.

/// Derived capacity figures for one event snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacitySummary {
    /// The event's capacity.
    pub capacity: u32,
    /// The number of active registrations.
    pub registered: usize,
    /// Remaining seats, never negative.
    pub available_spots: u32,
    /// Whether no seats remain.
    pub is_full: bool,
}

impl CapacitySummary {
    /// Computes the summary for `registered` registrations against `capacity`.
    #[must_use]
    pub fn new(capacity: u32, registered: usize) -> Self {
        Self {
            capacity,
            registered,
            available_spots: available_spots(capacity, registered),
            is_full: is_full(capacity, registered),
        }
    }
}

/// Returns whether `registered` registrations exhaust `capacity`.
#[must_use]
pub fn is_full(capacity: u32, registered: usize) -> bool {
    saturating_count(registered) >= capacity
}

/// Returns `max(0, capacity - registered)`.
#[must_use]
pub fn available_spots(capacity: u32, registered: usize) -> u32 {
    capacity.saturating_sub(saturating_count(registered))
}

/// Returns whether a capacity of `capacity` can hold `registered` registrations.
#[must_use]
pub fn admits(capacity: u32, registered: usize) -> bool {
    saturating_count(registered) <= capacity
}

/// Narrows a registration count to `u32`, saturating at `u32::MAX`.
fn saturating_count(registered: usize) -> u32 {
    u32::try_from(registered).unwrap_or(u32::MAX)
}
