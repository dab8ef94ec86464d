// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resolution of an event's split date and time-of-day into one instant.
//!
//! ## Invariants
//!
//! - All arithmetic is UTC; no ambient timezone is consulted
//! - Seconds and sub-seconds of a resolved instant are always zero
//! - An event starting exactly at `now` is past, not upcoming
//! - Rendered instants are fixed-width, so their lexicographic order
//!   matches their chronological order (used for store-side filtering)

use crate::error::DomainError;
use crate::types::EventTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const INSTANT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// Combines an event's calendar date and time of day into a UTC instant.
#[must_use]
pub fn event_instant(event_date: Date, event_time: EventTime) -> OffsetDateTime {
    PrimitiveDateTime::new(event_date, event_time.to_time()).assume_utc()
}

/// Returns whether an event starting at `instant` is still in the future.
#[must_use]
pub fn is_upcoming(instant: OffsetDateTime, now: OffsetDateTime) -> bool {
    instant > now
}

/// Returns whether an event starting at `instant` has started or finished.
#[must_use]
pub fn is_past(instant: OffsetDateTime, now: OffsetDateTime) -> bool {
    !is_upcoming(instant, now)
}

/// Parses an ISO calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns an error if the value is not a valid calendar date.
pub fn parse_event_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value, DATE_FORMAT).map_err(|e| DomainError::InvalidEventDate {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Renders a calendar date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the date cannot be rendered (years outside 0..=9999).
pub fn format_event_date(date: Date) -> Result<String, DomainError> {
    date.format(DATE_FORMAT)
        .map_err(|e| DomainError::InvalidEventDate {
            value: date.to_string(),
            reason: e.to_string(),
        })
}

/// Renders an instant as a fixed-width UTC timestamp (`YYYY-MM-DDTHH:MM:SSZ`).
///
/// # Errors
///
/// Returns an error if the instant cannot be rendered.
pub fn format_instant(instant: OffsetDateTime) -> Result<String, DomainError> {
    instant
        .to_offset(UtcOffset::UTC)
        .format(INSTANT_FORMAT)
        .map_err(|e| DomainError::InvalidTimestamp {
            value: instant.to_string(),
            reason: e.to_string(),
        })
}

/// Drops the sub-second part of an instant, matching what `format_instant`
/// keeps.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the instant cannot be
/// adjusted.
pub fn whole_second(instant: OffsetDateTime) -> Result<OffsetDateTime, DomainError> {
    instant
        .replace_nanosecond(0)
        .map_err(|_| DomainError::DateArithmeticOverflow {
            operation: String::from("truncating a timestamp to the second"),
        })
}

/// Parses a timestamp produced by `format_instant`.
///
/// # Errors
///
/// Returns an error if the value is not in the fixed-width UTC format.
pub fn parse_instant(value: &str) -> Result<OffsetDateTime, DomainError> {
    PrimitiveDateTime::parse(value, INSTANT_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| DomainError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn june_first() -> Date {
        parse_event_date("2024-06-01").unwrap()
    }

    #[test]
    fn test_event_instant_combines_date_and_time_in_utc() {
        let instant = event_instant(june_first(), "23:30".parse().unwrap());
        assert_eq!(instant, datetime!(2024-06-01 23:30:00 UTC));
    }

    #[test]
    fn test_late_evening_event_is_upcoming_half_an_hour_before() {
        let instant = event_instant(june_first(), "23:30".parse().unwrap());
        assert!(is_upcoming(instant, datetime!(2024-06-01 23:00:00 UTC)));
    }

    #[test]
    fn test_late_evening_event_is_past_after_midnight() {
        let instant = event_instant(june_first(), "23:30".parse().unwrap());
        assert!(is_past(instant, datetime!(2024-06-02 00:00:00 UTC)));
    }

    #[test]
    fn test_event_starting_exactly_now_is_past() {
        let instant = event_instant(june_first(), "12:00".parse().unwrap());
        let now = datetime!(2024-06-01 12:00:00 UTC);
        assert!(!is_upcoming(instant, now));
        assert!(is_past(instant, now));
    }

    #[test]
    fn test_earlier_date_with_later_time_is_still_earlier() {
        // A naive "compare times when dates differ" check gets this wrong.
        let instant = event_instant(june_first(), "23:59".parse().unwrap());
        assert!(is_past(instant, datetime!(2024-06-02 00:01:00 UTC)));
    }

    #[test]
    fn test_non_utc_now_is_compared_as_an_instant() {
        let instant = event_instant(june_first(), "10:00".parse().unwrap());
        // 11:30 at +02:00 is 09:30 UTC.
        let now = datetime!(2024-06-01 11:30:00 +02:00);
        assert!(is_upcoming(instant, now));
    }

    #[test]
    fn test_format_instant_is_fixed_width_utc() {
        let rendered = format_instant(datetime!(2024-06-01 21:30:00 -02:00)).unwrap();
        assert_eq!(rendered, "2024-06-01T23:30:00Z");
    }

    #[test]
    fn test_rendered_instants_sort_chronologically() {
        let a = format_instant(datetime!(2024-06-01 23:30:00 UTC)).unwrap();
        let b = format_instant(datetime!(2024-06-02 00:15:00 UTC)).unwrap();
        let c = format_instant(datetime!(2024-12-01 08:00:00 UTC)).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_parse_instant_reverses_format_instant() {
        let instant = datetime!(2025-03-09 07:05:00 UTC);
        let parsed = parse_instant(&format_instant(instant).unwrap()).unwrap();
        assert_eq!(parsed, instant);
    }

    #[test]
    fn test_whole_second_round_trips_through_the_store_format() {
        let instant = datetime!(2024-06-01 23:00:00.734 UTC);
        let truncated = whole_second(instant).unwrap();
        assert_eq!(truncated, datetime!(2024-06-01 23:00:00 UTC));
        assert_eq!(parse_instant(&format_instant(instant).unwrap()).unwrap(), truncated);
    }

    #[test]
    fn test_parse_event_date_rejects_impossible_dates() {
        assert!(parse_event_date("2024-02-30").is_err());
        assert!(parse_event_date("06/01/2024").is_err());
        assert!(parse_event_date("").is_err());
    }

    #[test]
    fn test_format_event_date() {
        assert_eq!(format_event_date(june_first()).unwrap(), "2024-06-01");
    }
}
