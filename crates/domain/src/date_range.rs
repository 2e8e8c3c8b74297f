// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar-day date ranges and blocked-interval conflict detection.
//!
//! Availability is tracked at day granularity. All ranges are inclusive on
//! both endpoints, and any time-of-day component supplied by a caller is
//! discarded at the parsing boundary.
//!
//! ## Invariants
//!
//! - `from_date <= to_date` for every constructed range
//! - Ranges are compared with an inclusive, symmetric containment check:
//!   two ranges overlap iff they share at least one calendar day
//! - Past-date validation is explicit and takes the current day as input,
//!   keeping this module pure and deterministic

use crate::error::DomainError;
use crate::types::BlockedInterval;
use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

/// An inclusive calendar-day interval.
///
/// Construction validates ordering, so every `DateRange` in the system
/// satisfies `from_date <= to_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    from_date: Date,
    to_date: Date,
}

impl DateRange {
    /// Creates a new `DateRange`.
    ///
    /// # Arguments
    ///
    /// * `from_date` - The first blocked day (inclusive)
    /// * `to_date` - The last blocked day (inclusive)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `from_date > to_date`.
    pub fn new(from_date: Date, to_date: Date) -> Result<Self, DomainError> {
        if from_date > to_date {
            return Err(DomainError::InvalidDateRange {
                reason: format!("from_date {from_date} is after to_date {to_date}"),
            });
        }
        Ok(Self { from_date, to_date })
    }

    /// Returns the first day of the range.
    #[must_use]
    pub const fn from_date(&self) -> Date {
        self.from_date
    }

    /// Returns the last day of the range.
    #[must_use]
    pub const fn to_date(&self) -> Date {
        self.to_date
    }

    /// Validates that neither endpoint precedes the given current day.
    ///
    /// # Arguments
    ///
    /// * `today` - The current calendar day
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PastDate` naming the first offending endpoint.
    pub fn validate_not_past(&self, today: Date) -> Result<(), DomainError> {
        if self.from_date < today {
            return Err(DomainError::PastDate {
                date: self.from_date,
            });
        }
        if self.to_date < today {
            return Err(DomainError::PastDate { date: self.to_date });
        }
        Ok(())
    }

    /// Returns true if the given day falls within this range (inclusive).
    #[must_use]
    pub fn contains_day(&self, day: Date) -> bool {
        self.from_date <= day && day <= self.to_date
    }

    /// Returns true if this range shares at least one calendar day with `other`.
    ///
    /// The check is the symmetric inclusive containment test: an endpoint of
    /// either range falling within the other constitutes an overlap. Ranges
    /// that merely touch without sharing a day do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        other.contains_day(self.from_date)
            || other.contains_day(self.to_date)
            || self.contains_day(other.from_date)
            || self.contains_day(other.to_date)
    }
}

/// Parses a calendar day from a string, discarding any time-of-day component.
///
/// Accepts plain `YYYY-MM-DD` values as well as full ISO 8601 datetimes,
/// from which only the leading date is used. This is the typed parsing
/// boundary: malformed input is rejected here and never reaches the core.
///
/// # Arguments
///
/// * `value` - The date string to parse
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string does not begin with a
/// valid `YYYY-MM-DD` date.
pub fn parse_calendar_day(value: &str) -> Result<Date, DomainError> {
    let format = format_description!("[year]-[month]-[day]");
    let day_part: &str = value.get(..10).unwrap_or(value);

    Date::parse(day_part, &format).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Returns true if the candidate range overlaps ANY of the given intervals.
///
/// Both lessor-tagged and lessee-tagged intervals count: a manual block and
/// a confirmed booking are equally unavailable.
#[must_use]
pub fn conflicts_with_any(candidate: &DateRange, existing: &[BlockedInterval]) -> bool {
    existing
        .iter()
        .any(|interval| candidate.overlaps(&interval.range))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(year: i32, month: u8, dom: u8) -> Date {
        Date::from_calendar_date(year, time::Month::try_from(month).unwrap(), dom).unwrap()
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = DateRange::new(day(2026, 6, 5), day(2026, 6, 1));
        assert!(result.is_err());
    }

    #[test]
    fn test_single_day_range_valid() {
        let range = DateRange::new(day(2026, 6, 1), day(2026, 6, 1)).unwrap();
        assert_eq!(range.from_date(), range.to_date());
    }

    #[test]
    fn test_validate_not_past() {
        let today = day(2026, 6, 3);
        let past = DateRange::new(day(2026, 6, 1), day(2026, 6, 5)).unwrap();
        let future = DateRange::new(day(2026, 6, 3), day(2026, 6, 5)).unwrap();

        assert_eq!(
            past.validate_not_past(today),
            Err(DomainError::PastDate {
                date: day(2026, 6, 1)
            })
        );
        assert!(future.validate_not_past(today).is_ok());
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = DateRange::new(day(2026, 6, 1), day(2026, 6, 5)).unwrap();
        let b = DateRange::new(day(2026, 6, 3), day(2026, 6, 9)).unwrap();

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_containment_counts_as_overlap() {
        let outer = DateRange::new(day(2026, 6, 1), day(2026, 6, 30)).unwrap();
        let inner = DateRange::new(day(2026, 6, 10), day(2026, 6, 12)).unwrap();

        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_shared_boundary_day_overlaps() {
        let a = DateRange::new(day(2026, 6, 1), day(2026, 6, 5)).unwrap();
        let b = DateRange::new(day(2026, 6, 5), day(2026, 6, 8)).unwrap();

        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let a = DateRange::new(day(2026, 6, 1), day(2026, 6, 5)).unwrap();
        let b = DateRange::new(day(2026, 6, 6), day(2026, 6, 8)).unwrap();

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_parse_calendar_day_plain_date() {
        let parsed = parse_calendar_day("2026-06-01").unwrap();
        assert_eq!(parsed, day(2026, 6, 1));
    }

    #[test]
    fn test_parse_calendar_day_discards_time_of_day() {
        let parsed = parse_calendar_day("2026-06-01T14:30:00Z").unwrap();
        assert_eq!(parsed, day(2026, 6, 1));
    }

    #[test]
    fn test_parse_calendar_day_rejects_garbage() {
        assert!(parse_calendar_day("not-a-date").is_err());
        assert!(parse_calendar_day("2026-13-01").is_err());
        assert!(parse_calendar_day("").is_err());
    }

    #[test]
    fn test_conflicts_with_any_checks_both_actor_tags() {
        let candidate = DateRange::new(day(2026, 6, 3), day(2026, 6, 4)).unwrap();
        let lessor_block = BlockedInterval::new(
            1,
            DateRange::new(day(2026, 6, 1), day(2026, 6, 2)).unwrap(),
            true,
            None,
        );
        let lessee_block = BlockedInterval::new(
            1,
            DateRange::new(day(2026, 6, 4), day(2026, 6, 7)).unwrap(),
            false,
            None,
        );

        assert!(!conflicts_with_any(
            &candidate,
            std::slice::from_ref(&lessor_block)
        ));
        assert!(conflicts_with_any(
            &candidate,
            &[lessor_block, lessee_block]
        ));
    }
}
