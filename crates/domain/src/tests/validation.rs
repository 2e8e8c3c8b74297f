// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used)]

use crate::{DateRange, DomainError, validate_booking_window, validate_offer_fields};
use time::Date;

fn day(year: i32, month: u8, dom: u8) -> Date {
    Date::from_calendar_date(year, time::Month::try_from(month).unwrap(), dom).unwrap()
}

#[test]
fn test_valid_offer_fields() {
    assert!(validate_offer_fields("Cordless drill", 12.5).is_ok());
}

#[test]
fn test_empty_title_rejected() {
    let result = validate_offer_fields("", 12.5);
    assert!(matches!(result, Err(DomainError::InvalidTitle(_))));

    let result = validate_offer_fields("   ", 12.5);
    assert!(matches!(result, Err(DomainError::InvalidTitle(_))));
}

#[test]
fn test_non_positive_price_rejected() {
    assert!(matches!(
        validate_offer_fields("Cordless drill", 0.0),
        Err(DomainError::InvalidPrice(_))
    ));
    assert!(matches!(
        validate_offer_fields("Cordless drill", -3.0),
        Err(DomainError::InvalidPrice(_))
    ));
    assert!(matches!(
        validate_offer_fields("Cordless drill", f64::NAN),
        Err(DomainError::InvalidPrice(_))
    ));
}

#[test]
fn test_booking_window_in_the_past_rejected() {
    let today = day(2026, 6, 3);
    let range = DateRange::new(day(2026, 6, 1), day(2026, 6, 5)).unwrap();

    assert!(validate_booking_window(&range, today).is_err());
}

#[test]
fn test_booking_window_starting_today_accepted() {
    let today = day(2026, 6, 3);
    let range = DateRange::new(day(2026, 6, 3), day(2026, 6, 5)).unwrap();

    assert!(validate_booking_window(&range, today).is_ok());
}
