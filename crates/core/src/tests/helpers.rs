// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use lendit_domain::{
    BlockedInterval, DateRange, Offer, RatingAggregate, Request, RequestStatus,
};
use time::Date;

/// Fixed timestamp used for deterministic request construction.
pub const TEST_TIMESTAMP: &str = "2026-05-01T12:00:00Z";

pub const LESSOR_ID: i64 = 1;
pub const LESSEE_ID: i64 = 2;

pub fn day(year: i32, month: u8, dom: u8) -> Date {
    Date::from_calendar_date(year, time::Month::try_from(month).unwrap(), dom).unwrap()
}

pub fn june_range(from_dom: u8, to_dom: u8) -> DateRange {
    DateRange::new(day(2026, 6, from_dom), day(2026, 6, to_dom)).unwrap()
}

pub fn create_test_offer() -> Offer {
    Offer {
        offer_id: Some(10),
        lessor_id: LESSOR_ID,
        title: String::from("Cordless drill"),
        description: String::from("18V drill with two batteries"),
        price: 7.5,
        category_id: 3,
        rating: RatingAggregate::zero(),
        pictures: vec![String::from("drill.jpg")],
        is_deleted: false,
        created_at: String::from(TEST_TIMESTAMP),
    }
}

pub fn create_test_request(status: RequestStatus, qr_code: Option<&str>) -> Request {
    Request {
        request_id: Some(100),
        offer_id: 10,
        lessee_id: LESSEE_ID,
        status,
        date_range: june_range(1, 5),
        message: String::from("Would like to borrow this for a weekend project"),
        qr_code: qr_code.map(ToString::to_string),
        lessor_has_update: false,
        lessee_has_update: false,
        created_at: String::from(TEST_TIMESTAMP),
        updated_at: String::from(TEST_TIMESTAMP),
    }
}

pub fn lessor_block(from_dom: u8, to_dom: u8) -> BlockedInterval {
    BlockedInterval::new(10, june_range(from_dom, to_dom), true, None)
}

pub fn lessee_block(from_dom: u8, to_dom: u8) -> BlockedInterval {
    BlockedInterval::new(10, june_range(from_dom, to_dom), false, None)
}
