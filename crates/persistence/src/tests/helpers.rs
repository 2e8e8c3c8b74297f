// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::Persistence;
use lendit_domain::{DateRange, Offer, RatingAggregate, Request, RequestStatus};
use time::Date;

pub const TEST_TIMESTAMP: &str = "2026-05-01T12:00:00Z";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn day(year: i32, month: u8, dom: u8) -> Date {
    Date::from_calendar_date(year, time::Month::try_from(month).unwrap(), dom).unwrap()
}

pub fn june_range(from_dom: u8, to_dom: u8) -> DateRange {
    DateRange::new(day(2026, 6, from_dom), day(2026, 6, to_dom)).unwrap()
}

/// Creates a lessor and a lessee account; returns their ids.
pub fn create_test_accounts(persistence: &mut Persistence) -> (i64, i64) {
    let lessor_id = persistence
        .create_account("lessor@example.com", "Lena Lessor", "secret-pw-1", TEST_TIMESTAMP)
        .expect("Failed to create lessor");
    let lessee_id = persistence
        .create_account("lessee@example.com", "Theo Lessee", "secret-pw-2", TEST_TIMESTAMP)
        .expect("Failed to create lessee");
    (lessor_id, lessee_id)
}

/// Inserts a test offer owned by the given lessor; returns its id.
pub fn create_test_offer(persistence: &mut Persistence, lessor_id: i64) -> i64 {
    let offer = Offer {
        offer_id: None,
        lessor_id,
        title: String::from("Cordless drill"),
        description: String::from("18V drill with two batteries"),
        price: 7.5,
        category_id: 3,
        rating: RatingAggregate::zero(),
        pictures: vec![String::from("drill.jpg")],
        is_deleted: false,
        created_at: String::from(TEST_TIMESTAMP),
    };
    persistence.insert_offer(&offer).expect("Failed to insert offer")
}

/// Builds an unpersisted open request for the given offer and lessee.
pub fn open_request(offer_id: i64, lessee_id: i64, range: DateRange) -> Request {
    Request {
        request_id: None,
        offer_id,
        lessee_id,
        status: RequestStatus::Open,
        date_range: range,
        message: String::from("hello"),
        qr_code: None,
        lessor_has_update: true,
        lessee_has_update: false,
        created_at: String::from(TEST_TIMESTAMP),
        updated_at: String::from(TEST_TIMESTAMP),
    }
}
