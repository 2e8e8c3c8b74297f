// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the booking apply path: actor checks, date validation and
//! overlap rejection.

use super::helpers::{
    LESSEE_ID, LESSOR_ID, TEST_TIMESTAMP, create_test_offer, day, june_range, lessee_block,
    lessor_block,
};
use crate::{Command, CoreError, apply_booking};
use lendit_chat::MessageType;
use lendit_domain::{DomainError, RequestStatus};

fn book_command(from_dom: u8, to_dom: u8) -> Command {
    Command::BookOffer {
        offer_id: 10,
        date_range: june_range(from_dom, to_dom),
        message: String::from("hi"),
    }
}

#[test]
fn test_booking_creates_open_request_and_chat_message() {
    let offer = create_test_offer();
    let result = apply_booking(
        &offer,
        &[],
        LESSEE_ID,
        book_command(1, 5),
        day(2026, 5, 1),
        TEST_TIMESTAMP,
    )
    .unwrap();

    assert_eq!(result.request.status, RequestStatus::Open);
    assert_eq!(result.request.offer_id, 10);
    assert_eq!(result.request.lessee_id, LESSEE_ID);
    assert!(result.request.qr_code.is_none());
    assert!(result.request.lessor_has_update);
    assert!(!result.request.lessee_has_update);

    assert_eq!(result.system_message.from_user_id, LESSEE_ID);
    assert_eq!(result.system_message.to_user_id, LESSOR_ID);
    assert_eq!(result.system_message.message_type, MessageType::OfferRequest);
}

#[test]
fn test_lessor_cannot_book_own_offer() {
    let offer = create_test_offer();
    let result = apply_booking(
        &offer,
        &[],
        LESSOR_ID,
        book_command(1, 5),
        day(2026, 5, 1),
        TEST_TIMESTAMP,
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::OwnOfferBooking))
    );
}

#[test]
fn test_booking_in_the_past_rejected() {
    let offer = create_test_offer();
    let result = apply_booking(
        &offer,
        &[],
        LESSEE_ID,
        book_command(1, 5),
        day(2026, 6, 3),
        TEST_TIMESTAMP,
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::PastDate { .. }))
    ));
}

#[test]
fn test_booking_rejected_on_lessor_block_overlap() {
    let offer = create_test_offer();
    let result = apply_booking(
        &offer,
        &[lessor_block(4, 8)],
        LESSEE_ID,
        book_command(1, 5),
        day(2026, 5, 1),
        TEST_TIMESTAMP,
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::OverlappingInterval { .. }
        ))
    ));
}

#[test]
fn test_booking_rejected_on_lessee_block_overlap() {
    let offer = create_test_offer();
    let result = apply_booking(
        &offer,
        &[lessee_block(3, 4)],
        LESSEE_ID,
        book_command(3, 4),
        day(2026, 5, 1),
        TEST_TIMESTAMP,
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::OverlappingInterval { .. }
        ))
    ));
}

#[test]
fn test_booking_succeeds_next_to_existing_block() {
    let offer = create_test_offer();
    let result = apply_booking(
        &offer,
        &[lessee_block(6, 9)],
        LESSEE_ID,
        book_command(1, 5),
        day(2026, 5, 1),
        TEST_TIMESTAMP,
    );

    assert!(result.is_ok());
}

#[test]
fn test_booking_with_transition_command_is_internal_error() {
    let offer = create_test_offer();
    let result = apply_booking(
        &offer,
        &[],
        LESSEE_ID,
        Command::TimeOutRequest { request_id: 1 },
        day(2026, 5, 1),
        TEST_TIMESTAMP,
    );

    assert!(matches!(result, Err(CoreError::Internal(_))));
}
