// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for booking and transition persistence.

use super::helpers::{
    create_test_accounts, create_test_offer, create_test_persistence, june_range, open_request,
};
use lendit::{CalendarEffect, TransitionResult};
use lendit_chat::SystemMessage;
use lendit_domain::{BlockedInterval, RequestStatus};

#[test]
fn test_persist_booking_writes_request_and_chat_opener() {
    let mut persistence = create_test_persistence();
    let (lessor_id, lessee_id) = create_test_accounts(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, lessor_id);

    let request = open_request(offer_id, lessee_id, june_range(1, 5));
    let message = SystemMessage::offer_request(lessee_id, lessor_id);

    let request_id = persistence.persist_booking(&request, &message).unwrap();

    let stored = persistence.get_request(request_id).unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::Open);
    assert_eq!(stored.offer_id, offer_id);
    assert_eq!(stored.date_range, june_range(1, 5));
    assert!(stored.qr_code.is_none());

    let messages = persistence.list_messages_for_request(request_id).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].from_account_id, lessee_id);
    assert_eq!(messages[0].to_account_id, lessor_id);
    assert_eq!(messages[0].message_type, "offer_request");
}

#[test]
fn test_persist_transition_updates_row_and_blocks_calendar() {
    let mut persistence = create_test_persistence();
    let (lessor_id, lessee_id) = create_test_accounts(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, lessor_id);

    let request = open_request(offer_id, lessee_id, june_range(1, 5));
    let message = SystemMessage::offer_request(lessee_id, lessor_id);
    let request_id = persistence.persist_booking(&request, &message).unwrap();

    let mut accepted = persistence.get_request(request_id).unwrap().unwrap();
    accepted.status = RequestStatus::AcceptedByLessor;
    accepted.qr_code = Some(String::from("code-1"));
    accepted.lessee_has_update = true;
    accepted.lessor_has_update = false;

    let result = TransitionResult {
        new_request: accepted,
        calendar_effect: CalendarEffect::BlockRange(BlockedInterval::new(
            offer_id,
            june_range(1, 5),
            false,
            Some(format!("Booking request {request_id}")),
        )),
    };
    persistence.persist_transition(&result).unwrap();

    let stored = persistence.get_request(request_id).unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::AcceptedByLessor);
    assert_eq!(stored.qr_code.as_deref(), Some("code-1"));
    assert!(stored.lessee_has_update);

    let intervals = persistence.list_intervals_for_offer(offer_id).unwrap();
    assert_eq!(intervals.len(), 1);
    assert!(!intervals[0].is_lessor);
    assert_eq!(intervals[0].range, june_range(1, 5));
}

#[test]
fn test_mark_request_seen_clears_only_one_side() {
    let mut persistence = create_test_persistence();
    let (lessor_id, lessee_id) = create_test_accounts(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, lessor_id);

    let request = open_request(offer_id, lessee_id, june_range(1, 5));
    let message = SystemMessage::offer_request(lessee_id, lessor_id);
    let request_id = persistence.persist_booking(&request, &message).unwrap();

    persistence.mark_request_seen(request_id, true).unwrap();

    let stored = persistence.get_request(request_id).unwrap().unwrap();
    assert!(!stored.lessor_has_update);
    assert!(!stored.lessee_has_update);
}

#[test]
fn test_replace_lessor_intervals_keeps_lessee_blocks() {
    let mut persistence = create_test_persistence();
    let (lessor_id, _) = create_test_accounts(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, lessor_id);

    persistence
        .insert_interval(&BlockedInterval::new(offer_id, june_range(1, 2), true, None))
        .unwrap();
    persistence
        .insert_interval(&BlockedInterval::new(offer_id, june_range(10, 12), false, None))
        .unwrap();

    persistence
        .replace_lessor_intervals(
            offer_id,
            &[BlockedInterval::new(
                offer_id,
                june_range(20, 22),
                true,
                Some(String::from("vacation")),
            )],
        )
        .unwrap();

    let intervals = persistence.list_intervals_for_offer(offer_id).unwrap();
    assert_eq!(intervals.len(), 2);
    assert!(intervals.iter().any(|i| !i.is_lessor && i.range == june_range(10, 12)));
    assert!(intervals.iter().any(|i| i.is_lessor && i.range == june_range(20, 22)));
}

#[test]
fn test_stale_open_request_listing() {
    let mut persistence = create_test_persistence();
    let (lessor_id, lessee_id) = create_test_accounts(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, lessor_id);

    let request = open_request(offer_id, lessee_id, june_range(1, 5));
    let message = SystemMessage::offer_request(lessee_id, lessor_id);
    let request_id = persistence.persist_booking(&request, &message).unwrap();

    // Created at 2026-05-01; a cutoff after that finds it, one before does not.
    let stale = persistence
        .list_stale_open_requests("2026-05-04T00:00:00Z")
        .unwrap();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].request_id, Some(request_id));

    let none = persistence
        .list_stale_open_requests("2026-04-01T00:00:00Z")
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_soft_delete_offer_clears_calendar_but_keeps_record() {
    let mut persistence = create_test_persistence();
    let (lessor_id, _) = create_test_accounts(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, lessor_id);

    persistence
        .insert_interval(&BlockedInterval::new(offer_id, june_range(1, 2), true, None))
        .unwrap();

    persistence.soft_delete_offer(offer_id).unwrap();

    let offer = persistence.get_offer(offer_id).unwrap().unwrap();
    assert!(offer.is_deleted);
    assert!(persistence.list_intervals_for_offer(offer_id).unwrap().is_empty());
    assert!(persistence.list_offers(None, None).unwrap().is_empty());
}
