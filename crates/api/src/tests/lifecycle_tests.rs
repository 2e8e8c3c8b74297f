// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end lifecycle tests through the API boundary: acceptance with
//! calendar blocking, code retrieval and rotation, return, and the timeout
//! sweep.

use super::helpers::{
    create_test_offer, create_test_persistence, create_test_users, june_booking,
};
use crate::error::ApiError;
use crate::handlers::{
    book_offer, get_request, handle_request, list_blocked_dates, list_requests,
    sweep_request_timeouts,
};
use crate::request_response::HandleRequestRequest;
use lendit_domain::RequestStatus;

fn transition(status: RequestStatus, qr_code: Option<String>) -> HandleRequestRequest {
    HandleRequestRequest {
        status: status.code(),
        qr_code,
    }
}

#[test]
fn test_acceptance_blocks_calendar_and_blanks_code() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);

    let booked = book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();
    let accepted = handle_request(
        &mut persistence,
        &lessor,
        booked.request_id,
        transition(RequestStatus::AcceptedByLessor, None),
    )
    .unwrap();

    assert_eq!(accepted.status, RequestStatus::AcceptedByLessor.code());
    // The code is persisted but never echoed back after a transition.
    assert!(accepted.qr_code.is_none());

    let intervals = list_blocked_dates(&mut persistence, offer_id).unwrap();
    assert_eq!(intervals.len(), 1);
    assert!(!intervals[0].is_lessor);
    assert_eq!(intervals[0].from_date, "2030-06-01");
    assert_eq!(intervals[0].to_date, "2030-06-05");
}

#[test]
fn test_lessee_reads_code_lessor_read_is_redacted() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);

    let booked = book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();
    handle_request(
        &mut persistence,
        &lessor,
        booked.request_id,
        transition(RequestStatus::AcceptedByLessor, None),
    )
    .unwrap();

    let lessee_view = get_request(&mut persistence, &lessee, booked.request_id).unwrap();
    assert!(lessee_view.qr_code.is_some());

    let lessor_view = get_request(&mut persistence, &lessor, booked.request_id).unwrap();
    assert!(lessor_view.qr_code.is_none());
}

#[test]
fn test_full_handoff_walkthrough_with_code_rotation() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);

    let booked = book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();
    handle_request(
        &mut persistence,
        &lessor,
        booked.request_id,
        transition(RequestStatus::AcceptedByLessor, None),
    )
    .unwrap();

    // The lessee holds the pickup code and shows it at hand-off; the lessor
    // presents it to the API.
    let pickup_code = get_request(&mut persistence, &lessee, booked.request_id)
        .unwrap()
        .qr_code
        .unwrap();

    let lent = handle_request(
        &mut persistence,
        &lessor,
        booked.request_id,
        transition(RequestStatus::ItemLentToLessee, Some(pickup_code.clone())),
    )
    .unwrap();
    assert_eq!(lent.status, RequestStatus::ItemLentToLessee.code());
    assert!(lent.qr_code.is_none());

    // The code rotated: the old value is no longer accepted for the return.
    let replay = handle_request(
        &mut persistence,
        &lessee,
        booked.request_id,
        transition(RequestStatus::ItemReturnedToLessor, Some(pickup_code)),
    );
    assert!(matches!(replay, Err(ApiError::Conflict { .. })));

    let return_code = get_request(&mut persistence, &lessee, booked.request_id)
        .unwrap()
        .qr_code
        .unwrap();

    let returned = handle_request(
        &mut persistence,
        &lessee,
        booked.request_id,
        transition(RequestStatus::ItemReturnedToLessor, Some(return_code)),
    )
    .unwrap();
    assert_eq!(returned.status, RequestStatus::ItemReturnedToLessor.code());
    assert!(returned.qr_code.is_none());
}

#[test]
fn test_wrong_code_is_rejected_at_handoff() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);

    let booked = book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();
    handle_request(
        &mut persistence,
        &lessor,
        booked.request_id,
        transition(RequestStatus::AcceptedByLessor, None),
    )
    .unwrap();

    let result = handle_request(
        &mut persistence,
        &lessor,
        booked.request_id,
        transition(
            RequestStatus::ItemLentToLessee,
            Some(String::from("wrong-code")),
        ),
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_rejection_is_terminal() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);

    let booked = book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();
    handle_request(
        &mut persistence,
        &lessor,
        booked.request_id,
        transition(RequestStatus::RejectedByLessor, None),
    )
    .unwrap();

    let result = handle_request(
        &mut persistence,
        &lessor,
        booked.request_id,
        transition(RequestStatus::AcceptedByLessor, None),
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_read_flags_follow_transitions_and_reads() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);

    let booked = book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();

    // The booking is news for the lessor, not for the lessee who made it.
    let lessor_list = list_requests(&mut persistence, &lessor).unwrap();
    assert_eq!(lessor_list.requests.len(), 1);
    assert!(lessor_list.requests[0].is_lessor_side);
    assert!(lessor_list.requests[0].has_update);

    let lessee_list = list_requests(&mut persistence, &lessee).unwrap();
    assert!(!lessee_list.requests[0].has_update);

    // Listing does not mark anything as seen.
    let lessor_list_again = list_requests(&mut persistence, &lessor).unwrap();
    assert!(lessor_list_again.requests[0].has_update);

    // Reading the request clears the reading side only.
    get_request(&mut persistence, &lessor, booked.request_id).unwrap();
    let after_read = list_requests(&mut persistence, &lessor).unwrap();
    assert!(!after_read.requests[0].has_update);

    // A lessor decision is news for the lessee.
    handle_request(
        &mut persistence,
        &lessor,
        booked.request_id,
        transition(RequestStatus::AcceptedByLessor, None),
    )
    .unwrap();
    let lessee_after = list_requests(&mut persistence, &lessee).unwrap();
    assert!(lessee_after.requests[0].has_update);
}

#[test]
fn test_timeout_sweep_times_out_stale_open_requests() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);

    let booked = book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();

    // Threshold zero: everything older than "now" is stale.
    let swept = sweep_request_timeouts(&mut persistence, 0).unwrap();
    assert_eq!(swept.timed_out_request_ids, vec![booked.request_id]);

    let stored = get_request(&mut persistence, &lessee, booked.request_id).unwrap();
    assert_eq!(stored.status, RequestStatus::TimedOut.code());

    // The sweep is idempotent: a second pass finds nothing open.
    let second = sweep_request_timeouts(&mut persistence, 0).unwrap();
    assert!(second.timed_out_request_ids.is_empty());
}

#[test]
fn test_timeout_sweep_ignores_decided_requests() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);

    let booked = book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();
    handle_request(
        &mut persistence,
        &lessor,
        booked.request_id,
        transition(RequestStatus::AcceptedByLessor, None),
    )
    .unwrap();

    let swept = sweep_request_timeouts(&mut persistence, 0).unwrap();
    assert!(swept.timed_out_request_ids.is_empty());
}
