// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for rating eligibility, bounds, duplicates, and aggregate
//! recomputation through the API boundary.

use super::helpers::{
    create_test_offer, create_test_persistence, create_test_users, june_booking,
    register_test_account,
};
use crate::error::ApiError;
use crate::handlers::{
    book_offer, delete_offer_rating, get_account, get_offer, rate_offer, rate_user,
    update_offer_rating,
};
use crate::request_response::RateRequest;

fn rating(value: i32) -> RateRequest {
    RateRequest {
        rating: value,
        headline: None,
        text: None,
    }
}

#[test]
fn test_rating_without_any_request_is_forbidden() {
    // No booking request connects the account to the offer yet.
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);

    let result = rate_offer(&mut persistence, &lessee, offer_id, rating(4));

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_any_request_status_qualifies_for_rating() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);

    // An open request is enough; no completed transaction is required here.
    book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();

    let response = rate_offer(&mut persistence, &lessee, offer_id, rating(4)).unwrap();
    assert_eq!(response.rating, 4);
    assert_eq!(response.aggregate_count, 1);
    assert!((response.aggregate_mean - 4.0).abs() < f64::EPSILON);

    let offer = get_offer(&mut persistence, offer_id).unwrap();
    assert_eq!(offer.rating_count, 1);
}

#[test]
fn test_zero_rating_is_rejected_as_invalid_input() {
    // The lower bound is excluded: 0 is invalid against (0, 5].
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);
    book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();

    let result = rate_offer(&mut persistence, &lessee, offer_id, rating(0));
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));

    let result = rate_offer(&mut persistence, &lessee, offer_id, rating(6));
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));

    let result = rate_offer(&mut persistence, &lessee, offer_id, rating(5));
    assert!(result.is_ok());
}

#[test]
fn test_text_without_headline_is_rejected() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);
    book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();

    let result = rate_offer(
        &mut persistence,
        &lessee,
        offer_id,
        RateRequest {
            rating: 4,
            headline: None,
            text: Some(String::from("Worked great")),
        },
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_lessor_cannot_rate_own_offer() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);
    book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();

    let result = rate_offer(&mut persistence, &lessor, offer_id, rating(5));

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_second_rating_by_same_account_is_forbidden() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);
    book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();

    rate_offer(&mut persistence, &lessee, offer_id, rating(4)).unwrap();
    let second = rate_offer(&mut persistence, &lessee, offer_id, rating(5));

    assert!(matches!(second, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_update_falls_back_to_create() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);
    book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();

    // No rating exists yet; the update creates one.
    let created = update_offer_rating(&mut persistence, &lessee, offer_id, rating(3)).unwrap();
    assert_eq!(created.aggregate_count, 1);

    // A later update modifies the same rating.
    let updated = update_offer_rating(&mut persistence, &lessee, offer_id, rating(5)).unwrap();
    assert_eq!(updated.rating_id, created.rating_id);
    assert_eq!(updated.aggregate_count, 1);
    assert!((updated.aggregate_mean - 5.0).abs() < f64::EPSILON);
}

#[test]
fn test_delete_then_rerate_restores_aggregate() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let offer_id = create_test_offer(&mut persistence, &lessor);
    book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();

    rate_offer(&mut persistence, &lessee, offer_id, rating(3)).unwrap();
    let before = get_offer(&mut persistence, offer_id).unwrap();

    let cleared = delete_offer_rating(&mut persistence, &lessee, offer_id).unwrap();
    assert_eq!(cleared.aggregate_count, 0);
    assert!((cleared.aggregate_mean - 0.0).abs() < f64::EPSILON);

    rate_offer(&mut persistence, &lessee, offer_id, rating(3)).unwrap();
    let after = get_offer(&mut persistence, offer_id).unwrap();

    assert_eq!(before.rating_count, after.rating_count);
    assert!((before.rating_mean - after.rating_mean).abs() < f64::EPSILON);
}

#[test]
fn test_aggregate_is_mean_over_all_raters() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);
    let third = register_test_account(&mut persistence, "third@example.com", "Uma User");
    let offer_id = create_test_offer(&mut persistence, &lessor);

    book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();
    book_offer(&mut persistence, &third, offer_id, june_booking(10, 12)).unwrap();

    rate_offer(&mut persistence, &lessee, offer_id, rating(2)).unwrap();
    let response = rate_offer(&mut persistence, &third, offer_id, rating(5)).unwrap();

    assert_eq!(response.aggregate_count, 2);
    assert!((response.aggregate_mean - 3.5).abs() < f64::EPSILON);
}

#[test]
fn test_user_rating_requires_shared_request() {
    let mut persistence = create_test_persistence();
    let (lessor, lessee) = create_test_users(&mut persistence);

    let result = rate_user(&mut persistence, &lessee, lessor.account_id, rating(5));
    assert!(matches!(result, Err(ApiError::Forbidden { .. })));

    // After a booking, both directions qualify.
    let offer_id = create_test_offer(&mut persistence, &lessor);
    book_offer(&mut persistence, &lessee, offer_id, june_booking(1, 5)).unwrap();

    rate_user(&mut persistence, &lessee, lessor.account_id, rating(5)).unwrap();
    rate_user(&mut persistence, &lessor, lessee.account_id, rating(4)).unwrap();

    let lessor_profile = get_account(&mut persistence, lessor.account_id).unwrap();
    assert_eq!(lessor_profile.rating_count, 1);
    assert!((lessor_profile.rating_mean - 5.0).abs() < f64::EPSILON);
}

#[test]
fn test_account_cannot_rate_itself() {
    let mut persistence = create_test_persistence();
    let (_, lessee) = create_test_users(&mut persistence);

    let result = rate_user(&mut persistence, &lessee, lessee.account_id, rating(5));

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}
