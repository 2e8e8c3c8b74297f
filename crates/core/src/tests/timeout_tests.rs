// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the system-initiated timeout transition.

use super::helpers::create_test_request;
use crate::{CalendarEffect, CoreError, apply_timeout};
use lendit_domain::{DomainError, RequestStatus};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};

fn parse_ts(value: &str) -> OffsetDateTime {
    OffsetDateTime::parse(value, &Iso8601::DEFAULT).unwrap()
}

#[test]
fn test_stale_open_request_times_out() {
    let request = create_test_request(RequestStatus::Open, None);
    // Request was created 2026-05-01T12:00:00Z; five days later it is stale
    // against a 72 hour threshold.
    let now = parse_ts("2026-05-06T12:00:00Z");

    let result = apply_timeout(&request, now, Duration::hours(72), "2026-05-06T12:00:00Z").unwrap();

    assert_eq!(result.new_request.status, RequestStatus::TimedOut);
    assert_eq!(result.calendar_effect, CalendarEffect::None);
    assert!(result.new_request.lessor_has_update);
    assert!(result.new_request.lessee_has_update);
}

#[test]
fn test_fresh_open_request_is_not_timed_out() {
    let request = create_test_request(RequestStatus::Open, None);
    let now = parse_ts("2026-05-02T12:00:00Z");

    let result = apply_timeout(&request, now, Duration::hours(72), "2026-05-02T12:00:00Z");

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::IllegalTransition { .. }
        ))
    ));
}

#[test]
fn test_non_open_request_is_never_timed_out() {
    let statuses = vec![
        RequestStatus::AcceptedByLessor,
        RequestStatus::RejectedByLessor,
        RequestStatus::ItemLentToLessee,
        RequestStatus::ItemReturnedToLessor,
        RequestStatus::CanceledByLessee,
        RequestStatus::TimedOut,
    ];
    let now = parse_ts("2026-07-01T12:00:00Z");

    for status in statuses {
        let request = create_test_request(status, None);
        let result = apply_timeout(&request, now, Duration::hours(72), "2026-07-01T12:00:00Z");
        assert!(result.is_err(), "status {status} must not time out");
    }
}
