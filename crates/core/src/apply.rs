// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{BookingResult, CalendarEffect, TransitionResult};
use lendit_chat::SystemMessage;
use lendit_domain::{
    BlockedInterval, DomainError, Offer, RETIRED_HANDOFF_CODE, Request, RequestStatus,
    TransitionActor, conflicts_with_any, validate_booking_window, validate_transition,
};
use time::format_description::well_known::Iso8601;
use time::{Date, Duration, OffsetDateTime};

/// Applies a booking command, producing a new `Open` request and the system
/// chat message announcing it.
///
/// The offer and its current interval set are read before this call and the
/// caller holds the persistence lock across read, apply, and write, so the
/// overlap check here is the authoritative check-then-act step.
///
/// # Arguments
///
/// * `offer` - The offer being booked (already resolved, not soft-deleted)
/// * `existing_intervals` - All blocked intervals for the offer, both actor tags
/// * `lessee_id` - The authenticated actor creating the booking
/// * `command` - The `BookOffer` command to apply
/// * `today` - The current calendar day
/// * `timestamp` - The current time (ISO 8601), stamped onto the new request
///
/// # Returns
///
/// * `Ok(BookingResult)` containing the new request and chat message
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The actor is the offer's lessor
/// - The range has an endpoint in the past
/// - The range overlaps any existing blocked interval
pub fn apply_booking(
    offer: &Offer,
    existing_intervals: &[BlockedInterval],
    lessee_id: i64,
    command: Command,
    today: Date,
    timestamp: &str,
) -> Result<BookingResult, CoreError> {
    let Command::BookOffer {
        offer_id,
        date_range,
        message,
    } = command
    else {
        // Transition commands use apply_transition() instead
        return Err(CoreError::Internal(String::from(
            "apply_booking called with a non-booking command",
        )));
    };

    let resolved_offer_id: i64 = offer
        .offer_id
        .ok_or_else(|| CoreError::Internal(String::from("offer has no persisted id")))?;
    if resolved_offer_id != offer_id {
        return Err(CoreError::Internal(format!(
            "command targets offer {offer_id} but offer {resolved_offer_id} was loaded"
        )));
    }

    // Invariant: lessee != offer.lessor
    if lessee_id == offer.lessor_id {
        return Err(CoreError::DomainViolation(DomainError::OwnOfferBooking));
    }

    validate_booking_window(&date_range, today)?;

    if conflicts_with_any(&date_range, existing_intervals) {
        return Err(CoreError::DomainViolation(
            DomainError::OverlappingInterval {
                from: date_range.from_date(),
                to: date_range.to_date(),
            },
        ));
    }

    let request: Request = Request {
        request_id: None,
        offer_id: resolved_offer_id,
        lessee_id,
        status: RequestStatus::Open,
        date_range,
        message,
        qr_code: None,
        lessor_has_update: true,
        lessee_has_update: false,
        created_at: timestamp.to_string(),
        updated_at: timestamp.to_string(),
    };

    let system_message: SystemMessage = SystemMessage::offer_request(lessee_id, offer.lessor_id);

    Ok(BookingResult {
        request,
        system_message,
    })
}

/// Applies a transition command to a request, producing a new request value
/// and the calendar effect to persist alongside it.
///
/// All lifecycle guards (transition table, acting party, hand-off code) are
/// enforced via the domain layer. On acceptance the booked range is
/// re-checked against the offer's current interval set before the
/// lessee-tagged interval is produced.
///
/// # Arguments
///
/// * `request` - The current request value (immutable)
/// * `existing_intervals` - All blocked intervals for the offer
/// * `command` - The `HandleRequest` command to apply
/// * `actor` - The acting party, resolved against the offer and request
/// * `issued_code` - A freshly generated hand-off code, required for the
///   acceptance and lend transitions
/// * `timestamp` - The current time (ISO 8601)
///
/// # Returns
///
/// * `Ok(TransitionResult)` with the new request value and calendar effect
/// * `Err(CoreError)` if the transition is not permitted
///
/// # Errors
///
/// Returns an error if:
/// - The transition violates the lifecycle table or its guards
/// - Acceptance would overlap an existing blocked interval
pub fn apply_transition(
    request: &Request,
    existing_intervals: &[BlockedInterval],
    command: Command,
    actor: TransitionActor,
    issued_code: Option<String>,
    timestamp: &str,
) -> Result<TransitionResult, CoreError> {
    let Command::HandleRequest {
        request_id,
        desired_status,
        presented_code,
    } = command
    else {
        // Booking commands use apply_booking() instead
        return Err(CoreError::Internal(String::from(
            "apply_transition called with a non-transition command",
        )));
    };

    let resolved_request_id: i64 = request
        .request_id
        .ok_or_else(|| CoreError::Internal(String::from("request has no persisted id")))?;
    if resolved_request_id != request_id {
        return Err(CoreError::Internal(format!(
            "command targets request {request_id} but request {resolved_request_id} was loaded"
        )));
    }

    validate_transition(
        request.status,
        desired_status,
        actor,
        request.qr_code.as_deref(),
        presented_code.as_deref(),
    )?;

    let mut new_request: Request = request.clone();
    new_request.status = desired_status;
    new_request.updated_at = timestamp.to_string();
    match actor {
        TransitionActor::Lessor => {
            new_request.lessee_has_update = true;
            new_request.lessor_has_update = false;
        }
        TransitionActor::Lessee => {
            new_request.lessor_has_update = true;
            new_request.lessee_has_update = false;
        }
        TransitionActor::System => {
            new_request.lessor_has_update = true;
            new_request.lessee_has_update = true;
        }
    }

    let calendar_effect: CalendarEffect = match desired_status {
        RequestStatus::AcceptedByLessor => {
            if conflicts_with_any(&request.date_range, existing_intervals) {
                return Err(CoreError::DomainViolation(
                    DomainError::OverlappingInterval {
                        from: request.date_range.from_date(),
                        to: request.date_range.to_date(),
                    },
                ));
            }

            new_request.qr_code = Some(require_issued_code(issued_code, "acceptance")?);

            CalendarEffect::BlockRange(BlockedInterval::new(
                request.offer_id,
                request.date_range,
                false,
                Some(format!("Booking request {resolved_request_id}")),
            ))
        }
        RequestStatus::ItemLentToLessee => {
            // Rotate the code for the return leg; the old value is
            // invalidated by being overwritten.
            new_request.qr_code = Some(require_issued_code(issued_code, "lending")?);
            CalendarEffect::None
        }
        RequestStatus::ItemReturnedToLessor => {
            new_request.qr_code = Some(String::from(RETIRED_HANDOFF_CODE));
            CalendarEffect::None
        }
        _ => CalendarEffect::None,
    };

    Ok(TransitionResult {
        new_request,
        calendar_effect,
    })
}

/// Times out a stale open request.
///
/// This is the only time-based transition. It carries no human actor and is
/// guarded by "status is `Open` and the request is older than the threshold".
///
/// # Arguments
///
/// * `request` - The current request value
/// * `now` - The current time
/// * `threshold` - How old an open request must be before it times out
/// * `timestamp` - The current time (ISO 8601), stamped onto the new value
///
/// # Errors
///
/// Returns an error if:
/// - The request is not in the `Open` state
/// - The request is not yet older than the threshold
/// - The request's creation timestamp cannot be parsed
pub fn apply_timeout(
    request: &Request,
    now: OffsetDateTime,
    threshold: Duration,
    timestamp: &str,
) -> Result<TransitionResult, CoreError> {
    validate_transition(
        request.status,
        RequestStatus::TimedOut,
        TransitionActor::System,
        request.qr_code.as_deref(),
        None,
    )?;

    let created_at: OffsetDateTime = OffsetDateTime::parse(&request.created_at, &Iso8601::DEFAULT)
        .map_err(|e| {
            CoreError::Internal(format!(
                "failed to parse request creation timestamp '{}': {e}",
                request.created_at
            ))
        })?;

    if now - created_at <= threshold {
        return Err(CoreError::DomainViolation(DomainError::IllegalTransition {
            from: request.status.as_str().to_string(),
            to: RequestStatus::TimedOut.as_str().to_string(),
            reason: String::from("the timeout threshold has not been reached"),
        }));
    }

    let mut new_request: Request = request.clone();
    new_request.status = RequestStatus::TimedOut;
    new_request.updated_at = timestamp.to_string();
    new_request.lessor_has_update = true;
    new_request.lessee_has_update = true;

    Ok(TransitionResult {
        new_request,
        calendar_effect: CalendarEffect::None,
    })
}

/// Unwraps the issued hand-off code for transitions that must set one.
fn require_issued_code(issued_code: Option<String>, leg: &str) -> Result<String, CoreError> {
    issued_code.ok_or_else(|| {
        CoreError::Internal(format!("no hand-off code was issued for the {leg} leg"))
    })
}
