// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers compose the core transition functions with the persistence
//! layer: authorize, translate the DTO into typed values, apply the core
//! transition, persist atomically, and return a sanitized response.

use time::format_description::well_known::Iso8601;
use time::{Date, Duration, OffsetDateTime};
use tracing::info;

use crate::auth::{AuthenticatedUser, generate_handoff_code};
use crate::error::{ApiError, map_persistence_error, translate_core_error, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AccountResponse, BookOfferRequest, ChatMessageResponse, DeleteRatingResponse,
    HandleRequestRequest, IntervalResponse, ListRequestsResponse, OfferInput, OfferResponse,
    RateRequest, RatingResponse, RegisterAccountRequest, RequestListItem, RequestResponse,
    SetBlockedDatesRequest, SweepTimeoutsResponse,
};
use lendit::{
    BookingResult, Command, TransitionResult, apply_booking, apply_timeout, apply_transition,
    resolve_transition_actor,
};
use lendit_domain::{
    BlockedInterval, DateRange, Offer, Rating, RatingAggregate, Request, RequestStatus,
    TransitionActor, parse_calendar_day, validate_offer_fields, validate_rating_value,
    validate_review_fields,
};
use lendit_persistence::{AccountData, Persistence};

// ============================================================================
// Time & conversion helpers
// ============================================================================

fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Iso8601::DEFAULT).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn now_timestamp() -> Result<String, ApiError> {
    format_timestamp(OffsetDateTime::now_utc())
}

fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Converts an account into its public response form.
#[must_use]
pub fn account_to_response(account: &AccountData) -> AccountResponse {
    AccountResponse {
        account_id: account.account_id,
        email: account.email.clone(),
        display_name: account.display_name.clone(),
        rating_mean: account.rating_mean,
        rating_count: account.rating_count,
    }
}

fn offer_to_response(offer: &Offer) -> Result<OfferResponse, ApiError> {
    let offer_id: i64 = offer.offer_id.ok_or_else(|| ApiError::Internal {
        message: String::from("offer has no persisted id"),
    })?;

    Ok(OfferResponse {
        offer_id,
        lessor_id: offer.lessor_id,
        title: offer.title.clone(),
        description: offer.description.clone(),
        price: offer.price,
        category_id: offer.category_id,
        rating_mean: offer.rating.mean,
        rating_count: offer.rating.count,
        pictures: offer.pictures.clone(),
        is_deleted: offer.is_deleted,
        created_at: offer.created_at.clone(),
    })
}

fn interval_to_response(interval: &BlockedInterval) -> IntervalResponse {
    IntervalResponse {
        interval_id: interval.interval_id,
        offer_id: interval.offer_id,
        from_date: interval.range.from_date().to_string(),
        to_date: interval.range.to_date().to_string(),
        is_lessor: interval.is_lessor,
        reason: interval.reason.clone(),
    }
}

/// Converts a request into its response form.
///
/// `include_code` is true only on the single-request read path for the
/// requesting lessee; transition responses always blank the code.
fn request_to_response(request: &Request, include_code: bool) -> Result<RequestResponse, ApiError> {
    let request_id: i64 = request.request_id.ok_or_else(|| ApiError::Internal {
        message: String::from("request has no persisted id"),
    })?;

    Ok(RequestResponse {
        request_id,
        offer_id: request.offer_id,
        lessee_id: request.lessee_id,
        status: request.status.code(),
        status_name: request.status.as_str().to_string(),
        from_date: request.date_range.from_date().to_string(),
        to_date: request.date_range.to_date().to_string(),
        message: request.message.clone(),
        qr_code: if include_code {
            request.qr_code.clone()
        } else {
            None
        },
        created_at: request.created_at.clone(),
        updated_at: request.updated_at.clone(),
    })
}

fn rating_to_response(rating: Rating, aggregate: RatingAggregate) -> Result<RatingResponse, ApiError> {
    let rating_id: i64 = rating.rating_id.ok_or_else(|| ApiError::Internal {
        message: String::from("rating has no persisted id"),
    })?;

    Ok(RatingResponse {
        rating_id,
        owner_id: rating.owner_id,
        rating: rating.value,
        headline: rating.headline,
        text: rating.text,
        aggregate_mean: aggregate.mean,
        aggregate_count: aggregate.count,
        created_at: rating.created_at,
        updated_at: rating.updated_at,
    })
}

fn load_offer(persistence: &mut Persistence, offer_id: i64) -> Result<Offer, ApiError> {
    persistence
        .get_offer(offer_id)
        .map_err(map_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Offer"),
            message: format!("Offer {offer_id} does not exist"),
        })
}

/// Loads an offer and rejects soft-deleted ones.
///
/// Soft-deleted offers stay readable but are not valid targets for
/// bookings, edits, or ratings.
fn load_active_offer(persistence: &mut Persistence, offer_id: i64) -> Result<Offer, ApiError> {
    let offer: Offer = load_offer(persistence, offer_id)?;
    if offer.is_deleted {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Offer"),
            message: format!("Offer {offer_id} has been deleted"),
        });
    }
    Ok(offer)
}

fn load_request(persistence: &mut Persistence, request_id: i64) -> Result<Request, ApiError> {
    persistence
        .get_request(request_id)
        .map_err(map_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Request"),
            message: format!("Request {request_id} does not exist"),
        })
}

fn require_lessor(offer: &Offer, actor: &AuthenticatedUser, action: &str) -> Result<(), ApiError> {
    if offer.lessor_id != actor.account_id {
        return Err(ApiError::Forbidden {
            action: action.to_string(),
            reason: String::from("only the offer's lessor may perform this action"),
        });
    }
    Ok(())
}

// ============================================================================
// Accounts
// ============================================================================

/// Registers a new account.
///
/// This function:
/// - Validates the email and display name
/// - Enforces the password policy
/// - Stores the account with a bcrypt-hashed password
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The registration data
///
/// # Errors
///
/// Returns an error if:
/// - The email or display name is malformed
/// - The password violates the policy
/// - The email is already registered (`Conflict`)
pub fn register_account(
    persistence: &mut Persistence,
    request: RegisterAccountRequest,
) -> Result<AccountResponse, ApiError> {
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(ApiError::InvalidInput {
            field: String::from("email"),
            message: format!("'{}' is not a valid email address", request.email),
        });
    }
    if request.display_name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("display_name"),
            message: String::from("Display name cannot be empty"),
        });
    }

    PasswordPolicy::default().validate(&request.password, &request.email, &request.display_name)?;

    let now: String = now_timestamp()?;
    let account_id: i64 = persistence
        .create_account(&request.email, &request.display_name, &request.password, &now)
        .map_err(map_persistence_error)?;

    info!(account_id, "Account registered");

    get_account(persistence, account_id)
}

/// Retrieves a public account profile.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the account does not exist.
pub fn get_account(
    persistence: &mut Persistence,
    account_id: i64,
) -> Result<AccountResponse, ApiError> {
    let account: AccountData = persistence
        .get_account_by_id(account_id)
        .map_err(map_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Account"),
            message: format!("Account {account_id} does not exist"),
        })?;

    Ok(account_to_response(&account))
}

// ============================================================================
// Offers
// ============================================================================

/// Creates a new offer owned by the authenticated actor.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated account (becomes the lessor)
/// * `input` - The offer fields
///
/// # Errors
///
/// Returns an error if:
/// - The title is empty
/// - The price is not strictly positive
pub fn create_offer(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    input: OfferInput,
) -> Result<OfferResponse, ApiError> {
    validate_offer_fields(&input.title, input.price).map_err(translate_domain_error)?;

    let offer: Offer = Offer {
        offer_id: None,
        lessor_id: actor.account_id,
        title: input.title,
        description: input.description,
        price: input.price,
        category_id: input.category_id,
        rating: RatingAggregate::zero(),
        pictures: input.pictures,
        is_deleted: false,
        created_at: now_timestamp()?,
    };

    let offer_id: i64 = persistence
        .insert_offer(&offer)
        .map_err(map_persistence_error)?;

    info!(offer_id, lessor_id = actor.account_id, "Offer created");

    let stored: Offer = load_offer(persistence, offer_id)?;
    offer_to_response(&stored)
}

/// Retrieves an offer by id. Soft-deleted offers remain readable.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the offer does not exist.
pub fn get_offer(persistence: &mut Persistence, offer_id: i64) -> Result<OfferResponse, ApiError> {
    let offer: Offer = load_offer(persistence, offer_id)?;
    offer_to_response(&offer)
}

/// Lists non-deleted offers with optional category and lessor filters.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_offers(
    persistence: &mut Persistence,
    category_id: Option<i64>,
    lessor_id: Option<i64>,
) -> Result<Vec<OfferResponse>, ApiError> {
    let offers: Vec<Offer> = persistence
        .list_offers(category_id, lessor_id)
        .map_err(map_persistence_error)?;

    offers.iter().map(offer_to_response).collect()
}

/// Updates an offer's editable fields.
///
/// # Errors
///
/// Returns an error if:
/// - The offer does not exist or is soft-deleted
/// - The actor is not the offer's lessor
/// - The new fields are invalid
pub fn update_offer(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    offer_id: i64,
    input: OfferInput,
) -> Result<OfferResponse, ApiError> {
    let offer: Offer = load_active_offer(persistence, offer_id)?;
    require_lessor(&offer, actor, "update_offer")?;

    validate_offer_fields(&input.title, input.price).map_err(translate_domain_error)?;

    persistence
        .update_offer_fields(
            offer_id,
            &input.title,
            &input.description,
            input.price,
            input.category_id,
            &input.pictures,
        )
        .map_err(map_persistence_error)?;

    let stored: Offer = load_offer(persistence, offer_id)?;
    offer_to_response(&stored)
}

/// Soft-deletes an offer and clears its availability calendar.
///
/// # Errors
///
/// Returns an error if the offer does not exist, is already deleted, or the
/// actor is not the lessor.
pub fn delete_offer(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    offer_id: i64,
) -> Result<(), ApiError> {
    let offer: Offer = load_active_offer(persistence, offer_id)?;
    require_lessor(&offer, actor, "delete_offer")?;

    persistence
        .soft_delete_offer(offer_id)
        .map_err(map_persistence_error)?;

    info!(offer_id, "Offer deleted");
    Ok(())
}

// ============================================================================
// Availability Calendar
// ============================================================================

/// Replaces the lessor's manual blocked dates for an offer.
///
/// All existing lessor-tagged intervals are removed and the submitted set
/// is inserted in one transaction; lessee-tagged intervals (confirmed
/// bookings) are untouched.
///
/// # Errors
///
/// Returns an error if:
/// - The offer does not exist, is deleted, or the actor is not the lessor
/// - Any range is inverted or has an endpoint in the past
pub fn set_blocked_dates(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    offer_id: i64,
    request: SetBlockedDatesRequest,
) -> Result<Vec<IntervalResponse>, ApiError> {
    let offer: Offer = load_active_offer(persistence, offer_id)?;
    require_lessor(&offer, actor, "set_blocked_dates")?;

    let today: Date = today_utc();
    let mut intervals: Vec<BlockedInterval> = Vec::with_capacity(request.intervals.len());
    for input in &request.intervals {
        let from_date: Date = parse_calendar_day(&input.from_date).map_err(translate_domain_error)?;
        let to_date: Date = parse_calendar_day(&input.to_date).map_err(translate_domain_error)?;
        let range: DateRange = DateRange::new(from_date, to_date).map_err(translate_domain_error)?;
        range.validate_not_past(today).map_err(translate_domain_error)?;

        intervals.push(BlockedInterval::new(
            offer_id,
            range,
            true,
            input.reason.clone(),
        ));
    }

    persistence
        .replace_lessor_intervals(offer_id, &intervals)
        .map_err(map_persistence_error)?;

    info!(offer_id, count = intervals.len(), "Lessor blocked dates replaced");

    let stored: Vec<BlockedInterval> = persistence
        .list_intervals_for_offer(offer_id)
        .map_err(map_persistence_error)?;
    Ok(stored.iter().map(interval_to_response).collect())
}

/// Lists all blocked intervals for an offer, both actor tags.
///
/// # Errors
///
/// Returns an error if the offer does not exist.
pub fn list_blocked_dates(
    persistence: &mut Persistence,
    offer_id: i64,
) -> Result<Vec<IntervalResponse>, ApiError> {
    load_offer(persistence, offer_id)?;

    let intervals: Vec<BlockedInterval> = persistence
        .list_intervals_for_offer(offer_id)
        .map_err(map_persistence_error)?;
    Ok(intervals.iter().map(interval_to_response).collect())
}

// ============================================================================
// Booking
// ============================================================================

/// Books an offer: creates a new request in the `Open` state and emits the
/// system chat opener, atomically.
///
/// This function:
/// - Loads the offer (must exist and not be soft-deleted)
/// - Parses and validates the requested range (typed parse, no past dates)
/// - Checks the range against ALL existing blocked intervals
/// - Creates the request and the lessee → lessor chat message
///
/// The caller holds exclusive access to the persistence layer for the whole
/// operation, so the overlap check and the insert form one check-then-act
/// step.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated account (becomes the lessee)
/// * `offer_id` - The offer to book
/// * `request` - The requested range and optional message
///
/// # Returns
///
/// The created request with the hand-off code blanked.
///
/// # Errors
///
/// Returns an error if:
/// - The offer does not exist or is soft-deleted
/// - The actor is the offer's lessor
/// - The range is malformed, in the past, or overlaps an existing interval
pub fn book_offer(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    offer_id: i64,
    request: BookOfferRequest,
) -> Result<RequestResponse, ApiError> {
    let offer: Offer = load_active_offer(persistence, offer_id)?;

    let from_date: Date = parse_calendar_day(&request.from_date).map_err(translate_domain_error)?;
    let to_date: Date = parse_calendar_day(&request.to_date).map_err(translate_domain_error)?;
    let date_range: DateRange = DateRange::new(from_date, to_date).map_err(translate_domain_error)?;

    let existing: Vec<BlockedInterval> = persistence
        .list_intervals_for_offer(offer_id)
        .map_err(map_persistence_error)?;

    let timestamp: String = now_timestamp()?;
    let command: Command = Command::BookOffer {
        offer_id,
        date_range,
        message: request.message.unwrap_or_default(),
    };

    let result: BookingResult = apply_booking(
        &offer,
        &existing,
        actor.account_id,
        command,
        today_utc(),
        &timestamp,
    )
    .map_err(translate_core_error)?;

    let request_id: i64 = persistence
        .persist_booking(&result.request, &result.system_message)
        .map_err(map_persistence_error)?;

    info!(
        request_id,
        offer_id,
        lessee_id = actor.account_id,
        "Offer booked"
    );

    let mut created: Request = result.request;
    created.request_id = Some(request_id);
    request_to_response(&created.sanitized(), false)
}

/// Advances a booking request along the lifecycle transition table.
///
/// This function:
/// - Resolves the actor's role on the request (lessor / lessee)
/// - Issues a fresh hand-off code for the acceptance and lend legs
/// - Applies the transition via the core (all guards enforced there)
/// - Persists the new request value and any calendar effect atomically
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The authenticated account
/// * `request_id` - The request to transition
/// * `request` - The desired status and optionally the presented code
///
/// # Returns
///
/// The transitioned request. The hand-off code is ALWAYS blanked in this
/// response, regardless of actor; the lessee retrieves it through the
/// single-request read path.
///
/// # Errors
///
/// Returns an error if:
/// - The request does not exist
/// - The actor holds no role on the request
/// - The transition violates the lifecycle table or its guards
pub fn handle_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request_id: i64,
    request: HandleRequestRequest,
) -> Result<RequestResponse, ApiError> {
    let stored: Request = load_request(persistence, request_id)?;
    let offer: Offer = load_offer(persistence, stored.offer_id)?;

    let actor_role: TransitionActor =
        resolve_transition_actor(&offer, &stored, actor.account_id).ok_or_else(|| {
            ApiError::Forbidden {
                action: String::from("handle_request"),
                reason: String::from("the account holds no role on this request"),
            }
        })?;

    let desired_status: RequestStatus =
        RequestStatus::from_code(request.status).map_err(translate_domain_error)?;

    if desired_status == RequestStatus::AcceptedByLessor && offer.is_deleted {
        return Err(ApiError::Conflict {
            rule: String::from("offer_deleted"),
            message: String::from("a request on a deleted offer cannot be accepted"),
        });
    }

    // A fresh code is issued for the acceptance and lend legs; the core
    // attaches it to the new request value.
    let issued_code: Option<String> = matches!(
        desired_status,
        RequestStatus::AcceptedByLessor | RequestStatus::ItemLentToLessee
    )
    .then(generate_handoff_code);

    let existing: Vec<BlockedInterval> = persistence
        .list_intervals_for_offer(stored.offer_id)
        .map_err(map_persistence_error)?;

    let timestamp: String = now_timestamp()?;
    let command: Command = Command::HandleRequest {
        request_id,
        desired_status,
        presented_code: request.qr_code,
    };

    let result: TransitionResult = apply_transition(
        &stored,
        &existing,
        command,
        actor_role,
        issued_code,
        &timestamp,
    )
    .map_err(translate_core_error)?;

    persistence
        .persist_transition(&result)
        .map_err(map_persistence_error)?;

    info!(
        request_id,
        status = desired_status.as_str(),
        actor = actor_role.as_str(),
        "Request transitioned"
    );

    request_to_response(&result.new_request.sanitized(), false)
}

/// Retrieves a request by id and marks it as seen for the reading side.
///
/// The hand-off code is included only for the requesting lessee; the
/// lessor-side read is redacted.
///
/// # Errors
///
/// Returns an error if the request does not exist or the actor holds no
/// role on it.
pub fn get_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request_id: i64,
) -> Result<RequestResponse, ApiError> {
    let stored: Request = load_request(persistence, request_id)?;
    let offer: Offer = load_offer(persistence, stored.offer_id)?;

    let actor_role: TransitionActor =
        resolve_transition_actor(&offer, &stored, actor.account_id).ok_or_else(|| {
            ApiError::Forbidden {
                action: String::from("get_request"),
                reason: String::from("the account holds no role on this request"),
            }
        })?;

    let lessor_side: bool = actor_role == TransitionActor::Lessor;
    persistence
        .mark_request_seen(request_id, lessor_side)
        .map_err(map_persistence_error)?;

    request_to_response(&stored, !lessor_side)
}

/// Lists the caller's requests on both sides, newest first.
///
/// Listing does not mark anything as seen; each item reports the unseen
/// flag for the caller's side, computed from whether the caller is the
/// lessor of that request's offer.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn list_requests(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<ListRequestsResponse, ApiError> {
    let as_lessor: Vec<Request> = persistence
        .list_requests_for_lessor(actor.account_id)
        .map_err(map_persistence_error)?;
    let as_lessee: Vec<Request> = persistence
        .list_requests_for_lessee(actor.account_id)
        .map_err(map_persistence_error)?;

    let mut items: Vec<RequestListItem> = Vec::with_capacity(as_lessor.len() + as_lessee.len());
    for request in &as_lessor {
        items.push(RequestListItem {
            request: request_to_response(&request.sanitized(), false)?,
            has_update: request.lessor_has_update,
            is_lessor_side: true,
        });
    }
    for request in &as_lessee {
        items.push(RequestListItem {
            request: request_to_response(&request.sanitized(), false)?,
            has_update: request.lessee_has_update,
            is_lessor_side: false,
        });
    }

    items.sort_by(|a, b| b.request.request_id.cmp(&a.request.request_id));

    Ok(ListRequestsResponse { requests: items })
}

/// Times out all stale open requests.
///
/// This is the operation the external periodic sweep invokes. It carries no
/// human actor; each stale request is transitioned `Open -> TimedOut`
/// through the same state machine as every other transition.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `threshold_hours` - How old an open request must be before it times out
///
/// # Errors
///
/// Returns an error if a query or transition fails.
pub fn sweep_request_timeouts(
    persistence: &mut Persistence,
    threshold_hours: i64,
) -> Result<SweepTimeoutsResponse, ApiError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let threshold: Duration = Duration::hours(threshold_hours);
    let cutoff: String = format_timestamp(now - threshold)?;

    let stale: Vec<Request> = persistence
        .list_stale_open_requests(&cutoff)
        .map_err(map_persistence_error)?;

    let timestamp: String = now_timestamp()?;
    let mut timed_out_request_ids: Vec<i64> = Vec::with_capacity(stale.len());

    for request in &stale {
        let result: TransitionResult =
            apply_timeout(request, now, threshold, &timestamp).map_err(translate_core_error)?;
        persistence
            .persist_transition(&result)
            .map_err(map_persistence_error)?;

        let request_id: i64 = request.request_id.ok_or_else(|| ApiError::Internal {
            message: String::from("stored request has no id"),
        })?;
        timed_out_request_ids.push(request_id);
    }

    info!(count = timed_out_request_ids.len(), "Timeout sweep completed");

    Ok(SweepTimeoutsResponse {
        timed_out_request_ids,
    })
}

/// Lists the stored system messages for a request.
///
/// # Errors
///
/// Returns an error if the request does not exist or the actor holds no
/// role on it.
pub fn list_request_messages(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request_id: i64,
) -> Result<Vec<ChatMessageResponse>, ApiError> {
    let stored: Request = load_request(persistence, request_id)?;
    let offer: Offer = load_offer(persistence, stored.offer_id)?;

    resolve_transition_actor(&offer, &stored, actor.account_id).ok_or_else(|| {
        ApiError::Forbidden {
            action: String::from("list_request_messages"),
            reason: String::from("the account holds no role on this request"),
        }
    })?;

    let messages = persistence
        .list_messages_for_request(request_id)
        .map_err(map_persistence_error)?;

    Ok(messages
        .into_iter()
        .map(|m| ChatMessageResponse {
            message_id: m.message_id,
            from_account_id: m.from_account_id,
            to_account_id: m.to_account_id,
            request_id: m.request_id,
            message_type: m.message_type,
            created_at: m.created_at,
        })
        .collect())
}

// ============================================================================
// Ratings
// ============================================================================

/// Checks the shared preconditions for rating an offer.
///
/// Precondition order follows the documented contract: value bounds, then
/// review fields, then eligibility. The first failure wins.
fn check_offer_rating_preconditions(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    offer: &Offer,
    input: &RateRequest,
) -> Result<(), ApiError> {
    validate_rating_value(input.rating).map_err(translate_domain_error)?;
    validate_review_fields(input.headline.as_deref(), input.text.as_deref())
        .map_err(translate_domain_error)?;

    if offer.lessor_id == actor.account_id {
        return Err(ApiError::Forbidden {
            action: String::from("rate_offer"),
            reason: String::from("a lessor cannot rate their own offer"),
        });
    }

    let offer_id: i64 = offer.offer_id.ok_or_else(|| ApiError::Internal {
        message: String::from("offer has no persisted id"),
    })?;
    let request_count: i64 = persistence
        .count_requests_for_offer_by_lessee(offer_id, actor.account_id)
        .map_err(map_persistence_error)?;
    if request_count == 0 {
        return Err(ApiError::Forbidden {
            action: String::from("rate_offer"),
            reason: String::from("no booking request connects the account to this offer"),
        });
    }

    Ok(())
}

/// Rates an offer.
///
/// A second rating by the same account for the same offer fails with
/// `Forbidden`; use [`update_offer_rating`] to change an existing rating.
///
/// # Errors
///
/// Returns an error if any precondition fails (see the documented order).
pub fn rate_offer(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    offer_id: i64,
    input: RateRequest,
) -> Result<RatingResponse, ApiError> {
    let offer: Offer = load_active_offer(persistence, offer_id)?;
    check_offer_rating_preconditions(persistence, actor, &offer, &input)?;

    let existing: Option<Rating> = persistence
        .get_offer_rating(offer_id, actor.account_id)
        .map_err(map_persistence_error)?;
    if existing.is_some() {
        return Err(ApiError::Forbidden {
            action: String::from("rate_offer"),
            reason: String::from("the account has already rated this offer"),
        });
    }

    let now: String = now_timestamp()?;
    let (rating, aggregate) = persistence
        .upsert_offer_rating(
            offer_id,
            actor.account_id,
            input.rating,
            input.headline.as_deref(),
            input.text.as_deref(),
            &now,
        )
        .map_err(map_persistence_error)?;

    info!(offer_id, owner_id = actor.account_id, "Offer rated");

    rating_to_response(rating, aggregate)
}

/// Updates an offer rating, creating it when none exists yet.
///
/// # Errors
///
/// Returns an error if any precondition fails.
pub fn update_offer_rating(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    offer_id: i64,
    input: RateRequest,
) -> Result<RatingResponse, ApiError> {
    let offer: Offer = load_active_offer(persistence, offer_id)?;
    check_offer_rating_preconditions(persistence, actor, &offer, &input)?;

    let now: String = now_timestamp()?;
    let (rating, aggregate) = persistence
        .upsert_offer_rating(
            offer_id,
            actor.account_id,
            input.rating,
            input.headline.as_deref(),
            input.text.as_deref(),
            &now,
        )
        .map_err(map_persistence_error)?;

    rating_to_response(rating, aggregate)
}

/// Deletes the actor's rating for an offer and recomputes the aggregate.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the actor holds no rating for the offer.
pub fn delete_offer_rating(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    offer_id: i64,
) -> Result<DeleteRatingResponse, ApiError> {
    load_offer(persistence, offer_id)?;

    let now: String = now_timestamp()?;
    let aggregate: RatingAggregate = persistence
        .delete_offer_rating(offer_id, actor.account_id, &now)
        .map_err(map_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Rating"),
            message: format!("No rating by this account for offer {offer_id}"),
        })?;

    Ok(DeleteRatingResponse {
        aggregate_mean: aggregate.mean,
        aggregate_count: aggregate.count,
    })
}

/// Checks the shared preconditions for rating another account.
fn check_user_rating_preconditions(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    rated_account_id: i64,
    input: &RateRequest,
) -> Result<(), ApiError> {
    validate_rating_value(input.rating).map_err(translate_domain_error)?;
    validate_review_fields(input.headline.as_deref(), input.text.as_deref())
        .map_err(translate_domain_error)?;

    if rated_account_id == actor.account_id {
        return Err(ApiError::Forbidden {
            action: String::from("rate_user"),
            reason: String::from("an account cannot rate itself"),
        });
    }

    let shared: i64 = persistence
        .count_requests_between_accounts(actor.account_id, rated_account_id)
        .map_err(map_persistence_error)?;
    if shared == 0 {
        return Err(ApiError::Forbidden {
            action: String::from("rate_user"),
            reason: String::from("no booking request connects the two accounts"),
        });
    }

    Ok(())
}

/// Rates another account.
///
/// # Errors
///
/// Returns an error if any precondition fails; a duplicate rating fails
/// with `Forbidden`.
pub fn rate_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    rated_account_id: i64,
    input: RateRequest,
) -> Result<RatingResponse, ApiError> {
    get_account(persistence, rated_account_id)?;
    check_user_rating_preconditions(persistence, actor, rated_account_id, &input)?;

    let existing: Option<Rating> = persistence
        .get_user_rating(rated_account_id, actor.account_id)
        .map_err(map_persistence_error)?;
    if existing.is_some() {
        return Err(ApiError::Forbidden {
            action: String::from("rate_user"),
            reason: String::from("the account has already rated this user"),
        });
    }

    let now: String = now_timestamp()?;
    let (rating, aggregate) = persistence
        .upsert_user_rating(
            rated_account_id,
            actor.account_id,
            input.rating,
            input.headline.as_deref(),
            input.text.as_deref(),
            &now,
        )
        .map_err(map_persistence_error)?;

    info!(rated_account_id, owner_id = actor.account_id, "User rated");

    rating_to_response(rating, aggregate)
}

/// Updates a user rating, creating it when none exists yet.
///
/// # Errors
///
/// Returns an error if any precondition fails.
pub fn update_user_rating(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    rated_account_id: i64,
    input: RateRequest,
) -> Result<RatingResponse, ApiError> {
    get_account(persistence, rated_account_id)?;
    check_user_rating_preconditions(persistence, actor, rated_account_id, &input)?;

    let now: String = now_timestamp()?;
    let (rating, aggregate) = persistence
        .upsert_user_rating(
            rated_account_id,
            actor.account_id,
            input.rating,
            input.headline.as_deref(),
            input.text.as_deref(),
            &now,
        )
        .map_err(map_persistence_error)?;

    rating_to_response(rating, aggregate)
}

/// Deletes the actor's rating for another account and recomputes the
/// aggregate.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the actor holds no rating for the account.
pub fn delete_user_rating(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    rated_account_id: i64,
) -> Result<DeleteRatingResponse, ApiError> {
    let now: String = now_timestamp()?;
    let aggregate: RatingAggregate = persistence
        .delete_user_rating(rated_account_id, actor.account_id, &now)
        .map_err(map_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Rating"),
            message: format!("No rating by this account for account {rated_account_id}"),
        })?;

    Ok(DeleteRatingResponse {
        aggregate_mean: aggregate.mean,
        aggregate_count: aggregate.count,
    })
}
