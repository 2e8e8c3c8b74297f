// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These DTOs are distinct from domain types and represent the API
//! contract. Dates cross the boundary as strings and are parsed-or-rejected
//! into typed values before they reach the core.

use serde::{Deserialize, Serialize};

/// API request to register a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterAccountRequest {
    /// The account email (unique, case-insensitive).
    pub email: String,
    /// The display name.
    pub display_name: String,
    /// The plain-text password (validated against the password policy).
    pub password: String,
}

/// Public account information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    /// The canonical numeric identifier.
    pub account_id: i64,
    /// The account email.
    pub email: String,
    /// The display name.
    pub display_name: String,
    /// Aggregate rating mean (0 when unrated).
    pub rating_mean: f64,
    /// Number of ratings received.
    pub rating_count: i64,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The account email.
    pub email: String,
    /// The plain-text password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The session token to present as `Authorization: Bearer <token>`.
    pub session_token: String,
    /// The authenticated account.
    pub account: AccountResponse,
}

/// API request to create or update an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferInput {
    /// The offer title (non-empty).
    pub title: String,
    /// The offer description.
    pub description: String,
    /// The rental price (strictly positive).
    pub price: f64,
    /// Reference into the external category catalog.
    pub category_id: i64,
    /// Picture file references.
    #[serde(default)]
    pub pictures: Vec<String>,
}

/// Offer information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferResponse {
    /// The canonical numeric identifier.
    pub offer_id: i64,
    /// The owning lessor's account id.
    pub lessor_id: i64,
    /// The offer title.
    pub title: String,
    /// The offer description.
    pub description: String,
    /// The rental price.
    pub price: f64,
    /// Reference into the external category catalog.
    pub category_id: i64,
    /// Aggregate rating mean (0 when unrated).
    pub rating_mean: f64,
    /// Number of ratings received.
    pub rating_count: i64,
    /// Picture file references.
    pub pictures: Vec<String>,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// One blocked-date entry in a calendar replacement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedDateInput {
    /// First blocked day (`YYYY-MM-DD`; time-of-day is discarded).
    pub from_date: String,
    /// Last blocked day (inclusive).
    pub to_date: String,
    /// Optional free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// API request replacing a lessor's manual blocked dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBlockedDatesRequest {
    /// The new set of lessor-tagged intervals.
    pub intervals: Vec<BlockedDateInput>,
}

/// Blocked interval information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalResponse {
    /// The canonical numeric identifier.
    pub interval_id: Option<i64>,
    /// The offer the interval belongs to.
    pub offer_id: i64,
    /// First blocked day (`YYYY-MM-DD`).
    pub from_date: String,
    /// Last blocked day (inclusive).
    pub to_date: String,
    /// True for lessor-initiated manual blocks.
    pub is_lessor: bool,
    /// Optional free-text reason.
    pub reason: Option<String>,
}

/// API request to book an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOfferRequest {
    /// First rental day (`YYYY-MM-DD`; time-of-day is discarded).
    pub from_date: String,
    /// Last rental day (inclusive).
    pub to_date: String,
    /// Optional free-text message to the lessor.
    #[serde(default)]
    pub message: Option<String>,
}

/// API request to advance a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleRequestRequest {
    /// The desired status code (see the lifecycle table).
    pub status: i32,
    /// The hand-off code presented for the lend/return legs.
    #[serde(default)]
    pub qr_code: Option<String>,
}

/// Booking request information.
///
/// `qr_code` is always `null` in transition responses; it is populated only
/// on the single-request read path for the requesting lessee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestResponse {
    /// The canonical numeric identifier.
    pub request_id: i64,
    /// The offer being requested.
    pub offer_id: i64,
    /// The requesting lessee's account id.
    pub lessee_id: i64,
    /// The current status code.
    pub status: i32,
    /// The current status name.
    pub status_name: String,
    /// First rental day (`YYYY-MM-DD`).
    pub from_date: String,
    /// Last rental day (inclusive).
    pub to_date: String,
    /// The lessee's free-text message.
    pub message: String,
    /// The hand-off code, where the caller is authorized to see it.
    pub qr_code: Option<String>,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last transition timestamp (ISO 8601).
    pub updated_at: String,
}

/// One entry in a request listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestListItem {
    /// The request data (hand-off code always blanked in listings).
    #[serde(flatten)]
    pub request: RequestResponse,
    /// True while the caller's side has an unseen update on this request.
    pub has_update: bool,
    /// True when the caller is the lessor of this request's offer.
    pub is_lessor_side: bool,
}

/// API response for a request listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequestsResponse {
    /// The caller's requests, newest first, both sides.
    pub requests: Vec<RequestListItem>,
}

/// API request to rate an offer or an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRequest {
    /// The rating value, within the documented bounds.
    pub rating: i32,
    /// Optional headline (mandatory when text is present).
    #[serde(default)]
    pub headline: Option<String>,
    /// Optional review text.
    #[serde(default)]
    pub text: Option<String>,
}

/// API response for a stored rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingResponse {
    /// The canonical numeric identifier.
    pub rating_id: i64,
    /// The rating author's account id.
    pub owner_id: i64,
    /// The rating value.
    pub rating: i32,
    /// Optional headline.
    pub headline: Option<String>,
    /// Optional review text.
    pub text: Option<String>,
    /// The target's recomputed aggregate mean.
    pub aggregate_mean: f64,
    /// The target's recomputed rating count.
    pub aggregate_count: i64,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last update timestamp (ISO 8601).
    pub updated_at: String,
}

/// API response after deleting a rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRatingResponse {
    /// The target's recomputed aggregate mean.
    pub aggregate_mean: f64,
    /// The target's recomputed rating count.
    pub aggregate_count: i64,
}

/// API response for the timeout sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepTimeoutsResponse {
    /// The ids of the requests that were timed out.
    pub timed_out_request_ids: Vec<i64>,
}

/// One stored system chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    /// The canonical numeric identifier.
    pub message_id: i64,
    /// The sending account.
    pub from_account_id: i64,
    /// The receiving account.
    pub to_account_id: i64,
    /// The request the message refers to.
    pub request_id: i64,
    /// The message type (e.g. `offer_request`).
    pub message_type: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}
