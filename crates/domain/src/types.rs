// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::date_range::DateRange;
use crate::rating::RatingAggregate;
use crate::request_status::RequestStatus;
use serde::{Deserialize, Serialize};

/// A rentable offer published by a lessor.
///
/// Offers are soft-deleted: the record is retained with `is_deleted` set and
/// becomes read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the offer has not been persisted yet.
    pub offer_id: Option<i64>,
    /// The owning lessor's account identifier.
    pub lessor_id: i64,
    /// The offer title.
    pub title: String,
    /// The offer description.
    pub description: String,
    /// The rental price. Strictly positive.
    pub price: f64,
    /// Reference to a category maintained by an external catalog.
    pub category_id: i64,
    /// Aggregate rating, recomputed on every rating change.
    pub rating: RatingAggregate,
    /// Picture file references; file storage itself is external.
    pub pictures: Vec<String>,
    /// Soft-delete flag. Deleted offers stay readable but immutable.
    pub is_deleted: bool,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// A blocked date interval on an offer's availability calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedInterval {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the interval has not been persisted yet.
    pub interval_id: Option<i64>,
    /// The offer this interval belongs to.
    pub offer_id: i64,
    /// The blocked day range (inclusive).
    pub range: DateRange,
    /// True for lessor-initiated manual blocks, false for confirmed bookings.
    pub is_lessor: bool,
    /// Optional free-text reason.
    pub reason: Option<String>,
}

impl BlockedInterval {
    /// Creates a new `BlockedInterval` without a persisted ID.
    #[must_use]
    pub const fn new(
        offer_id: i64,
        range: DateRange,
        is_lessor: bool,
        reason: Option<String>,
    ) -> Self {
        Self {
            interval_id: None,
            offer_id,
            range,
            is_lessor,
            reason,
        }
    }
}

/// A single booking lifecycle instance between a lessee and an offer.
///
/// Requests are mutated exclusively through legal state transitions and are
/// never physically deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the request has not been persisted yet.
    pub request_id: Option<i64>,
    /// The offer being requested.
    pub offer_id: i64,
    /// The requesting lessee's account identifier.
    /// Invariant: never equal to the offer's lessor.
    pub lessee_id: i64,
    /// The current lifecycle status.
    pub status: RequestStatus,
    /// The requested rental period.
    pub date_range: DateRange,
    /// Free-text message from the lessee. May be empty.
    pub message: String,
    /// The opaque hand-off code. `None` until acceptance; rotated on lending;
    /// retired to [`crate::RETIRED_HANDOFF_CODE`] on return. Never echoed
    /// back in transition responses.
    pub qr_code: Option<String>,
    /// True while the lessor has an unseen update on this request.
    pub lessor_has_update: bool,
    /// True while the lessee has an unseen update on this request.
    pub lessee_has_update: bool,
    /// Creation timestamp (ISO 8601). Drives the timeout sweep.
    pub created_at: String,
    /// Last transition timestamp (ISO 8601).
    pub updated_at: String,
}

impl Request {
    /// Returns a copy of this request with the hand-off code blanked.
    ///
    /// Every response payload returned after a transition carries the
    /// sanitized form; the code is persisted but never echoed back.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            qr_code: None,
            ..self.clone()
        }
    }
}

/// A rating of an offer or of an account.
///
/// The rated target is carried by context (the table the rating is stored
/// in), not by this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the rating has not been persisted yet.
    pub rating_id: Option<i64>,
    /// The account that authored the rating.
    pub owner_id: i64,
    /// The rating value, within `(RATING_MIN, RATING_MAX]`.
    pub value: i32,
    /// Optional headline. Mandatory when text is present.
    pub headline: Option<String>,
    /// Optional review text.
    pub text: Option<String>,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last update timestamp (ISO 8601).
    pub updated_at: String,
}
