// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod date_range;
mod error;
mod rating;
mod request_status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use date_range::{DateRange, conflicts_with_any, parse_calendar_day};
pub use error::DomainError;
pub use rating::{
    RATING_MAX, RATING_MIN, REVIEW_FIELD_MAX_LEN, RatingAggregate, compute_rating_aggregate,
    validate_rating_value, validate_review_fields,
};
pub use request_status::{
    RETIRED_HANDOFF_CODE, RequestStatus, TransitionActor, validate_transition,
};

// Re-export public types
pub use types::{BlockedInterval, Offer, Rating, Request};
pub use validation::{validate_booking_window, validate_offer_fields};
