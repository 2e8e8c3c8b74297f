// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rating bounds and aggregate recomputation.
//!
//! Aggregates are always recomputed from the full set of stored, non-deleted
//! rating values for a target; nothing is incrementally adjusted. The
//! functions here are pure so the same inputs always produce the same
//! aggregate.
//!
//! The accepted value range is `(RATING_MIN, RATING_MAX]`: the minimum is
//! excluded, the maximum included. The reference behavior documents this
//! asymmetric bound and it is preserved as-is.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Excluded lower bound for rating values.
pub const RATING_MIN: i32 = 0;

/// Included upper bound for rating values.
pub const RATING_MAX: i32 = 5;

/// Maximum length of a review headline or text, in characters.
pub const REVIEW_FIELD_MAX_LEN: usize = 400;

/// Running aggregate rating of an offer or account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingAggregate {
    /// Arithmetic mean over all stored values; 0 when no ratings exist.
    pub mean: f64,
    /// Number of stored, non-deleted ratings.
    pub count: i64,
}

impl RatingAggregate {
    /// Returns the aggregate of a target with no ratings.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            mean: 0.0,
            count: 0,
        }
    }
}

impl Default for RatingAggregate {
    fn default() -> Self {
        Self::zero()
    }
}

/// Validates that a rating value lies within `(RATING_MIN, RATING_MAX]`.
///
/// The minimum itself is rejected: against the default bounds a value of 0
/// is invalid.
///
/// # Errors
///
/// Returns `DomainError::InvalidRatingValue` for out-of-bounds values.
pub fn validate_rating_value(value: i32) -> Result<(), DomainError> {
    if value <= RATING_MIN || value > RATING_MAX {
        return Err(DomainError::InvalidRatingValue { value });
    }
    Ok(())
}

/// Validates review headline/text constraints.
///
/// A non-empty text requires a non-empty headline, and both fields are
/// bounded to [`REVIEW_FIELD_MAX_LEN`] characters.
///
/// # Arguments
///
/// * `headline` - The optional review headline
/// * `text` - The optional review body
///
/// # Errors
///
/// Returns an error if the text is present without a headline or either
/// field exceeds the maximum length.
pub fn validate_review_fields(
    headline: Option<&str>,
    text: Option<&str>,
) -> Result<(), DomainError> {
    let has_text: bool = text.is_some_and(|t| !t.is_empty());
    let has_headline: bool = headline.is_some_and(|h| !h.is_empty());

    if has_text && !has_headline {
        return Err(DomainError::MissingHeadline);
    }

    if headline.is_some_and(|h| h.chars().count() > REVIEW_FIELD_MAX_LEN) {
        return Err(DomainError::ReviewFieldTooLong {
            field: "headline",
            max: REVIEW_FIELD_MAX_LEN,
        });
    }

    if text.is_some_and(|t| t.chars().count() > REVIEW_FIELD_MAX_LEN) {
        return Err(DomainError::ReviewFieldTooLong {
            field: "text",
            max: REVIEW_FIELD_MAX_LEN,
        });
    }

    Ok(())
}

/// Recomputes an aggregate from the full set of stored rating values.
///
/// An empty slice yields the zero aggregate (mean 0, count 0).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_rating_aggregate(values: &[i32]) -> RatingAggregate {
    if values.is_empty() {
        return RatingAggregate::zero();
    }

    let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
    let count: i64 = values.len() as i64;

    RatingAggregate {
        mean: sum as f64 / count as f64,
        count,
    }
}
