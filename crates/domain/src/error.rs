// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A date range is inverted or otherwise malformed.
    InvalidDateRange {
        /// Description of the validation error.
        reason: String,
    },
    /// A date endpoint lies in the past.
    PastDate {
        /// The offending date.
        date: time::Date,
    },
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A numeric request status code is unknown.
    InvalidStatusCode {
        /// The invalid code value.
        code: i32,
    },
    /// A request status string is unknown.
    InvalidStatus {
        /// The invalid status string.
        status: String,
    },
    /// A request lifecycle transition is not permitted.
    IllegalTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is rejected.
        reason: String,
    },
    /// A rating value lies outside the accepted bounds.
    InvalidRatingValue {
        /// The invalid rating value.
        value: i32,
    },
    /// Review text was supplied without a headline.
    MissingHeadline,
    /// A review field exceeds the maximum length.
    ReviewFieldTooLong {
        /// The field name.
        field: &'static str,
        /// The maximum permitted length.
        max: usize,
    },
    /// An offer title is empty or invalid.
    InvalidTitle(String),
    /// An offer price is not strictly positive.
    InvalidPrice(String),
    /// A lessor attempted to book their own offer.
    OwnOfferBooking,
    /// A candidate date range overlaps an existing blocked interval.
    OverlappingInterval {
        /// Start of the candidate range.
        from: time::Date,
        /// End of the candidate range.
        to: time::Date,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateRange { reason } => write!(f, "Invalid date range: {reason}"),
            Self::PastDate { date } => {
                write!(f, "Date {date} lies in the past")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidStatusCode { code } => {
                write!(f, "Invalid request status code: {code}")
            }
            Self::InvalidStatus { status } => {
                write!(f, "Invalid request status: {status}")
            }
            Self::IllegalTransition { from, to, reason } => {
                write!(f, "Illegal transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidRatingValue { value } => {
                write!(
                    f,
                    "Invalid rating value: {value}. Must be greater than {} and at most {}",
                    crate::rating::RATING_MIN,
                    crate::rating::RATING_MAX
                )
            }
            Self::MissingHeadline => {
                write!(f, "A review with text requires a headline")
            }
            Self::ReviewFieldTooLong { field, max } => {
                write!(f, "Review {field} exceeds the maximum of {max} characters")
            }
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidPrice(msg) => write!(f, "Invalid price: {msg}"),
            Self::OwnOfferBooking => {
                write!(f, "A lessor cannot book their own offer")
            }
            Self::OverlappingInterval { from, to } => {
                write!(
                    f,
                    "The range {from} to {to} overlaps an existing blocked interval"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
