// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use lendit::CoreError;
use lendit_domain::DomainError;
use lendit_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// Why the actor may not perform it.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action, reason } => {
                write!(f, "Forbidden: '{action}': {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract: `InvalidInput` maps to 400, `AuthenticationFailed` to 401,
/// `Forbidden` to 403, `ResourceNotFound` to 404, `Conflict` to 409 and
/// `Internal` to 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The authenticated actor may not perform this domain action.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// Why the actor may not perform it.
        reason: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found (or is soft-deleted).
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A state-machine or uniqueness guard failed.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action, reason } => {
                write!(f, "Forbidden: '{action}': {reason}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { rule, message } => {
                write!(f, "Conflict ({rule}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Forbidden { action, reason } => Self::Forbidden { action, reason },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidDateRange { reason } => ApiError::InvalidInput {
            field: String::from("date_range"),
            message: reason,
        },
        DomainError::PastDate { date } => ApiError::InvalidInput {
            field: String::from("date_range"),
            message: format!("Date {date} lies in the past"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::InvalidStatusCode { code } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid request status code: {code}"),
        },
        DomainError::InvalidStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid request status: {status}"),
        },
        DomainError::IllegalTransition { from, to, reason } => ApiError::Conflict {
            rule: String::from("request_lifecycle"),
            message: format!("Illegal transition from '{from}' to '{to}': {reason}"),
        },
        DomainError::InvalidRatingValue { value } => ApiError::InvalidInput {
            field: String::from("rating"),
            message: format!(
                "Invalid rating value: {value}. Must be greater than {} and at most {}",
                lendit_domain::RATING_MIN,
                lendit_domain::RATING_MAX
            ),
        },
        DomainError::MissingHeadline => ApiError::InvalidInput {
            field: String::from("headline"),
            message: String::from("A review with text requires a headline"),
        },
        DomainError::ReviewFieldTooLong { field, max } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Review {field} exceeds the maximum of {max} characters"),
        },
        DomainError::InvalidTitle(msg) => ApiError::InvalidInput {
            field: String::from("title"),
            message: msg,
        },
        DomainError::InvalidPrice(msg) => ApiError::InvalidInput {
            field: String::from("price"),
            message: msg,
        },
        DomainError::OwnOfferBooking => ApiError::Forbidden {
            action: String::from("book_offer"),
            reason: String::from("a lessor cannot book their own offer"),
        },
        DomainError::OverlappingInterval { from, to } => ApiError::Conflict {
            rule: String::from("no_overlapping_interval"),
            message: format!("The range {from} to {to} overlaps an existing blocked interval"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Maps a persistence error onto the API taxonomy.
///
/// Duplicate emails surface as `Conflict`, missing records as
/// `ResourceNotFound`, everything else as `Internal` (collaborator failure,
/// never silently swallowed).
#[must_use]
pub fn map_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DuplicateEmail(email) => ApiError::Conflict {
            rule: String::from("unique_email"),
            message: format!("An account with email '{email}' already exists"),
        },
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        _ => ApiError::Internal {
            message: format!("Persistence error: {err}"),
        },
    }
}
