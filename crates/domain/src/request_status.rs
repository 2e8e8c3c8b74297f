// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request status tracking and transition logic.
//!
//! This module defines the booking-request lifecycle states and the guards
//! that govern every transition: which actor may perform it, and whether a
//! hand-off code must be absent or must match the presented value.
//!
//! ## Invariants
//!
//! - A request only ever advances along the documented transition table
//! - Replaying a transition is rejected, never treated as a no-op: the
//!   hand-off code guards fail on the second attempt
//! - `CanceledByLessor` is reserved and not yet actionable; no transition
//!   into it is legal

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sentinel value a hand-off code is set to once the transaction closes.
///
/// The code is retired rather than cleared so the record shows the hand-off
/// completed.
pub const RETIRED_HANDOFF_CODE: &str = "null";

/// Booking-request lifecycle states.
///
/// Each state carries a stable numeric code used for persistence and by
/// API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Request created by the lessee, awaiting a lessor decision
    Open,
    /// Lessor accepted; the date range is blocked and a hand-off code issued
    AcceptedByLessor,
    /// Lessor rejected the request
    RejectedByLessor,
    /// Item handed over to the lessee against the hand-off code
    ItemLentToLessee,
    /// Item returned to the lessor against the rotated hand-off code
    ItemReturnedToLessor,
    /// Reserved: lessor-side cancellation is not yet actionable
    CanceledByLessor,
    /// Lessee withdrew the request before acceptance
    CanceledByLessee,
    /// Request expired without a lessor decision
    TimedOut,
}

impl RequestStatus {
    /// Returns the stable numeric code of this status.
    ///
    /// This is the value persisted in the requests table and exposed to
    /// API clients.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Open => 1,
            Self::AcceptedByLessor => 2,
            Self::RejectedByLessor => 3,
            Self::ItemLentToLessee => 4,
            Self::ItemReturnedToLessor => 5,
            Self::CanceledByLessor => 6,
            Self::CanceledByLessee => 7,
            Self::TimedOut => 8,
        }
    }

    /// Parses a status from its numeric code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusCode` if the code is unknown.
    pub fn from_code(code: i32) -> Result<Self, DomainError> {
        match code {
            1 => Ok(Self::Open),
            2 => Ok(Self::AcceptedByLessor),
            3 => Ok(Self::RejectedByLessor),
            4 => Ok(Self::ItemLentToLessee),
            5 => Ok(Self::ItemReturnedToLessor),
            6 => Ok(Self::CanceledByLessor),
            7 => Ok(Self::CanceledByLessee),
            8 => Ok(Self::TimedOut),
            _ => Err(DomainError::InvalidStatusCode { code }),
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::AcceptedByLessor => "accepted_by_lessor",
            Self::RejectedByLessor => "rejected_by_lessor",
            Self::ItemLentToLessee => "item_lent_to_lessee",
            Self::ItemReturnedToLessor => "item_returned_to_lessor",
            Self::CanceledByLessor => "canceled_by_lessor",
            Self::CanceledByLessee => "canceled_by_lessee",
            Self::TimedOut => "timed_out",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "open" => Ok(Self::Open),
            "accepted_by_lessor" => Ok(Self::AcceptedByLessor),
            "rejected_by_lessor" => Ok(Self::RejectedByLessor),
            "item_lent_to_lessee" => Ok(Self::ItemLentToLessee),
            "item_returned_to_lessor" => Ok(Self::ItemReturnedToLessor),
            "canceled_by_lessor" => Ok(Self::CanceledByLessor),
            "canceled_by_lessee" => Ok(Self::CanceledByLessee),
            "timed_out" => Ok(Self::TimedOut),
            _ => Err(DomainError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal (no further transitions).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::RejectedByLessor
                | Self::ItemReturnedToLessor
                | Self::CanceledByLessee
                | Self::TimedOut
        )
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The party performing a transition, resolved against the request's offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionActor {
    /// The owner of the request's offer
    Lessor,
    /// The user who created the request
    Lessee,
    /// No human actor: the timeout sweep
    System,
}

impl TransitionActor {
    /// Returns the string representation of the actor.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lessor => "lessor",
            Self::Lessee => "lessee",
            Self::System => "system",
        }
    }
}

/// Validates a request lifecycle transition.
///
/// Checks, in order: the (from, to) pair is in the transition table, the
/// acting party matches the table, and the hand-off code guard holds
/// (no code issued yet for decisions on an open request; stored code equal
/// to the presented code for the lend and return hand-offs).
///
/// # Arguments
///
/// * `current` - The request's current status
/// * `desired` - The requested status
/// * `actor` - The acting party, resolved against the request's offer
/// * `stored_code` - The hand-off code currently on the request, if any
/// * `presented_code` - The code presented by the actor, if any
///
/// # Errors
///
/// Returns `DomainError::IllegalTransition` for every violation, including
/// replayed transitions (the code guards fail on replay).
pub fn validate_transition(
    current: RequestStatus,
    desired: RequestStatus,
    actor: TransitionActor,
    stored_code: Option<&str>,
    presented_code: Option<&str>,
) -> Result<(), DomainError> {
    let illegal = |reason: &str| DomainError::IllegalTransition {
        from: current.as_str().to_string(),
        to: desired.as_str().to_string(),
        reason: reason.to_string(),
    };

    if current.is_terminal() {
        return Err(illegal("cannot transition from a terminal state"));
    }

    if desired == RequestStatus::CanceledByLessor {
        return Err(illegal("lessor-side cancellation is not yet available"));
    }

    match (current, desired) {
        (RequestStatus::Open, RequestStatus::AcceptedByLessor)
        | (RequestStatus::Open, RequestStatus::RejectedByLessor) => {
            if actor != TransitionActor::Lessor {
                return Err(illegal("only the offer's lessor may decide an open request"));
            }
            if stored_code.is_some() {
                return Err(illegal("a hand-off code has already been issued"));
            }
            Ok(())
        }
        (RequestStatus::Open, RequestStatus::CanceledByLessee) => {
            if actor != TransitionActor::Lessee {
                return Err(illegal("only the requesting lessee may cancel"));
            }
            if stored_code.is_some() {
                return Err(illegal("a hand-off code has already been issued"));
            }
            Ok(())
        }
        (RequestStatus::Open, RequestStatus::TimedOut) => {
            if actor != TransitionActor::System {
                return Err(illegal("timeout is a system transition"));
            }
            Ok(())
        }
        (RequestStatus::AcceptedByLessor, RequestStatus::ItemLentToLessee) => {
            if actor != TransitionActor::Lessor {
                return Err(illegal("only the offer's lessor may hand over the item"));
            }
            validate_handoff_code(stored_code, presented_code).map_err(|()| {
                illegal("the presented hand-off code is missing or does not match")
            })
        }
        (RequestStatus::ItemLentToLessee, RequestStatus::ItemReturnedToLessor) => {
            if actor != TransitionActor::Lessee {
                return Err(illegal("only the requesting lessee may return the item"));
            }
            validate_handoff_code(stored_code, presented_code).map_err(|()| {
                illegal("the presented hand-off code is missing or does not match")
            })
        }
        _ => Err(illegal("transition not permitted by request lifecycle rules")),
    }
}

/// Checks that a stored hand-off code exists, is not retired, and equals the
/// presented code.
fn validate_handoff_code(stored: Option<&str>, presented: Option<&str>) -> Result<(), ()> {
    match (stored, presented) {
        (Some(stored), Some(presented))
            if stored == presented && stored != RETIRED_HANDOFF_CODE =>
        {
            Ok(())
        }
        _ => Err(()),
    }
}
