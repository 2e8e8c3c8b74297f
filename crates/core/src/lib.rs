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

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use lendit_domain::{Offer, Request, TransitionActor};

// Re-export public types and functions
pub use apply::{apply_booking, apply_timeout, apply_transition};
pub use command::Command;
pub use error::CoreError;
pub use state::{BookingResult, CalendarEffect, TransitionResult};

/// Resolves which transition role an authenticated account holds on a
/// request.
///
/// The lessor of the request's offer acts as `Lessor`, the requesting
/// account acts as `Lessee`; anyone else holds no role on the request.
///
/// # Arguments
///
/// * `offer` - The request's offer
/// * `request` - The request being acted on
/// * `account_id` - The authenticated account
#[must_use]
pub fn resolve_transition_actor(
    offer: &Offer,
    request: &Request,
    account_id: i64,
) -> Option<TransitionActor> {
    if account_id == offer.lessor_id {
        Some(TransitionActor::Lessor)
    } else if account_id == request.lessee_id {
        Some(TransitionActor::Lessee)
    } else {
        None
    }
}
