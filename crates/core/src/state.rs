// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use lendit_chat::SystemMessage;
use lendit_domain::{BlockedInterval, Request};

/// Calendar side effect of a successful transition.
///
/// The persistence layer applies the effect atomically with the request
/// update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEffect {
    /// No calendar change.
    None,
    /// Register a blocked interval (acceptance blocks the booked range).
    BlockRange(BlockedInterval),
}

/// The result of a successful booking.
///
/// Bookings are atomic: the request and the system chat message either both
/// persist or neither does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingResult {
    /// The new request in the `Open` state.
    pub request: Request,
    /// The system chat message announcing the request, lessee → lessor.
    pub system_message: SystemMessage,
}

/// The result of a successful request state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new request value after the transition.
    pub new_request: Request,
    /// The calendar side effect to apply alongside the request update.
    pub calendar_effect: CalendarEffect,
}
