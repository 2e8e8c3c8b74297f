// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use lendit_domain::{DateRange, RequestStatus};

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request booking state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Book an offer, creating a new request in the `Open` state.
    BookOffer {
        /// The offer being booked.
        offer_id: i64,
        /// The requested rental period.
        date_range: DateRange,
        /// Free-text message to the lessor. May be empty.
        message: String,
    },
    /// Advance an existing request to the desired status.
    HandleRequest {
        /// The request to transition.
        request_id: i64,
        /// The status the actor wants to reach.
        desired_status: RequestStatus,
        /// The hand-off code presented for the lend/return legs.
        presented_code: Option<String>,
    },
    /// Time out a stale open request. Carries no human actor.
    TimeOutRequest {
        /// The request to time out.
        request_id: i64,
    },
}
