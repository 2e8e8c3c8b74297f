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
    clippy::all
)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedUser, AuthenticationService, generate_handoff_code};
pub use error::{
    ApiError, AuthError, map_persistence_error, translate_core_error, translate_domain_error,
};
pub use handlers::{
    account_to_response, book_offer, create_offer, delete_offer, delete_offer_rating,
    delete_user_rating, get_account, get_offer, get_request, handle_request, list_blocked_dates,
    list_offers, list_request_messages, list_requests, rate_offer, rate_user, register_account,
    set_blocked_dates, sweep_request_timeouts, update_offer, update_offer_rating,
    update_user_rating,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AccountResponse, BlockedDateInput, BookOfferRequest, ChatMessageResponse,
    DeleteRatingResponse, HandleRequestRequest, IntervalResponse, ListRequestsResponse,
    LoginRequest, LoginResponse, OfferInput, OfferResponse, RateRequest, RatingResponse,
    RegisterAccountRequest, RequestListItem, RequestResponse, SetBlockedDatesRequest,
    SweepTimeoutsResponse,
};
