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

//! System chat messages for the Lendit rental marketplace.
//!
//! Only the system-message hook fired on booking creation lives here; the
//! full user-to-user chat protocol is out of scope. Messages are emitted by
//! the booking flow and stored alongside the request, so the conversation
//! between lessee and lessor starts with a machine-generated opener that
//! carries the request id as payload.

/// The type of a system chat message.
///
/// Currently the only system message is the booking opener; the enum leaves
/// room for further hooks without widening the chat scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Emitted lessee → lessor when a booking request is created.
    /// The message payload is the request id.
    OfferRequest,
}

impl MessageType {
    /// Returns the string representation of the message type.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OfferRequest => "offer_request",
        }
    }

    /// Parses a message type from its string representation.
    ///
    /// Returns `None` if the string is not a known message type.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "offer_request" => Some(Self::OfferRequest),
            _ => None,
        }
    }
}

/// A system chat message addressed from one account to another.
///
/// Delivery guarantees are the messaging layer's concern; from the core's
/// perspective emission is fire-and-forget and persisted atomically with the
/// operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemMessage {
    /// The sending account (the lessee for booking openers).
    pub from_user_id: i64,
    /// The receiving account (the lessor for booking openers).
    pub to_user_id: i64,
    /// The request this message refers to.
    /// `None` only before the request has been persisted.
    pub request_id: Option<i64>,
    /// The message type.
    pub message_type: MessageType,
}

impl SystemMessage {
    /// Creates the booking-opener message for a new request.
    ///
    /// # Arguments
    ///
    /// * `from_user_id` - The requesting lessee
    /// * `to_user_id` - The offer's lessor
    #[must_use]
    pub const fn offer_request(from_user_id: i64, to_user_id: i64) -> Self {
        Self {
            from_user_id,
            to_user_id,
            request_id: None,
            message_type: MessageType::OfferRequest,
        }
    }

    /// Returns a copy of this message bound to a persisted request id.
    #[must_use]
    pub const fn with_request_id(mut self, request_id: i64) -> Self {
        self.request_id = Some(request_id);
        self
    }
}
