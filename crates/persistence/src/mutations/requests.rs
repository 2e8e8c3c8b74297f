// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking request mutations.
//!
//! Requests are never physically deleted; their history is retained and the
//! status column only moves along the lifecycle transition table.

use diesel::prelude::*;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewRequest;
use crate::diesel_schema::{chat_messages, requests};
use crate::error::PersistenceError;
use crate::mutations::intervals::insert_interval;
use lendit::{CalendarEffect, TransitionResult};
use lendit_chat::SystemMessage;
use lendit_domain::Request;

/// Persists a new booking: the request plus its system chat message.
///
/// Both rows are written in one transaction so the chat opener can never
/// exist without its request, nor the other way around.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `request` - The request to insert (id must be unset)
/// * `message` - The system message announcing the request
///
/// # Returns
///
/// The request id assigned by the database.
///
/// # Errors
///
/// Returns an error if either insert fails; nothing is persisted in that
/// case.
pub fn persist_booking(
    conn: &mut SqliteConnection,
    request: &Request,
    message: &SystemMessage,
) -> Result<i64, PersistenceError> {
    let request_id: i64 = conn.transaction::<i64, PersistenceError, _>(|conn| {
        let record = NewRequest {
            offer_id: request.offer_id,
            lessee_id: request.lessee_id,
            status: request.status.code(),
            from_date: request.date_range.from_date().to_string(),
            to_date: request.date_range.to_date().to_string(),
            message: &request.message,
            qr_code: request.qr_code.as_deref(),
            lessor_has_update: request.lessor_has_update,
            lessee_has_update: request.lessee_has_update,
            created_at: &request.created_at,
            updated_at: &request.updated_at,
        };

        diesel::insert_into(requests::table)
            .values(&record)
            .execute(conn)?;

        let request_id: i64 = get_last_insert_rowid(conn)?;

        diesel::insert_into(chat_messages::table)
            .values((
                chat_messages::from_account_id.eq(message.from_user_id),
                chat_messages::to_account_id.eq(message.to_user_id),
                chat_messages::request_id.eq(request_id),
                chat_messages::message_type.eq(message.message_type.as_str()),
                chat_messages::created_at.eq(&request.created_at),
            ))
            .execute(conn)?;

        Ok(request_id)
    })?;

    info!(
        request_id,
        offer_id = request.offer_id,
        lessee_id = request.lessee_id,
        "Booking request persisted"
    );

    Ok(request_id)
}

/// Persists a request state transition and its calendar effect.
///
/// The request row update and any interval insert happen in one
/// transaction: the calendar can never block a range for a transition that
/// did not persist.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `result` - The transition result produced by the core
///
/// # Errors
///
/// Returns an error if the request has no persisted id or a write fails.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<(), PersistenceError> {
    let request: &Request = &result.new_request;
    let request_id: i64 = request
        .request_id
        .ok_or_else(|| PersistenceError::Other(String::from("request has no persisted id")))?;

    conn.transaction::<(), PersistenceError, _>(|conn| {
        diesel::update(requests::table.filter(requests::request_id.eq(request_id)))
            .set((
                requests::status.eq(request.status.code()),
                requests::qr_code.eq(request.qr_code.as_deref()),
                requests::lessor_has_update.eq(request.lessor_has_update),
                requests::lessee_has_update.eq(request.lessee_has_update),
                requests::updated_at.eq(&request.updated_at),
            ))
            .execute(conn)?;

        match &result.calendar_effect {
            CalendarEffect::None => {}
            CalendarEffect::BlockRange(interval) => {
                insert_interval(conn, interval)?;
            }
        }

        Ok(())
    })?;

    info!(
        request_id,
        status = request.status.as_str(),
        "Request transition persisted"
    );

    Ok(())
}

/// Marks a request as seen for one side.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `request_id` - The request being read
/// * `lessor_side` - True to clear the lessor flag, false for the lessee flag
pub fn mark_request_seen(
    conn: &mut SqliteConnection,
    request_id: i64,
    lessor_side: bool,
) -> Result<(), PersistenceError> {
    if lessor_side {
        diesel::update(requests::table.filter(requests::request_id.eq(request_id)))
            .set(requests::lessor_has_update.eq(false))
            .execute(conn)?;
    } else {
        diesel::update(requests::table.filter(requests::request_id.eq(request_id)))
            .set(requests::lessee_has_update.eq(false))
            .execute(conn)?;
    }
    Ok(())
}
