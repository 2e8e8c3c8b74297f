// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking request queries.

use diesel::prelude::*;

use crate::data_models::RequestRow;
use crate::diesel_schema::{offers, requests};
use crate::error::PersistenceError;
use lendit_domain::{DateRange, Request, RequestStatus, parse_calendar_day};

/// Converts a stored request row into the domain type.
pub(crate) fn request_from_row(row: RequestRow) -> Result<Request, PersistenceError> {
    let status: RequestStatus = RequestStatus::from_code(row.status)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let from_date = parse_calendar_day(&row.from_date)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let to_date = parse_calendar_day(&row.to_date)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let date_range: DateRange = DateRange::new(from_date, to_date)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

    Ok(Request {
        request_id: Some(row.request_id),
        offer_id: row.offer_id,
        lessee_id: row.lessee_id,
        status,
        date_range,
        message: row.message,
        qr_code: row.qr_code,
        lessor_has_update: row.lessor_has_update,
        lessee_has_update: row.lessee_has_update,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Retrieves a request by id.
pub fn get_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<Option<Request>, PersistenceError> {
    let row: Option<RequestRow> = requests::table
        .filter(requests::request_id.eq(request_id))
        .first::<RequestRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_request: {e}")))?;

    row.map(request_from_row).transpose()
}

/// Lists all requests created by a lessee, newest first.
pub fn list_requests_for_lessee(
    conn: &mut SqliteConnection,
    lessee_id: i64,
) -> Result<Vec<Request>, PersistenceError> {
    let rows: Vec<RequestRow> = requests::table
        .filter(requests::lessee_id.eq(lessee_id))
        .order(requests::request_id.desc())
        .load::<RequestRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_requests_for_lessee: {e}")))?;

    rows.into_iter().map(request_from_row).collect()
}

/// Lists all requests against offers owned by a lessor, newest first.
pub fn list_requests_for_lessor(
    conn: &mut SqliteConnection,
    lessor_id: i64,
) -> Result<Vec<Request>, PersistenceError> {
    let rows: Vec<RequestRow> = requests::table
        .inner_join(offers::table)
        .filter(offers::lessor_id.eq(lessor_id))
        .order(requests::request_id.desc())
        .select(requests::all_columns)
        .load::<RequestRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_requests_for_lessor: {e}")))?;

    rows.into_iter().map(request_from_row).collect()
}

/// Lists open requests created before the given cutoff timestamp.
///
/// Timestamps are ISO 8601 strings produced by the API layer, so
/// lexicographic comparison matches chronological order.
pub fn list_stale_open_requests(
    conn: &mut SqliteConnection,
    cutoff: &str,
) -> Result<Vec<Request>, PersistenceError> {
    let rows: Vec<RequestRow> = requests::table
        .filter(requests::status.eq(RequestStatus::Open.code()))
        .filter(requests::created_at.lt(cutoff))
        .order(requests::request_id.asc())
        .load::<RequestRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_stale_open_requests: {e}")))?;

    rows.into_iter().map(request_from_row).collect()
}

/// Counts the requests a lessee holds against an offer, any status.
///
/// Used as the rating-eligibility gate for offer ratings.
pub fn count_requests_for_offer_by_lessee(
    conn: &mut SqliteConnection,
    offer_id: i64,
    lessee_id: i64,
) -> Result<i64, PersistenceError> {
    requests::table
        .filter(requests::offer_id.eq(offer_id))
        .filter(requests::lessee_id.eq(lessee_id))
        .count()
        .get_result(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("count_requests_for_offer_by_lessee: {e}"))
        })
}

/// Counts the requests connecting two accounts in either role.
///
/// Used as the rating-eligibility gate for user ratings: the rating owner
/// must share at least one request with the rated account, as lessee or as
/// lessor.
pub fn count_requests_between_accounts(
    conn: &mut SqliteConnection,
    account_a: i64,
    account_b: i64,
) -> Result<i64, PersistenceError> {
    requests::table
        .inner_join(offers::table)
        .filter(
            requests::lessee_id
                .eq(account_a)
                .and(offers::lessor_id.eq(account_b))
                .or(requests::lessee_id
                    .eq(account_b)
                    .and(offers::lessor_id.eq(account_a))),
        )
        .count()
        .get_result(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("count_requests_between_accounts: {e}"))
        })
}
