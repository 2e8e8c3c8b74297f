// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability calendar queries.

use diesel::prelude::*;

use crate::data_models::IntervalRow;
use crate::diesel_schema::blocked_intervals;
use crate::error::PersistenceError;
use lendit_domain::{BlockedInterval, DateRange, parse_calendar_day};

/// Converts a stored interval row into the domain type.
pub(crate) fn interval_from_row(row: IntervalRow) -> Result<BlockedInterval, PersistenceError> {
    let from_date = parse_calendar_day(&row.from_date)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let to_date = parse_calendar_day(&row.to_date)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let range: DateRange = DateRange::new(from_date, to_date)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

    Ok(BlockedInterval {
        interval_id: Some(row.interval_id),
        offer_id: row.offer_id,
        range,
        is_lessor: row.is_lessor,
        reason: row.reason,
    })
}

/// Lists all blocked intervals for an offer, both actor tags.
pub fn list_intervals_for_offer(
    conn: &mut SqliteConnection,
    offer_id: i64,
) -> Result<Vec<BlockedInterval>, PersistenceError> {
    let rows: Vec<IntervalRow> = blocked_intervals::table
        .filter(blocked_intervals::offer_id.eq(offer_id))
        .order(blocked_intervals::from_date.asc())
        .load::<IntervalRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_intervals_for_offer: {e}")))?;

    rows.into_iter().map(interval_from_row).collect()
}
