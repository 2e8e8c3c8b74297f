// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability calendar mutations.

use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewInterval;
use crate::diesel_schema::blocked_intervals;
use crate::error::PersistenceError;
use lendit_domain::BlockedInterval;

/// Inserts a blocked interval.
pub fn insert_interval(
    conn: &mut SqliteConnection,
    interval: &BlockedInterval,
) -> Result<i64, PersistenceError> {
    let record = NewInterval {
        offer_id: interval.offer_id,
        from_date: interval.range.from_date().to_string(),
        to_date: interval.range.to_date().to_string(),
        is_lessor: interval.is_lessor,
        reason: interval.reason.as_deref(),
    };

    diesel::insert_into(blocked_intervals::table)
        .values(&record)
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Removes all intervals with the given actor tag for an offer.
///
/// Used when a lessor replaces their manual blocks.
pub fn delete_intervals_for_actor(
    conn: &mut SqliteConnection,
    offer_id: i64,
    is_lessor: bool,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(
        blocked_intervals::table
            .filter(blocked_intervals::offer_id.eq(offer_id))
            .filter(blocked_intervals::is_lessor.eq(is_lessor)),
    )
    .execute(conn)?;

    debug!(offer_id, is_lessor, deleted, "Removed blocked intervals");
    Ok(deleted)
}

/// Replaces the lessor-tagged intervals of an offer in one transaction.
pub fn replace_lessor_intervals(
    conn: &mut SqliteConnection,
    offer_id: i64,
    intervals: &[BlockedInterval],
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        delete_intervals_for_actor(conn, offer_id, true)?;
        for interval in intervals {
            insert_interval(conn, interval)?;
        }
        Ok(())
    })
}
