// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rating queries.

use diesel::prelude::*;

use crate::data_models::RatingRow;
use crate::diesel_schema::{offer_ratings, user_ratings};
use crate::error::PersistenceError;
use lendit_domain::Rating;

/// Converts a stored rating row into the domain type.
fn rating_from_row(row: RatingRow) -> Rating {
    Rating {
        rating_id: Some(row.rating_id),
        owner_id: row.owner_id,
        value: row.rating,
        headline: row.headline,
        text: row.text,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Retrieves the non-deleted rating of `owner_id` for an offer.
pub fn get_offer_rating(
    conn: &mut SqliteConnection,
    offer_id: i64,
    owner_id: i64,
) -> Result<Option<Rating>, PersistenceError> {
    let row: Option<RatingRow> = offer_ratings::table
        .filter(offer_ratings::offer_id.eq(offer_id))
        .filter(offer_ratings::owner_id.eq(owner_id))
        .filter(offer_ratings::is_deleted.eq(false))
        .first::<RatingRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_offer_rating: {e}")))?;

    Ok(row.map(rating_from_row))
}

/// Lists all non-deleted rating values for an offer.
pub fn list_offer_rating_values(
    conn: &mut SqliteConnection,
    offer_id: i64,
) -> Result<Vec<i32>, PersistenceError> {
    offer_ratings::table
        .filter(offer_ratings::offer_id.eq(offer_id))
        .filter(offer_ratings::is_deleted.eq(false))
        .select(offer_ratings::rating)
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_offer_rating_values: {e}")))
}

/// Retrieves the non-deleted rating of `owner_id` for another account.
pub fn get_user_rating(
    conn: &mut SqliteConnection,
    rated_account_id: i64,
    owner_id: i64,
) -> Result<Option<Rating>, PersistenceError> {
    let row: Option<RatingRow> = user_ratings::table
        .filter(user_ratings::rated_account_id.eq(rated_account_id))
        .filter(user_ratings::owner_id.eq(owner_id))
        .filter(user_ratings::is_deleted.eq(false))
        .first::<RatingRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_user_rating: {e}")))?;

    Ok(row.map(rating_from_row))
}

/// Lists all non-deleted rating values for an account.
pub fn list_user_rating_values(
    conn: &mut SqliteConnection,
    rated_account_id: i64,
) -> Result<Vec<i32>, PersistenceError> {
    user_ratings::table
        .filter(user_ratings::rated_account_id.eq(rated_account_id))
        .filter(user_ratings::is_deleted.eq(false))
        .select(user_ratings::rating)
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_user_rating_values: {e}")))
}
