// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rating mutations.
//!
//! Every rating write recomputes the target's aggregate from the full set
//! of stored, non-deleted values inside the same transaction. Updates fall
//! back to creation when no prior rating exists (update-or-create).

use diesel::prelude::*;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{accounts, offer_ratings, offers, user_ratings};
use crate::error::PersistenceError;
use lendit_domain::{Rating, RatingAggregate, compute_rating_aggregate};

/// Creates or updates the rating of `owner_id` for an offer and recomputes
/// the offer's aggregate.
///
/// # Returns
///
/// The stored rating and the recomputed aggregate.
///
/// # Errors
///
/// Returns an error if any write fails; nothing is persisted in that case.
pub fn upsert_offer_rating(
    conn: &mut SqliteConnection,
    offer_id: i64,
    owner_id: i64,
    value: i32,
    headline: Option<&str>,
    text: Option<&str>,
    now: &str,
) -> Result<(Rating, RatingAggregate), PersistenceError> {
    let result = conn.transaction::<(Rating, RatingAggregate), PersistenceError, _>(|conn| {
        let existing: Option<(i64, String)> = offer_ratings::table
            .filter(offer_ratings::offer_id.eq(offer_id))
            .filter(offer_ratings::owner_id.eq(owner_id))
            .filter(offer_ratings::is_deleted.eq(false))
            .select((offer_ratings::rating_id, offer_ratings::created_at))
            .first(conn)
            .optional()?;

        let (rating_id, created_at): (i64, String) = match existing {
            Some((rating_id, created_at)) => {
                diesel::update(
                    offer_ratings::table.filter(offer_ratings::rating_id.eq(rating_id)),
                )
                .set((
                    offer_ratings::rating.eq(value),
                    offer_ratings::headline.eq(headline),
                    offer_ratings::text.eq(text),
                    offer_ratings::updated_at.eq(now),
                ))
                .execute(conn)?;
                (rating_id, created_at)
            }
            None => {
                diesel::insert_into(offer_ratings::table)
                    .values((
                        offer_ratings::offer_id.eq(offer_id),
                        offer_ratings::owner_id.eq(owner_id),
                        offer_ratings::rating.eq(value),
                        offer_ratings::headline.eq(headline),
                        offer_ratings::text.eq(text),
                        offer_ratings::is_deleted.eq(false),
                        offer_ratings::created_at.eq(now),
                        offer_ratings::updated_at.eq(now),
                    ))
                    .execute(conn)?;
                (get_last_insert_rowid(conn)?, now.to_string())
            }
        };

        let values: Vec<i32> = offer_ratings::table
            .filter(offer_ratings::offer_id.eq(offer_id))
            .filter(offer_ratings::is_deleted.eq(false))
            .select(offer_ratings::rating)
            .load(conn)?;
        let aggregate: RatingAggregate = compute_rating_aggregate(&values);

        diesel::update(offers::table.filter(offers::offer_id.eq(offer_id)))
            .set((
                offers::rating_mean.eq(aggregate.mean),
                offers::rating_count.eq(aggregate.count),
            ))
            .execute(conn)?;

        let rating: Rating = Rating {
            rating_id: Some(rating_id),
            owner_id,
            value,
            headline: headline.map(ToString::to_string),
            text: text.map(ToString::to_string),
            created_at,
            updated_at: now.to_string(),
        };

        Ok((rating, aggregate))
    })?;

    info!(offer_id, owner_id, "Offer rating stored");
    Ok(result)
}

/// Soft-deletes the rating of `owner_id` for an offer and recomputes the
/// offer's aggregate.
///
/// # Returns
///
/// The recomputed aggregate, or `None` if no rating existed.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn delete_offer_rating(
    conn: &mut SqliteConnection,
    offer_id: i64,
    owner_id: i64,
    now: &str,
) -> Result<Option<RatingAggregate>, PersistenceError> {
    conn.transaction::<Option<RatingAggregate>, PersistenceError, _>(|conn| {
        let existing: Option<i64> = offer_ratings::table
            .filter(offer_ratings::offer_id.eq(offer_id))
            .filter(offer_ratings::owner_id.eq(owner_id))
            .filter(offer_ratings::is_deleted.eq(false))
            .select(offer_ratings::rating_id)
            .first(conn)
            .optional()?;

        let Some(rating_id) = existing else {
            return Ok(None);
        };

        diesel::update(offer_ratings::table.filter(offer_ratings::rating_id.eq(rating_id)))
            .set((
                offer_ratings::is_deleted.eq(true),
                offer_ratings::updated_at.eq(now),
            ))
            .execute(conn)?;

        let values: Vec<i32> = offer_ratings::table
            .filter(offer_ratings::offer_id.eq(offer_id))
            .filter(offer_ratings::is_deleted.eq(false))
            .select(offer_ratings::rating)
            .load(conn)?;
        let aggregate: RatingAggregate = compute_rating_aggregate(&values);

        diesel::update(offers::table.filter(offers::offer_id.eq(offer_id)))
            .set((
                offers::rating_mean.eq(aggregate.mean),
                offers::rating_count.eq(aggregate.count),
            ))
            .execute(conn)?;

        Ok(Some(aggregate))
    })
}

/// Creates or updates the rating of `owner_id` for another account and
/// recomputes the rated account's aggregate.
///
/// # Errors
///
/// Returns an error if any write fails; nothing is persisted in that case.
pub fn upsert_user_rating(
    conn: &mut SqliteConnection,
    rated_account_id: i64,
    owner_id: i64,
    value: i32,
    headline: Option<&str>,
    text: Option<&str>,
    now: &str,
) -> Result<(Rating, RatingAggregate), PersistenceError> {
    let result = conn.transaction::<(Rating, RatingAggregate), PersistenceError, _>(|conn| {
        let existing: Option<(i64, String)> = user_ratings::table
            .filter(user_ratings::rated_account_id.eq(rated_account_id))
            .filter(user_ratings::owner_id.eq(owner_id))
            .filter(user_ratings::is_deleted.eq(false))
            .select((user_ratings::rating_id, user_ratings::created_at))
            .first(conn)
            .optional()?;

        let (rating_id, created_at): (i64, String) = match existing {
            Some((rating_id, created_at)) => {
                diesel::update(user_ratings::table.filter(user_ratings::rating_id.eq(rating_id)))
                    .set((
                        user_ratings::rating.eq(value),
                        user_ratings::headline.eq(headline),
                        user_ratings::text.eq(text),
                        user_ratings::updated_at.eq(now),
                    ))
                    .execute(conn)?;
                (rating_id, created_at)
            }
            None => {
                diesel::insert_into(user_ratings::table)
                    .values((
                        user_ratings::rated_account_id.eq(rated_account_id),
                        user_ratings::owner_id.eq(owner_id),
                        user_ratings::rating.eq(value),
                        user_ratings::headline.eq(headline),
                        user_ratings::text.eq(text),
                        user_ratings::is_deleted.eq(false),
                        user_ratings::created_at.eq(now),
                        user_ratings::updated_at.eq(now),
                    ))
                    .execute(conn)?;
                (get_last_insert_rowid(conn)?, now.to_string())
            }
        };

        let values: Vec<i32> = user_ratings::table
            .filter(user_ratings::rated_account_id.eq(rated_account_id))
            .filter(user_ratings::is_deleted.eq(false))
            .select(user_ratings::rating)
            .load(conn)?;
        let aggregate: RatingAggregate = compute_rating_aggregate(&values);

        diesel::update(accounts::table.filter(accounts::account_id.eq(rated_account_id)))
            .set((
                accounts::rating_mean.eq(aggregate.mean),
                accounts::rating_count.eq(aggregate.count),
            ))
            .execute(conn)?;

        let rating: Rating = Rating {
            rating_id: Some(rating_id),
            owner_id,
            value,
            headline: headline.map(ToString::to_string),
            text: text.map(ToString::to_string),
            created_at,
            updated_at: now.to_string(),
        };

        Ok((rating, aggregate))
    })?;

    info!(rated_account_id, owner_id, "User rating stored");
    Ok(result)
}

/// Soft-deletes the rating of `owner_id` for another account and recomputes
/// the rated account's aggregate.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn delete_user_rating(
    conn: &mut SqliteConnection,
    rated_account_id: i64,
    owner_id: i64,
    now: &str,
) -> Result<Option<RatingAggregate>, PersistenceError> {
    conn.transaction::<Option<RatingAggregate>, PersistenceError, _>(|conn| {
        let existing: Option<i64> = user_ratings::table
            .filter(user_ratings::rated_account_id.eq(rated_account_id))
            .filter(user_ratings::owner_id.eq(owner_id))
            .filter(user_ratings::is_deleted.eq(false))
            .select(user_ratings::rating_id)
            .first(conn)
            .optional()?;

        let Some(rating_id) = existing else {
            return Ok(None);
        };

        diesel::update(user_ratings::table.filter(user_ratings::rating_id.eq(rating_id)))
            .set((
                user_ratings::is_deleted.eq(true),
                user_ratings::updated_at.eq(now),
            ))
            .execute(conn)?;

        let values: Vec<i32> = user_ratings::table
            .filter(user_ratings::rated_account_id.eq(rated_account_id))
            .filter(user_ratings::is_deleted.eq(false))
            .select(user_ratings::rating)
            .load(conn)?;
        let aggregate: RatingAggregate = compute_rating_aggregate(&values);

        diesel::update(accounts::table.filter(accounts::account_id.eq(rated_account_id)))
            .set((
                accounts::rating_mean.eq(aggregate.mean),
                accounts::rating_count.eq(aggregate.count),
            ))
            .execute(conn)?;

        Ok(Some(aggregate))
    })
}
