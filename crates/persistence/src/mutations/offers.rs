// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Offer mutations.

use diesel::prelude::*;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewOffer;
use crate::diesel_schema::{blocked_intervals, offers};
use crate::error::PersistenceError;
use lendit_domain::Offer;

/// Inserts a new offer.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `offer` - The offer to insert (id must be unset)
///
/// # Errors
///
/// Returns an error if the insert fails or the picture list cannot be
/// serialized.
pub fn insert_offer(conn: &mut SqliteConnection, offer: &Offer) -> Result<i64, PersistenceError> {
    let pictures_json: String = serde_json::to_string(&offer.pictures)?;

    let record = NewOffer {
        lessor_id: offer.lessor_id,
        title: &offer.title,
        description: &offer.description,
        price: offer.price,
        category_id: offer.category_id,
        rating_mean: offer.rating.mean,
        rating_count: offer.rating.count,
        pictures_json: &pictures_json,
        is_deleted: offer.is_deleted,
        created_at: &offer.created_at,
    };

    diesel::insert_into(offers::table)
        .values(&record)
        .execute(conn)?;

    let offer_id: i64 = get_last_insert_rowid(conn)?;

    info!(offer_id, lessor_id = offer.lessor_id, "Offer created");

    Ok(offer_id)
}

/// Updates an offer's editable fields.
///
/// Aggregate rating and the soft-delete flag are managed by their own
/// mutations and are not touched here.
pub fn update_offer_fields(
    conn: &mut SqliteConnection,
    offer_id: i64,
    title: &str,
    description: &str,
    price: f64,
    category_id: i64,
    pictures: &[String],
) -> Result<(), PersistenceError> {
    let pictures_json: String = serde_json::to_string(pictures)?;

    diesel::update(offers::table.filter(offers::offer_id.eq(offer_id)))
        .set((
            offers::title.eq(title),
            offers::description.eq(description),
            offers::price.eq(price),
            offers::category_id.eq(category_id),
            offers::pictures_json.eq(&pictures_json),
        ))
        .execute(conn)?;
    Ok(())
}

/// Soft-deletes an offer and removes its blocked intervals.
///
/// The offer record is retained (read access stays possible) but becomes
/// immutable; the availability calendar is cleared in the same transaction.
pub fn soft_delete_offer(
    conn: &mut SqliteConnection,
    offer_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        diesel::update(offers::table.filter(offers::offer_id.eq(offer_id)))
            .set(offers::is_deleted.eq(true))
            .execute(conn)?;

        diesel::delete(blocked_intervals::table.filter(blocked_intervals::offer_id.eq(offer_id)))
            .execute(conn)?;

        Ok(())
    })?;

    info!(offer_id, "Offer soft-deleted");
    Ok(())
}

/// Writes a recomputed aggregate rating onto an offer.
pub fn update_offer_aggregate(
    conn: &mut SqliteConnection,
    offer_id: i64,
    mean: f64,
    count: i64,
) -> Result<(), PersistenceError> {
    diesel::update(offers::table.filter(offers::offer_id.eq(offer_id)))
        .set((offers::rating_mean.eq(mean), offers::rating_count.eq(count)))
        .execute(conn)?;
    Ok(())
}
