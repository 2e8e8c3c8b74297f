// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Offer queries.

use diesel::prelude::*;

use crate::data_models::OfferRow;
use crate::diesel_schema::offers;
use crate::error::PersistenceError;
use lendit_domain::{Offer, RatingAggregate};

/// Converts a stored offer row into the domain type.
pub(crate) fn offer_from_row(row: OfferRow) -> Result<Offer, PersistenceError> {
    let pictures: Vec<String> = serde_json::from_str(&row.pictures_json)?;

    Ok(Offer {
        offer_id: Some(row.offer_id),
        lessor_id: row.lessor_id,
        title: row.title,
        description: row.description,
        price: row.price,
        category_id: row.category_id,
        rating: RatingAggregate {
            mean: row.rating_mean,
            count: row.rating_count,
        },
        pictures,
        is_deleted: row.is_deleted,
        created_at: row.created_at,
    })
}

/// Retrieves an offer by id, including soft-deleted ones.
///
/// Callers decide whether a soft-deleted offer is acceptable for their
/// operation (read access remains possible after deletion).
pub fn get_offer(
    conn: &mut SqliteConnection,
    offer_id: i64,
) -> Result<Option<Offer>, PersistenceError> {
    let row: Option<OfferRow> = offers::table
        .filter(offers::offer_id.eq(offer_id))
        .first::<OfferRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_offer: {e}")))?;

    row.map(offer_from_row).transpose()
}

/// Lists non-deleted offers, optionally filtered by category and lessor.
pub fn list_offers(
    conn: &mut SqliteConnection,
    category_id: Option<i64>,
    lessor_id: Option<i64>,
) -> Result<Vec<Offer>, PersistenceError> {
    let mut query = offers::table
        .filter(offers::is_deleted.eq(false))
        .into_boxed();

    if let Some(category_id) = category_id {
        query = query.filter(offers::category_id.eq(category_id));
    }
    if let Some(lessor_id) = lessor_id {
        query = query.filter(offers::lessor_id.eq(lessor_id));
    }

    let rows: Vec<OfferRow> = query
        .order(offers::offer_id.asc())
        .load::<OfferRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_offers: {e}")))?;

    rows.into_iter().map(offer_from_row).collect()
}
