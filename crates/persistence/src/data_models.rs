// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Public account data, without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountData {
    pub account_id: i64,
    pub email: String,
    pub display_name: String,
    pub rating_mean: f64,
    pub rating_count: i64,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// Credentials row used by the login path only.
#[derive(Debug, Clone, Queryable)]
pub struct AccountCredentials {
    pub account_id: i64,
    pub password_hash: String,
}

/// Serializable representation of a session.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub account_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Full account row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct AccountRow {
    pub account_id: i64,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub rating_mean: f64,
    pub rating_count: i64,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<AccountRow> for AccountData {
    fn from(row: AccountRow) -> Self {
        Self {
            account_id: row.account_id,
            email: row.email,
            display_name: row.display_name,
            rating_mean: row.rating_mean,
            rating_count: row.rating_count,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

/// Offer row as stored. Pictures are a JSON array of file references.
#[derive(Debug, Clone, Queryable)]
pub struct OfferRow {
    pub offer_id: i64,
    pub lessor_id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category_id: i64,
    pub rating_mean: f64,
    pub rating_count: i64,
    pub pictures_json: String,
    pub is_deleted: bool,
    pub created_at: String,
}

/// Insertable offer row.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::diesel_schema::offers)]
pub struct NewOffer<'a> {
    pub lessor_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub category_id: i64,
    pub rating_mean: f64,
    pub rating_count: i64,
    pub pictures_json: &'a str,
    pub is_deleted: bool,
    pub created_at: &'a str,
}

/// Blocked interval row as stored. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Queryable)]
pub struct IntervalRow {
    pub interval_id: i64,
    pub offer_id: i64,
    pub from_date: String,
    pub to_date: String,
    pub is_lessor: bool,
    pub reason: Option<String>,
}

/// Insertable blocked interval row.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::diesel_schema::blocked_intervals)]
pub struct NewInterval<'a> {
    pub offer_id: i64,
    pub from_date: String,
    pub to_date: String,
    pub is_lessor: bool,
    pub reason: Option<&'a str>,
}

/// Request row as stored. Status is the numeric lifecycle code.
#[derive(Debug, Clone, Queryable)]
pub struct RequestRow {
    pub request_id: i64,
    pub offer_id: i64,
    pub lessee_id: i64,
    pub status: i32,
    pub from_date: String,
    pub to_date: String,
    pub message: String,
    pub qr_code: Option<String>,
    pub lessor_has_update: bool,
    pub lessee_has_update: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Insertable request row.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::diesel_schema::requests)]
pub struct NewRequest<'a> {
    pub offer_id: i64,
    pub lessee_id: i64,
    pub status: i32,
    pub from_date: String,
    pub to_date: String,
    pub message: &'a str,
    pub qr_code: Option<&'a str>,
    pub lessor_has_update: bool,
    pub lessee_has_update: bool,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

/// Rating row as stored (offer and user ratings share this shape).
#[derive(Debug, Clone, Queryable)]
pub struct RatingRow {
    pub rating_id: i64,
    pub target_id: i64,
    pub owner_id: i64,
    pub rating: i32,
    pub headline: Option<String>,
    pub text: Option<String>,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Serializable representation of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct ChatMessageData {
    pub message_id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub request_id: i64,
    pub message_type: String,
    pub created_at: String,
}
