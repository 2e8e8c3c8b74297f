// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session mutations.

use diesel::prelude::*;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{accounts, sessions};
use crate::error::PersistenceError;

/// Creates a new account.
///
/// The email is normalized to lowercase for case-insensitive uniqueness and
/// the password is hashed with bcrypt before storage.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The account email (will be normalized)
/// * `display_name` - The display name
/// * `password` - The plain-text password (will be hashed)
/// * `created_at` - Creation timestamp (ISO 8601)
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateEmail` if the email is already
/// registered.
pub fn create_account(
    conn: &mut SqliteConnection,
    email: &str,
    display_name: &str,
    password: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = email.to_lowercase();

    let existing: i64 = accounts::table
        .filter(accounts::email.eq(&normalized_email))
        .count()
        .get_result(conn)?;
    if existing > 0 {
        return Err(PersistenceError::DuplicateEmail(normalized_email));
    }

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(accounts::table)
        .values((
            accounts::email.eq(&normalized_email),
            accounts::display_name.eq(display_name),
            accounts::password_hash.eq(&password_hash),
            accounts::rating_mean.eq(0.0),
            accounts::rating_count.eq(0),
            accounts::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let account_id: i64 = get_last_insert_rowid(conn)?;

    info!(account_id, "Account created successfully");

    Ok(account_id)
}

/// Updates the last login timestamp for an account.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    account_id: i64,
    now: &str,
) -> Result<(), PersistenceError> {
    diesel::update(accounts::table.filter(accounts::account_id.eq(account_id)))
        .set(accounts::last_login_at.eq(now))
        .execute(conn)?;
    Ok(())
}

/// Creates a session for an account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The opaque session token
/// * `account_id` - The account the session belongs to
/// * `now` - The current time (ISO 8601)
/// * `expires_at` - Expiration timestamp (ISO 8601)
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    account_id: i64,
    now: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::account_id.eq(account_id),
            sessions::created_at.eq(now),
            sessions::last_activity_at.eq(now),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Updates the last activity timestamp of a session.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
    now: &str,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
        .set(sessions::last_activity_at.eq(now))
        .execute(conn)?;
    Ok(())
}

/// Deletes a session by token (logout).
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
        .execute(conn)?;
    Ok(())
}
