// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session queries.

use diesel::prelude::*;

use crate::data_models::{AccountCredentials, AccountData, AccountRow, SessionData};
use crate::diesel_schema::{accounts, sessions};
use crate::error::PersistenceError;

/// Retrieves an account by id.
pub fn get_account_by_id(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<Option<AccountData>, PersistenceError> {
    let row: Option<AccountRow> = accounts::table
        .filter(accounts::account_id.eq(account_id))
        .first::<AccountRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_account_by_id: {e}")))?;

    Ok(row.map(AccountData::from))
}

/// Retrieves an account by email (case-insensitive).
pub fn get_account_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<AccountData>, PersistenceError> {
    let row: Option<AccountRow> = accounts::table
        .filter(accounts::email.eq(email.to_lowercase()))
        .first::<AccountRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_account_by_email: {e}")))?;

    Ok(row.map(AccountData::from))
}

/// Retrieves the credentials needed to verify a login attempt.
pub fn get_account_credentials(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<AccountCredentials>, PersistenceError> {
    accounts::table
        .filter(accounts::email.eq(email.to_lowercase()))
        .select((accounts::account_id, accounts::password_hash))
        .first::<AccountCredentials>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_account_credentials: {e}")))
}

/// Retrieves a session by its token.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    sessions::table
        .filter(sessions::session_token.eq(session_token))
        .first::<SessionData>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_session_by_token: {e}")))
}
