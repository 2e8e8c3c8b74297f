// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication types and services.
//!
//! The marketplace has no operator roles: every authenticated account is an
//! ordinary user, and what it may do is decided per action against the
//! offer/request it is acting on (lessor vs lessee).

use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};

use crate::error::AuthError;
use lendit_persistence::{AccountData, Persistence, PersistenceError, SessionData};

/// An authenticated marketplace account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The account's canonical identifier.
    pub account_id: i64,
    /// The account's display name.
    pub display_name: String,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    #[must_use]
    pub const fn new(account_id: i64, display_name: String) -> Self {
        Self {
            account_id,
            display_name,
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates an account by email/password and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The account email
    /// * `password` - The plain-text password to verify
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_user`, `account_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the account is unknown or the password does not
    /// verify.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedUser, AccountData), AuthError> {
        let credentials: (i64, String) = persistence
            .get_account_credentials(email)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Unknown email or wrong password"),
            })?;
        let (account_id, password_hash): (i64, String) = credentials;

        let verified: bool = bcrypt::verify(password, &password_hash).map_err(|e| {
            AuthError::AuthenticationFailed {
                reason: format!("Failed to verify password: {e}"),
            }
        })?;
        if !verified {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Unknown email or wrong password"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_id(account_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        let session_token: String = Self::generate_session_token();

        let now: String = format_timestamp(OffsetDateTime::now_utc())?;
        let expires_at: String =
            format_timestamp(OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION)?;

        persistence
            .create_session(&session_token, account_id, &now, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(account_id, &now)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        let authenticated_user: AuthenticatedUser =
            AuthenticatedUser::new(account_id, account.display_name.clone());

        Ok((session_token, authenticated_user, account))
    }

    /// Validates a session token and returns the authenticated user.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_user`, `account_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedUser, AccountData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                }
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_id(session.account_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        let now: String = format_timestamp(OffsetDateTime::now_utc())?;
        persistence
            .update_session_activity(session.session_id, &now)
            .map_err(Self::map_persistence_error)?;

        let authenticated_user: AuthenticatedUser =
            AuthenticatedUser::new(account.account_id, account.display_name.clone());

        Ok((authenticated_user, account))
    }

    /// Validates a session token against a claimed account id.
    ///
    /// This is the collaborator contract the booking flows rely on: the
    /// session must both be valid and belong to the claimed account.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid, expired, or belongs to a
    /// different account.
    pub fn validate_session_for_account(
        persistence: &mut Persistence,
        session_token: &str,
        account_id: i64,
    ) -> Result<(AuthenticatedUser, AccountData), AuthError> {
        let (user, account) = Self::validate_session(persistence, session_token)?;

        if user.account_id != account_id {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session does not belong to the claimed account"),
            });
        }

        Ok((user, account))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Generates a session token.
    ///
    /// In a production system, this would use a cryptographically secure
    /// random number generator. For simplicity, we use a timestamp-based
    /// approach here.
    fn generate_session_token() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp: u128 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_nanos();
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionExpired(msg) | PersistenceError::SessionNotFound(msg) => {
                AuthError::AuthenticationFailed { reason: msg }
            }
            _ => AuthError::AuthenticationFailed {
                reason: format!("Database error: {err}"),
            },
        }
    }
}

/// Generates a fresh opaque hand-off code.
///
/// A new code is issued on acceptance and again on lending (rotating the
/// token for the return leg).
#[must_use]
pub fn generate_handoff_code() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Formats a timestamp as ISO 8601.
fn format_timestamp(value: OffsetDateTime) -> Result<String, AuthError> {
    value
        .format(&Iso8601::DEFAULT)
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to format timestamp: {e}"),
        })
}
