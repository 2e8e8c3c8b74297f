// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Lendit rental marketplace.
//!
//! This crate provides database persistence for accounts, sessions, offers,
//! availability calendars, booking requests, ratings, and system chat
//! messages. It is built on Diesel with a `SQLite` backend.
//!
//! ## Testing Philosophy
//!
//! - Standard tests (`cargo test`) run against in-memory `SQLite`
//! - Each in-memory database receives a unique name via an atomic counter,
//!   so tests are isolated without time-based collisions
//! - File-based databases run in WAL mode for read concurrency
//!
//! ## Atomicity
//!
//! Compound mutations (booking + chat message, transition + calendar
//! effect, rating + aggregate recompute) execute inside a single database
//! transaction. A logical operation either applies completely or not at
//! all.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use lendit::TransitionResult;
use lendit_chat::SystemMessage;
use lendit_domain::{BlockedInterval, Offer, Rating, RatingAggregate, Request};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{AccountData, ChatMessageData, SessionData};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique sequential
/// ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the marketplace tables.
///
/// The adapter owns a single `SQLite` connection; callers serialize access
/// through it, which also provides the check-then-act exclusion booking and
/// acceptance require.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Accounts & Sessions
    // ========================================================================

    /// Creates a new account with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateEmail` if the email is taken.
    pub fn create_account(
        &mut self,
        email: &str,
        display_name: &str,
        password: &str,
        created_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::accounts::create_account(&mut self.conn, email, display_name, password, created_at)
    }

    /// Retrieves an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_by_id(
        &mut self,
        account_id: i64,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_id(&mut self.conn, account_id)
    }

    /// Retrieves an account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_email(&mut self.conn, email)
    }

    /// Retrieves the stored password hash for a login attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_credentials(
        &mut self,
        email: &str,
    ) -> Result<Option<(i64, String)>, PersistenceError> {
        Ok(queries::accounts::get_account_credentials(&mut self.conn, email)?
            .map(|credentials| (credentials.account_id, credentials.password_hash)))
    }

    /// Updates the last login timestamp for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, account_id: i64, now: &str) -> Result<(), PersistenceError> {
        mutations::accounts::update_last_login(&mut self.conn, account_id, now)
    }

    /// Creates a session for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        account_id: i64,
        now: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::accounts::create_session(&mut self.conn, session_token, account_id, now, expires_at)
    }

    /// Retrieves a session by its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::accounts::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates a session's last activity timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(
        &mut self,
        session_id: i64,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::update_session_activity(&mut self.conn, session_id, now)
    }

    /// Deletes a session by token (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::accounts::delete_session(&mut self.conn, session_token)
    }

    // ========================================================================
    // Offers
    // ========================================================================

    /// Inserts a new offer.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_offer(&mut self, offer: &Offer) -> Result<i64, PersistenceError> {
        mutations::offers::insert_offer(&mut self.conn, offer)
    }

    /// Retrieves an offer by id, including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_offer(&mut self, offer_id: i64) -> Result<Option<Offer>, PersistenceError> {
        queries::offers::get_offer(&mut self.conn, offer_id)
    }

    /// Lists non-deleted offers with optional category and lessor filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_offers(
        &mut self,
        category_id: Option<i64>,
        lessor_id: Option<i64>,
    ) -> Result<Vec<Offer>, PersistenceError> {
        queries::offers::list_offers(&mut self.conn, category_id, lessor_id)
    }

    /// Updates an offer's editable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_offer_fields(
        &mut self,
        offer_id: i64,
        title: &str,
        description: &str,
        price: f64,
        category_id: i64,
        pictures: &[String],
    ) -> Result<(), PersistenceError> {
        mutations::offers::update_offer_fields(
            &mut self.conn,
            offer_id,
            title,
            description,
            price,
            category_id,
            pictures,
        )
    }

    /// Soft-deletes an offer and clears its availability calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn soft_delete_offer(&mut self, offer_id: i64) -> Result<(), PersistenceError> {
        mutations::offers::soft_delete_offer(&mut self.conn, offer_id)
    }

    // ========================================================================
    // Availability Calendar
    // ========================================================================

    /// Inserts a blocked interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_interval(&mut self, interval: &BlockedInterval) -> Result<i64, PersistenceError> {
        mutations::intervals::insert_interval(&mut self.conn, interval)
    }

    /// Lists all blocked intervals for an offer, both actor tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_intervals_for_offer(
        &mut self,
        offer_id: i64,
    ) -> Result<Vec<BlockedInterval>, PersistenceError> {
        queries::intervals::list_intervals_for_offer(&mut self.conn, offer_id)
    }

    /// Removes all intervals with the given actor tag for an offer.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_intervals_for_actor(
        &mut self,
        offer_id: i64,
        is_lessor: bool,
    ) -> Result<usize, PersistenceError> {
        mutations::intervals::delete_intervals_for_actor(&mut self.conn, offer_id, is_lessor)
    }

    /// Replaces the lessor-tagged intervals of an offer in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn replace_lessor_intervals(
        &mut self,
        offer_id: i64,
        intervals: &[BlockedInterval],
    ) -> Result<(), PersistenceError> {
        mutations::intervals::replace_lessor_intervals(&mut self.conn, offer_id, intervals)
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Persists a new booking (request + chat opener) atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn persist_booking(
        &mut self,
        request: &Request,
        message: &SystemMessage,
    ) -> Result<i64, PersistenceError> {
        mutations::requests::persist_booking(&mut self.conn, request, message)
    }

    /// Persists a request transition and its calendar effect atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn persist_transition(&mut self, result: &TransitionResult) -> Result<(), PersistenceError> {
        mutations::requests::persist_transition(&mut self.conn, result)
    }

    /// Retrieves a request by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_request(&mut self, request_id: i64) -> Result<Option<Request>, PersistenceError> {
        queries::requests::get_request(&mut self.conn, request_id)
    }

    /// Marks a request as seen for one side.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_request_seen(
        &mut self,
        request_id: i64,
        lessor_side: bool,
    ) -> Result<(), PersistenceError> {
        mutations::requests::mark_request_seen(&mut self.conn, request_id, lessor_side)
    }

    /// Lists all requests created by a lessee.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_requests_for_lessee(
        &mut self,
        lessee_id: i64,
    ) -> Result<Vec<Request>, PersistenceError> {
        queries::requests::list_requests_for_lessee(&mut self.conn, lessee_id)
    }

    /// Lists all requests against offers owned by a lessor.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_requests_for_lessor(
        &mut self,
        lessor_id: i64,
    ) -> Result<Vec<Request>, PersistenceError> {
        queries::requests::list_requests_for_lessor(&mut self.conn, lessor_id)
    }

    /// Lists open requests created before the given cutoff timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_stale_open_requests(
        &mut self,
        cutoff: &str,
    ) -> Result<Vec<Request>, PersistenceError> {
        queries::requests::list_stale_open_requests(&mut self.conn, cutoff)
    }

    /// Counts the requests a lessee holds against an offer, any status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_requests_for_offer_by_lessee(
        &mut self,
        offer_id: i64,
        lessee_id: i64,
    ) -> Result<i64, PersistenceError> {
        queries::requests::count_requests_for_offer_by_lessee(&mut self.conn, offer_id, lessee_id)
    }

    /// Counts the requests connecting two accounts in either role.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_requests_between_accounts(
        &mut self,
        account_a: i64,
        account_b: i64,
    ) -> Result<i64, PersistenceError> {
        queries::requests::count_requests_between_accounts(&mut self.conn, account_a, account_b)
    }

    // ========================================================================
    // Ratings
    // ========================================================================

    /// Retrieves the non-deleted offer rating of an owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_offer_rating(
        &mut self,
        offer_id: i64,
        owner_id: i64,
    ) -> Result<Option<Rating>, PersistenceError> {
        queries::ratings::get_offer_rating(&mut self.conn, offer_id, owner_id)
    }

    /// Creates or updates an offer rating and recomputes the aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    #[allow(clippy::too_many_arguments)]
    pub fn upsert_offer_rating(
        &mut self,
        offer_id: i64,
        owner_id: i64,
        value: i32,
        headline: Option<&str>,
        text: Option<&str>,
        now: &str,
    ) -> Result<(Rating, RatingAggregate), PersistenceError> {
        mutations::ratings::upsert_offer_rating(
            &mut self.conn,
            offer_id,
            owner_id,
            value,
            headline,
            text,
            now,
        )
    }

    /// Soft-deletes an offer rating and recomputes the aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn delete_offer_rating(
        &mut self,
        offer_id: i64,
        owner_id: i64,
        now: &str,
    ) -> Result<Option<RatingAggregate>, PersistenceError> {
        mutations::ratings::delete_offer_rating(&mut self.conn, offer_id, owner_id, now)
    }

    /// Retrieves the non-deleted user rating of an owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_rating(
        &mut self,
        rated_account_id: i64,
        owner_id: i64,
    ) -> Result<Option<Rating>, PersistenceError> {
        queries::ratings::get_user_rating(&mut self.conn, rated_account_id, owner_id)
    }

    /// Creates or updates a user rating and recomputes the aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    #[allow(clippy::too_many_arguments)]
    pub fn upsert_user_rating(
        &mut self,
        rated_account_id: i64,
        owner_id: i64,
        value: i32,
        headline: Option<&str>,
        text: Option<&str>,
        now: &str,
    ) -> Result<(Rating, RatingAggregate), PersistenceError> {
        mutations::ratings::upsert_user_rating(
            &mut self.conn,
            rated_account_id,
            owner_id,
            value,
            headline,
            text,
            now,
        )
    }

    /// Soft-deletes a user rating and recomputes the aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn delete_user_rating(
        &mut self,
        rated_account_id: i64,
        owner_id: i64,
        now: &str,
    ) -> Result<Option<RatingAggregate>, PersistenceError> {
        mutations::ratings::delete_user_rating(&mut self.conn, rated_account_id, owner_id, now)
    }

    /// Lists all non-deleted rating values for an offer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_offer_rating_values(
        &mut self,
        offer_id: i64,
    ) -> Result<Vec<i32>, PersistenceError> {
        queries::ratings::list_offer_rating_values(&mut self.conn, offer_id)
    }

    /// Lists all non-deleted rating values for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_user_rating_values(
        &mut self,
        rated_account_id: i64,
    ) -> Result<Vec<i32>, PersistenceError> {
        queries::ratings::list_user_rating_values(&mut self.conn, rated_account_id)
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Lists the stored system messages for a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_messages_for_request(
        &mut self,
        request_id: i64,
    ) -> Result<Vec<ChatMessageData>, PersistenceError> {
        queries::chat::list_messages_for_request(&mut self.conn, request_id)
    }
}
