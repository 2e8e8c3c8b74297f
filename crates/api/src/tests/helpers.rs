// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::auth::AuthenticatedUser;
use crate::handlers::{create_offer, register_account};
use crate::request_response::{BookOfferRequest, OfferInput, RegisterAccountRequest};
use lendit_persistence::Persistence;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Registers an account and returns its authenticated form.
pub fn register_test_account(
    persistence: &mut Persistence,
    email: &str,
    display_name: &str,
) -> AuthenticatedUser {
    let response = register_account(
        persistence,
        RegisterAccountRequest {
            email: email.to_string(),
            display_name: display_name.to_string(),
            password: String::from("Dr1ll-B0rrower!"),
        },
    )
    .expect("Failed to register account");

    AuthenticatedUser::new(response.account_id, response.display_name)
}

/// Creates a lessor and a lessee.
pub fn create_test_users(persistence: &mut Persistence) -> (AuthenticatedUser, AuthenticatedUser) {
    let lessor = register_test_account(persistence, "lessor@example.com", "Lena Lessor");
    let lessee = register_test_account(persistence, "lessee@example.com", "Theo Lessee");
    (lessor, lessee)
}

/// Creates a standard test offer owned by the given lessor.
pub fn create_test_offer(persistence: &mut Persistence, lessor: &AuthenticatedUser) -> i64 {
    create_offer(
        persistence,
        lessor,
        OfferInput {
            title: String::from("Cordless drill"),
            description: String::from("18V drill with two batteries"),
            price: 7.5,
            category_id: 3,
            pictures: vec![String::from("drill.jpg")],
        },
    )
    .expect("Failed to create offer")
    .offer_id
}

/// A booking request for days in June 2030, safely in the future.
pub fn june_booking(from_dom: u8, to_dom: u8) -> BookOfferRequest {
    BookOfferRequest {
        from_date: format!("2030-06-{from_dom:02}"),
        to_date: format!("2030-06-{to_dom:02}"),
        message: Some(String::from("Weekend project")),
    }
}
