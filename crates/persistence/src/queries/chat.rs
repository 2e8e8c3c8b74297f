// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Chat message queries.

use diesel::prelude::*;

use crate::data_models::ChatMessageData;
use crate::diesel_schema::chat_messages;
use crate::error::PersistenceError;

/// Lists the stored system messages for a request, oldest first.
pub fn list_messages_for_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<Vec<ChatMessageData>, PersistenceError> {
    chat_messages::table
        .filter(chat_messages::request_id.eq(request_id))
        .order(chat_messages::message_id.asc())
        .load::<ChatMessageData>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_messages_for_request: {e}")))
}
