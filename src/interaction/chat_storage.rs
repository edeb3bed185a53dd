//! This module handles the storage of chat turns in the database.

use tokio::task::JoinHandle;
use tracing::{Instrument, error, instrument};

use crate::{base::types::Void, service::db::DbClient};

/// Handles storing a chat turn.
///
/// The write happens on a spawned task so it never delays the reply. Failures are logged and
/// swallowed; the handle resolves to whether the turn was saved.
#[instrument(skip_all)]
pub fn handle_chat_storage(user_id: String, user_text: String, assistant_text: String, db: DbClient) -> JoinHandle<bool> {
    tokio::spawn(
        async move {
            // Process the event.
            let result = handle_chat_storage_internal(&user_id, &user_text, &assistant_text, &db).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while saving chat history: {}", err);
            }

            result.is_ok()
        }
        .in_current_span(),
    )
}

/// Internal function to store the chat turn.
#[instrument(skip_all)]
async fn handle_chat_storage_internal(user_id: &str, user_text: &str, assistant_text: &str, db: &DbClient) -> Void {
    db.append_chat_turn(user_id, user_text, assistant_text).await
}
