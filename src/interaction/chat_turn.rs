//! One round trip of the health assistant chat.

use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::{
    base::types::{ChatError, ChatMessage, Credential},
    interaction::chat_storage::handle_chat_storage,
    service::{db::DbClient, llm::LlmClient},
};

/// The assistant's reply, plus the pending history write.
#[derive(Debug)]
pub struct ChatReply {
    pub text: String,
    /// Resolves to `true` once the turn is saved, `false` if saving failed.
    pub history: JoinHandle<bool>,
}

/// Handles a chat message from a user.
///
/// The reply does not wait for, and is never failed by, the history database: a failed
/// history read means no context is sent, and a failed write is only logged.
#[instrument(skip(credential, text, history_limit, db, llm))]
pub async fn handle_chat_turn(credential: &Credential, user_id: &str, text: &str, history_limit: usize, db: &DbClient, llm: &LlmClient) -> Result<ChatReply, ChatError> {
    if text.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    // Check the credential before touching anything else.
    credential.require()?;

    // Get the prior turns for context.

    let prior_turns = match db.load_recent_turns(user_id, history_limit).await {
        Ok(turns) => turns.iter().flat_map(|turn| turn.to_messages()).collect::<Vec<ChatMessage>>(),
        Err(err) => {
            warn!("Could not load chat history; continuing without it: {}", err);
            Vec::new()
        }
    };

    // Call the LLM with the prior turns and the message text.

    let reply = llm.send_message(credential, text, &prior_turns).await?;

    info!("Assistant replied to `{}`.", user_id);

    // Save the turn in the background.

    let history = handle_chat_storage(user_id.to_string(), text.to_string(), reply.clone(), db.clone());

    Ok(ChatReply { text: reply, history })
}
