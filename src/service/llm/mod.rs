pub mod openai;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{ChatError, ChatMessage, Credential};

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This is the chat transport: it forwards a user's free-text message, along with the
/// prior conversation, to a hosted completion endpoint and returns the assistant's text.
/// Implementations make a single attempt; retrying is left to the user.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Send a message and return the assistant reply.
    ///
    /// Fails with [`ChatError::Credential`] when the key is missing or rejected, and with
    /// [`ChatError::Transport`] for everything else (network, timeout, malformed response).
    async fn send_message(&self, credential: &Credential, user_text: &str, prior_turns: &[ChatMessage]) -> Result<String, ChatError>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
