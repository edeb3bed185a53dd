//! OpenAI (and OpenAI-compatible) chat transport.
//!
//! The endpoint is configurable through `openai_api_base`, so the same client also talks
//! to other providers that expose the chat-completions API (e.g. Gemini's compatibility
//! endpoint).

use std::{sync::Arc, time::Duration};

use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::base::{
    config::Config,
    types::{ChatError, ChatMessage, ChatRole, Credential},
};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        Self { config: config.clone() }
    }

    /// Build a client for a single call; the key is supplied per request.
    fn client(&self, api_key: &str) -> Client<OpenAIConfig> {
        let mut cfg = OpenAIConfig::new().with_api_key(api_key);

        if let Some(api_base) = &self.config.openai_api_base {
            cfg = cfg.with_api_base(api_base);
        }

        Client::with_config(cfg)
    }

    /// Build the message list: system directive, prior turns, then the new user message.
    #[instrument(name = "OpenAiLlmClient::build_messages", skip_all)]
    fn build_messages(&self, user_text: &str, prior_turns: &[ChatMessage]) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(prior_turns.len() + 2);

        messages.push(ChatCompletionRequestSystemMessageArgs::default().content(self.config.chat_system_directive.as_str()).build()?.into());

        for turn in prior_turns {
            let message: ChatCompletionRequestMessage = match turn.role {
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default().content(turn.content.as_str()).build()?.into(),
                ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default().content(turn.content.as_str()).build()?.into(),
            };

            messages.push(message);
        }

        messages.push(ChatCompletionRequestUserMessageArgs::default().content(user_text).build()?.into());

        Ok(messages)
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::send_message", skip_all, fields(prior_turns = prior_turns.len()))]
    async fn send_message(&self, credential: &Credential, user_text: &str, prior_turns: &[ChatMessage]) -> Result<String, ChatError> {
        let api_key = credential.require()?;

        let messages = self.build_messages(user_text, prior_turns).map_err(classify_openai_error)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.openai_chat_model)
            .messages(messages)
            .temperature(self.config.openai_temperature)
            .max_completion_tokens(self.config.openai_max_tokens)
            .build()
            .map_err(classify_openai_error)?;

        debug!("Sending chat completion request to `{}` ...", self.config.openai_chat_model);

        let client = self.client(api_key);
        let result = timeout(Duration::from_secs(self.config.openai_timeout_secs), client.chat().create(request)).await;

        let response = match result {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!("Chat completion call failed: {err}");
                return Err(classify_openai_error(err));
            }
            Err(_) => {
                warn!("Chat completion call timed out after {}s", self.config.openai_timeout_secs);
                return Err(ChatError::Transport(format!("request timed out after {}s", self.config.openai_timeout_secs)));
            }
        };

        let text = extract_reply(&response)?;

        info!("Received a {} character reply.", text.len());

        Ok(text)
    }
}

/// Pull the assistant text out of the first choice.
pub fn extract_reply(response: &CreateChatCompletionResponse) -> Result<String, ChatError> {
    let choice = response.choices.first().ok_or_else(|| ChatError::Transport("response contained no choices".to_string()))?;

    if let Some(refusal) = &choice.message.refusal {
        return Err(ChatError::Transport(format!("request refused: {refusal}")));
    }

    match &choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(text.clone()),
        _ => Err(ChatError::Transport("response contained no text".to_string())),
    }
}

/// Map an upstream error onto the chat error taxonomy.
pub fn classify_openai_error(err: OpenAIError) -> ChatError {
    match err {
        OpenAIError::ApiError(api) => {
            let is_auth = matches!(api.code.as_deref(), Some("invalid_api_key") | Some("unauthorized"))
                || api.r#type.as_deref() == Some("authentication_error")
                || api.message.to_lowercase().contains("api key");

            if is_auth {
                ChatError::Credential(api.message)
            } else {
                ChatError::Transport(api.message)
            }
        }
        OpenAIError::Reqwest(err) => match err.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => ChatError::Credential(err.to_string()),
            _ => ChatError::Transport(err.to_string()),
        },
        other => ChatError::Transport(other.to_string()),
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use async_openai::error::ApiError;

    use super::*;
    use crate::base::config::ConfigInner;

    fn create_test_config() -> Config {
        Config {
            inner: Arc::new(ConfigInner {
                openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
                openai_chat_model: "gpt-4.1-nano".to_string(),
                openai_max_tokens: 200u32, // Small for tests
                ..Default::default()
            }),
        }
    }

    fn api_error(message: &str, code: Option<&str>) -> OpenAIError {
        OpenAIError::ApiError(ApiError {
            message: message.to_string(),
            r#type: None,
            param: None,
            code: code.map(str::to_string),
        })
    }

    #[test]
    fn messages_are_directive_history_then_user() {
        let client = OpenAiLlmClient::new(&create_test_config());
        let prior = vec![
            ChatMessage {
                role: ChatRole::User,
                content: "I have a headache.".to_string(),
            },
            ChatMessage {
                role: ChatRole::Assistant,
                content: "How long has it lasted?".to_string(),
            },
        ];

        let messages = client.build_messages("Two days.", &prior).unwrap();

        assert_eq!(messages.len(), 4);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(messages[2], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(messages[3], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn invalid_key_errors_are_credential_errors() {
        assert!(matches!(classify_openai_error(api_error("Incorrect API key provided: sk-inv***", Some("invalid_api_key"))), ChatError::Credential(_)));
        assert!(matches!(classify_openai_error(api_error("API key not valid. Please pass a valid API key.", None)), ChatError::Credential(_)));
    }

    #[test]
    fn other_api_errors_are_transport_errors() {
        let err = classify_openai_error(api_error("Rate limit reached for requests", Some("rate_limit_exceeded")));

        assert!(matches!(err, ChatError::Transport(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                openai_api_base: Some("http://127.0.0.1:9".to_string()),
                ..Default::default()
            }),
        };
        let client = LlmClient::openai(&config);

        let result = client.send_message(&Credential::default(), "Hello?", &[]).await;

        assert!(matches!(result, Err(ChatError::Credential(_))));
    }

    #[tokio::test]
    #[ignore = "requires OPENAI_API_KEY and network access"]
    async fn test_llm_client_send_message() {
        let config = create_test_config();
        let client = LlmClient::openai(&config);

        let response = client.send_message(&config.credential(), "What is a normal resting heart rate?", &[]).await.unwrap();

        assert!(!response.is_empty(), "Response should not be empty");
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_llm_client_error_handling_invalid_api_key() {
        let config = create_test_config();
        let client = LlmClient::openai(&config);
        let credential = Credential::new(Some("sk-invalid-key-for-testing".to_string()));

        let result = client.send_message(&credential, "test", &[]).await;

        assert!(matches!(result, Err(ChatError::Credential(_))), "Should fail with a credential error");
    }
}
