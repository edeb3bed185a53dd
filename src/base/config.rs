//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::{prompts, types::Credential};

use super::types::Res;

/// Default chat model to use.
fn default_openai_chat_model() -> String {
    "gpt-4.1-mini".to_string()
}

/// Default sampling temperature for the chat model.
fn default_openai_temperature() -> f32 {
    0.7
}

/// Default max output tokens for the chat model.
fn default_openai_max_tokens() -> u32 {
    1024
}

/// Default upper bound on a single completion call.
fn default_openai_timeout_secs() -> u64 {
    120
}

/// Default system directive for the chat assistant.
fn default_chat_system_directive() -> String {
    prompts::CHAT_SYSTEM_DIRECTIVE.to_string()
}

/// Default database endpoint (in-memory).
fn default_db_endpoint() -> String {
    "mem://".to_string()
}

fn default_db_namespace() -> String {
    "health".to_string()
}

fn default_db_database() -> String {
    "assistant".to_string()
}

/// Default number of prior turns replayed to the model and loaded as history.
fn default_history_limit() -> usize {
    20
}

/// Configuration for the health-triage application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// OpenAI API key (`OPENAI_API_KEY`).
    /// Optional: the symptom checker works without it, the chat does not.
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Base URL of an OpenAI-compatible endpoint (`OPENAI_API_BASE`).
    #[serde(default)]
    pub openai_api_base: Option<String>,
    /// Chat model to use (`OPENAI_CHAT_MODEL`).
    #[serde(default = "default_openai_chat_model")]
    pub openai_chat_model: String,
    /// Sampling temperature to use for the chat model (`OPENAI_TEMPERATURE`).
    /// Value between 0 and 2.
    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,
    /// Max output tokens for the chat model (`OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Timeout, in seconds, for a single completion call (`OPENAI_TIMEOUT_SECS`).
    #[serde(default = "default_openai_timeout_secs")]
    pub openai_timeout_secs: u64,
    /// Optional custom system directive to override the default (`CHAT_SYSTEM_DIRECTIVE`).
    #[serde(default = "default_chat_system_directive")]
    pub chat_system_directive: String,
    /// Database endpoint URL (`DB_ENDPOINT`), e.g. `mem://` or `ws://localhost:8000`.
    #[serde(default = "default_db_endpoint")]
    pub db_endpoint: String,
    /// Database username (`DB_USERNAME`).
    #[serde(default)]
    pub db_username: Option<String>,
    /// Database password (`DB_PASSWORD`).
    #[serde(default)]
    pub db_password: Option<String>,
    /// Database namespace (`DB_NAMESPACE`).
    #[serde(default = "default_db_namespace")]
    pub db_namespace: String,
    /// Database name (`DB_DATABASE`).
    #[serde(default = "default_db_database")]
    pub db_database: String,
    /// How many prior turns to load for a user (`HISTORY_LIMIT`).
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_api_base: None,
            openai_chat_model: default_openai_chat_model(),
            openai_temperature: default_openai_temperature(),
            openai_max_tokens: default_openai_max_tokens(),
            openai_timeout_secs: default_openai_timeout_secs(),
            chat_system_directive: default_chat_system_directive(),
            db_endpoint: default_db_endpoint(),
            db_username: None,
            db_password: None,
            db_namespace: default_db_namespace(),
            db_database: default_db_database(),
            history_limit: default_history_limit(),
        }
    }
}

impl Config {
    /// Loads the config file (if any), then `HEALTH_TRIAGE_*` environment variables over it.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // Later sources win.
        cfg = cfg.add_source(config::Environment::default().prefix("HEALTH_TRIAGE"));

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Res<()> {
        if self.openai_temperature < 0.0 || self.openai_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI temperature must be between 0 and 2."));
        }

        if self.openai_max_tokens < 1 || self.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000."));
        }

        if self.openai_timeout_secs == 0 {
            return Err(anyhow::anyhow!("OpenAI timeout must be at least one second."));
        }

        if self.history_limit < 1 || self.history_limit > 100 {
            return Err(anyhow::anyhow!("History limit must be between 1 and 100."));
        }

        Ok(())
    }

    /// The configured API key, wrapped so it never lands in logs.
    pub fn credential(&self) -> Credential {
        Credential::new(self.openai_api_key.clone())
    }
}
