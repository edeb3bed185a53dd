//! Runtime services and shared state for health-triage.

use tracing::{instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{Appointment, ChatError, ChatTurn, Credential, MetricEntry, MetricKind, Profile, ProfileUpdate, Res},
    },
    interaction::{
        appointment::{AppointmentRequest, submit_appointment},
        chat_turn::{ChatReply, handle_chat_turn},
        metrics::{ReadingDraft, record_reading},
    },
    service::{db::DbClient, llm::LlmClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the database client, LLM client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The database client instance.
    pub db: DbClient,
    /// The LLM client instance.
    pub llm: LlmClient,
}

impl Runtime {
    /// Create a new runtime instance.
    ///
    /// An unreachable database does not fail startup: the runtime comes up with an offline
    /// client, so chat still works and every persistence call reports the outage.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the database.
        let db = match DbClient::surreal(&config).await {
            Ok(db) => db,
            Err(err) => {
                warn!("Could not connect to the database at `{}`; continuing without persistence: {}", config.db_endpoint, err);
                DbClient::offline(err.to_string())
            }
        };

        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        Ok(Self { config, db, llm })
    }

    /// Send one chat message for `user_id` using the configured key.
    pub async fn chat(&self, user_id: &str, text: &str) -> Result<ChatReply, ChatError> {
        self.chat_with(&self.config.credential(), user_id, text).await
    }

    /// Send one chat message with an explicit key.
    pub async fn chat_with(&self, credential: &Credential, user_id: &str, text: &str) -> Result<ChatReply, ChatError> {
        handle_chat_turn(credential, user_id, text, self.config.history_limit, &self.db, &self.llm).await
    }

    /// The user's stored conversation, oldest first.
    pub async fn history(&self, user_id: &str, limit: Option<usize>) -> Res<Vec<ChatTurn>> {
        self.db.load_recent_turns(user_id, limit.unwrap_or(self.config.history_limit)).await
    }

    pub async fn profile(&self, user_id: &str) -> Res<Option<Profile>> {
        self.db.get_profile(user_id).await
    }

    pub async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Res<Profile> {
        self.db.update_profile(user_id, update).await
    }

    pub async fn record_reading(&self, user_id: &str, kind: MetricKind, draft: ReadingDraft) -> Res<MetricEntry> {
        record_reading(user_id, kind, draft, &self.db).await
    }

    /// The user's most recent readings, oldest first.
    pub async fn readings(&self, user_id: &str, kind: Option<MetricKind>, limit: usize) -> Res<Vec<MetricEntry>> {
        self.db.load_metrics(user_id, kind, limit).await
    }

    pub async fn submit_appointment(&self, user_id: &str, request: &AppointmentRequest) -> Res<Appointment> {
        submit_appointment(user_id, request, &self.db).await
    }

    pub async fn appointments(&self, user_id: &str) -> Res<Vec<Appointment>> {
        self.db.list_appointments(user_id).await
    }
}
