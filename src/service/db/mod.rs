pub mod offline;
pub mod surreal;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Appointment, ChatTurn, MetricEntry, MetricKind, Profile, ProfileUpdate, Res, Void};

// Traits.

/// Generic database client trait that clients must implement.
///
/// This trait defines the persistence the assistant needs: a per-user chat history, a small
/// profile record, a metrics log, and appointment requests, all keyed by an opaque user id. Every operation can fail on its
/// own; callers in the chat flow log those failures rather than propagating them.
#[async_trait]
pub trait GenericDbClient: Send + Sync + 'static {
    /// Appends one question / answer exchange to the user's history.
    async fn append_chat_turn(&self, user_id: &str, user_text: &str, assistant_text: &str) -> Void;

    /// Loads the user's most recent `limit` turns, oldest first.
    async fn load_recent_turns(&self, user_id: &str, limit: usize) -> Res<Vec<ChatTurn>>;

    /// Writes the present fields of `update` to the user's profile, creating it if needed.
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Res<Profile>;

    /// Gets the user's profile, if one has been stored.
    async fn get_profile(&self, user_id: &str) -> Res<Option<Profile>>;

    /// Appends one metric reading.
    async fn append_metric(&self, entry: &MetricEntry) -> Void;

    /// Loads the user's most recent `limit` readings (optionally of one kind), oldest first.
    async fn load_metrics(&self, user_id: &str, kind: Option<MetricKind>, limit: usize) -> Res<Vec<MetricEntry>>;

    /// Stores a confirmed appointment request.
    async fn append_appointment(&self, appointment: &Appointment) -> Void;

    /// Lists the user's appointment requests in the order they were made.
    async fn list_appointments(&self, user_id: &str) -> Res<Vec<Appointment>>;
}

// Structs.

/// Database client for health-triage.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DbClient {
    /// The database client instance.
    pub inner: Arc<dyn GenericDbClient>,
}

impl Deref for DbClient {
    type Target = dyn GenericDbClient;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DbClient {
    pub fn new(inner: Arc<dyn GenericDbClient>) -> Self {
        Self { inner }
    }
}
