//! A database client that is never connected.
//!
//! Used when the configured endpoint cannot be reached, so the rest of the application keeps
//! working and every persistence call fails on its own (and is handled like any other failure).

use std::sync::Arc;

use async_trait::async_trait;

use crate::base::types::{Appointment, ChatTurn, MetricEntry, MetricKind, Profile, ProfileUpdate, Res, Void};

use super::{DbClient, GenericDbClient};

impl DbClient {
    /// A client whose every call fails with `reason`.
    pub fn offline(reason: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(OfflineDbClient { reason: reason.into() }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OfflineDbClient {
    reason: String,
}

impl OfflineDbClient {
    fn unavailable<T>(&self) -> Res<T> {
        Err(anyhow::anyhow!("Database is unavailable: {}", self.reason))
    }
}

#[async_trait]
impl GenericDbClient for OfflineDbClient {
    async fn append_chat_turn(&self, _user_id: &str, _user_text: &str, _assistant_text: &str) -> Void {
        self.unavailable()
    }

    async fn load_recent_turns(&self, _user_id: &str, _limit: usize) -> Res<Vec<ChatTurn>> {
        self.unavailable()
    }

    async fn update_profile(&self, _user_id: &str, _update: &ProfileUpdate) -> Res<Profile> {
        self.unavailable()
    }

    async fn get_profile(&self, _user_id: &str) -> Res<Option<Profile>> {
        self.unavailable()
    }

    async fn append_metric(&self, _entry: &MetricEntry) -> Void {
        self.unavailable()
    }

    async fn load_metrics(&self, _user_id: &str, _kind: Option<MetricKind>, _limit: usize) -> Res<Vec<MetricEntry>> {
        self.unavailable()
    }

    async fn append_appointment(&self, _appointment: &Appointment) -> Void {
        self.unavailable()
    }

    async fn list_appointments(&self, _user_id: &str) -> Res<Vec<Appointment>> {
        self.unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_call_reports_the_reason() {
        let db = DbClient::offline("connection refused");

        let err = db.load_recent_turns("guest", 20).await.unwrap_err();

        assert!(err.to_string().contains("connection refused"));
        assert!(db.append_chat_turn("guest", "hi", "hello").await.is_err());
        assert!(db.list_appointments("guest").await.is_err());
    }
}
