//! SurrealDB implementation for health-triage data storage.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{
    RecordId, Surreal,
    engine::any::{self, Any},
    opt::auth::Root,
};
use tracing::{debug, info, instrument};

use crate::base::{
    config::Config,
    types::{Appointment, AppointmentKind, ChatTurn, MetricEntry, MetricKind, MetricReading, Profile, ProfileUpdate, Res, SugarTiming, Void},
};

use super::{DbClient, GenericDbClient};

// Extra methods on `DbClient` applied by the surreal implementation.

impl DbClient {
    /// Connect to the database configured in `config`.
    pub async fn surreal(config: &Config) -> Res<Self> {
        let client = SurrealDbClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }

    /// An isolated in-memory database; used by tests and as the default endpoint.
    pub async fn surreal_memory() -> Res<Self> {
        let client = SurrealDbClient::connect("mem://", None, "health", "assistant").await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Timestamps.

static LAST_TIMESTAMP_NANOS: AtomicI64 = AtomicI64::new(0);

/// The current time, nudged forward so that no two calls in this process return the same instant.
///
/// History and metrics are ordered by timestamp; without this, two writes in the same
/// nanosecond would come back in arbitrary order.
fn next_timestamp() -> DateTime<Utc> {
    let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
    let previous = LAST_TIMESTAMP_NANOS.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1))).unwrap_or(now);

    DateTime::from_timestamp_nanos(now.max(previous + 1))
}

// Records.

/// A chat turn as stored in the `chat_turn` table.
///
/// Timestamps are stored as integer nanoseconds so that `ORDER BY` is chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealChatTurn {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    user_id: String,
    user_text: String,
    assistant_text: String,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    created_at: DateTime<Utc>,
}

impl From<SurrealChatTurn> for ChatTurn {
    fn from(record: SurrealChatTurn) -> Self {
        Self {
            user_id: record.user_id,
            user_text: record.user_text,
            assistant_text: record.assistant_text,
            created_at: record.created_at,
        }
    }
}

/// A profile as stored in the `profile` table, keyed by user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    user_id: String,
    full_name: Option<String>,
    avatar_url: Option<String>,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    updated_at: DateTime<Utc>,
}

impl From<SurrealProfile> for Profile {
    fn from(record: SurrealProfile) -> Self {
        Self {
            user_id: record.user_id,
            full_name: record.full_name,
            avatar_url: record.avatar_url,
            updated_at: record.updated_at,
        }
    }
}

/// The fields merged into a profile on update.
#[derive(Debug, Serialize)]
struct ProfilePatch {
    user_id: String,
    #[serde(flatten)]
    update: ProfileUpdate,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    updated_at: DateTime<Utc>,
}

/// A metric reading as stored in the `metric` table.
///
/// The reading is flattened into nullable columns so that `kind` can be filtered on.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealMetric {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    user_id: String,
    kind: MetricKind,
    systolic: Option<u16>,
    diastolic: Option<u16>,
    level: Option<u16>,
    timing: Option<SugarTiming>,
    pounds: Option<f32>,
    notes: Option<String>,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    taken_at: DateTime<Utc>,
}

impl SurrealMetric {
    fn from_entry(entry: &MetricEntry) -> Self {
        let mut record = Self {
            id: None,
            user_id: entry.user_id.clone(),
            kind: entry.reading.kind(),
            systolic: None,
            diastolic: None,
            level: None,
            timing: None,
            pounds: None,
            notes: entry.notes.clone(),
            taken_at: entry.taken_at,
        };

        match entry.reading {
            MetricReading::BloodPressure { systolic, diastolic } => {
                record.systolic = Some(systolic);
                record.diastolic = Some(diastolic);
            }
            MetricReading::BloodSugar { level, timing } => {
                record.level = Some(level);
                record.timing = Some(timing);
            }
            MetricReading::Weight { pounds } => record.pounds = Some(pounds),
        }

        record
    }

    fn into_entry(self) -> Res<MetricEntry> {
        let missing = || anyhow::anyhow!("Stored `{}` reading for `{}` is missing values.", self.kind, self.user_id);

        let reading = match self.kind {
            MetricKind::BloodPressure => MetricReading::BloodPressure {
                systolic: self.systolic.ok_or_else(missing)?,
                diastolic: self.diastolic.ok_or_else(missing)?,
            },
            MetricKind::BloodSugar => MetricReading::BloodSugar {
                level: self.level.ok_or_else(missing)?,
                timing: self.timing.unwrap_or_default(),
            },
            MetricKind::Weight => MetricReading::Weight {
                pounds: self.pounds.ok_or_else(missing)?,
            },
        };

        Ok(MetricEntry {
            user_id: self.user_id,
            reading,
            notes: self.notes,
            taken_at: self.taken_at,
        })
    }
}

/// An appointment request as stored in the `appointment` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealAppointment {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    user_id: String,
    kind: AppointmentKind,
    specialty_id: String,
    date: NaiveDate,
    time_slot: String,
    reason: String,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    requested_at: DateTime<Utc>,
}

impl From<SurrealAppointment> for Appointment {
    fn from(record: SurrealAppointment) -> Self {
        Self {
            user_id: record.user_id,
            kind: record.kind,
            specialty_id: record.specialty_id,
            date: record.date,
            time_slot: record.time_slot,
            reason: record.reason,
            requested_at: record.requested_at,
        }
    }
}

// Client.

/// SurrealDB client.
#[derive(Clone)]
pub struct SurrealDbClient {
    db: Surreal<Any>,
}

impl SurrealDbClient {
    /// Create a new database client from the application config.
    #[instrument(name = "SurrealDbClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        let credentials = match (&config.db_username, &config.db_password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        };

        Self::connect(&config.db_endpoint, credentials, &config.db_namespace, &config.db_database).await
    }

    /// Connect to any supported endpoint (`mem://`, `ws://`, `wss://`, ...).
    #[instrument(name = "SurrealDbClient::connect", skip(credentials))]
    pub async fn connect(endpoint: &str, credentials: Option<(&str, &str)>, namespace: &str, database: &str) -> Res<Self> {
        let db = any::connect(endpoint).await?;

        // Authenticate with the database if credentials were provided.
        if let Some((username, password)) = credentials {
            db.signin(Root { username, password }).await?;
        }

        db.use_ns(namespace).use_db(database).await?;

        // Define schemas.

        db.query(
            "DEFINE TABLE IF NOT EXISTS chat_turn SCHEMALESS;
             DEFINE INDEX IF NOT EXISTS chat_turn_user ON chat_turn FIELDS user_id;
             DEFINE TABLE IF NOT EXISTS profile SCHEMALESS;
             DEFINE TABLE IF NOT EXISTS metric SCHEMALESS;
             DEFINE INDEX IF NOT EXISTS metric_user ON metric FIELDS user_id;
             DEFINE TABLE IF NOT EXISTS appointment SCHEMALESS;
             DEFINE INDEX IF NOT EXISTS appointment_user ON appointment FIELDS user_id;",
        )
        .await?
        .check()?;

        info!("Database initialized successfully.");

        Ok(Self { db })
    }
}

#[async_trait]
impl GenericDbClient for SurrealDbClient {
    #[instrument(name = "SurrealDbClient::append_chat_turn", skip(self, user_text, assistant_text))]
    async fn append_chat_turn(&self, user_id: &str, user_text: &str, assistant_text: &str) -> Void {
        let record = SurrealChatTurn {
            id: None,
            user_id: user_id.to_string(),
            user_text: user_text.to_string(),
            assistant_text: assistant_text.to_string(),
            created_at: next_timestamp(),
        };

        let created: Option<SurrealChatTurn> = self.db.create("chat_turn").content(record).await?;

        if created.is_none() {
            return Err(anyhow::anyhow!("Chat turn for `{user_id}` was not created."));
        }

        debug!("Stored chat turn for `{}`.", user_id);

        Ok(())
    }

    #[instrument(name = "SurrealDbClient::load_recent_turns", skip(self))]
    async fn load_recent_turns(&self, user_id: &str, limit: usize) -> Res<Vec<ChatTurn>> {
        let mut response = self
            .db
            .query("SELECT * FROM chat_turn WHERE user_id = $user_id ORDER BY created_at DESC, id DESC LIMIT $limit")
            .bind(("user_id", user_id.to_string()))
            .bind(("limit", limit as i64))
            .await?;

        let mut records: Vec<SurrealChatTurn> = response.take(0)?;

        // Newest first from the query; callers want conversation order.
        records.reverse();

        debug!("Loaded {} chat turns for `{}`.", records.len(), user_id);

        Ok(records.into_iter().map(ChatTurn::from).collect())
    }

    #[instrument(name = "SurrealDbClient::update_profile", skip(self))]
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Res<Profile> {
        let patch = ProfilePatch {
            user_id: user_id.to_string(),
            update: update.clone(),
            updated_at: next_timestamp(),
        };

        let saved: Option<SurrealProfile> = self.db.upsert(("profile", user_id.to_string())).merge(patch).await?;
        let saved = saved.ok_or_else(|| anyhow::anyhow!("Profile for `{user_id}` was not saved."))?;

        info!("Profile for `{}` updated.", user_id);

        Ok(saved.into())
    }

    #[instrument(name = "SurrealDbClient::get_profile", skip(self))]
    async fn get_profile(&self, user_id: &str) -> Res<Option<Profile>> {
        let profile: Option<SurrealProfile> = self.db.select(("profile", user_id.to_string())).await?;

        Ok(profile.map(Profile::from))
    }

    #[instrument(name = "SurrealDbClient::append_metric", skip_all, fields(user_id = %entry.user_id, kind = %entry.reading.kind()))]
    async fn append_metric(&self, entry: &MetricEntry) -> Void {
        let created: Option<SurrealMetric> = self.db.create("metric").content(SurrealMetric::from_entry(entry)).await?;

        if created.is_none() {
            return Err(anyhow::anyhow!("Metric reading for `{}` was not created.", entry.user_id));
        }

        debug!("Stored `{}` reading for `{}`.", entry.reading.kind(), entry.user_id);

        Ok(())
    }

    #[instrument(name = "SurrealDbClient::load_metrics", skip(self))]
    async fn load_metrics(&self, user_id: &str, kind: Option<MetricKind>, limit: usize) -> Res<Vec<MetricEntry>> {
        let query = match kind {
            Some(_) => "SELECT * FROM metric WHERE user_id = $user_id AND kind = $kind ORDER BY taken_at DESC, id DESC LIMIT $limit",
            None => "SELECT * FROM metric WHERE user_id = $user_id ORDER BY taken_at DESC, id DESC LIMIT $limit",
        };

        let mut request = self.db.query(query).bind(("user_id", user_id.to_string())).bind(("limit", limit as i64));

        if let Some(kind) = kind {
            request = request.bind(("kind", kind.as_str()));
        }

        let mut records: Vec<SurrealMetric> = request.await?.take(0)?;

        // Newest first from the query; callers want chronological order.
        records.reverse();

        debug!("Loaded {} metric readings for `{}`.", records.len(), user_id);

        records.into_iter().map(SurrealMetric::into_entry).collect()
    }

    #[instrument(name = "SurrealDbClient::append_appointment", skip_all, fields(user_id = %appointment.user_id))]
    async fn append_appointment(&self, appointment: &Appointment) -> Void {
        let record = SurrealAppointment {
            id: None,
            user_id: appointment.user_id.clone(),
            kind: appointment.kind,
            specialty_id: appointment.specialty_id.clone(),
            date: appointment.date,
            time_slot: appointment.time_slot.clone(),
            reason: appointment.reason.clone(),
            requested_at: appointment.requested_at,
        };

        let created: Option<SurrealAppointment> = self.db.create("appointment").content(record).await?;

        if created.is_none() {
            return Err(anyhow::anyhow!("Appointment for `{}` was not created.", appointment.user_id));
        }

        info!("Stored appointment request for `{}` on {}.", appointment.user_id, appointment.date);

        Ok(())
    }

    #[instrument(name = "SurrealDbClient::list_appointments", skip(self))]
    async fn list_appointments(&self, user_id: &str) -> Res<Vec<Appointment>> {
        let mut response = self
            .db
            .query("SELECT * FROM appointment WHERE user_id = $user_id ORDER BY requested_at ASC, id ASC")
            .bind(("user_id", user_id.to_string()))
            .await?;

        let records: Vec<SurrealAppointment> = response.take(0)?;

        Ok(records.into_iter().map(Appointment::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn turns_come_back_oldest_first() {
        let db = DbClient::surreal_memory().await.unwrap();

        db.append_chat_turn("guest", "first", "one").await.unwrap();
        db.append_chat_turn("guest", "second", "two").await.unwrap();
        db.append_chat_turn("guest", "third", "three").await.unwrap();

        let turns = db.load_recent_turns("guest", 20).await.unwrap();
        let texts = turns.iter().map(|t| t.user_text.as_str()).collect::<Vec<_>>();

        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn limit_keeps_the_most_recent_turns() {
        let db = DbClient::surreal_memory().await.unwrap();

        for i in 0..5 {
            db.append_chat_turn("guest", &format!("question {i}"), "answer").await.unwrap();
        }

        let turns = db.load_recent_turns("guest", 2).await.unwrap();
        let texts = turns.iter().map(|t| t.user_text.as_str()).collect::<Vec<_>>();

        assert_eq!(texts, ["question 3", "question 4"]);
    }

    #[tokio::test]
    async fn histories_are_per_user() {
        let db = DbClient::surreal_memory().await.unwrap();

        db.append_chat_turn("alice", "mine", "ok").await.unwrap();
        db.append_chat_turn("bob", "theirs", "ok").await.unwrap();

        let turns = db.load_recent_turns("alice", 20).await.unwrap();

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].user_id, "alice");
        assert!(db.load_recent_turns("nobody", 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_updates_merge_present_fields() {
        let db = DbClient::surreal_memory().await.unwrap();

        assert!(db.get_profile("guest").await.unwrap().is_none());

        db.update_profile(
            "guest",
            &ProfileUpdate {
                full_name: Some("Guest User".to_string()),
                avatar_url: None,
            },
        )
        .await
        .unwrap();

        let profile = db
            .update_profile(
                "guest",
                &ProfileUpdate {
                    full_name: None,
                    avatar_url: Some("https://example.com/a.png".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.full_name.as_deref(), Some("Guest User"));
        assert_eq!(profile.avatar_url.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(db.get_profile("guest").await.unwrap(), Some(profile));
    }

    #[test]
    fn timestamps_never_repeat() {
        let stamps = (0..1000).map(|_| next_timestamp()).collect::<Vec<_>>();

        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn rapid_turns_keep_their_order() {
        let db = DbClient::surreal_memory().await.unwrap();

        for i in 0..50 {
            db.append_chat_turn("guest", &i.to_string(), "ok").await.unwrap();
        }

        let turns = db.load_recent_turns("guest", 50).await.unwrap();
        let expected = (0..50).map(|i| i.to_string()).collect::<Vec<_>>();

        assert_eq!(turns.into_iter().map(|t| t.user_text).collect::<Vec<_>>(), expected);
    }

    fn entry(user_id: &str, reading: MetricReading, taken_at: DateTime<Utc>) -> MetricEntry {
        MetricEntry {
            user_id: user_id.to_string(),
            reading,
            notes: None,
            taken_at,
        }
    }

    #[tokio::test]
    async fn metrics_filter_by_kind_in_time_order() {
        let db = DbClient::surreal_memory().await.unwrap();
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let later_pressure = MetricReading::BloodPressure { systolic: 122, diastolic: 82 };
        let earlier_pressure = MetricReading::BloodPressure { systolic: 120, diastolic: 80 };
        let sugar = MetricReading::BloodSugar {
            level: 95,
            timing: SugarTiming::Fasting,
        };

        // Written out of order on purpose; `taken_at` decides.
        db.append_metric(&entry("guest", later_pressure, start + chrono::Duration::days(5))).await.unwrap();
        db.append_metric(&entry("guest", sugar, start + chrono::Duration::days(1))).await.unwrap();
        db.append_metric(&entry("guest", earlier_pressure, start)).await.unwrap();
        db.append_metric(&entry("other", MetricReading::Weight { pounds: 160.5 }, start)).await.unwrap();

        let pressure = db.load_metrics("guest", Some(MetricKind::BloodPressure), 10).await.unwrap();
        assert_eq!(pressure.iter().map(|e| e.reading).collect::<Vec<_>>(), [earlier_pressure, later_pressure]);

        let all = db.load_metrics("guest", None, 10).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].reading, sugar);

        let latest = db.load_metrics("guest", None, 1).await.unwrap();
        assert_eq!(latest[0].reading, later_pressure);

        let weight = db.load_metrics("other", Some(MetricKind::Weight), 10).await.unwrap();
        assert_eq!(weight[0].reading, MetricReading::Weight { pounds: 160.5 });
    }

    #[tokio::test]
    async fn appointments_are_listed_per_user() {
        let db = DbClient::surreal_memory().await.unwrap();
        let appointment = Appointment {
            user_id: "guest".to_string(),
            kind: AppointmentKind::FollowUp,
            specialty_id: "cardio".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 1, 15).unwrap(),
            time_slot: "9:30 AM".to_string(),
            reason: "Blood pressure check".to_string(),
            requested_at: next_timestamp(),
        };

        db.append_appointment(&appointment).await.unwrap();

        assert_eq!(db.list_appointments("guest").await.unwrap(), [appointment]);
        assert!(db.list_appointments("other").await.unwrap().is_empty());
    }
}
