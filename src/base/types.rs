use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Errors surfaced by the chat boundary.
///
/// Unlike the rest of the application (which uses [`anyhow`]), these are typed so that
/// callers can decide between re-prompting for credentials and offering a retry.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The API key is missing, or the upstream rejected it.
    #[error("invalid or missing credentials: {0}")]
    Credential(String),
    /// The upstream call failed, timed out, or answered with an unexpected shape.
    #[error("transport error: {0}")]
    Transport(String),
    /// There was nothing to send.
    #[error("message is empty")]
    EmptyMessage,
}

impl ChatError {
    /// Whether the user should be offered a plain retry (as opposed to re-entering credentials).
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChatError::Transport(_))
    }
}

/// An API key (or bearer token) for the completion endpoint.
///
/// The `Debug` implementation never prints the secret.
#[derive(Clone, Default)]
pub struct Credential(Option<String>);

impl Credential {
    pub fn new(value: Option<String>) -> Self {
        Self(value.filter(|v| !v.trim().is_empty()))
    }

    /// Returns the key, or a [`ChatError::Credential`] when none is stored.
    pub fn require(&self) -> Result<&str, ChatError> {
        self.0.as_deref().ok_or_else(|| ChatError::Credential("no API key has been provided".to_string()))
    }

    /// Drops the stored key so the caller can ask for a new one.
    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.is_some() { "Credential(***)" } else { "Credential(None)" })
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message as the completion endpoint sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// One question / answer exchange stored for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user_id: String,
    pub user_text: String,
    pub assistant_text: String,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    /// Expands the turn into the user message followed by the assistant reply.
    pub fn to_messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage {
                role: ChatRole::User,
                content: self.user_text.clone(),
            },
            ChatMessage {
                role: ChatRole::Assistant,
                content: self.assistant_text.clone(),
            },
        ]
    }
}

/// Stored profile fields for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A partial profile update; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.avatar_url.is_none()
    }
}

/// Which kind of health metric a reading is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    BloodPressure,
    BloodSugar,
    Weight,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::BloodPressure => "blood_pressure",
            MetricKind::BloodSugar => "blood_sugar",
            MetricKind::Weight => "weight",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blood_pressure" => Ok(MetricKind::BloodPressure),
            "blood_sugar" => Ok(MetricKind::BloodSugar),
            "weight" => Ok(MetricKind::Weight),
            other => Err(anyhow::anyhow!("Unknown metric kind `{other}`.")),
        }
    }
}

/// When a blood sugar reading was taken relative to a meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SugarTiming {
    #[default]
    Fasting,
    AfterMeal,
    Random,
}

impl SugarTiming {
    pub fn as_str(&self) -> &'static str {
        match self {
            SugarTiming::Fasting => "fasting",
            SugarTiming::AfterMeal => "after_meal",
            SugarTiming::Random => "random",
        }
    }
}

impl std::str::FromStr for SugarTiming {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fasting" => Ok(SugarTiming::Fasting),
            "after_meal" => Ok(SugarTiming::AfterMeal),
            "random" => Ok(SugarTiming::Random),
            other => Err(anyhow::anyhow!("Unknown blood sugar timing `{other}`.")),
        }
    }
}

/// A validated metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricReading {
    /// mmHg.
    BloodPressure { systolic: u16, diastolic: u16 },
    /// mg/dL.
    BloodSugar { level: u16, timing: SugarTiming },
    /// Pounds.
    Weight { pounds: f32 },
}

impl MetricReading {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricReading::BloodPressure { .. } => MetricKind::BloodPressure,
            MetricReading::BloodSugar { .. } => MetricKind::BloodSugar,
            MetricReading::Weight { .. } => MetricKind::Weight,
        }
    }
}

impl fmt::Display for MetricReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricReading::BloodPressure { systolic, diastolic } => write!(f, "{systolic}/{diastolic} mmHg"),
            MetricReading::BloodSugar { level, timing } => write!(f, "{level} mg/dL ({})", timing.as_str()),
            MetricReading::Weight { pounds } => write!(f, "{pounds} lbs"),
        }
    }
}

/// One recorded metric reading for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub user_id: String,
    pub reading: MetricReading,
    pub notes: Option<String>,
    pub taken_at: DateTime<Utc>,
}

/// Whether an appointment is a first visit or a follow-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentKind {
    #[default]
    New,
    FollowUp,
}

impl AppointmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentKind::New => "new",
            AppointmentKind::FollowUp => "follow_up",
        }
    }
}

impl std::str::FromStr for AppointmentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(AppointmentKind::New),
            "follow_up" => Ok(AppointmentKind::FollowUp),
            other => Err(anyhow::anyhow!("Unknown appointment kind `{other}`.")),
        }
    }
}

/// A stored appointment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub user_id: String,
    pub kind: AppointmentKind,
    pub specialty_id: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub reason: String,
    pub requested_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credential_is_treated_as_missing() {
        let credential = Credential::new(Some("   ".to_string()));

        assert!(!credential.is_present());
        assert!(matches!(credential.require(), Err(ChatError::Credential(_))));
    }

    #[test]
    fn cleared_credential_is_required_again() {
        let mut credential = Credential::new(Some("sk-test".to_string()));
        assert_eq!(credential.require().unwrap(), "sk-test");

        credential.clear();

        assert!(credential.require().is_err());
    }

    #[test]
    fn credential_debug_hides_secret() {
        let credential = Credential::new(Some("sk-secret".to_string()));

        assert!(!format!("{credential:?}").contains("sk-secret"));
    }

    #[test]
    fn only_transport_errors_are_retryable() {
        assert!(ChatError::Transport("timeout".to_string()).is_retryable());
        assert!(!ChatError::Credential("bad key".to_string()).is_retryable());
        assert!(!ChatError::EmptyMessage.is_retryable());
    }

    #[test]
    fn chat_turn_expands_to_user_then_assistant() {
        let turn = ChatTurn {
            user_id: "guest".to_string(),
            user_text: "Is a fever of 100F bad?".to_string(),
            assistant_text: "Usually not on its own.".to_string(),
            created_at: Utc::now(),
        };

        let [user, assistant] = turn.to_messages();

        assert_eq!(user.role, ChatRole::User);
        assert_eq!(assistant.role, ChatRole::Assistant);
        assert_eq!(assistant.content, "Usually not on its own.");
    }

    #[test]
    fn profile_update_skips_missing_fields() {
        let update = ProfileUpdate {
            full_name: Some("Guest User".to_string()),
            avatar_url: None,
        };

        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json, serde_json::json!({ "full_name": "Guest User" }));
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn readings_know_their_kind() {
        let reading = MetricReading::BloodSugar {
            level: 95,
            timing: SugarTiming::AfterMeal,
        };

        assert_eq!(reading.kind(), MetricKind::BloodSugar);
        assert_eq!(reading.to_string(), "95 mg/dL (after_meal)");
        assert_eq!("blood_pressure".parse::<MetricKind>().unwrap(), MetricKind::BloodPressure);
        assert!("pulse".parse::<MetricKind>().is_err());
    }
}
