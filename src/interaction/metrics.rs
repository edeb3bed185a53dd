//! Recording health metric readings (blood pressure, blood sugar, weight).

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::{
    base::types::{MetricEntry, MetricKind, MetricReading, Res, SugarTiming},
    service::db::DbClient,
};

/// A reading as entered, before validation. Only the fields of `kind` are read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingDraft {
    pub systolic: Option<u16>,
    pub diastolic: Option<u16>,
    pub level: Option<u16>,
    pub timing: SugarTiming,
    pub pounds: Option<f32>,
    pub notes: Option<String>,
    /// Defaults to the time of recording.
    pub taken_at: Option<DateTime<Utc>>,
}

impl ReadingDraft {
    /// Checks that every required field for `kind` is present and positive.
    pub fn validate(&self, kind: MetricKind) -> Res<MetricReading> {
        let reading = match kind {
            MetricKind::BloodPressure => match (self.systolic, self.diastolic) {
                (Some(systolic), Some(diastolic)) => MetricReading::BloodPressure { systolic, diastolic },
                _ => return Err(missing_fields()),
            },
            MetricKind::BloodSugar => MetricReading::BloodSugar {
                level: self.level.ok_or_else(missing_fields)?,
                timing: self.timing,
            },
            MetricKind::Weight => MetricReading::Weight {
                pounds: self.pounds.ok_or_else(missing_fields)?,
            },
        };

        let positive = match reading {
            MetricReading::BloodPressure { systolic, diastolic } => systolic > 0 && diastolic > 0,
            MetricReading::BloodSugar { level, .. } => level > 0,
            MetricReading::Weight { pounds } => pounds.is_finite() && pounds > 0.0,
        };

        if !positive {
            return Err(anyhow::anyhow!("Readings must be positive numbers."));
        }

        Ok(reading)
    }
}

fn missing_fields() -> anyhow::Error {
    anyhow::anyhow!("Please fill in all required fields.")
}

/// Validates the draft and stores it. Nothing is written when validation fails.
#[instrument(skip(draft, db))]
pub async fn record_reading(user_id: &str, kind: MetricKind, draft: ReadingDraft, db: &DbClient) -> Res<MetricEntry> {
    let reading = draft.validate(kind)?;

    let entry = MetricEntry {
        user_id: user_id.to_string(),
        reading,
        notes: draft.notes.filter(|n| !n.trim().is_empty()),
        taken_at: draft.taken_at.unwrap_or_else(Utc::now),
    };

    db.append_metric(&entry).await?;

    info!("Recorded {} for `{}`.", entry.reading, user_id);

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blood_pressure_needs_both_values() {
        let draft = ReadingDraft {
            systolic: Some(120),
            ..Default::default()
        };

        let err = draft.validate(MetricKind::BloodPressure).unwrap_err();

        assert_eq!(err.to_string(), "Please fill in all required fields.");
    }

    #[test]
    fn only_fields_of_the_kind_are_read() {
        let draft = ReadingDraft {
            systolic: Some(120),
            diastolic: Some(80),
            pounds: Some(160.0),
            ..Default::default()
        };

        assert_eq!(draft.validate(MetricKind::Weight).unwrap(), MetricReading::Weight { pounds: 160.0 });
        assert!(draft.validate(MetricKind::BloodSugar).is_err());
    }

    #[test]
    fn zero_and_non_finite_values_are_rejected() {
        let zero = ReadingDraft {
            level: Some(0),
            ..Default::default()
        };
        let nan = ReadingDraft {
            pounds: Some(f32::NAN),
            ..Default::default()
        };

        assert!(zero.validate(MetricKind::BloodSugar).is_err());
        assert!(nan.validate(MetricKind::Weight).is_err());
    }

    #[tokio::test]
    async fn invalid_drafts_are_not_stored() {
        let db = DbClient::surreal_memory().await.unwrap();

        assert!(record_reading("guest", MetricKind::Weight, ReadingDraft::default(), &db).await.is_err());
        assert!(db.load_metrics("guest", None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_readings_are_stored() {
        let db = DbClient::surreal_memory().await.unwrap();
        let draft = ReadingDraft {
            level: Some(118),
            timing: SugarTiming::AfterMeal,
            notes: Some("   ".to_string()),
            ..Default::default()
        };

        let entry = record_reading("guest", MetricKind::BloodSugar, draft, &db).await.unwrap();

        assert_eq!(entry.notes, None);
        assert_eq!(db.load_metrics("guest", Some(MetricKind::BloodSugar), 10).await.unwrap(), [entry]);
    }
}
