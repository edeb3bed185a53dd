//! Canned diagnosis records keyed by canonical symptom-set key.

use std::{collections::HashMap, fmt, str::FromStr, sync::LazyLock};

use serde::{Deserialize, Serialize};

/// Urgency attached to a diagnosis record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(UrgencyLevel::Low),
            "medium" => Ok(UrgencyLevel::Medium),
            "high" => Ok(UrgencyLevel::High),
            _ => Err(anyhow::anyhow!("Invalid urgency level: {s}. Must be one of: low, medium, high")),
        }
    }
}

/// Possible conditions and a recommendation for one exact symptom combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisRecord {
    pub possible_conditions: &'static [&'static str],
    pub recommendations: &'static str,
    pub urgency: UrgencyLevel,
}

/// Key of the fallback record.
pub const DEFAULT_KEY: &str = "default";

static DEFAULT_DIAGNOSIS: DiagnosisRecord = DiagnosisRecord {
    possible_conditions: &["Multiple possibilities"],
    recommendations: "Based on your symptoms, I recommend consulting with a healthcare provider for proper diagnosis.",
    urgency: UrgencyLevel::Medium,
};

// Keys are canonical: ids sorted ascending and joined with `+`.
static DIAGNOSES: &[(&str, DiagnosisRecord)] = &[
    (
        "fatigue+fever+headache",
        DiagnosisRecord {
            possible_conditions: &["Common Cold", "Flu", "COVID-19"],
            recommendations: "Rest, hydrate well, and monitor your symptoms. If fever persists over 101°F for more than 2 days, consult a doctor.",
            urgency: UrgencyLevel::Medium,
        },
    ),
    (
        "fever+headache",
        DiagnosisRecord {
            possible_conditions: &["Common Cold", "Flu", "Sinus Infection"],
            recommendations: "Rest, stay hydrated, and take over-the-counter pain relievers if needed.",
            urgency: UrgencyLevel::Low,
        },
    ),
    (
        "chest-pain+shortness-of-breath",
        DiagnosisRecord {
            possible_conditions: &["Anxiety Attack", "Asthma", "Heart Issue"],
            recommendations: "This combination of symptoms requires immediate medical attention. Please consult a healthcare provider right away.",
            urgency: UrgencyLevel::High,
        },
    ),
];

static DIAGNOSES_BY_KEY: LazyLock<HashMap<&'static str, &'static DiagnosisRecord>> = LazyLock::new(|| DIAGNOSES.iter().map(|(key, record)| (*key, record)).collect());

/// The fallback record.
pub fn default_diagnosis() -> &'static DiagnosisRecord {
    &DEFAULT_DIAGNOSIS
}

/// Exact-match lookup by canonical key, falling back to the default record.
pub(crate) fn by_key(key: &str) -> &'static DiagnosisRecord {
    DIAGNOSES_BY_KEY.get(key).copied().unwrap_or(&DEFAULT_DIAGNOSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_keys_are_canonical() {
        for (key, _) in DIAGNOSES {
            let mut parts = key.split('+').collect::<Vec<_>>();
            parts.sort_unstable();

            assert_eq!(parts.join("+"), *key);
        }
    }

    #[test]
    fn default_key_resolves_to_default_record() {
        assert_eq!(by_key(DEFAULT_KEY), default_diagnosis());
        assert_eq!(by_key(""), default_diagnosis());
    }

    #[test]
    fn urgency_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<UrgencyLevel>().unwrap(), UrgencyLevel::High);
        assert!("urgent".parse::<UrgencyLevel>().is_err());
    }
}
