//! Rule-based symptom triage.
//!
//! Everything here is a pure function over static tables and a caller-supplied
//! [`SelectedSymptomSet`]. Nothing blocks, allocates shared state, or fails, so it can be
//! called from any thread or async task as-is.
//!
//! Two independent questions can be asked of a selection:
//! - how urgent is it ([`classify_severity`], [`advice_for`]);
//! - what might it be ([`lookup_diagnosis`], [`is_emergency_combination`]).
//!
//! Callers decide how to sequence them.

pub mod catalog;
pub mod diagnosis;

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use catalog::Symptom;
pub use diagnosis::{DiagnosisRecord, UrgencyLevel};

/// Separator used when building a canonical key.
pub const KEY_DELIMITER: &str = "+";

// ── Severity ────────────────────────────────────────────────

/// Triage tier, ordered by urgency (`Emergency` is the greatest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageSeverity {
    Low,
    Medium,
    High,
    Emergency,
}

impl TriageSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageSeverity::Low => "low",
            TriageSeverity::Medium => "medium",
            TriageSeverity::High => "high",
            TriageSeverity::Emergency => "emergency",
        }
    }

    /// Short heading for a result card.
    pub fn headline(&self) -> &'static str {
        match self {
            TriageSeverity::Emergency => "EMERGENCY",
            TriageSeverity::High => "Urgent Care Needed",
            TriageSeverity::Medium => "Medical Attention Recommended",
            TriageSeverity::Low => "Non-Urgent",
        }
    }
}

impl fmt::Display for TriageSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriageSeverity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(TriageSeverity::Low),
            "medium" => Ok(TriageSeverity::Medium),
            "high" => Ok(TriageSeverity::High),
            "emergency" => Ok(TriageSeverity::Emergency),
            _ => Err(anyhow::anyhow!("Invalid triage severity: {s}. Must be one of: low, medium, high, emergency")),
        }
    }
}

// ── Selection ───────────────────────────────────────────────

/// A set of selected symptom identifiers.
///
/// Backed by a `BTreeSet`, so duplicates collapse and iteration is always in ascending
/// lexicographic order regardless of the order symptoms were selected in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSymptomSet(BTreeSet<String>);

impl SelectedSymptomSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the symptom if absent, removes it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SelectedSymptomSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ── Classification ──────────────────────────────────────────

/// Maps a selection to a severity tier. First matching rule wins:
///
/// 1. any emergency symptom → `Emergency`, however many other symptoms there are;
/// 2. more than five symptoms → `High`;
/// 3. more than three symptoms → `Medium`;
/// 4. otherwise (including the empty set) → `Low`.
pub fn classify_severity(symptoms: &SelectedSymptomSet) -> TriageSeverity {
    if symptoms.iter().any(catalog::is_emergency_symptom) {
        return TriageSeverity::Emergency;
    }

    match symptoms.len() {
        n if n > 5 => TriageSeverity::High,
        n if n > 3 => TriageSeverity::Medium,
        _ => TriageSeverity::Low,
    }
}

/// Fixed advice for a severity tier.
pub fn advice_for(severity: TriageSeverity) -> &'static str {
    match severity {
        TriageSeverity::Emergency => "Seek immediate medical attention. Call emergency services (911) or go to the nearest emergency room.",
        TriageSeverity::High => "Contact your doctor today or visit an urgent care facility within the next 24 hours.",
        TriageSeverity::Medium => "Schedule an appointment with your primary care physician within the next few days.",
        TriageSeverity::Low => "Monitor your symptoms. If they persist for more than a week or worsen, schedule a routine appointment with your doctor.",
    }
}

/// Whether the selection contains both chest pain and shortness of breath.
///
/// Other symptoms being present does not change the answer.
pub fn is_emergency_combination(symptoms: &SelectedSymptomSet) -> bool {
    symptoms.contains("chest-pain") && symptoms.contains("shortness-of-breath")
}

/// Canonical lookup key: identifiers sorted ascending and joined with [`KEY_DELIMITER`].
pub fn canonical_key(symptoms: &SelectedSymptomSet) -> String {
    symptoms.iter().collect::<Vec<_>>().join(KEY_DELIMITER)
}

/// Exact-match diagnosis lookup; anything without an exact entry gets the default record.
pub fn lookup_diagnosis(symptoms: &SelectedSymptomSet) -> &'static DiagnosisRecord {
    diagnosis::by_key(&canonical_key(symptoms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> SelectedSymptomSet {
        ids.iter().copied().collect()
    }

    const NON_EMERGENCY: &[&str] = &["headache", "fever", "cough", "fatigue", "sore-throat", "body-aches", "nausea", "dizziness", "rash"];

    #[test]
    fn empty_set_is_low() {
        assert_eq!(classify_severity(&SelectedSymptomSet::new()), TriageSeverity::Low);
    }

    #[test]
    fn count_thresholds_without_emergency_symptoms() {
        for n in 0..=NON_EMERGENCY.len() {
            let expected = match n {
                0..=3 => TriageSeverity::Low,
                4 | 5 => TriageSeverity::Medium,
                _ => TriageSeverity::High,
            };

            assert_eq!(classify_severity(&set(&NON_EMERGENCY[..n])), expected, "{n} symptoms");
        }
    }

    #[test]
    fn any_emergency_symptom_overrides_the_count() {
        for emergency in catalog::emergency_symptoms() {
            for n in 0..=NON_EMERGENCY.len() {
                let mut symptoms = set(&NON_EMERGENCY[..n]);
                symptoms.insert(*emergency);

                assert_eq!(classify_severity(&symptoms), TriageSeverity::Emergency, "{emergency} with {n} others");
            }
        }
    }

    #[test]
    fn three_symptoms_with_two_emergencies_is_emergency() {
        let symptoms = set(&["chest-pain", "shortness-of-breath", "severe-bleeding"]);

        assert_eq!(classify_severity(&symptoms), TriageSeverity::Emergency);
    }

    #[test]
    fn unknown_symptoms_still_count() {
        let symptoms = set(&["a", "b", "c", "d"]);

        assert_eq!(classify_severity(&symptoms), TriageSeverity::Medium);
    }

    #[test]
    fn duplicates_collapse() {
        let symptoms = set(&["fever", "fever", "fever", "fever"]);

        assert_eq!(symptoms.len(), 1);
        assert_eq!(classify_severity(&symptoms), TriageSeverity::Low);
    }

    #[test]
    fn severities_are_ordered_by_urgency() {
        assert!(TriageSeverity::Emergency > TriageSeverity::High);
        assert!(TriageSeverity::High > TriageSeverity::Medium);
        assert!(TriageSeverity::Medium > TriageSeverity::Low);
    }

    #[test]
    fn advice_matches_each_tier() {
        assert!(advice_for(TriageSeverity::Emergency).contains("Call emergency services (911)"));
        assert!(advice_for(TriageSeverity::High).contains("within the next 24 hours"));
        assert!(advice_for(TriageSeverity::Medium).contains("within the next few days"));
        assert!(advice_for(TriageSeverity::Low).starts_with("Monitor your symptoms."));
    }

    #[test]
    fn severity_round_trips_through_strings() {
        for severity in [TriageSeverity::Low, TriageSeverity::Medium, TriageSeverity::High, TriageSeverity::Emergency] {
            assert_eq!(severity.to_string().parse::<TriageSeverity>().unwrap(), severity);
        }

        assert_eq!(serde_json::to_string(&TriageSeverity::Emergency).unwrap(), "\"emergency\"");
    }

    #[test]
    fn canonical_key_is_order_independent() {
        let a = set(&["headache", "fever", "fatigue"]);
        let b = set(&["fatigue", "headache", "fever"]);

        assert_eq!(canonical_key(&a), "fatigue+fever+headache");
        assert_eq!(canonical_key(&a), canonical_key(&b));
        assert_eq!(lookup_diagnosis(&a), lookup_diagnosis(&b));
    }

    #[test]
    fn headache_fever_fatigue_is_cold_flu_or_covid() {
        let record = lookup_diagnosis(&set(&["headache", "fever", "fatigue"]));

        assert_eq!(record.possible_conditions, ["Common Cold", "Flu", "COVID-19"]);
        assert_eq!(record.urgency, UrgencyLevel::Medium);
    }

    #[test]
    fn headache_fever_is_low_urgency() {
        let record = lookup_diagnosis(&set(&["fever", "headache"]));

        assert_eq!(record.possible_conditions, ["Common Cold", "Flu", "Sinus Infection"]);
        assert_eq!(record.urgency, UrgencyLevel::Low);
    }

    #[test]
    fn chest_pain_and_breathlessness() {
        let symptoms = set(&["shortness-of-breath", "chest-pain"]);

        assert!(is_emergency_combination(&symptoms));

        let record = lookup_diagnosis(&symptoms);
        assert_eq!(record.possible_conditions, ["Anxiety Attack", "Asthma", "Heart Issue"]);
        assert_eq!(record.urgency, UrgencyLevel::High);
    }

    #[test]
    fn unmatched_keys_fall_back_to_default() {
        for symptoms in [set(&["rash"]), set(&[]), set(&["headache", "fever", "fatigue", "cough"])] {
            let record = lookup_diagnosis(&symptoms);

            assert_eq!(record, diagnosis::default_diagnosis());
            assert_eq!(record.possible_conditions, ["Multiple possibilities"]);
            assert_eq!(record.urgency, UrgencyLevel::Medium);
        }
    }

    #[test]
    fn emergency_combination_is_a_subset_test() {
        assert!(is_emergency_combination(&set(&["chest-pain", "shortness-of-breath", "rash", "fever"])));
        assert!(!is_emergency_combination(&set(&["chest-pain"])));
        assert!(!is_emergency_combination(&set(&["shortness-of-breath", "severe-bleeding"])));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut symptoms = SelectedSymptomSet::new();

        assert!(symptoms.toggle("rash"));
        assert!(symptoms.contains("rash"));
        assert!(!symptoms.toggle("rash"));
        assert!(symptoms.is_empty());
    }
}
