//! The fixed symptom catalog and the emergency symptom set.

use std::{collections::HashMap, sync::LazyLock};

/// A catalog entry: identifier plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symptom {
    pub id: &'static str,
    pub label: &'static str,
}

impl Symptom {
    /// Whether this symptom forces the emergency tier on its own.
    pub fn is_emergency(&self) -> bool {
        is_emergency_symptom(self.id)
    }
}

const fn symptom(id: &'static str, label: &'static str) -> Symptom {
    Symptom { id, label }
}

// ── Catalog ─────────────────────────────────────────────────

static SYMPTOMS: &[Symptom] = &[
    symptom("headache", "Headache"),
    symptom("fever", "Fever"),
    symptom("cough", "Cough"),
    symptom("fatigue", "Fatigue"),
    symptom("sore-throat", "Sore Throat"),
    symptom("shortness-of-breath", "Shortness of Breath"),
    symptom("body-aches", "Body Aches"),
    symptom("nausea", "Nausea"),
    symptom("dizziness", "Dizziness"),
    symptom("rash", "Rash"),
    symptom("chest-pain", "Chest Pain"),
    symptom("abdominal-pain", "Abdominal Pain"),
    symptom("severe-headache", "Severe Headache"),
    symptom("vomiting", "Persistent Vomiting"),
    symptom("joint-pain", "Joint Pain or Swelling"),
    symptom("stroke-symptoms", "Facial Drooping, Arm Weakness, or Speech Difficulty"),
    symptom("severe-bleeding", "Severe Bleeding"),
    symptom("severe-burn", "Severe Burns"),
    symptom("unconsciousness", "Unconsciousness"),
    symptom("severe-head-injury", "Severe Head Injury"),
    symptom("poisoning", "Poisoning"),
    symptom("severe-allergic-reaction", "Severe Allergic Reaction"),
];

/// Symptoms whose presence alone means emergency care.
static EMERGENCY_SYMPTOMS: &[&str] = &[
    "chest-pain",
    "shortness-of-breath",
    "severe-bleeding",
    "stroke-symptoms",
    "unconsciousness",
    "severe-head-injury",
    "poisoning",
    "severe-burn",
    "severe-allergic-reaction",
];

static SYMPTOMS_BY_ID: LazyLock<HashMap<&'static str, &'static Symptom>> = LazyLock::new(|| SYMPTOMS.iter().map(|s| (s.id, s)).collect());

// ── Lookups ─────────────────────────────────────────────────

/// All catalog entries, in display order.
pub fn symptoms() -> &'static [Symptom] {
    SYMPTOMS
}

/// The emergency symptom identifiers.
pub fn emergency_symptoms() -> &'static [&'static str] {
    EMERGENCY_SYMPTOMS
}

pub fn is_emergency_symptom(id: &str) -> bool {
    EMERGENCY_SYMPTOMS.contains(&id)
}

pub fn get(id: &str) -> Option<&'static Symptom> {
    SYMPTOMS_BY_ID.get(id).copied()
}

pub fn is_known(id: &str) -> bool {
    SYMPTOMS_BY_ID.contains_key(id)
}

/// Display label for an identifier, if it is in the catalog.
pub fn label_for(id: &str) -> Option<&'static str> {
    get(id).map(|s| s.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        assert_eq!(SYMPTOMS_BY_ID.len(), SYMPTOMS.len());
    }

    #[test]
    fn every_emergency_symptom_is_in_the_catalog() {
        for id in emergency_symptoms() {
            assert!(is_known(id), "`{id}` missing from catalog");
        }
    }

    #[test]
    fn labels_resolve() {
        assert_eq!(label_for("vomiting"), Some("Persistent Vomiting"));
        assert_eq!(label_for("not-a-symptom"), None);
    }

    #[test]
    fn emergency_flag_follows_the_emergency_set() {
        assert!(get("poisoning").unwrap().is_emergency());
        assert!(!get("cough").unwrap().is_emergency());
    }
}
