//! The symptom checker session: select symptoms, submit, read the result, start over.

use tracing::{info, instrument, warn};

use crate::{
    base::types::Res,
    triage::{self, DiagnosisRecord, SelectedSymptomSet},
};

/// What the checker shows after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Chest pain with shortness of breath: show the emergency alert instead of a diagnosis.
    EmergencyAlert,
    /// The looked-up diagnosis record.
    Diagnosis(&'static DiagnosisRecord),
}

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPhase {
    /// Nothing selected yet.
    Empty,
    /// At least one symptom selected, not yet submitted.
    Selecting,
    /// A result is on screen.
    Displayed(CheckOutcome),
}

/// A single user's symptom check.
#[derive(Debug, Clone)]
pub struct SymptomCheck {
    selected: SelectedSymptomSet,
    additional_info: String,
    outcome: Option<CheckOutcome>,
}

impl Default for SymptomCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SymptomCheck {
    pub fn new() -> Self {
        Self {
            selected: SelectedSymptomSet::new(),
            additional_info: String::new(),
            outcome: None,
        }
    }

    pub fn phase(&self) -> CheckPhase {
        match self.outcome {
            Some(outcome) => CheckPhase::Displayed(outcome),
            None if self.selected.is_empty() => CheckPhase::Empty,
            None => CheckPhase::Selecting,
        }
    }

    pub fn selected(&self) -> &SelectedSymptomSet {
        &self.selected
    }

    pub fn additional_info(&self) -> &str {
        &self.additional_info
    }

    /// Free-text note (onset, recent events, ...) kept alongside the selection.
    pub fn set_additional_info(&mut self, info: impl Into<String>) {
        self.additional_info = info.into();
    }

    /// Selects or deselects one symptom. Ignored once a result is displayed.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.outcome.is_some() {
            warn!("Ignoring toggle of `{id}`: a result is already displayed.");
            return self.selected.contains(id);
        }

        self.selected.toggle(id)
    }

    /// Submits the selection. An empty selection is refused.
    #[instrument(skip(self), fields(symptoms = self.selected.len()))]
    pub fn submit(&mut self) -> Res<CheckOutcome> {
        if self.selected.is_empty() {
            return Err(anyhow::anyhow!("Select at least one symptom before submitting."));
        }

        let outcome = if triage::is_emergency_combination(&self.selected) {
            warn!("Emergency symptom combination selected.");
            CheckOutcome::EmergencyAlert
        } else {
            CheckOutcome::Diagnosis(triage::lookup_diagnosis(&self.selected))
        };

        info!("Symptom check submitted for `{}`.", triage::canonical_key(&self.selected));

        self.outcome = Some(outcome);

        Ok(outcome)
    }

    /// Back to an empty selection.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.additional_info.clear();
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::UrgencyLevel;

    #[test]
    fn starts_empty_and_tracks_selection() {
        let mut check = SymptomCheck::new();
        assert_eq!(check.phase(), CheckPhase::Empty);

        check.toggle("fever");
        assert_eq!(check.phase(), CheckPhase::Selecting);

        check.toggle("fever");
        assert_eq!(check.phase(), CheckPhase::Empty);
    }

    #[test]
    fn empty_submission_is_refused() {
        let mut check = SymptomCheck::new();

        assert!(check.submit().is_err());
        assert_eq!(check.phase(), CheckPhase::Empty);
    }

    #[test]
    fn submission_displays_the_diagnosis() {
        let mut check = SymptomCheck::new();
        check.toggle("headache");
        check.toggle("fever");

        let outcome = check.submit().unwrap();

        let CheckOutcome::Diagnosis(record) = outcome else {
            panic!("expected a diagnosis, got {outcome:?}");
        };
        assert_eq!(record.urgency, UrgencyLevel::Low);
        assert_eq!(check.phase(), CheckPhase::Displayed(outcome));
    }

    #[test]
    fn chest_pain_with_breathlessness_raises_the_alert() {
        let mut check = SymptomCheck::new();
        check.toggle("chest-pain");
        check.toggle("shortness-of-breath");
        check.toggle("nausea");

        assert_eq!(check.submit().unwrap(), CheckOutcome::EmergencyAlert);
    }

    #[test]
    fn toggles_after_submission_are_ignored() {
        let mut check = SymptomCheck::new();
        check.toggle("rash");
        check.submit().unwrap();

        check.toggle("fever");

        assert!(!check.selected().contains("fever"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut check = SymptomCheck::new();
        check.toggle("rash");
        check.set_additional_info("Started after a hike.");
        check.submit().unwrap();

        check.reset();

        assert_eq!(check.phase(), CheckPhase::Empty);
        assert!(check.additional_info().is_empty());
    }
}
