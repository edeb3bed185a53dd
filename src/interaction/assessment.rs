//! The urgency assessment: severity tier plus advice for a selection.

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    base::types::Res,
    triage::{self, SelectedSymptomSet, TriageSeverity},
};

/// Result of an urgency assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageResult {
    pub severity: TriageSeverity,
    pub advice: &'static str,
}

/// Classifies the selection. An empty selection is refused here; the classifier itself
/// would answer `low`.
#[instrument(skip_all, fields(symptoms = symptoms.len()))]
pub fn assess(symptoms: &SelectedSymptomSet) -> Res<TriageResult> {
    if symptoms.is_empty() {
        return Err(anyhow::anyhow!("Select at least one symptom to assess urgency."));
    }

    let severity = triage::classify_severity(symptoms);

    info!("Assessed severity `{}`.", severity);

    Ok(TriageResult {
        severity,
        advice: triage::advice_for(severity),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_is_refused() {
        assert!(assess(&SelectedSymptomSet::new()).is_err());
    }

    #[test]
    fn advice_follows_severity() {
        let symptoms = ["severe-burn"].into_iter().collect::<SelectedSymptomSet>();

        let result = assess(&symptoms).unwrap();

        assert_eq!(result.severity, TriageSeverity::Emergency);
        assert_eq!(result.advice, triage::advice_for(TriageSeverity::Emergency));
    }
}
