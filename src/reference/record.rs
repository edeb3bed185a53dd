//! The sample health-record summary shown when no records system is connected.
//!
//! The data is fixed; nothing here talks to an external records system.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatientInfo {
    pub name: &'static str,
    pub date_of_birth: &'static str,
    pub gender: &'static str,
    pub blood_type: &'static str,
    pub height: &'static str,
    pub weight: &'static str,
    pub bmi: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergySeverity {
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allergy {
    pub kind: &'static str,
    pub name: &'static str,
    pub severity: AllergySeverity,
    pub reaction: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub name: &'static str,
    pub diagnosed: &'static str,
    pub status: &'static str,
    pub notes: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentMedication {
    pub name: &'static str,
    pub dosage: &'static str,
    pub frequency: &'static str,
    pub started: &'static str,
    pub purpose: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Immunization {
    pub name: &'static str,
    pub date: &'static str,
    pub status: &'static str,
}

/// Lab result status; anything but `Normal` is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabStatus {
    Normal,
    Borderline,
    Elevated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabResult {
    pub test: &'static str,
    pub value: &'static str,
    pub range: &'static str,
    pub status: LabStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabPanel {
    pub name: &'static str,
    pub date: &'static str,
    pub results: &'static [LabResult],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub kind: &'static str,
    pub date: &'static str,
    pub provider: &'static str,
    pub reason: &'static str,
    pub notes: &'static str,
    pub follow_up: &'static str,
}

/// A read-only health record summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthRecord {
    pub patient: PatientInfo,
    pub allergies: &'static [Allergy],
    pub conditions: &'static [Condition],
    pub medications: &'static [CurrentMedication],
    pub immunizations: &'static [Immunization],
    pub lab_panels: &'static [LabPanel],
    pub visits: &'static [Visit],
}

impl HealthRecord {
    /// Lab results outside the normal range, with the panel they belong to.
    pub fn flagged_results(&self) -> impl Iterator<Item = (&'static LabPanel, &'static LabResult)> + use<> {
        let panels = self.lab_panels;

        panels.iter().flat_map(|panel| panel.results.iter().filter(|r| r.status != LabStatus::Normal).map(move |r| (panel, r)))
    }

    pub fn severe_allergies(&self) -> impl Iterator<Item = &'static Allergy> + use<> {
        let allergies = self.allergies;

        allergies.iter().filter(|a| a.severity == AllergySeverity::Severe)
    }
}

pub const RECORD_FOOTER: &str = "This is a summary of your health records. For complete medical history, please consult with your healthcare provider.";

static SAMPLE_RECORD: HealthRecord = HealthRecord {
    patient: PatientInfo {
        name: "Demo Patient",
        date_of_birth: "1980-05-15",
        gender: "Female",
        blood_type: "O+",
        height: "5'6\"",
        weight: "150 lbs",
        bmi: "24.2",
    },
    allergies: &[
        Allergy {
            kind: "Medication",
            name: "Penicillin",
            severity: AllergySeverity::Severe,
            reaction: "Hives, Difficulty Breathing",
        },
        Allergy {
            kind: "Food",
            name: "Peanuts",
            severity: AllergySeverity::Moderate,
            reaction: "Skin Rash, Swelling",
        },
    ],
    conditions: &[
        Condition {
            name: "Hypertension",
            diagnosed: "2018-03-10",
            status: "Ongoing",
            notes: "Well-controlled with medication",
        },
        Condition {
            name: "Asthma",
            diagnosed: "2005-07-22",
            status: "Ongoing",
            notes: "Mild, occasional flare-ups",
        },
    ],
    medications: &[
        CurrentMedication {
            name: "Lisinopril",
            dosage: "10mg",
            frequency: "Once daily",
            started: "2018-03-15",
            purpose: "Hypertension",
        },
        CurrentMedication {
            name: "Albuterol Inhaler",
            dosage: "90mcg",
            frequency: "As needed",
            started: "2005-08-01",
            purpose: "Asthma",
        },
    ],
    immunizations: &[
        Immunization {
            name: "Influenza",
            date: "2024-10-05",
            status: "Completed",
        },
        Immunization {
            name: "COVID-19",
            date: "2023-09-12",
            status: "Completed",
        },
        Immunization {
            name: "Tetanus",
            date: "2020-03-18",
            status: "Completed",
        },
    ],
    lab_panels: &[
        LabPanel {
            name: "Complete Blood Count",
            date: "2024-02-15",
            results: &[
                LabResult {
                    test: "WBC",
                    value: "7.2 K/uL",
                    range: "4.5-11.0 K/uL",
                    status: LabStatus::Normal,
                },
                LabResult {
                    test: "RBC",
                    value: "4.8 M/uL",
                    range: "4.2-5.4 M/uL",
                    status: LabStatus::Normal,
                },
                LabResult {
                    test: "Hemoglobin",
                    value: "14.2 g/dL",
                    range: "12.0-16.0 g/dL",
                    status: LabStatus::Normal,
                },
                LabResult {
                    test: "Platelets",
                    value: "250 K/uL",
                    range: "150-450 K/uL",
                    status: LabStatus::Normal,
                },
            ],
        },
        LabPanel {
            name: "Lipid Panel",
            date: "2024-02-15",
            results: &[
                LabResult {
                    test: "Total Cholesterol",
                    value: "195 mg/dL",
                    range: "< 200 mg/dL",
                    status: LabStatus::Normal,
                },
                LabResult {
                    test: "LDL",
                    value: "110 mg/dL",
                    range: "< 100 mg/dL",
                    status: LabStatus::Elevated,
                },
                LabResult {
                    test: "HDL",
                    value: "55 mg/dL",
                    range: "> 40 mg/dL",
                    status: LabStatus::Normal,
                },
                LabResult {
                    test: "Triglycerides",
                    value: "150 mg/dL",
                    range: "< 150 mg/dL",
                    status: LabStatus::Borderline,
                },
            ],
        },
    ],
    visits: &[
        Visit {
            kind: "Primary Care Visit",
            date: "2024-02-15",
            provider: "Dr. Smith",
            reason: "Annual Physical",
            notes: "Patient is doing well overall. Recommended continued exercise and dietary changes to improve LDL levels.",
            follow_up: "1 year",
        },
        Visit {
            kind: "Specialist Visit",
            date: "2023-10-10",
            provider: "Dr. Johnson, Pulmonology",
            reason: "Asthma Follow-up",
            notes: "Asthma well-controlled. No changes to current management plan.",
            follow_up: "As needed",
        },
    ],
};

pub fn sample_health_record() -> &'static HealthRecord {
    &SAMPLE_RECORD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_only_abnormal_lab_results() {
        let flagged = sample_health_record().flagged_results().map(|(panel, result)| (panel.name, result.test)).collect::<Vec<_>>();

        assert_eq!(flagged, [("Lipid Panel", "LDL"), ("Lipid Panel", "Triglycerides")]);
    }

    #[test]
    fn severe_allergies_are_singled_out() {
        let severe = sample_health_record().severe_allergies().map(|a| a.name).collect::<Vec<_>>();

        assert_eq!(severe, ["Penicillin"]);
    }
}
