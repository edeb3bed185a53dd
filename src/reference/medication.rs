//! Over-the-counter and common prescription medication reference.

use serde::Serialize;

/// A medication reference entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicationRecord {
    pub name: &'static str,
    pub usage: &'static str,
    pub dosage: &'static str,
    pub side_effects: &'static [&'static str],
    pub warnings: &'static [&'static str],
}

// Brand names are part of `name` so that searching by brand resolves.
static MEDICATIONS: &[MedicationRecord] = &[
    MedicationRecord {
        name: "Acetaminophen (Tylenol)",
        usage: "Used to treat pain and reduce fever.",
        dosage: "Adults: 325-650mg every 4-6 hours as needed. Do not exceed 3000mg in 24 hours.",
        side_effects: &["Nausea", "Stomach pain", "Headache", "Skin rash"],
        warnings: &["May cause liver damage in high doses or with alcohol consumption."],
    },
    MedicationRecord {
        name: "Ibuprofen (Advil, Motrin)",
        usage: "Anti-inflammatory medication used to reduce pain, inflammation, and fever.",
        dosage: "Adults: 200-400mg every 4-6 hours as needed. Do not exceed 1200mg in 24 hours.",
        side_effects: &["Stomach upset", "Heartburn", "Dizziness", "Headache"],
        warnings: &[
            "May increase risk of heart attack or stroke with prolonged use.",
            "Not recommended for pregnant women in the third trimester.",
        ],
    },
    MedicationRecord {
        name: "Amoxicillin",
        usage: "Antibiotic used to treat bacterial infections.",
        dosage: "Adults: 250-500mg every 8 hours or 500-875mg every 12 hours, as prescribed.",
        side_effects: &["Diarrhea", "Stomach upset", "Rash", "Vomiting"],
        warnings: &[
            "May cause allergic reactions in people with penicillin allergy.",
            "Complete the full prescribed course even if symptoms improve.",
        ],
    },
    MedicationRecord {
        name: "Loratadine (Claritin)",
        usage: "Antihistamine used to treat allergy symptoms.",
        dosage: "Adults and children over 12: 10mg once daily.",
        side_effects: &["Headache", "Drowsiness", "Dry mouth", "Fatigue"],
        warnings: &["May interact with certain medications. Consult your doctor if taking other medications."],
    },
];

/// All medication records, in search order.
pub fn medications() -> &'static [MedicationRecord] {
    MEDICATIONS
}

/// Case-insensitive substring search over medication names.
///
/// Returns the first match in catalog order. A blank query matches nothing.
pub fn lookup_medication(query: &str) -> Option<&'static MedicationRecord> {
    let needle = query.trim().to_lowercase();

    if needle.is_empty() {
        return None;
    }

    MEDICATIONS.iter().find(|m| m.name.to_lowercase().contains(&needle))
}
