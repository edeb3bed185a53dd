//! Health education topics and emergency first-aid guidance.

use serde::Serialize;

static HEALTH_EDUCATION_TOPICS: &[&str] = &[
    "Understanding Blood Pressure",
    "Managing Diabetes",
    "Heart Health Basics",
    "Seasonal Allergies",
    "Nutrition Fundamentals",
    "Exercise Guidelines",
    "Sleep Hygiene",
    "Mental Health Awareness",
    "Preventive Screenings",
    "Vaccination Schedule",
];

/// First-aid steps for one emergency scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyGuidance {
    pub id: &'static str,
    pub title: &'static str,
    pub symptoms: &'static str,
    pub actions: &'static [&'static str],
}

static EMERGENCY_SCENARIOS: &[EmergencyGuidance] = &[
    EmergencyGuidance {
        id: "chest-pain",
        title: "Chest Pain",
        symptoms: "Pressure, tightness, or squeezing in the chest that may spread to the jaw, neck, arms, or back. May include shortness of breath, nausea, or cold sweat.",
        actions: &[
            "Call 911 immediately",
            "Sit or lie down in a comfortable position",
            "Take aspirin if available and not allergic",
            "Loosen tight clothing",
        ],
    },
    EmergencyGuidance {
        id: "stroke",
        title: "Signs of Stroke",
        symptoms: "Sudden numbness or weakness in the face, arm, or leg (especially on one side); sudden confusion, trouble speaking or understanding; sudden trouble seeing; sudden severe headache.",
        actions: &[
            "Call 911 immediately",
            "Note the time symptoms began",
            "Check FAST: Face drooping, Arm weakness, Speech difficulty, Time to call 911",
            "Do not give medication, food, or drinks",
        ],
    },
    EmergencyGuidance {
        id: "allergic-reaction",
        title: "Severe Allergic Reaction",
        symptoms: "Hives, swelling of face/throat, difficulty breathing, rapid heartbeat, dizziness, nausea, or vomiting after exposure to an allergen.",
        actions: &[
            "Call 911 immediately",
            "Use an epinephrine autoinjector (EpiPen) if available",
            "Lie quietly on back with legs elevated",
            "Do not eat or drink anything",
        ],
    },
    EmergencyGuidance {
        id: "bleeding",
        title: "Severe Bleeding",
        symptoms: "Heavy or uncontrolled bleeding from a wound.",
        actions: &[
            "Call 911 immediately",
            "Apply direct pressure to the wound with a clean cloth or bandage",
            "If possible, elevate the injured area above the heart",
            "Do not remove embedded objects from wounds",
            "Apply a tourniquet only as a last resort if bleeding cannot be controlled",
        ],
    },
];

/// Steps shown when chest pain and shortness of breath are reported together.
pub static EMERGENCY_COMBINATION_ACTIONS: &[&str] = &[
    "Call emergency services (911) immediately",
    "Do not drive yourself to the hospital",
    "Stay calm and sit or lie down while waiting for help",
];

pub fn health_education_topics() -> &'static [&'static str] {
    HEALTH_EDUCATION_TOPICS
}

pub fn emergency_scenarios() -> &'static [EmergencyGuidance] {
    EMERGENCY_SCENARIOS
}

/// Guidance for a scenario id (exact match).
pub fn emergency_guidance(id: &str) -> Option<&'static EmergencyGuidance> {
    EMERGENCY_SCENARIOS.iter().find(|g| g.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_starts_by_calling_911() {
        for scenario in emergency_scenarios() {
            assert!(scenario.actions[0].starts_with("Call 911"), "{}", scenario.id);
        }
    }

    #[test]
    fn guidance_lookup() {
        assert_eq!(emergency_guidance("stroke").unwrap().title, "Signs of Stroke");
        assert!(emergency_guidance("sprain").is_none());
    }

    #[test]
    fn ten_education_topics() {
        assert_eq!(health_education_topics().len(), 10);
    }
}
