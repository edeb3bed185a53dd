//! Lifestyle and diet tips per condition.

/// Condition name of the fallback entry.
pub const DEFAULT_CONDITION: &str = "default";

static DEFAULT_ADVICE: &[&str] = &[
    "Maintain a balanced diet rich in fruits, vegetables, and whole grains",
    "Aim for at least 30 minutes of moderate physical activity daily",
    "Stay hydrated by drinking plenty of water throughout the day",
    "Ensure 7-9 hours of quality sleep each night",
    "Manage stress through mindfulness, meditation, or relaxation techniques",
];

static LIFESTYLE_ADVICE: &[(&str, &[&str])] = &[
    (
        "Common Cold",
        &[
            "Stay hydrated with water, tea, and clear broths",
            "Rest adequately to help your immune system recover",
            "Use a humidifier to ease congestion",
            "Consider vitamin C-rich foods like citrus fruits and leafy greens",
        ],
    ),
    (
        "Flu",
        &[
            "Get plenty of rest to help your body fight the infection",
            "Stay hydrated, especially if you have a fever",
            "Consume easy-to-digest foods like soups and broths",
            "Avoid contact with others to prevent spreading the virus",
        ],
    ),
    (
        "COVID-19",
        &[
            "Self-isolate to prevent spreading the virus",
            "Monitor your oxygen levels with a pulse oximeter if possible",
            "Stay well-hydrated and rest as much as possible",
            "Eat nutritious foods to support your immune system",
        ],
    ),
    (
        "Hypertension",
        &[
            "Adopt the DASH diet (rich in fruits, vegetables, whole grains, lean proteins)",
            "Reduce sodium intake to less than 1,500mg per day",
            "Engage in regular moderate aerobic exercise (150 minutes/week)",
            "Limit alcohol consumption and avoid smoking",
        ],
    ),
];

/// Conditions with dedicated advice.
pub fn conditions() -> impl Iterator<Item = &'static str> {
    LIFESTYLE_ADVICE.iter().map(|(condition, _)| *condition)
}

/// Advice for an exact condition name, or the general advice. Never empty.
pub fn lifestyle_advice_for(condition: &str) -> &'static [&'static str] {
    LIFESTYLE_ADVICE
        .iter()
        .find(|(name, _)| *name == condition)
        .map(|(_, advice)| *advice)
        .unwrap_or(DEFAULT_ADVICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_condition_gets_its_own_advice() {
        let advice = lifestyle_advice_for("Flu");

        assert_eq!(advice.len(), 4);
        assert_eq!(advice[0], "Get plenty of rest to help your body fight the infection");
    }

    #[test]
    fn matching_is_exact() {
        assert_eq!(lifestyle_advice_for("flu"), DEFAULT_ADVICE);
        assert_eq!(lifestyle_advice_for("Sinus Infection"), DEFAULT_ADVICE);
    }

    #[test]
    fn advice_is_never_empty() {
        for condition in conditions().chain([DEFAULT_CONDITION, "", "Heart Issue"]) {
            assert!(!lifestyle_advice_for(condition).is_empty(), "{condition}");
        }
    }
}
