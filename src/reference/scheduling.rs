//! Specialties and bookable time slots for appointment requests.

use serde::Serialize;

/// A medical specialty an appointment can be requested with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Specialty {
    pub id: &'static str,
    pub name: &'static str,
}

static SPECIALTIES: &[Specialty] = &[
    Specialty { id: "gp", name: "General Practitioner" },
    Specialty { id: "cardio", name: "Cardiologist" },
    Specialty { id: "derm", name: "Dermatologist" },
    Specialty { id: "neuro", name: "Neurologist" },
    Specialty { id: "ortho", name: "Orthopedist" },
    Specialty { id: "psych", name: "Psychiatrist" },
    Specialty { id: "ped", name: "Pediatrician" },
    Specialty { id: "ophth", name: "Ophthalmologist" },
    Specialty { id: "ent", name: "ENT Specialist" },
];

// In day order.
static TIME_SLOTS: &[&str] = &[
    "9:00 AM", "9:30 AM", "10:00 AM", "10:30 AM", "11:00 AM", "11:30 AM", "1:00 PM", "1:30 PM", "2:00 PM", "2:30 PM", "3:00 PM", "3:30 PM", "4:00 PM",
    "4:30 PM",
];

pub fn specialties() -> &'static [Specialty] {
    SPECIALTIES
}

pub fn specialty(id: &str) -> Option<&'static Specialty> {
    SPECIALTIES.iter().find(|s| s.id == id)
}

pub fn time_slots() -> &'static [&'static str] {
    TIME_SLOTS
}

/// Resolves a slot label to its canonical `'static` form, ignoring case and surrounding space.
pub fn time_slot(label: &str) -> Option<&'static str> {
    let label = label.trim();

    TIME_SLOTS.iter().copied().find(|slot| slot.eq_ignore_ascii_case(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specialties_resolve_by_id() {
        assert_eq!(specialties().len(), 9);
        assert_eq!(specialty("cardio").map(|s| s.name), Some("Cardiologist"));
        assert!(specialty("Cardiologist").is_none());
    }

    #[test]
    fn slots_resolve_loosely() {
        assert_eq!(time_slot(" 9:30 am "), Some("9:30 AM"));
        assert_eq!(time_slot("4:30 PM"), Some("4:30 PM"));
        assert!(time_slot("12:00 PM").is_none());
        assert_eq!(time_slots().first(), Some(&"9:00 AM"));
    }
}
