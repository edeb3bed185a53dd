//! Static reference lookups: medications, lifestyle advice, health education, scheduling, and
//! the sample health record.
//!
//! Like the triage tables, every lookup here is total: a miss resolves to a fallback
//! (lifestyle advice) or to `None` (medication, guidance, specialty), never to an error.

pub mod education;
pub mod lifestyle;
pub mod medication;
pub mod record;
pub mod scheduling;

pub use education::{EmergencyGuidance, emergency_guidance, emergency_scenarios, health_education_topics};
pub use lifestyle::lifestyle_advice_for;
pub use medication::{MedicationRecord, lookup_medication};
pub use record::{HealthRecord, sample_health_record};
pub use scheduling::{Specialty, specialties, specialty, time_slot, time_slots};
