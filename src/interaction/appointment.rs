//! The appointment request flow: pick a specialty, then a date and slot, review, confirm.

use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};

use crate::{
    base::types::{Appointment, AppointmentKind, Res},
    reference::scheduling::{self, Specialty},
    service::db::DbClient,
};

/// Which page of the flow is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStep {
    Specialty,
    DateTime,
    Review,
}

/// A complete request, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRequest {
    pub kind: AppointmentKind,
    pub specialty: &'static Specialty,
    pub date: NaiveDate,
    pub time_slot: &'static str,
    pub reason: String,
}

/// One user's appointment request in progress.
#[derive(Debug, Clone)]
pub struct AppointmentScheduler {
    kind: AppointmentKind,
    specialty: Option<&'static Specialty>,
    date: Option<NaiveDate>,
    time_slot: Option<&'static str>,
    reason: String,
    step: ScheduleStep,
    confirmation: Option<AppointmentRequest>,
}

impl Default for AppointmentScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AppointmentScheduler {
    pub fn new() -> Self {
        Self {
            kind: AppointmentKind::New,
            specialty: None,
            date: None,
            time_slot: None,
            reason: String::new(),
            step: ScheduleStep::Specialty,
            confirmation: None,
        }
    }

    pub fn step(&self) -> ScheduleStep {
        self.step
    }

    /// The submitted request, once `schedule` has succeeded.
    pub fn confirmation(&self) -> Option<&AppointmentRequest> {
        self.confirmation.as_ref()
    }

    pub fn set_kind(&mut self, kind: AppointmentKind) {
        self.kind = kind;
    }

    pub fn select_specialty(&mut self, id: &str) -> Res<&'static Specialty> {
        let specialty = scheduling::specialty(id).ok_or_else(|| anyhow::anyhow!("Unknown specialty `{id}`."))?;

        self.specialty = Some(specialty);

        Ok(specialty)
    }

    /// Dates before `today` are refused and leave the current choice untouched.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Res<()> {
        if date < today {
            return Err(anyhow::anyhow!("Appointments cannot be requested for a past date ({date})."));
        }

        self.date = Some(date);

        Ok(())
    }

    pub fn select_time(&mut self, label: &str) -> Res<&'static str> {
        let slot = scheduling::time_slot(label).ok_or_else(|| anyhow::anyhow!("`{label}` is not an available time slot."))?;

        self.time_slot = Some(slot);

        Ok(slot)
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    /// Moves to the next page once the current one is filled in.
    pub fn next(&mut self) -> Res<ScheduleStep> {
        self.step = match self.step {
            ScheduleStep::Specialty if self.specialty.is_none() => return Err(anyhow::anyhow!("Please select a specialty")),
            ScheduleStep::Specialty => ScheduleStep::DateTime,
            ScheduleStep::DateTime if self.date.is_none() => return Err(anyhow::anyhow!("Please select a date")),
            ScheduleStep::DateTime if self.time_slot.is_none() => return Err(anyhow::anyhow!("Please select a time")),
            ScheduleStep::DateTime | ScheduleStep::Review => ScheduleStep::Review,
        };

        Ok(self.step)
    }

    pub fn back(&mut self) -> ScheduleStep {
        self.step = match self.step {
            ScheduleStep::Review => ScheduleStep::DateTime,
            ScheduleStep::DateTime | ScheduleStep::Specialty => ScheduleStep::Specialty,
        };

        self.step
    }

    /// Builds the request. Refused until specialty, date, and slot are all chosen.
    #[instrument(skip(self))]
    pub fn schedule(&mut self) -> Res<AppointmentRequest> {
        let (Some(specialty), Some(date), Some(time_slot)) = (self.specialty, self.date, self.time_slot) else {
            return Err(anyhow::anyhow!("Please complete all required fields"));
        };

        let request = AppointmentRequest {
            kind: self.kind,
            specialty,
            date,
            time_slot,
            reason: self.reason.trim().to_string(),
        };

        info!("Appointment request prepared with `{}` on {} at {}.", specialty.id, date, time_slot);

        self.confirmation = Some(request.clone());

        Ok(request)
    }

    /// Back to the first page with nothing selected.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Stores a request for `user_id`.
#[instrument(skip(request, db))]
pub async fn submit_appointment(user_id: &str, request: &AppointmentRequest, db: &DbClient) -> Res<Appointment> {
    let appointment = Appointment {
        user_id: user_id.to_string(),
        kind: request.kind,
        specialty_id: request.specialty.id.to_string(),
        date: request.date,
        time_slot: request.time_slot.to_string(),
        reason: request.reason.clone(),
        requested_at: Utc::now(),
    };

    db.append_appointment(&appointment).await?;

    Ok(appointment)
}
