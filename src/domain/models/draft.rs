use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeSet;
use crate::domain::models::appointment::Appointment;
use crate::domain::services::availability::normalize_slot;
use crate::error::AppError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Editable working copy of an appointment. Empty strings mean "not set".
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EditDraft {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_note: Option<String>,
    pub service_id: String,
    pub add_ons: BTreeSet<String>,
    pub technician_id: String,
    pub date: String,
    pub time: String,
}

/// A single form mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    CustomerName(String),
    CustomerPhone(String),
    CustomerNote(Option<String>),
    Service(String),
    ToggleAddOn(String),
    Technician(String),
    Date(String),
    Time(String),
}

/// What has to be recomputed after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    None,
    RecomputePrice,
    RecheckAvailability,
}

impl EditDraft {
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            customer_name: appointment.customer_name.clone(),
            customer_phone: appointment.customer_phone.clone(),
            customer_note: appointment.customer_note.clone(),
            service_id: appointment.service_id.clone(),
            add_ons: appointment.add_ons.0.clone(),
            technician_id: appointment.technician_id.clone(),
            date: appointment.date.clone(),
            time: appointment.time.clone(),
        }
    }

    pub fn apply(&mut self, edit: DraftEdit) -> Reaction {
        match edit {
            DraftEdit::CustomerName(v) => { self.customer_name = v; Reaction::None }
            DraftEdit::CustomerPhone(v) => { self.customer_phone = v; Reaction::None }
            DraftEdit::CustomerNote(v) => { self.customer_note = v; Reaction::None }
            DraftEdit::Technician(v) => { self.technician_id = v; Reaction::None }
            DraftEdit::Service(v) => {
                self.service_id = v;
                Reaction::RecomputePrice
            }
            DraftEdit::ToggleAddOn(name) => {
                if !self.add_ons.remove(&name) {
                    self.add_ons.insert(name);
                }
                Reaction::RecomputePrice
            }
            DraftEdit::Date(v) => {
                self.date = v;
                Reaction::RecheckAvailability
            }
            DraftEdit::Time(v) => {
                self.time = v;
                Reaction::RecheckAvailability
            }
        }
    }

    /// The (date, time) slot, when both parts are filled in.
    pub fn slot(&self) -> Option<(&str, &str)> {
        normalize_slot(&self.date, &self.time)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("service_id", &self.service_id),
            ("technician_id", &self.technician_id),
            ("date", &self.date),
            ("time", &self.time),
            ("customer_name", &self.customer_name),
            ("customer_phone", &self.customer_phone),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Validation(format!("Missing required fields: {}", missing.join(", "))));
        }

        // Slots are matched as stored text, so only the zero-padded form is accepted.
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
            .filter(|d| d.format(DATE_FORMAT).to_string() == self.date);
        if date.is_none() {
            return Err(AppError::Validation("Invalid date format (YYYY-MM-DD)".into()));
        }

        let time = NaiveTime::parse_from_str(&self.time, TIME_FORMAT).ok()
            .filter(|t| t.format(TIME_FORMAT).to_string() == self.time);
        if time.is_none() {
            return Err(AppError::Validation("Invalid time format (HH:MM)".into()));
        }

        Ok(())
    }
}
