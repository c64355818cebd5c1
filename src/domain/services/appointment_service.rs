use std::collections::BTreeSet;
use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};
use crate::domain::models::{appointment::Appointment, draft::EditDraft};
use crate::domain::ports::{AppointmentRepository, ServiceRepository, TechnicianRepository};
use crate::domain::services::availability::{conflicting_technicians, normalize_slot};
use crate::domain::services::pricing::checked_total_price;
use crate::error::AppError;

/// Server side of appointment editing: conflict lookups and the validated update.
pub struct AppointmentService {
    appointment_repo: Arc<dyn AppointmentRepository>,
    service_repo: Arc<dyn ServiceRepository>,
    technician_repo: Arc<dyn TechnicianRepository>,
    strict_slot_check: bool,
}

impl AppointmentService {
    pub fn new(
        appointment_repo: Arc<dyn AppointmentRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        technician_repo: Arc<dyn TechnicianRepository>,
        strict_slot_check: bool,
    ) -> Self {
        Self { appointment_repo, service_repo, technician_repo, strict_slot_check }
    }

    pub async fn find_conflicting_technician_ids(
        &self,
        date: &str,
        time: &str,
        exclude_id: &str,
    ) -> Result<BTreeSet<String>, AppError> {
        let Some((date, time)) = normalize_slot(date, time) else {
            return Ok(BTreeSet::new());
        };

        let in_slot = self.appointment_repo.list_occupying_slot(date, time).await?;
        Ok(conflicting_technicians(&in_slot, exclude_id))
    }

    pub async fn update(&self, id: &str, draft: &EditDraft) -> Result<Appointment, AppError> {
        draft.validate()?;

        let mut appointment = self.appointment_repo.find_by_id(id).await?
            .ok_or(AppError::NotFound("Appointment not found".into()))?;

        let service = self.service_repo.find_by_id(&draft.service_id).await?
            .ok_or(AppError::Validation(format!("Unknown service: {}", draft.service_id)))?;

        if self.technician_repo.find_by_id(&draft.technician_id).await?.is_none() {
            return Err(AppError::Validation(format!("Unknown technician: {}", draft.technician_id)));
        }

        appointment.customer_name = draft.customer_name.clone();
        appointment.customer_phone = draft.customer_phone.clone();
        appointment.customer_note = draft.customer_note.clone();
        appointment.service_id = draft.service_id.clone();
        appointment.add_ons.0 = draft.add_ons.clone();
        appointment.technician_id = draft.technician_id.clone();
        appointment.date = draft.date.clone();
        appointment.time = draft.time.clone();
        appointment.total_price = checked_total_price(Some(&service), &draft.add_ons)
            .ok_or(AppError::Validation("Total price is out of range".into()))?;
        appointment.updated_at = Utc::now();

        // Only occupying statuses hold a slot.
        let holds_slot = appointment.status.is_occupying();

        let updated = if self.strict_slot_check && holds_slot {
            self.appointment_repo.update_if_slot_free(&appointment).await?
        } else {
            let conflicts = if holds_slot {
                self.find_conflicting_technician_ids(&draft.date, &draft.time, id).await?
            } else {
                BTreeSet::new()
            };
            if conflicts.contains(&draft.technician_id) {
                warn!(
                    "Appointment {} assigned to technician {} who is already booked at {} {}",
                    id, draft.technician_id, draft.date, draft.time
                );
            }
            self.appointment_repo.update(&appointment).await?
        };

        info!("Appointment updated: {} (total {})", updated.id, updated.total_price);
        Ok(updated)
    }
}
