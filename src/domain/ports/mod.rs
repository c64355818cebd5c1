use crate::domain::models::{
    appointment::Appointment, customer::Customer, draft::EditDraft,
    service::Service, technician::{Technician, TechnicianStatus},
};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::BTreeSet;

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list(&self, date: Option<&str>) -> Result<Vec<Appointment>, AppError>;
    /// Appointments on exactly this (date, time) holding an occupying status.
    async fn list_occupying_slot(&self, date: &str, time: &str) -> Result<Vec<Appointment>, AppError>;
    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    /// Writes the appointment only if no other occupying appointment holds its
    /// (technician, date, time) slot. Check and write share one transaction.
    async fn update_if_slot_free(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError>;
    async fn list(&self) -> Result<Vec<Service>, AppError>;
}

#[async_trait]
pub trait TechnicianRepository: Send + Sync {
    async fn create(&self, technician: &Technician) -> Result<Technician, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Technician>, AppError>;
    async fn list(&self, status: Option<TechnicianStatus>) -> Result<Vec<Technician>, AppError>;
    async fn update(&self, technician: &Technician) -> Result<Technician, AppError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, customer: &Customer) -> Result<Customer, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError>;
    async fn list(&self) -> Result<Vec<Customer>, AppError>;
    async fn update(&self, customer: &Customer) -> Result<Customer, AppError>;
}

/// Everything an edit session needs from the record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    /// Ordered by name.
    async fn list_services(&self) -> Result<Vec<Service>, AppError>;
    /// Available technicians only, ordered by first name.
    async fn list_available_technicians(&self) -> Result<Vec<Technician>, AppError>;
    async fn find_conflicting_technician_ids(
        &self,
        date: &str,
        time: &str,
        exclude_id: &str,
    ) -> Result<BTreeSet<String>, AppError>;
    async fn update_appointment(&self, id: &str, draft: &EditDraft) -> Result<Appointment, AppError>;
}
