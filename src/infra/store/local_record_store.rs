use std::collections::BTreeSet;
use std::sync::Arc;
use async_trait::async_trait;
use crate::domain::models::{appointment::Appointment, draft::EditDraft, service::Service, technician::{Technician, TechnicianStatus}};
use crate::domain::ports::RecordStore;
use crate::error::AppError;
use crate::state::AppState;

/// In-process record store backed directly by the repositories.
pub struct LocalRecordStore {
    state: Arc<AppState>,
}

impl LocalRecordStore {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        self.state.appointment_repo.find_by_id(id).await
    }

    async fn list_services(&self) -> Result<Vec<Service>, AppError> {
        self.state.service_repo.list().await
    }

    async fn list_available_technicians(&self) -> Result<Vec<Technician>, AppError> {
        self.state.technician_repo.list(Some(TechnicianStatus::Available)).await
    }

    async fn find_conflicting_technician_ids(&self, date: &str, time: &str, exclude_id: &str) -> Result<BTreeSet<String>, AppError> {
        self.state.appointment_service.find_conflicting_technician_ids(date, time, exclude_id).await
    }

    async fn update_appointment(&self, id: &str, draft: &EditDraft) -> Result<Appointment, AppError> {
        self.state.appointment_service.update(id, draft).await
    }
}
