use std::sync::Arc;
use crate::domain::ports::{AppointmentRepository, CustomerRepository, ServiceRepository, TechnicianRepository};
use crate::domain::services::appointment_service::AppointmentService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub technician_repo: Arc<dyn TechnicianRepository>,
    pub customer_repo: Arc<dyn CustomerRepository>,
    pub appointment_service: Arc<AppointmentService>,
}
