use crate::domain::models::{service::AddOn, technician::TechnicianStatus};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub base_price: i64,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
}

#[derive(Deserialize)]
pub struct CreateTechnicianRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTechnicianRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: Option<TechnicianStatus>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct TechnicianQuery {
    pub status: Option<TechnicianStatus>,
}

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub full_name: String,
    pub phone: String,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCustomerRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct AppointmentListQuery {
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct ConflictQuery {
    pub date: Option<String>,
    pub time: Option<String>,
}
