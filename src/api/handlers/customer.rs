use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::domain::models::customer::Customer;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let customers = state.customer_repo.list().await?;
    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.customer_repo.find_by_id(&customer_id).await?
        .ok_or(AppError::NotFound("Customer not found".into()))?;
    Ok(Json(customer))
}

pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.full_name.trim().is_empty() || payload.phone.trim().is_empty() {
        return Err(AppError::Validation("Name and phone are required".into()));
    }

    let customer = Customer::new(payload.full_name, payload.phone, payload.note);
    let created = state.customer_repo.create(&customer).await?;
    info!("Created customer: {}", created.id);
    Ok(Json(created))
}

pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut customer = state.customer_repo.find_by_id(&customer_id).await?
        .ok_or(AppError::NotFound("Customer not found".into()))?;

    if let Some(full_name) = payload.full_name { customer.full_name = full_name; }
    if let Some(phone) = payload.phone { customer.phone = phone; }

    if let Some(note) = payload.note {
        customer.note = if note.is_empty() { None } else { Some(note) };
    }

    let updated = state.customer_repo.update(&customer).await?;
    info!("Customer updated: {}", updated.id);
    Ok(Json(updated))
}
